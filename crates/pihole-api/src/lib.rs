//! Pi-hole API Client
//!
//! Talks to the Pi-hole v6 management API: exchanges the admin password for
//! a session id (`/api/auth`) and reads the statistics summary with it
//! (`/api/stats/summary`), normalizing the document into a [`Sample`].

mod auth;
mod client;
mod error;
mod sample;
mod stats;

pub use auth::{Authenticator, Session};
pub use client::{ApiClient, ApiConfig};
pub use error::{AuthError, FetchError};
pub use sample::Sample;
pub use stats::StatsFetcher;

/// Header carrying the session id on authenticated requests
pub const SESSION_HEADER: &str = "X-FTL-SID";

/// Maximum number of response body characters kept in error values
pub const BODY_EXCERPT_CHARS: usize = 200;
