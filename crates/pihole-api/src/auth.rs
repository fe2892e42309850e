//! Session Authentication
//!
//! One POST of the admin password to the auth endpoint; the session id in
//! the answer is good for exactly one stats request.

use crate::client::ApiClient;
use crate::error::{excerpt, AuthError};
use serde_json::{json, Value};
use std::fmt;
use std::future::Future;
use tracing::{debug, warn};

/// Short-lived session token
#[derive(Clone, PartialEq, Eq)]
pub struct Session(String);

impl Session {
    /// Wrap a token returned by the auth endpoint
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value for the session header
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session(<redacted>)")
    }
}

/// Exchanges a credential for a session
pub trait Authenticator {
    /// Perform one login exchange. No retries.
    fn authenticate(
        &self,
        credential: &str,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;
}

impl Authenticator for ApiClient {
    async fn authenticate(&self, credential: &str) -> Result<Session, AuthError> {
        let url = self.config.auth_url();
        debug!("Logging in at {}", url);

        let request = self
            .http
            .post(&url)
            .json(&json!({ "password": credential }));
        let (status, text) = self
            .send(request, self.config.login_timeout)
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!("Login rejected with HTTP {}", status.as_u16());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body: excerpt(&text),
            });
        }

        session_from_body(&text)
    }
}

/// Extract `session.sid` from a login answer
fn session_from_body(text: &str) -> Result<Session, AuthError> {
    let parsed: Value = serde_json::from_str(text).map_err(|_| AuthError::MissingToken)?;
    parsed
        .get("session")
        .and_then(|s| s.get("sid"))
        .and_then(Value::as_str)
        .filter(|sid| !sid.is_empty())
        .map(Session::new)
        .ok_or(AuthError::MissingToken)
}
