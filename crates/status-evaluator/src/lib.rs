//! Health Status Evaluation
//!
//! Classifies the appliance as OK, WARNING or ERROR from the current
//! sample, whether it is live, and the previously cached sample. Rules are
//! checked in a fixed order and the first match wins.

mod config;
mod rules;
mod status;

pub use config::{ConfigError, EvaluatorConfig};
pub use rules::StatusEvaluator;
pub use status::{StatusLevel, StatusReason, StatusResult};
