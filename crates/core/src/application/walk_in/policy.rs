// Queue policy (deployment-level behavior switches)

use super::constants::{ENV_AUTO_PROMOTE, ENV_TRANSITIONS};
use crate::error::{AppError, Result};
use std::str::FromStr;

/// How status changes outside the documented Waiting -> In Consultation ->
/// Completed path are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Reject transitions that would break the waiting sequence
    #[default]
    Strict,
    /// Apply the status verbatim and leave the position alone
    Lenient,
}

impl FromStr for TransitionPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TransitionPolicy::Strict),
            "lenient" => Ok(TransitionPolicy::Lenient),
            other => Err(AppError::Config(format!(
                "{}: expected 'strict' or 'lenient', got '{}'",
                ENV_TRANSITIONS, other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueuePolicy {
    /// Completing a consultation calls in the patient at waiting-position 1
    pub auto_promote_on_completion: bool,
    pub transitions: TransitionPolicy,
}

impl QueuePolicy {
    /// Load from `FRONTDESK_AUTO_PROMOTE` / `FRONTDESK_TRANSITIONS`; unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut policy = Self::default();

        if let Some(raw) = lookup(ENV_AUTO_PROMOTE) {
            policy.auto_promote_on_completion = parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!(
                    "{}: expected a boolean, got '{}'",
                    ENV_AUTO_PROMOTE, raw
                ))
            })?;
        }

        if let Some(raw) = lookup(ENV_TRANSITIONS) {
            policy.transitions = raw.parse()?;
        }

        Ok(policy)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
