//! per-call match options and the error policies they carry

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::MatchError;
use super::time::DateTimeFormat;

/// what a leaf does when matching fails with a policy-controlled error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// hand the error to the caller
    #[default]
    PropagateError,
    /// treat the leaf as not matching
    ReturnFalse,
}

/// options for a match call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOptions {
    when_not_found: Policy,
    when_type_mismatch: Policy,
    date_time_format: Option<DateTimeFormat>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// set the policy for missing keys and indexes
    pub fn with_not_found(mut self, policy: Policy) -> Self {
        self.when_not_found = policy;
        self
    }

    /// set the policy for type mismatches
    pub fn with_type_mismatch(mut self, policy: Policy) -> Self {
        self.when_type_mismatch = policy;
        self
    }

    /// compare strings as date-times under a chrono strftime layout
    ///
    /// a layout that cannot round-trip the current time is ignored and any
    /// previously set layout is kept.
    pub fn with_date_time_format(mut self, layout: &str) -> Self {
        match DateTimeFormat::new(layout) {
            Some(format) => self.date_time_format = Some(format),
            None => debug!("ignoring date-time layout '{}': cannot round-trip", layout),
        }
        self
    }

    pub fn not_found(&self) -> Policy {
        self.when_not_found
    }

    pub fn type_mismatch(&self) -> Policy {
        self.when_type_mismatch
    }

    pub fn date_time_format(&self) -> Option<&DateTimeFormat> {
        self.date_time_format.as_ref()
    }

    /// fold a leaf result through the error policies
    pub(crate) fn resolve(&self, result: Result<bool, MatchError>) -> Result<bool, MatchError> {
        let policy = match &result {
            Err(MatchError::NotFound(_)) => Some(self.when_not_found),
            Err(MatchError::TypeMismatch(_)) => Some(self.when_type_mismatch),
            _ => None,
        };

        match (policy, result) {
            (Some(Policy::ReturnFalse), Err(err)) => {
                debug!("treating '{}' as no match", err);
                Ok(false)
            }
            (_, result) => result,
        }
    }
}
