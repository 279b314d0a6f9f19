//! error types for matching

use thiserror::Error;

/// error returned by condition decoding and matching
#[derive(Error, Debug)]
pub enum MatchError {
    /// a referenced key or array index does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// operands or traversal target have unsupported types
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("illegal operator ({0})")]
    IllegalOperator(String),

    /// the matched value or a comparison literal is not representable as JSON
    #[error("import value error ({0})")]
    Import(#[source] serde_json::Error),

    #[error("decode condition error: {0}")]
    Decode(String),
}

impl MatchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MatchError::NotFound(_))
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, MatchError::TypeMismatch(_))
    }
}
