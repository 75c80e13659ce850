use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the principal provider and its collaborators.
///
/// Only `NotInitialized`, `AlreadyInitialized`, `InvalidArgument` and
/// `StoreUnavailable` ever leave the public provider surface. The remaining
/// variants are produced by store, access-control and session backends and are
/// absorbed (logged and downgraded) at the component boundary.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PrincipalError {
    #[error("principal provider is not initialized")]
    NotInitialized,

    #[error("principal provider is already initialized")]
    AlreadyInitialized,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("authorizable store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("authorizable store error: {0}")]
    StoreError(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("session error: {0}")]
    SessionError(String),
}

pub type Result<T> = std::result::Result<T, PrincipalError>;

impl From<std::num::ParseIntError> for PrincipalError {
    fn from(err: std::num::ParseIntError) -> Self {
        PrincipalError::InvalidArgument(err.to_string())
    }
}

impl From<std::str::ParseBoolError> for PrincipalError {
    fn from(err: std::str::ParseBoolError) -> Self {
        PrincipalError::InvalidArgument(err.to_string())
    }
}

impl From<serde_json::Error> for PrincipalError {
    fn from(err: serde_json::Error) -> Self {
        PrincipalError::InvalidArgument(err.to_string())
    }
}

impl From<strum::ParseError> for PrincipalError {
    fn from(err: strum::ParseError) -> Self {
        PrincipalError::InvalidArgument(err.to_string())
    }
}
