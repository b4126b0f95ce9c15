//! Error taxonomy returned by every saisim RPC.

use std::fmt;
use thiserror::Error;

/// Status code carried back to RPC callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    InvalidArgument,
    FailedPrecondition,
    NotFound,
    Internal,
    Unimplemented,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::NotFound => "NOT_FOUND",
            Code::Internal => "INTERNAL",
            Code::Unimplemented => "UNIMPLEMENTED",
        };
        f.write_str(s)
    }
}

/// Error type for SAI operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaiError {
    /// Malformed or unsupported request shape.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The operation requires state that does not exist.
    #[error("Failed precondition: {message}")]
    FailedPrecondition { message: String },

    /// Attribute or object lookup miss.
    #[error("Not found: {item}")]
    NotFound { item: String },

    /// The handler does not implement this operation.
    #[error("Unimplemented: {feature}")]
    Unimplemented { feature: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SaiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SaiError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        SaiError::FailedPrecondition {
            message: message.into(),
        }
    }

    pub fn not_found(item: impl Into<String>) -> Self {
        SaiError::NotFound { item: item.into() }
    }

    pub fn unimplemented(feature: impl Into<String>) -> Self {
        SaiError::Unimplemented {
            feature: feature.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        SaiError::Internal {
            message: message.into(),
        }
    }

    pub fn code(&self) -> Code {
        match self {
            SaiError::InvalidArgument { .. } => Code::InvalidArgument,
            SaiError::FailedPrecondition { .. } => Code::FailedPrecondition,
            SaiError::NotFound { .. } => Code::NotFound,
            SaiError::Unimplemented { .. } => Code::Unimplemented,
            SaiError::Internal { .. } => Code::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Code::NotFound
    }
}

/// Result type for SAI operations.
pub type SaiResult<T> = Result<T, SaiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_codes() {
        assert_eq!(SaiError::invalid_argument("x").code(), Code::InvalidArgument);
        assert_eq!(SaiError::failed_precondition("x").code(), Code::FailedPrecondition);
        assert_eq!(SaiError::not_found("x").code(), Code::NotFound);
        assert_eq!(SaiError::unimplemented("x").code(), Code::Unimplemented);
        assert_eq!(SaiError::internal("x").code(), Code::Internal);
    }

    #[test]
    fn test_display() {
        let err = SaiError::not_found("attribute 3 of oid 0x7");
        assert_eq!(err.to_string(), "Not found: attribute 3 of oid 0x7");
        assert_eq!(Code::FailedPrecondition.to_string(), "FAILED_PRECONDITION");
    }
}
