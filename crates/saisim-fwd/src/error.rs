//! Forwarding engine errors.

use saisim_types::SaiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FwdError {
    #[error("table already exists: {0}")]
    TableExists(String),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("entry not found in table {table}")]
    EntryNotFound { table: String },

    #[error("object already exists: {0}")]
    ObjectExists(String),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("invalid entry for table {table}: {reason}")]
    InvalidEntry { table: String, reason: String },

    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

pub type FwdResult<T> = Result<T, FwdError>;

impl From<FwdError> for SaiError {
    fn from(err: FwdError) -> Self {
        match err {
            FwdError::TableNotFound(_)
            | FwdError::EntryNotFound { .. }
            | FwdError::ObjectNotFound(_) => SaiError::not_found(err.to_string()),
            FwdError::InvalidEntry { .. } => SaiError::invalid_argument(err.to_string()),
            FwdError::TableExists(_) | FwdError::ObjectExists(_) | FwdError::Unavailable(_) => {
                SaiError::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use saisim_types::Code;

    #[test]
    fn test_conversion_to_sai_error() {
        let err: SaiError = FwdError::EntryNotFound {
            table: "fib-v4".to_string(),
        }
        .into();
        assert_eq!(err.code(), Code::NotFound);

        let err: SaiError = FwdError::TableExists("fib-v4".to_string()).into();
        assert_eq!(err.code(), Code::Internal);

        let err: SaiError = FwdError::InvalidEntry {
            table: "vlan".to_string(),
            reason: "flow key on exact table".to_string(),
        }
        .into();
        assert_eq!(err.code(), Code::InvalidArgument);
    }
}
