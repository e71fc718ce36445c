use thiserror::Error;

/// Failure reported at the document store boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected request: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Why a single item of a bulk request could not be applied.
///
/// Every variant is contained to the item that produced it; none of them
/// abort the surrounding batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MutationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// HTTP-style status recorded on the item's result.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Store(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(MutationError::validation("id required").status_code(), 400);
        assert_eq!(MutationError::not_found("not found").status_code(), 404);
        let store = MutationError::from(StoreError::Unavailable("down".to_string()));
        assert_eq!(store.status_code(), 500);
    }

    #[test]
    fn store_errors_keep_their_message_when_wrapped() {
        let err = MutationError::from(StoreError::Rejected("mapping conflict".to_string()));
        assert_eq!(err.to_string(), "Store rejected request: mapping conflict");
    }
}
