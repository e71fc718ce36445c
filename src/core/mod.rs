pub mod document;
pub mod error;

pub use document::{Document, MutationRequest};
pub use error::{MutationError, Result, StoreError};
