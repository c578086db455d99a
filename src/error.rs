//! Error kinds raised by the record cache and its normalizer.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectorError {
    /// Neither a short nor a long name was supplied for an observation.
    #[error("names not set: probably not an application module")]
    InvalidIdentity,

    #[error("tried to add an already cached record to the cache: {name}")]
    DuplicateRecord { name: String },

    #[error("was asked to update the dates of a record not in the cache: {name}")]
    RecordNotFound { name: String },

    /// An add-on-only accessor was used on a record that cannot answer it.
    #[error("cannot read {field} for {name}: {reason}")]
    InvalidAccessor {
        field: &'static str,
        name: String,
        reason: &'static str,
    },
}

pub type CollectorResult<T> = std::result::Result<T, CollectorError>;
