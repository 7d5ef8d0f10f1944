//! Error types for store, query and server operations.
//!
//! Errors are layered the same way the crate is:
//!
//! - [`StoreError`]: failures of the indexed store and its transactions.
//!   These are never expected in normal operation.
//! - [`QueryError`]: the typed outcomes of the query engine. Conflict,
//!   not-found and invalid-query variants are recoverable; only
//!   [`QueryError::Store`] carries an unexpected failure.
//! - [`ServerError`]: what the service facade hands to a transport when
//!   something unexpected happened. It never leaks storage details.
//! - [`UsersError`]: bootstrap errors (reading seed files, parsing JSON).
//!
//! # Example
//!
//! ```
//! use users_store::error::{ErrorKind, QueryError};
//!
//! let err = QueryError::AgeFromGreaterThanTo { from: 38, to: 21 };
//! assert_eq!(err.kind(), ErrorKind::InvalidQuery);
//! assert_eq!(
//!     err.to_string(),
//!     "the starting age must be lower or equal to the ending age"
//! );
//! ```

use strum::{AsRefStr, Display};
use thiserror::Error;

/// Result alias for store and transaction operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result alias for query engine operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result alias for bootstrap operations.
pub type UsersResult<T> = Result<T, UsersError>;

/// Failures of the indexed store itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The unique index already holds this key.
    #[error("duplicate key {key:?} in unique index of table {table}")]
    DuplicateKey { table: &'static str, key: String },

    /// The record cannot be stored, e.g. a key field is blank.
    #[error("invalid record for table {table}: {reason}")]
    InvalidRecord {
        table: &'static str,
        reason: &'static str,
    },

    /// The secondary index points at a record the primary index does not hold.
    #[error("index of table {table} references missing record {key:?}")]
    IndexCorrupted { table: &'static str, key: String },

    /// A thread panicked while holding one of the store's locks.
    #[error("lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// Another write transaction is open.
    #[error("another write transaction is in progress")]
    WriterBusy,

    /// A write was attempted through a transaction without write access.
    #[error("transaction is read-only")]
    NotWritable,
}

/// Typed outcomes of the query engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("email already exists")]
    EmailAlreadyExists,

    #[error("email not found")]
    EmailNotFound,

    #[error("the starting age must be lower or equal to the ending age")]
    AgeFromGreaterThanTo { from: i32, to: i32 },

    #[error("name query cannot be empty")]
    EmptyNameQuery,

    #[error("email cannot be empty")]
    EmptyEmail,

    /// Unexpected failure of the underlying store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Conflict,
    NotFound,
    InvalidQuery,
    Internal,
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::EmailAlreadyExists => ErrorKind::Conflict,
            QueryError::EmailNotFound => ErrorKind::NotFound,
            QueryError::AgeFromGreaterThanTo { .. }
            | QueryError::EmptyNameQuery
            | QueryError::EmptyEmail => ErrorKind::InvalidQuery,
            QueryError::Store(_) => ErrorKind::Internal,
        }
    }

    /// True for every variant a caller is expected to handle.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

/// Opaque error returned by the service facade.
///
/// The message names the failed operation only; the underlying cause is
/// logged on the server side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors raised while bootstrapping a server.
#[derive(Error, Debug)]
pub enum UsersError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not parse sample users: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
