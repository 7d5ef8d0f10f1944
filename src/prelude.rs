//! Prelude module for convenient imports.
//!
//! ```rust
//! use users_store::prelude::*;
//! ```

pub use crate::config::{ServerConfig, WriterPolicy};
pub use crate::databases::memory::MemStore;
pub use crate::error::{
    ErrorKind, QueryError, QueryResult, ServerError, StoreError, StoreResult, UsersError,
    UsersResult,
};
pub use crate::model::{AgeRange, User};
pub use crate::query::UserSvc;
pub use crate::sample::{load_samples, sample_users};
pub use crate::server::{
    CreateResponse, GetByEmailResponse, SearchResponse, Status, StatusCode, UserServer,
};
pub use crate::traits::{IndexedModel, UserService};
pub use crate::transaction::{ReadOnly, ReadWrite, TxnGuard, TxnKind, TxnMode};
