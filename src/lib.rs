//! # Users Store
//!
//! An in-memory, indexed, transactional store for user records, and the
//! service operations built on it.
//!
//! ## Features
//!
//! - **Typed Store**: `MemStore<M>` is generic over its record type, with a
//!   unique primary index and an ordered secondary index
//! - **Transactions**: snapshot-isolated readers, a single writer, atomic
//!   commit and rollback-on-drop
//! - **Queries**: create, list, age range search with early termination,
//!   name substring search and lookup by email
//! - **Service Facade**: `UserServer` turns query outcomes into status
//!   envelopes for a transport layer
//!
//! ## Quick Start
//!
//! ```rust
//! use users_store::prelude::*;
//!
//! let server = UserServer::from_config(ServerConfig::builder().load_samples(false).build())?;
//!
//! let created = server.create(User::builder().email("eza@pod.ru").age(21).build())?;
//! assert!(created.status.is_success());
//! assert!(!created.user.id.is_empty());
//!
//! let found = server.search_age(Some(AgeRange::new(18, 30)))?;
//! assert_eq!(found.users.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod databases;
pub mod error;
pub mod model;
pub mod prelude;
pub mod query;
pub mod sample;
pub mod server;
pub mod traits;
pub mod transaction;
pub mod utils;

pub use error::{QueryError, QueryResult, StoreError, StoreResult};
