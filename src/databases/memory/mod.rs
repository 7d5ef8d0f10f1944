//! In-memory backend.
//!
//! [`Tables`] holds the records of one model type with a unique primary
//! index and an ordered secondary index. [`MemStore`] wraps the committed
//! tables and hands out [`TxnGuard`](crate::transaction::TxnGuard)s.

pub mod iterator;
pub mod store;
pub mod tables;

pub use iterator::{RangeIter, ScanIter};
pub use store::MemStore;
pub use tables::Tables;
