//! Transaction API with type-state pattern for compile-time safety.
//!
//! `TxnGuard<Mode>` uses phantom types to track the transaction mode at
//! compile time:
//! - `TxnGuard<ReadOnly>`: any number may be open at once; each one reads
//!   the committed state as of the moment it was opened
//! - `TxnGuard<ReadWrite>`: at most one at a time; inserts become visible
//!   to other transactions only on `commit`
//!
//! Both kinds are scoped: a guard that is dropped without `commit` (early
//! return, `?`, panic) is rolled back, and the writer lock is released.
//!
//! # Examples
//!
//! ## Write Transaction
//! ```
//! use users_store::databases::memory::MemStore;
//! use users_store::model::User;
//!
//! let store = MemStore::<User>::new();
//! let mut txn = store.begin_write()?;
//! txn.insert(User::builder().id("c7dca0a").email("le@rec.gb").age(42).build())?;
//! txn.commit()?; // Or auto-rollback on drop
//! # Ok::<(), users_store::error::StoreError>(())
//! ```
//!
//! ## Read Transaction
//! ```
//! # use users_store::databases::memory::MemStore;
//! # use users_store::model::User;
//! # let store = MemStore::<User>::new();
//! let txn = store.begin_read()?;
//! let adults = txn
//!     .range_from(18)
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert!(adults.is_empty());
//! // Auto-closes on drop
//! # Ok::<(), users_store::error::StoreError>(())
//! ```
//!
//! ## Type Safety
//!
//! ```compile_fail
//! # use users_store::databases::memory::MemStore;
//! # use users_store::model::User;
//! # let store = MemStore::<User>::new();
//! let mut txn = store.begin_read().unwrap();
//! txn.insert(User::default()); // insert() is not available on ReadOnly
//! ```

use std::borrow::Borrow;
use std::marker::PhantomData;
use std::sync::{Arc, MutexGuard};

use strum::{AsRefStr, Display};

use crate::databases::memory::{MemStore, RangeIter, ScanIter, Tables};
use crate::error::{StoreError, StoreResult};
use crate::traits::model::IndexedModel;

/// Zero-cost marker type for read-only transactions.
pub struct ReadOnly;

/// Zero-cost marker type for read-write transactions.
pub struct ReadWrite;

/// Runtime view of a transaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum TxnKind {
    Read,
    Write,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ReadOnly {}
    impl Sealed for super::ReadWrite {}
}

/// Implemented by the two transaction mode markers only.
pub trait TxnMode: sealed::Sealed {
    const KIND: TxnKind;
}

impl TxnMode for ReadOnly {
    const KIND: TxnKind = TxnKind::Read;
}

impl TxnMode for ReadWrite {
    const KIND: TxnKind = TxnKind::Write;
}

/// Transaction guard with type-state pattern.
///
/// The `Mode` parameter determines available operations at compile time:
/// - `TxnGuard<ReadOnly>`: lookups and scans
/// - `TxnGuard<ReadWrite>`: lookups, scans and inserts; reads observe the
///   transaction's own inserts
pub struct TxnGuard<'db, M, Mode>
where
    M: IndexedModel,
{
    backend: TxnBackend<'db, M>,
    _mode: PhantomData<Mode>,
}

impl<M, Mode> std::fmt::Debug for TxnGuard<'_, M, Mode>
where
    M: IndexedModel,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.backend {
            TxnBackend::Read(_) => TxnKind::Read,
            TxnBackend::Write(_) => TxnKind::Write,
        };
        f.debug_struct("TxnGuard")
            .field("kind", &kind)
            .finish_non_exhaustive()
    }
}

enum TxnBackend<'db, M>
where
    M: IndexedModel,
{
    Read(ReadBackend<M>),
    Write(WriteBackend<'db, M>),
}

struct ReadBackend<M>
where
    M: IndexedModel,
{
    snapshot: Arc<Tables<M>>,
}

/// Inserts land in `pending`, a branch of `base` made on the first insert.
/// Branching shares structure with `base`, so it does not depend on the
/// size of the store.
struct WriteBackend<'db, M>
where
    M: IndexedModel,
{
    store: &'db MemStore<M>,
    base: Arc<Tables<M>>,
    pending: Option<Tables<M>>,
    inserted: usize,
    _writer: MutexGuard<'db, ()>,
}

impl<M> WriteBackend<'_, M>
where
    M: IndexedModel,
{
    fn tables(&self) -> &Tables<M> {
        self.pending.as_ref().unwrap_or(&*self.base)
    }

    fn tables_mut(&mut self) -> &mut Tables<M> {
        self.pending.get_or_insert_with(|| (*self.base).clone())
    }

    fn commit(&mut self) -> StoreResult<()> {
        if let Some(tables) = self.pending.take() {
            self.store.publish(tables)?;
        }
        log::debug!(
            "committed write transaction on {} ({} inserts)",
            M::TABLE,
            self.inserted
        );
        self.inserted = 0;
        Ok(())
    }
}

// ============================================================================
// TxnGuard Constructors
// ============================================================================

impl<M> TxnGuard<'_, M, ReadOnly>
where
    M: IndexedModel,
{
    pub(crate) fn read(snapshot: Arc<Tables<M>>) -> Self {
        Self {
            backend: TxnBackend::Read(ReadBackend { snapshot }),
            _mode: PhantomData,
        }
    }
}

impl<'db, M> TxnGuard<'db, M, ReadWrite>
where
    M: IndexedModel,
{
    pub(crate) fn write(
        store: &'db MemStore<M>,
        base: Arc<Tables<M>>,
        writer: MutexGuard<'db, ()>,
    ) -> Self {
        Self {
            backend: TxnBackend::Write(WriteBackend {
                store,
                base,
                pending: None,
                inserted: 0,
                _writer: writer,
            }),
            _mode: PhantomData,
        }
    }
}

// ============================================================================
// TxnGuard Implementation - Operations available on ALL modes
// ============================================================================

impl<M, Mode> TxnGuard<'_, M, Mode>
where
    M: IndexedModel,
    Mode: TxnMode,
{
    fn tables(&self) -> &Tables<M> {
        match &self.backend {
            TxnBackend::Read(backend) => backend.snapshot.as_ref(),
            TxnBackend::Write(backend) => backend.tables(),
        }
    }

    pub fn mode(&self) -> TxnKind {
        Mode::KIND
    }

    /// Get a model by its primary key.
    pub fn get<Q>(&self, key: &Q) -> Option<&M>
    where
        M::PrimaryKey: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tables().get(key)
    }

    /// Iterate over every model in primary key order.
    pub fn iter(&self) -> ScanIter<'_, M> {
        self.tables().iter()
    }

    /// Iterate in ascending secondary key order, starting at `from`.
    ///
    /// The iterator is lazy and unbounded above: stop consuming it once
    /// past the end of the wanted window.
    pub fn range_from(&self, from: M::SecondaryKey) -> RangeIter<'_, M> {
        self.tables().range_from(from)
    }

    pub fn len(&self) -> usize {
        self.tables().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables().is_empty()
    }

    /// Finish the transaction.
    ///
    /// For a write transaction this atomically publishes every insert made
    /// through it. For a read transaction it only releases the snapshot.
    pub fn commit(mut self) -> StoreResult<()> {
        match &mut self.backend {
            TxnBackend::Read(_) => Ok(()),
            TxnBackend::Write(backend) => backend.commit(),
        }
    }

    /// Discard the transaction and everything written through it.
    ///
    /// This is what dropping the guard does; calling it just makes the
    /// intent explicit.
    pub fn rollback(self) {}
}

// ============================================================================
// TxnGuard Implementation - Operations ONLY on ReadWrite mode
// ============================================================================

impl<M> TxnGuard<'_, M, ReadWrite>
where
    M: IndexedModel,
{
    /// Insert a model into every index.
    ///
    /// Fails with [`StoreError::InvalidRecord`] if the model does not pass
    /// [`IndexedModel::validate`], and with [`StoreError::DuplicateKey`] if
    /// a model with the same primary key is already visible to this
    /// transaction.
    pub fn insert(&mut self, model: M) -> StoreResult<()> {
        match &mut self.backend {
            TxnBackend::Write(backend) => {
                model.validate()?;
                if backend.tables().get(&model.primary_key()).is_some() {
                    log::warn!(
                        "rejected duplicate key {:?} in {}",
                        model.primary_key(),
                        M::TABLE
                    );
                    return Err(StoreError::DuplicateKey {
                        table: M::TABLE,
                        key: format!("{:?}", model.primary_key()),
                    });
                }
                backend.tables_mut().insert(model)?;
                backend.inserted += 1;
                Ok(())
            }
            TxnBackend::Read(_) => Err(StoreError::NotWritable),
        }
    }
}

impl<M, Mode> Drop for TxnGuard<'_, M, Mode>
where
    M: IndexedModel,
{
    fn drop(&mut self) {
        if let TxnBackend::Write(backend) = &self.backend {
            if backend.inserted > 0 {
                log::debug!(
                    "rolled back write transaction on {} ({} inserts discarded)",
                    M::TABLE,
                    backend.inserted
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    fn user(email: &str, age: i32) -> User {
        User::builder().id("x").email(email).age(age).build()
    }

    #[test]
    fn write_transaction_reads_its_own_inserts() {
        let store = MemStore::<User>::new();
        let mut txn = store.begin_write().unwrap();
        txn.insert(user("eza@pod.ru", 21)).unwrap();
        assert_eq!(txn.len(), 1);
        assert!(txn.get("eza@pod.ru").is_some());
        assert_eq!(txn.range_from(0).count(), 1);
    }

    #[test]
    fn dropped_write_transaction_is_rolled_back() {
        let store = MemStore::<User>::new();
        {
            let mut txn = store.begin_write().unwrap();
            txn.insert(user("eza@pod.ru", 21)).unwrap();
        }
        assert!(store.begin_read().unwrap().is_empty());
    }

    #[test]
    fn explicit_rollback_discards_inserts() {
        let store = MemStore::<User>::new();
        let mut txn = store.begin_write().unwrap();
        txn.insert(user("eza@pod.ru", 21)).unwrap();
        txn.rollback();
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn reader_keeps_its_snapshot_across_commits() {
        let store = MemStore::<User>::new();
        let before = store.begin_read().unwrap();

        let mut txn = store.begin_write().unwrap();
        txn.insert(user("eza@pod.ru", 21)).unwrap();
        txn.commit().unwrap();

        let after = store.begin_read().unwrap();
        assert!(before.is_empty());
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn duplicate_insert_keeps_transaction_usable() {
        let store = MemStore::<User>::new();
        let mut txn = store.begin_write().unwrap();
        txn.insert(user("eza@pod.ru", 21)).unwrap();
        assert!(matches!(
            txn.insert(user("eza@pod.ru", 30)),
            Err(StoreError::DuplicateKey { .. })
        ));
        txn.insert(user("le@rec.gb", 42)).unwrap();
        txn.commit().unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn commit_on_read_transaction_is_a_release() {
        let store = MemStore::<User>::new();
        let txn = store.begin_read().unwrap();
        assert_eq!(txn.mode(), TxnKind::Read);
        txn.commit().unwrap();
    }

    #[test]
    fn record_without_keys_never_reaches_readers() {
        let store = MemStore::<User>::new();
        let mut txn = store.begin_write().unwrap();
        assert!(matches!(
            txn.insert(User::default()),
            Err(StoreError::InvalidRecord { table: "user", .. })
        ));
        assert!(matches!(
            txn.insert(User::builder().age(5).build()),
            Err(StoreError::InvalidRecord { .. })
        ));
        assert!(txn.is_empty());
        txn.commit().unwrap();
        assert!(store.begin_read().unwrap().iter().next().is_none());
    }

    #[test]
    fn write_without_inserts_does_not_copy_tables() {
        let store = MemStore::<User>::new();
        let txn = store.begin_write().unwrap();
        assert_eq!(txn.mode(), TxnKind::Write);
        match &txn.backend {
            TxnBackend::Write(backend) => assert!(backend.pending.is_none()),
            TxnBackend::Read(_) => unreachable!(),
        }
        txn.commit().unwrap();
    }
}
