use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};

use super::tables::Tables;
use crate::error::{StoreError, StoreResult};
use crate::traits::model::IndexedModel;
use crate::transaction::{ReadOnly, ReadWrite, TxnGuard};

/// In-memory, indexed store for one model type.
///
/// The store keeps the last committed [`Tables`] behind a shared pointer.
/// Transactions are the only way in:
///
/// - [`begin_read`](Self::begin_read) pins the committed tables at the
///   time of the call, so a reader never observes a later commit.
/// - [`begin_write`](Self::begin_write) takes the single-writer lock.
///   Inserts go to a private branch of the tables that is published by
///   `commit` and dropped otherwise.
///
/// The store is constructed explicitly and shared by reference (or `Arc`)
/// with whoever needs it.
///
/// # Example
///
/// ```
/// use users_store::databases::memory::MemStore;
/// use users_store::model::User;
///
/// let store = MemStore::<User>::new();
///
/// let mut txn = store.begin_write()?;
/// txn.insert(User::builder().id("ba3d530").email("eza@pod.ru").age(21).build())?;
/// txn.commit()?;
///
/// let txn = store.begin_read()?;
/// assert_eq!(txn.get("eza@pod.ru").map(|u| u.age), Some(21));
/// # Ok::<(), users_store::error::StoreError>(())
/// ```
pub struct MemStore<M>
where
    M: IndexedModel,
{
    committed: RwLock<Arc<Tables<M>>>,
    writer: Mutex<()>,
}

impl<M> MemStore<M>
where
    M: IndexedModel,
{
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            committed: RwLock::new(Arc::new(Tables::new())),
            writer: Mutex::new(()),
        }
    }

    /// Open a read-only transaction on the current committed state.
    ///
    /// Any number of read transactions may be open at once, alongside a
    /// writer.
    pub fn begin_read(&self) -> StoreResult<TxnGuard<'_, M, ReadOnly>> {
        let snapshot = self.snapshot()?;
        log::debug!("begin read transaction on {}", M::TABLE);
        Ok(TxnGuard::read(snapshot))
    }

    /// Open a read-write transaction, blocking until no other write
    /// transaction is open.
    pub fn begin_write(&self) -> StoreResult<TxnGuard<'_, M, ReadWrite>> {
        // The writer lock guards no data, so a panic in an earlier writer
        // leaves nothing to repair.
        let guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_with(guard)
    }

    /// Open a read-write transaction, failing with
    /// [`StoreError::WriterBusy`] if another one is open.
    pub fn try_begin_write(&self) -> StoreResult<TxnGuard<'_, M, ReadWrite>> {
        let guard = match self.writer.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(StoreError::WriterBusy),
        };
        self.write_with(guard)
    }

    fn write_with<'db>(
        &'db self,
        guard: MutexGuard<'db, ()>,
    ) -> StoreResult<TxnGuard<'db, M, ReadWrite>> {
        let base = self.snapshot()?;
        log::debug!("begin write transaction on {}", M::TABLE);
        Ok(TxnGuard::write(self, base, guard))
    }

    /// Number of committed records
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.snapshot()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.snapshot()?.is_empty())
    }

    pub(crate) fn snapshot(&self) -> StoreResult<Arc<Tables<M>>> {
        let committed = self
            .committed
            .read()
            .map_err(|_| StoreError::LockPoisoned("committed tables"))?;
        Ok(Arc::clone(&*committed))
    }

    /// Replace the committed tables. Only called by a write transaction
    /// that holds the writer lock.
    pub(crate) fn publish(&self, tables: Tables<M>) -> StoreResult<()> {
        let mut committed = self
            .committed
            .write()
            .map_err(|_| StoreError::LockPoisoned("committed tables"))?;
        *committed = Arc::new(tables);
        Ok(())
    }
}

impl<M> Default for MemStore<M>
where
    M: IndexedModel,
{
    fn default() -> Self {
        Self::new()
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
    fn new_store_is_empty() {
        let store = MemStore::<User>::new();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn commit_publishes_inserts() {
        let store = MemStore::<User>::new();
        let mut txn = store.begin_write().unwrap();
        txn.insert(user("eza@pod.ru", 21)).unwrap();
        txn.insert(user("le@rec.gb", 42)).unwrap();
        txn.commit().unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn second_writer_fails_fast_while_first_is_open() {
        let store = MemStore::<User>::new();
        let txn = store.begin_write().unwrap();
        assert!(matches!(store.try_begin_write(), Err(StoreError::WriterBusy)));
        drop(txn);
        assert!(store.try_begin_write().is_ok());
    }

    #[test]
    fn readers_do_not_block_writers() {
        let store = MemStore::<User>::new();
        let _reader = store.begin_read().unwrap();
        let _other_reader = store.begin_read().unwrap();
        assert!(store.try_begin_write().is_ok());
    }

    #[test]
    fn panicking_writer_leaves_store_usable() {
        let store = MemStore::<User>::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut txn = store.begin_write().unwrap();
            txn.insert(user("eza@pod.ru", 21)).unwrap();
            panic!("writer failed");
        }));
        assert!(result.is_err());
        assert!(store.is_empty().unwrap());
        let mut txn = store.try_begin_write().unwrap();
        txn.insert(user("eza@pod.ru", 21)).unwrap();
        txn.commit().unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }
}
