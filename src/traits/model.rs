use std::fmt::Debug;

use crate::error::StoreResult;

/// Trait for records that can be held by a [`MemStore`](crate::databases::memory::MemStore).
///
/// A model exposes two keys:
/// - a primary key, unique across the table, used for exact lookups and
///   for the deterministic order of full scans
/// - an ordered, non-unique secondary key used for range scans
///
/// The store is generic over its model type from construction, so scans
/// hand back `&M` directly and never need a downcast.
pub trait IndexedModel: Clone + Send + Sync + 'static {
    /// The unique key type for this model
    type PrimaryKey: Ord + Clone + Debug + Send + Sync + 'static;

    /// The ordered secondary key type for this model
    type SecondaryKey: Ord + Copy + Debug + Send + Sync + 'static;

    /// Table name, used in errors and logs
    const TABLE: &'static str;

    /// Extract the primary key from the model instance
    fn primary_key(&self) -> Self::PrimaryKey;

    /// Extract the secondary key from the model instance
    fn secondary_key(&self) -> Self::SecondaryKey;

    /// Check the model before it enters any index.
    ///
    /// Every insert runs this, so a model that fails it is never visible
    /// to a reader.
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}
