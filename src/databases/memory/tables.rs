use std::borrow::Borrow;
use std::ops::Bound;

use im::{OrdMap, OrdSet};

use super::iterator::{RangeIter, ScanIter};
use crate::error::{StoreError, StoreResult};
use crate::traits::model::IndexedModel;

/// The indexes of one table.
///
/// - `primary` maps the unique key to the model and owns every record.
/// - `secondary` maps each secondary key to the set of primary keys
///   holding it, which gives ascending range scans with a stable
///   primary key tiebreak.
///
/// Both indexes are persistent maps: a clone shares every node with the
/// original and an insert copies only the path to the changed leaf. A
/// write transaction can therefore branch off the committed tables in
/// constant time.
///
/// Both indexes are only ever modified together by [`Tables::insert`].
pub struct Tables<M>
where
    M: IndexedModel,
{
    primary: OrdMap<M::PrimaryKey, M>,
    secondary: OrdMap<M::SecondaryKey, OrdSet<M::PrimaryKey>>,
}

impl<M> Tables<M>
where
    M: IndexedModel,
{
    pub fn new() -> Self {
        Self {
            primary: OrdMap::new(),
            secondary: OrdMap::new(),
        }
    }

    /// Insert a model into both indexes.
    ///
    /// Fails with [`StoreError::InvalidRecord`] if the model does not pass
    /// [`IndexedModel::validate`], and with [`StoreError::DuplicateKey`] if
    /// the primary key is already present. The tables are left untouched
    /// in both cases.
    pub fn insert(&mut self, model: M) -> StoreResult<()> {
        model.validate()?;

        let key = model.primary_key();
        if self.primary.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                table: M::TABLE,
                key: format!("{key:?}"),
            });
        }

        let secondary_key = model.secondary_key();
        let mut keys = self
            .secondary
            .get(&secondary_key)
            .cloned()
            .unwrap_or_default();
        keys.insert(key.clone());
        self.secondary.insert(secondary_key, keys);
        self.primary.insert(key, model);
        Ok(())
    }

    /// Look a model up by its primary key.
    pub fn get<Q>(&self, key: &Q) -> Option<&M>
    where
        M::PrimaryKey: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.primary.get(key)
    }

    /// Every model, in primary key order.
    pub fn iter(&self) -> ScanIter<'_, M> {
        ScanIter {
            inner: self.primary.iter(),
        }
    }

    /// Models whose secondary key is `>= from`, ascending.
    ///
    /// There is no upper bound: callers stop consuming once they are past
    /// the window they want.
    pub fn range_from(&self, from: M::SecondaryKey) -> RangeIter<'_, M> {
        RangeIter {
            primary: &self.primary,
            groups: self
                .secondary
                .range((Bound::Included(from), Bound::Unbounded)),
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Number of entries in the secondary index.
    #[cfg(test)]
    pub(crate) fn secondary_len(&self) -> usize {
        self.secondary.values().map(OrdSet::len).sum()
    }
}

impl<M> Default for Tables<M>
where
    M: IndexedModel,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Tables<M>
where
    M: IndexedModel,
{
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
        }
    }
}
