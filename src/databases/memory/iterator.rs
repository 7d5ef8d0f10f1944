use im::{OrdMap, OrdSet, ordmap, ordset};

use crate::error::{StoreError, StoreResult};
use crate::traits::model::IndexedModel;

/// Iterator over every model of a table, in primary key order.
pub struct ScanIter<'a, M>
where
    M: IndexedModel,
{
    pub(crate) inner: ordmap::Iter<'a, M::PrimaryKey, M>,
}

impl<'a, M> Iterator for ScanIter<'a, M>
where
    M: IndexedModel,
{
    type Item = &'a M;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, model)| model)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Ascending iterator over the secondary index, starting at a lower bound.
///
/// Models sharing a secondary key come out in primary key order. The
/// iterator resolves one index entry per call to `next`, so a caller that
/// stops early never touches the rest of the table.
pub struct RangeIter<'a, M>
where
    M: IndexedModel,
{
    pub(crate) primary: &'a OrdMap<M::PrimaryKey, M>,
    pub(crate) groups: ordmap::Iter<'a, M::SecondaryKey, OrdSet<M::PrimaryKey>>,
    pub(crate) current: Option<ordset::Iter<'a, M::PrimaryKey>>,
}

impl<'a, M> Iterator for RangeIter<'a, M>
where
    M: IndexedModel,
{
    type Item = StoreResult<&'a M>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(keys) = self.current.as_mut() {
                if let Some(key) = keys.next() {
                    return Some(self.primary.get(key).ok_or_else(|| {
                        StoreError::IndexCorrupted {
                            table: M::TABLE,
                            key: format!("{key:?}"),
                        }
                    }));
                }
            }
            let (_, keys) = self.groups.next()?;
            self.current = Some(keys.iter());
        }
    }
}
