//! Chained index collection
//!
//! `matrix.entry(i).at(j)...` builds up an index tuple one subscript at a
//! time. Once all indices are present the collector performs a single read
//! ([`IndexCollector::value`]) or write ([`IndexCollector::set`]) against the
//! live target through the [`CellAccess`] capability. The collector never
//! caches a value, so repeated writes through the same handle always hit the
//! current cell.

use crate::error::{MatrixError, MatrixResult};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace};

/// Read/write capability a collector dispatches to once it is complete
pub trait CellAccess<T> {
    /// Number of indices a complete access requires
    fn arity(&self) -> usize;

    /// Read the value at a complete index tuple
    fn read_at(&self, indices: &[usize]) -> MatrixResult<T>;

    /// Write the value at a complete index tuple
    fn write_at(&mut self, indices: &[usize], value: T) -> MatrixResult<()>;
}

/// Transient handle accumulating indices for one access.
///
/// Holds a borrowed reference to its target, so at most one collector can be
/// in flight for a given matrix at a time.
pub struct IndexCollector<'a, T> {
    target: &'a mut dyn CellAccess<T>,
    indices: Vec<usize>,
}

impl<'a, T> IndexCollector<'a, T> {
    /// Create a collector bound to `target`, seeded with the first index
    pub fn new(target: &'a mut dyn CellAccess<T>, first: usize) -> Self {
        let mut indices = Vec::with_capacity(target.arity().max(1));
        indices.push(first);
        Self { target, indices }
    }

    /// Append the next index.
    ///
    /// Fails with [`MatrixError::TooManyIndices`] once all indices have
    /// already been collected.
    pub fn at(mut self, index: usize) -> MatrixResult<Self> {
        let expected = self.target.arity();
        if self.indices.len() >= expected {
            debug!(expected, index, collected = ?self.indices, "Rejected extra index");
            return Err(MatrixError::too_many_indices(expected, index));
        }
        self.indices.push(index);
        Ok(self)
    }

    /// Indices collected so far
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_complete(&self) -> bool {
        self.indices.len() == self.target.arity()
    }

    /// Read the addressed cell from the live target
    pub fn value(&self) -> MatrixResult<T> {
        self.ensure_complete()?;
        trace!(indices = ?self.indices, "Dispatching read");
        self.target.read_at(&self.indices)
    }

    /// Write the addressed cell, returning a handle over the same indices and
    /// target so the cell can be written or read again.
    pub fn set(self, value: T) -> MatrixResult<Self> {
        self.ensure_complete()?;
        let Self { target, indices } = self;
        trace!(indices = ?indices, "Dispatching write");
        target.write_at(&indices, value)?;
        Ok(Self { target, indices })
    }

    fn ensure_complete(&self) -> MatrixResult<()> {
        let expected = self.target.arity();
        match self.indices.len().cmp(&expected) {
            Ordering::Equal => Ok(()),
            Ordering::Less => Err(MatrixError::too_few_indices(expected, self.indices.len())),
            Ordering::Greater => {
                Err(MatrixError::too_many_indices(expected, self.indices[expected]))
            }
        }
    }
}

impl<T> fmt::Debug for IndexCollector<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexCollector")
            .field("arity", &self.target.arity())
            .field("indices", &self.indices)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Records every dispatched access without any default policy
    #[derive(Default)]
    struct Recorder {
        arity: usize,
        cells: HashMap<Vec<usize>, i32>,
        writes: Vec<(Vec<usize>, i32)>,
    }

    impl CellAccess<i32> for Recorder {
        fn arity(&self) -> usize {
            self.arity
        }

        fn read_at(&self, indices: &[usize]) -> MatrixResult<i32> {
            Ok(self.cells.get(indices).copied().unwrap_or(-1))
        }

        fn write_at(&mut self, indices: &[usize], value: i32) -> MatrixResult<()> {
            self.writes.push((indices.to_vec(), value));
            self.cells.insert(indices.to_vec(), value);
            Ok(())
        }
    }

    #[test]
    fn test_collects_indices_in_order() {
        let mut target = Recorder { arity: 3, ..Default::default() };
        let collector = IndexCollector::new(&mut target, 4).at(5).unwrap().at(6).unwrap();

        assert_eq!(collector.indices(), &[4, 5, 6]);
        assert!(collector.is_complete());
    }

    #[test]
    fn test_rejects_extra_index() {
        let mut target = Recorder { arity: 2, ..Default::default() };
        let err = IndexCollector::new(&mut target, 100).at(100).unwrap().at(7).unwrap_err();

        assert_eq!(err, MatrixError::too_many_indices(2, 7));
    }

    #[test]
    fn test_premature_read_and_write_fail() {
        let mut target = Recorder { arity: 2, ..Default::default() };

        let collector = IndexCollector::new(&mut target, 1);
        assert_eq!(collector.value(), Err(MatrixError::too_few_indices(2, 1)));
        assert_eq!(collector.set(5).unwrap_err(), MatrixError::too_few_indices(2, 1));

        assert!(target.writes.is_empty());
    }

    #[test]
    fn test_chained_writes_reach_live_target() {
        let mut target = Recorder { arity: 2, ..Default::default() };

        let handle = IndexCollector::new(&mut target, 100)
            .at(100)
            .unwrap()
            .set(314)
            .unwrap()
            .set(0)
            .unwrap()
            .set(217)
            .unwrap();
        assert_eq!(handle.value(), Ok(217));

        assert_eq!(
            target.writes,
            vec![(vec![100, 100], 314), (vec![100, 100], 0), (vec![100, 100], 217)]
        );
    }

    #[test]
    fn test_zero_arity_target_rejects_seed_index() {
        let mut target = Recorder { arity: 0, ..Default::default() };
        let collector = IndexCollector::new(&mut target, 3);

        assert_eq!(collector.value(), Err(MatrixError::too_many_indices(0, 3)));
    }

    #[test]
    fn test_debug_output() {
        let mut target = Recorder { arity: 2, ..Default::default() };
        let collector = IndexCollector::new(&mut target, 9);

        assert_eq!(format!("{collector:?}"), "IndexCollector { arity: 2, indices: [9] }");
    }
}
