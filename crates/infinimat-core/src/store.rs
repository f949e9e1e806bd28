//! Keyed cell storage with insertion-order iteration
//!
//! The store pairs an ordered sequence of cells with a hash index from key to
//! sequence position. Every insertion takes the next sequence number, so
//! walking the sequence in ascending order visits cells in the order they
//! were (most recently) inserted, independent of index magnitude.

use crate::error::{MatrixError, MatrixResult, ResultExt};
use crate::key::{Cell, Key};
use ahash::AHashMap;
use std::collections::BTreeMap;
use std::collections::btree_map;
use tracing::trace;

/// Key → value store preserving one association per key.
///
/// # Architecture
/// - **Sequence**: `BTreeMap<u64, Cell>` keyed by a monotonically increasing
///   insertion counter; ascending traversal is insertion order
/// - **Index**: `AHashMap<Key, u64>` mapping each live key to its sequence slot
///
/// The two maps are kept in bijection. The store is default-agnostic: it will
/// store any value it is handed, including one a matrix would consider its
/// default.
///
/// # Performance Characteristics
/// - **Insert / erase**: O(log n)
/// - **Find / contains**: O(1) average via the hash index, plus one O(log n)
///   sequence lookup for `find`
/// - **Iteration**: O(1) amortised per step
///
/// # Usage Example
/// ```rust
/// use infinimat_core::store::SparseStore;
///
/// let mut store = SparseStore::<i32, 2>::new();
/// let key = store.make_key(&[100, 100]).unwrap();
///
/// store.insert(key, 314);
/// assert_eq!(store.find(&key), Some(&314));
/// assert!(store.erase(&key).is_ok());
/// assert!(store.erase(&key).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SparseStore<V, const N: usize> {
    cells: BTreeMap<u64, Cell<V, N>>,
    index: AHashMap<Key<N>, u64>,
    next_seq: u64,
}

impl<V, const N: usize> Default for SparseStore<V, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, const N: usize> SparseStore<V, N> {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self { cells: BTreeMap::new(), index: AHashMap::new(), next_seq: 0 }
    }

    /// Creates a store whose key index is pre-allocated for `capacity` cells
    pub fn with_capacity(capacity: usize) -> Self {
        Self { cells: BTreeMap::new(), index: AHashMap::with_capacity(capacity), next_seq: 0 }
    }

    /// Build a typed key from a raw index sequence.
    ///
    /// Fails with [`MatrixError::InvalidArity`] unless exactly `N` indices are given.
    pub fn make_key(&self, indices: &[usize]) -> MatrixResult<Key<N>> {
        Key::from_slice(indices).with_operation_context("make_key")
    }

    /// Build a stored cell record from a key and value
    pub fn make_cell(&self, key: Key<N>, value: V) -> Cell<V, N> {
        key.with_value(value)
    }

    pub fn contains(&self, key: &Key<N>) -> bool {
        self.index.contains_key(key)
    }

    /// Look up the value stored under `key`; `None` means no association
    pub fn find(&self, key: &Key<N>) -> Option<&V> {
        self.index.get(key).and_then(|seq| self.cells.get(seq)).map(|cell| &cell.value)
    }

    /// Associate `value` with `key`.
    ///
    /// An existing association is removed first, so the key moves to the end
    /// of iteration order. Returns the replaced value, if any.
    pub fn insert(&mut self, key: Key<N>, value: V) -> Option<V> {
        let previous = self
            .index
            .remove(&key)
            .and_then(|seq| self.cells.remove(&seq))
            .map(|cell| cell.value);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.cells.insert(seq, key.with_value(value));
        self.index.insert(key, seq);

        trace!(key = %key, seq, replaced = previous.is_some(), "Inserted cell");
        previous
    }

    /// Remove the association for `key` and return its value.
    ///
    /// Strict: fails with [`MatrixError::NotFound`] if the key is absent.
    pub fn erase(&mut self, key: &Key<N>) -> MatrixResult<V> {
        let seq = self
            .index
            .remove(key)
            .ok_or_else(|| MatrixError::not_found(key.as_slice()))
            .with_operation_context("erase")?;

        trace!(key = %key, seq, "Erased cell");
        self.cells
            .remove(&seq)
            .map(|cell| cell.value)
            .ok_or_else(|| MatrixError::not_found(key.as_slice()))
            .with_operation_context("erase")
    }

    /// Number of live associations
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.index.clear();
    }

    /// Iterate `(key, value)` pairs in insertion order
    pub fn iter(&self) -> Iter<'_, V, N> {
        Iter { inner: self.cells.values() }
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Key<N>> + '_ {
        self.cells.values().map(|cell| &cell.key)
    }
}

/// Insertion-order iterator over a [`SparseStore`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V, const N: usize> {
    inner: btree_map::Values<'a, u64, Cell<V, N>>,
}

impl<'a, V, const N: usize> Iterator for Iter<'a, V, N> {
    type Item = (&'a Key<N>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|cell| (&cell.key, &cell.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V, const N: usize> DoubleEndedIterator for Iter<'_, V, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|cell| (&cell.key, &cell.value))
    }
}

impl<V, const N: usize> ExactSizeIterator for Iter<'_, V, N> {}

impl<'a, V, const N: usize> IntoIterator for &'a SparseStore<V, N> {
    type Item = (&'a Key<N>, &'a V);
    type IntoIter = Iter<'a, V, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        let store = SparseStore::<i32, 2>::new();
        let key = store.make_key(&[100, 100]).unwrap();

        assert_eq!(key, Key::new([100, 100]));
    }

    #[test]
    fn test_make_key_invalid_arity() {
        let store = SparseStore::<i32, 2>::new();
        let err = store.make_key(&[100, 100, 100]).unwrap_err();

        assert!(matches!(err, MatrixError::InvalidArity { expected: 2, actual: 3, .. }));
        assert_eq!(err.context().operation.as_deref(), Some("make_key"));
    }

    #[test]
    fn test_make_cell() {
        let store = SparseStore::<i32, 2>::new();
        let key = store.make_key(&[100, 100]).unwrap();
        let cell = store.make_cell(key, 314);

        assert_eq!(cell.into_tuple(), ([100, 100], 314));
    }

    #[test]
    fn test_insert_and_find() {
        let mut store = SparseStore::<i32, 2>::new();
        let key = store.make_key(&[100, 100]).unwrap();

        assert_eq!(store.insert(key, 314), None);
        assert!(store.contains(&key));
        assert_eq!(store.find(&key), Some(&314));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_contains() {
        let mut store = SparseStore::<i32, 2>::new();
        let key_1 = store.make_key(&[100, 100]).unwrap();
        let key_2 = store.make_key(&[120, 400]).unwrap();
        store.insert(key_1, 314);

        assert!(store.contains(&key_1));
        assert!(!store.contains(&key_2));
        assert_eq!(store.find(&key_2), None);
    }

    #[test]
    fn test_erase() {
        let mut store = SparseStore::<i32, 2>::new();
        let key = store.make_key(&[100, 100]).unwrap();
        store.insert(key, 314);

        assert_eq!(store.erase(&key), Ok(314));
        assert!(!store.contains(&key));
        assert_eq!(store.find(&key), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_erase_missing_key_is_strict() {
        let mut store = SparseStore::<i32, 2>::new();
        let key = Key::new([1, 2]);

        let err = store.erase(&key).unwrap_err();
        assert!(matches!(err, MatrixError::NotFound { .. }));
        assert_eq!(err.context().key, Some(vec![1, 2]));
        assert_eq!(err.context().operation.as_deref(), Some("erase"));
    }

    #[test]
    fn test_find_distinguishes_absent_from_zero() {
        let mut store = SparseStore::<i32, 1>::new();
        store.insert(Key::new([0]), 0);

        assert_eq!(store.find(&Key::new([0])), Some(&0));
        assert_eq!(store.find(&Key::new([1])), None);
    }

    #[test]
    fn test_reinsert_moves_key_to_end() {
        let mut store = SparseStore::<i32, 2>::new();
        store.insert(Key::new([1, 1]), 1);
        store.insert(Key::new([2, 2]), 2);
        store.insert(Key::new([3, 3]), 3);

        assert_eq!(store.insert(Key::new([1, 1]), 10), Some(1));
        assert_eq!(store.len(), 3);

        let order: Vec<_> = store.iter().map(|(key, value)| (key.into_array(), *value)).collect();
        assert_eq!(order, vec![([2, 2], 2), ([3, 3], 3), ([1, 1], 10)]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut store = SparseStore::<&str, 1>::new();
        store.insert(Key::new([9]), "a");
        store.insert(Key::new([0]), "b");

        let first: Vec<_> = store.iter().map(|(_, value)| *value).collect();
        let second: Vec<_> = (&store).into_iter().map(|(_, value)| *value).collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
        assert_eq!(store.iter().len(), 2);
        assert_eq!(store.iter().next_back().map(|(key, _)| *key), Some(Key::new([0])));
    }

    #[test]
    fn test_clear() {
        let mut store = SparseStore::<i32, 2>::with_capacity(8);
        store.insert(Key::new([1, 1]), 1);
        store.clear();

        assert!(store.is_empty());
        assert!(!store.contains(&Key::new([1, 1])));
        assert_eq!(store.keys().count(), 0);
    }
}
