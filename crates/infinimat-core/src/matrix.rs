//! Infinite sparse matrix with default elision
//!
//! A [`Matrix`] addresses an unbounded N-dimensional index space. Every cell
//! that was never written (or was last written with the default value) reads
//! as the default; only non-default cells are stored.

use crate::collector::{CellAccess, IndexCollector};
use crate::error::MatrixResult;
use crate::key::Key;
use crate::store::{self, SparseStore};
use std::fmt;
use tracing::debug;

/// N-dimensional sparse matrix over values of type `T`.
///
/// # Usage Example
/// ```rust
/// use infinimat_core::Matrix;
///
/// let mut matrix = Matrix::<i32, 2>::with_default(-1);
/// assert_eq!(matrix.entry(100).at(100)?.value()?, -1);
///
/// matrix.entry(100).at(100)?.set(314)?;
/// assert_eq!(matrix.len(), 1);
///
/// for ([x, y], value) in &matrix {
///     println!("{x} {y} {value}");
/// }
/// # Ok::<(), infinimat_core::MatrixError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Matrix<T, const N: usize> {
    store: SparseStore<T, N>,
    default: T,
}

/// Two-dimensional matrix
pub type Matrix2D<T> = Matrix<T, 2>;
/// Three-dimensional matrix
pub type Matrix3D<T> = Matrix<T, 3>;

impl<T, const N: usize> Matrix<T, N>
where
    T: Clone + PartialEq + fmt::Debug,
{
    /// Creates an empty matrix whose unwritten cells read as `default`
    pub fn with_default(default: T) -> Self {
        const { assert!(N > 0, "a matrix needs at least one dimension") };
        Self { store: SparseStore::new(), default }
    }

    /// Start a chained access at the first dimension
    pub fn entry(&mut self, index: usize) -> IndexCollector<'_, T> {
        IndexCollector::new(self, index)
    }

    /// Write `value` at `indices`, eliding default values.
    ///
    /// | value      | stored | action              |
    /// |------------|--------|---------------------|
    /// | default    | yes    | erase               |
    /// | default    | no     | nothing             |
    /// | other      | no     | insert              |
    /// | other      | yes    | erase, then insert  |
    pub fn write(&mut self, indices: &[usize], value: T) -> MatrixResult<()> {
        let key = self.store.make_key(indices)?;
        self.apply(key, value);
        Ok(())
    }

    /// Read the value at `indices`, or the default if nothing is stored there
    pub fn read(&self, indices: &[usize]) -> MatrixResult<T> {
        let key = self.store.make_key(indices)?;
        Ok(self.get(key.into_array()))
    }

    /// Array-typed read; the arity is checked at compile time
    pub fn get(&self, indices: [usize; N]) -> T {
        self.store.find(&Key::new(indices)).cloned().unwrap_or_else(|| self.default.clone())
    }

    /// Array-typed write; returns the previously stored non-default value
    pub fn set(&mut self, indices: [usize; N], value: T) -> Option<T> {
        self.apply(Key::new(indices), value)
    }

    fn apply(&mut self, key: Key<N>, value: T) -> Option<T> {
        let is_default = value == self.default;
        let exists = self.store.contains(&key);

        match (is_default, exists) {
            (true, true) => {
                debug!(key = %key, "Default written over stored cell, erasing");
                // `exists` guarantees the key is present, so erase cannot miss
                match self.store.erase(&key) {
                    Ok(previous) => Some(previous),
                    Err(err) => {
                        debug!(key = %key, error = %err, "Stored cell vanished before erase");
                        None
                    }
                }
            }
            (true, false) => None,
            (false, false) => {
                debug!(key = %key, value = ?value, "Storing new cell");
                self.store.insert(key, value)
            }
            (false, true) => {
                debug!(key = %key, value = ?value, "Replacing stored cell");
                // Store insertion drops the old association first, moving the key to the end
                self.store.insert(key, value)
            }
        }
    }

    /// Value every unwritten cell reads as
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Number of dimensions
    pub const fn dimensions(&self) -> usize {
        N
    }

    /// Number of stored (non-default) cells
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Reset every cell to the default
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Iterate `(indices, value)` for every non-default cell in insertion order
    pub fn iter(&self) -> Iter<'_, T, N> {
        Iter { inner: self.store.iter() }
    }

    /// Underlying cell store
    pub fn store(&self) -> &SparseStore<T, N> {
        &self.store
    }
}

impl<T, const N: usize> Matrix<T, N>
where
    T: Clone + PartialEq + fmt::Debug + Default,
{
    /// Creates an empty matrix whose default is `T::default()`
    pub fn new() -> Self {
        Self::with_default(T::default())
    }
}

impl<T, const N: usize> Default for Matrix<T, N>
where
    T: Clone + PartialEq + fmt::Debug + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> CellAccess<T> for Matrix<T, N>
where
    T: Clone + PartialEq + fmt::Debug,
{
    fn arity(&self) -> usize {
        N
    }

    fn read_at(&self, indices: &[usize]) -> MatrixResult<T> {
        self.read(indices)
    }

    fn write_at(&mut self, indices: &[usize], value: T) -> MatrixResult<()> {
        self.write(indices, value)
    }
}

/// Insertion-order iterator over the non-default cells of a [`Matrix`]
#[derive(Debug, Clone)]
pub struct Iter<'a, T, const N: usize> {
    inner: store::Iter<'a, T, N>,
}

impl<'a, T, const N: usize> Iterator for Iter<'a, T, N> {
    type Item = ([usize; N], &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key.into_array(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, const N: usize> ExactSizeIterator for Iter<'_, T, N> {}

impl<'a, T, const N: usize> IntoIterator for &'a Matrix<T, N>
where
    T: Clone + PartialEq + fmt::Debug,
{
    type Item = ([usize; N], &'a T);
    type IntoIter = Iter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
