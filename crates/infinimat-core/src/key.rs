//! Typed index tuples and stored cell records

use crate::error::{MatrixError, MatrixResult};
use std::fmt;

/// An immutable N-tuple of indices identifying one cell.
///
/// Ordering is lexicographic over the indices in dimension order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key<const N: usize>([usize; N]);

impl<const N: usize> Key<N> {
    /// Build a key from a fixed-size index array
    pub const fn new(indices: [usize; N]) -> Self {
        Self(indices)
    }

    /// Build a key from a raw index sequence, rejecting any length other than `N`
    pub fn from_slice(indices: &[usize]) -> MatrixResult<Self> {
        <[usize; N]>::try_from(indices)
            .map(Self)
            .map_err(|_| MatrixError::invalid_arity(N, indices.len()))
    }

    /// Number of indices in the key
    pub const fn arity(&self) -> usize {
        N
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_array(self) -> [usize; N] {
        self.0
    }

    /// Pair this key with a value to form a stored cell
    pub fn with_value<V>(self, value: V) -> Cell<V, N> {
        Cell { key: self, value }
    }
}

impl<const N: usize> From<[usize; N]> for Key<N> {
    fn from(indices: [usize; N]) -> Self {
        Self(indices)
    }
}

impl<const N: usize> TryFrom<&[usize]> for Key<N> {
    type Error = MatrixError;

    fn try_from(indices: &[usize]) -> Result<Self, Self::Error> {
        Self::from_slice(indices)
    }
}

impl<const N: usize> fmt::Display for Key<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (position, index) in self.0.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, ")")
    }
}

/// A stored (key, value) association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell<V, const N: usize> {
    pub key: Key<N>,
    pub value: V,
}

impl<V, const N: usize> Cell<V, N> {
    /// Unpack into the flat `(indices, value)` form used by iteration
    pub fn into_tuple(self) -> ([usize; N], V) {
        (self.key.into_array(), self.value)
    }
}
