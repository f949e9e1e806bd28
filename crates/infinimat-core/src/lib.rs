#![deny(warnings)]
#![allow(missing_docs)]
//! Core functionality for infinimat, an N-dimensional infinite sparse matrix.
//!
//! This crate provides an insertion-ordered keyed cell store, a chained index
//! collector that defers one read or write until all indices are known, and
//! the matrix type that layers default-value elision over the store.

use tracing::{debug, instrument};

/// Chained index collection and the read/write capability it dispatches to
pub mod collector;
/// Error types for store, collector and matrix operations
pub mod error;
/// Typed index tuples and stored cell records
pub mod key;
/// Matrix with default-value elision
pub mod matrix;
/// Keyed cell storage with insertion-order iteration
pub mod store;

pub use collector::{CellAccess, IndexCollector};
pub use error::{ErrorContext, ErrorSeverity, MatrixError, MatrixResult};
pub use key::{Cell, Key};
pub use matrix::{Matrix, Matrix2D, Matrix3D};
pub use store::SparseStore;

/// Initialize the core library
#[instrument]
pub fn init() -> MatrixResult<()> {
    debug!(version = env!("CARGO_PKG_VERSION"), "Initializing infinimat core");
    Ok(())
}
