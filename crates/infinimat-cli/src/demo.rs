//! Diagonal demonstration
//!
//! Fills the main diagonal of a `size`×`size` square with `i` and the
//! anti-diagonal with `size - 1 - i`, then reports a fragment of the square,
//! the number of stored cells and every stored cell in insertion order.

use crate::config::{HarnessConfig, OutputFormat};
use infinimat_core::{Matrix2D, MatrixResult};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredCell {
    pub x: usize,
    pub y: usize,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    /// Rows of the printed fragment, `fragment[row][column]`
    pub fragment: Vec<Vec<i64>>,
    /// Number of stored (non-default) cells
    pub size: usize,
    pub cells: Vec<StoredCell>,
}

/// Build the diagonal matrix through chained entry access
pub fn build_diagonal_matrix(size: usize, default_value: i64) -> MatrixResult<Matrix2D<i64>> {
    let mut matrix = Matrix2D::with_default(default_value);

    for i in 0..size {
        let mirrored = size - 1 - i;
        matrix.entry(i).at(i)?.set(i as i64)?;
        matrix.entry(i).at(mirrored)?.set(mirrored as i64)?;
    }

    debug!(size, stored = matrix.len(), "Filled diagonals");
    Ok(matrix)
}

pub fn run_demo(config: &HarnessConfig) -> anyhow::Result<DemoReport> {
    config.validate()?;
    let demo = &config.demo;
    let mut matrix = build_diagonal_matrix(demo.size, config.matrix.default_value)?;

    let mut fragment = Vec::new();
    for x in demo.fragment_from..=demo.fragment_to {
        let row = (demo.fragment_from..=demo.fragment_to)
            .map(|y| matrix.entry(x).at(y)?.value())
            .collect::<MatrixResult<Vec<_>>>()?;
        fragment.push(row);
    }

    let cells = matrix.iter().map(|([x, y], value)| StoredCell { x, y, value: *value }).collect();

    info!(size = demo.size, stored = matrix.len(), "Demo complete");
    Ok(DemoReport { fragment, size: matrix.len(), cells })
}

pub fn render_demo(
    report: &DemoReport,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for row in &report.fragment {
                for value in row {
                    write!(out, "{value} ")?;
                }
                writeln!(out)?;
            }
            writeln!(out, "{}", report.size)?;
            for cell in &report.cells {
                writeln!(out, "{} {} {}", cell.x, cell.y, cell.value)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_cell_count() {
        // (0, 0) holds 0 and (9, 0) holds 0; both equal the default
        let matrix = build_diagonal_matrix(10, 0).unwrap();
        assert_eq!(matrix.len(), 18);
        assert_eq!(matrix.get([3, 3]), 3);
        assert_eq!(matrix.get([3, 6]), 6);
        assert_eq!(matrix.get([3, 4]), 0);
    }

    #[test]
    fn test_odd_size_centre_written_twice() {
        let matrix = build_diagonal_matrix(5, 0).unwrap();

        // Centre (2, 2) lies on both diagonals and is stored once
        assert_eq!(matrix.len(), 7);
        assert_eq!(matrix.get([2, 2]), 2);
    }

    #[test]
    fn test_empty_demo() {
        let matrix = build_diagonal_matrix(0, 0).unwrap();
        assert!(matrix.is_empty());
    }
}
