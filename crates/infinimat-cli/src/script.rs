//! Line-oriented matrix scripts
//!
//! ```text
//! # comment
//! set 100 100 314     # indices..., value
//! get 100 100
//! size
//! dump
//! ```
//!
//! Indices are forwarded to the matrix one at a time through chained entry
//! access, so a wrong number of indices surfaces as a collector error naming
//! the offending line.

use crate::config::{HarnessConfig, OutputFormat};
use anyhow::{Context, anyhow, bail};
use infinimat_core::{IndexCollector, Matrix2D, MatrixError, MatrixResult};
use serde_json::json;
use std::io::{BufRead, Write};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Set { indices: Vec<usize>, value: i64 },
    Get { indices: Vec<usize> },
    Size,
    Dump,
}

/// Outcome of a completed script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    pub statements: usize,
    pub stored_cells: usize,
}

/// Parse one script line; blank lines and comments yield `None`
pub fn parse_line(line: &str) -> anyhow::Result<Option<Statement>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    let statement = match command {
        "set" => {
            let (value, indices) =
                args.split_last().ok_or_else(|| anyhow!("'set' needs indices and a value"))?;
            let value = value.parse::<i64>().with_context(|| format!("Invalid value '{value}'"))?;
            Statement::Set { indices: parse_indices(indices)?, value }
        }
        "get" => Statement::Get { indices: parse_indices(&args)? },
        "size" | "dump" if !args.is_empty() => bail!("'{command}' takes no arguments"),
        "size" => Statement::Size,
        "dump" => Statement::Dump,
        other => bail!("Unknown command '{other}'"),
    };
    Ok(Some(statement))
}

fn parse_indices(tokens: &[&str]) -> anyhow::Result<Vec<usize>> {
    tokens
        .iter()
        .map(|token| token.parse::<usize>().with_context(|| format!("Invalid index '{token}'")))
        .collect()
}

/// Chain every index through the matrix's entry accessor
fn chain_indices<'a>(
    matrix: &'a mut Matrix2D<i64>,
    indices: &[usize],
) -> MatrixResult<IndexCollector<'a, i64>> {
    let (first, rest) = indices
        .split_first()
        .ok_or_else(|| MatrixError::too_few_indices(matrix.dimensions(), 0))?;
    rest.iter().try_fold(matrix.entry(*first), |collector, index| collector.at(*index))
}

/// Executes statements against one matrix and writes results to `out`
pub struct ScriptRunner<W: Write> {
    matrix: Matrix2D<i64>,
    format: OutputFormat,
    out: W,
}

impl<W: Write> ScriptRunner<W> {
    pub fn new(config: &HarnessConfig, out: W) -> Self {
        Self {
            matrix: Matrix2D::with_default(config.matrix.default_value),
            format: config.output.format,
            out,
        }
    }

    pub fn execute(&mut self, statement: &Statement) -> anyhow::Result<()> {
        debug!(?statement, "Executing statement");
        match statement {
            Statement::Set { indices, value } => {
                chain_indices(&mut self.matrix, indices)?.set(*value)?;
            }
            Statement::Get { indices } => {
                let value = chain_indices(&mut self.matrix, indices)?.value()?;
                match self.format {
                    OutputFormat::Text => writeln!(self.out, "{value}")?,
                    OutputFormat::Json => {
                        writeln!(self.out, "{}", json!({ "indices": indices, "value": value }))?
                    }
                }
            }
            Statement::Size => match self.format {
                OutputFormat::Text => writeln!(self.out, "{}", self.matrix.len())?,
                OutputFormat::Json => {
                    writeln!(self.out, "{}", json!({ "size": self.matrix.len() }))?
                }
            },
            Statement::Dump => {
                for ([x, y], value) in &self.matrix {
                    match self.format {
                        OutputFormat::Text => writeln!(self.out, "{x} {y} {value}")?,
                        OutputFormat::Json => {
                            writeln!(self.out, "{}", json!({ "indices": [x, y], "value": value }))?
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn matrix(&self) -> &Matrix2D<i64> {
        &self.matrix
    }

    /// Read, parse and execute every line; the first failure aborts with its line number
    pub fn run(&mut self, input: impl BufRead) -> anyhow::Result<ScriptSummary> {
        let mut statements = 0;
        for (number, line) in input.lines().enumerate() {
            let line_number = number + 1;
            let line = line.with_context(|| format!("Failed to read line {line_number}"))?;
            let Some(statement) =
                parse_line(&line).with_context(|| format!("Line {line_number}"))?
            else {
                continue;
            };
            self.execute(&statement)
                .with_context(|| format!("Line {line_number}: '{}'", line.trim()))?;
            statements += 1;
        }
        self.out.flush()?;

        let summary = ScriptSummary { statements, stored_cells: self.matrix.len() };
        info!(
            statements = summary.statements,
            stored_cells = summary.stored_cells,
            "Script finished"
        );
        Ok(summary)
    }
}

/// Run a whole script with a fresh matrix
pub fn run_script(
    input: impl BufRead,
    out: impl Write,
    config: &HarnessConfig,
) -> anyhow::Result<ScriptSummary> {
    ScriptRunner::new(config, out).run(input)
}
