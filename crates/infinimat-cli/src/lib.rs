#![deny(warnings)]
#![allow(missing_docs)]
//! infinimat command-line harness
//!
//! A thin collaborator over `infinimat-core`: it only constructs matrices,
//! performs chained entry reads and writes, asks for the size and iterates
//! stored cells.

pub mod cli;
pub mod config;
pub mod demo;
pub mod script;
pub mod tracing_setup;

pub use cli::{Cli, Command};
pub use config::{HarnessConfig, LogFormat, OutputFormat};
pub use demo::{DemoReport, build_diagonal_matrix, render_demo, run_demo};
pub use script::{ScriptRunner, ScriptSummary, Statement, parse_line, run_script};
