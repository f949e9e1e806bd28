//! Harness configuration
//!
//! Values come from an optional TOML file, then `INFINIMAT_*` environment
//! overrides, then command-line flags. Every section has defaults, so an
//! empty file (or none at all) is a valid configuration.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Largest printable demo fragment side
pub const MAX_FRAGMENT_SPAN: usize = 1024;

/// How command results are printed
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How log events are formatted on stderr
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Side length of the square filled by the demo
    #[serde(default = "default_demo_size")]
    pub size: usize,
    /// First row/column of the printed fragment
    #[serde(default = "default_fragment_from")]
    pub fragment_from: usize,
    /// Last row/column of the printed fragment (inclusive)
    #[serde(default = "default_fragment_to")]
    pub fragment_to: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            size: default_demo_size(),
            fragment_from: default_fragment_from(),
            fragment_to: default_fragment_to(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixConfig {
    /// Value every unwritten cell reads as
    #[serde(default)]
    pub default_value: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: default_log_filter() }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HarnessConfig {
    /// Load from `path`, or return the defaults when no path is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file '{}'", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid configuration file '{}'", path.display()))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `INFINIMAT_*` environment overrides
    pub fn apply_environment(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup; unparsable values are ignored
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(format) = lookup("INFINIMAT_LOG_FORMAT") {
            match format.to_ascii_lowercase().as_str() {
                "json" => self.logging.format = LogFormat::Json,
                "text" => self.logging.format = LogFormat::Text,
                _ => {}
            }
        }
        if let Some(filter) = lookup("INFINIMAT_LOG_FILTER") {
            self.logging.filter = filter;
        }
        if let Some(value) = lookup("INFINIMAT_DEFAULT_VALUE").and_then(|v| v.parse().ok()) {
            self.matrix.default_value = value;
        }
        if let Some(size) = lookup("INFINIMAT_DEMO_SIZE").and_then(|v| v.parse().ok()) {
            self.demo.size = size;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.demo.fragment_from > self.demo.fragment_to {
            bail!(
                "demo.fragment_from ({}) must not exceed demo.fragment_to ({})",
                self.demo.fragment_from,
                self.demo.fragment_to
            );
        }
        let span = self.demo.fragment_to - self.demo.fragment_from;
        if span >= MAX_FRAGMENT_SPAN {
            bail!(
                "demo fragment is {} cells wide; at most {MAX_FRAGMENT_SPAN} fit",
                span.saturating_add(1)
            );
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        info!(
            default_value = self.matrix.default_value,
            output_format = ?self.output.format,
            demo_size = self.demo.size,
            "Configuration loaded"
        );
    }
}

fn default_demo_size() -> usize {
    10
}
fn default_fragment_from() -> usize {
    1
}
fn default_fragment_to() -> usize {
    8
}
fn default_log_filter() -> String {
    "infinimat_cli=info,infinimat_core=warn".to_string()
}
