//! Command-line interface definition

use crate::config::{HarnessConfig, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// infinimat command-line harness
#[derive(Parser, Debug)]
#[command(name = "infinimat")]
#[command(about = "Infinite N-dimensional sparse matrix harness")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML)
    #[arg(short, long, env = "INFINIMAT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Value every unwritten cell reads as
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub default_value: Option<i64>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fill both diagonals of a square and print a fragment of it
    Demo {
        /// Side length of the filled square
        #[arg(long)]
        size: Option<usize>,

        /// First row/column of the printed fragment
        #[arg(long)]
        from: Option<usize>,

        /// Last row/column of the printed fragment (inclusive)
        #[arg(long)]
        to: Option<usize>,
    },

    /// Execute a matrix script
    Run {
        /// Script file; standard input is read when omitted
        script: Option<PathBuf>,
    },
}

impl Cli {
    /// Layer file, environment and flag settings into one validated configuration
    pub fn resolve_config(&self) -> anyhow::Result<HarnessConfig> {
        let config = HarnessConfig::load(self.config.as_deref())?.apply_environment();
        self.apply_flags(config)
    }

    /// Apply command-line overrides on top of `config`
    pub fn apply_flags(&self, mut config: HarnessConfig) -> anyhow::Result<HarnessConfig> {
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(default_value) = self.default_value {
            config.matrix.default_value = default_value;
        }
        if let Command::Demo { size, from, to } = &self.command {
            if let Some(size) = size {
                config.demo.size = *size;
            }
            if let Some(from) = from {
                config.demo.fragment_from = *from;
            }
            if let Some(to) = to {
                config.demo.fragment_to = *to;
            }
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo() {
        let cli = Cli::try_parse_from(["infinimat", "demo", "--size", "4", "--to", "3"]).unwrap();

        assert_eq!(cli.command, Command::Demo { size: Some(4), from: None, to: Some(3) });
        let config = cli.apply_flags(HarnessConfig::default()).unwrap();
        assert_eq!(config.demo.size, 4);
        assert_eq!((config.demo.fragment_from, config.demo.fragment_to), (1, 3));
    }

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::try_parse_from([
            "infinimat",
            "run",
            "script.txt",
            "--format",
            "json",
            "--default-value",
            "-1",
        ])
        .unwrap();

        assert_eq!(cli.command, Command::Run { script: Some(PathBuf::from("script.txt")) });
        let config = cli.apply_flags(HarnessConfig::default()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.matrix.default_value, -1);
    }

    #[test]
    fn test_inverted_fragment_flags_rejected() {
        let cli = Cli::try_parse_from(["infinimat", "demo", "--from", "6", "--to", "2"]).unwrap();

        assert!(cli.apply_flags(HarnessConfig::default()).is_err());
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["infinimat"]).is_err());
    }
}
