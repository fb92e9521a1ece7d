//! CLI enum types for the classify command.

use clap::ValueEnum;

/// How the batch summary is printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable table on stderr
    Pretty,
    /// One JSON object on stdout
    Json,
}

impl SummaryFormat {
    /// Parse the config file spelling ("pretty" or "json").
    pub fn from_config(value: &str) -> Self {
        match value {
            "json" => SummaryFormat::Json,
            _ => SummaryFormat::Pretty,
        }
    }
}
