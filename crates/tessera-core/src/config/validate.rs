//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.classifier.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ValidationError(
                "classifier.threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if self.dispatch.thread_name_prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "dispatch.thread_name_prefix must not be empty".into(),
            ));
        }
        if self.discovery.extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "discovery.extensions must list at least one extension".into(),
            ));
        }
        if !matches!(self.output.summary_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "output.summary_format must be \"pretty\" or \"json\", got {:?}",
                self.output.summary_format
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {:?}",
                LOG_LEVELS
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
