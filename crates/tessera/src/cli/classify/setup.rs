//! Apply command-line overrides on top of the loaded configuration.

use tessera_core::Config;

use super::types::SummaryFormat;
use super::ClassifyArgs;

/// Settings for one classify run after merging config and flags.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: Config,
    pub summary: SummaryFormat,
}

/// Validate the input path and fold CLI flags into the configuration.
pub fn resolve(args: &ClassifyArgs, mut config: Config) -> anyhow::Result<RunSettings> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    if let Some(parallel) = args.parallel {
        if parallel == 0 {
            anyhow::bail!("--parallel must be at least 1");
        }
        config.dispatch.parallelism = parallel;
    }
    if args.probability {
        config.dispatch.probability_maps = true;
    }
    if let Some(threshold) = args.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("--threshold must be between 0.0 and 1.0, got {threshold}");
        }
        config.classifier.threshold = threshold;
    }
    if args.invert {
        config.classifier.invert = true;
    }
    if let Some(output) = &args.output {
        let expanded = shellexpand::tilde(&output.to_string_lossy()).into_owned();
        config.output.dir = expanded.into();
    }

    let summary = args
        .summary
        .unwrap_or_else(|| SummaryFormat::from_config(&config.output.summary_format));

    Ok(RunSettings { config, summary })
}
