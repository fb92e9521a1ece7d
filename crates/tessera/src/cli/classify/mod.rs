//! The `tessera classify` command.

mod batch;
mod progress;
mod setup;
mod summary;
pub mod types;

pub use types::SummaryFormat;

use clap::Args;
use std::path::PathBuf;
use tessera_core::{Config, FileDiscovery};

use batch::{dispatch, load_images, write_results};
use setup::resolve;
use summary::Summary;

/// Arguments for the `classify` command.
#[derive(Args, Debug, Default)]
pub struct ClassifyArgs {
    /// Image file or directory to classify
    #[arg(required = true)]
    pub input: PathBuf,

    /// Directory for result images (overrides `output.dir`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of worker threads (overrides `dispatch.parallelism`)
    #[arg(short, long, env = "TESSERA_PARALLELISM")]
    pub parallel: Option<usize>,

    /// Write foreground probability maps instead of label maps
    #[arg(long)]
    pub probability: bool,

    /// Foreground intensity threshold, 0.0-1.0
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Treat dark pixels as foreground
    #[arg(long)]
    pub invert: bool,

    /// Summary format
    #[arg(long, value_enum)]
    pub summary: Option<SummaryFormat>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Execute the classify command.
pub async fn execute(args: ClassifyArgs, config: Config) -> anyhow::Result<()> {
    let settings = resolve(&args, config)?;

    let files = FileDiscovery::new(settings.config.discovery.clone()).discover(&args.input);
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to classify", files.len());

    let mut summary = Summary {
        found: files.len(),
        output_dir: settings.config.output_dir(),
        ..Summary::default()
    };

    let loaded = tokio::task::spawn_blocking(move || load_images(files)).await?;
    summary.unreadable = loaded.unreadable.clone();

    let (paths, batch) = dispatch(&settings, loaded, !args.no_progress).await?;
    let output_dir = summary.output_dir.clone();
    write_results(&args.input, &output_dir, &paths, &batch, &mut summary)?;
    tracing::info!("Results written to {:?}", output_dir);

    summary.dispatch = batch.stats().clone();
    summary.faults = batch.faults().to_vec();
    summary.print(settings.summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_args_default_flags_are_off() {
        let args = ClassifyArgs::default();
        assert!(!args.probability);
        assert!(!args.invert);
        assert!(!args.no_progress);
    }

    #[test]
    fn classify_args_default_overrides_are_none() {
        let args = ClassifyArgs::default();
        assert!(args.output.is_none());
        assert!(args.parallel.is_none());
        assert!(args.threshold.is_none());
        assert!(args.summary.is_none());
    }
}
