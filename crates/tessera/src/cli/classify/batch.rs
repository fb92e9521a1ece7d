//! Load, dispatch and write: the body of `tessera classify`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tessera_core::pipeline::{decode_plane, write_result};
use tessera_core::{DiscoveredFile, Dispatcher, Image, ResultBatch, ThresholdClassifier};

use super::progress::BarSink;
use super::setup::RunSettings;
use super::summary::Summary;

/// Images that decoded, paired with the files they came from.
pub struct LoadedBatch {
    pub paths: Vec<PathBuf>,
    pub images: Vec<Image>,
    pub unreadable: Vec<PathBuf>,
}

/// Decode every discovered file. Unreadable files are logged and left out
/// of the batch.
pub fn load_images(files: Vec<DiscoveredFile>) -> LoadedBatch {
    let mut loaded = LoadedBatch {
        paths: Vec::with_capacity(files.len()),
        images: Vec::with_capacity(files.len()),
        unreadable: Vec::new(),
    };
    for file in files {
        match decode_plane(&file.path) {
            Ok(plane) => {
                loaded.images.push(plane.into_dyn());
                loaded.paths.push(file.path);
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable image: {}", e);
                loaded.unreadable.push(file.path);
            }
        }
    }
    loaded
}

/// Run the dispatcher on a blocking thread and return the batch together
/// with the paths it was built from.
pub async fn dispatch(
    settings: &RunSettings,
    loaded: LoadedBatch,
    show_progress: bool,
) -> anyhow::Result<(Vec<PathBuf>, ResultBatch<Image>)> {
    let dispatch_config = settings.config.dispatch.clone();
    let classifier = ThresholdClassifier::from_config(&settings.config.classifier);
    let sink = Arc::new(BarSink::new(show_progress));

    let LoadedBatch { paths, images, .. } = loaded;
    let bar = sink.clone();
    let batch = tokio::task::spawn_blocking(move || {
        let dispatcher = Dispatcher::new(&classifier, dispatch_config).with_sink(bar);
        dispatcher.classify_batch(&images)
    })
    .await??;
    sink.finish();

    Ok((paths, batch))
}

/// Where the result for `source` goes inside `output_dir`.
///
/// Directory inputs keep their relative layout; a single-file input lands
/// directly in `output_dir`. Results are PNG, named after the full source
/// file name (`a.tif` becomes `a.tif.png`) so same-stem siblings stay apart.
pub fn output_path(input: &Path, source: &Path, output_dir: &Path) -> PathBuf {
    let relative = source
        .strip_prefix(input)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| source.file_name().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("result"));
    let mut name = relative.into_os_string();
    name.push(".png");
    output_dir.join(name)
}

fn resolved(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Write every present result and fill in the summary.
///
/// A target that is one of the input files, or that an earlier result in
/// this run already claimed, is never written; its source is recorded in
/// `summary.write_failed` alongside results the encoder could not save.
pub fn write_results(
    input: &Path,
    output_dir: &Path,
    paths: &[PathBuf],
    batch: &ResultBatch<Image>,
    summary: &mut Summary,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let sources: HashSet<PathBuf> = paths
        .iter()
        .chain(&summary.unreadable)
        .map(|p| resolved(p))
        .collect();
    let mut claimed = HashSet::new();

    for (source, result) in paths.iter().zip(batch.iter()) {
        let Some(result) = result else {
            summary.unclassified.push(source.clone());
            continue;
        };
        let target = output_path(input, source, output_dir);
        if sources.contains(&resolved(&target)) {
            tracing::error!(
                "Refusing to overwrite input {:?} with the result for {:?}",
                target,
                source
            );
            summary.write_failed.push(source.clone());
            continue;
        }
        if !claimed.insert(target.clone()) {
            tracing::error!(
                "Result for {:?} collides with an earlier result at {:?}",
                source,
                target
            );
            summary.write_failed.push(source.clone());
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match write_result(result, &target) {
            Ok(()) => summary.written += 1,
            Err(e) => {
                tracing::error!("Failed: {:?} - {}", source, e);
                summary.write_failed.push(source.clone());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tessera_core::config::DispatchConfig;
    use tessera_core::dispatch::classifier_fn;
    use tessera_core::{ClassifyRequest, Config};

    use crate::cli::classify::types::SummaryFormat;

    fn write_gray(path: &Path, level: u8) {
        let mut img = GrayImage::new(4, 3);
        for p in img.pixels_mut() {
            *p = Luma([level]);
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_output_path_keeps_layout() {
        let out = Path::new("/out");
        assert_eq!(
            output_path(Path::new("/in"), Path::new("/in/a/b.tif"), out),
            PathBuf::from("/out/a/b.tif.png")
        );
        assert_eq!(
            output_path(Path::new("/in/x.jpg"), Path::new("/in/x.jpg"), out),
            PathBuf::from("/out/x.jpg.png")
        );
    }

    #[test]
    fn test_output_path_separates_same_stem_siblings() {
        let input = Path::new("/in");
        let out = Path::new("/out");
        let png = output_path(input, Path::new("/in/a.png"), out);
        let tif = output_path(input, Path::new("/in/a.tif"), out);
        assert_ne!(png, tif);
        assert_eq!(png, PathBuf::from("/out/a.png.png"));
        assert_eq!(tif, PathBuf::from("/out/a.tif.png"));
    }

    #[test]
    fn test_output_path_never_names_a_single_file_input() {
        let source = Path::new("/data/x.png");
        assert_ne!(output_path(source, source, Path::new("/data")), source);
    }

    #[test]
    fn test_load_images_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.png");
        write_gray(&good, 200);
        std::fs::write(&bad, b"garbage").unwrap();

        let files = vec![
            DiscoveredFile { path: bad.clone(), size: 7 },
            DiscoveredFile { path: good.clone(), size: 1 },
        ];
        let loaded = load_images(files);
        assert_eq!(loaded.paths, vec![good]);
        assert_eq!(loaded.images.len(), 1);
        assert_eq!(loaded.images[0].shape(), &[3, 4]);
        assert_eq!(loaded.unreadable, vec![bad]);
    }

    #[tokio::test]
    async fn test_dispatch_and_write() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_gray(&input.path().join("bright.png"), 250);
        write_gray(&input.path().join("dark.png"), 5);

        let files = tessera_core::FileDiscovery::new(Default::default()).discover(input.path());
        let loaded = load_images(files);

        let mut config = Config::default();
        config.dispatch.parallelism = 2;
        let settings = RunSettings {
            config,
            summary: SummaryFormat::Json,
        };

        let (paths, batch) = dispatch(&settings, loaded, false).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.failed_indices().is_empty());

        let mut summary = Summary::default();
        write_results(input.path(), output.path(), &paths, &batch, &mut summary).unwrap();
        assert_eq!(summary.written, 2);

        assert!(summary.write_failed.is_empty());

        let bright = image::open(output.path().join("bright.png.png")).unwrap().into_luma8();
        let dark = image::open(output.path().join("dark.png.png")).unwrap().into_luma8();
        assert_eq!(bright.get_pixel(0, 0), &Luma([255]));
        assert_eq!(dark.get_pixel(0, 0), &Luma([0]));
    }

    async fn classify_files(paths: Vec<PathBuf>) -> (Vec<PathBuf>, ResultBatch<Image>) {
        let files = paths
            .into_iter()
            .map(|path| DiscoveredFile { path, size: 0 })
            .collect();
        let settings = RunSettings {
            config: Config::default(),
            summary: SummaryFormat::Json,
        };
        dispatch(&settings, load_images(files), false).await.unwrap()
    }

    #[tokio::test]
    async fn test_single_file_into_its_own_directory_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x.png");
        write_gray(&source, 250);
        let before = std::fs::read(&source).unwrap();

        let (paths, batch) = classify_files(vec![source.clone()]).await;
        let mut summary = Summary::default();
        write_results(&source, dir.path(), &paths, &batch, &mut summary).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(std::fs::read(&source).unwrap(), before);
        assert!(dir.path().join("x.png.png").exists());
    }

    #[tokio::test]
    async fn test_result_never_overwrites_another_input() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("a.png");
        let doubled = dir.path().join("a.png.png");
        write_gray(&plain, 250);
        write_gray(&doubled, 5);
        let before = std::fs::read(&doubled).unwrap();

        let (paths, batch) = classify_files(vec![plain.clone(), doubled.clone()]).await;
        let mut summary = Summary::default();
        write_results(dir.path(), dir.path(), &paths, &batch, &mut summary).unwrap();

        assert_eq!(summary.write_failed, vec![plain]);
        assert_eq!(summary.written, 1);
        assert_eq!(std::fs::read(&doubled).unwrap(), before);
        assert!(dir.path().join("a.png.png.png").exists());
    }

    #[tokio::test]
    async fn test_unencodable_result_is_recorded() {
        let output = tempfile::tempdir().unwrap();
        let paths = vec![PathBuf::from("/in/cube.tif")];
        let identity = classifier_fn(|img: &Image, _: &ClassifyRequest| Ok(img.clone()));
        let cube = Image::zeros(vec![2, 2, 2, 2]);
        let batch = Dispatcher::new(&identity, DispatchConfig::default())
            .classify_batch(std::slice::from_ref(&cube))
            .unwrap();

        let mut summary = Summary::default();
        write_results(Path::new("/in"), output.path(), &paths, &batch, &mut summary).unwrap();

        assert_eq!(summary.written, 0);
        assert_eq!(summary.write_failed, paths);
        assert!(summary.unclassified.is_empty());
    }
}
