mod album;
mod config;
mod error;
mod fonts;
pub mod layout;
pub mod media;
mod model;
mod pdf;
mod sink;

pub use album::{AlbumBuilder, BuildReport};
pub use config::AlbumConfig;
pub use error::{Error, MediaError};
pub use fonts::{FontMetrics, MM_PER_PT};
pub use layout::{Geometry, TextAlign};
pub use media::{FetchedBody, Fetcher, HttpFetcher, ImageFormat, MediaResolver, ResolvedMedia};
pub use model::{AlbumItem, AlbumProject, Description, MediaReference};
pub use pdf::PdfSink;
pub use sink::{DocumentSink, DrawOp, RecordingSink};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Build the album for `project` into `sink`, fetching remote images with `fetcher`.
pub async fn build_album<F: Fetcher, S: DocumentSink>(
    project: &AlbumProject,
    config: &AlbumConfig,
    fetcher: &F,
    sink: &mut S,
) -> Result<BuildReport, Error> {
    AlbumBuilder::new(config, fetcher).build(project, sink).await
}

/// Build `project` as a PDF in `output_dir` and return the written path.
pub async fn generate_pdf(
    project: &AlbumProject,
    config: &AlbumConfig,
    output_dir: &Path,
) -> Result<PathBuf, Error> {
    let t0 = Instant::now();

    let fetcher = HttpFetcher::new(config.fetch_timeout)?;
    let mut sink = PdfSink::new(output_dir, &config.geometry).with_title(project.name.as_str());
    let report = build_album(project, config, &fetcher, &mut sink).await?;

    log::info!(
        "Timing: total={:.1}ms ({} pages, {} of {} items degraded)",
        t0.elapsed().as_secs_f64() * 1000.0,
        report.pages,
        report.degraded_items,
        report.items,
    );

    Ok(report.file)
}

/// Read an album project from a JSON file.
pub fn load_project(path: &Path) -> Result<AlbumProject, Error> {
    let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    AlbumProject::from_json(&json).map_err(|e| Error::Project(format!("{}: {e}", path.display())))
}
