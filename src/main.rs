use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use fotoalbum_pdf::{AlbumConfig, HttpFetcher, RecordingSink};

/// Render an album project (JSON) to a printable PDF photo album.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Album project JSON file
    project: PathBuf,

    /// Directory the album is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Give up on a remote image after this many seconds (default: wait indefinitely)
    #[arg(long, env = "FOTOALBUM_FETCH_TIMEOUT")]
    fetch_timeout: Option<u64>,

    /// Text under the title on the cover page
    #[arg(long)]
    subtitle: Option<String>,

    /// Print the recorded draw operations as JSON instead of writing a PDF
    #[arg(long)]
    dump_ops: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = AlbumConfig {
        fetch_timeout: cli.fetch_timeout.map(Duration::from_secs),
        ..AlbumConfig::default()
    };
    if let Some(subtitle) = cli.subtitle {
        config.subtitle = subtitle;
    }

    let result = match fotoalbum_pdf::load_project(&cli.project) {
        Ok(project) if cli.dump_ops => dump_ops(&project, &config).await,
        Ok(project) => fotoalbum_pdf::generate_pdf(&project, &config, &cli.output_dir)
            .await
            .map(|path| println!("{}", path.display())),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn dump_ops(
    project: &fotoalbum_pdf::AlbumProject,
    config: &AlbumConfig,
) -> Result<(), fotoalbum_pdf::Error> {
    let fetcher = HttpFetcher::new(config.fetch_timeout)?;
    let mut sink = RecordingSink::new();
    fotoalbum_pdf::build_album(project, config, &fetcher, &mut sink).await?;
    println!("{}", sink.to_json()?);
    Ok(())
}
