use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system
///
/// Console output goes to stderr so stdout only carries the saved page path.
pub fn init_logging(verbose: bool, log_file: Option<PathBuf>) -> Result<()> {
    // RUST_LOG still applies; --verbose only moves the crate's own level
    let env_filter = EnvFilter::from_default_env()
        .add_directive(crate_directive(verbose).parse()?)
        .add_directive("warn".parse()?);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(io::stderr)
        .with_span_events(FmtSpan::CLOSE);

    // Plain-text copy for --log / --log-file
    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(open_log_file(&path)?),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn crate_directive(verbose: bool) -> &'static str {
    if verbose {
        "page_loader=debug"
    } else {
        "page_loader=info"
    }
}

/// Create the log file, making its parent directory if necessary
fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::File::create(path)
}

/// Create a default log file path
pub fn default_log_file() -> PathBuf {
    let mut path = if let Some(proj_dirs) =
        directories::ProjectDirs::from("com", "page-loader", "page-loader")
    {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from("./logs")
    };

    path.push("page-loader.log");
    path
}
