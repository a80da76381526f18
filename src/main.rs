//! screensnap: command-line screenshot tool
//!
//! Captures the full screen, or a window by title, into a PNG or JPEG file
//! and prints the absolute path of the result.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use screensnap::{
    CaptureError, Capturer,
    capture::{CompositeBackend, MockBackend, composite_from_mock, create_default_backend},
    model::ImageFormat,
    util::preferences::Preferences,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "screensnap", version)]
#[command(about = "Simple cross-platform screenshot tool for troubleshooting")]
#[command(after_help = "Examples:\n  \
    screensnap                    Capture full screen with a timestamped name\n  \
    screensnap myscreen.png       Capture to a specific file\n  \
    screensnap --window Chrome    Capture the first window whose title contains \"Chrome\"")]
struct Cli {
    /// Output file name (auto-generated when omitted)
    filename: Option<String>,

    /// Capture the first visible window whose title contains TITLE
    #[arg(short, long, value_name = "TITLE")]
    window: Option<String>,

    /// Output directory (default: from preferences, else current directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Image format: png, jpg or jpeg (default: from preferences, else png)
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<String>,

    /// Preferences file (default: ~/.screensnaprc)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save the effective output directory and format as preferences, then exit
    #[arg(long)]
    save_config: bool,

    /// List capturable windows and exit
    #[arg(long)]
    list_windows: bool,

    /// Use the synthetic backend instead of the real screen
    #[arg(long)]
    mock: bool,

    /// Log progress to stderr
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(capture_error) = e.downcast_ref::<CaptureError>() {
                eprintln!("Hint: {}", capture_error.remediation_hint());
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    // Policy fallbacks are printed as "Warning:" lines; the log stays quiet
    // unless asked
    let default_directive = if verbose {
        "screensnap=info"
    } else {
        "screensnap=error"
    };

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().or_else(Preferences::default_path);
    let preferences = match &config_path {
        Some(path) => Preferences::load(path),
        None => Preferences::default(),
    };

    // Flags win over preferences, preferences over built-in defaults
    let format = cli
        .format
        .clone()
        .unwrap_or_else(|| preferences.format.to_string());
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| preferences.output_dir.clone());

    if cli.save_config {
        let path = config_path.context("No home directory found; pass --config")?;
        return save_preferences(&path, preferences, &format, output_dir);
    }

    let backend = select_backend(cli.mock);

    if cli.list_windows {
        return list_windows(&backend);
    }

    let capturer = Capturer::new(backend, &format, output_dir)?
        .with_timestamped_names(preferences.include_timestamp);

    let filename = cli.filename.as_deref();
    let output = match cli.window.as_deref() {
        Some(title) => capturer.capture_window(title, filename)?,
        None => capturer.capture(filename)?,
    };

    if let Some(notice) = output.source.fallback() {
        eprintln!("Warning: {}", notice);
    }

    println!("Screenshot saved to: {}", output.path.display());
    Ok(())
}

fn select_backend(mock: bool) -> CompositeBackend {
    if mock {
        tracing::info!("Using mock backend");
        composite_from_mock(MockBackend::new())
    } else {
        create_default_backend()
    }
}

fn list_windows(backend: &CompositeBackend) -> Result<()> {
    if let Err(reason) = &backend.capabilities().window_capture {
        println!("Window capture not available: {}", reason);
        return Ok(());
    }

    let windows = backend.list_windows()?;
    println!("Found {} windows:\n", windows.len());
    for window in windows {
        println!("  ID: {}", window.id);
        println!("  Title: {}", window.title);
        println!();
    }

    Ok(())
}

fn save_preferences(
    path: &Path,
    mut preferences: Preferences,
    format: &str,
    output_dir: PathBuf,
) -> Result<()> {
    preferences.format = ImageFormat::normalize(format)?;
    preferences.output_dir = output_dir;
    preferences.version = env!("CARGO_PKG_VERSION").to_string();
    preferences.save(path)?;

    println!("Preferences saved to: {}", path.display());
    Ok(())
}
