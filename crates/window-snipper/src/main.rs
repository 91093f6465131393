//! # Window Snipper
//! Captures every visible top-level window and saves each one as a PNG named after its title.
//!

#![allow(clippy::std_instead_of_alloc)]

use std::{path::PathBuf, process::ExitCode};

use capture_saver::{SaveError, clean_directory, save_captures};
use config::Config;
use logger::setup_logger;
use mimalloc::MiMalloc;
use thiserror::Error;
use tracing::{error, info, info_span};
use utilities::{directories::create_dirs, failure::Failure};
use window_capture_provider::{CallError, WindowCaptureProvider, WindowSystem};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub use utilities::directories::config_dir;

mod capture_saver;
mod config;
mod logger;
mod utilities;

/// The Cargo package version.
#[cfg(not(debug_assertions))]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The Cargo package version or '0.0.0' if a non-release build.
#[cfg(debug_assertions)]
pub const VERSION: &str = "0.0.0";

/// If this instance should have debug enabled.
pub fn should_debug() -> bool {
    std::env::args().any(|arg| arg.eq("--debug"))
}

#[derive(Debug, Error)]
enum RunError {
    #[error("Failed to enumerate the visible windows:\n{0}")]
    Enumerate(#[from] CallError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[cfg(not(windows))]
    #[error("There is no native window system to capture on this platform")]
    Unsupported,
}

fn main() -> ExitCode {
    create_dirs().log_and_panic("The config folder could not be created");

    // Set up logger
    let _logger_guards = setup_logger(should_debug()).log_and_panic("Could not set up the logger");

    // Log application start
    let _span = info_span!("[Main Thread]").entered();
    info!("Window Snipper v{}", VERSION);

    let config = Config::load_or_create(&Config::file_path());

    match run(&config) {
        Ok(saved) => {
            info!("Finished, {} windows saved", saved.len());
            ExitCode::SUCCESS
        }

        Err(error) => {
            error!("Exiting: {error}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(windows)]
fn run(config: &Config) -> Result<Vec<PathBuf>, RunError> {
    use window_capture_provider::win32::NativeCaptureProvider;

    let provider = NativeCaptureProvider::native(config.capture_options());
    capture_and_save(&provider, config)
}

#[cfg(not(windows))]
fn run(_config: &Config) -> Result<Vec<PathBuf>, RunError> {
    Err(RunError::Unsupported)
}

/// Runs one capture pass and saves the results to the configured output directory.
#[cfg_attr(not(windows), allow(dead_code))]
fn capture_and_save<W: WindowSystem>(
    provider: &WindowCaptureProvider<W>,
    config: &Config,
) -> Result<Vec<PathBuf>, RunError> {
    let captures = provider.capture_visible_windows()?;

    let output_directory = config.output_directory();
    if config.clean_output_directory {
        clean_directory(&output_directory);
    }

    let saved = save_captures(&output_directory, &captures, config.save_options())?;

    Ok(saved)
}
