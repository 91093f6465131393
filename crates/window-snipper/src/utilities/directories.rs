use std::{fs::create_dir_all, io, path::PathBuf};

use super::failure::Failure;

const APP_DIRECTORY: &str = "Window Snipper";
const OUTPUT_DIRECTORY: &str = "Window Snips";

/// Path to the config directory.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .log_and_panic("The config directory could not be retrieved")
        .join(APP_DIRECTORY)
}

/// Path to the default output directory, inside the user's pictures if they have one.
pub fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .log_and_panic("The picture directory could not be retrieved")
        .join(OUTPUT_DIRECTORY)
}

/// Creates the directories the application needs before it can log.
pub fn create_dirs() -> io::Result<()> {
    create_dir_all(config_dir())
}
