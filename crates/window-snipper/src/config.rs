use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use window_capture_provider::CaptureOptions;

use crate::{
    capture_saver::SaveOptions,
    config_dir,
    utilities::{
        directories::default_output_dir,
        failure::{Failure, log_and_panic},
    },
};

const FILE_NAME: &str = "window-snipper.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where captures are saved, the default output directory if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,

    /// Delete the previous run's files from the output directory before saving.
    pub clean_output_directory: bool,

    /// Ask windows to render their full content instead of copying them from the screen.
    pub render_full_content: bool,

    /// Save every pixel fully opaque, GDI leaves alpha undefined for most windows.
    pub force_opaque: bool,
}

#[derive(Debug, Error)]
pub enum SaveConfigError {
    #[error("Failed to serialize the config:\n{0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write the config file:\n{0}")]
    Write(#[from] io::Error),
}

impl Config {
    /// Loads the config file, writing the defaults if there is none.
    ///
    /// An invalid config file is left untouched and the defaults are used for this run.
    pub fn load_or_create(path: &Path) -> Self {
        match Self::try_load_config(path) {
            Ok(Some(config)) => config,

            Ok(None) => {
                info!("No config file found, creating one");
                let config = Self::default();
                config
                    .save(path)
                    .report("Could not save the default configuration file");
                config
            }

            Err(error) => {
                warn!("Could not deserialize config file, using the defaults:\n{error}");
                Self::default()
            }
        }
    }

    pub fn try_load_config(path: &Path) -> Result<Option<Self>, toml::de::Error> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) => {
                if error.kind() == io::ErrorKind::NotFound {
                    return Ok(None);
                }

                log_and_panic(error, "Could not read the existing configuration file");
            }
        };

        let config: Self = toml::from_str(&contents)?;

        Ok(Some(config))
    }

    pub fn save(&self, path: &Path) -> Result<(), SaveConfigError> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    pub fn file_path() -> PathBuf {
        config_dir().join(FILE_NAME)
    }

    pub fn output_directory(&self) -> PathBuf {
        self.output_directory
            .clone()
            .unwrap_or_else(default_output_dir)
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            render_full_content: self.render_full_content,
        }
    }

    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            force_opaque: self.force_opaque,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: None,
            clean_output_directory: true,
            render_full_content: true,
            force_opaque: true,
        }
    }
}
