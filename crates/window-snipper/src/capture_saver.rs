use std::{
    fs, io,
    path::{Path, PathBuf},
};

use image::{ImageBuffer, ImageFormat, Rgba};
use thiserror::Error;
use tracing::{Level, info, instrument, warn};
use window_capture_provider::{CapturedWindow, Frame};

/// The file name used for windows whose title sanitizes to nothing.
pub const UNTITLED: &str = "Untitled";

const EXTENSION: &str = "png";

/// The longest file name, in bytes, that NTFS and ext4 both accept. UTF-8 never uses fewer bytes
/// than UTF-16 uses code units, so a name within this many bytes fits either.
const MAX_FILE_NAME_BYTES: usize = 255;

/// Characters Windows does not allow in file names, control characters are rejected separately.
const INVALID_CHARACTERS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Overwrite the alpha channel of every pixel with fully opaque.
    pub force_opaque: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { force_opaque: true }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to create the output directory:\n{0}")]
    CreateDirectory(#[source] io::Error),

    #[error("Capture buffer does not match the capture's size")]
    InvalidBuffer,

    #[error("Failed to encode or write the image:\n{0}")]
    Image(#[from] image::ImageError),
}

/// The outcome of cleaning a directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub removed: usize,
    pub failed: usize,
}

fn is_invalid(character: char) -> bool {
    character < ' ' || INVALID_CHARACTERS.contains(&character)
}

/// Turns a window title into a name that is valid as a Windows file name.
pub fn sanitize_file_name(title: &str) -> String {
    let mut name: String = title
        .chars()
        .map(|character| if is_invalid(character) { '_' } else { character })
        .collect();

    // Windows drops trailing dots from file names.
    let trimmed_length = name.trim_end_matches('.').len();
    if trimmed_length != name.len() {
        name.truncate(trimmed_length);
        name.push('_');
    }

    if name.is_empty() {
        return UNTITLED.to_string();
    }

    name
}

/// Returns the longest prefix of `name` that is at most `max_bytes` long.
fn truncate_to_boundary(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }

    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }

    &name[..end]
}

/// `name` followed by `suffix` and the extension, with `name` shortened until the whole file name
/// fits in [MAX_FILE_NAME_BYTES].
fn file_name(name: &str, suffix: &str, extension: &str) -> String {
    let reserved = suffix.len() + 1 + extension.len();
    let name = truncate_to_boundary(name, MAX_FILE_NAME_BYTES.saturating_sub(reserved));

    format!("{name}{suffix}.{extension}")
}

/// Returns `name.extension` inside the directory, or the first free `name(n).extension`.
///
/// Long names are shortened so the file name stays within what the file system accepts.
pub fn unique_file_path(directory: &Path, name: &str, extension: &str) -> PathBuf {
    let mut path = directory.join(file_name(name, "", extension));

    let mut counter = 1usize;
    while path.exists() {
        path = directory.join(file_name(name, &format!("({counter})"), extension));
        counter += 1;
    }

    path
}

/// Deletes the files directly inside a directory, failures are logged and counted.
#[instrument("clean_directory", level = Level::DEBUG, skip_all)]
pub fn clean_directory(directory: &Path) -> CleanReport {
    let mut report = CleanReport::default();

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return report,
        Err(error) => {
            warn!("Could not read {}:\n{error}", directory.display());
            report.failed += 1;
            return report;
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(error) => {
                warn!("Could not read an entry in {}:\n{error}", directory.display());
                report.failed += 1;
                continue;
            }
        };

        if !path.is_file() {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => report.removed += 1,
            Err(error) => {
                warn!("Could not delete {}:\n{error}", path.display());
                report.failed += 1;
            }
        }
    }

    info!(
        "Cleaned {}, {} removed, {} failed",
        directory.display(),
        report.removed,
        report.failed
    );

    report
}

/// Encodes a frame as a PNG named after the title, returning the path it was saved to.
pub fn save_frame(
    directory: &Path,
    title: &str,
    frame: &Frame,
    options: SaveOptions,
) -> Result<PathBuf, SaveError> {
    let mut bytes = frame.as_bytes().to_vec();

    if options.force_opaque {
        for pixel in bytes.chunks_exact_mut(4) {
            pixel[3] = u8::MAX;
        }
    }

    let image: ImageBuffer<Rgba<u8>, _> =
        ImageBuffer::from_raw(frame.width(), frame.height(), bytes).ok_or(SaveError::InvalidBuffer)?;

    let path = unique_file_path(directory, &sanitize_file_name(title), EXTENSION);
    image.save_with_format(&path, ImageFormat::Png)?;

    Ok(path)
}

/// Saves every capture into the directory, in order.
///
/// A capture that fails to save is logged and skipped, only failing to create the directory is
/// returned.
#[instrument("save_captures", level = Level::INFO, skip_all)]
pub fn save_captures<H>(
    directory: &Path,
    captures: &[CapturedWindow<H>],
    options: SaveOptions,
) -> Result<Vec<PathBuf>, SaveError> {
    fs::create_dir_all(directory).map_err(SaveError::CreateDirectory)?;

    let mut saved = Vec::with_capacity(captures.len());

    for capture in captures {
        match save_frame(directory, &capture.title, &capture.frame, options) {
            Ok(path) => saved.push(path),
            Err(error) => warn!("Could not save \"{}\":\n{error}", capture.title),
        }
    }

    info!(
        "Saved {} of {} captures to {}",
        saved.len(),
        captures.len(),
        directory.display()
    );

    Ok(saved)
}
