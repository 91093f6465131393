use thiserror::Error;
use tracing::{Level, instrument, warn};

use crate::{CallError, DrawingSurface, Frame, MAX_TITLE_LENGTH, RowOrder, WindowSystem};

/// How the pixels of a capture were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFidelity {
    /// The window rendered its full content into the capture surface.
    Full,

    /// The pixels were copied from the screen at the window's rect, anything overlapping the
    /// window is part of the capture.
    ScreenCopy,
}

/// Options controlling how windows are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Ask windows to render their full content before falling back to a screen copy.
    pub render_full_content: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            render_full_content: true,
        }
    }
}

/// A captured window and its metadata.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CapturedWindow<H> {
    /// The window's content.
    pub frame: Frame,

    /// The window's title at the time of capture, may be empty.
    pub title: String,

    /// The window the capture is of, only valid for as long as the window system keeps it.
    pub handle: H,

    /// How the frame was obtained.
    pub fidelity: CaptureFidelity,
}

impl<H> CapturedWindow<H> {
    /// Pairs a frame with the window it was captured from.
    pub fn new(frame: Frame, title: String, handle: H, fidelity: CaptureFidelity) -> Self {
        Self {
            frame,
            title,
            handle,
            fidelity,
        }
    }
}

/// Reasons a single window could not be captured.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CaptureError {
    /// The window's rect is empty, usually because it is minimised.
    #[error("Window has no capturable area: {width}x{height}")]
    NotCapturable {
        /// The width of the window's rect.
        width: i32,
        /// The height of the window's rect.
        height: i32,
    },

    /// The window could not be queried, usually because it closed after enumeration.
    #[error("Failed to query the window:\n{0}")]
    WindowUnavailable(#[source] CallError),

    /// A resource of the off-screen surface could not be acquired.
    #[error("Failed to acquire the capture surface:\n{0}")]
    ResourceAcquisition(#[source] CallError),

    /// The full content render was unavailable and the screen copy failed.
    #[error("Failed to copy the window from the screen:\n{0}")]
    ScreenCopy(#[source] CallError),

    /// The surface's pixels could not be copied out, or would not fit in memory.
    #[error("Failed to extract the capture's pixels:\n{0}")]
    Extraction(#[source] CallError),
}

impl CaptureError {
    /// If the window should be skipped without reporting the error.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::NotCapturable { .. })
    }
}

/// Captures the current content of a single window.
///
/// Every resource acquired for the capture is released before this returns.
#[instrument("capture_window", level = Level::DEBUG, skip(window_system, options))]
pub fn capture_window<W: WindowSystem>(
    window_system: &W,
    handle: W::Handle,
    options: CaptureOptions,
) -> Result<CapturedWindow<W::Handle>, CaptureError> {
    let rect = window_system
        .window_rect(handle)
        .map_err(CaptureError::WindowUnavailable)?;

    let Some([width, height]) = rect.capturable_size() else {
        return Err(CaptureError::NotCapturable {
            width: rect.width(),
            height: rect.height(),
        });
    };

    // The surface is dropped at the end of this block, releasing its resources.
    let (pixels, fidelity) = {
        let mut surface = window_system
            .create_surface(rect.width(), rect.height())
            .map_err(CaptureError::ResourceAcquisition)?;

        let fidelity = if options.render_full_content && surface.render_full_content(handle) {
            CaptureFidelity::Full
        } else {
            if options.render_full_content {
                warn!("{handle:?}: full content render failed, copying from the screen instead");
            }

            surface
                .copy_screen_region(rect)
                .map_err(CaptureError::ScreenCopy)?;

            CaptureFidelity::ScreenCopy
        };

        let buffer_len = Frame::buffer_len(width, height)
            .ok_or_else(|| CaptureError::Extraction(CallError::failed("buffer_len")))?;

        let mut pixels = vec![0u8; buffer_len].into_boxed_slice();
        surface
            .extract_pixels(RowOrder::TopDown, &mut pixels)
            .map_err(CaptureError::Extraction)?;

        (pixels, fidelity)
    };

    let frame = Frame::from_bgra(width, height, pixels)
        .ok_or_else(|| CaptureError::Extraction(CallError::failed("extract_pixels")))?;

    let title = window_system.window_title(handle, MAX_TITLE_LENGTH);

    Ok(CapturedWindow::new(frame, title, handle, fidelity))
}
