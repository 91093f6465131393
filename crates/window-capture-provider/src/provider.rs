use tracing::{debug, info, info_span, warn};

use crate::{
    CaptureError, CaptureOptions, CapturedWindow, LabelledResult, VisibleWindows, WindowSystem,
    capture_window, list_visible_windows,
};

/// Captures the visible top-level windows of a window system.
pub struct WindowCaptureProvider<W: WindowSystem> {
    window_system: W,
    options: CaptureOptions,
}

impl<W: WindowSystem> WindowCaptureProvider<W> {
    /// Creates a provider with the default capture options.
    pub fn new(window_system: W) -> Self {
        Self::with_options(window_system, CaptureOptions::default())
    }

    /// Creates a provider with the given capture options.
    pub fn with_options(window_system: W, options: CaptureOptions) -> Self {
        Self {
            window_system,
            options,
        }
    }

    /// The options captures are taken with.
    pub fn options(&self) -> CaptureOptions {
        self.options
    }

    /// Takes a snapshot of the visible top-level windows and their titles.
    pub fn list_visible_windows(&self) -> LabelledResult<VisibleWindows<'_, W>> {
        list_visible_windows(&self.window_system)
    }

    /// Captures a single window.
    pub fn capture(&self, handle: W::Handle) -> Result<CapturedWindow<W::Handle>, CaptureError> {
        capture_window(&self.window_system, handle, self.options)
    }

    /// Captures every visible top-level window, in enumeration order.
    ///
    /// Windows that fail to capture are logged and skipped, only a failure to enumerate the
    /// windows is returned.
    pub fn capture_visible_windows(&self) -> LabelledResult<Vec<CapturedWindow<W::Handle>>> {
        let _span = info_span!("capture_visible_windows").entered();

        let windows = self.list_visible_windows()?;
        let visible = windows.len();
        debug!("{visible} visible windows");

        let mut captures = Vec::with_capacity(visible);
        let mut skipped = 0usize;
        let mut failed = 0usize;

        for (handle, title) in windows {
            match self.capture(handle) {
                Ok(capture) => captures.push(capture),

                Err(error) if error.is_silent() => {
                    debug!("Skipping {handle:?} \"{title}\": {error}");
                    skipped += 1;
                }

                Err(error) => {
                    warn!("Could not capture {handle:?} \"{title}\": {error}");
                    failed += 1;
                }
            }
        }

        info!(
            "Captured {} of {visible} visible windows, {skipped} skipped, {failed} failed",
            captures.len()
        );

        Ok(captures)
    }
}
