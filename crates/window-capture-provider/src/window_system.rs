use crate::{CaptureRect, LabelledResult};

/// The row order pixels are extracted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// The first row of the buffer is the top of the surface.
    TopDown,

    /// The first row of the buffer is the bottom of the surface, the native order of
    /// device-independent bitmaps.
    BottomUp,
}

/// The window-system primitives the capture pipeline is built on.
///
/// Implementations are not required to be thread safe; the underlying device contexts are
/// session-global resources.
pub trait WindowSystem {
    /// An opaque identifier for a top-level window.
    type Handle: Copy + Eq + core::fmt::Debug;

    /// An off-screen drawing surface, dropping it releases every resource it holds.
    type Surface: DrawingSurface<Handle = Self::Handle>;

    /// Calls `visit` for every top-level window known to the window system.
    fn enumerate_windows(&self, visit: &mut dyn FnMut(Self::Handle)) -> LabelledResult<()>;

    /// Returns whether the window system currently marks the window as visible.
    fn is_window_visible(&self, handle: Self::Handle) -> bool;

    /// Returns the window's rectangle in screen coordinates.
    fn window_rect(&self, handle: Self::Handle) -> LabelledResult<CaptureRect>;

    /// Returns the window's text label truncated to `max_length` characters, or an empty string
    /// if it has none.
    fn window_title(&self, handle: Self::Handle, max_length: usize) -> String;

    /// Creates an off-screen surface compatible with the screen.
    fn create_surface(&self, width: i32, height: i32) -> LabelledResult<Self::Surface>;
}

/// An off-screen drawing surface sized to a single window.
pub trait DrawingSurface {
    /// The window handle type of the owning [WindowSystem].
    type Handle;

    /// Asks the window to render its full content, including hardware accelerated and layered
    /// content, into the surface. Returns whether the window did so.
    fn render_full_content(&mut self, window: Self::Handle) -> bool;

    /// Copies the pixels currently on screen within `rect` into the surface.
    fn copy_screen_region(&mut self, rect: CaptureRect) -> LabelledResult<()>;

    /// Copies the surface's pixels into `buffer` as 32 bit B8G8R8A8 in the requested row order.
    ///
    /// Extraction is the last operation on a surface, implementations may release drawing state
    /// before copying. Fails unless every row was copied.
    fn extract_pixels(&mut self, row_order: RowOrder, buffer: &mut [u8]) -> LabelledResult<()>;
}
