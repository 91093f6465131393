//! # Window Capture Provider
//! Captures the content of every visible top-level window as an RGBA frame.
//!
//! The capture pipeline is written against the [WindowSystem] trait; [win32] implements it for
//! the Windows desktop.
//!

mod capture;
mod capture_rect;
mod enumerate;
mod frame;
mod provider;
mod result;
mod window_system;

#[cfg(windows)]
pub mod win32;

pub use capture::{CaptureError, CaptureFidelity, CaptureOptions, CapturedWindow, capture_window};
pub use capture_rect::CaptureRect;
pub use enumerate::{MAX_TITLE_LENGTH, VisibleWindows, list_visible_windows};
pub use frame::{BYTES_PER_PIXEL, Frame, swap_red_blue};
pub use provider::WindowCaptureProvider;
pub use result::{CallError, CallErrorSource, LabelledResult};
pub use window_system::{DrawingSurface, RowOrder, WindowSystem};
