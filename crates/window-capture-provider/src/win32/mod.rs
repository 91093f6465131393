//! The Win32 window system, built on user32 and gdi32.
//!

mod gdi;

use core::marker::PhantomData;

use gdi::{Bitmap, MemoryDc, ScreenDc, Selection};
use tracing::{Level, instrument};
use windows::Win32::{
    Foundation::{HWND, LPARAM, RECT},
    Graphics::Gdi::{
        BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, DIB_RGB_COLORS, GetDIBits, SRCCOPY,
    },
    Storage::Xps::{PRINT_WINDOW_FLAGS, PrintWindow},
    UI::WindowsAndMessaging::{EnumWindows, GetWindowRect, GetWindowTextW, IsWindowVisible},
};
use windows_core::BOOL;

use crate::{
    CallError, CaptureRect, DrawingSurface, LabelledResult, RowOrder, WindowCaptureProvider,
    WindowSystem,
};

/// Asks `PrintWindow` to include DirectComposition and other hardware accelerated content.
const PW_RENDERFULLCONTENT: PRINT_WINDOW_FLAGS = PRINT_WINDOW_FLAGS(0x0000_0002);

/// A capture provider for the current Windows desktop session.
pub type NativeCaptureProvider = WindowCaptureProvider<Win32WindowSystem>;

impl NativeCaptureProvider {
    /// Creates a provider for the current desktop session with the given options.
    pub fn native(options: crate::CaptureOptions) -> Self {
        Self::with_options(Win32WindowSystem::new(), options)
    }
}

/// The window system of the current Windows desktop session.
#[derive(Debug, Default)]
pub struct Win32WindowSystem {
    // Device contexts belong to the session, keep the window system on one thread.
    _not_send: PhantomData<*const ()>,
}

impl Win32WindowSystem {
    /// Creates a handle to the current session's window system.
    pub fn new() -> Self {
        Self {
            _not_send: PhantomData,
        }
    }
}

unsafe extern "system" fn enum_windows_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let visit = unsafe { &mut *(lparam.0 as *mut &mut dyn FnMut(HWND)) };
    visit(hwnd);

    BOOL::from(true)
}

impl WindowSystem for Win32WindowSystem {
    type Handle = HWND;
    type Surface = Win32Surface;

    fn enumerate_windows(&self, mut visit: &mut dyn FnMut(HWND)) -> LabelledResult<()> {
        let context: *mut &mut dyn FnMut(HWND) = &mut visit;

        unsafe { EnumWindows(Some(enum_windows_proc), LPARAM(context as isize)) }
            .map_err(|e| CallError::new(e, "EnumWindows"))
    }

    fn is_window_visible(&self, handle: HWND) -> bool {
        unsafe { IsWindowVisible(handle) }.as_bool()
    }

    fn window_rect(&self, handle: HWND) -> LabelledResult<CaptureRect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(handle, &mut rect) }
            .map_err(|e| CallError::new(e, "GetWindowRect"))?;

        Ok(CaptureRect::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn window_title(&self, handle: HWND, max_length: usize) -> String {
        // Room for the terminating null.
        let mut buffer = vec![0u16; max_length + 1];
        let length = unsafe { GetWindowTextW(handle, &mut buffer) };

        let length = usize::try_from(length).unwrap_or(0).min(max_length);
        String::from_utf16_lossy(&buffer[..length])
    }

    #[instrument("Win32WindowSystem::create_surface", level = Level::TRACE, skip(self), err)]
    fn create_surface(&self, width: i32, height: i32) -> LabelledResult<Win32Surface> {
        let screen_dc = ScreenDc::acquire()?;
        let memory_dc = MemoryDc::compatible_with(&screen_dc)?;
        let bitmap = Bitmap::compatible_with(&screen_dc, width, height)?;
        let selection = Selection::select(&memory_dc, &bitmap)?;

        Ok(Win32Surface {
            selection: Some(selection),
            memory_dc,
            bitmap,
            screen_dc,
            width,
            height,
        })
    }
}

/// A memory device context with a screen compatible bitmap selected into it.
pub struct Win32Surface {
    // Field order is drop order: deselect, delete the DC, delete the bitmap, release the screen.
    // The bitmap is deselected early for extraction, GetDIBits rejects selected bitmaps.
    selection: Option<Selection>,
    memory_dc: MemoryDc,
    bitmap: Bitmap,
    screen_dc: ScreenDc,

    width: i32,
    height: i32,
}

impl DrawingSurface for Win32Surface {
    type Handle = HWND;

    fn render_full_content(&mut self, window: HWND) -> bool {
        unsafe { PrintWindow(window, self.memory_dc.0, PW_RENDERFULLCONTENT) }.as_bool()
    }

    fn copy_screen_region(&mut self, rect: CaptureRect) -> LabelledResult<()> {
        unsafe {
            BitBlt(
                self.memory_dc.0,
                0,
                0,
                self.width.min(rect.width()),
                self.height.min(rect.height()),
                Some(self.screen_dc.0),
                rect.left,
                rect.top,
                SRCCOPY,
            )
        }
        .map_err(|e| CallError::new(e, "BitBlt"))
    }

    fn extract_pixels(&mut self, row_order: RowOrder, buffer: &mut [u8]) -> LabelledResult<()> {
        let required = usize::try_from(self.width)
            .ok()
            .zip(usize::try_from(self.height).ok())
            .and_then(|(width, height)| width.checked_mul(height)?.checked_mul(4));

        if required.is_none_or(|required| buffer.len() < required) {
            return Err(CallError::failed("GetDIBits"));
        }

        // Restores the DC's original bitmap, the surface can not be drawn into after this.
        self.selection = None;

        let bi_height = match row_order {
            RowOrder::TopDown => -self.height,
            RowOrder::BottomUp => self.height,
        };

        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: self.width,
                biHeight: bi_height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let lines = unsafe {
            GetDIBits(
                self.screen_dc.0,
                self.bitmap.0,
                0,
                self.height as u32,
                Some(buffer.as_mut_ptr().cast()),
                &mut info,
                DIB_RGB_COLORS,
            )
        };

        // A partial copy leaves the missing rows zeroed, treat it as a failure.
        if lines != self.height {
            return Err(CallError::from_last_error("GetDIBits"));
        }

        Ok(())
    }
}

impl core::fmt::Debug for Win32Surface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Win32Surface")
            .field("memory_dc", &self.memory_dc.0)
            .field("bitmap", &self.bitmap.0)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
