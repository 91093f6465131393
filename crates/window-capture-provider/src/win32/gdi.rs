//! Scope guards for the GDI resources a capture surface is built from.
//!

use windows::Win32::Graphics::Gdi::{
    CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, HBITMAP, HDC,
    HGDIOBJ, ReleaseDC, SelectObject,
};

use crate::{CallError, LabelledResult};

/// The device context of the whole screen, released on drop.
pub struct ScreenDc(pub HDC);

impl ScreenDc {
    pub fn acquire() -> LabelledResult<Self> {
        let dc = unsafe { GetDC(None) };

        if dc.is_invalid() {
            return Err(CallError::failed("GetDC"));
        }

        Ok(Self(dc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        let _ = unsafe { ReleaseDC(None, self.0) };
    }
}

/// A memory device context compatible with another device context, deleted on drop.
pub struct MemoryDc(pub HDC);

impl MemoryDc {
    pub fn compatible_with(dc: &ScreenDc) -> LabelledResult<Self> {
        let memory_dc = unsafe { CreateCompatibleDC(Some(dc.0)) };

        if memory_dc.is_invalid() {
            return Err(CallError::failed("CreateCompatibleDC"));
        }

        Ok(Self(memory_dc))
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        let _ = unsafe { DeleteDC(self.0) };
    }
}

/// A bitmap in the color format of a device context, deleted on drop.
pub struct Bitmap(pub HBITMAP);

impl Bitmap {
    pub fn compatible_with(dc: &ScreenDc, width: i32, height: i32) -> LabelledResult<Self> {
        let bitmap = unsafe { CreateCompatibleBitmap(dc.0, width, height) };

        if bitmap.is_invalid() {
            return Err(CallError::failed("CreateCompatibleBitmap"));
        }

        Ok(Self(bitmap))
    }
}

impl Drop for Bitmap {
    fn drop(&mut self) {
        let _ = unsafe { DeleteObject(self.0.into()) };
    }
}

/// A bitmap selected into a memory device context, the previous object is restored on drop.
pub struct Selection {
    dc: HDC,
    previous: HGDIOBJ,
}

impl Selection {
    pub fn select(dc: &MemoryDc, bitmap: &Bitmap) -> LabelledResult<Self> {
        let previous = unsafe { SelectObject(dc.0, bitmap.0.into()) };

        if previous.is_invalid() {
            return Err(CallError::failed("SelectObject"));
        }

        Ok(Self {
            dc: dc.0,
            previous,
        })
    }
}

impl Drop for Selection {
    fn drop(&mut self) {
        let _ = unsafe { SelectObject(self.dc, self.previous) };
    }
}
