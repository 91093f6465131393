/// The number of bytes in a single pixel of a [Frame].
pub const BYTES_PER_PIXEL: usize = 4;

/// A decoded capture, tightly packed R8G8B8A8 in top-down row order.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Box<[u8]>,
}

impl Frame {
    /// Creates a frame from a B8G8R8A8 buffer, converting the buffer to R8G8B8A8 in place.
    ///
    /// Returns `None` if the buffer length does not match the size.
    pub fn from_bgra(width: u32, height: u32, mut data: Box<[u8]>) -> Option<Self> {
        if Some(data.len()) != Self::buffer_len(width, height) {
            return None;
        }

        swap_red_blue(&mut data);

        Some(Self {
            width,
            height,
            data,
        })
    }

    /// The number of bytes a `width` by `height` frame occupies, `None` if it does not fit in
    /// memory.
    pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
        usize::try_from(width)
            .ok()?
            .checked_mul(usize::try_from(height).ok()?)?
            .checked_mul(BYTES_PER_PIXEL)
    }

    /// The width of the frame in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the frame in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The number of bytes between the start of two consecutive rows.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// The raw R8G8B8A8 bytes, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The bytes of row `y`, where row 0 is the top of the window.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }

        let start = y as usize * self.stride();
        self.data.get(start..start + self.stride())
    }

    /// The RGBA value of a single pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width {
            return None;
        }

        let row = self.row(y)?;
        let start = x as usize * BYTES_PER_PIXEL;
        let pixel = row.get(start..start + BYTES_PER_PIXEL)?;

        Some([pixel[0], pixel[1], pixel[2], pixel[3]])
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride())
            .finish_non_exhaustive()
    }
}

/// Swaps the first and third byte of every 4 byte pixel.
///
/// Converts B8G8R8A8 to R8G8B8A8 and back, green and alpha are untouched. Trailing bytes that do
/// not form a whole pixel are left as is.
pub fn swap_red_blue(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        pixel.swap(0, 2);
    }
}
