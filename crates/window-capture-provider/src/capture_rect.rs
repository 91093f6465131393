/// A window's rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureRect {
    /// The x coordinate of the left edge.
    pub left: i32,

    /// The y coordinate of the top edge.
    pub top: i32,

    /// The x coordinate of the right edge, exclusive.
    pub right: i32,

    /// The y coordinate of the bottom edge, exclusive.
    pub bottom: i32,
}

impl CaptureRect {
    /// Creates a rect from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rect from a position and a size.
    pub const fn from_position_size(position: [i32; 2], size: [i32; 2]) -> Self {
        Self::new(
            position[0],
            position[1],
            position[0] + size[0],
            position[1] + size[1],
        )
    }

    /// The width of the rect, may be zero or negative.
    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// The height of the rect, may be zero or negative.
    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Returns the size of the rect if both dimensions are strictly positive.
    pub fn capturable_size(&self) -> Option<[u32; 2]> {
        let width = u32::try_from(self.width()).ok().filter(|width| *width > 0)?;
        let height = u32::try_from(self.height()).ok().filter(|height| *height > 0)?;

        Some([width, height])
    }
}
