//! Content Rectangle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset and extent of image content.
///
/// A zero `width` or `height` signals that no content was found; `x` and `y`
/// are then meaningless and carry whatever the scan accumulator held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rectangle {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the rectangle lies fully inside a `columns` x `rows` canvas.
    pub const fn contained_in(&self, columns: usize, rows: usize) -> bool {
        self.x + self.width <= columns && self.y + self.height <= rows
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}
