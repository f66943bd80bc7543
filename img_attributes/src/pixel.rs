//! Pixel Sample Types
//!
//! Two views of a pixel coexist here. `QuantumPixel` is the raw fixed-point
//! storage sample the facade hands out; depth probing and re-quantization
//! compare these values exactly. `PixelSample` is the same pixel lifted into
//! normalized floating point for tolerance-aware color comparison.

use crate::descriptor::ImageDescriptor;
use crate::quantum::{Quantum, QUANTUM_RANGE, QUANTUM_SCALE};
use serde::{Deserialize, Serialize};

/// Raw fixed-point channel values of one pixel.
///
/// Opacity uses alpha convention: `QUANTUM_RANGE` is fully opaque, 0 is
/// fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumPixel {
    pub red: Quantum,
    pub green: Quantum,
    pub blue: Quantum,
    pub opacity: Quantum,
}

impl QuantumPixel {
    pub const fn rgb(red: Quantum, green: Quantum, blue: Quantum) -> Self {
        QuantumPixel {
            red,
            green,
            blue,
            opacity: QUANTUM_RANGE,
        }
    }

    pub const fn rgba(red: Quantum, green: Quantum, blue: Quantum, opacity: Quantum) -> Self {
        QuantumPixel {
            red,
            green,
            blue,
            opacity,
        }
    }

    pub const fn gray(value: Quantum) -> Self {
        QuantumPixel::rgb(value, value, value)
    }
}

impl Default for QuantumPixel {
    fn default() -> Self {
        QuantumPixel::rgb(0, 0, 0)
    }
}

/// One fetched row of pixels.
///
/// `indexes` carries the auxiliary channel when the image has one: the
/// colormap index for palette storage, or the black channel for separation
/// color spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRow {
    pub pixels: Vec<QuantumPixel>,
    pub indexes: Option<Vec<Quantum>>,
}

impl PixelRow {
    pub fn new(pixels: Vec<QuantumPixel>) -> Self {
        PixelRow {
            pixels,
            indexes: None,
        }
    }

    pub fn with_indexes(pixels: Vec<QuantumPixel>, indexes: Vec<Quantum>) -> Self {
        PixelRow {
            pixels,
            indexes: Some(indexes),
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Auxiliary index value at `x`, when the row carries an index plane.
    pub fn index_at(&self, x: usize) -> Option<Quantum> {
        self.indexes.as_ref().map(|plane| plane[x])
    }
}

/// Full-precision sample in normalized [0, 1] channel space.
///
/// `index` is populated only for separation color spaces, where the black
/// channel takes part in color distance. `has_alpha` records whether the
/// owning image declares alpha; opacity is excluded from comparisons unless
/// both operands carry it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub opacity: f64,
    pub index: Option<f64>,
    pub has_alpha: bool,
}

impl PixelSample {
    /// Lift a raw storage sample into normalized space under the image's
    /// interpretation of alpha and the auxiliary channel.
    pub fn from_quantum(
        image: &ImageDescriptor,
        pixel: &QuantumPixel,
        index: Option<Quantum>,
    ) -> Self {
        PixelSample {
            red: pixel.red as f64 * QUANTUM_SCALE,
            green: pixel.green as f64 * QUANTUM_SCALE,
            blue: pixel.blue as f64 * QUANTUM_SCALE,
            opacity: pixel.opacity as f64 * QUANTUM_SCALE,
            index: if image.colorspace.is_separation() {
                index.map(|value| value as f64 * QUANTUM_SCALE)
            } else {
                None
            },
            has_alpha: image.alpha,
        }
    }

    /// Sample at column `x` of a fetched row.
    pub fn from_row(image: &ImageDescriptor, row: &PixelRow, x: usize) -> Self {
        PixelSample::from_quantum(image, &row.pixels[x], row.index_at(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ColorSpace, ImageDescriptor};

    #[test]
    fn test_normalization_extremes() {
        let image = ImageDescriptor::new(1, 1);
        let sample = PixelSample::from_quantum(&image, &QuantumPixel::gray(QUANTUM_RANGE), None);
        assert_eq!(sample.red, 1.0);
        assert_eq!(sample.opacity, 1.0);

        let sample = PixelSample::from_quantum(&image, &QuantumPixel::gray(0), None);
        assert_eq!(sample.blue, 0.0);
    }

    #[test]
    fn test_index_only_kept_for_separation() {
        let rgb = ImageDescriptor::new(1, 1);
        let sample = PixelSample::from_quantum(&rgb, &QuantumPixel::gray(0), Some(100));
        assert!(sample.index.is_none());

        let cmyk = ImageDescriptor::new(1, 1).with_colorspace(ColorSpace::Cmyk);
        let sample = PixelSample::from_quantum(&cmyk, &QuantumPixel::gray(0), Some(QUANTUM_RANGE));
        assert_eq!(sample.index, Some(1.0));
    }

    #[test]
    fn test_row_index_plane_lookup() {
        let row = PixelRow::with_indexes(vec![QuantumPixel::gray(0); 3], vec![7, 8, 9]);
        assert_eq!(row.index_at(1), Some(8));
        assert_eq!(PixelRow::new(vec![QuantumPixel::gray(0)]).index_at(0), None);
    }
}
