//! Image Descriptor
//!
//! Caller-owned metadata about an image whose pixels live behind the access
//! facade. Scans read these attributes; the only fields ever written back are
//! `depth`, `colormap` entries, and `cached_type`.

use crate::pixel::QuantumPixel;
use crate::quantum::QUANTUM_DEPTH;
use crate::types::ImageType;
use serde::{Deserialize, Serialize};

/// Physical pixel organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageClass {
    /// Full channel values stored per pixel.
    Direct,
    /// Palette-indexed storage; pixel values index into the colormap.
    Pseudo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    Rgb,
    Srgb,
    Gray,
    Transparent,
    /// CMYK-like separation model with an auxiliary black channel.
    Cmyk,
}

impl ColorSpace {
    /// The RGB family covers the spaces whose channels can be compared
    /// componentwise for grayness; gray and transparent count as members.
    pub const fn is_rgb_family(self) -> bool {
        matches!(
            self,
            ColorSpace::Rgb | ColorSpace::Srgb | ColorSpace::Gray | ColorSpace::Transparent
        )
    }

    pub const fn is_separation(self) -> bool {
        matches!(self, ColorSpace::Cmyk)
    }
}

/// Attributes of an image under inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub columns: usize,
    pub rows: usize,
    /// Declared bits per channel, 1..=64. Not validated against pixel data;
    /// `channel_depth` computes the effective value.
    pub depth: u32,
    pub storage_class: StorageClass,
    pub colorspace: ColorSpace,
    /// Whether the image declares an alpha channel.
    pub alpha: bool,
    /// Color comparison tolerance in normalized channel space; 0 means exact.
    pub fuzz: f64,
    /// Palette entries, present exactly when `storage_class` is `Pseudo`.
    pub colormap: Option<Vec<QuantumPixel>>,
    /// Last classification this engine computed, if any. An optimization
    /// hint, not authoritative until revalidated.
    pub cached_type: Option<ImageType>,
}

impl ImageDescriptor {
    pub fn new(columns: usize, rows: usize) -> Self {
        ImageDescriptor {
            columns,
            rows,
            depth: QUANTUM_DEPTH,
            storage_class: StorageClass::Direct,
            colorspace: ColorSpace::Srgb,
            alpha: false,
            fuzz: 0.0,
            colormap: None,
            cached_type: None,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }

    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_fuzz(mut self, fuzz: f64) -> Self {
        self.fuzz = fuzz;
        self
    }

    /// Switch to palette storage with the given colormap.
    pub fn with_colormap(mut self, colormap: Vec<QuantumPixel>) -> Self {
        self.storage_class = StorageClass::Pseudo;
        self.colormap = Some(colormap);
        self
    }

    /// Number of palette entries, 0 for direct storage.
    pub fn colors(&self) -> usize {
        self.colormap.as_ref().map_or(0, |map| map.len())
    }
}
