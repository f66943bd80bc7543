//! Color-Class Classification Results

use serde::{Deserialize, Serialize};

/// The potential type of an image, as inferred from its pixel data.
///
/// `Bilevel` pixels form a subset of `Grayscale` pixels; the classification
/// scans preserve that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageType {
    Bilevel,
    Grayscale,
    GrayscaleAlpha,
    Palette,
    PaletteAlpha,
    TrueColor,
    TrueColorAlpha,
    ColorSeparation,
    ColorSeparationAlpha,
}

impl ImageType {
    /// True for the classes whose pixels are known to be gray.
    pub const fn is_gray_family(self) -> bool {
        matches!(
            self,
            ImageType::Bilevel | ImageType::Grayscale | ImageType::GrayscaleAlpha
        )
    }

    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            ImageType::GrayscaleAlpha
                | ImageType::PaletteAlpha
                | ImageType::TrueColorAlpha
                | ImageType::ColorSeparationAlpha
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_family() {
        assert!(ImageType::Bilevel.is_gray_family());
        assert!(ImageType::GrayscaleAlpha.is_gray_family());
        assert!(!ImageType::TrueColor.is_gray_family());
        assert!(!ImageType::Palette.is_gray_family());
    }

    #[test]
    fn test_alpha_suffix() {
        assert!(ImageType::TrueColorAlpha.has_alpha());
        assert!(!ImageType::Bilevel.has_alpha());
    }
}
