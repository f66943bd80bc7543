//! Classification Predicates
//!
//! Per-pixel boolean tests composed into row scans that vote one image-wide
//! color class. The scans are sequential with early exit: the first
//! counterexample settles the question, so there is nothing to gain from
//! fanning rows out to workers.
//!
//! Each scan comes in two layers. `classify_*` is pure: it returns the
//! verdict together with the classification worth caching, and never touches
//! the descriptor. The `is_*_image` wrappers apply that cache write to the
//! caller's descriptor explicitly. Opacity has no cached form; a later
//! composite or write can change it silently.

use crate::descriptor::ImageDescriptor;
use crate::errors::{AttributeError, Result};
use crate::facade::PixelSource;
use crate::similarity::{is_gray_pixel, is_monochrome_pixel, is_opaque_pixel};
use crate::types::ImageType;
use tracing::trace;

/// Pure monochrome scan: verdict plus the type to cache on success.
pub fn classify_monochrome<S>(
    image: &ImageDescriptor,
    source: &S,
) -> Result<(bool, Option<ImageType>)>
where
    S: PixelSource + ?Sized,
{
    if image.cached_type == Some(ImageType::Bilevel) {
        return Ok((true, None));
    }
    if !image.colorspace.is_rgb_family() {
        return Ok((false, None));
    }
    trace!("scanning for monochrome");
    for y in 0..image.rows {
        let row = source
            .read_row(0, y as i64, image.columns)
            .map_err(|_| AttributeError::RowRead { y })?;
        for pixel in &row.pixels {
            if !is_monochrome_pixel(pixel) {
                return Ok((false, None));
            }
        }
    }
    Ok((true, Some(ImageType::Bilevel)))
}

/// Pure gray scan. Tracks whether the running class can still be bilevel;
/// the first gray-but-not-extreme pixel downgrades it to grayscale for the
/// rest of the scan.
pub fn classify_gray<S>(image: &ImageDescriptor, source: &S) -> Result<(bool, Option<ImageType>)>
where
    S: PixelSource + ?Sized,
{
    if image
        .cached_type
        .is_some_and(|cached| cached.is_gray_family())
    {
        return Ok((true, None));
    }
    if !image.colorspace.is_rgb_family() {
        return Ok((false, None));
    }
    trace!("scanning for gray");
    let mut class = ImageType::Bilevel;
    for y in 0..image.rows {
        let row = source
            .read_row(0, y as i64, image.columns)
            .map_err(|_| AttributeError::RowRead { y })?;
        for pixel in &row.pixels {
            if !is_gray_pixel(pixel) {
                return Ok((false, None));
            }
            if class == ImageType::Bilevel && !is_monochrome_pixel(pixel) {
                class = ImageType::Grayscale;
            }
        }
    }
    if class == ImageType::Grayscale && image.alpha {
        class = ImageType::GrayscaleAlpha;
    }
    Ok((true, Some(class)))
}

/// True when all pixels have the same red, green, and blue intensities and
/// every intensity is an extreme. Caches `Bilevel` on success.
pub fn is_monochrome_image<S>(image: &mut ImageDescriptor, source: &S) -> Result<bool>
where
    S: PixelSource + ?Sized,
{
    let (verdict, cache) = classify_monochrome(image, source)?;
    if let Some(class) = cache {
        image.cached_type = Some(class);
    }
    Ok(verdict)
}

/// True when all pixels have the same red, green, and blue intensities.
/// Caches the grayscale class (or `Bilevel`) on success.
pub fn is_gray_image<S>(image: &mut ImageDescriptor, source: &S) -> Result<bool>
where
    S: PixelSource + ?Sized,
{
    let (verdict, cache) = classify_gray(image, source)?;
    if let Some(class) = cache {
        image.cached_type = Some(class);
    }
    Ok(verdict)
}

/// True when no pixel carries partial transparency. Never cached.
pub fn is_opaque_image<S>(image: &ImageDescriptor, source: &S) -> Result<bool>
where
    S: PixelSource + ?Sized,
{
    if !image.alpha {
        return Ok(true);
    }
    trace!("scanning for transparency");
    for y in 0..image.rows {
        let row = source
            .read_row(0, y as i64, image.columns)
            .map_err(|_| AttributeError::RowRead { y })?;
        for pixel in &row.pixels {
            if !is_opaque_pixel(pixel.opacity) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Infer the potential type of an image.
///
/// Separation color spaces classify directly from metadata; otherwise the
/// scans run in strictness order. Palette membership is the caller's
/// judgment: `is_palette` is consulted as a black box once the gray scans
/// have said no.
pub fn image_type<S, F>(
    image: &mut ImageDescriptor,
    source: &S,
    is_palette: F,
) -> Result<ImageType>
where
    S: PixelSource + ?Sized,
    F: FnOnce(&ImageDescriptor, &S) -> Result<bool>,
{
    if image.colorspace.is_separation() {
        return Ok(if image.alpha {
            ImageType::ColorSeparationAlpha
        } else {
            ImageType::ColorSeparation
        });
    }
    if is_monochrome_image(image, source)? {
        return Ok(ImageType::Bilevel);
    }
    if is_gray_image(image, source)? {
        return Ok(if image.alpha {
            ImageType::GrayscaleAlpha
        } else {
            ImageType::Grayscale
        });
    }
    if is_palette(image, source)? {
        return Ok(if image.alpha {
            ImageType::PaletteAlpha
        } else {
            ImageType::Palette
        });
    }
    Ok(if image.alpha {
        ImageType::TrueColorAlpha
    } else {
        ImageType::TrueColor
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ColorSpace, StorageClass};
    use crate::facade::MemoryPixelStore;
    use crate::pixel::QuantumPixel;
    use crate::quantum::QUANTUM_RANGE;

    fn mono_store() -> MemoryPixelStore {
        MemoryPixelStore::from_pixels(
            2,
            1,
            vec![QuantumPixel::gray(0), QuantumPixel::gray(QUANTUM_RANGE)],
        )
        .unwrap()
    }

    #[test]
    fn test_monochrome_caches_bilevel() {
        let mut image = ImageDescriptor::new(2, 1);
        assert!(is_monochrome_image(&mut image, &mono_store()).unwrap());
        assert_eq!(image.cached_type, Some(ImageType::Bilevel));
    }

    #[test]
    fn test_cached_bilevel_skips_scan() {
        let mut image = ImageDescriptor::new(2, 1);
        image.cached_type = Some(ImageType::Bilevel);
        // A store that cannot be read at all: the cache must answer.
        let store = MemoryPixelStore::filled(0, 0, QuantumPixel::gray(0));
        assert!(is_monochrome_image(&mut image, &store).unwrap());
        assert!(is_gray_image(&mut image, &store).unwrap());
    }

    #[test]
    fn test_mid_gray_is_gray_not_monochrome() {
        let mut image = ImageDescriptor::new(1, 1);
        let store = MemoryPixelStore::filled(1, 1, QuantumPixel::gray(1234));
        assert!(!is_monochrome_image(&mut image, &store).unwrap());
        assert!(is_gray_image(&mut image, &store).unwrap());
        assert_eq!(image.cached_type, Some(ImageType::Grayscale));
    }

    #[test]
    fn test_gray_with_alpha_caches_alpha_class() {
        let mut image = ImageDescriptor::new(1, 1).with_alpha(true);
        let store = MemoryPixelStore::filled(1, 1, QuantumPixel::gray(1234));
        assert!(is_gray_image(&mut image, &store).unwrap());
        assert_eq!(image.cached_type, Some(ImageType::GrayscaleAlpha));
    }

    #[test]
    fn test_all_extremes_stays_bilevel_under_alpha() {
        let mut image = ImageDescriptor::new(2, 1).with_alpha(true);
        assert!(is_gray_image(&mut image, &mono_store()).unwrap());
        assert_eq!(image.cached_type, Some(ImageType::Bilevel));
    }

    #[test]
    fn test_color_pixel_fails_both_scans() {
        let mut image = ImageDescriptor::new(1, 1);
        let store = MemoryPixelStore::filled(1, 1, QuantumPixel::rgb(1, 2, 3));
        assert!(!is_gray_image(&mut image, &store).unwrap());
        assert!(!is_monochrome_image(&mut image, &store).unwrap());
        assert!(image.cached_type.is_none());
    }

    #[test]
    fn test_non_rgb_family_is_never_gray() {
        let mut image = ImageDescriptor::new(1, 1).with_colorspace(ColorSpace::Cmyk);
        let store = MemoryPixelStore::filled(1, 1, QuantumPixel::gray(0));
        assert!(!is_gray_image(&mut image, &store).unwrap());
        assert!(!is_monochrome_image(&mut image, &store).unwrap());
    }

    #[test]
    fn test_opaque_without_alpha_is_trivially_true() {
        let image = ImageDescriptor::new(1, 1);
        let store = MemoryPixelStore::filled(1, 1, QuantumPixel::rgba(0, 0, 0, 0));
        assert!(is_opaque_image(&image, &store).unwrap());
    }

    #[test]
    fn test_translucent_pixel_breaks_opacity() {
        let image = ImageDescriptor::new(2, 1).with_alpha(true);
        let store = MemoryPixelStore::from_pixels(
            2,
            1,
            vec![
                QuantumPixel::rgba(0, 0, 0, QUANTUM_RANGE),
                QuantumPixel::rgba(0, 0, 0, 32896),
            ],
        )
        .unwrap();
        assert!(!is_opaque_image(&image, &store).unwrap());
    }

    #[test]
    fn test_type_precedence_separation_first() {
        let mut image = ImageDescriptor::new(1, 1).with_colorspace(ColorSpace::Cmyk);
        let store = MemoryPixelStore::filled(1, 1, QuantumPixel::gray(0));
        let class = image_type(&mut image, &store, |_, _| Ok(true)).unwrap();
        assert_eq!(class, ImageType::ColorSeparation);

        let mut image = image.with_alpha(true);
        let class = image_type(&mut image, &store, |_, _| Ok(true)).unwrap();
        assert_eq!(class, ImageType::ColorSeparationAlpha);
    }

    #[test]
    fn test_type_palette_consulted_after_gray() {
        let mut image = ImageDescriptor::new(1, 1);
        let store = MemoryPixelStore::filled(1, 1, QuantumPixel::rgb(1, 2, 3));
        let class = image_type(&mut image, &store, |image, _| {
            Ok(image.storage_class == StorageClass::Pseudo)
        })
        .unwrap();
        assert_eq!(class, ImageType::TrueColor);

        let mut image = ImageDescriptor::new(1, 1).with_colormap(vec![QuantumPixel::rgb(1, 2, 3)]);
        let class = image_type(&mut image, &store, |image, _| {
            Ok(image.storage_class == StorageClass::Pseudo)
        })
        .unwrap();
        assert_eq!(class, ImageType::Palette);
    }

    #[test]
    fn test_type_true_color_alpha() {
        let mut image = ImageDescriptor::new(1, 1).with_alpha(true);
        let store = MemoryPixelStore::filled(1, 1, QuantumPixel::rgb(1, 2, 3));
        let class = image_type(&mut image, &store, |_, _| Ok(false)).unwrap();
        assert_eq!(class, ImageType::TrueColorAlpha);
    }
}
