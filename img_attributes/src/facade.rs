//! Pixel Access Facade
//!
//! The engine never touches pixel storage directly; it consumes rows through
//! these traits. `read_row` is a virtual read: coordinates outside the canvas
//! clamp to the nearest edge pixel, so callers can sample corners of
//! degenerate geometry without bounds bookkeeping. `write_row` is the
//! authentic counterpart used by re-quantization.
//!
//! `MemoryPixelStore` is the shipped implementation: an RwLock-guarded
//! buffer that allows the row scans to read concurrently. Adapters construct
//! it from raw quanta, palette-indexed data, or a decoded `DynamicImage`.

use crate::descriptor::{ColorSpace, ImageDescriptor};
use crate::errors::{AttributeError, Result};
use crate::pixel::{PixelRow, QuantumPixel};
use crate::quantum::{scale_char_to_quantum, Quantum};
use image::{DynamicImage, GenericImageView};
use std::sync::RwLock;

/// Row-oriented read access with virtual (edge-clamped) semantics.
pub trait PixelSource: Sync {
    fn columns(&self) -> usize;

    fn rows(&self) -> usize;

    /// Fetch `width` samples starting at (`x`, `y`). Out-of-bounds
    /// coordinates are clamped to the canvas edge; an empty canvas or a
    /// storage fault yields `RowRead`.
    fn read_row(&self, x: i64, y: i64, width: usize) -> Result<PixelRow>;
}

/// Read-write access; `write_row` replaces one full row.
pub trait PixelStore: PixelSource {
    fn write_row(&self, y: usize, row: &PixelRow) -> Result<()>;
}

struct Plane {
    pixels: Vec<QuantumPixel>,
    indexes: Option<Vec<Quantum>>,
}

/// In-memory pixel storage.
pub struct MemoryPixelStore {
    columns: usize,
    rows: usize,
    plane: RwLock<Plane>,
}

impl MemoryPixelStore {
    /// A canvas uniformly filled with one pixel value.
    pub fn filled(columns: usize, rows: usize, pixel: QuantumPixel) -> Self {
        MemoryPixelStore {
            columns,
            rows,
            plane: RwLock::new(Plane {
                pixels: vec![pixel; columns * rows],
                indexes: None,
            }),
        }
    }

    /// Wrap an existing row-major pixel buffer.
    pub fn from_pixels(columns: usize, rows: usize, pixels: Vec<QuantumPixel>) -> Result<Self> {
        if pixels.len() != columns * rows {
            return Err(AttributeError::GeometryMismatch {
                expected: columns * rows,
                actual: pixels.len(),
            });
        }
        Ok(MemoryPixelStore {
            columns,
            rows,
            plane: RwLock::new(Plane {
                pixels,
                indexes: None,
            }),
        })
    }

    /// Materialize palette-indexed data: pixels resolve through the colormap
    /// and the index plane is retained for auxiliary-channel consumers.
    pub fn from_indexed(
        columns: usize,
        rows: usize,
        indices: Vec<Quantum>,
        colormap: &[QuantumPixel],
    ) -> Result<Self> {
        if indices.len() != columns * rows {
            return Err(AttributeError::GeometryMismatch {
                expected: columns * rows,
                actual: indices.len(),
            });
        }
        let mut pixels = Vec::with_capacity(indices.len());
        for &index in &indices {
            let entry =
                colormap
                    .get(index as usize)
                    .ok_or_else(|| AttributeError::ColormapRange {
                        index: index as usize,
                        colors: colormap.len(),
                    })?;
            pixels.push(*entry);
        }
        Ok(MemoryPixelStore {
            columns,
            rows,
            plane: RwLock::new(Plane {
                pixels,
                indexes: Some(indices),
            }),
        })
    }

    /// Attach an auxiliary index plane (the black channel of a separation
    /// image).
    pub fn with_index_plane(self, indexes: Vec<Quantum>) -> Result<Self> {
        if indexes.len() != self.columns * self.rows {
            return Err(AttributeError::GeometryMismatch {
                expected: self.columns * self.rows,
                actual: indexes.len(),
            });
        }
        let pixels = self.plane.into_inner().expect("pixel plane lock poisoned").pixels;
        Ok(MemoryPixelStore {
            columns: self.columns,
            rows: self.rows,
            plane: RwLock::new(Plane {
                pixels,
                indexes: Some(indexes),
            }),
        })
    }

    /// Import a decoded image, producing the matching descriptor alongside
    /// the store. 8-bit variants expand to native precision; unrecognized
    /// layouts fall back through RGBA8.
    pub fn from_dynamic_image(source: &DynamicImage) -> (ImageDescriptor, MemoryPixelStore) {
        let (width, height) = source.dimensions();
        let columns = width as usize;
        let rows = height as usize;

        let (depth, colorspace, alpha, pixels) = match source {
            DynamicImage::ImageLuma8(buf) => {
                let pixels = buf
                    .pixels()
                    .map(|p| QuantumPixel::gray(scale_char_to_quantum(p.0[0])))
                    .collect();
                (8, ColorSpace::Gray, false, pixels)
            }
            DynamicImage::ImageLumaA8(buf) => {
                let pixels = buf
                    .pixels()
                    .map(|p| {
                        let value = scale_char_to_quantum(p.0[0]);
                        QuantumPixel::rgba(value, value, value, scale_char_to_quantum(p.0[1]))
                    })
                    .collect();
                (8, ColorSpace::Gray, true, pixels)
            }
            DynamicImage::ImageRgb8(buf) => {
                let pixels = buf
                    .pixels()
                    .map(|p| {
                        QuantumPixel::rgb(
                            scale_char_to_quantum(p.0[0]),
                            scale_char_to_quantum(p.0[1]),
                            scale_char_to_quantum(p.0[2]),
                        )
                    })
                    .collect();
                (8, ColorSpace::Srgb, false, pixels)
            }
            DynamicImage::ImageRgba8(buf) => {
                let pixels = buf
                    .pixels()
                    .map(|p| {
                        QuantumPixel::rgba(
                            scale_char_to_quantum(p.0[0]),
                            scale_char_to_quantum(p.0[1]),
                            scale_char_to_quantum(p.0[2]),
                            scale_char_to_quantum(p.0[3]),
                        )
                    })
                    .collect();
                (8, ColorSpace::Srgb, true, pixels)
            }
            DynamicImage::ImageLuma16(buf) => {
                let pixels = buf.pixels().map(|p| QuantumPixel::gray(p.0[0])).collect();
                (16, ColorSpace::Gray, false, pixels)
            }
            DynamicImage::ImageLumaA16(buf) => {
                let pixels = buf
                    .pixels()
                    .map(|p| QuantumPixel::rgba(p.0[0], p.0[0], p.0[0], p.0[1]))
                    .collect();
                (16, ColorSpace::Gray, true, pixels)
            }
            DynamicImage::ImageRgb16(buf) => {
                let pixels = buf
                    .pixels()
                    .map(|p| QuantumPixel::rgb(p.0[0], p.0[1], p.0[2]))
                    .collect();
                (16, ColorSpace::Srgb, false, pixels)
            }
            DynamicImage::ImageRgba16(buf) => {
                let pixels = buf
                    .pixels()
                    .map(|p| QuantumPixel::rgba(p.0[0], p.0[1], p.0[2], p.0[3]))
                    .collect();
                (16, ColorSpace::Srgb, true, pixels)
            }
            other => {
                let buf = other.to_rgba8();
                let pixels = buf
                    .pixels()
                    .map(|p| {
                        QuantumPixel::rgba(
                            scale_char_to_quantum(p.0[0]),
                            scale_char_to_quantum(p.0[1]),
                            scale_char_to_quantum(p.0[2]),
                            scale_char_to_quantum(p.0[3]),
                        )
                    })
                    .collect();
                (8, ColorSpace::Srgb, true, pixels)
            }
        };

        let image = ImageDescriptor::new(columns, rows)
            .with_depth(depth)
            .with_colorspace(colorspace)
            .with_alpha(alpha);
        let store = MemoryPixelStore {
            columns,
            rows,
            plane: RwLock::new(Plane {
                pixels,
                indexes: None,
            }),
        };
        (image, store)
    }
}

impl PixelSource for MemoryPixelStore {
    fn columns(&self) -> usize {
        self.columns
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn read_row(&self, x: i64, y: i64, width: usize) -> Result<PixelRow> {
        if self.columns == 0 || self.rows == 0 {
            return Err(AttributeError::RowRead {
                y: y.max(0) as usize,
            });
        }
        let plane = self.plane.read().expect("pixel plane lock poisoned");
        let row = y.clamp(0, self.rows as i64 - 1) as usize;
        let mut pixels = Vec::with_capacity(width);
        let mut indexes = plane.indexes.as_ref().map(|_| Vec::with_capacity(width));
        for offset in 0..width {
            let col = (x + offset as i64).clamp(0, self.columns as i64 - 1) as usize;
            let at = row * self.columns + col;
            pixels.push(plane.pixels[at]);
            if let (Some(out), Some(src)) = (indexes.as_mut(), plane.indexes.as_ref()) {
                out.push(src[at]);
            }
        }
        Ok(PixelRow { pixels, indexes })
    }
}

impl PixelStore for MemoryPixelStore {
    fn write_row(&self, y: usize, row: &PixelRow) -> Result<()> {
        if y >= self.rows {
            return Err(AttributeError::RowWrite { y });
        }
        if row.len() != self.columns {
            return Err(AttributeError::GeometryMismatch {
                expected: self.columns,
                actual: row.len(),
            });
        }
        let mut plane = self.plane.write().expect("pixel plane lock poisoned");
        let start = y * self.columns;
        plane.pixels[start..start + self.columns].copy_from_slice(&row.pixels);
        if let (Some(dest), Some(src)) = (plane.indexes.as_mut(), row.indexes.as_ref()) {
            dest[start..start + self.columns].copy_from_slice(src);
        }
        Ok(())
    }
}
