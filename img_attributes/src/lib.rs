//! Image attribute inference and bit-depth normalization engine.
//!
//! This crate derives high-level properties of a raster image purely by
//! scanning its pixel data, and can re-quantize channels to a target depth:
//! - Tight content bounding box with fuzz-tolerant background comparison
//! - Minimal effective bit depth per channel (exact round-trip probing)
//! - Color-class inference (bilevel, grayscale, palette, true color,
//!   separation, each with or without alpha)
//! - In-place channel re-quantization with colormap support
//!
//! Pixels are consumed through the row-oriented [`PixelSource`] /
//! [`PixelStore`] facade; the engine owns no storage, decodes no formats,
//! and converts no color spaces. Parallel scans run on an explicit
//! [`ExecutionContext`] worker pool.

pub mod bounding_box;
pub mod channel_depth;
pub mod classify;
pub mod context;
pub mod descriptor;
pub mod errors;
pub mod facade;
pub mod pixel;
pub mod quantum;
pub mod similarity;
pub mod types;


pub use errors::{AttributeError, Result};

pub use types::{ChannelMask, ImageType, Rectangle};

pub use descriptor::{ColorSpace, ImageDescriptor, StorageClass};

pub use pixel::{PixelRow, PixelSample, QuantumPixel};

pub use quantum::{
    legal_quantum_depth, quantum_range, round_trip, scale_any_to_quantum, scale_char_to_quantum,
    scale_quantum_to_any, Quantum, QUANTUM_DEPTH, QUANTUM_RANGE, QUANTUM_SCALE,
};

pub use similarity::{is_gray_pixel, is_monochrome_pixel, is_opaque_pixel, is_similar};

pub use facade::{MemoryPixelStore, PixelSource, PixelStore};

pub use context::{optimal_workers, ExecutionContext, WorkerConfig};

pub use bounding_box::bounding_box;

pub use channel_depth::{channel_depth, image_depth, set_channel_depth, set_image_depth};

pub use classify::{
    classify_gray, classify_monochrome, image_type, is_gray_image, is_monochrome_image,
    is_opaque_image,
};
