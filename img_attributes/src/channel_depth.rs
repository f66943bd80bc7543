//! Bit-Depth Probing and Normalization
//!
//! `channel_depth` finds the smallest bit depth that reproduces every
//! selected channel value exactly through a quantize/expand round trip.
//! Each worker keeps its own running depth estimate, never resetting it
//! between pixels: once a pixel forces depth `d`, shallower probes are
//! pointless for the rest of that worker's share. The answer is the maximum
//! across workers. A worker that saturates at native precision raises a
//! shared flag so remaining rows are skipped; the answer cannot grow
//! further.
//!
//! `set_channel_depth` is the writing counterpart: it rescales selected
//! channels through the round trip at the target depth, touching pixels
//! only when the current effective depth actually exceeds the target.

use crate::context::ExecutionContext;
use crate::descriptor::{ImageDescriptor, StorageClass};
use crate::errors::{AttributeError, Result};
use crate::facade::{PixelSource, PixelStore};
use crate::pixel::QuantumPixel;
use crate::quantum::{quantum_range, round_trip, Quantum, QUANTUM_DEPTH};
use crate::types::ChannelMask;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, trace};

const NO_FAILURE: usize = usize::MAX;

/// Effective depth over all channels.
pub fn image_depth<S>(image: &ImageDescriptor, source: &S, ctx: &ExecutionContext) -> Result<u32>
where
    S: PixelSource + ?Sized,
{
    channel_depth(image, source, ctx, ChannelMask::ALL)
}

/// Smallest depth, 1..=`QUANTUM_DEPTH`, that represents every selected
/// channel value of the image exactly.
///
/// Palette images without alpha probe the colormap instead of pixel data;
/// the colormap is the full set of distinct colors.
pub fn channel_depth<S>(
    image: &ImageDescriptor,
    source: &S,
    ctx: &ExecutionContext,
    mask: ChannelMask,
) -> Result<u32>
where
    S: PixelSource + ?Sized,
{
    trace!(mask = %mask, "probing channel depth");
    if image.storage_class == StorageClass::Pseudo && !image.alpha {
        if let Some(colormap) = image.colormap.as_deref() {
            return Ok(colormap_depth(colormap, mask, ctx));
        }
    }

    let saturated = AtomicBool::new(false);
    let failed_row = AtomicUsize::new(NO_FAILURE);

    let depth = ctx.install(|| {
        (0..image.rows)
            .into_par_iter()
            .fold(
                || 1u32,
                |depth, y| {
                    if saturated.load(Ordering::Relaxed) {
                        return depth;
                    }
                    let row = match source.read_row(0, y as i64, image.columns) {
                        Ok(row) => row,
                        Err(_) => {
                            failed_row.fetch_min(y, Ordering::Relaxed);
                            return depth;
                        }
                    };
                    let mut depth = depth;
                    for x in 0..image.columns {
                        depth = probe_pixel(image, mask, &row.pixels[x], row.index_at(x), depth);
                        if depth >= QUANTUM_DEPTH {
                            break;
                        }
                    }
                    if depth >= QUANTUM_DEPTH {
                        saturated.store(true, Ordering::Relaxed);
                    }
                    depth
                },
            )
            .reduce(|| 1, u32::max)
    });

    let failed = failed_row.load(Ordering::Relaxed);
    if failed != NO_FAILURE {
        return Err(AttributeError::RowRead { y: failed });
    }
    Ok(depth)
}

/// Raise `depth` until every selected channel of `pixel` survives the
/// round trip at that depth.
fn probe_pixel(
    image: &ImageDescriptor,
    mask: ChannelMask,
    pixel: &QuantumPixel,
    index: Option<Quantum>,
    mut depth: u32,
) -> u32 {
    while depth < QUANTUM_DEPTH {
        let range = quantum_range(depth);
        let mut mismatch = false;
        if mask.intersects(ChannelMask::RED) {
            mismatch |= round_trip(pixel.red, range) != pixel.red;
        }
        if mask.intersects(ChannelMask::GREEN) {
            mismatch |= round_trip(pixel.green, range) != pixel.green;
        }
        if mask.intersects(ChannelMask::BLUE) {
            mismatch |= round_trip(pixel.blue, range) != pixel.blue;
        }
        if mask.intersects(ChannelMask::OPACITY) && image.alpha {
            mismatch |= round_trip(pixel.opacity, range) != pixel.opacity;
        }
        if mask.intersects(ChannelMask::INDEX) && image.colorspace.is_separation() {
            if let Some(index) = index {
                mismatch |= round_trip(index, range) != index;
            }
        }
        if !mismatch {
            break;
        }
        depth += 1;
    }
    depth
}

/// Depth probe over palette entries; only the color channels participate.
fn colormap_depth(colormap: &[QuantumPixel], mask: ChannelMask, ctx: &ExecutionContext) -> u32 {
    ctx.install(|| {
        colormap
            .par_iter()
            .fold(
                || 1u32,
                |mut depth, entry| {
                    while depth < QUANTUM_DEPTH {
                        let range = quantum_range(depth);
                        let mut mismatch = false;
                        if mask.intersects(ChannelMask::RED) {
                            mismatch |= round_trip(entry.red, range) != entry.red;
                        }
                        if mask.intersects(ChannelMask::GREEN) {
                            mismatch |= round_trip(entry.green, range) != entry.green;
                        }
                        if mask.intersects(ChannelMask::BLUE) {
                            mismatch |= round_trip(entry.blue, range) != entry.blue;
                        }
                        if !mismatch {
                            break;
                        }
                        depth += 1;
                    }
                    depth
                },
            )
            .reduce(|| 1, u32::max)
    })
}

/// Set the depth of all channels.
pub fn set_image_depth<S>(
    image: &mut ImageDescriptor,
    store: &S,
    ctx: &ExecutionContext,
    depth: u32,
) -> Result<()>
where
    S: PixelStore + ?Sized,
{
    set_channel_depth(image, store, ctx, ChannelMask::ALL, depth)
}

/// Re-quantize the selected channels to `depth` bits and record `depth` as
/// the image's declared depth.
///
/// When the effective depth already fits the target, pixel data is left
/// untouched and only the declared depth changes. Otherwise every row is
/// rescaled in parallel; a failed row is skipped and reported after the
/// pass completes, without aborting the remaining rows. Palette entries are
/// rescaled as well for palette-backed images.
pub fn set_channel_depth<S>(
    image: &mut ImageDescriptor,
    store: &S,
    ctx: &ExecutionContext,
    mask: ChannelMask,
    depth: u32,
) -> Result<()>
where
    S: PixelStore + ?Sized,
{
    let current = image_depth(image, store, ctx)?;
    if current <= depth.min(QUANTUM_DEPTH) {
        debug!(current, depth, "depth already sufficient, fast path");
        image.depth = depth;
        return Ok(());
    }

    debug!(current, depth, mask = %mask, "rescaling channels");
    let range = quantum_range(depth);
    let separation = image.colorspace.is_separation();
    let alpha = image.alpha;
    let failed_read = AtomicUsize::new(NO_FAILURE);
    let failed_write = AtomicUsize::new(NO_FAILURE);

    ctx.install(|| {
        (0..image.rows).into_par_iter().for_each(|y| {
            if failed_read.load(Ordering::Relaxed) != NO_FAILURE
                || failed_write.load(Ordering::Relaxed) != NO_FAILURE
            {
                return;
            }
            let mut row = match store.read_row(0, y as i64, image.columns) {
                Ok(row) => row,
                Err(_) => {
                    failed_read.fetch_min(y, Ordering::Relaxed);
                    return;
                }
            };
            for pixel in &mut row.pixels {
                if mask.intersects(ChannelMask::RED) {
                    pixel.red = round_trip(pixel.red, range);
                }
                if mask.intersects(ChannelMask::GREEN) {
                    pixel.green = round_trip(pixel.green, range);
                }
                if mask.intersects(ChannelMask::BLUE) {
                    pixel.blue = round_trip(pixel.blue, range);
                }
                if mask.intersects(ChannelMask::OPACITY) && alpha {
                    pixel.opacity = round_trip(pixel.opacity, range);
                }
            }
            if mask.intersects(ChannelMask::INDEX) && separation {
                if let Some(indexes) = row.indexes.as_mut() {
                    for index in indexes {
                        *index = round_trip(*index, range);
                    }
                }
            }
            if store.write_row(y, &row).is_err() {
                failed_write.fetch_min(y, Ordering::Relaxed);
            }
        });
    });

    if let Some(colormap) = image.colormap.as_mut() {
        for entry in colormap {
            if mask.intersects(ChannelMask::RED) {
                entry.red = round_trip(entry.red, range);
            }
            if mask.intersects(ChannelMask::GREEN) {
                entry.green = round_trip(entry.green, range);
            }
            if mask.intersects(ChannelMask::BLUE) {
                entry.blue = round_trip(entry.blue, range);
            }
            if mask.intersects(ChannelMask::OPACITY) {
                entry.opacity = round_trip(entry.opacity, range);
            }
        }
    }

    image.depth = depth;
    let read = failed_read.load(Ordering::Relaxed);
    if read != NO_FAILURE {
        return Err(AttributeError::RowRead { y: read });
    }
    let write = failed_write.load(Ordering::Relaxed);
    if write != NO_FAILURE {
        return Err(AttributeError::RowWrite { y: write });
    }
    Ok(())
}
