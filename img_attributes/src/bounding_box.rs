//! Bounding Box Reducer
//!
//! Trims an image canvas to the rectangle that actually contains content.
//! Background is sampled at three corners: top-left, top-right, and
//! bottom-left. The bottom-right corner is never sampled; consumers depend
//! on that exact asymmetry, so it stays. A pixel that differs from the
//! relevant corner sample (within the image fuzz) extends the box.
//!
//! While scanning, `width` and `height` hold the rightmost foreground column
//! and bottommost foreground row; they become true extents only in the final
//! conversion step.

use crate::context::ExecutionContext;
use crate::descriptor::ImageDescriptor;
use crate::errors::{AttributeError, Result};
use crate::facade::PixelSource;
use crate::pixel::PixelSample;
use crate::similarity::is_similar;
use crate::types::Rectangle;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{trace, warn};

const NO_FAILURE: usize = usize::MAX;

/// Compute the tight content bounding box of an image.
///
/// Returns a degenerate rectangle (zero width or height) when the canvas is
/// uniformly background-colored or when the corner samples cannot be read;
/// a row failure mid-scan fails the call.
pub fn bounding_box<S>(
    image: &ImageDescriptor,
    source: &S,
    ctx: &ExecutionContext,
) -> Result<Rectangle>
where
    S: PixelSource + ?Sized,
{
    trace!(
        columns = image.columns,
        rows = image.rows,
        "computing bounding box"
    );
    let empty = Rectangle::new(image.columns, image.rows, 0, 0);

    // Corner background samples. A failed corner read is a soft failure:
    // the canvas has no readable geometry, report it as empty.
    let corners = [
        (0i64, 0i64),
        (image.columns as i64 - 1, 0),
        (0, image.rows as i64 - 1),
    ];
    let mut targets = Vec::with_capacity(3);
    for (x, y) in corners {
        match source.read_row(x, y, 1) {
            Ok(row) => targets.push(PixelSample::from_row(image, &row, 0)),
            Err(_) => {
                warn!("geometry does not contain image (corner sample unreadable)");
                return Ok(empty);
            }
        }
    }
    let (target_left, target_right, target_bottom) = (&targets[0], &targets[1], &targets[2]);

    let fuzz = image.fuzz;
    let failed_row = AtomicUsize::new(NO_FAILURE);

    let merge = |a: Rectangle, b: Rectangle| Rectangle {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: a.width.max(b.width),
        height: a.height.max(b.height),
    };

    let mut bounds = ctx.install(|| {
        (0..image.rows)
            .into_par_iter()
            .fold(
                || empty,
                |mut acc, y| {
                    if failed_row.load(Ordering::Relaxed) != NO_FAILURE {
                        return acc;
                    }
                    let row = match source.read_row(0, y as i64, image.columns) {
                        Ok(row) => row,
                        Err(_) => {
                            failed_row.fetch_min(y, Ordering::Relaxed);
                            return acc;
                        }
                    };
                    for x in 0..image.columns {
                        let pixel = PixelSample::from_row(image, &row, x);
                        if x < acc.x && !is_similar(&pixel, target_left, fuzz) {
                            acc.x = x;
                        }
                        if x > acc.width && !is_similar(&pixel, target_right, fuzz) {
                            acc.width = x;
                        }
                        if y < acc.y && !is_similar(&pixel, target_left, fuzz) {
                            acc.y = y;
                        }
                        if y > acc.height && !is_similar(&pixel, target_bottom, fuzz) {
                            acc.height = y;
                        }
                    }
                    acc
                },
            )
            .reduce(|| empty, merge)
    });

    let failed = failed_row.load(Ordering::Relaxed);
    if failed != NO_FAILURE {
        return Err(AttributeError::RowRead { y: failed });
    }

    if bounds.width == 0 || bounds.height == 0 {
        warn!("geometry does not contain image");
    } else {
        bounds.width = (bounds.width + 1).saturating_sub(bounds.x);
        bounds.height = (bounds.height + 1).saturating_sub(bounds.y);
    }
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::MemoryPixelStore;
    use crate::pixel::QuantumPixel;
    use crate::quantum::QUANTUM_RANGE;
    use proptest::prelude::*;

    fn ctx() -> ExecutionContext {
        ExecutionContext::new(2).unwrap()
    }

    fn white_canvas_with_black(
        columns: usize,
        rows: usize,
        marks: &[(usize, usize)],
    ) -> MemoryPixelStore {
        let mut pixels = vec![QuantumPixel::gray(QUANTUM_RANGE); columns * rows];
        for &(x, y) in marks {
            pixels[y * columns + x] = QuantumPixel::gray(0);
        }
        MemoryPixelStore::from_pixels(columns, rows, pixels).unwrap()
    }

    #[test]
    fn test_single_mark() {
        let image = ImageDescriptor::new(4, 4);
        let store = white_canvas_with_black(4, 4, &[(1, 1)]);
        let bounds = bounding_box(&image, &store, &ctx()).unwrap();
        assert_eq!(bounds, Rectangle::new(1, 1, 1, 1));
    }

    #[test]
    fn test_two_marks_span() {
        let image = ImageDescriptor::new(6, 5);
        let store = white_canvas_with_black(6, 5, &[(1, 1), (4, 3)]);
        let bounds = bounding_box(&image, &store, &ctx()).unwrap();
        assert_eq!(bounds, Rectangle::new(1, 1, 4, 3));
    }

    #[test]
    fn test_uniform_canvas_is_empty() {
        let image = ImageDescriptor::new(10, 10);
        let store = MemoryPixelStore::filled(10, 10, QuantumPixel::gray(32896));
        let bounds = bounding_box(&image, &store, &ctx()).unwrap();
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_empty_canvas_soft_fails() {
        let image = ImageDescriptor::new(0, 0);
        let store = MemoryPixelStore::filled(0, 0, QuantumPixel::gray(0));
        let bounds = bounding_box(&image, &store, &ctx()).unwrap();
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_fuzz_absorbs_near_background() {
        let image = ImageDescriptor::new(4, 4).with_fuzz(0.05);
        let mut pixels = vec![QuantumPixel::gray(QUANTUM_RANGE); 16];
        // Slightly off-white: within fuzz of the corner sample.
        pixels[5] = QuantumPixel::gray(QUANTUM_RANGE - 655);
        // Far from background.
        pixels[10] = QuantumPixel::gray(0);
        let store = MemoryPixelStore::from_pixels(4, 4, pixels).unwrap();
        let bounds = bounding_box(&image, &store, &ctx()).unwrap();
        assert_eq!(bounds, Rectangle::new(2, 2, 1, 1));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn bounds_contained_in_canvas(
            columns in 2usize..12,
            rows in 2usize..12,
            mark_x in 0usize..12,
            mark_y in 0usize..12,
        ) {
            let mark = (mark_x % columns, mark_y % rows);
            let image = ImageDescriptor::new(columns, rows);
            let store = white_canvas_with_black(columns, rows, &[mark]);
            let bounds = bounding_box(&image, &store, &ctx()).unwrap();
            if !bounds.is_empty() {
                prop_assert!(bounds.contained_in(columns, rows));
                // The mark is inside the reported box.
                prop_assert!(bounds.x <= mark.0 && mark.0 < bounds.x + bounds.width);
                prop_assert!(bounds.y <= mark.1 && mark.1 < bounds.y + bounds.height);
            }
        }
    }
}
