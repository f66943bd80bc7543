//! Color Similarity Predicates
//!
//! Tolerance-aware "same color" tests in normalized channel space, plus the
//! exact per-pixel predicates the classification scans build on. Distance
//! accumulates squared per-channel differences and short-circuits as soon as
//! the running sum exceeds the squared fuzz threshold, so the common
//! "obviously different" case costs one channel.

use crate::pixel::{PixelSample, QuantumPixel};
use crate::quantum::{Quantum, QUANTUM_RANGE};

/// Decide whether two samples are the same color within `fuzz`.
///
/// `fuzz` is a distance in normalized [0, 1] channel space; 0 demands exact
/// equality. The opacity channel participates only when both samples carry
/// alpha, and the auxiliary index only when both samples carry one.
pub fn is_similar(p: &PixelSample, q: &PixelSample, fuzz: f64) -> bool {
    let threshold = fuzz.max(0.0) * fuzz.max(0.0);
    let mut distance = 0.0;

    if p.has_alpha && q.has_alpha {
        let delta = p.opacity - q.opacity;
        distance += delta * delta;
        if distance > threshold {
            return false;
        }
    }
    if let (Some(pi), Some(qi)) = (p.index, q.index) {
        let delta = pi - qi;
        distance += delta * delta;
        if distance > threshold {
            return false;
        }
    }

    let delta = p.red - q.red;
    distance += delta * delta;
    if distance > threshold {
        return false;
    }
    let delta = p.green - q.green;
    distance += delta * delta;
    if distance > threshold {
        return false;
    }
    let delta = p.blue - q.blue;
    distance += delta * delta;
    distance <= threshold
}

/// All three color channels equal.
#[inline]
pub fn is_gray_pixel(pixel: &QuantumPixel) -> bool {
    pixel.red == pixel.green && pixel.green == pixel.blue
}

/// Gray and at an extreme: pure black or pure white.
#[inline]
pub fn is_monochrome_pixel(pixel: &QuantumPixel) -> bool {
    is_gray_pixel(pixel) && (pixel.red == 0 || pixel.red == QUANTUM_RANGE)
}

/// Fully opaque under alpha convention.
#[inline]
pub fn is_opaque_pixel(opacity: Quantum) -> bool {
    opacity == QUANTUM_RANGE
}
