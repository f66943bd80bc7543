//! Quantum Scaling Module
//!
//! The native fixed-point channel representation and the scaling primitives
//! behind depth probing and re-quantization. A channel value is a `Quantum`
//! (16-bit fixed point); reduced-depth representations are reached through a
//! quantize/expand round trip against the target depth's value range.

/// Native fixed-point channel value.
pub type Quantum = u16;

/// Bits per channel in the native representation.
pub const QUANTUM_DEPTH: u32 = 16;

/// Largest representable channel value.
pub const QUANTUM_RANGE: Quantum = Quantum::MAX;

/// Multiplier mapping a `Quantum` into the normalized [0, 1] range.
pub const QUANTUM_SCALE: f64 = 1.0 / QUANTUM_RANGE as f64;

/// Maximum value representable at `depth` bits.
#[inline]
pub fn quantum_range(depth: u32) -> u64 {
    if depth >= 64 {
        u64::MAX
    } else {
        (1u64 << depth) - 1
    }
}

/// Quantize a native channel value down to a reduced range.
#[inline]
pub fn scale_quantum_to_any(value: Quantum, range: u64) -> u64 {
    (range as f64 * value as f64 / QUANTUM_RANGE as f64 + 0.5) as u64
}

/// Expand a reduced-range value back to native precision.
#[inline]
pub fn scale_any_to_quantum(value: u64, range: u64) -> Quantum {
    if range == 0 {
        return 0;
    }
    let scaled = QUANTUM_RANGE as f64 * value as f64 / range as f64 + 0.5;
    if scaled >= QUANTUM_RANGE as f64 {
        QUANTUM_RANGE
    } else {
        scaled as Quantum
    }
}

/// Quantize-then-expand round trip at the given range.
///
/// A channel value survives the round trip unchanged exactly when the range's
/// bit depth is sufficient to represent it.
#[inline]
pub fn round_trip(value: Quantum, range: u64) -> Quantum {
    scale_any_to_quantum(scale_quantum_to_any(value, range), range)
}

/// Convert a u8 sample (common decoder output) to native precision.
#[inline]
pub fn scale_char_to_quantum(value: u8) -> Quantum {
    value as Quantum * 257
}

/// Round a requested depth up to a legal quantum depth: 8, 16, 32, or 64.
///
/// With `constrain` set the result is additionally capped at the native
/// channel precision of this build.
pub fn legal_quantum_depth(depth: u32, constrain: bool) -> u32 {
    let rounded = match depth {
        0..=8 => 8,
        9..=16 => 16,
        17..=32 => 32,
        _ => 64,
    };
    if constrain {
        rounded.min(QUANTUM_DEPTH)
    } else {
        rounded
    }
}
