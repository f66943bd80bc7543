//! Channel Selection Bitmask
//!
//! Scans and re-quantization apply only to the channels selected here. The
//! opacity bit is honored only for images that carry alpha, and the index bit
//! only for separation color spaces; the gating happens at the scan sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMask(u32);

impl ChannelMask {
    pub const RED: ChannelMask = ChannelMask(0x0001);
    pub const GREEN: ChannelMask = ChannelMask(0x0002);
    pub const BLUE: ChannelMask = ChannelMask(0x0004);
    pub const OPACITY: ChannelMask = ChannelMask(0x0008);
    /// Auxiliary index channel: colormap index or separation black channel.
    pub const INDEX: ChannelMask = ChannelMask(0x0020);

    pub const RGB: ChannelMask = ChannelMask(0x0007);
    pub const ALL: ChannelMask = ChannelMask(0x002F);

    pub const fn from_bits(bits: u32) -> Self {
        ChannelMask(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when any channel selected by `other` is also selected here.
    pub const fn intersects(self, other: ChannelMask) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ChannelMask {
    type Output = ChannelMask;

    fn bitor(self, rhs: ChannelMask) -> ChannelMask {
        ChannelMask(self.0 | rhs.0)
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.intersects(ChannelMask::RED) {
            parts.push("red");
        }
        if self.intersects(ChannelMask::GREEN) {
            parts.push("green");
        }
        if self.intersects(ChannelMask::BLUE) {
            parts.push("blue");
        }
        if self.intersects(ChannelMask::OPACITY) {
            parts.push("opacity");
        }
        if self.intersects(ChannelMask::INDEX) {
            parts.push("index");
        }
        write!(f, "{}", parts.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_is_union_of_components() {
        assert_eq!(
            ChannelMask::RED | ChannelMask::GREEN | ChannelMask::BLUE,
            ChannelMask::RGB
        );
    }

    #[test]
    fn test_all_covers_every_channel() {
        for channel in [
            ChannelMask::RED,
            ChannelMask::GREEN,
            ChannelMask::BLUE,
            ChannelMask::OPACITY,
            ChannelMask::INDEX,
        ] {
            assert!(ChannelMask::ALL.intersects(channel));
        }
    }

    #[test]
    fn test_rgb_excludes_opacity_and_index() {
        assert!(!ChannelMask::RGB.intersects(ChannelMask::OPACITY));
        assert!(!ChannelMask::RGB.intersects(ChannelMask::INDEX));
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelMask::RGB.to_string(), "red+green+blue");
        assert_eq!(ChannelMask::OPACITY.to_string(), "opacity");
    }
}
