//! Colour and LED-index value types.

/// An 8-bit-per-channel RGB colour at the API boundary.
///
/// Drivers may reorder or narrow channels for their wire format; this
/// type is always R, G, B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// True when every channel is zero.
    pub fn is_dark(self) -> bool {
        self == Rgb::BLACK
    }

    /// Scale each channel by `dim` (clamped to [0, 1]), rounding to
    /// nearest and clamping to the channel range.
    pub fn scale(self, dim: f64) -> Rgb {
        let dim = dim.clamp(0.0, 1.0);
        let scale = |channel: u8| ((channel as f64 * dim).round()).clamp(0.0, 255.0) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Quantise to the nearest of the eight 3-bit colours.
    ///
    /// Channels at or above half intensity saturate; the rest go dark.
    /// Used before encoding for devices with single-bit channels.
    pub fn quantize(self) -> Rgb {
        let bit = |channel: u8| if channel >= 128 { 255 } else { 0 };
        Rgb::new(bit(self.r), bit(self.g), bit(self.b))
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

/// Target LED on a device: 0 addresses every LED, 1..=N one of N.
///
/// Indices above a device's LED count are clamped away by the engine
/// (warned no-op, never an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedIndex(pub u8);

impl LedIndex {
    /// Every LED on the device.
    pub const ALL: LedIndex = LedIndex(0);

    pub fn is_all(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for LedIndex {
    fn from(index: u8) -> Self {
        LedIndex(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_identity_and_zero() {
        let color = Rgb::new(10, 200, 255);
        assert_eq!(color.scale(1.0), color);
        assert_eq!(color.scale(0.0), Rgb::BLACK);
    }

    #[test]
    fn scale_rounds_to_nearest() {
        assert_eq!(Rgb::new(255, 0, 0).scale(0.5), Rgb::new(128, 0, 0));
        assert_eq!(Rgb::new(5, 0, 0).scale(0.5), Rgb::new(3, 0, 0)); // 2.5 rounds up
    }

    #[test]
    fn scale_clamps_dim_factor() {
        let color = Rgb::new(100, 100, 100);
        assert_eq!(color.scale(2.0), color);
        assert_eq!(color.scale(-1.0), Rgb::BLACK);
    }

    #[test]
    fn quantize_thresholds_at_half() {
        assert_eq!(Rgb::new(128, 127, 255).quantize(), Rgb::new(255, 0, 255));
        assert_eq!(Rgb::BLACK.quantize(), Rgb::BLACK);
    }

    #[test]
    fn led_index_all() {
        assert!(LedIndex::ALL.is_all());
        assert!(!LedIndex(1).is_all());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Dim scaling is the documented per-channel law.
        #[test]
        fn prop_scale_law(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
                          dim in 0.0f64..=1.0) {
            let scaled = Rgb::new(r, g, b).scale(dim);
            prop_assert_eq!(scaled.r, (r as f64 * dim).round() as u8);
            prop_assert_eq!(scaled.g, (g as f64 * dim).round() as u8);
            prop_assert_eq!(scaled.b, (b as f64 * dim).round() as u8);
        }

        /// Quantised colours only ever use saturated channels.
        #[test]
        fn prop_quantize_saturates(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let q = Rgb::new(r, g, b).quantize();
            for channel in [q.r, q.g, q.b] {
                prop_assert!(channel == 0 || channel == 255);
            }
        }
    }
}
