//! Length, font size, and color units used by the presentation model.

use std::fmt;

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// A length in English Metric Units, the native OOXML unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Emu(pub i64);

impl Emu {
    /// Convert inches to EMU, rounding to the nearest unit.
    pub fn from_inches(inches: f64) -> Self {
        Self((inches * EMU_PER_INCH as f64).round() as i64)
    }

    /// The length in inches.
    pub fn inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }
}

/// A font size in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Points(pub u32);

impl Points {
    /// Size in hundredths of a point, as stored in `a:rPr/@sz`.
    pub fn centipoints(self) -> u32 {
        self.0 * 100
    }

    /// Parse a `sz` attribute value. Fractional points are truncated.
    pub fn from_centipoints(sz: u32) -> Self {
        Self(sz / 100)
    }
}

/// An sRGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Six-digit uppercase hex, e.g. `007AFF`.
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Parse a six-digit hex string (case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}
