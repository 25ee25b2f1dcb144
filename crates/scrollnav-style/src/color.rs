#![forbid(unsafe_code)]

//! RGBA colors with straight (non-premultiplied) alpha.

use crate::interpolate::{Lerp, lerp_f64};

/// An sRGB color with an `f64` alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0.0);

    /// Create a color. Alpha outside `[0, 1]` is clamped when formatted or
    /// blended, not here, so `const` construction stays possible.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Same channels with another alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Alpha clamped into `[0, 1]` (NaN reads as fully transparent).
    #[inline]
    pub fn alpha(&self) -> f64 {
        if self.a.is_nan() { 0.0 } else { self.a.clamp(0.0, 1.0) }
    }

    /// Fully transparent, regardless of channels.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.alpha() == 0.0
    }
}

impl Lerp for Rgba {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            r: lerp_channel(self.r, to.r, t),
            g: lerp_channel(self.g, to.g, t),
            b: lerp_channel(self.b, to.b, t),
            a: lerp_f64(self.alpha(), to.alpha(), t),
        }
    }
}

#[inline]
fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    lerp_f64(f64::from(from), f64::from(to), t).round() as u8
}

/// Format a float with at most `decimals` fractional digits and no
/// trailing zeros: `0.8`, `1`, `0.25`.
pub(crate) fn fmt_trimmed(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        s
    };
    if s == "-0" { "0".to_owned() } else { s }
}

impl core::fmt::Display for Rgba {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            fmt_trimmed(self.alpha(), 3)
        )
    }
}
