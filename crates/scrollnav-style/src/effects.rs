#![forbid(unsafe_code)]

//! Box shadows and two-stop linear gradients.

use crate::color::{Rgba, fmt_trimmed};
use crate::interpolate::{Lerp, lerp_f64};

/// A single outer box shadow.
///
/// A shadow with a transparent color and no geometry is CSS `none`. Blending
/// from `none` towards a real shadow is done by starting from
/// [`BoxShadow::faded`] of the target, so every channel grows together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Rgba,
}

impl BoxShadow {
    pub const NONE: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        blur: 0.0,
        color: Rgba::TRANSPARENT,
    };

    pub const fn new(offset_x: f64, offset_y: f64, blur: f64, color: Rgba) -> Self {
        Self {
            offset_x,
            offset_y,
            blur,
            color,
        }
    }

    /// Zero-intensity version of this shadow: no geometry, same hue, no alpha.
    #[must_use]
    pub const fn faded(self) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            blur: 0.0,
            color: self.color.with_alpha(0.0),
        }
    }

    /// Shadow strength in `[0, 1]`, read from the color's alpha.
    pub fn intensity(&self) -> f64 {
        self.color.alpha()
    }

    /// Renders as nothing.
    pub fn is_none(&self) -> bool {
        self.color.is_transparent()
            || (self.offset_x == 0.0 && self.offset_y == 0.0 && self.blur == 0.0)
    }
}

impl Lerp for BoxShadow {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            offset_x: lerp_f64(self.offset_x, to.offset_x, t),
            offset_y: lerp_f64(self.offset_y, to.offset_y, t),
            blur: lerp_f64(self.blur, to.blur, t),
            color: self.color.lerp(&to.color, t),
        }
    }
}

impl core::fmt::Display for BoxShadow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_none() {
            return f.write_str("none");
        }
        write!(
            f,
            "{}px {}px {}px {}",
            fmt_trimmed(self.offset_x, 2),
            fmt_trimmed(self.offset_y, 2),
            fmt_trimmed(self.blur, 2),
            self.color
        )
    }
}

/// A two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    /// CSS direction keyword, e.g. `"to bottom"`.
    pub direction: &'static str,
    pub from: Rgba,
    pub to: Rgba,
}

impl LinearGradient {
    pub const fn new(direction: &'static str, from: Rgba, to: Rgba) -> Self {
        Self {
            direction,
            from,
            to,
        }
    }

    /// Both stops fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.from.is_transparent() && self.to.is_transparent()
    }
}

impl Lerp for LinearGradient {
    /// Stops blend independently; the direction comes from the start value.
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            direction: self.direction,
            from: self.from.lerp(&to.from, t),
            to: self.to.lerp(&to.to, t),
        }
    }
}

impl core::fmt::Display for LinearGradient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "linear-gradient({}, {}, {})", self.direction, self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED_SHADOW: BoxShadow = BoxShadow::new(0.0, 4.0, 8.0, Rgba::rgba(169, 10, 12, 0.2));

    #[test]
    fn none_formats_as_none() {
        assert_eq!(BoxShadow::NONE.to_string(), "none");
        assert_eq!(RED_SHADOW.faded().to_string(), "none");
    }

    #[test]
    fn shadow_formats_as_css() {
        assert_eq!(RED_SHADOW.to_string(), "0px 4px 8px rgba(169,10,12,0.2)");
    }

    #[test]
    fn shadow_grows_from_faded() {
        let mid = RED_SHADOW.faded().lerp(&RED_SHADOW, 0.5);
        assert_eq!(mid.offset_y, 2.0);
        assert_eq!(mid.blur, 4.0);
        assert!((mid.intensity() - 0.1).abs() < 1e-12);
        assert_eq!(mid.color.r, 169);
    }

    #[test]
    fn gradient_blends_each_stop() {
        let from = LinearGradient::new(
            "to bottom",
            Rgba::rgba(10, 25, 47, 0.0),
            Rgba::rgba(10, 25, 47, 0.0),
        );
        let to = LinearGradient::new(
            "to bottom",
            Rgba::rgba(10, 25, 47, 0.8),
            Rgba::rgba(125, 10, 12, 0.2),
        );
        assert!(from.is_transparent());
        assert_eq!(from.lerp(&to, 1.0), to);
        assert_eq!(
            to.to_string(),
            "linear-gradient(to bottom, rgba(10,25,47,0.8), rgba(125,10,12,0.2))"
        );
    }
}
