#![forbid(unsafe_code)]

//! CSS lengths.

use crate::color::fmt_trimmed;
use crate::interpolate::{Lerp, lerp_f64};

/// Length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Px,
    Percent,
    Rem,
}

impl Unit {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Percent => "%",
            Self::Rem => "rem",
        }
    }
}

/// A scalar with a unit, e.g. `20px` or `70%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub const ZERO_PX: Self = Self::px(0.0);

    pub const fn px(value: f64) -> Self {
        Self { value, unit: Unit::Px }
    }

    pub const fn percent(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    pub const fn rem(value: f64) -> Self {
        Self { value, unit: Unit::Rem }
    }

    /// Resolve to pixels. Percentages resolve against `reference`, rems
    /// against `root_font_px`.
    pub fn to_px(self, reference: f64, root_font_px: f64) -> f64 {
        match self.unit {
            Unit::Px => self.value,
            Unit::Percent => reference * self.value / 100.0,
            Unit::Rem => root_font_px * self.value,
        }
    }
}

impl Lerp for Length {
    /// Same-unit lengths blend per value. Mixed units cannot be blended
    /// without layout context, so they switch discretely at the midpoint.
    fn lerp(&self, to: &Self, t: f64) -> Self {
        if self.unit == to.unit {
            Self {
                value: lerp_f64(self.value, to.value, t),
                unit: self.unit,
            }
        } else if t < 0.5 {
            *self
        } else {
            *to
        }
    }
}

impl core::fmt::Display for Length {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", fmt_trimmed(self.value, 3), self.unit.suffix())
    }
}
