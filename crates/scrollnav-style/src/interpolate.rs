#![forbid(unsafe_code)]

//! Piecewise-linear scroll interpolation.
//!
//! An [`InterpolationMapping`] maps a scroll offset through an
//! [`InputRange`] `[a, b]` onto an output pair `(from, to)`:
//!
//! ```text
//! output = from + clamp((offset - a) / (b - a), 0, 1) * (to - from)
//! ```
//!
//! # Invariants
//!
//! 1. Output is constant below `a` (equals `from`) and above `b`
//!    (equals `to`); there is no overshoot.
//! 2. Output is monotonic in `offset` inside `[a, b]` for every scalar
//!    channel.
//! 3. Mappings never share state; evaluating one cannot affect another.
//! 4. No easing is applied here.
//!
//! # Failure Modes
//!
//! - NaN or negative offsets are treated as `0`.
//! - Non-finite or empty input ranges are rejected at construction with
//!   [`InterpolationError`].

/// Scroll range shared by every built-in mapping, in pixels.
///
/// One range keeps all channels moving in lockstep so the navigation bar
/// compacts as a single coherent transition.
pub const CANONICAL_SCROLL_RANGE: InputRange = InputRange { start: 0.0, end: 100.0 };

/// Treat NaN and negative scroll offsets as zero.
#[inline]
pub fn sanitize_offset(offset: f64) -> f64 {
    if offset.is_nan() || offset < 0.0 { 0.0 } else { offset }
}

/// Construction error for interpolation inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpolationError {
    /// A bound was NaN or infinite.
    NonFiniteBound { start: f64, end: f64 },
    /// `start >= end`.
    EmptyRange { start: f64, end: f64 },
}

impl core::fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NonFiniteBound { start, end } => {
                write!(f, "input range bounds must be finite, got [{start}, {end}]")
            }
            Self::EmptyRange { start, end } => {
                write!(f, "input range must satisfy start < end, got [{start}, {end}]")
            }
        }
    }
}

impl std::error::Error for InterpolationError {}

/// Validated input range `[start, end]` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputRange {
    start: f64,
    end: f64,
}

impl InputRange {
    pub fn new(start: f64, end: f64) -> Result<Self, InterpolationError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(InterpolationError::NonFiniteBound { start, end });
        }
        if start >= end {
            return Err(InterpolationError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub const fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Normalized progress of `offset` through the range, in `[0, 1]`.
    #[inline]
    pub fn progress(&self, offset: f64) -> f64 {
        let offset = sanitize_offset(offset);
        ((offset - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }

    /// Where `offset` sits relative to the range.
    pub fn phase(&self, offset: f64) -> RangePhase {
        let p = self.progress(offset);
        if p <= 0.0 {
            RangePhase::Before
        } else if p >= 1.0 {
            RangePhase::After
        } else {
            RangePhase::Within
        }
    }
}

impl Default for InputRange {
    fn default() -> Self {
        CANONICAL_SCROLL_RANGE
    }
}

/// Position of an offset relative to an [`InputRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePhase {
    /// Clamped at the start value.
    Before,
    /// Strictly interpolating.
    Within,
    /// Clamped at the end value.
    After,
}

/// Values that can be linearly blended.
///
/// `t` is always in `[0, 1]`; `lerp(a, b, 0) == a` and `lerp(a, b, 1) == b`
/// must hold exactly.
pub trait Lerp: Clone {
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    #[inline]
    fn lerp(&self, to: &Self, t: f64) -> Self {
        lerp_f64(*self, *to, t)
    }
}

/// Scalar lerp with exact endpoints and no overshoot from rounding.
#[inline]
pub fn lerp_f64(from: f64, to: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }
    let v = from + (to - from) * t;
    v.clamp(from.min(to), from.max(to))
}

/// Maps a scroll offset onto an output value through an input range.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationMapping<T> {
    input: InputRange,
    from: T,
    to: T,
}

impl<T: Lerp> InterpolationMapping<T> {
    pub fn new(input: InputRange, from: T, to: T) -> Self {
        Self { input, from, to }
    }

    /// Mapping over [`CANONICAL_SCROLL_RANGE`].
    pub fn canonical(from: T, to: T) -> Self {
        Self::new(CANONICAL_SCROLL_RANGE, from, to)
    }

    #[inline]
    pub fn input(&self) -> InputRange {
        self.input
    }

    /// Output endpoints `(from, to)`.
    pub fn output(&self) -> (&T, &T) {
        (&self.from, &self.to)
    }

    /// Same outputs over another input range.
    #[must_use]
    pub fn with_input(mut self, input: InputRange) -> Self {
        self.input = input;
        self
    }

    /// Evaluate at a scroll offset.
    pub fn evaluate(&self, offset: f64) -> T {
        self.from.lerp(&self.to, self.input.progress(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> InterpolationMapping<f64> {
        InterpolationMapping::new(InputRange::new(0.0, 100.0).unwrap(), 0.0, 1.0)
    }

    #[test]
    fn clamps_below_and_above() {
        let m = unit();
        assert_eq!(m.evaluate(-5.0), 0.0);
        assert_eq!(m.evaluate(150.0), 1.0);
        assert_eq!(m.evaluate(50.0), 0.5);
    }

    #[test]
    fn nan_and_negative_treated_as_zero() {
        let m = InterpolationMapping::new(InputRange::new(-50.0, 50.0).unwrap(), 0.0, 10.0);
        // Negative offsets sanitize to 0, which is the middle of this range.
        assert_eq!(m.evaluate(-30.0), 5.0);
        assert_eq!(m.evaluate(f64::NAN), 5.0);
    }

    #[test]
    fn infinite_offset_clamps_to_end() {
        assert_eq!(unit().evaluate(f64::INFINITY), 1.0);
    }

    #[test]
    fn decreasing_outputs() {
        let m = InterpolationMapping::canonical(1.0, 0.0);
        assert_eq!(m.evaluate(0.0), 1.0);
        assert_eq!(m.evaluate(25.0), 0.75);
        assert_eq!(m.evaluate(100.0), 0.0);
    }

    #[test]
    fn rejects_bad_ranges() {
        assert_eq!(
            InputRange::new(10.0, 10.0),
            Err(InterpolationError::EmptyRange { start: 10.0, end: 10.0 })
        );
        assert!(matches!(
            InputRange::new(0.0, f64::INFINITY),
            Err(InterpolationError::NonFiniteBound { .. })
        ));
        assert!(InputRange::new(5.0, 1.0).is_err());
    }

    #[test]
    fn phase_reports_clamp_side() {
        let r = CANONICAL_SCROLL_RANGE;
        assert_eq!(r.phase(0.0), RangePhase::Before);
        assert_eq!(r.phase(1.0), RangePhase::Within);
        assert_eq!(r.phase(100.0), RangePhase::After);
        assert_eq!(r.phase(1e9), RangePhase::After);
    }

    #[test]
    fn non_zero_start_range() {
        let m = InterpolationMapping::new(InputRange::new(200.0, 300.0).unwrap(), 0.0, 20.0);
        assert_eq!(m.evaluate(100.0), 0.0);
        assert_eq!(m.evaluate(250.0), 10.0);
        assert_eq!(m.evaluate(400.0), 20.0);
    }

    #[test]
    fn error_display() {
        let e = InputRange::new(3.0, 1.0).unwrap_err();
        assert_eq!(e.to_string(), "input range must satisfy start < end, got [3, 1]");
    }
}
