#![forbid(unsafe_code)]

//! Viewport geometry primitives.
//!
//! All coordinates are CSS pixels in viewport space (origin at the top-left
//! corner of the visible area), matching what `getBoundingClientRect()`
//! reports. Values are `f64` and may be negative: an element scrolled past
//! the top edge has a negative `top`.

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientRect {
    /// Left edge.
    pub left: f64,
    /// Top edge (signed distance from the viewport top).
    pub top: f64,
    /// Width in pixels (never negative).
    pub width: f64,
    /// Height in pixels (never negative).
    pub height: f64,
}

impl ClientRect {
    /// Create a new rectangle. Negative or NaN sizes collapse to zero.
    #[inline]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Rectangle anchored at the origin.
    #[inline]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Area in square pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Same rectangle shifted vertically by `dy`.
    #[inline]
    pub fn offset_y(&self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            ..*self
        }
    }

    /// Overlap with another rectangle, or `None` when they are disjoint.
    ///
    /// Edge-adjacent rectangles produce a zero-area overlap (`Some`), the
    /// same way the browser still reports such targets as intersecting.
    pub fn intersection(&self, other: &ClientRect) -> Option<ClientRect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left <= right && top <= bottom {
            Some(ClientRect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

#[inline]
fn non_negative(v: f64) -> f64 {
    if v.is_nan() || v < 0.0 { 0.0 } else { v }
}

/// One side of a root margin: absolute pixels or a percentage of the
/// corresponding viewport dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    /// Resolve to pixels against a reference length.
    #[inline]
    pub fn resolve(self, reference: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => reference * pct / 100.0,
        }
    }

    fn parse(token: &str) -> Result<Self, RootMarginParseError> {
        let invalid = || RootMarginParseError::InvalidLength(token.to_owned());
        if let Some(num) = token.strip_suffix('%') {
            let v: f64 = num.parse().map_err(|_| invalid())?;
            return if v.is_finite() { Ok(Self::Percent(v)) } else { Err(invalid()) };
        }
        if let Some(num) = token.strip_suffix("px") {
            let v: f64 = num.parse().map_err(|_| invalid())?;
            return if v.is_finite() { Ok(Self::Px(v)) } else { Err(invalid()) };
        }
        // A bare zero is the only unitless length CSS accepts.
        match token.parse::<f64>() {
            Ok(v) if v == 0.0 => Ok(Self::Px(0.0)),
            _ => Err(invalid()),
        }
    }
}

impl Default for MarginLength {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl core::fmt::Display for MarginLength {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Error from [`RootMargin::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootMarginParseError {
    /// The margin string had no values or more than four.
    WrongArity(usize),
    /// One value was not a `px`/`%` length.
    InvalidLength(String),
}

impl core::fmt::Display for RootMarginParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WrongArity(n) => write!(f, "root margin takes 1 to 4 values, got {n}"),
            Self::InvalidLength(tok) => write!(f, "invalid root margin length: {tok:?}"),
        }
    }
}

impl std::error::Error for RootMarginParseError {}

/// Grows (positive) or shrinks (negative) the viewport's trigger region.
///
/// Follows the CSS shorthand: `"-20% 0px"` means top and bottom shrink by
/// 20% of the viewport height while left and right are untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    /// No margin: the trigger region is the viewport itself.
    pub const ZERO: Self = Self {
        top: MarginLength::Px(0.0),
        right: MarginLength::Px(0.0),
        bottom: MarginLength::Px(0.0),
        left: MarginLength::Px(0.0),
    };

    /// Same margin on the vertical edges, another on the horizontal ones.
    pub const fn symmetric(vertical: MarginLength, horizontal: MarginLength) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Parse a CSS margin shorthand with one to four values.
    pub fn parse(s: &str) -> Result<Self, RootMarginParseError> {
        let tokens: Vec<MarginLength> = s
            .split_whitespace()
            .map(MarginLength::parse)
            .collect::<Result<_, _>>()?;
        match tokens.as_slice() {
            [all] => Ok(Self::symmetric(*all, *all)),
            [v, h] => Ok(Self::symmetric(*v, *h)),
            [t, h, b] => Ok(Self {
                top: *t,
                right: *h,
                bottom: *b,
                left: *h,
            }),
            [t, r, b, l] => Ok(Self {
                top: *t,
                right: *r,
                bottom: *b,
                left: *l,
            }),
            other => Err(RootMarginParseError::WrongArity(other.len())),
        }
    }

    /// Apply the margin to a root rectangle.
    ///
    /// Percentages on top/bottom resolve against the root height and on
    /// left/right against the root width. A margin that shrinks past zero
    /// yields an empty rectangle rather than an inverted one.
    pub fn apply(&self, root: ClientRect) -> ClientRect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        ClientRect::new(
            root.left - left,
            root.top - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl core::fmt::Display for RootMargin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl core::str::FromStr for RootMargin {
    type Err = RootMarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn edges_and_area() {
        let r = ClientRect::new(10.0, -20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 30.0);
        assert_eq!(r.area(), 5000.0);
        assert!(!r.is_empty());
    }

    #[test]
    fn negative_size_collapses() {
        let r = ClientRect::new(0.0, 0.0, -5.0, f64::NAN);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
        assert!(r.is_empty());
    }

    #[test]
    fn intersection_overlap() {
        let viewport = ClientRect::from_size(800.0, 600.0);
        let section = ClientRect::new(0.0, 400.0, 800.0, 1000.0);
        let overlap = viewport.intersection(&section).expect("overlaps");
        assert_eq!(overlap, ClientRect::new(0.0, 400.0, 800.0, 200.0));
    }

    #[test]
    fn intersection_disjoint_and_adjacent() {
        let viewport = ClientRect::from_size(800.0, 600.0);
        let below = ClientRect::new(0.0, 700.0, 800.0, 100.0);
        assert_eq!(viewport.intersection(&below), None);

        let touching = ClientRect::new(0.0, 600.0, 800.0, 100.0);
        let overlap = viewport.intersection(&touching).expect("edge-adjacent");
        assert!(overlap.is_empty());
    }

    #[test]
    fn parse_two_value_margin() {
        let m = RootMargin::parse("-20% 0px").unwrap();
        assert_eq!(m.top, MarginLength::Percent(-20.0));
        assert_eq!(m.bottom, MarginLength::Percent(-20.0));
        assert_eq!(m.left, MarginLength::Px(0.0));
        assert_eq!(m.right, MarginLength::Px(0.0));
    }

    #[test]
    fn parse_one_three_four_values() {
        assert_eq!(
            RootMargin::parse("10px").unwrap(),
            RootMargin::symmetric(MarginLength::Px(10.0), MarginLength::Px(10.0))
        );
        let three = RootMargin::parse("1px 2px 3px").unwrap();
        assert_eq!(three.left, MarginLength::Px(2.0));
        assert_eq!(three.bottom, MarginLength::Px(3.0));
        let four = RootMargin::parse("1px 2px 3px 4%").unwrap();
        assert_eq!(four.left, MarginLength::Percent(4.0));
        assert_eq!(RootMargin::parse("0").unwrap(), RootMargin::ZERO);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(RootMargin::parse(""), Err(RootMarginParseError::WrongArity(0)));
        assert_eq!(
            RootMargin::parse("1px 1px 1px 1px 1px"),
            Err(RootMarginParseError::WrongArity(5))
        );
        assert_eq!(
            RootMargin::parse("12em"),
            Err(RootMarginParseError::InvalidLength("12em".into()))
        );
        assert!(RootMargin::parse("5").is_err());
    }

    #[test]
    fn negative_percent_margin_shrinks_viewport() {
        let m = RootMargin::parse("-20% 0px").unwrap();
        let region = m.apply(ClientRect::from_size(1000.0, 500.0));
        assert_eq!(region, ClientRect::new(0.0, 100.0, 1000.0, 300.0));
    }

    #[test]
    fn over_shrunk_margin_is_empty() {
        let m = RootMargin::parse("-60% 0px").unwrap();
        let region = m.apply(ClientRect::from_size(1000.0, 500.0));
        assert!(region.is_empty());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let m = RootMargin::parse("-20% 0px").unwrap();
        assert_eq!(m.to_string(), "-20% 0px -20% 0px");
        assert_eq!(m.to_string().parse::<RootMargin>().unwrap(), m);
    }
}
