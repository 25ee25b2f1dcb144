#![forbid(unsafe_code)]

//! Named scroll-driven style profiles for the navigation chrome.
//!
//! Each profile is a set of independent [`InterpolationMapping`]s over one
//! shared [`InputRange`]. Sampling a profile at a scroll offset produces a
//! plain value struct; nothing here holds state between samples, so the
//! result depends only on the current offset.
//!
//! | Profile | Channels |
//! |---------|----------|
//! | [`NavbarProfile`] | background gradient, corner radius, width, vertical padding, shadow, logo opacity |
//! | [`ContactButtonProfile`] | horizontal/vertical padding, background, border, text opacity, text flex |
//! | [`ProductNavbarProfile`] | background color, border opacity |

use crate::color::Rgba;
use crate::effects::{BoxShadow, LinearGradient};
use crate::interpolate::{CANONICAL_SCROLL_RANGE, InputRange, InterpolationMapping};
use crate::length::Length;

const NAV_NAVY: Rgba = Rgba::rgba(10, 25, 47, 0.0);
const NAV_CRIMSON: Rgba = Rgba::rgba(125, 10, 12, 0.0);
const ACCENT_RED: Rgba = Rgba::rgba(169, 10, 12, 0.0);
const PRODUCT_NIGHT: Rgba = Rgba::rgba(3, 7, 18, 0.0);
const PRODUCT_BORDER_BLUE: Rgba = Rgba::rgba(59, 130, 246, 0.0);

/// Solid base color painted under the navbar gradient.
pub const NAVBAR_BASE_COLOR: Rgba = Rgba::rgba(9, 25, 47, 0.85);

// ---------------------------------------------------------------------------
// Navbar
// ---------------------------------------------------------------------------

/// Derived navbar values at one scroll offset.
#[derive(Debug, Clone, PartialEq)]
pub struct NavbarStyle {
    pub background: LinearGradient,
    pub border_radius: Length,
    pub width: Length,
    pub padding_y: Length,
    pub box_shadow: BoxShadow,
    pub logo_opacity: f64,
}

/// Mappings behind [`NavbarStyle`].
#[derive(Debug, Clone, PartialEq)]
pub struct NavbarProfile {
    background: InterpolationMapping<LinearGradient>,
    border_radius: InterpolationMapping<Length>,
    width: InterpolationMapping<Length>,
    padding_y: InterpolationMapping<Length>,
    box_shadow: InterpolationMapping<BoxShadow>,
    logo_opacity: InterpolationMapping<f64>,
}

impl NavbarProfile {
    pub fn new(range: InputRange) -> Self {
        let shadow = BoxShadow::new(0.0, 4.0, 8.0, ACCENT_RED.with_alpha(0.2));
        Self {
            background: InterpolationMapping::new(
                range,
                LinearGradient::new("to bottom", NAV_NAVY, NAV_NAVY),
                LinearGradient::new(
                    "to bottom",
                    NAV_NAVY.with_alpha(0.8),
                    NAV_CRIMSON.with_alpha(0.2),
                ),
            ),
            border_radius: InterpolationMapping::new(range, Length::px(0.0), Length::px(20.0)),
            width: InterpolationMapping::new(range, Length::percent(100.0), Length::percent(70.0)),
            padding_y: InterpolationMapping::new(range, Length::rem(1.0), Length::rem(0.25)),
            box_shadow: InterpolationMapping::new(range, shadow.faded(), shadow),
            logo_opacity: InterpolationMapping::new(range, 1.0, 0.0),
        }
    }

    pub fn sample(&self, offset: f64) -> NavbarStyle {
        NavbarStyle {
            background: self.background.evaluate(offset),
            border_radius: self.border_radius.evaluate(offset),
            width: self.width.evaluate(offset),
            padding_y: self.padding_y.evaluate(offset),
            box_shadow: self.box_shadow.evaluate(offset),
            logo_opacity: self.logo_opacity.evaluate(offset),
        }
    }

    /// Every mapping's input range, for lockstep checks.
    pub fn input_ranges(&self) -> [InputRange; 6] {
        [
            self.background.input(),
            self.border_radius.input(),
            self.width.input(),
            self.padding_y.input(),
            self.box_shadow.input(),
            self.logo_opacity.input(),
        ]
    }
}

impl Default for NavbarProfile {
    fn default() -> Self {
        Self::new(CANONICAL_SCROLL_RANGE)
    }
}

// ---------------------------------------------------------------------------
// Contact button
// ---------------------------------------------------------------------------

/// Derived contact-button values: the button collapses into its icon.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactButtonStyle {
    pub padding_x: Length,
    pub padding_y: Length,
    pub background: LinearGradient,
    pub border_color: Rgba,
    pub text_opacity: f64,
    pub text_flex: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactButtonProfile {
    padding_x: InterpolationMapping<Length>,
    padding_y: InterpolationMapping<Length>,
    background: InterpolationMapping<LinearGradient>,
    border_color: InterpolationMapping<Rgba>,
    text_opacity: InterpolationMapping<f64>,
    text_flex: InterpolationMapping<f64>,
}

impl ContactButtonProfile {
    pub fn new(range: InputRange) -> Self {
        Self {
            padding_x: InterpolationMapping::new(range, Length::rem(1.5), Length::rem(0.0)),
            padding_y: InterpolationMapping::new(range, Length::rem(0.625), Length::rem(0.0)),
            background: InterpolationMapping::new(
                range,
                LinearGradient::new("to right", ACCENT_RED.with_alpha(0.1), Rgba::TRANSPARENT),
                LinearGradient::new("to right", ACCENT_RED, Rgba::TRANSPARENT),
            ),
            border_color: InterpolationMapping::new(range, ACCENT_RED.with_alpha(0.2), ACCENT_RED),
            text_opacity: InterpolationMapping::new(range, 1.0, 0.0),
            text_flex: InterpolationMapping::new(range, 1.0, 0.0),
        }
    }

    pub fn sample(&self, offset: f64) -> ContactButtonStyle {
        ContactButtonStyle {
            padding_x: self.padding_x.evaluate(offset),
            padding_y: self.padding_y.evaluate(offset),
            background: self.background.evaluate(offset),
            border_color: self.border_color.evaluate(offset),
            text_opacity: self.text_opacity.evaluate(offset),
            text_flex: self.text_flex.evaluate(offset),
        }
    }
}

impl Default for ContactButtonProfile {
    fn default() -> Self {
        Self::new(CANONICAL_SCROLL_RANGE)
    }
}

// ---------------------------------------------------------------------------
// Product navbar
// ---------------------------------------------------------------------------

/// Derived values for the sticky product navigation bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductNavbarStyle {
    pub background: Rgba,
    pub border_opacity: f64,
}

impl ProductNavbarStyle {
    /// Border color with the interpolated opacity applied.
    pub fn border_color(&self) -> Rgba {
        PRODUCT_BORDER_BLUE.with_alpha(self.border_opacity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductNavbarProfile {
    background: InterpolationMapping<Rgba>,
    border_opacity: InterpolationMapping<f64>,
}

impl ProductNavbarProfile {
    pub fn new(range: InputRange) -> Self {
        Self {
            background: InterpolationMapping::new(
                range,
                PRODUCT_NIGHT.with_alpha(0.5),
                PRODUCT_NIGHT.with_alpha(0.95),
            ),
            border_opacity: InterpolationMapping::new(range, 0.05, 0.1),
        }
    }

    pub fn sample(&self, offset: f64) -> ProductNavbarStyle {
        ProductNavbarStyle {
            background: self.background.evaluate(offset),
            border_opacity: self.border_opacity.evaluate(offset),
        }
    }
}

impl Default for ProductNavbarProfile {
    fn default() -> Self {
        Self::new(CANONICAL_SCROLL_RANGE)
    }
}

// ---------------------------------------------------------------------------
// Combined frame
// ---------------------------------------------------------------------------

/// Every derived style value at one scroll offset.
#[derive(Debug, Clone, PartialEq)]
pub struct NavStyleFrame {
    /// Sanitized offset the frame was sampled at.
    pub offset: f64,
    pub navbar: NavbarStyle,
    pub contact: ContactButtonStyle,
    pub product_navbar: ProductNavbarStyle,
}

impl NavStyleFrame {
    /// Flat list of `(name, css value)` pairs for presentation bindings.
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        let fmt = crate::color::fmt_trimmed;
        vec![
            ("nav.background-color", NAVBAR_BASE_COLOR.to_string()),
            ("nav.background-image", self.navbar.background.to_string()),
            ("nav.border-radius", self.navbar.border_radius.to_string()),
            ("nav.width", self.navbar.width.to_string()),
            ("nav.padding-top", self.navbar.padding_y.to_string()),
            ("nav.padding-bottom", self.navbar.padding_y.to_string()),
            ("nav.box-shadow", self.navbar.box_shadow.to_string()),
            ("logo.opacity", fmt(self.navbar.logo_opacity, 3)),
            ("contact.padding-left", self.contact.padding_x.to_string()),
            ("contact.padding-right", self.contact.padding_x.to_string()),
            ("contact.padding-top", self.contact.padding_y.to_string()),
            ("contact.padding-bottom", self.contact.padding_y.to_string()),
            ("contact.background", self.contact.background.to_string()),
            ("contact.border-color", self.contact.border_color.to_string()),
            ("contact-text.opacity", fmt(self.contact.text_opacity, 3)),
            ("contact-text.flex", fmt(self.contact.text_flex, 3)),
            (
                "product-nav.background-color",
                self.product_navbar.background.to_string(),
            ),
            (
                "product-nav.border-color",
                self.product_navbar.border_color().to_string(),
            ),
        ]
    }
}

/// Samples every profile at once.
///
/// Pure: [`NavStyleInterpolator::sample`] is a function of the offset
/// alone, so recomputing on every scroll tick is idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct NavStyleInterpolator {
    range: InputRange,
    navbar: NavbarProfile,
    contact: ContactButtonProfile,
    product_navbar: ProductNavbarProfile,
}

impl NavStyleInterpolator {
    pub fn new(range: InputRange) -> Self {
        Self {
            range,
            navbar: NavbarProfile::new(range),
            contact: ContactButtonProfile::new(range),
            product_navbar: ProductNavbarProfile::new(range),
        }
    }

    /// Shared input range of every mapping.
    pub fn range(&self) -> InputRange {
        self.range
    }

    pub fn navbar(&self) -> &NavbarProfile {
        &self.navbar
    }

    pub fn sample(&self, offset: f64) -> NavStyleFrame {
        NavStyleFrame {
            offset: crate::interpolate::sanitize_offset(offset),
            navbar: self.navbar.sample(offset),
            contact: self.contact.sample(offset),
            product_navbar: self.product_navbar.sample(offset),
        }
    }
}

impl Default for NavStyleInterpolator {
    fn default() -> Self {
        Self::new(CANONICAL_SCROLL_RANGE)
    }
}
