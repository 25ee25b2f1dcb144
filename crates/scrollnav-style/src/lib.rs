#![forbid(unsafe_code)]

//! Scroll-position style interpolation for scrollnav.
//!
//! # Role in scrollnav
//! `scrollnav-style` turns a single continuously-changing scroll offset into
//! the navigation chrome's derived visual values. Every value is a pure
//! function of the offset: no animation state, no easing, no DOM writes.
//!
//! # This crate provides
//! - [`InputRange`], [`InterpolationMapping`] and the [`Lerp`] trait.
//! - CSS value types: [`Rgba`], [`Length`], [`BoxShadow`], [`LinearGradient`].
//! - Named profiles ([`NavbarProfile`], [`ContactButtonProfile`],
//!   [`ProductNavbarProfile`]) and the combined [`NavStyleInterpolator`].
//!
//! # How it fits in the system
//! `scrollnav-runtime` samples a [`NavStyleInterpolator`] on every scroll
//! tick and publishes the resulting [`NavStyleFrame`] as a read-only
//! reactive value.

/// RGBA colors.
pub mod color;
/// Box shadows and gradients.
pub mod effects;
/// Input ranges, mappings, and the lerp trait.
pub mod interpolate;
/// CSS lengths.
pub mod length;
/// Navbar, contact button, and product navbar profiles.
pub mod profile;

pub use color::Rgba;
pub use effects::{BoxShadow, LinearGradient};
pub use interpolate::{
    CANONICAL_SCROLL_RANGE, InputRange, InterpolationError, InterpolationMapping, Lerp,
    RangePhase, lerp_f64, sanitize_offset,
};
pub use length::{Length, Unit};
pub use profile::{
    ContactButtonProfile, ContactButtonStyle, NAVBAR_BASE_COLOR, NavStyleFrame,
    NavStyleInterpolator, NavbarProfile, NavbarStyle, ProductNavbarProfile, ProductNavbarStyle,
};
