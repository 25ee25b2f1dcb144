#![forbid(unsafe_code)]

//! Core: geometry, section identity, and the host boundary.
//!
//! # Role in scrollnav
//! `scrollnav-core` is the input layer. It owns the vocabulary every other
//! crate speaks: viewport rectangles, root margins, section and node ids,
//! visibility entries, and the traits through which a host (a browser, or
//! the deterministic simulator in `scrollnav-web`) is consumed.
//!
//! # Primary responsibilities
//! - **Geometry**: [`ClientRect`] and CSS-style [`RootMargin`].
//! - **Identity**: [`SectionId`], [`NodeId`], [`SectionDescriptor`].
//! - **Visibility records**: [`VisibilityEntry`], [`VisibilityEvent`],
//!   [`ObserveOptions`].
//! - **Host boundary**: [`Document`], [`VisibilityObserver`],
//!   [`ScrollListeners`], [`ScrollSignal`].
//!
//! # How it fits in the system
//! `scrollnav-runtime` builds the tracker and dispatcher on these types;
//! `scrollnav-web` implements the host traits. Nothing here allocates
//! subscriptions or holds state.

pub mod geometry;
pub mod host;
pub mod section;
pub mod visibility;

pub use geometry::{ClientRect, MarginLength, RootMargin, RootMarginParseError};
pub use host::{
    Document, ListenerId, ListenerOptions, ScrollListeners, ScrollSignal, VisibilityObserver,
};
pub use section::{NodeId, SectionDescriptor, SectionId};
pub use visibility::{ObserveOptions, VisibilityEntry, VisibilityEvent, clamp_ratio};
