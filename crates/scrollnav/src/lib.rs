#![forbid(unsafe_code)]

//! scrollnav public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from internal crates and offers a lightweight
//! prelude for wiring scroll-driven navigation into a page.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use scrollnav_core::{
    ClientRect, Document, ListenerId, ListenerOptions, MarginLength, NodeId, ObserveOptions,
    RootMargin, ScrollListeners, ScrollSignal, SectionDescriptor, SectionId, VisibilityEntry,
    VisibilityObserver,
};

// --- Style re-exports ------------------------------------------------------

pub use scrollnav_style::{InputRange, InterpolationError, NavStyleFrame, NavStyleInterpolator};

// --- Runtime re-exports ----------------------------------------------------

pub use scrollnav_runtime::{
    BatchScope, ConfigError, DispatcherConfig, LabelTable, NavPolicyConfig, Observable, ReadOnly,
    ScrollStyleDriver, SectionActivationTracker, SectionVisibilityDispatcher, Subscription,
    TrackerConfig,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use scrollnav_web::{HostBridge, HostCommand, PageError, SimulatedPage};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for scrollnav setup.
#[derive(Debug)]
pub enum Error {
    /// Navigation policy failed to load or validate.
    Config(ConfigError),
    /// A style range was empty or inverted.
    Interpolation(InterpolationError),
    /// The simulated page rejected an element.
    #[cfg(feature = "web")]
    Page(PageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Interpolation(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Page(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Interpolation(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Page(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<InterpolationError> for Error {
    fn from(err: InterpolationError) -> Self {
        Self::Interpolation(err)
    }
}

#[cfg(feature = "web")]
impl From<PageError> for Error {
    fn from(err: PageError) -> Self {
        Self::Page(err)
    }
}

/// Standard result type for scrollnav APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Document, Error, NavPolicyConfig, NavStyleInterpolator, ReadOnly, Result,
        ScrollListeners, ScrollSignal, ScrollStyleDriver, SectionActivationTracker, SectionId,
        SectionVisibilityDispatcher, VisibilityEntry, VisibilityObserver,
    };

    #[cfg(feature = "web")]
    pub use crate::SimulatedPage;

    pub use crate::{core, runtime, style};
}

pub use scrollnav_core as core;
pub use scrollnav_runtime as runtime;
pub use scrollnav_style as style;
#[cfg(feature = "web")]
pub use scrollnav_web as web;
