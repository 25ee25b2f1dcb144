#![forbid(unsafe_code)]

//! `scrollnav-web` connects the navigation engine to a browser-like host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes scroll ticks and
//!   observer entries; nothing here polls or schedules.
//! - **Deterministic**: [`SimulatedPage`] reproduces `IntersectionObserver`
//!   reporting from plain geometry, so whole scroll sessions replay exactly
//!   in native tests.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`HostBridge`] is the other half: instead of simulating, it records the
//! DOM operations the engine requests for a JS host to perform.

pub mod bridge;
pub mod page;

pub use bridge::{HostBridge, HostCommand};
pub use page::{PageError, PageListeners, PageObserver, SimulatedPage};
