#![forbid(unsafe_code)]

//! WASM runner for the scrollnav engine.
//!
//! This crate provides [`NavRunner`], a `wasm-bindgen`-exported struct that
//! owns a section tracker, a product dispatcher and a style driver, and
//! exposes them to JavaScript for host-driven execution.
//!
//! The platform-independent half, [`RunnerCore`], compiles everywhere so
//! native hosts and tests can drive the exact same wiring.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::NavRunner;

pub mod runner_core;

pub use runner_core::{
    LinkState, NAV_OBSERVER, PRODUCT_OBSERVER, RunnerCore, RunnerError, ScrollOutcome,
    parse_entries,
};
