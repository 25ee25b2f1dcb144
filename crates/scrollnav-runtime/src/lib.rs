#![forbid(unsafe_code)]

//! scrollnav runtime
//!
//! The stateful half of the navigation engine: components that turn host
//! visibility reports and scroll ticks into read-only reactive values.
//!
//! # Key Components
//!
//! - [`SectionActivationTracker`] - which page section is active
//! - [`SectionVisibilityDispatcher`] - current product label and secondary
//!   nav visibility
//! - [`ScrollStyleDriver`] - derived navbar styles per scroll tick
//! - [`Observable`] / [`ReadOnly`] / [`BatchScope`] - reactive state
//! - [`NavPolicyConfig`] - every tunable, loadable from TOML or JSON
//!
//! # Role in scrollnav
//! Consumes the host traits from `scrollnav-core` and the pure style
//! mappings from `scrollnav-style`. Hosts push observer batches into
//! `on_batch` and scroll ticks into `on_scroll`; nothing here blocks, spawns
//! or schedules.

pub mod dispatcher;
pub mod nav_config;
pub mod nav_items;
mod observation;
pub mod products;
pub mod reactive;
pub mod style_driver;
pub mod tracker;

pub use dispatcher::{DispatcherConfig, LabelTable, SectionVisibilityDispatcher, derive_label};
pub use nav_config::{ConfigError, DispatcherPolicy, NavPolicyConfig, StylePolicy, TrackerPolicy};
pub use nav_items::{CONTACT_ANCHOR, HOME_SECTION_IDS, NAV_ITEMS, NavItem, is_nav_item_active};
pub use products::{
    NAV_HEIGHT_PX, PRODUCTS, ProductLink, is_product_active, product_slug, scroll_target_for,
    section_element_id,
};
pub use reactive::{BatchScope, Observable, ReadOnly, Subscription};
pub use style_driver::ScrollStyleDriver;
pub use tracker::{SectionActivationTracker, TrackerConfig};
