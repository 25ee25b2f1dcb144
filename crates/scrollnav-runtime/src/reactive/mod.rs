#![forbid(unsafe_code)]

//! Reactive navigation state.
//!
//! - [`Observable`]: shared value with change notification.
//! - [`ReadOnly`]: the view handed to presentation code.
//! - [`BatchScope`]: publish several values as one update.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, ReadOnly, Subscription};
