#![forbid(unsafe_code)]

//! Publishes derived navigation styles on every scroll tick.

use scrollnav_core::ScrollSignal;
use scrollnav_style::{NavStyleFrame, NavStyleInterpolator};
use tracing::trace;

use crate::reactive::{Observable, ReadOnly};

/// Samples a [`NavStyleInterpolator`] at each tick's absolute scroll offset.
///
/// Each frame is computed from `scroll_y` alone, never from deltas, so
/// dropped or reordered ticks cannot drift the styles: the last tick wins.
#[derive(Debug)]
pub struct ScrollStyleDriver {
    interpolator: NavStyleInterpolator,
    frame: Observable<NavStyleFrame>,
}

impl ScrollStyleDriver {
    pub fn new(interpolator: NavStyleInterpolator) -> Self {
        let frame = Observable::new(interpolator.sample(0.0));
        Self {
            interpolator,
            frame,
        }
    }

    /// Recompute the frame for this tick. Returns whether it changed.
    pub fn on_scroll(&self, signal: ScrollSignal) -> bool {
        let next = self.interpolator.sample(signal.scroll_y);
        let changed = self.frame.set(next);
        if changed {
            trace!(scroll_y = signal.scroll_y, "nav style frame updated");
        }
        changed
    }

    /// Read-only handle to the latest frame.
    pub fn frame(&self) -> ReadOnly<NavStyleFrame> {
        self.frame.read_only()
    }

    pub fn interpolator(&self) -> &NavStyleInterpolator {
        &self.interpolator
    }
}

impl Default for ScrollStyleDriver {
    fn default() -> Self {
        Self::new(NavStyleInterpolator::default())
    }
}
