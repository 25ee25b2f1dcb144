#![forbid(unsafe_code)]

//! Section Activation Tracker.
//!
//! Given an ordered list of section ids, keeps a single read-only
//! "active section" value in step with what the viewport shows.
//!
//! # Reduction
//!
//! Each observer batch is reduced as a whole before anything is published:
//!
//! 1. Entries for nodes this tracker does not observe are ignored, and so is
//!    the entire batch after [`teardown`](SectionActivationTracker::teardown).
//! 2. Of the remaining entries (last report per node), only intersecting
//!    ones are candidates.
//! 3. No candidates: the previous value stands. The tracker never falls
//!    back to empty just because a batch reported exits.
//! 4. Otherwise the candidate whose top edge is closest to the viewport top
//!    (smallest `|top|`) wins. Ties go to the section registered first; a
//!    NaN offset never beats a finite one.
//!
//! # Invariants
//!
//! The active value is always empty or the id of a currently observed
//! section. Re-registration and detach reset it to empty when they remove
//! the active section.

use scrollnav_core::{
    Document, NodeId, ObserveOptions, RootMargin, SectionDescriptor, SectionId, VisibilityEntry,
    VisibilityObserver,
};
use tracing::{debug, trace};

use crate::observation::ObservationSet;
use crate::reactive::{Observable, ReadOnly};

/// Observation parameters for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Ratio whose crossing makes the observer report. Default: 0.3.
    pub threshold: f64,
    /// Margin applied to the viewport. Default: none.
    pub root_margin: RootMargin,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            root_margin: RootMargin::ZERO,
        }
    }
}

impl TrackerConfig {
    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions::new([self.threshold], self.root_margin)
    }
}

/// Tracks which registered section is active.
pub struct SectionActivationTracker<O: VisibilityObserver> {
    sections: ObservationSet<O>,
    active: Observable<Option<SectionId>>,
    torn_down: bool,
}

impl<O: VisibilityObserver> SectionActivationTracker<O> {
    pub fn new(observer: O, config: TrackerConfig) -> Self {
        Self {
            sections: ObservationSet::new(observer, config.observe_options()),
            active: Observable::new(None),
            torn_down: false,
        }
    }

    /// Observe the sections named by `ids`, in document order.
    ///
    /// - `None` document: no environment to observe. Prior subscriptions
    ///   are released and the state is empty.
    /// - Same id list as the current registration: nothing changes.
    /// - Otherwise every prior subscription is released before the new ids
    ///   are resolved. Ids with no element are skipped.
    ///
    /// Returns the number of sections now tracked.
    pub fn register<I, S>(&mut self, document: Option<&dyn Document>, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<SectionId>,
    {
        let ids: Vec<SectionId> = ids.into_iter().map(Into::into).collect();
        self.torn_down = false;

        let Some(document) = document else {
            debug!("no document; section tracking inactive");
            self.sections.release_all();
            self.active.set(None);
            return 0;
        };

        if self.sections.sync(document, ids) {
            self.drop_stale_active();
        }
        self.sections.sections().len()
    }

    /// Reduce one observer batch and publish the result.
    ///
    /// Returns the active section after the batch.
    pub fn on_batch(&mut self, entries: &[VisibilityEntry]) -> Option<SectionId> {
        if self.torn_down || self.sections.is_empty() {
            trace!(entries = entries.len(), "batch ignored; not tracking");
            return self.active.get();
        }

        let mut best: Option<(f64, SectionId)> = None;
        for (_, event) in self.sections.latest_events(entries) {
            if !event.is_intersecting {
                continue;
            }
            let distance = event.top_offset.abs();
            let distance = if distance.is_nan() { f64::INFINITY } else { distance };
            // Strictly closer wins; `latest_events` is sorted by
            // registration order, so equal distances keep the earlier one.
            if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                best = Some((distance, event.section_id));
            }
        }

        let Some((distance, winner)) = best else {
            trace!(entries = entries.len(), "no intersecting section; keeping previous");
            return self.active.get();
        };

        trace!(section = %winner, distance, "closest section to viewport top");
        if self.active.set(Some(winner.clone())) {
            debug!(section = %winner, "active section changed");
        }
        Some(winner)
    }

    /// The host removed `node` from the page.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(section) = self.sections.detach(node) {
            let was_active = self.active.with(|a| a.as_ref() == Some(&section.id));
            if was_active {
                self.active.set(None);
            }
        }
    }

    /// Read-only handle to the active section.
    pub fn active(&self) -> ReadOnly<Option<SectionId>> {
        self.active.read_only()
    }

    /// The active section as `"#id"`, or `""` when none is active.
    pub fn active_anchor(&self) -> String {
        self.active
            .with(|a| a.as_ref().map(SectionId::anchor).unwrap_or_default())
    }

    /// Sections currently observed, in registration order.
    pub fn sections(&self) -> &[SectionDescriptor] {
        self.sections.sections()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Unobserve every section. Later batches leave the state untouched.
    ///
    /// Calling this more than once is a no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let released = self.sections.release_all();
        debug!(released, "section tracker torn down");
    }

    fn drop_stale_active(&mut self) {
        let stale = self
            .active
            .with(|a| a.as_ref().is_some_and(|id| !self.sections.contains_id(id)));
        if stale {
            self.active.set(None);
        }
    }
}

impl<O: VisibilityObserver> Drop for SectionActivationTracker<O> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<O: VisibilityObserver> std::fmt::Debug for SectionActivationTracker<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionActivationTracker")
            .field("sections", &self.sections.sections())
            .field("active", &self.active.get())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}
