#![forbid(unsafe_code)]

//! The set of sections one component observes.
//!
//! Owns the observer handle and the resolved [`SectionDescriptor`]s.
//! Every node it subscribes is unsubscribed exactly once: on replacement,
//! on detach, or on release.

use scrollnav_core::{
    Document, NodeId, ObserveOptions, SectionDescriptor, SectionId, VisibilityEntry,
    VisibilityEvent, VisibilityObserver,
};
use tracing::{debug, trace};

pub(crate) struct ObservationSet<O: VisibilityObserver> {
    observer: O,
    options: ObserveOptions,
    /// Id list of the last registration, before resolution.
    requested: Vec<SectionId>,
    /// Resolved sections in registration order.
    sections: Vec<SectionDescriptor>,
    /// A node was detached since the last registration.
    stale: bool,
}

impl<O: VisibilityObserver> ObservationSet<O> {
    pub(crate) fn new(observer: O, options: ObserveOptions) -> Self {
        Self {
            observer,
            options,
            requested: Vec::new(),
            sections: Vec::new(),
            stale: false,
        }
    }

    /// Resolve `ids` against `document` and observe the result.
    ///
    /// When the ids and the nodes they resolve to are exactly the current,
    /// intact registration nothing happens. Otherwise every subscription is
    /// released before the new sections are observed, so an element that
    /// appeared since the last call is picked up. Returns whether the
    /// observed set changed.
    pub(crate) fn sync(&mut self, document: &dyn Document, ids: Vec<SectionId>) -> bool {
        let resolved = resolve(document, &ids);
        if !self.stale && !ids.is_empty() && self.requested == ids && self.sections == resolved {
            trace!(sections = resolved.len(), "registration unchanged");
            return false;
        }

        self.release_all();
        for section in &resolved {
            self.observer.observe(section.node, &self.options);
        }
        self.sections = resolved;
        self.requested = ids;
        debug!(
            requested = self.requested.len(),
            observed = self.sections.len(),
            "sections registered"
        );
        true
    }

    /// Unobserve everything. Returns how many nodes were released.
    pub(crate) fn release_all(&mut self) -> usize {
        let released = self.sections.len();
        for section in self.sections.drain(..) {
            self.observer.unobserve(section.node);
        }
        self.requested.clear();
        self.stale = false;
        if released > 0 {
            debug!(released, "section subscriptions released");
        }
        released
    }

    /// Drop one node's subscription. Returns its section if it was observed.
    pub(crate) fn detach(&mut self, node: NodeId) -> Option<SectionDescriptor> {
        let idx = self.position(node)?;
        let section = self.sections.remove(idx);
        self.observer.unobserve(node);
        self.stale = true;
        debug!(section = %section.id, %node, "section element detached");
        Some(section)
    }

    #[inline]
    pub(crate) fn position(&self, node: NodeId) -> Option<usize> {
        self.sections.iter().position(|s| s.node == node)
    }

    pub(crate) fn contains_id(&self, id: &SectionId) -> bool {
        self.sections.iter().any(|s| &s.id == id)
    }

    pub(crate) fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section-level events for observed nodes only, keeping the last
    /// report per node, paired with the section's registration index and
    /// sorted by it.
    pub(crate) fn latest_events(
        &self,
        entries: &[VisibilityEntry],
    ) -> Vec<(usize, VisibilityEvent)> {
        let mut latest: Vec<(usize, &VisibilityEntry)> = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(idx) = self.position(entry.node) else {
                continue;
            };
            match latest.iter_mut().find(|(i, _)| *i == idx) {
                Some(slot) => slot.1 = entry,
                None => latest.push((idx, entry)),
            }
        }
        latest.sort_by_key(|(idx, _)| *idx);
        latest
            .into_iter()
            .map(|(idx, entry)| (idx, entry.into_event(self.sections[idx].id.clone())))
            .collect()
    }
}

/// Resolve ids to sections in order. Ids without an element, and repeats
/// of an id or node, are excluded.
fn resolve(document: &dyn Document, ids: &[SectionId]) -> Vec<SectionDescriptor> {
    let mut resolved: Vec<SectionDescriptor> = Vec::with_capacity(ids.len());
    for id in ids {
        if resolved.iter().any(|s| &s.id == id) {
            continue;
        }
        let Some(node) = document.element_by_id(id.as_str()) else {
            debug!(section = %id, "section element not found; excluded");
            continue;
        };
        if resolved.iter().any(|s| s.node == node) {
            debug!(section = %id, %node, "node already observed; excluded");
            continue;
        }
        resolved.push(SectionDescriptor::new(id.clone(), node));
    }
    resolved
}


#[cfg(test)]
mod tests {
    use super::test_support::{Call, Recorder, StaticPage, entry};
    use super::*;
    use pretty_assertions::assert_eq;
    use scrollnav_core::ClientRect;

    fn ids(list: &[&str]) -> Vec<SectionId> {
        list.iter().map(|s| SectionId::new(*s)).collect()
    }

    #[test]
    fn sync_skips_missing_and_duplicate_ids() {
        let page = StaticPage::with(&["home", "platform"]);
        let rec = Recorder::default();
        let mut set = ObservationSet::new(rec.clone(), ObserveOptions::threshold(0.3));

        assert!(set.sync(&page, ids(&["home", "ghost", "#home", "platform"])));
        assert_eq!(set.sections().len(), 2);
        assert_eq!(rec.observed(), vec![page.node("home"), page.node("platform")]);
        assert!(!set.sync(&page, ids(&["home", "ghost", "#home", "platform"])));
        assert_eq!(rec.count(), 2);
    }

    #[test]
    fn sync_releases_previous_first() {
        let page = StaticPage::with(&["a", "b"]);
        let rec = Recorder::default();
        let mut set = ObservationSet::new(rec.clone(), ObserveOptions::threshold(0.3));
        set.sync(&page, ids(&["a"]));
        set.sync(&page, ids(&["b"]));
        assert_eq!(
            *rec.calls.borrow(),
            vec![
                Call::Observe(page.node("a"), vec![0.3]),
                Call::Unobserve(page.node("a")),
                Call::Observe(page.node("b"), vec![0.3]),
            ]
        );
    }

    #[test]
    fn same_ids_pick_up_late_element() {
        let mut page = StaticPage::with(&["home"]);
        let rec = Recorder::default();
        let mut set = ObservationSet::new(rec.clone(), ObserveOptions::threshold(0.3));
        set.sync(&page, ids(&["home", "platform"]));
        assert_eq!(set.sections().len(), 1);

        page.elements.insert(
            2,
            ("platform".to_owned(), ClientRect::new(0.0, 800.0, 1280.0, 800.0)),
        );
        assert!(set.sync(&page, ids(&["home", "platform"])));
        assert_eq!(rec.observed(), vec![page.node("home"), page.node("platform")]);
    }

    #[test]
    fn detach_marks_stale() {
        let page = StaticPage::with(&["a", "b"]);
        let rec = Recorder::default();
        let mut set = ObservationSet::new(rec.clone(), ObserveOptions::threshold(0.3));
        set.sync(&page, ids(&["a", "b"]));
        let gone = set.detach(page.node("a"));
        assert_eq!(gone.map(|s| s.id), Some(SectionId::new("a")));
        assert_eq!(set.detach(page.node("a")), None);

        // The element is still on the page, so the same ids re-subscribe it.
        assert!(set.sync(&page, ids(&["a", "b"])));
        assert_eq!(rec.observed(), vec![page.node("a"), page.node("b")]);
    }

    #[test]
    fn latest_events_dedupe_and_order() {
        let page = StaticPage::with(&["a", "b"]);
        let mut set = ObservationSet::new(Recorder::default(), ObserveOptions::threshold(0.3));
        set.sync(&page, ids(&["a", "b"]));
        let (a, b) = (page.node("a"), page.node("b"));
        let batch = [
            entry(b, true, 0.2, 10.0),
            entry(a, true, 0.5, -4.0),
            entry(NodeId(99), true, 1.0, 0.0),
            entry(b, false, 0.0, 900.0),
        ];
        let latest = set.latest_events(&batch);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].0, 0);
        assert_eq!(latest[0].1.section_id, SectionId::new("a"));
        assert_eq!(latest[0].1.top_offset, -4.0);
        assert_eq!(latest[1].1.section_id, SectionId::new("b"));
        assert!(!latest[1].1.is_intersecting);
    }
}
