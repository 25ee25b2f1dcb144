#![forbid(unsafe_code)]

//! Section Visibility Dispatcher.
//!
//! Drives the product sub-page: which product label the secondary
//! navigation shows, and whether that navigation is visible at all.
//!
//! - The label follows the most visible product block: per batch, the entry
//!   with the highest intersection ratio wins (ties to the block registered
//!   first) and is published only when its ratio reaches the threshold.
//! - Visibility follows the hero block's geometry on every scroll tick:
//!   the secondary nav shows once the hero's bottom edge has left the top of
//!   the viewport. With no hero on the page it stays hidden.
//!
//! The label and the section it came from are published together in one
//! [`BatchScope`], so subscribers never see one without the other.

use ahash::AHashMap;
use scrollnav_core::{
    Document, ListenerId, ListenerOptions, MarginLength, NodeId, ObserveOptions, RootMargin,
    ScrollListeners, SectionDescriptor, SectionId, VisibilityEntry, VisibilityObserver,
};
use tracing::{debug, trace};

use crate::observation::ObservationSet;
use crate::products::{PRODUCTS, section_element_id};
use crate::reactive::{BatchScope, Observable, ReadOnly};

/// Observation and discovery parameters for the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    /// Minimum ratio for a block to claim the label. Default: 0.3.
    pub threshold: f64,
    /// Margin applied to the viewport. Default: `-20% 0px`.
    pub root_margin: RootMargin,
    /// Element id of the hero block. Default: `product-section-0`.
    pub hero_id: String,
    /// Id suffix that marks a product block. Default: `-section`.
    pub section_suffix: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            root_margin: RootMargin::symmetric(MarginLength::Percent(-20.0), MarginLength::Px(0.0)),
            hero_id: "product-section-0".to_owned(),
            section_suffix: "-section".to_owned(),
        }
    }
}

impl DispatcherConfig {
    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions::new([self.threshold], self.root_margin)
    }

    /// Product block ids on `document`, in document order.
    pub fn discover(&self, document: &dyn Document) -> Vec<SectionId> {
        document
            .element_ids()
            .into_iter()
            .filter(|id| id.ends_with(self.section_suffix.as_str()) && *id != self.hero_id)
            .map(SectionId::from)
            .collect()
    }
}

/// Display labels for product blocks.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: AHashMap<SectionId, String>,
}

impl LabelTable {
    /// A table with no entries; every label is derived from the id.
    pub fn empty() -> Self {
        Self {
            labels: AHashMap::new(),
        }
    }

    /// Labels for [`PRODUCTS`], keyed by their section ids.
    pub fn products() -> Self {
        let mut table = Self::empty();
        for product in PRODUCTS {
            table.insert(section_element_id(product.slug), product.name);
        }
        table
    }

    pub fn insert(&mut self, id: impl Into<SectionId>, label: impl Into<String>) {
        self.labels.insert(id.into(), label.into());
    }

    #[must_use]
    pub fn with(mut self, id: impl Into<SectionId>, label: impl Into<String>) -> Self {
        self.insert(id, label);
        self
    }

    /// Label for `id`, falling back to [`derive_label`].
    pub fn label_for(&self, id: &SectionId) -> String {
        self.labels
            .get(id)
            .cloned()
            .unwrap_or_else(|| derive_label(id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::products()
    }
}

/// First `-`-separated segment of `id` with its first letter upper-cased:
/// `"imaging-section"` becomes `"Imaging"`.
pub fn derive_label(id: &str) -> String {
    let stem = id.split('-').next().unwrap_or_default();
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Publishes the current product label and the secondary nav visibility.
pub struct SectionVisibilityDispatcher<O: VisibilityObserver, L: ScrollListeners> {
    sections: ObservationSet<O>,
    listeners: L,
    listener: Option<ListenerId>,
    config: DispatcherConfig,
    labels: LabelTable,
    label: Observable<String>,
    section: Observable<Option<SectionId>>,
    show_secondary: Observable<bool>,
    torn_down: bool,
}

impl<O: VisibilityObserver, L: ScrollListeners> SectionVisibilityDispatcher<O, L> {
    pub fn new(observer: O, listeners: L, config: DispatcherConfig, labels: LabelTable) -> Self {
        Self {
            sections: ObservationSet::new(observer, config.observe_options()),
            listeners,
            listener: None,
            config,
            labels,
            label: Observable::new(String::new()),
            section: Observable::new(None),
            show_secondary: Observable::new(false),
            torn_down: false,
        }
    }

    /// Observe the product blocks named by `ids` and start listening for
    /// scroll ticks.
    ///
    /// Same rules as the tracker: `None` releases everything, an unchanged
    /// list keeps the current subscriptions, anything else replaces them.
    pub fn register<I, S>(&mut self, document: Option<&dyn Document>, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<SectionId>,
    {
        let ids: Vec<SectionId> = ids.into_iter().map(Into::into).collect();
        self.torn_down = false;

        let Some(document) = document else {
            debug!("no document; product navigation inactive");
            self.sections.release_all();
            self.remove_listener();
            self.show_secondary.set(false);
            return 0;
        };

        if document.element_by_id(&self.config.hero_id).is_none() {
            debug!(hero = %self.config.hero_id, "hero element not found; secondary nav stays hidden");
        }

        if self.sections.sync(document, ids) {
            self.drop_stale_label();
        }
        let tracked = self.sections.sections().len();

        if self.listener.is_none() {
            let id = self.listeners.listen(ListenerOptions::default());
            debug!(listener = id.0, "scroll listener installed");
            self.listener = Some(id);
        }
        tracked
    }

    /// Register every block whose id ends with the section suffix, except
    /// the hero, in document order.
    pub fn register_discovered(&mut self, document: &dyn Document) -> usize {
        let ids = self.config.discover(document);
        self.register(Some(document), ids)
    }

    /// Reduce one observer batch. Returns the label after the batch.
    pub fn on_batch(&mut self, entries: &[VisibilityEntry]) -> String {
        if self.torn_down || self.sections.is_empty() {
            trace!(entries = entries.len(), "batch ignored; not dispatching");
            return self.label.get();
        }

        let mut best: Option<(f64, SectionId)> = None;
        for (_, event) in self.sections.latest_events(entries) {
            if best
                .as_ref()
                .is_none_or(|(r, _)| event.intersection_ratio > *r)
            {
                best = Some((event.intersection_ratio, event.section_id));
            }
        }

        match best {
            Some((ratio, id)) if ratio >= self.config.threshold => {
                let label = self.labels.label_for(&id);
                trace!(section = %id, ratio, "most visible product block");
                self.publish(label, Some(id));
            }
            Some((ratio, _)) => {
                trace!(ratio, threshold = self.config.threshold, "below threshold; label kept");
            }
            None => {}
        }
        self.label.get()
    }

    /// Recompute secondary nav visibility from the hero's current bounds.
    ///
    /// Returns the visibility after the tick.
    pub fn on_scroll(&mut self, document: &dyn Document) -> bool {
        if self.torn_down || self.listener.is_none() {
            return self.show_secondary.get();
        }
        let show = document
            .element_by_id(&self.config.hero_id)
            .and_then(|hero| document.bounding_client_rect(hero))
            .is_some_and(|rect| rect.bottom() <= 0.0);
        if self.show_secondary.set(show) {
            debug!(show, "secondary nav visibility changed");
        }
        show
    }

    /// The host removed `node` from the page.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(section) = self.sections.detach(node) {
            let was_current = self.section.with(|s| s.as_ref() == Some(&section.id));
            if was_current {
                self.publish(String::new(), None);
            }
        }
    }

    /// Read-only handle to the current product label (`""` before any).
    pub fn current_label(&self) -> ReadOnly<String> {
        self.label.read_only()
    }

    /// Read-only handle to the block the label came from.
    pub fn current_section(&self) -> ReadOnly<Option<SectionId>> {
        self.section.read_only()
    }

    /// Read-only handle to the secondary nav visibility.
    pub fn show_secondary_nav(&self) -> ReadOnly<bool> {
        self.show_secondary.read_only()
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        self.sections.sections()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Unobserve every block and remove the scroll listener.
    ///
    /// Calling this more than once is a no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let released = self.sections.release_all();
        self.remove_listener();
        debug!(released, "section dispatcher torn down");
    }

    fn publish(&self, label: String, section: Option<SectionId>) {
        let _batch = BatchScope::new();
        if self.label.set(label) {
            debug!(label = %self.label.get(), "product label changed");
        }
        self.section.set(section);
    }

    fn remove_listener(&mut self) {
        if let Some(id) = self.listener.take() {
            self.listeners.unlisten(id);
            debug!(listener = id.0, "scroll listener removed");
        }
    }

    fn drop_stale_label(&mut self) {
        let stale = self
            .section
            .with(|s| s.as_ref().is_some_and(|id| !self.sections.contains_id(id)));
        if stale {
            self.publish(String::new(), None);
        }
    }
}

impl<O: VisibilityObserver, L: ScrollListeners> Drop for SectionVisibilityDispatcher<O, L> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<O: VisibilityObserver, L: ScrollListeners> std::fmt::Debug
    for SectionVisibilityDispatcher<O, L>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionVisibilityDispatcher")
            .field("sections", &self.sections.sections())
            .field("label", &self.label.get())
            .field("show_secondary", &self.show_secondary.get())
            .field("listener", &self.listener)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::test_support::{Recorder, StaticPage, entry};
    use pretty_assertions::assert_eq;
    use scrollnav_core::ClientRect;
    use std::cell::RefCell;
    use std::rc::Rc;

    const PAGE: &[&str] = &[
        "product-section-0",
        "genetic-screening-section",
        "diagnostic-ai-section",
    ];

    type Dispatcher = SectionVisibilityDispatcher<Recorder, Recorder>;

    fn dispatcher(page: &StaticPage) -> (Dispatcher, Recorder) {
        let rec = Recorder::default();
        let mut d = SectionVisibilityDispatcher::new(
            rec.clone(),
            rec.clone(),
            DispatcherConfig::default(),
            LabelTable::default(),
        );
        d.register_discovered(page);
        (d, rec)
    }

    #[test]
    fn discovery_skips_hero_and_other_ids() {
        let page = StaticPage::with(&[
            "product-section-0",
            "genetic-screening-section",
            "footer",
            "diagnostic-ai-section",
        ]);
        let ids = DispatcherConfig::default().discover(&page);
        assert_eq!(
            ids,
            vec![
                SectionId::new("genetic-screening-section"),
                SectionId::new("diagnostic-ai-section"),
            ]
        );
    }

    #[test]
    fn highest_ratio_wins() {
        let page = StaticPage::with(PAGE);
        let (mut d, _) = dispatcher(&page);
        let label = d.on_batch(&[
            entry(page.node("genetic-screening-section"), true, 0.4, 100.0),
            entry(page.node("diagnostic-ai-section"), true, 0.7, 500.0),
        ]);
        assert_eq!(label, "AI Diagnostics");
        assert_eq!(
            d.current_section().get(),
            Some(SectionId::new("diagnostic-ai-section"))
        );
    }

    #[test]
    fn ties_go_to_first_registered() {
        let page = StaticPage::with(PAGE);
        let (mut d, _) = dispatcher(&page);
        let label = d.on_batch(&[
            entry(page.node("diagnostic-ai-section"), true, 0.5, 0.0),
            entry(page.node("genetic-screening-section"), true, 0.5, 0.0),
        ]);
        assert_eq!(label, "Genetic Screening");
    }

    #[test]
    fn below_threshold_keeps_label() {
        let page = StaticPage::with(PAGE);
        let (mut d, _) = dispatcher(&page);
        d.on_batch(&[entry(page.node("genetic-screening-section"), true, 0.6, 0.0)]);
        let label = d.on_batch(&[entry(page.node("diagnostic-ai-section"), true, 0.29, 0.0)]);
        assert_eq!(label, "Genetic Screening");
    }

    #[test]
    fn label_and_section_arrive_together() {
        let page = StaticPage::with(PAGE);
        let (mut d, _) = dispatcher(&page);
        let section = d.current_section();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (s, out) = (section.clone(), Rc::clone(&seen));
        let _sub = d
            .current_label()
            .subscribe(move |label| out.borrow_mut().push((label.clone(), s.get())));

        d.on_batch(&[entry(page.node("diagnostic-ai-section"), true, 0.8, 0.0)]);
        assert_eq!(
            *seen.borrow(),
            vec![(
                "AI Diagnostics".to_string(),
                Some(SectionId::new("diagnostic-ai-section"))
            )]
        );
    }

    #[test]
    fn secondary_nav_follows_hero_bottom() {
        let mut page = StaticPage::with(PAGE);
        let (mut d, _) = dispatcher(&page);
        assert!(!d.on_scroll(&page));

        page.set_rect("product-section-0", ClientRect::new(0.0, -800.0, 1280.0, 800.0));
        assert!(d.on_scroll(&page));
        assert!(d.show_secondary_nav().get());

        page.set_rect("product-section-0", ClientRect::new(0.0, -799.0, 1280.0, 800.0));
        assert!(!d.on_scroll(&page));
    }

    #[test]
    fn missing_hero_keeps_nav_hidden() {
        let page = StaticPage::with(&["genetic-screening-section"]);
        let (mut d, _) = dispatcher(&page);
        assert!(!d.on_scroll(&page));
        assert!(!d.show_secondary_nav().get());
    }

    #[test]
    fn unknown_ids_derive_labels() {
        assert_eq!(derive_label("imaging-section"), "Imaging");
        assert_eq!(derive_label(""), "");
        let table = LabelTable::empty().with("x-ray-section", "X-Ray");
        assert_eq!(table.label_for(&SectionId::new("x-ray-section")), "X-Ray");
        assert_eq!(table.label_for(&SectionId::new("genetic-screening-section")), "Genetic");
    }

    #[test]
    fn teardown_removes_listener_and_observations() {
        let page = StaticPage::with(PAGE);
        let (mut d, rec) = dispatcher(&page);
        assert_eq!(rec.live_listeners(), 1);
        assert_eq!(rec.observed().len(), 2);

        d.teardown();
        d.teardown();
        assert_eq!(rec.live_listeners(), 0);
        assert!(rec.observed().is_empty());

        let label = d.on_batch(&[entry(page.node("diagnostic-ai-section"), true, 1.0, 0.0)]);
        assert_eq!(label, "");
    }

    #[test]
    fn reregistering_keeps_single_listener() {
        let page = StaticPage::with(PAGE);
        let (mut d, rec) = dispatcher(&page);
        d.register_discovered(&page);
        d.register(Some(&page), ["genetic-screening-section"]);
        assert_eq!(rec.live_listeners(), 1);
        assert_eq!(rec.observed(), vec![page.node("genetic-screening-section")]);
    }

    #[test]
    fn detaching_current_block_clears_label() {
        let page = StaticPage::with(PAGE);
        let (mut d, _) = dispatcher(&page);
        d.on_batch(&[entry(page.node("diagnostic-ai-section"), true, 0.9, 0.0)]);
        d.detach(page.node("diagnostic-ai-section"));
        assert_eq!(d.current_label().get(), "");
        assert_eq!(d.current_section().get(), None);
    }
}
