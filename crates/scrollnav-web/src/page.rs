#![forbid(unsafe_code)]

//! In-memory page with browser-faithful intersection reporting.
//!
//! [`SimulatedPage`] models a flat document: every element spans the
//! viewport width and sits at a fixed distance from the document top. The
//! host (a test, a replay, or the wasm runner mirroring the real DOM) moves
//! the page with [`scroll_to`](SimulatedPage::scroll_to) and
//! [`resize`](SimulatedPage::resize).
//!
//! # Observer semantics
//!
//! Each [`PageObserver`] behaves like one `IntersectionObserver`:
//!
//! - `observe` queues an initial entry for the target.
//! - After every geometry change, a target queues a new entry only when the
//!   number of thresholds its ratio has reached, or its intersecting flag,
//!   differs from the last entry.
//! - The root margin is applied to the viewport before intersecting:
//!   percentages resolve against viewport height (top/bottom) and width
//!   (left/right).
//! - [`take_records`](SimulatedPage::take_records) drains the queue as one
//!   batch, in the order entries were produced.
//!
//! Clones share state; handles from [`SimulatedPage::observer`] and
//! [`SimulatedPage::listeners`] stay connected to the page they came from.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use scrollnav_core::{
    ClientRect, Document, ListenerId, ListenerOptions, NodeId, ObserveOptions, ScrollListeners,
    ScrollSignal, VisibilityEntry, VisibilityObserver,
};
use tracing::{debug, trace};

/// Errors from page mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Another element already has this id.
    DuplicateId(String),
    /// Another element already uses this node handle.
    DuplicateNode(NodeId),
    /// No element has this node handle.
    UnknownNode(NodeId),
}

impl core::fmt::Display for PageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate element id: {id}"),
            Self::DuplicateNode(node) => write!(f, "duplicate node handle: {node}"),
            Self::UnknownNode(node) => write!(f, "unknown node handle: {node}"),
        }
    }
}

impl std::error::Error for PageError {}

#[derive(Debug, Clone)]
struct Element {
    id: String,
    doc_top: f64,
    height: f64,
}

#[derive(Debug, Clone)]
struct Target {
    node: NodeId,
    options: ObserveOptions,
    /// `(thresholds reached, intersecting)` of the last queued entry.
    last: Option<(usize, bool)>,
}

#[derive(Debug, Default)]
struct ObserverState {
    targets: Vec<Target>,
    records: Vec<VisibilityEntry>,
}

#[derive(Debug)]
struct PageState {
    /// Elements in document order: by `doc_top`, ties in insertion order.
    elements: Vec<(NodeId, Element)>,
    next_node: u64,
    scroll_y: f64,
    viewport_width: f64,
    viewport_height: f64,
    observers: BTreeMap<u64, ObserverState>,
    next_observer: u64,
    listeners: BTreeMap<ListenerId, ListenerOptions>,
    next_listener: u64,
}

impl PageState {
    fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, e)| e)
    }

    fn rect(&self, element: &Element) -> ClientRect {
        ClientRect::new(
            0.0,
            element.doc_top - self.scroll_y,
            self.viewport_width,
            element.height,
        )
    }

    fn viewport(&self) -> ClientRect {
        ClientRect::from_size(self.viewport_width, self.viewport_height)
    }

    /// Entry for `node` as the browser would report it now.
    fn measure(&self, node: NodeId, options: &ObserveOptions) -> Option<VisibilityEntry> {
        let element = self.element(node)?;
        let target = self.rect(element);
        let root = options.root_margin.apply(self.viewport());
        let overlap = target.intersection(&root);
        let is_intersecting = overlap.is_some();
        let ratio = match overlap {
            Some(o) if target.area() > 0.0 => o.area() / target.area(),
            // A zero-area target counts as fully visible while it touches
            // the root.
            Some(_) => 1.0,
            None => 0.0,
        };
        Some(VisibilityEntry::new(node, is_intersecting, ratio, target))
    }

    /// Queue entries for every target whose crossing state changed.
    fn recompute(&mut self) {
        let mut queued = 0usize;
        let ids: Vec<u64> = self.observers.keys().copied().collect();
        for id in ids {
            let Some(mut observer) = self.observers.remove(&id) else {
                continue;
            };
            for target in &mut observer.targets {
                let Some(entry) = self.measure(target.node, &target.options) else {
                    continue;
                };
                let key = (
                    target
                        .options
                        .crossed_index(entry.intersection_ratio, entry.is_intersecting),
                    entry.is_intersecting,
                );
                if target.last != Some(key) {
                    target.last = Some(key);
                    observer.records.push(entry);
                    queued += 1;
                }
            }
            self.observers.insert(id, observer);
        }
        if queued > 0 {
            trace!(queued, scroll_y = self.scroll_y, "intersection entries queued");
        }
    }
}

/// Deterministic page model implementing the host traits.
#[derive(Debug, Clone)]
pub struct SimulatedPage {
    state: Rc<RefCell<PageState>>,
}

impl SimulatedPage {
    /// Empty page with the given viewport, scrolled to the top.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(PageState {
                elements: Vec::new(),
                next_node: 1,
                scroll_y: 0.0,
                viewport_width: non_negative(viewport_width),
                viewport_height: non_negative(viewport_height),
                observers: BTreeMap::new(),
                next_observer: 1,
                listeners: BTreeMap::new(),
                next_listener: 1,
            })),
        }
    }

    /// Page whose elements are stacked top to bottom, each `height` tall.
    pub fn stacked(
        ids: &[&str],
        height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Self, PageError> {
        let page = Self::new(viewport_width, viewport_height);
        for (i, id) in ids.iter().enumerate() {
            page.add_element(*id, i as f64 * height, height)?;
        }
        Ok(page)
    }

    /// Add an element, assigning it a fresh node handle.
    pub fn add_element(
        &self,
        id: impl Into<String>,
        doc_top: f64,
        height: f64,
    ) -> Result<NodeId, PageError> {
        let node = {
            let mut st = self.state.borrow_mut();
            let mut next = st.next_node;
            while st.element(NodeId(next)).is_some() {
                next += 1;
            }
            st.next_node = next + 1;
            NodeId(next)
        };
        self.insert_element(node, id, doc_top, height)?;
        Ok(node)
    }

    /// Add an element under a node handle chosen by the host. It lands at
    /// its document position, after any element with the same top.
    pub fn insert_element(
        &self,
        node: NodeId,
        id: impl Into<String>,
        doc_top: f64,
        height: f64,
    ) -> Result<(), PageError> {
        let id = id.into();
        let mut st = self.state.borrow_mut();
        if st.elements.iter().any(|(_, e)| e.id == id) {
            return Err(PageError::DuplicateId(id));
        }
        if st.element(node).is_some() {
            return Err(PageError::DuplicateNode(node));
        }
        debug!(%node, id = %id, doc_top, height, "element added");
        let doc_top = finite_or_zero(doc_top);
        let at = st.elements.partition_point(|(_, e)| e.doc_top <= doc_top);
        st.elements.insert(
            at,
            (
                node,
                Element {
                    id,
                    doc_top,
                    height: non_negative(height),
                },
            ),
        );
        st.recompute();
        Ok(())
    }

    /// Move or resize an existing element, keeping document order.
    pub fn update_element(&self, node: NodeId, doc_top: f64, height: f64) -> Result<(), PageError> {
        let mut st = self.state.borrow_mut();
        let Some((_, element)) = st.elements.iter_mut().find(|(n, _)| *n == node) else {
            return Err(PageError::UnknownNode(node));
        };
        element.doc_top = finite_or_zero(doc_top);
        element.height = non_negative(height);
        st.elements.sort_by(|(_, a), (_, b)| a.doc_top.total_cmp(&b.doc_top));
        st.recompute();
        Ok(())
    }

    /// Remove an element. Observers stop reporting it and drop its
    /// undelivered entries. Returns whether the node existed.
    pub fn remove_element(&self, node: NodeId) -> bool {
        let mut st = self.state.borrow_mut();
        let before = st.elements.len();
        st.elements.retain(|(n, _)| *n != node);
        let removed = st.elements.len() != before;
        if removed {
            for observer in st.observers.values_mut() {
                observer.targets.retain(|t| t.node != node);
                observer.records.retain(|r| r.node != node);
            }
            debug!(%node, "element removed");
        }
        removed
    }

    /// Scroll the page. Negative and NaN offsets clamp to the top.
    pub fn scroll_to(&self, scroll_y: f64) {
        let mut st = self.state.borrow_mut();
        st.scroll_y = non_negative(scroll_y);
        st.recompute();
    }

    /// Change the viewport size.
    pub fn resize(&self, viewport_width: f64, viewport_height: f64) {
        let mut st = self.state.borrow_mut();
        st.viewport_width = non_negative(viewport_width);
        st.viewport_height = non_negative(viewport_height);
        st.recompute();
    }

    /// Apply one host tick: scroll offset and viewport together.
    pub fn apply_signal(&self, signal: ScrollSignal) {
        let mut st = self.state.borrow_mut();
        st.scroll_y = non_negative(signal.scroll_y);
        st.viewport_width = non_negative(signal.viewport_width);
        st.viewport_height = non_negative(signal.viewport_height);
        st.recompute();
    }

    /// Current scroll offset and viewport.
    pub fn signal(&self) -> ScrollSignal {
        let st = self.state.borrow();
        ScrollSignal::new(st.scroll_y, st.viewport_width, st.viewport_height)
    }

    /// Create a new, independent observer.
    pub fn observer(&self) -> PageObserver {
        let mut st = self.state.borrow_mut();
        let id = st.next_observer;
        st.next_observer += 1;
        st.observers.insert(id, ObserverState::default());
        PageObserver {
            id,
            state: Rc::clone(&self.state),
        }
    }

    /// Drain the entries `observer` has queued since the last call.
    pub fn take_records(&self, observer: &PageObserver) -> Vec<VisibilityEntry> {
        self.state
            .borrow_mut()
            .observers
            .get_mut(&observer.id)
            .map(|o| std::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    /// Nodes `observer` currently watches.
    pub fn observed(&self, observer: &PageObserver) -> Vec<NodeId> {
        self.state
            .borrow()
            .observers
            .get(&observer.id)
            .map(|o| o.targets.iter().map(|t| t.node).collect())
            .unwrap_or_default()
    }

    /// Scroll listener registry of this page.
    pub fn listeners(&self) -> PageListeners {
        PageListeners {
            state: Rc::clone(&self.state),
        }
    }

    /// Number of installed scroll listeners.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl Document for SimulatedPage {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.state
            .borrow()
            .elements
            .iter()
            .find(|(_, e)| e.id == id)
            .map(|(n, _)| *n)
    }

    fn element_ids(&self) -> Vec<String> {
        self.state
            .borrow()
            .elements
            .iter()
            .map(|(_, e)| e.id.clone())
            .collect()
    }

    fn bounding_client_rect(&self, node: NodeId) -> Option<ClientRect> {
        let st = self.state.borrow();
        st.element(node).map(|e| st.rect(e))
    }

    fn document_top(&self, node: NodeId) -> Option<f64> {
        self.state.borrow().element(node).map(|e| e.doc_top)
    }
}

/// One intersection observer on a [`SimulatedPage`].
///
/// Clones are the same observer.
#[derive(Debug, Clone)]
pub struct PageObserver {
    id: u64,
    state: Rc<RefCell<PageState>>,
}

impl PageObserver {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl VisibilityObserver for PageObserver {
    fn observe(&mut self, node: NodeId, options: &ObserveOptions) {
        let mut st = self.state.borrow_mut();
        let initial = st.measure(node, options);
        let Some(observer) = st.observers.get_mut(&self.id) else {
            return;
        };
        observer.targets.retain(|t| t.node != node);
        let last = initial.map(|e| {
            (
                options.crossed_index(e.intersection_ratio, e.is_intersecting),
                e.is_intersecting,
            )
        });
        observer.targets.push(Target {
            node,
            options: options.clone(),
            last,
        });
        if let Some(entry) = initial {
            observer.records.push(entry);
        }
    }

    fn unobserve(&mut self, node: NodeId) {
        if let Some(observer) = self.state.borrow_mut().observers.get_mut(&self.id) {
            observer.targets.retain(|t| t.node != node);
            observer.records.retain(|r| r.node != node);
        }
    }
}

/// Scroll listener registry of a [`SimulatedPage`].
#[derive(Debug, Clone)]
pub struct PageListeners {
    state: Rc<RefCell<PageState>>,
}

impl ScrollListeners for PageListeners {
    fn listen(&mut self, options: ListenerOptions) -> ListenerId {
        let mut st = self.state.borrow_mut();
        let id = ListenerId(st.next_listener);
        st.next_listener += 1;
        st.listeners.insert(id, options);
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.state.borrow_mut().listeners.remove(&id);
    }
}

#[inline]
fn non_negative(v: f64) -> f64 {
    if v.is_nan() || v < 0.0 { 0.0 } else { v }
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
