#![forbid(unsafe_code)]

//! Platform-independent runner core wiring the navigation engine to a host.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.
//!
//! The host keeps a geometry mirror of the page up to date through
//! [`RunnerCore::set_element`], applies the [`HostCommand`]s it drains from
//! [`RunnerCore::take_commands`] to real observers and listeners, and pushes
//! the resulting entries and scroll ticks back in.

use serde::Deserialize;
use tracing::{debug, trace};

use scrollnav_core::{ClientRect, Document, NodeId, ScrollSignal, VisibilityEntry};
use scrollnav_runtime::{
    LabelTable, NAV_ITEMS, NavPolicyConfig, PRODUCTS, ScrollStyleDriver,
    SectionActivationTracker, SectionVisibilityDispatcher, is_nav_item_active, is_product_active,
    scroll_target_for,
};
use scrollnav_web::{HostBridge, HostCommand, PageError, SimulatedPage};

/// Observer id the host uses for the section tracker's observer.
pub const NAV_OBSERVER: u32 = 1;
/// Observer id the host uses for the product dispatcher's observer.
pub const PRODUCT_OBSERVER: u32 = 2;

/// One `IntersectionObserverEntry` as the host serializes it.
///
/// Field names follow the DOM so the host can forward entries with little
/// more than `JSON.stringify`. Extra fields (e.g. `rootBounds`) are ignored.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostEntry {
    node: u64,
    is_intersecting: bool,
    #[serde(default)]
    intersection_ratio: f64,
    bounding_client_rect: ClientRect,
}

impl From<HostEntry> for VisibilityEntry {
    fn from(e: HostEntry) -> Self {
        VisibilityEntry::new(
            NodeId(e.node),
            e.is_intersecting,
            e.intersection_ratio,
            ClientRect::new(
                e.bounding_client_rect.left,
                e.bounding_client_rect.top,
                e.bounding_client_rect.width,
                e.bounding_client_rect.height,
            ),
        )
    }
}

/// Parse a JSON array of host entries.
pub fn parse_entries(json: &str) -> Result<Vec<VisibilityEntry>, RunnerError> {
    let raw: Vec<HostEntry> = serde_json::from_str(json).map_err(RunnerError::Json)?;
    Ok(raw.into_iter().map(VisibilityEntry::from).collect())
}

/// Host-facing outcome of one scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Secondary nav visibility after the tick.
    pub show_secondary_nav: bool,
    /// Whether the navbar style frame changed.
    pub style_changed: bool,
}

/// One menu link as the host should render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState {
    pub text: &'static str,
    pub href: String,
    /// Highlighted for the current anchor or label.
    pub active: bool,
}

/// Platform-independent runner owning every engine component.
pub struct RunnerCore {
    /// Geometry mirror of the host page; the components' [`Document`].
    page: SimulatedPage,
    bridge: HostBridge,
    tracker: SectionActivationTracker<HostBridge>,
    dispatcher: SectionVisibilityDispatcher<HostBridge, HostBridge>,
    style: ScrollStyleDriver,
    nav_height: f64,
    destroyed: bool,
}

impl RunnerCore {
    /// Build a runner from an optional JSON [`NavPolicyConfig`].
    ///
    /// `None` uses the defaults. The policy is validated before anything is
    /// constructed.
    pub fn new(config_json: Option<&str>) -> Result<Self, RunnerError> {
        let policy = match config_json {
            Some(json) => NavPolicyConfig::from_json_str(json).map_err(RunnerError::Config)?,
            None => NavPolicyConfig::default(),
        };
        let policy = policy.validated().map_err(RunnerError::Config)?;

        let tracker_config = policy.to_tracker_config().map_err(RunnerError::Config)?;
        let dispatcher_config = policy.to_dispatcher_config().map_err(RunnerError::Config)?;
        let interpolator = policy.to_style_interpolator().map_err(RunnerError::Config)?;

        let bridge = HostBridge::new();
        let tracker =
            SectionActivationTracker::new(bridge.for_observer(NAV_OBSERVER), tracker_config);
        let dispatcher = SectionVisibilityDispatcher::new(
            bridge.for_observer(PRODUCT_OBSERVER),
            bridge.clone(),
            dispatcher_config,
            LabelTable::products(),
        );
        debug!(nav_height = policy.dispatcher.nav_height, "nav runner created");

        Ok(Self {
            page: SimulatedPage::new(0.0, 0.0),
            bridge,
            tracker,
            dispatcher,
            style: ScrollStyleDriver::new(interpolator),
            nav_height: policy.dispatcher.nav_height,
            destroyed: false,
        })
    }

    /// Insert or move an element in the geometry mirror.
    ///
    /// `doc_top` is the element's top relative to the document, `height`
    /// its rendered height.
    pub fn set_element(
        &mut self,
        id: &str,
        node: u64,
        doc_top: f64,
        height: f64,
    ) -> Result<(), RunnerError> {
        let node = NodeId(node);
        match self.page.element_by_id(id) {
            Some(existing) if existing == node => self
                .page
                .update_element(node, doc_top, height)
                .map_err(RunnerError::Page),
            Some(existing) => Err(RunnerError::Page(PageError::DuplicateId(format!(
                "{id} (already bound to {existing})"
            )))),
            None => self
                .page
                .insert_element(node, id, doc_top, height)
                .map_err(RunnerError::Page),
        }
    }

    /// The host removed an element. Both components drop it.
    pub fn remove_element(&mut self, node: u64) -> bool {
        let node = NodeId(node);
        self.tracker.detach(node);
        self.dispatcher.detach(node);
        self.page.remove_element(node)
    }

    /// Track the home page sections named by `ids`.
    pub fn register_nav<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.destroyed {
            return 0;
        }
        let ids: Vec<String> = ids.into_iter().map(|s| s.as_ref().to_owned()).collect();
        self.tracker.register(Some(&self.page), ids)
    }

    /// Discover and watch the product page blocks.
    pub fn register_products(&mut self) -> usize {
        if self.destroyed {
            return 0;
        }
        self.dispatcher.register_discovered(&self.page)
    }

    /// Deliver one batch from the nav observer (JSON array of entries).
    ///
    /// Returns the active anchor after the batch.
    pub fn push_nav_entries(&mut self, json: &str) -> Result<String, RunnerError> {
        let entries = parse_entries(json)?;
        Ok(self.apply_nav_entries(&entries))
    }

    /// Deliver one already-decoded batch from the nav observer.
    pub fn apply_nav_entries(&mut self, entries: &[VisibilityEntry]) -> String {
        trace!(entries = entries.len(), "nav batch");
        self.tracker.on_batch(entries);
        self.tracker.active_anchor()
    }

    /// Deliver one batch from the product observer (JSON array of entries).
    ///
    /// Returns the product label after the batch.
    pub fn push_product_entries(&mut self, json: &str) -> Result<String, RunnerError> {
        let entries = parse_entries(json)?;
        Ok(self.apply_product_entries(&entries))
    }

    /// Deliver one already-decoded batch from the product observer.
    pub fn apply_product_entries(&mut self, entries: &[VisibilityEntry]) -> String {
        trace!(entries = entries.len(), "product batch");
        self.dispatcher.on_batch(entries)
    }

    /// One scroll or resize tick.
    pub fn scroll(&mut self, scroll_y: f64, width: f64, height: f64) -> ScrollOutcome {
        let signal = ScrollSignal::new(scroll_y, width, height);
        self.page.apply_signal(signal);
        let show_secondary_nav = self.dispatcher.on_scroll(&self.page);
        let style_changed = self.style.on_scroll(self.page.signal());
        ScrollOutcome {
            show_secondary_nav,
            style_changed,
        }
    }

    /// Absolute scroll offset for a product link, or `None` when the
    /// product's block is not on the page.
    pub fn scroll_target(&self, product: &str) -> Option<f64> {
        scroll_target_for(&self.page, product, self.nav_height)
    }

    /// Drain the DOM operations queued for the host, oldest first.
    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        self.bridge.drain()
    }

    /// Queued commands encoded as a JSON array.
    pub fn take_commands_json(&mut self) -> Result<String, RunnerError> {
        serde_json::to_string(&self.take_commands()).map_err(RunnerError::Json)
    }

    /// `"#id"` of the active home section, or `""`.
    pub fn active_anchor(&self) -> String {
        self.tracker.active_anchor()
    }

    pub fn current_label(&self) -> String {
        self.dispatcher.current_label().get()
    }

    pub fn show_secondary_nav(&self) -> bool {
        self.dispatcher.show_secondary_nav().get()
    }

    /// Primary menu links, highlighted from the active anchor.
    pub fn nav_links(&self) -> Vec<LinkState> {
        let anchor = self.active_anchor();
        NAV_ITEMS
            .iter()
            .map(|item| LinkState {
                text: item.text,
                href: item.href.to_owned(),
                active: is_nav_item_active(item.href, &anchor),
            })
            .collect()
    }

    /// Product sub-navigation links, highlighted from the current label.
    pub fn product_links(&self) -> Vec<LinkState> {
        let label = self.current_label();
        PRODUCTS
            .iter()
            .map(|product| LinkState {
                text: product.name,
                href: product.href(),
                active: is_product_active(product.name, &label),
            })
            .collect()
    }

    /// `(selector.property, value)` pairs of the current style frame.
    pub fn style_properties(&self) -> Vec<(&'static str, String)> {
        self.style.frame().with(|frame| frame.css_properties())
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Tear down both components. Their release commands stay queued for
    /// one last [`take_commands`](Self::take_commands).
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.tracker.teardown();
        self.dispatcher.teardown();
        debug!(pending = self.bridge.pending(), "nav runner destroyed");
    }
}

impl std::fmt::Debug for RunnerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerCore")
            .field("tracker", &self.tracker)
            .field("dispatcher", &self.dispatcher)
            .field("nav_height", &self.nav_height)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors surfaced to the host.
#[derive(Debug)]
pub enum RunnerError {
    /// The policy JSON did not parse or did not validate.
    Config(scrollnav_runtime::ConfigError),
    /// An entry batch or command queue failed to (de)serialize.
    Json(serde_json::Error),
    /// The geometry mirror rejected an element.
    Page(PageError),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Page(e) => write!(f, "page error: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Page(e) => Some(e),
        }
    }
}
