#![forbid(unsafe_code)]

//! Host boundary: the only seams between the engine and the browser.
//!
//! The engine never touches the DOM directly. It consumes three narrow
//! capabilities that a host provides:
//!
//! - [`Document`]: element lookup and bounding rectangles.
//! - [`VisibilityObserver`]: the viewport-intersection primitive.
//! - [`ScrollListeners`]: scroll/resize listener registration.
//!
//! Observer reports and scroll ticks are *pushed* by the host into the
//! owning component (`on_batch`, `on_scroll`); these traits only carry the
//! subscribe/unsubscribe half of each contract. A component that has
//! released a subscription must ignore anything the host still delivers for
//! it.
//!
//! "No document" is modelled as `Option<&dyn Document>::None` at call sites.

use crate::geometry::ClientRect;
use crate::section::NodeId;
use crate::visibility::ObserveOptions;

/// Read-only view of the page's element tree.
pub trait Document {
    /// Resolve an element id (without `#`) to a node.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Every element id on the page, in document order.
    fn element_ids(&self) -> Vec<String>;

    /// Current bounds of a node relative to the viewport.
    fn bounding_client_rect(&self, node: NodeId) -> Option<ClientRect>;

    /// Distance from the document top to the node's top edge
    /// (`offsetTop` for a flat page).
    fn document_top(&self, node: NodeId) -> Option<f64>;
}

/// Registration half of the viewport-intersection primitive.
pub trait VisibilityObserver {
    /// Start reporting visibility changes for `node`.
    ///
    /// Observing an already observed node replaces its options.
    fn observe(&mut self, node: NodeId, options: &ObserveOptions);

    /// Stop reporting for `node`. Unobserving an unknown node is a no-op.
    fn unobserve(&mut self, node: NodeId);
}

impl<T: VisibilityObserver + ?Sized> VisibilityObserver for Box<T> {
    fn observe(&mut self, node: NodeId, options: &ObserveOptions) {
        (**self).observe(node, options);
    }

    fn unobserve(&mut self, node: NodeId) {
        (**self).unobserve(node);
    }
}

/// Handle returned by [`ScrollListeners::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Which host events a listener wants and how it is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Passive listeners never block scrolling.
    pub passive: bool,
    /// Also fire on viewport resize.
    pub resize: bool,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            passive: true,
            resize: false,
        }
    }
}

/// Registration half of the scroll/resize signal.
pub trait ScrollListeners {
    fn listen(&mut self, options: ListenerOptions) -> ListenerId;

    /// Remove a listener. Removing an unknown id is a no-op.
    fn unlisten(&mut self, id: ListenerId);
}

impl<T: ScrollListeners + ?Sized> ScrollListeners for Box<T> {
    fn listen(&mut self, options: ListenerOptions) -> ListenerId {
        (**self).listen(options)
    }

    fn unlisten(&mut self, id: ListenerId) {
        (**self).unlisten(id);
    }
}

/// One scroll/resize tick as sampled by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollSignal {
    pub scroll_y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl ScrollSignal {
    pub fn new(scroll_y: f64, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_width,
            viewport_height,
        }
    }

    /// The viewport as a rectangle at the origin.
    pub fn viewport(&self) -> ClientRect {
        ClientRect::from_size(self.viewport_width, self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn listener_ids_key_ordered_maps() {
        let mut installed = BTreeMap::new();
        installed.insert(ListenerId(3), ListenerOptions::default());
        installed.insert(ListenerId(1), ListenerOptions::default());
        let ids: Vec<_> = installed.keys().copied().collect();
        assert_eq!(ids, vec![ListenerId(1), ListenerId(3)]);
        assert!(installed.remove(&ListenerId(3)).is_some());
    }

    #[test]
    fn default_listener_is_passive_scroll_only() {
        let options = ListenerOptions::default();
        assert!(options.passive);
        assert!(!options.resize);
    }

    #[test]
    fn viewport_sits_at_origin() {
        let rect = ScrollSignal::new(500.0, 1280.0, 800.0).viewport();
        assert_eq!(rect.top, 0.0);
        assert_eq!(rect.height, 800.0);
    }
}
