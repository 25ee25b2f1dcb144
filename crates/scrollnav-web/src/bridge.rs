#![forbid(unsafe_code)]

//! Command queue for a JS host.
//!
//! [`HostBridge`] implements the observer and listener traits by recording
//! what the engine asked for. The JS side drains the queue after each call
//! into the engine and applies the commands to real `IntersectionObserver`
//! and `addEventListener` primitives, then pushes the resulting entries and
//! scroll ticks back in.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use scrollnav_core::{
    ListenerId, ListenerOptions, NodeId, ObserveOptions, ScrollListeners, VisibilityObserver,
};
use tracing::trace;

/// One DOM operation for the host to perform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum HostCommand {
    /// `observer.observe(node)`, creating the observer with these options
    /// on first use.
    Observe {
        observer: u32,
        node: u64,
        thresholds: Vec<f64>,
        root_margin: String,
    },
    /// `observer.unobserve(node)`.
    Unobserve { observer: u32, node: u64 },
    /// `addEventListener("scroll", ..)`, plus `"resize"` when asked.
    Listen { id: u64, passive: bool, resize: bool },
    /// Remove the listener installed under `id`.
    Unlisten { id: u64 },
}

#[derive(Debug, Default)]
struct BridgeState {
    queue: VecDeque<HostCommand>,
    next_listener: u64,
}

/// Queues [`HostCommand`]s for one observer id.
///
/// Clones share the queue; [`for_observer`](Self::for_observer) yields a
/// handle on the same queue tagged with another observer id, so several
/// components can each own "their" observer.
#[derive(Debug, Clone)]
pub struct HostBridge {
    observer: u32,
    state: Rc<RefCell<BridgeState>>,
}

impl HostBridge {
    /// Bridge for observer `0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observer: 0,
            state: Rc::new(RefCell::new(BridgeState::default())),
        }
    }

    /// Handle on the same queue for a different observer.
    #[must_use]
    pub fn for_observer(&self, observer: u32) -> Self {
        Self {
            observer,
            state: Rc::clone(&self.state),
        }
    }

    pub fn observer_id(&self) -> u32 {
        self.observer
    }

    /// Take every queued command, oldest first.
    pub fn drain(&self) -> Vec<HostCommand> {
        self.state.borrow_mut().queue.drain(..).collect()
    }

    /// Commands waiting to be drained.
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    fn push(&self, command: HostCommand) {
        trace!(?command, "host command queued");
        self.state.borrow_mut().queue.push_back(command);
    }
}

impl Default for HostBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityObserver for HostBridge {
    fn observe(&mut self, node: NodeId, options: &ObserveOptions) {
        self.push(HostCommand::Observe {
            observer: self.observer,
            node: node.get(),
            thresholds: options.thresholds().to_vec(),
            root_margin: options.root_margin.to_string(),
        });
    }

    fn unobserve(&mut self, node: NodeId) {
        self.push(HostCommand::Unobserve {
            observer: self.observer,
            node: node.get(),
        });
    }
}

impl ScrollListeners for HostBridge {
    fn listen(&mut self, options: ListenerOptions) -> ListenerId {
        let id = {
            let mut st = self.state.borrow_mut();
            st.next_listener += 1;
            st.next_listener
        };
        self.push(HostCommand::Listen {
            id,
            passive: options.passive,
            resize: options.resize,
        });
        ListenerId(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.push(HostCommand::Unlisten { id: id.0 });
    }
}
