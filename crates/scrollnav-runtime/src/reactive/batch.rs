#![forbid(unsafe_code)]

//! Group several [`Observable`](super::Observable) writes into one
//! publication.
//!
//! Inside a [`BatchScope`], values update immediately but notifications are
//! deferred. When the outermost scope drops, each subscriber runs once with
//! the latest value, so consumers never see half of a multi-value update
//! (for example a new section label paired with the previous section id).
//!
//! # Invariants
//!
//! 1. Only the outermost scope flushes; nested scopes just nest.
//! 2. `get()` inside a batch returns the latest value.
//! 3. Deferred callbacks run in first-enqueue order; a callback enqueued
//!    twice runs once.

use std::cell::RefCell;
use tracing::trace;

type DeferredNotify = Box<dyn FnOnce()>;

struct DeferredEntry {
    key: usize,
    notify: DeferredNotify,
}

struct BatchContext {
    depth: u32,
    deferred: Vec<DeferredEntry>,
}

thread_local! {
    static BATCH_CTX: RefCell<Option<BatchContext>> = const { RefCell::new(None) };
}

/// True while a batch is open on this thread.
pub fn is_batching() -> bool {
    BATCH_CTX.with(|ctx| ctx.borrow().is_some())
}

/// Queue `f` under `key` in the open batch, replacing an earlier entry with
/// the same key in place. Runs `f` immediately when no batch is open.
///
/// Returns whether the call was deferred.
pub fn defer_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    BATCH_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(batch) = guard.as_mut() {
            if let Some(entry) = batch.deferred.iter_mut().find(|e| e.key == key) {
                entry.notify = Box::new(f);
            } else {
                batch.deferred.push(DeferredEntry {
                    key,
                    notify: Box::new(f),
                });
            }
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

fn flush() {
    let deferred: Vec<DeferredNotify> = BATCH_CTX.with(|ctx| {
        ctx.borrow_mut()
            .as_mut()
            .map(|batch| {
                std::mem::take(&mut batch.deferred)
                    .into_iter()
                    .map(|e| e.notify)
                    .collect()
            })
            .unwrap_or_default()
    });
    if deferred.is_empty() {
        return;
    }
    trace!(callbacks = deferred.len(), "flushing batched notifications");
    for notify in deferred {
        notify();
    }
}

/// RAII guard that opens a batch.
pub struct BatchScope {
    is_root: bool,
}

impl BatchScope {
    #[must_use]
    pub fn new() -> Self {
        let is_root = BATCH_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match guard.as_mut() {
                Some(batch) => {
                    batch.depth += 1;
                    false
                }
                None => {
                    *guard = Some(BatchContext {
                        depth: 1,
                        deferred: Vec::new(),
                    });
                    true
                }
            }
        });
        Self { is_root }
    }

    /// Notifications queued so far in the open batch.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        BATCH_CTX.with(|ctx| ctx.borrow().as_ref().map_or(0, |b| b.deferred.len()))
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let should_flush = BATCH_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match guard.as_mut() {
                Some(batch) => {
                    batch.depth -= 1;
                    batch.depth == 0
                }
                None => false,
            }
        });
        if should_flush {
            // The context stays installed while callbacks run, so writes they
            // make are queued and drained by the next pass.
            loop {
                flush();
                let pending = BATCH_CTX
                    .with(|ctx| ctx.borrow().as_ref().map_or(0, |b| b.deferred.len()));
                if pending == 0 {
                    break;
                }
            }
            BATCH_CTX.with(|ctx| *ctx.borrow_mut() = None);
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Observable;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn batch_coalesces_to_final_value() {
        let obs = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = obs.subscribe(move |v| s.borrow_mut().push(*v));

        {
            let _batch = BatchScope::new();
            obs.set(1);
            obs.set(2);
            obs.set(3);
            assert_eq!(obs.get(), 3);
            assert!(seen.borrow().is_empty());
        }
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn nested_scopes_flush_once_at_outermost() {
        let obs = Observable::new(0);
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| h.set(h.get() + 1));

        {
            let _outer = BatchScope::new();
            {
                let _inner = BatchScope::new();
                obs.set(1);
            }
            assert_eq!(hits.get(), 0);
            obs.set(2);
        }
        assert_eq!(hits.get(), 1);
        assert!(!is_batching());
    }

    #[test]
    fn pair_of_values_published_together() {
        let label = Observable::new(String::new());
        let section = Observable::new(0u32);
        let snapshots = Rc::new(RefCell::new(Vec::new()));

        let (l, s, out) = (label.clone(), section.clone(), Rc::clone(&snapshots));
        let _sub = label.subscribe(move |_| out.borrow_mut().push((l.get(), s.get())));

        {
            let _batch = BatchScope::new();
            label.set("AI Diagnostics".into());
            section.set(2);
        }
        assert_eq!(*snapshots.borrow(), vec![("AI Diagnostics".to_string(), 2)]);
    }

    #[test]
    fn unbatched_runs_immediately() {
        let ran = Rc::new(Cell::new(false));
        let r = Rc::clone(&ran);
        assert!(!defer_keyed(1, move || r.set(true)));
        assert!(ran.get());
    }
}
