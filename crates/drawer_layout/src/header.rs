//! Collapsible header tracking
//!
//! A coordinator whose first child is a collapsible header lets the header
//! absorb scroll before its siblings do. While the header is partially
//! collapsed the content still "can scroll", so the sheet must not move.
//! The consumed offset is only reported through listeners, so each header
//! found in the content tree gets a [`HeaderOffsetTracker`] registered on it
//! for as long as the sheet is attached.

use std::cell::Cell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::tree::{walk, NodeId, OffsetListener, VisualNode};

/// Remembers the last offset a header reported
#[derive(Debug, Default)]
pub struct HeaderOffsetTracker {
    offset: Cell<f32>,
}

impl HeaderOffsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// How far the header has collapsed, as a positive distance
    pub fn consumed(&self) -> f32 {
        self.offset.get().abs()
    }

    /// Strictly between fully expanded and fully collapsed
    pub fn is_partially_collapsed(&self, header_height: f32) -> bool {
        let consumed = self.consumed();
        consumed > 0.0 && consumed < header_height
    }
}

impl OffsetListener for HeaderOffsetTracker {
    fn on_offset_changed(&self, offset: f32) {
        self.offset.set(offset);
    }
}

/// Trackers registered on the headers of one content tree, keyed by node
#[derive(Debug, Default)]
pub struct HeaderBindings {
    trackers: FxHashMap<NodeId, Rc<HeaderOffsetTracker>>,
}

impl HeaderBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tracker on every header in `root` that lacks one.
    ///
    /// Returns the number of new bindings.
    pub fn bind_tree(&mut self, root: &dyn VisualNode) -> usize {
        let mut added = 0;
        walk(root, &mut |node| {
            let Some(header) = node.as_collapsible_header() else {
                return;
            };
            if self.trackers.contains_key(&node.id()) {
                return;
            }
            let tracker = Rc::new(HeaderOffsetTracker::new());
            let listener: Rc<dyn OffsetListener> = tracker.clone();
            header.add_offset_listener(listener);
            self.trackers.insert(node.id(), tracker);
            added += 1;
        });
        if added > 0 {
            tracing::debug!("bound {} collapsible header(s)", added);
        }
        added
    }

    /// Remove our trackers from every header still present in `root`, then
    /// forget all bindings
    pub fn unbind_tree(&mut self, root: &dyn VisualNode) {
        walk(root, &mut |node| {
            let Some(header) = node.as_collapsible_header() else {
                return;
            };
            if let Some(tracker) = self.trackers.remove(&node.id()) {
                let listener: Rc<dyn OffsetListener> = tracker;
                header.remove_offset_listener(&listener);
            }
        });
        if !self.trackers.is_empty() {
            tracing::debug!(
                "{} header binding(s) no longer in the tree, dropping",
                self.trackers.len()
            );
        }
        self.trackers.clear();
    }

    pub fn clear(&mut self) {
        self.trackers.clear();
    }

    pub fn get(&self, id: NodeId) -> Option<&HeaderOffsetTracker> {
        self.trackers.get(&id).map(|tracker| tracker.as_ref())
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
