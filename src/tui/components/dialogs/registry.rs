//! Process-wide open-dialog registry
//!
//! Maps every known dialog id to its open flag. The host shell reads it to
//! decide scroll lock, back-navigation interception and whether background
//! content stays visible to assistive technology. Writes happen at exactly two
//! points: when a controller accepts `open()` and when its exit delay ends.

use super::types::DialogId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tokio::sync::watch;
use tracing::trace;

/// How background content should be exposed to assistive technology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessibilityImportance {
    /// No dialog open, background is reachable
    Auto,
    /// A dialog is open, background is hidden
    NoHideDescendants,
}

#[derive(Debug, Default)]
struct Entries {
    flags: HashMap<DialogId, bool>,
    /// Currently open ids in the order they opened (last = topmost)
    order: Vec<DialogId>,
    /// Ids with a live mounted controller; one controller per id
    mounted: HashSet<DialogId>,
}

#[derive(Debug)]
struct Shared {
    entries: Mutex<Entries>,
    any_open: watch::Sender<bool>,
}

/// Cloneable handle to an open-dialog registry
#[derive(Debug, Clone)]
pub struct DialogRegistry {
    shared: Arc<Shared>,
}

static GLOBAL: OnceLock<DialogRegistry> = OnceLock::new();

impl DialogRegistry {
    /// Create an isolated registry
    pub fn new() -> Self {
        let (any_open, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(Entries::default()),
                any_open,
            }),
        }
    }

    /// The registry shared by the whole process
    pub fn global() -> &'static DialogRegistry {
        GLOBAL.get_or_init(DialogRegistry::new)
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.shared
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the open flag for a dialog
    pub fn set_open(&self, id: &DialogId, open: bool) {
        let any_open = {
            let mut entries = self.entries();
            entries.flags.insert(id.clone(), open);
            entries.order.retain(|existing| existing != id);
            if open {
                entries.order.push(id.clone());
            }
            !entries.order.is_empty()
        };
        trace!(dialog_id = %id, open, any_open, "registry updated");
        self.publish(any_open);
    }

    /// Reserve `id` for a mounting controller. Returns `false` when another
    /// live controller already owns it.
    pub(crate) fn claim(&self, id: &DialogId) -> bool {
        let claimed = self.entries().mounted.insert(id.clone());
        trace!(dialog_id = %id, claimed, "registry claim");
        claimed
    }

    /// Whether a live controller owns `id`
    pub fn is_mounted(&self, id: &DialogId) -> bool {
        self.entries().mounted.contains(id)
    }

    /// Forget a dialog entirely, releasing its claim
    pub fn prune(&self, id: &DialogId) {
        let any_open = {
            let mut entries = self.entries();
            entries.mounted.remove(id);
            if entries.flags.remove(id).is_none() {
                return;
            }
            entries.order.retain(|existing| existing != id);
            !entries.order.is_empty()
        };
        trace!(dialog_id = %id, any_open, "registry entry pruned");
        self.publish(any_open);
    }

    fn publish(&self, any_open: bool) {
        self.shared.any_open.send_if_modified(|current| {
            if *current == any_open {
                false
            } else {
                *current = any_open;
                true
            }
        });
    }

    /// Whether the given dialog is marked open
    pub fn is_open(&self, id: &DialogId) -> bool {
        self.entries().flags.get(id).copied().unwrap_or(false)
    }

    /// Whether the registry knows about the dialog at all
    pub fn contains(&self, id: &DialogId) -> bool {
        self.entries().flags.contains_key(id)
    }

    pub fn any_open(&self) -> bool {
        !self.entries().order.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.entries().order.len()
    }

    /// Open dialogs, oldest first
    pub fn open_ids(&self) -> Vec<DialogId> {
        self.entries().order.clone()
    }

    /// Most recently opened dialog that is still open
    pub fn topmost(&self) -> Option<DialogId> {
        self.entries().order.last().cloned()
    }

    /// Copy of every entry, open or closed
    pub fn snapshot(&self) -> HashMap<DialogId, bool> {
        self.entries().flags.clone()
    }

    pub fn accessibility(&self) -> AccessibilityImportance {
        if self.any_open() {
            AccessibilityImportance::NoHideDescendants
        } else {
            AccessibilityImportance::Auto
        }
    }

    /// Watch the "any dialog open" flag
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shared.any_open.subscribe()
    }
}

impl Default for DialogRegistry {
    fn default() -> Self {
        Self::new()
    }
}
