//! Imperative dialog control handle
//!
//! A `DialogControl` is created by whoever wants to show a dialog, usually
//! long before the dialog is mounted. The mounted controller fills the
//! control's slot with a weak reference to itself; callers then drive the
//! dialog through `open` / `close` without touching its state.

use super::types::{DialogError, DialogId, DialogResult, DialogState, OpenOptions};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::trace;

/// Callback run once a dialog has fully closed
pub type CloseCallback = Box<dyn FnOnce() + Send + 'static>;

/// Operations a mounted dialog exposes through its control
pub trait DialogHandle: Send + Sync {
    fn open(&self, options: OpenOptions);
    fn close(&self, callback: Option<CloseCallback>);
    fn state(&self) -> DialogState;
}

type Slot = Arc<RwLock<Option<Weak<dyn DialogHandle>>>>;

/// Cloneable handle identifying one dialog instance
#[derive(Clone)]
pub struct DialogControl {
    id: DialogId,
    slot: Slot,
}

impl DialogControl {
    /// Create a control with a freshly generated id
    pub fn new() -> Self {
        Self::with_id(DialogId::generate())
    }

    pub fn with_id(id: impl Into<DialogId>) -> Self {
        Self {
            id: id.into(),
            slot: Arc::new(RwLock::new(None)),
        }
    }

    pub fn id(&self) -> &DialogId {
        &self.id
    }

    fn handle(&self) -> Option<Arc<dyn DialogHandle>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Whether a live dialog currently backs this control
    pub fn is_mounted(&self) -> bool {
        self.handle().is_some()
    }

    pub fn open(&self) {
        self.open_with(OpenOptions::default());
    }

    pub fn open_with(&self, options: OpenOptions) {
        match self.handle() {
            Some(handle) => handle.open(options),
            None => trace!(dialog_id = %self.id, "open ignored, dialog not mounted"),
        }
    }

    pub fn close(&self) {
        self.close_with(None);
    }

    /// Close and run `callback` once the dialog has fully closed
    pub fn close_then(&self, callback: impl FnOnce() + Send + 'static) {
        self.close_with(Some(Box::new(callback)));
    }

    pub fn close_with(&self, callback: Option<CloseCallback>) {
        match self.handle() {
            Some(handle) => handle.close(callback),
            None => {
                // An unmounted dialog is closed; never strand the caller
                trace!(dialog_id = %self.id, "close on unmounted dialog");
                if let Some(callback) = callback {
                    callback();
                }
            }
        }
    }

    /// Last known lifecycle state, `Closed` when nothing is mounted
    pub fn state(&self) -> DialogState {
        self.handle()
            .map(|handle| handle.state())
            .unwrap_or(DialogState::Closed)
    }

    /// Advisory open flag
    pub fn is_open(&self) -> bool {
        self.state().is_presented()
    }

    /// Bind a mounted dialog to this control
    pub(crate) fn populate(&self, handle: Weak<dyn DialogHandle>) -> DialogResult<()> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().and_then(Weak::upgrade).is_some() {
            return Err(DialogError::AlreadyMounted(self.id.clone()));
        }
        *slot = Some(handle);
        Ok(())
    }

    /// Unbind whatever dialog backs this control
    pub(crate) fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for DialogControl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DialogControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogControl")
            .field("id", &self.id)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// Close capability handed to dialog content
#[derive(Debug, Clone)]
pub struct DialogContext {
    control: DialogControl,
}

impl DialogContext {
    pub(crate) fn new(control: DialogControl) -> Self {
        Self { control }
    }

    pub fn id(&self) -> &DialogId {
        self.control.id()
    }

    pub fn close(&self) {
        self.control.close();
    }

    pub fn close_then(&self, callback: impl FnOnce() + Send + 'static) {
        self.control.close_then(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        opens: AtomicUsize,
        closes: AtomicUsize,
        state: Mutex<DialogState>,
    }

    impl DialogHandle for Recorder {
        fn open(&self, _options: OpenOptions) {
            self.opens.fetch_add(1, Ordering::SeqCst);
            *self.state.lock().unwrap() = DialogState::Opening;
        }

        fn close(&self, callback: Option<CloseCallback>) {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if let Some(callback) = callback {
                callback();
            }
        }

        fn state(&self) -> DialogState {
            *self.state.lock().unwrap()
        }
    }

    #[test]
    fn test_unpopulated_control_is_inert() {
        let control = DialogControl::with_id("d1");
        control.open();
        assert!(!control.is_mounted());
        assert!(!control.is_open());
        assert_eq!(control.state(), DialogState::Closed);
    }

    #[test]
    fn test_unpopulated_close_still_calls_back() {
        let control = DialogControl::with_id("d1");
        let called = Arc::new(AtomicUsize::new(0));
        let seen = called.clone();
        control.close_then(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(called.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_populated_control_forwards() {
        let control = DialogControl::with_id("d1");
        let recorder = Arc::new(Recorder::default());
        let handle: Arc<dyn DialogHandle> = recorder.clone();
        control.populate(Arc::downgrade(&handle)).unwrap();

        let clone = control.clone();
        clone.open();
        assert_eq!(recorder.opens.load(Ordering::SeqCst), 1);
        assert!(control.is_open());

        clone.close();
        assert_eq!(recorder.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_second_live_mount_is_rejected() {
        let control = DialogControl::with_id("d1");
        let first: Arc<dyn DialogHandle> = Arc::new(Recorder::default());
        let second: Arc<dyn DialogHandle> = Arc::new(Recorder::default());
        control.populate(Arc::downgrade(&first)).unwrap();
        assert!(matches!(
            control.populate(Arc::downgrade(&second)),
            Err(DialogError::AlreadyMounted(_))
        ));

        // a dead handle can be replaced
        drop(first);
        assert!(!control.is_mounted());
        control.populate(Arc::downgrade(&second)).unwrap();
        assert!(control.is_mounted());
    }

    #[test]
    fn test_context_closes_owner() {
        let control = DialogControl::with_id("d1");
        let recorder = Arc::new(Recorder::default());
        let handle: Arc<dyn DialogHandle> = recorder.clone();
        control.populate(Arc::downgrade(&handle)).unwrap();

        let context = DialogContext::new(control.clone());
        assert_eq!(context.id().as_str(), "d1");
        context.close();
        assert_eq!(recorder.closes.load(Ordering::SeqCst), 1);

        control.clear();
        assert!(!control.is_mounted());
    }
}
