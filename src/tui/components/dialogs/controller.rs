//! Dialog lifecycle controller
//!
//! Owns the `Closed -> Opening -> Open -> Closing -> Closed` state machine of
//! one mounted dialog. All transitions are synchronous; the only deferred work
//! is the entry timer (`Opening -> Open`) and the exit timer
//! (`Closing -> Closed`), both scheduled on the tokio runtime the dialog was
//! mounted in.
//!
//! Every dismissal path (explicit close, backdrop press, Escape) goes through
//! `begin_close`, so they all share one teardown sequence:
//!
//! 1. state becomes `Closing`, listeners detach, content is hidden
//! 2. after the exit delay state becomes `Closed`
//! 3. the registry entry is cleared
//! 4. the `on_close` hook runs, then every close callback in call order

use super::{
    control::{CloseCallback, DialogContext, DialogControl, DialogHandle},
    dismiss::{DismissScope, DismissTrigger},
    focus::FocusTrap,
    registry::DialogRegistry,
    types::{DialogConfig, DialogError, DialogEvent, DialogId, DialogResult, DialogState, OpenOptions},
};
use crate::tui::components::animations::EntryTransition;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};
use tracing::{debug, trace};

/// Hook run after every completed close
pub type OnCloseHook = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Default)]
struct Core {
    state: DialogState,
    /// Bumped on every accepted transition; stale timers compare against it
    epoch: u64,
    content_visible: bool,
    snap_index: Option<usize>,
    entry: Option<EntryTransition>,
    scope: DismissScope,
    focus: FocusTrap,
    inner_area: Rect,
    entry_timer: Option<JoinHandle<()>>,
    exit_timer: Option<JoinHandle<()>>,
    pending_callbacks: Vec<CloseCallback>,
    on_close: Option<OnCloseHook>,
    /// Set once on unmount; handles that outlived the controller become inert
    unmounted: bool,
}

struct Inner {
    me: Weak<Inner>,
    id: DialogId,
    config: DialogConfig,
    registry: DialogRegistry,
    runtime: Handle,
    core: Mutex<Core>,
    events: Mutex<Option<mpsc::UnboundedSender<DialogEvent>>>,
}

/// A mounted dialog. Dropping it unmounts the dialog.
pub struct DialogController {
    inner: Arc<Inner>,
    control: DialogControl,
}

impl DialogController {
    /// Mount a dialog behind `control`, reporting to `registry`
    pub fn mount(
        control: &DialogControl,
        config: DialogConfig,
        registry: DialogRegistry,
    ) -> DialogResult<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| DialogError::NoRuntime)?;
        if !registry.claim(control.id()) {
            return Err(DialogError::AlreadyMounted(control.id().clone()));
        }

        let inner = Arc::new_cyclic(|me| Inner {
            me: me.clone(),
            id: control.id().clone(),
            config,
            registry,
            runtime,
            core: Mutex::new(Core {
                content_visible: true,
                ..Core::default()
            }),
            events: Mutex::new(None),
        });

        let handle: Weak<dyn DialogHandle> = Arc::downgrade(&inner) as Weak<dyn DialogHandle>;
        if let Err(e) = control.populate(handle) {
            inner.registry.prune(&inner.id);
            return Err(e);
        }
        debug!(dialog_id = %inner.id, "dialog mounted");

        Ok(Self {
            inner,
            control: control.clone(),
        })
    }

    pub fn id(&self) -> &DialogId {
        &self.inner.id
    }

    pub fn config(&self) -> &DialogConfig {
        &self.inner.config
    }

    pub fn control(&self) -> &DialogControl {
        &self.control
    }

    /// Close capability for the dialog's own content
    pub fn context(&self) -> DialogContext {
        DialogContext::new(self.control.clone())
    }

    /// Install the hook run after every completed close
    pub fn on_close(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.inner.core().on_close = Some(Arc::new(hook));
    }

    pub fn set_event_sender(&self, sender: mpsc::UnboundedSender<DialogEvent>) {
        *self
            .inner
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(sender);
    }

    pub fn open(&self, options: OpenOptions) {
        self.inner.open(options);
    }

    pub fn close(&self, callback: Option<CloseCallback>) {
        self.inner.begin_close(DismissTrigger::Explicit, callback);
    }

    /// Start closing on behalf of a specific trigger
    pub fn dismiss(&self, trigger: DismissTrigger) {
        self.inner.begin_close(trigger, None);
    }

    pub fn state(&self) -> DialogState {
        self.inner.core().state
    }

    /// Whether the inner content should be drawn
    pub fn content_visible(&self) -> bool {
        let core = self.inner.core();
        core.state.is_presented() && core.content_visible
    }

    pub fn entry(&self) -> Option<EntryTransition> {
        self.inner.core().entry
    }

    pub fn snap_index(&self) -> Option<usize> {
        self.inner.core().snap_index
    }

    /// Whether the dismissal listeners are currently attached
    pub fn listening(&self) -> bool {
        self.inner.core().scope.is_attached()
    }

    pub fn set_focus_slots(&self, slots: Vec<String>) {
        self.inner.core().focus.set_slots(slots);
    }

    pub fn focused_slot(&self) -> Option<String> {
        self.inner.core().focus.focused().map(str::to_string)
    }

    /// Record where the inner panel was laid out, for outside-press tests
    pub fn set_inner_area(&self, area: Rect) {
        self.inner.core().inner_area = area;
    }

    pub fn inner_area(&self) -> Rect {
        self.inner.core().inner_area
    }

    /// Feed a key press. Returns `true` when the dialog consumed it.
    pub fn handle_key_event(&self, key: &KeyEvent) -> bool {
        let trigger = {
            let mut core = self.inner.core();
            if core.focus.handle_key(key) {
                return true;
            }
            core.scope.match_key(key)
        };
        match trigger {
            Some(trigger) => {
                self.inner.begin_close(trigger, None);
                true
            }
            None => false,
        }
    }

    /// Feed a pointer event. Returns `true` when it dismissed the dialog.
    pub fn handle_mouse_event(&self, mouse: &MouseEvent) -> bool {
        let trigger = {
            let core = self.inner.core();
            core.scope.match_pointer(mouse, core.inner_area)
        };
        match trigger {
            Some(trigger) => {
                self.inner.begin_close(trigger, None);
                true
            }
            None => false,
        }
    }
}

impl Drop for DialogController {
    fn drop(&mut self) {
        self.control.clear();
        self.inner.unmount();
    }
}

impl Inner {
    fn core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, events: Vec<DialogEvent>) {
        let sender = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = sender.as_ref() {
            for event in events {
                let _ = sender.send(event);
            }
        }
    }

    fn transition(&self, from: DialogState, to: DialogState) -> DialogEvent {
        debug!(dialog_id = %self.id, %from, %to, "dialog state changed");
        DialogEvent::StateChanged {
            id: self.id.clone(),
            from,
            to,
        }
    }

    fn open(&self, options: OpenOptions) {
        let mut events = Vec::new();
        {
            let mut core = self.core();
            if core.unmounted {
                trace!(dialog_id = %self.id, "open on unmounted dialog");
                return;
            }
            if core.state != DialogState::Closed {
                // Covers double opens and opens while the exit delay runs
                trace!(dialog_id = %self.id, state = %core.state, "open ignored");
                return;
            }

            core.state = DialogState::Opening;
            core.epoch += 1;
            core.snap_index = options.index;
            core.content_visible = true;
            core.focus.enable();

            let entry = EntryTransition::start(
                self.config.backdrop_fade,
                self.config.backdrop_opacity,
                self.config.inner_fade,
                self.config.hints.reduced_motion,
            );
            core.entry = Some(entry);

            // Registry first, so the shell reacts before anything is visible
            let was_any_open = self.registry.any_open();
            self.registry.set_open(&self.id, true);

            let epoch = core.epoch;
            let me = self.me.clone();
            let delay = entry.total();
            core.entry_timer = Some(self.runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                if let Some(inner) = me.upgrade() {
                    inner.finish_opening(epoch);
                }
            }));

            events.push(self.transition(DialogState::Closed, DialogState::Opening));
            if !was_any_open {
                events.push(DialogEvent::RegistryChanged { any_open: true });
            }
        }
        self.emit(events);
    }

    fn finish_opening(&self, epoch: u64) {
        let event = {
            let mut core = self.core();
            if core.state != DialogState::Opening || core.epoch != epoch {
                return;
            }
            core.state = DialogState::Open;
            core.entry_timer = None;
            core.scope.attach(&self.config.hints);
            self.transition(DialogState::Opening, DialogState::Open)
        };
        self.emit(vec![event]);
    }

    fn begin_close(&self, trigger: DismissTrigger, callback: Option<CloseCallback>) {
        let mut events = Vec::new();
        {
            let mut core = self.core();
            let from = core.state;
            if core.unmounted {
                drop(core);
                trace!(dialog_id = %self.id, "close on unmounted dialog");
                if let Some(callback) = callback {
                    callback();
                }
                return;
            }
            match from {
                DialogState::Closed => {
                    drop(core);
                    trace!(dialog_id = %self.id, "close on closed dialog");
                    if let Some(callback) = callback {
                        callback();
                    }
                    return;
                }
                DialogState::Closing => {
                    trace!(dialog_id = %self.id, "close already in flight");
                    if let Some(callback) = callback {
                        core.pending_callbacks.push(callback);
                    }
                    return;
                }
                DialogState::Opening | DialogState::Open => {}
            }

            core.state = DialogState::Closing;
            core.epoch += 1;
            core.content_visible = false;
            core.scope.detach();
            core.focus.disable();
            if let Some(timer) = core.entry_timer.take() {
                timer.abort();
            }
            if let Some(callback) = callback {
                core.pending_callbacks.push(callback);
            }

            let epoch = core.epoch;
            let me = self.me.clone();
            let delay = self.config.exit_delay;
            core.exit_timer = Some(self.runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                if let Some(inner) = me.upgrade() {
                    inner.finish_closing(epoch);
                }
            }));

            debug!(dialog_id = %self.id, %trigger, "dialog dismissed");
            events.push(DialogEvent::Dismissed {
                id: self.id.clone(),
                trigger,
            });
            events.push(self.transition(from, DialogState::Closing));
        }
        self.emit(events);
    }

    fn finish_closing(&self, epoch: u64) {
        let (hook, callbacks) = {
            let mut core = self.core();
            if core.state != DialogState::Closing || core.epoch != epoch {
                return;
            }
            core.state = DialogState::Closed;
            core.content_visible = true;
            core.entry = None;
            core.snap_index = None;
            core.exit_timer = None;
            (core.on_close.clone(), std::mem::take(&mut core.pending_callbacks))
        };

        self.registry.set_open(&self.id, false);
        let mut events = vec![self.transition(DialogState::Closing, DialogState::Closed)];
        if !self.registry.any_open() {
            events.push(DialogEvent::RegistryChanged { any_open: false });
        }
        self.emit(events);

        run_close_callbacks(hook, callbacks);
    }

    fn unmount(&self) {
        let (was_closing, hook, callbacks) = {
            let mut core = self.core();
            for timer in [core.entry_timer.take(), core.exit_timer.take()]
                .into_iter()
                .flatten()
            {
                timer.abort();
            }
            core.scope.detach();
            core.focus.disable();
            let was_closing = core.state == DialogState::Closing;
            core.state = DialogState::Closed;
            core.epoch += 1;
            core.unmounted = true;
            (
                was_closing,
                core.on_close.clone(),
                std::mem::take(&mut core.pending_callbacks),
            )
        };

        let was_open = self.registry.is_open(&self.id);
        self.registry.prune(&self.id);
        debug!(dialog_id = %self.id, was_open, "dialog unmounted");
        if was_open && !self.registry.any_open() {
            self.emit(vec![DialogEvent::RegistryChanged { any_open: false }]);
        }

        // A close that was in flight still completes for its callers
        if was_closing {
            run_close_callbacks(hook, callbacks);
        }
    }
}

fn run_close_callbacks(hook: Option<OnCloseHook>, callbacks: Vec<CloseCallback>) {
    if let Some(hook) = hook {
        hook();
    }
    for callback in callbacks {
        callback();
    }
}

impl DialogHandle for Inner {
    fn open(&self, options: OpenOptions) {
        Inner::open(self, options);
    }

    fn close(&self, callback: Option<CloseCallback>) {
        self.begin_close(DismissTrigger::Explicit, callback);
    }

    fn state(&self) -> DialogState {
        self.core().state
    }
}
