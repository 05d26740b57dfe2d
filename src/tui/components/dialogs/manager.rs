//! Dialog host for mounting dialogs and routing input to them
//!
//! The host is responsible for:
//! - Mounting and unmounting dialogs behind their controls
//! - Routing key and pointer input to the topmost presented dialog
//! - Keeping background content inert while any dialog is presented
//! - Rendering presented dialogs in the order they opened

use super::{
    control::DialogControl,
    controller::DialogController,
    layout::DialogLayout,
    registry::DialogRegistry,
    types::{DialogConfig, DialogError, DialogEvent, DialogId, DialogResult},
    view::{self, DialogBody},
};
use crate::tui::{components::Component, themes::Theme, Frame};
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{buffer::Buffer, layout::Rect};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

/// Where an input event ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// A dialog consumed the event
    Handled,
    /// A dialog has focus but left the event to its content
    Dialog(DialogId),
    /// No dialog is presented; the event belongs to the background
    Background,
}

struct MountedDialog {
    controller: DialogController,
    body: DialogBody,
    /// Layout from the last render, used for close-button hit testing
    layout: Option<DialogLayout>,
}

/// Owns mounted dialogs and their content
pub struct DialogHost {
    registry: DialogRegistry,
    dialogs: Vec<MountedDialog>,
    event_sender: Option<mpsc::UnboundedSender<DialogEvent>>,
}

impl DialogHost {
    pub fn new(registry: DialogRegistry) -> Self {
        Self {
            registry,
            dialogs: Vec::new(),
            event_sender: None,
        }
    }

    pub fn registry(&self) -> &DialogRegistry {
        &self.registry
    }

    /// Forward events from every mounted dialog to `sender`
    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<DialogEvent>) {
        for dialog in &self.dialogs {
            dialog.controller.set_event_sender(sender.clone());
        }
        self.event_sender = Some(sender);
    }

    /// Mount a dialog behind `control`
    pub fn mount(
        &mut self,
        control: &DialogControl,
        config: DialogConfig,
        body: DialogBody,
    ) -> DialogResult<&DialogController> {
        if self.position(control.id()).is_some() {
            return Err(DialogError::AlreadyMounted(control.id().clone()));
        }
        let controller = DialogController::mount(control, config, self.registry.clone())?;
        controller.set_focus_slots(body.actions.clone());
        if let Some(sender) = &self.event_sender {
            controller.set_event_sender(sender.clone());
        }
        debug!(dialog_id = %control.id(), mounted = self.dialogs.len() + 1, "dialog added to host");

        self.dialogs.push(MountedDialog {
            controller,
            body,
            layout: None,
        });
        Ok(&self.dialogs[self.dialogs.len() - 1].controller)
    }

    /// Unmount a dialog, dropping its controller
    pub fn unmount(&mut self, id: &DialogId) -> DialogResult<()> {
        let index = self
            .position(id)
            .ok_or_else(|| DialogError::NotFound(id.clone()))?;
        self.dialogs.remove(index);
        Ok(())
    }

    fn position(&self, id: &DialogId) -> Option<usize> {
        self.dialogs
            .iter()
            .position(|dialog| dialog.controller.id() == id)
    }

    pub fn controller(&self, id: &DialogId) -> Option<&DialogController> {
        self.position(id).map(|index| &self.dialogs[index].controller)
    }

    pub fn control(&self, id: &DialogId) -> Option<DialogControl> {
        self.controller(id).map(|controller| controller.control().clone())
    }

    pub fn ids(&self) -> Vec<DialogId> {
        self.dialogs
            .iter()
            .map(|dialog| dialog.controller.id().clone())
            .collect()
    }

    /// Indices of presented dialogs, in the order they opened
    fn presented(&self) -> Vec<usize> {
        self.registry
            .open_ids()
            .iter()
            .filter_map(|id| self.position(id))
            .filter(|index| self.dialogs[*index].controller.state().is_presented())
            .collect()
    }

    /// The dialog that receives input
    pub fn topmost(&self) -> Option<&DialogController> {
        self.presented()
            .last()
            .map(|index| &self.dialogs[*index].controller)
    }

    /// Whether background content must ignore input
    pub fn captures_input(&self) -> bool {
        !self.presented().is_empty()
    }

    pub fn handle_key_event(&mut self, key: &KeyEvent) -> InputOutcome {
        let Some(top) = self.topmost() else {
            return InputOutcome::Background;
        };
        if top.handle_key_event(key) {
            InputOutcome::Handled
        } else {
            InputOutcome::Dialog(top.id().clone())
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: &MouseEvent) -> InputOutcome {
        let Some(&index) = self.presented().last() else {
            return InputOutcome::Background;
        };
        let dialog = &self.dialogs[index];

        let pressed = matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left));
        let on_close_button = dialog
            .layout
            .map(|layout| layout.on_close_button(mouse.column, mouse.row))
            .unwrap_or(false);
        if pressed && on_close_button && dialog.controller.content_visible() {
            dialog.controller.context().close();
            return InputOutcome::Handled;
        }

        if dialog.controller.handle_mouse_event(mouse) {
            InputOutcome::Handled
        } else {
            InputOutcome::Dialog(dialog.controller.id().clone())
        }
    }

    /// Draw every presented dialog into `buf`
    pub fn render_to_buffer(&mut self, buf: &mut Buffer, area: Rect, theme: &Theme) {
        let now = Instant::now();
        for index in self.presented() {
            let dialog = &mut self.dialogs[index];
            let controller = &dialog.controller;
            let resting = DialogLayout::calculate(
                controller.config(),
                area,
                controller.snap_index(),
                dialog.body.height(),
            );
            let entry = controller.entry();
            let lift = entry.map(|entry| entry.inner.lift_at(now)).unwrap_or(0);
            let layout = resting.lifted(lift);
            controller.set_inner_area(layout.inner);
            dialog.layout = Some(layout);

            // While closing only the input-catching outer layer remains
            if !controller.content_visible() {
                continue;
            }

            let backdrop = entry
                .map(|entry| entry.backdrop.opacity_at(now))
                .unwrap_or(controller.config().backdrop_opacity);
            let inner_opacity = entry.map(|entry| entry.inner.opacity_at(now)).unwrap_or(1.0);
            let focused = controller.focused_slot();

            view::render_outer(buf, &layout, backdrop, theme);
            view::render_inner(
                buf,
                &layout,
                controller.config(),
                &dialog.body,
                focused.as_deref(),
                inner_opacity,
                theme,
            );
        }
    }
}

impl Component for DialogHost {
    /// Background content must ignore the key unless this returns `false`
    fn handle_key_event(&mut self, event: KeyEvent) -> Result<bool> {
        Ok(DialogHost::handle_key_event(self, &event) != InputOutcome::Background)
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<bool> {
        Ok(DialogHost::handle_mouse_event(self, &event) != InputOutcome::Background)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.render_to_buffer(frame.buffer_mut(), area, theme);
    }

    /// Visible while any hosted dialog is presented
    fn is_visible(&self) -> bool {
        self.captures_input()
    }
}
