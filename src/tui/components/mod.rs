pub mod animations;
pub mod dialogs;

use crate::tui::{themes::Theme, Frame};
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;

/// Base trait for UI components layered by the app
pub trait Component: Send + Sync {
    /// Handle keyboard input. Returns `true` when the component consumed it.
    fn handle_key_event(&mut self, event: KeyEvent) -> Result<bool> {
        let _ = event;
        Ok(false)
    }

    /// Handle mouse input. Returns `true` when the component consumed it.
    fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<bool> {
        let _ = event;
        Ok(false)
    }

    /// Render the component
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Check if component is visible
    fn is_visible(&self) -> bool {
        true
    }
}
