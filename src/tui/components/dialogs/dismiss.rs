//! Dismissal triggers
//!
//! A dialog can be dismissed by an explicit `close()`, by pressing the
//! pointer outside its inner panel, or by the Escape key. The scope below only
//! recognizes the input-driven triggers while it is attached, which the
//! controller does for exactly the time the dialog is fully open.

use super::layout::contains;
use super::types::PresentationHints;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use serde::Serialize;

/// What caused a dialog to start closing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissTrigger {
    /// `close()` was called on the control or dialog context
    Explicit,
    /// Pointer press on the backdrop, outside the inner panel
    Backdrop,
    /// Dismiss key while the dialog had focus
    EscapeKey,
}

impl std::fmt::Display for DismissTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DismissTrigger::Explicit => "explicit",
            DismissTrigger::Backdrop => "backdrop",
            DismissTrigger::EscapeKey => "escape",
        };
        f.write_str(name)
    }
}

/// Keyboard and outside-pointer listeners of one dialog
#[derive(Debug, Clone, Default)]
pub struct DismissScope {
    key_listener: bool,
    pointer_listener: bool,
}

impl DismissScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the listeners the platform supports. Returns `true` if anything
    /// changed.
    pub fn attach(&mut self, hints: &PresentationHints) -> bool {
        let before = (self.key_listener, self.pointer_listener);
        self.key_listener = hints.has_keyboard;
        self.pointer_listener = hints.has_pointer;
        before != (self.key_listener, self.pointer_listener)
    }

    /// Detach every listener. Returns `true` if anything was attached.
    pub fn detach(&mut self) -> bool {
        let was_attached = self.is_attached();
        self.key_listener = false;
        self.pointer_listener = false;
        was_attached
    }

    pub fn is_attached(&self) -> bool {
        self.key_listener || self.pointer_listener
    }

    /// Map a key press to the escape trigger
    pub fn match_key(&self, key: &KeyEvent) -> Option<DismissTrigger> {
        if !self.key_listener || key.kind == KeyEventKind::Release {
            return None;
        }
        (key.code == KeyCode::Esc && key.modifiers == KeyModifiers::NONE)
            .then_some(DismissTrigger::EscapeKey)
    }

    /// Map a pointer press outside `inner` to the backdrop trigger. Presses
    /// inside the panel never propagate to the backdrop.
    pub fn match_pointer(&self, mouse: &MouseEvent, inner: Rect) -> Option<DismissTrigger> {
        if !self.pointer_listener {
            return None;
        }
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return None;
        }
        // presses on the inner panel never reach the backdrop
        (!contains(inner, mouse.column, mouse.row)).then_some(DismissTrigger::Backdrop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_detached_scope_ignores_input() {
        let scope = DismissScope::new();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(scope.match_key(&esc), None);
        assert_eq!(scope.match_pointer(&press(0, 0), Rect::new(5, 5, 10, 5)), None);
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut scope = DismissScope::new();
        let hints = PresentationHints::default();
        assert!(scope.attach(&hints));
        assert!(!scope.attach(&hints));
        assert!(scope.detach());
        assert!(!scope.detach());
    }

    #[test]
    fn test_escape_matches_without_modifiers() {
        let mut scope = DismissScope::new();
        scope.attach(&PresentationHints::default());

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(scope.match_key(&esc), Some(DismissTrigger::EscapeKey));

        let shift_esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::SHIFT);
        assert_eq!(scope.match_key(&shift_esc), None);

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(scope.match_key(&enter), None);
    }

    #[test]
    fn test_pointer_outside_inner_only() {
        let mut scope = DismissScope::new();
        scope.attach(&PresentationHints::default());
        let inner = Rect::new(10, 5, 20, 8);

        assert_eq!(
            scope.match_pointer(&press(2, 2), inner),
            Some(DismissTrigger::Backdrop)
        );
        assert_eq!(scope.match_pointer(&press(10, 5), inner), None);
        assert_eq!(scope.match_pointer(&press(29, 12), inner), None);
        assert_eq!(
            scope.match_pointer(&press(30, 12), inner),
            Some(DismissTrigger::Backdrop)
        );

        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            ..press(0, 0)
        };
        assert_eq!(scope.match_pointer(&moved, inner), None);
    }

    #[test]
    fn test_hints_limit_listeners() {
        let mut scope = DismissScope::new();
        scope.attach(&PresentationHints {
            has_keyboard: false,
            has_pointer: true,
            reduced_motion: false,
        });
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(scope.match_key(&esc), None);
        assert!(scope.is_attached());
    }
}
