//! Focus trap for the inner dialog surface
//!
//! Keeps keyboard focus cycling through the dialog's own focusable slots.
//! While enabled, every Tab / BackTab is consumed so focus can never move to
//! background content.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Default)]
pub struct FocusTrap {
    slots: Vec<String>,
    focused: Option<usize>,
    enabled: bool,
}

impl FocusTrap {
    pub fn new(slots: Vec<String>) -> Self {
        Self {
            slots,
            focused: None,
            enabled: false,
        }
    }

    pub fn set_slots(&mut self, slots: Vec<String>) {
        self.slots = slots;
        self.focused = if self.enabled && !self.slots.is_empty() {
            Some(0)
        } else {
            None
        };
    }

    /// Enable the trap and focus the first slot
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.focused = (!self.slots.is_empty()).then_some(0);
    }

    /// Release the trap and drop focus
    pub fn disable(&mut self) {
        self.enabled = false;
        self.focused = None;
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused
            .and_then(|index| self.slots.get(index))
            .map(String::as_str)
    }

    pub fn focus_next(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        let next = match self.focused {
            Some(index) => (index + 1) % self.slots.len(),
            None => 0,
        };
        self.focused = Some(next);
    }

    pub fn focus_previous(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        let previous = match self.focused {
            Some(0) | None => self.slots.len() - 1,
            Some(index) => index - 1,
        };
        self.focused = Some(previous);
    }

    /// Handle focus movement keys. Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.enabled || key.kind == KeyEventKind::Release {
            return false;
        }
        match key.code {
            KeyCode::BackTab => {
                self.focus_previous();
                true
            }
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.focus_previous();
                true
            }
            KeyCode::Tab => {
                self.focus_next();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trap() -> FocusTrap {
        FocusTrap::new(vec!["cancel".into(), "confirm".into(), "close".into()])
    }

    #[test]
    fn test_disabled_trap_passes_keys_through() {
        let mut trap = trap();
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert!(!trap.handle_key(&tab));
        assert_eq!(trap.focused(), None);
    }

    #[test]
    fn test_tab_loops() {
        let mut trap = trap();
        trap.enable();
        assert_eq!(trap.focused(), Some("cancel"));

        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert!(trap.handle_key(&tab));
        assert!(trap.handle_key(&tab));
        assert_eq!(trap.focused(), Some("close"));
        assert!(trap.handle_key(&tab));
        assert_eq!(trap.focused(), Some("cancel"));
    }

    #[test]
    fn test_back_tab_wraps_to_last() {
        let mut trap = trap();
        trap.enable();
        let back = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert!(trap.handle_key(&back));
        assert_eq!(trap.focused(), Some("close"));
    }

    #[test]
    fn test_empty_trap_still_consumes_tab() {
        let mut trap = FocusTrap::default();
        trap.enable();
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert!(trap.handle_key(&tab));
        assert_eq!(trap.focused(), None);
    }

    #[test]
    fn test_disable_drops_focus() {
        let mut trap = trap();
        trap.enable();
        trap.focus_next();
        trap.disable();
        assert_eq!(trap.focused(), None);
        trap.enable();
        assert_eq!(trap.focused(), Some("cancel"));
    }
}
