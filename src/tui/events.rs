use crate::tui::components::dialogs::DialogEvent;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event, drives transition redraws
    Tick,

    /// Lifecycle event from a mounted dialog
    Dialog(DialogEvent),

    /// Status message event
    StatusMessage(String),
}

/// Event handler merging terminal input, ticks and internal events
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    sender: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler and start reading terminal input
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let input = sender.clone();
        tokio::task::spawn_blocking(move || loop {
            let event = match crossterm::event::poll(tick_interval) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => convert_crossterm_event(event),
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        continue;
                    }
                },
                Ok(false) => Some(Event::Tick),
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            };
            if let Some(event) = event {
                if input.send(event).is_err() {
                    break;
                }
            }
        });

        Self { receiver, sender }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Channel whose dialog events end up in this handler
    pub fn dialog_sender(&self) -> mpsc::UnboundedSender<DialogEvent> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if sender.send(Event::Dialog(event)).is_err() {
                    break;
                }
            }
        });
        tx
    }
}

fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key_event) => Some(Event::Key(key_event)),
        CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::{DialogId, DialogState};
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_convert_keeps_input_events() {
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(
            convert_crossterm_event(CrosstermEvent::Key(key)),
            Some(Event::Key(k)) if k.code == KeyCode::Esc
        ));
        assert!(matches!(
            convert_crossterm_event(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        ));
        assert!(convert_crossterm_event(CrosstermEvent::FocusLost).is_none());
    }

    #[tokio::test]
    async fn test_dialog_events_are_forwarded() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let handler = EventHandler {
            receiver: mpsc::unbounded_channel().1,
            sender,
        };
        let dialog_tx = handler.dialog_sender();
        let event = DialogEvent::StateChanged {
            id: DialogId::new("d1"),
            from: DialogState::Closed,
            to: DialogState::Opening,
        };
        dialog_tx.send(event.clone()).unwrap();

        match receiver.recv().await {
            Some(Event::Dialog(received)) => assert_eq!(received, event),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
