//! Core dialog types
//!
//! Identifiers, lifecycle states, open options, presentation hints and the
//! per-dialog configuration shared by the controller, layout and view.

use super::dismiss::DismissTrigger;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unique identifier for dialog instances
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DialogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of one mounted dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl DialogState {
    /// Whether the dialog occupies the screen (anything but `Closed`)
    pub fn is_presented(self) -> bool {
        !matches!(self, DialogState::Closed)
    }
}

impl std::fmt::Display for DialogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DialogState::Closed => "closed",
            DialogState::Opening => "opening",
            DialogState::Open => "open",
            DialogState::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// Options accepted by `open`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Snap point to present a sheet at. `None` means the first one.
    pub index: Option<usize>,
}

impl OpenOptions {
    pub fn at_index(index: usize) -> Self {
        Self { index: Some(index) }
    }
}

/// Platform hints. These only change visuals and which dismissal listeners
/// exist, never the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationHints {
    pub has_keyboard: bool,
    pub has_pointer: bool,
    pub reduced_motion: bool,
}

impl Default for PresentationHints {
    fn default() -> Self {
        Self {
            has_keyboard: true,
            has_pointer: true,
            reduced_motion: false,
        }
    }
}

/// Shape of the inner surface
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogVariant {
    /// Panel centered in the outer region
    #[default]
    Centered,
    /// Bottom-anchored sheet; each snap point is a height percentage
    Sheet { snap_points: Vec<u16> },
}

impl DialogVariant {
    /// Height percentage for the requested snap index, clamped to the last
    /// snap point. Returns `None` for centered dialogs.
    pub fn snap_height(&self, index: Option<usize>) -> Option<u16> {
        match self {
            DialogVariant::Centered => None,
            DialogVariant::Sheet { snap_points } => {
                let last = snap_points.len().checked_sub(1)?;
                let index = index.unwrap_or(0).min(last);
                Some(snap_points[index].min(100))
            }
        }
    }
}

pub const DEFAULT_EXIT_DELAY: Duration = Duration::from_millis(150);
pub const DEFAULT_BACKDROP_FADE: Duration = Duration::from_millis(150);
pub const DEFAULT_INNER_FADE: Duration = Duration::from_millis(100);
pub const DEFAULT_BACKDROP_OPACITY: f32 = 0.8;
pub const DEFAULT_MAX_WIDTH: u16 = 72;

/// Per-dialog configuration
#[derive(Debug, Clone)]
pub struct DialogConfig {
    /// Dialog title (optional)
    pub title: Option<String>,
    /// Accessible label, announced instead of the title when present
    pub label: Option<String>,
    pub variant: DialogVariant,
    /// Delay between hiding content and finalizing the close
    pub exit_delay: Duration,
    /// Backdrop fade-in duration
    pub backdrop_fade: Duration,
    /// Inner panel fade-in-down duration
    pub inner_fade: Duration,
    pub backdrop_opacity: f32,
    /// Maximum width of the inner panel in cells
    pub max_width: u16,
    pub hints: PresentationHints,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            title: None,
            label: None,
            variant: DialogVariant::Centered,
            exit_delay: DEFAULT_EXIT_DELAY,
            backdrop_fade: DEFAULT_BACKDROP_FADE,
            inner_fade: DEFAULT_INNER_FADE,
            backdrop_opacity: DEFAULT_BACKDROP_OPACITY,
            max_width: DEFAULT_MAX_WIDTH,
            hints: PresentationHints::default(),
        }
    }
}

impl DialogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_variant(mut self, variant: DialogVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = delay;
        self
    }

    pub fn with_backdrop_fade(mut self, duration: Duration) -> Self {
        self.backdrop_fade = duration;
        self
    }

    pub fn with_inner_fade(mut self, duration: Duration) -> Self {
        self.inner_fade = duration;
        self
    }

    pub fn with_backdrop_opacity(mut self, opacity: f32) -> Self {
        self.backdrop_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_width(mut self, width: u16) -> Self {
        self.max_width = width;
        self
    }

    pub fn with_hints(mut self, hints: PresentationHints) -> Self {
        self.hints = hints;
        self
    }

    /// Reject configurations the layout cannot honour
    pub fn validate(&self) -> DialogResult<()> {
        if !self.backdrop_opacity.is_finite() {
            return Err(DialogError::InvalidConfig(format!(
                "backdrop_opacity must be a finite number, got {}",
                self.backdrop_opacity
            )));
        }
        if self.max_width < 4 {
            return Err(DialogError::InvalidConfig(format!(
                "max_width must be at least 4 cells, got {}",
                self.max_width
            )));
        }
        if let DialogVariant::Sheet { snap_points } = &self.variant {
            if snap_points.is_empty() {
                return Err(DialogError::InvalidConfig(
                    "sheet dialogs need at least one snap point".to_string(),
                ));
            }
            if snap_points.iter().any(|p| *p == 0 || *p > 100) {
                return Err(DialogError::InvalidConfig(
                    "snap points are percentages in 1..=100".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Events emitted by mounted dialogs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DialogEvent {
    StateChanged {
        id: DialogId,
        from: DialogState,
        to: DialogState,
    },
    Dismissed {
        id: DialogId,
        trigger: DismissTrigger,
    },
    RegistryChanged {
        any_open: bool,
    },
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("Dialog with ID '{0}' is already mounted")]
    AlreadyMounted(DialogId),

    #[error("Dialog with ID '{0}' not found")]
    NotFound(DialogId),

    #[error("Dialogs must be mounted inside a tokio runtime")]
    NoRuntime,

    #[error("Invalid dialog configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = DialogId::generate();
        let b = DialogId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_presented_states() {
        assert!(!DialogState::Closed.is_presented());
        assert!(DialogState::Opening.is_presented());
        assert!(DialogState::Open.is_presented());
        assert!(DialogState::Closing.is_presented());
        assert_eq!(DialogState::default(), DialogState::Closed);
    }

    #[test]
    fn test_snap_height_clamps() {
        let sheet = DialogVariant::Sheet {
            snap_points: vec![40, 90],
        };
        assert_eq!(sheet.snap_height(None), Some(40));
        assert_eq!(sheet.snap_height(Some(1)), Some(90));
        assert_eq!(sheet.snap_height(Some(7)), Some(90));
        assert_eq!(DialogVariant::Centered.snap_height(Some(1)), None);
    }

    #[test]
    fn test_config_validation() {
        assert!(DialogConfig::new().validate().is_ok());

        let empty_sheet = DialogConfig::new().with_variant(DialogVariant::Sheet {
            snap_points: vec![],
        });
        assert!(matches!(
            empty_sheet.validate(),
            Err(DialogError::InvalidConfig(_))
        ));

        let narrow = DialogConfig::new().with_max_width(2);
        assert!(narrow.validate().is_err());
    }

    #[test]
    fn test_non_finite_opacity_is_rejected() {
        let nan = DialogConfig::new().with_backdrop_opacity(f32::NAN);
        let infinite = DialogConfig {
            backdrop_opacity: f32::INFINITY,
            ..DialogConfig::new()
        };
        for config in [nan, infinite] {
            assert!(matches!(
                config.validate(),
                Err(DialogError::InvalidConfig(message)) if message.contains("backdrop_opacity")
            ));
        }
        let clamped = DialogConfig::new().with_backdrop_opacity(3.0);
        assert_eq!(clamped.backdrop_opacity, 1.0);
        assert!(clamped.validate().is_ok());
    }

    #[test]
    fn test_event_serialization() {
        let event = DialogEvent::StateChanged {
            id: DialogId::new("d1"),
            from: DialogState::Closed,
            to: DialogState::Opening,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "state_changed");
        assert_eq!(json["id"], "d1");
        assert_eq!(json["to"], "opening");
    }
}
