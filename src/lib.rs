//! Modal dialog lifecycle for terminal applications
//!
//! Dialogs are opened and closed through a [`DialogControl`], mounted as a
//! [`DialogController`] and tracked in a process-wide [`DialogRegistry`].

pub mod cli;
pub mod config;
pub mod tui;

pub use config::DialogSettings;
pub use tui::components::dialogs::{
    AccessibilityImportance, CloseCallback, DialogBody, DialogConfig, DialogContext,
    DialogControl, DialogController, DialogError, DialogEvent, DialogHandle, DialogHost, DialogId,
    DialogRegistry, DialogResult, DialogState, DialogVariant, DismissTrigger, InputOutcome,
    OpenOptions, PresentationHints,
};
