//! Dialog system
//!
//! A dialog is driven through a [`DialogControl`], mounted as a
//! [`DialogController`] and, when the shell owns several of them, hosted by a
//! [`DialogHost`]. Every open dialog is tracked in a [`DialogRegistry`].

pub mod control;
pub mod controller;
pub mod dismiss;
pub mod focus;
pub mod layout;
pub mod manager;
pub mod registry;
pub mod types;
pub mod view;

pub use control::{CloseCallback, DialogContext, DialogControl, DialogHandle};
pub use controller::{DialogController, OnCloseHook};
pub use dismiss::{DismissScope, DismissTrigger};
pub use focus::FocusTrap;
pub use layout::DialogLayout;
pub use manager::{DialogHost, InputOutcome};
pub use registry::{AccessibilityImportance, DialogRegistry};
pub use types::{
    DialogConfig, DialogError, DialogEvent, DialogId, DialogResult, DialogState, DialogVariant,
    OpenOptions, PresentationHints,
};
pub use view::DialogBody;
