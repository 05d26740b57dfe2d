//! Color theme for the dialog host

use ratatui::style::{Color, Modifier, Style};

/// Theme colors used by dialogs and the demo shell
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub is_dark: bool,

    pub primary: Color,
    pub accent: Color,

    // Background colors
    pub bg_base: Color,
    /// Color the backdrop blends toward at full opacity
    pub bg_overlay: Color,

    // Foreground colors
    pub fg_base: Color,
    pub fg_muted: Color,

    // Border colors
    pub border: Color,
    pub border_focus: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            is_dark: true,
            primary: Color::Rgb(32, 139, 254),
            accent: Color::Rgb(255, 184, 76),
            bg_base: Color::Rgb(22, 30, 39),
            bg_overlay: Color::Rgb(0, 0, 0),
            fg_base: Color::Rgb(231, 236, 242),
            fg_muted: Color::Rgb(130, 145, 163),
            border: Color::Rgb(52, 66, 82),
            border_focus: Color::Rgb(32, 139, 254),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            is_dark: false,
            primary: Color::Rgb(16, 131, 254),
            accent: Color::Rgb(214, 128, 0),
            bg_base: Color::Rgb(255, 255, 255),
            bg_overlay: Color::Rgb(0, 0, 0),
            fg_base: Color::Rgb(11, 15, 20),
            fg_muted: Color::Rgb(102, 123, 153),
            border: Color::Rgb(212, 219, 226),
            border_focus: Color::Rgb(16, 131, 254),
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg_base).bg(self.bg_base)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.fg_muted).bg(self.bg_base)
    }

    pub fn focused(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .bg(self.bg_base)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
