//! Rendering for the outer and inner dialog regions

use super::layout::DialogLayout;
use super::types::DialogConfig;
use crate::tui::components::animations::Animatable;
use crate::tui::themes::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

pub const CLOSE_BUTTON_LABEL: &str = "[x]";

/// What the inner panel shows
#[derive(Debug, Clone, Default)]
pub struct DialogBody {
    pub lines: Vec<Line<'static>>,
    /// Focusable actions, drawn as a button row under the text
    pub actions: Vec<String>,
}

impl DialogBody {
    pub fn new(lines: Vec<Line<'static>>) -> Self {
        Self {
            lines,
            actions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<String>) -> Self {
        self.actions = actions;
        self
    }

    /// Rows the body wants inside the border
    pub fn height(&self) -> u16 {
        let actions = if self.actions.is_empty() { 0 } else { 2 };
        (self.lines.len() as u16).saturating_add(actions)
    }
}

/// Dim everything under the outer region
pub fn render_outer(buf: &mut Buffer, layout: &DialogLayout, opacity: f32, theme: &Theme) {
    if opacity <= 0.0 {
        return;
    }
    let area = layout.outer.intersection(buf.area);
    let bg = theme.bg_base.interpolate(&theme.bg_overlay, opacity);
    let fg = theme.fg_base.interpolate(&theme.bg_overlay, opacity);
    buf.set_style(
        area,
        Style::default().fg(fg).bg(bg).add_modifier(Modifier::DIM),
    );
}

/// Draw the bordered panel, its close button and the body
pub fn render_inner(
    buf: &mut Buffer,
    layout: &DialogLayout,
    config: &DialogConfig,
    body: &DialogBody,
    focused: Option<&str>,
    opacity: f32,
    theme: &Theme,
) {
    let inner = layout.inner.intersection(buf.area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    Clear.render(inner, buf);

    let border = theme.bg_base.interpolate(&theme.border_focus, opacity);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border).bg(theme.bg_base))
        .style(theme.text());
    if let Some(title) = config.title.as_ref().or(config.label.as_ref()) {
        block = block.title(format!(" {title} "));
    }
    block.render(inner, buf);

    if layout.close_button.width > 0 {
        buf.set_string(
            layout.close_button.x,
            layout.close_button.y,
            CLOSE_BUTTON_LABEL,
            theme.muted(),
        );
    }

    let content = layout.content.intersection(buf.area);
    let action_rows = if body.actions.is_empty() { 0 } else { 2 };
    let text_area = Rect {
        height: content.height.saturating_sub(action_rows),
        ..content
    };
    Paragraph::new(body.lines.clone())
        .style(theme.text())
        .wrap(Wrap { trim: true })
        .render(text_area, buf);

    if action_rows > 0 && content.height >= action_rows {
        let row = Rect {
            y: content.y + content.height - 1,
            height: 1,
            ..content
        };
        Paragraph::new(action_line(&body.actions, focused, theme)).render(row, buf);
    }
}

fn action_line(actions: &[String], focused: Option<&str>, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(actions.len() * 2);
    for (index, action) in actions.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  ", theme.text()));
        }
        let style = if focused == Some(action.as_str()) {
            theme.focused()
        } else {
            theme.muted()
        };
        spans.push(Span::styled(format!(" {action} "), style));
    }
    Line::from(spans)
}
