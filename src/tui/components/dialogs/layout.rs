//! Outer and inner dialog regions
//!
//! The outer region is the full-screen layer: backdrop, centering and the
//! outside-press target. The inner region is the bordered panel itself.

use super::types::DialogConfig;
use ratatui::layout::Rect;

/// Width of the close button drawn into the top border, in cells
pub const CLOSE_BUTTON_WIDTH: u16 = 3;

/// Calculated layout for a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    /// Full-screen outer region
    pub outer: Rect,
    /// The bordered panel
    pub inner: Rect,
    /// Area inside the panel border
    pub content: Rect,
    /// Close button cells on the top border
    pub close_button: Rect,
}

impl DialogLayout {
    /// Lay out a dialog inside `area`. `content_height` is the number of body
    /// rows the content wants, excluding the border.
    pub fn calculate(
        config: &DialogConfig,
        area: Rect,
        snap_index: Option<usize>,
        content_height: u16,
    ) -> Self {
        // Outer padding shrinks on narrow screens
        let padding = if area.width >= 80 { 2 } else { 1 };
        let width = config
            .max_width
            .min(area.width.saturating_sub(padding * 2))
            .max(area.width.min(4));

        let (height, y) = match config.variant.snap_height(snap_index) {
            Some(percent) => {
                let height = ((area.height as u32 * percent as u32) / 100) as u16;
                let height = height.max(area.height.min(3));
                (height, area.y + area.height - height)
            }
            None => {
                let height = content_height
                    .saturating_add(2)
                    .min(area.height.saturating_sub(padding * 2))
                    .max(area.height.min(3));
                (height, area.y + (area.height - height) / 2)
            }
        };
        let x = area.x + (area.width - width) / 2;

        let inner = Rect::new(x, y, width, height);
        let content = Rect::new(
            inner.x + 1,
            inner.y + 1,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(2),
        );
        let close_button = if inner.width > CLOSE_BUTTON_WIDTH + 2 {
            Rect::new(
                inner.x + inner.width - CLOSE_BUTTON_WIDTH - 1,
                inner.y,
                CLOSE_BUTTON_WIDTH,
                1,
            )
        } else {
            Rect::default()
        };

        Self {
            outer: area,
            inner,
            content,
            close_button,
        }
    }

    /// The inner panel lifted `rows` above its resting position
    pub fn lifted(&self, rows: u16) -> Self {
        let rows = rows.min(self.inner.y.saturating_sub(self.outer.y));
        let lift = |rect: Rect| Rect {
            y: rect.y.saturating_sub(rows),
            ..rect
        };
        Self {
            outer: self.outer,
            inner: lift(self.inner),
            content: lift(self.content),
            close_button: lift(self.close_button),
        }
    }

    pub fn on_close_button(&self, column: u16, row: u16) -> bool {
        contains(self.close_button, column, row)
    }
}

/// Whether the cell at `column`, `row` lies inside `area`
pub(crate) fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
