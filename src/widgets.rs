//! Clickable UI components: each one renders and registers its own targets.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

/// One-row tab strip whose click targets follow the rendered label widths
/// (CJK labels are two cells per character).
///
/// ```ignore
/// TabBar::new("│")
///     .tab("農場", style, TAB_FARM)
///     .tab("ショップ", style, TAB_SHOP)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    /// Wrap in a block; targets are placed inside its borders.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Labels as rendered, paired with `(display_width, action_id)`.
    fn layout(&self) -> (Vec<Span<'_>>, Vec<(u16, u16)>) {
        let mut spans = Vec::new();
        let mut widths = Vec::new();
        for (i, (label, style, action_id)) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            let padded = format!(" {} ", label);
            widths.push((Line::from(padded.as_str()).width() as u16, *action_id));
            spans.push(Span::styled(padded, *style));
        }
        (spans, widths)
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let sep_width = Line::from(self.separator).width() as u16;
        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));
        let (spans, widths) = self.layout();

        let mut paragraph = Paragraph::new(Line::from(spans));
        if let Some(block) = self.block.clone() {
            paragraph = paragraph.block(block);
        }
        f.render_widget(paragraph, area);

        // Inner x/width for column accuracy, the full height for tap tolerance.
        cs.register_tab_targets(&widths, sep_width, inner.x, area.y, inner.width, area.height.max(1));
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines for a `Paragraph`, some of them bound to an action.
///
/// Targets follow their line, so inserting a header above a button moves the
/// button's target with it.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a row target per clickable line, one line per row.
    ///
    /// `top_offset`/`bottom_offset` are the border rows of `area`; `scroll`
    /// is the paragraph's vertical scroll. Rows that fall outside the visible
    /// content are skipped.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, action_id) in &self.actions {
            if line_idx < scroll {
                continue;
            }
            let row = content_y + (line_idx - scroll);
            if row < content_end {
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratzilla::ratatui::widgets::Borders;

    #[test]
    fn tab_layout_measures_cjk_width() {
        let bar = TabBar::new("│")
            .tab("農場", Style::default(), 10)
            .tab("Shop", Style::default(), 11);
        let (spans, widths) = bar.layout();
        // label, separator, label
        assert_eq!(spans.len(), 3);
        // " 農場 " is 1 + 4 + 1 cells
        assert_eq!(widths, vec![(6, 10), (6, 11)]);
    }

    #[test]
    fn list_targets_follow_lines() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("header"));
        cl.push(Line::from("another header"));
        cl.push_clickable(Line::from("buy"), 42);
        cl.push_clickable(Line::from("sell"), 43);

        let area = Rect::new(0, 5, 80, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0);
        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(10, 8), Some(42));
        assert_eq!(cs.hit_test(10, 9), Some(43));
        assert_eq!(cs.hit_test(10, 7), None);
    }

    #[test]
    fn list_targets_are_clipped_by_border() {
        let mut cl = ClickableList::new();
        for i in 0..20u16 {
            cl.push_clickable(Line::from(format!("item {}", i)), 50 + i);
        }
        let area = Rect::new(0, 0, 80, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0);
        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(10, 3), Some(52));
        assert_eq!(cs.hit_test(10, 4), None);
    }

    #[test]
    fn list_targets_skip_scrolled_lines() {
        let mut cl = ClickableList::new();
        for i in 0..4u16 {
            cl.push_clickable(Line::from(format!("item {}", i)), 100 + i);
        }
        let area = Rect::new(0, 10, 80, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 1, 2);
        assert_eq!(cs.hit_test(10, 10), Some(102));
        assert_eq!(cs.hit_test(10, 11), Some(103));
        assert_eq!(cs.targets.len(), 2);
    }

    #[test]
    fn into_lines_keeps_every_line() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("a"));
        cl.push_clickable(Line::from("b"), 1);
        assert_eq!(cl.into_lines().len(), 2);
    }

    #[test]
    fn bordered_panel_targets_start_inside_border() {
        let area = Rect::new(2, 4, 40, 6);
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let top = inner.y - area.y;
        let bottom = (area.y + area.height) - (inner.y + inner.height);

        let mut cl = ClickableList::new();
        cl.push(Line::from("Lv.3"));
        cl.push_clickable(Line::from(" [C] dig"), 0);
        cl.push_clickable(Line::from(" [S] save"), 2);
        for i in 0..5u16 {
            cl.push_clickable(Line::from(format!("extra {}", i)), 300 + i);
        }
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, top, bottom, 0);

        // top border row
        assert_eq!(cs.hit_test(10, 4), None);
        // header row
        assert_eq!(cs.hit_test(10, 5), None);
        assert_eq!(cs.hit_test(10, 6), Some(0));
        assert_eq!(cs.hit_test(10, 7), Some(2));
        assert_eq!(cs.hit_test(10, 8), Some(300));
        // bottom border row
        assert_eq!(cs.hit_test(10, 9), None);
        assert_eq!(cs.targets.len(), 3);
    }
}
