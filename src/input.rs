//! Input plumbing: normalized events, click targets and pixel-to-cell mapping.

use ratzilla::ratatui::layout::Rect;

/// Keyboard and pointer input, normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A tap on a registered target, by action ID (see `games::potato::actions`).
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets registered by the last render, plus the terminal size the
/// pointer handler needs to map pixels to cells.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Called at the start of every frame.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Full-width target on `row`, ignored when the row is outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a horizontal tab bar.
    ///
    /// `tab_widths` holds `(display_width, action_id)` for each padded label.
    /// Each target covers its label plus half of the neighbouring separators;
    /// the first and last tabs stretch to the edges so the bar has no gaps.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        let n = tab_widths.len();
        if n == 0 || total_width == 0 {
            return;
        }

        let mut starts: Vec<u16> = Vec::with_capacity(n);
        let mut cursor: u16 = 0;
        for (i, &(w, _)) in tab_widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }
        let end = |i: usize| starts[i] + tab_widths[i].0;

        for (i, &(_, action_id)) in tab_widths.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                end(i - 1) + (starts[i] - end(i - 1)) / 2
            };
            let right = if i == n - 1 {
                total_width
            } else {
                end(i) + (starts[i + 1] - end(i)) / 2
            };
            let w = right.saturating_sub(left);
            if w > 0 {
                self.add_click_target(Rect::new(x + left, y, w, height), action_id);
            }
        }
    }

    /// Action under a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }
}

/// Screens narrower than this stack the log under the game.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Map a pixel offset along one axis of the grid to a cell index.
///
/// `offset` is relative to the grid's edge, `extent` is the grid's pixel size
/// on that axis and `cells` the number of cells. None when outside the grid.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_rows_and_columns() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 10, 1), 1);
        cs.add_click_target(Rect::new(10, 5, 10, 1), 2);
        cs.add_click_target(Rect::new(0, 8, 40, 3), 3);

        assert_eq!(cs.hit_test(9, 5), Some(1));
        assert_eq!(cs.hit_test(10, 5), Some(2));
        assert_eq!(cs.hit_test(20, 5), None);
        assert_eq!(cs.hit_test(0, 10), Some(3));
        assert_eq!(cs.hit_test(0, 11), None);
    }

    #[test]
    fn later_target_wins_overlap() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 80, 1), 1);
        cs.add_click_target(Rect::new(5, 5, 10, 1), 2);
        assert_eq!(cs.hit_test(7, 5), Some(2));
        assert_eq!(cs.hit_test(20, 5), Some(1));
    }

    #[test]
    fn row_target_outside_area_is_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 1);
        cs.add_row_target(area, 15, 2);
        assert!(cs.targets.is_empty());
        cs.add_row_target(area, 12, 3);
        assert_eq!(cs.hit_test(15, 12), Some(3));
    }

    #[test]
    fn begin_frame_resets_targets() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.begin_frame(100, 40);
        assert!(cs.targets.is_empty());
        assert_eq!((cs.terminal_cols, cs.terminal_rows), (100, 40));
    }

    #[test]
    fn narrow_threshold() {
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
    }

    #[test]
    fn pixel_mapping() {
        assert_eq!(pixel_to_cell(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_to_cell(14.9, 450.0, 30), Some(0));
        assert_eq!(pixel_to_cell(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_to_cell(449.0, 450.0, 30), Some(29));
        assert_eq!(pixel_to_cell(450.0, 450.0, 30), None);
        assert_eq!(pixel_to_cell(-1.0, 450.0, 30), None);
        assert_eq!(pixel_to_cell(10.0, 0.0, 30), None);
        assert_eq!(pixel_to_cell(10.0, 450.0, 0), None);
    }

    #[test]
    fn tap_on_row_center_hits_that_row() {
        let mut cs = ClickState::new();
        cs.begin_frame(80, 30);
        for row in 0..30 {
            cs.add_click_target(Rect::new(0, row, 80, 1), row);
        }
        for row in 0..30u16 {
            let y = row as f64 * 15.0 + 7.5;
            let cell = pixel_to_cell(y, 450.0, cs.terminal_rows).unwrap();
            assert_eq!(cs.hit_test(0, cell), Some(row));
        }
    }

    #[test]
    fn tab_targets_split_separators() {
        // labels 6, 11, 12 wide with a 1-col separator
        let mut cs = ClickState::new();
        cs.register_tab_targets(&[(6, 10), (11, 11), (12, 12)], 1, 0, 0, 60, 1);
        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(0, 0), Some(10));
        assert_eq!(cs.hit_test(5, 0), Some(10));
        assert_eq!(cs.hit_test(6, 0), Some(11));
        assert_eq!(cs.hit_test(17, 0), Some(11));
        assert_eq!(cs.hit_test(18, 0), Some(12));
        assert_eq!(cs.hit_test(59, 0), Some(12));
    }

    #[test]
    fn tab_targets_respect_offset_and_height() {
        let mut cs = ClickState::new();
        cs.register_tab_targets(&[(6, 10), (6, 11)], 1, 5, 3, 30, 2);
        assert_eq!(cs.hit_test(5, 4), Some(10));
        assert_eq!(cs.hit_test(4, 3), None);
        assert_eq!(cs.hit_test(34, 3), Some(11));
    }

    #[test]
    fn no_tabs_no_targets() {
        let mut cs = ClickState::new();
        cs.register_tab_targets(&[], 3, 0, 0, 80, 1);
        assert!(cs.targets.is_empty());
    }
}
