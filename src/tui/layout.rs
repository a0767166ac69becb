//! Terminal row/column layout helpers for the live prompt.

use crate::tui::settings;
use crossterm::terminal;

/// Computed layout for label + edit buffer on the terminal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InputLayout {
    /// Total terminal rows consumed by label + buffer.
    pub(crate) total_rows: usize,
    /// Row index where the cursor should be placed.
    pub(crate) cursor_row: usize,
    /// Column index where the cursor should be placed.
    pub(crate) cursor_col: usize,
}

/// Read terminal width or fallback to 80 columns.
pub(crate) fn terminal_columns() -> usize {
    terminal::size()
        .ok()
        .map(|(cols, _)| cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(80)
}

/// Compute terminal layout for label + buffer and the caret position.
///
/// `cursor` is a char index into `buffer`.
pub(crate) fn compute_input_layout(
    buffer: &str,
    cursor: usize,
    cols: usize,
    label: &str,
) -> InputLayout {
    let mut row = 0usize;
    let mut col = 0usize;
    let mut cursor_pos: Option<(usize, usize)> = None;

    advance_text(label, cols, &mut row, &mut col);

    for (idx, ch) in buffer.chars().enumerate() {
        if idx == cursor {
            cursor_pos = Some((row, col));
        }
        if ch == '\n' {
            row += 1;
            col = 0;
            advance_text(settings::PROMPT_CONTINUATION, cols, &mut row, &mut col);
        } else {
            advance_char(cols, &mut row, &mut col);
        }
    }

    let (cursor_row, cursor_col) = cursor_pos.unwrap_or((row, col));
    InputLayout {
        total_rows: row + 1,
        cursor_row,
        cursor_col,
    }
}

/// Char index of the buffer cell at (`row`, `col`), relative to the label start.
///
/// Clicks past the end of the buffer map to its length; clicks on the label,
/// continuation prefixes, or outside the prompt return `None`.
pub(crate) fn char_index_at(
    buffer: &str,
    cols: usize,
    label: &str,
    target_row: usize,
    target_col: usize,
) -> Option<usize> {
    let mut row = 0usize;
    let mut col = 0usize;
    advance_text(label, cols, &mut row, &mut col);

    let mut count = 0usize;
    for (idx, ch) in buffer.chars().enumerate() {
        if (row, col) == (target_row, target_col) {
            return Some(idx);
        }
        if ch == '\n' {
            row += 1;
            col = 0;
            advance_text(settings::PROMPT_CONTINUATION, cols, &mut row, &mut col);
        } else {
            advance_char(cols, &mut row, &mut col);
        }
        count = idx + 1;
    }
    (row == target_row && target_col >= col).then_some(count)
}

fn advance_text(text: &str, cols: usize, row: &mut usize, col: &mut usize) {
    for ch in text.chars() {
        if ch == '\n' {
            *row += 1;
            *col = 0;
        } else {
            advance_char(cols, row, col);
        }
    }
}

/// Advance by one printable cell, wrapping to the next row when needed.
fn advance_char(cols: usize, row: &mut usize, col: &mut usize) {
    if cols == 0 {
        return;
    }
    if *col + 1 >= cols {
        *row += 1;
        *col = 0;
    } else {
        *col += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: &str = "> ";

    #[test]
    fn input_layout_tracks_soft_wraps() {
        let layout = compute_input_layout("abcdefghij", 10, 8, LABEL);
        assert_eq!(layout.total_rows, 2);
        assert_eq!(layout.cursor_row, 1);
        assert_eq!(layout.cursor_col, 4);
    }

    #[test]
    fn input_layout_tracks_multiline_and_cursor_position() {
        let layout = compute_input_layout("ab\ncde", 4, 20, LABEL);
        assert_eq!(layout.cursor_row, 1);
        assert_eq!(layout.cursor_col, 5);
        assert_eq!(layout.total_rows, 2);
    }

    #[test]
    fn input_layout_wraps_exactly_at_terminal_edge() {
        let layout = compute_input_layout("abcd", 4, 11, LABEL);
        assert_eq!(layout.cursor_row, 0);
        assert_eq!(layout.cursor_col, 6);
        assert_eq!(layout.total_rows, 1);
    }

    #[test]
    fn input_layout_handles_wrapped_continuation_prefix() {
        // The continuation prefix itself wraps in very narrow terminals.
        let layout = compute_input_layout("\na", 2, 4, LABEL);
        assert_eq!(layout.cursor_row, 2);
        assert_eq!(layout.cursor_col, 1);
        assert_eq!(layout.total_rows, 3);
    }

    #[test]
    fn input_layout_cursor_can_be_mid_buffer() {
        let layout = compute_input_layout("abcdef", 2, 10, LABEL);
        assert_eq!(layout.cursor_row, 0);
        assert_eq!(layout.cursor_col, 4);
        assert_eq!(layout.total_rows, 1);
    }

    #[test]
    fn char_index_at_maps_cells_back_to_chars() {
        assert_eq!(char_index_at("abc", 80, LABEL, 0, 2), Some(0));
        assert_eq!(char_index_at("abc", 80, LABEL, 0, 4), Some(2));
        assert_eq!(char_index_at("abc", 80, LABEL, 0, 30), Some(3));
        assert_eq!(char_index_at("abc", 80, LABEL, 0, 0), None);
        assert_eq!(char_index_at("ab\ncd", 80, LABEL, 1, 5), Some(4));
        assert_eq!(char_index_at("abc", 80, LABEL, 3, 0), None);
    }

    #[test]
    fn input_layout_counts_chars_not_bytes() {
        let layout = compute_input_layout("héllo", 5, 80, LABEL);
        assert_eq!(layout.cursor_col, 7);
    }
}
