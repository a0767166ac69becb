//! Editable prompt line: text plus a char-indexed cursor.
//!
//! All offsets are char indices so splicing never lands inside a UTF-8
//! sequence. Every mutation leaves `cursor <= char_count(text)`.

/// The live prompt line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer with the cursor at the end of `text`.
    pub fn with_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(text);
        buffer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor offset in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        char_count(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.len()
    }

    /// Replace the whole line and park the cursor at its end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = char_count(&self.text);
    }

    /// Place the cursor, clamping to the buffer bounds.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.len());
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Splice `text` at the cursor and advance past it.
    pub fn insert(&mut self, text: &str) {
        let byte_idx = byte_index_at_char(&self.text, self.cursor);
        self.text.insert_str(byte_idx, text);
        self.cursor += char_count(text);
    }

    /// Remove the char left of the cursor. No-op at the start of the line.
    pub fn delete_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.delete_forward()
    }

    /// Remove the char under the cursor. No-op at the end of the line.
    pub fn delete_forward(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        delete_char_range(&mut self.text, self.cursor, self.cursor + 1);
        true
    }

    /// Kill from the cursor to the end of the buffer.
    pub fn delete_to_end(&mut self) -> bool {
        let len = self.len();
        if self.cursor >= len {
            return false;
        }
        delete_char_range(&mut self.text, self.cursor, len);
        true
    }

    /// Delete the boundary run at the cursor, then the word run after it.
    ///
    /// The leading run of non-word chars is deleted rather than skipped.
    pub fn delete_next_word(&mut self) -> bool {
        let boundary_end = scan_forward(&self.text, self.cursor, |ch| !is_word_char(ch));
        let word_end = scan_forward(&self.text, boundary_end, is_word_char);
        if word_end == self.cursor {
            return false;
        }
        delete_char_range(&mut self.text, self.cursor, word_end);
        true
    }

    /// Shift the cursor by `delta`. Out-of-range moves leave it in place.
    pub fn move_by(&mut self, delta: isize) -> bool {
        let target = self.cursor as isize + delta;
        if target < 0 || target > self.len() as isize {
            return false;
        }
        self.cursor = target as usize;
        delta != 0
    }

    pub fn move_to_start(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    pub fn move_to_end(&mut self) -> bool {
        let len = self.len();
        let moved = self.cursor != len;
        self.cursor = len;
        moved
    }

    /// Skip a boundary run, then a word run, toward the end.
    pub fn move_to_next_word(&mut self) -> bool {
        let boundary_end = scan_forward(&self.text, self.cursor, |ch| !is_word_char(ch));
        let target = scan_forward(&self.text, boundary_end, is_word_char);
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Skip a boundary run, then a word run, toward the start.
    pub fn move_to_previous_word(&mut self) -> bool {
        let boundary_start = scan_backward(&self.text, self.cursor, |ch| !is_word_char(ch));
        let target = scan_backward(&self.text, boundary_start, is_word_char);
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Leading whitespace of the line that holds the cursor.
    pub fn current_line_indent(&self) -> String {
        let start = line_start_char_index(&self.text, self.cursor);
        self.text
            .chars()
            .skip(start)
            .take_while(|ch| *ch != '\n' && ch.is_whitespace())
            .collect()
    }
}

/// Word chars are ASCII letters and digits; everything else is a boundary.
pub fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

fn scan_forward(text: &str, from: usize, keep: impl Fn(char) -> bool) -> usize {
    let skipped = text.chars().skip(from).take_while(|ch| keep(*ch)).count();
    from + skipped
}

fn scan_backward(text: &str, from: usize, keep: impl Fn(char) -> bool) -> usize {
    let mut idx = from;
    while idx > 0 && keep(char_at(text, idx - 1)) {
        idx -= 1;
    }
    idx
}

/// Delete a char range represented in char indices.
pub(crate) fn delete_char_range(buffer: &mut String, start_char: usize, end_char: usize) {
    if start_char >= end_char {
        return;
    }
    let start = byte_index_at_char(buffer, start_char);
    let end = byte_index_at_char(buffer, end_char);
    buffer.replace_range(start..end, "");
}

/// Return the char index for the start of the line holding `cursor`.
pub(crate) fn line_start_char_index(buffer: &str, cursor: usize) -> usize {
    let mut idx = cursor;
    while idx > 0 {
        if char_at(buffer, idx - 1) == '\n' {
            break;
        }
        idx -= 1;
    }
    idx
}

/// Convert a char index to a byte index, preserving UTF-8 boundaries.
pub(crate) fn byte_index_at_char(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    s.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// Return the char value at index, or NUL when out of range.
pub(crate) fn char_at(s: &str, char_idx: usize) -> char {
    s.chars().nth(char_idx).unwrap_or('\0')
}

/// Return total char count for a UTF-8 string.
pub(crate) fn char_count(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str, cursor: usize) -> EditBuffer {
        let mut buffer = EditBuffer::with_text(text);
        buffer.set_cursor(cursor);
        buffer
    }

    #[test]
    fn insert_then_backspace_restores_original() {
        let mut buffer = at("hello", 2);
        buffer.insert("xyz");
        assert_eq!(buffer.text(), "hexyzllo");
        assert_eq!(buffer.cursor(), 5);
        for _ in 0..3 {
            assert!(buffer.delete_backward());
        }
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn backspace_at_start_and_delete_at_end_are_noops() {
        let mut buffer = at("ab", 0);
        assert!(!buffer.delete_backward());
        buffer.move_to_end();
        assert!(!buffer.delete_forward());
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn delete_to_end_keeps_cursor() {
        let mut buffer = at("hello", 2);
        assert!(buffer.delete_to_end());
        assert_eq!(buffer.text(), "he");
        assert_eq!(buffer.cursor(), 2);
        assert!(!buffer.delete_to_end());
    }

    #[test]
    fn delete_next_word_eats_leading_boundary_run() {
        let mut buffer = at("ab  cd ef", 2);
        assert!(buffer.delete_next_word());
        assert_eq!(buffer.text(), "ab ef");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn move_to_next_word_stops_at_word_ends() {
        let mut buffer = at("ab  cd", 0);
        buffer.move_to_next_word();
        assert_eq!(buffer.cursor(), 2);
        buffer.move_to_next_word();
        assert_eq!(buffer.cursor(), 6);
        assert!(!buffer.move_to_next_word());
    }

    #[test]
    fn move_to_previous_word_stops_at_word_starts() {
        let mut buffer = at("ab  cd", 6);
        buffer.move_to_previous_word();
        assert_eq!(buffer.cursor(), 4);
        buffer.move_to_previous_word();
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn newline_is_a_word_boundary() {
        let mut buffer = at("ab\ncd", 0);
        buffer.move_to_next_word();
        assert_eq!(buffer.cursor(), 2);
        buffer.move_to_next_word();
        assert_eq!(buffer.cursor(), 5);
    }

    #[test]
    fn move_by_rejects_out_of_range() {
        let mut buffer = at("abc", 1);
        assert!(!buffer.move_by(-2));
        assert_eq!(buffer.cursor(), 1);
        assert!(!buffer.move_by(3));
        assert!(buffer.move_by(2));
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn current_line_indent_reads_line_under_cursor() {
        let buffer = at("fn main() {\n    let x = 1;", 20);
        assert_eq!(buffer.current_line_indent(), "    ");
        let buffer = at("  top\nnext", 2);
        assert_eq!(buffer.current_line_indent(), "  ");
    }

    #[test]
    fn byte_index_respects_utf8_boundaries() {
        let s = "aéz";
        assert_eq!(byte_index_at_char(s, 0), 0);
        assert_eq!(byte_index_at_char(s, 1), 1);
        assert_eq!(byte_index_at_char(s, 2), 3);
        assert_eq!(byte_index_at_char(s, 3), s.len());
    }

    #[test]
    fn multibyte_insert_and_delete() {
        let mut buffer = at("aé", 1);
        buffer.insert("ß");
        assert_eq!(buffer.text(), "aßé");
        assert!(buffer.delete_forward());
        assert_eq!(buffer.text(), "aß");
        assert_eq!(buffer.cursor(), 2);
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Edit {
            Insert(String),
            Backward,
            Forward,
            ToEnd,
            NextWordDelete,
            Move(isize),
            Start,
            End,
            NextWord,
            PreviousWord,
        }

        fn edit() -> impl Strategy<Value = Edit> {
            prop_oneof![
                proptest::string::string_regex("[a-z é\n]{0,4}")
                    .expect("regex")
                    .prop_map(Edit::Insert),
                Just(Edit::Backward),
                Just(Edit::Forward),
                Just(Edit::ToEnd),
                Just(Edit::NextWordDelete),
                (-6isize..6).prop_map(Edit::Move),
                Just(Edit::Start),
                Just(Edit::End),
                Just(Edit::NextWord),
                Just(Edit::PreviousWord),
            ]
        }

        proptest! {
            #[test]
            fn cursor_stays_within_text(edits in proptest::collection::vec(edit(), 0..40)) {
                let mut buffer = EditBuffer::new();
                for edit in edits {
                    match edit {
                        Edit::Insert(text) => buffer.insert(&text),
                        Edit::Backward => { buffer.delete_backward(); }
                        Edit::Forward => { buffer.delete_forward(); }
                        Edit::ToEnd => { buffer.delete_to_end(); }
                        Edit::NextWordDelete => { buffer.delete_next_word(); }
                        Edit::Move(delta) => { buffer.move_by(delta); }
                        Edit::Start => { buffer.move_to_start(); }
                        Edit::End => { buffer.move_to_end(); }
                        Edit::NextWord => { buffer.move_to_next_word(); }
                        Edit::PreviousWord => { buffer.move_to_previous_word(); }
                    }
                    prop_assert!(buffer.cursor() <= buffer.len());
                }
            }

            #[test]
            fn insert_then_backspace_restores(
                seed in proptest::string::string_regex("[a-zé ]{0,12}").expect("regex"),
                cursor in 0usize..14,
                typed in proptest::string::string_regex("[a-zé ]{1,6}").expect("regex"),
            ) {
                let mut buffer = EditBuffer::with_text(&seed);
                buffer.set_cursor(cursor);
                let before = buffer.clone();
                buffer.insert(&typed);
                for _ in 0..typed.chars().count() {
                    buffer.delete_backward();
                }
                prop_assert_eq!(buffer, before);
            }
        }
    }
}
