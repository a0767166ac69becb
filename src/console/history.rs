//! Accepted-line history with draft-preserving recall.

/// Where the prompt currently sits in the recall ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Recall {
    /// Showing the in-progress draft.
    #[default]
    Draft,
    /// Showing a history entry; depth 1 is the most recent entry.
    Recalling(usize),
}

/// Append-only list of accepted lines plus recall state.
#[derive(Debug, Clone, Default)]
pub struct HistoryRing {
    entries: Vec<String>,
    recall: Recall,
    draft: String,
}

impl HistoryRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted line. Empty lines are dropped; the draft resets.
    pub fn add(&mut self, line: &str) {
        if !line.is_empty() {
            self.entries.push(line.to_string());
        }
        self.draft.clear();
        self.recall = Recall::Draft;
    }

    /// Entry at `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Most recently added entry.
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recall = Recall::Draft;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn recall(&self) -> Recall {
        self.recall
    }

    /// Recall depth; `0` while showing the draft.
    pub fn cursor(&self) -> usize {
        match self.recall {
            Recall::Draft => 0,
            Recall::Recalling(depth) => depth,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Store edited text as the draft and leave recall.
    pub fn record_edit(&mut self, text: &str) {
        self.draft.clear();
        self.draft.push_str(text);
        self.recall = Recall::Draft;
    }

    /// Forget the recall position without touching the draft.
    pub fn reset_recall(&mut self) {
        self.recall = Recall::Draft;
    }

    /// Walk the ring and return the text the prompt should now show.
    ///
    /// Negative deltas move toward older entries. The ring has `len + 1`
    /// slots (the draft plus every entry); stepping past either end wraps
    /// to the opposite end. Returns `None` when the history is empty.
    pub fn rotate(&mut self, delta: isize) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len() as isize;
        // Slot 0 is the draft; slot i (1..=len) shows entries[i - 1].
        let mut slot = match self.recall {
            Recall::Draft => 0,
            Recall::Recalling(depth) => len - depth as isize + 1,
        };
        slot += delta;
        if slot < 0 {
            slot = len;
        } else if slot > len {
            slot = 0;
        }
        if slot == 0 {
            self.recall = Recall::Draft;
            Some(&self.draft)
        } else {
            self.recall = Recall::Recalling((len - slot + 1) as usize);
            Some(&self.entries[(slot - 1) as usize])
        }
    }

    /// Expand a leading `!N` reference into the referenced entry.
    ///
    /// Returns `None` when `line` is not a numeric bang reference or there is
    /// nothing to recall. Unknown indexes fall back to the last entry.
    pub fn resolve_bang(&self, line: &str) -> Option<String> {
        let rest = line.strip_prefix('!')?;
        let token = rest.split(' ').next().unwrap_or_default();
        let index = parse_int_prefix(token)?;
        let hit = usize::try_from(index).ok().and_then(|idx| self.get(idx));
        hit.or_else(|| self.last()).map(str::to_string)
    }
}

/// Parse an optional sign followed by leading digits, ignoring any tail.
fn parse_int_prefix(token: &str) -> Option<i64> {
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long numbers; they can only fall back to the last entry.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
