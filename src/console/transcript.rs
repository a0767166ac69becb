//! Rendered output above the live prompt.

use crate::console::markup::{filled_text, html_encode, label_markup, render_frozen};
use crate::console::settings;
use serde::Serialize;

/// One rendered block in the console scrollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// The configured welcome message; survives `reset`.
    Welcome { text: String },
    /// A styled message line.
    Message { text: String, class: Option<String> },
    /// A submitted prompt line, frozen without a caret.
    Prompt { label: String, text: String },
    /// Clickable completion candidates for `prompt`.
    Suggestions {
        prompt: String,
        candidates: Vec<String>,
    },
}

impl Block {
    /// Render the block as a markup fragment; `id` keys clickable parts.
    pub fn to_html(&self, id: u64) -> String {
        match self {
            Self::Welcome { text } => message_html(text, Some(settings::CLASS_WELCOME)),
            Self::Message { text, class } => message_html(text, class.as_deref()),
            Self::Prompt { label, text } => prompt_box_html(label, &render_frozen(text)),
            Self::Suggestions { prompt, candidates } => {
                let mut html = format!(
                    "<div class=\"{}\"><span class=\"{}\">{}</span>",
                    settings::CLASS_SUGGESTIONS,
                    settings::CLASS_SYSTEM_PROMPT,
                    html_encode(settings::SUGGESTIONS_LABEL)
                );
                for (idx, candidate) in candidates.iter().enumerate() {
                    html.push_str(&format!(
                        " <a href data-block=\"{id}\" data-candidate=\"{idx}\">{}</a>",
                        html_encode(&format!("{prompt}{candidate}"))
                    ));
                }
                html.push_str("</div>");
                html
            }
        }
    }

    /// Plain-text view used by non-HTML hosts.
    pub fn plain_lines(&self) -> Vec<String> {
        match self {
            Self::Welcome { text } | Self::Message { text, .. } => {
                text.split('\n').map(str::to_string).collect()
            }
            Self::Prompt { label, text } => {
                let mut lines = text.split('\n');
                let mut out = vec![format!("{label}{}", lines.next().unwrap_or_default())];
                out.extend(lines.map(str::to_string));
                out
            }
            Self::Suggestions { prompt, candidates } => {
                let joined = candidates
                    .iter()
                    .map(|candidate| format!("{prompt}{candidate}"))
                    .collect::<Vec<_>>()
                    .join("  ");
                vec![format!("{} {joined}", settings::SUGGESTIONS_LABEL)]
            }
        }
    }
}

fn message_html(text: &str, class: Option<&str>) -> String {
    let classes = match class {
        Some(extra) => format!("{} {extra}", settings::CLASS_MESSAGE),
        None => settings::CLASS_MESSAGE.to_string(),
    };
    format!("<div class=\"{classes}\">{}</div>", filled_text(text))
}

/// Wrap a label and prompt markup in a prompt box.
pub(crate) fn prompt_box_html(label: &str, prompt_markup: &str) -> String {
    format!(
        "<div class=\"{}\"><span class=\"{}\">{}</span><span class=\"{}\">{}</span></div>",
        settings::CLASS_PROMPT_BOX,
        settings::CLASS_PROMPT_LABEL,
        label_markup(label),
        settings::CLASS_PROMPT,
        prompt_markup
    )
}

/// A block plus its stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: u64,
    #[serde(flatten)]
    pub block: Block,
}

/// Append-only scrollback with stable block ids.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    entries: Vec<Entry>,
    #[serde(skip)]
    next_id: u64,
}

impl Transcript {
    pub fn push(&mut self, block: Block) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry { id, block });
        id
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&Block> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.block)
    }

    /// Drop every block except the welcome message.
    pub fn clear_keep_welcome(&mut self) {
        self.entries
            .retain(|entry| matches!(entry.block, Block::Welcome { .. }));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.block.to_html(entry.id))
            .collect()
    }
}
