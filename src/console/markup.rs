//! HTML rendering for the prompt line and transcript text.
//!
//! Prompt rendering is a pure function of `(text, cursor)`; the console
//! stores its result as the live prompt's display markup.

use crate::console::settings;

/// Escape prompt text for inline display.
pub fn html_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            ' ' => out.push_str("&nbsp;"),
            '\n' => out.push_str("<br />"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the editable line with a caret at `cursor` (a char index).
///
/// An empty line renders as a bare caret; a caret at the end trails the
/// text; otherwise the char under the caret is wrapped in the caret span.
pub fn render_prompt(text: &str, cursor: usize) -> String {
    let len = text.chars().count();
    let cursor = cursor.min(len);
    if text.is_empty() {
        return settings::CURSOR_EMPTY.to_string();
    }
    if cursor == len {
        return format!(
            "<span class=\"{}\">{}</span>{}",
            settings::CLASS_BEFORE,
            html_encode(text),
            settings::CURSOR_EMPTY
        );
    }

    let before: String = text.chars().take(cursor).collect();
    let current: String = text.chars().skip(cursor).take(1).collect();
    let after: String = text.chars().skip(cursor + 1).collect();
    format!(
        "<span class=\"{}\">{}</span><span class=\"{}\">{}</span><span class=\"{}\">{}</span>",
        settings::CLASS_BEFORE,
        html_encode(&before),
        settings::CLASS_CURSOR,
        html_encode(&current),
        settings::CLASS_AFTER,
        html_encode(&after)
    )
}

/// Render a submitted line with no caret.
pub fn render_frozen(text: &str) -> String {
    format!(
        "<span class=\"{}\">{}</span>",
        settings::CLASS_BEFORE,
        html_encode(text)
    )
}

/// Escape message text keeping its line breaks and spacing visible.
pub fn filled_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br/>"),
            '\t' => out.push_str("&nbsp;&nbsp;"),
            ch if ch.is_whitespace() => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a prompt label; spaces become non-breaking.
pub fn label_markup(label: &str) -> String {
    html_encode(label)
}

/// Decode markup into plain text.
///
/// `<br>` variants become newlines, other tags are dropped, and entities are
/// decoded (`&nbsp;` to a plain space). Unknown entities pass through.
pub fn decode_html(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '<' => {
                let Some(end) = rest.find('>') else {
                    out.push_str(rest);
                    break;
                };
                if is_line_break_tag(&rest[1..end]) {
                    out.push('\n');
                }
                rest = &rest[end + 1..];
            }
            '&' => {
                match rest.find(';').filter(|end| *end <= 10) {
                    Some(end) => match decode_entity(&rest[1..end]) {
                        Some(decoded) => {
                            out.push(decoded);
                            rest = &rest[end + 1..];
                        }
                        None => {
                            out.push('&');
                            rest = &rest[1..];
                        }
                    },
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    out
}

fn is_line_break_tag(tag: &str) -> bool {
    let name = tag.trim().trim_end_matches('/').trim();
    name.eq_ignore_ascii_case("br")
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
