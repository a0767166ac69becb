//! Queue transcript blocks and the live prompt onto a terminal writer.

use crate::console::{settings as console_settings, Block};
use crate::tui::settings;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::QueueableCommand;
use std::io::{self, Write};

const NEWLINE: &str = "\r\n";

/// Queue one transcript block, each line terminated by `\r\n`.
pub(crate) fn write_block<W>(out: &mut W, block: &Block, color: bool) -> io::Result<()>
where
    W: Write + QueueableCommand,
{
    match block {
        Block::Welcome { text } => {
            for line in text.split('\n') {
                write_colored(out, line, color.then_some(settings::COLOR_WELCOME))?;
                out.queue(Print(NEWLINE))?;
            }
        }
        Block::Message { text, class } => {
            let tint = settings::color_for_class(class.as_deref()).filter(|_| color);
            for line in text.split('\n') {
                write_colored(out, line, tint)?;
                out.queue(Print(NEWLINE))?;
            }
        }
        Block::Prompt { label, text } => {
            write_label(out, label, color)?;
            write_buffer_lines(out, text, color, settings::COLOR_FROZEN_PROMPT)?;
            out.queue(Print(NEWLINE))?;
        }
        Block::Suggestions { prompt, candidates } => {
            write_colored(
                out,
                console_settings::SUGGESTIONS_LABEL,
                color.then_some(settings::COLOR_SUGGESTION_LABEL),
            )?;
            for candidate in candidates {
                out.queue(Print(settings::SUGGESTION_SEPARATOR))?;
                write_colored(
                    out,
                    &format!("{prompt}{candidate}"),
                    color.then_some(settings::COLOR_SUGGESTION),
                )?;
            }
            out.queue(Print(NEWLINE))?;
        }
    }
    Ok(())
}

/// Queue the live prompt: label, then the buffer with continuation prefixes.
pub(crate) fn write_live_prompt<W>(out: &mut W, label: &str, text: &str, color: bool) -> io::Result<()>
where
    W: Write + QueueableCommand,
{
    write_label(out, label, color)?;
    write_buffer_lines(out, text, color, settings::COLOR_PROMPT_LABEL)
}

/// Cells each painted line of `block` occupies before soft wrapping.
pub(crate) fn painted_widths(block: &Block) -> Vec<usize> {
    let width = |text: &str| text.chars().count();
    match block {
        Block::Welcome { text } | Block::Message { text, .. } => {
            text.split('\n').map(width).collect()
        }
        Block::Prompt { label, text } => text
            .split('\n')
            .enumerate()
            .map(|(idx, line)| {
                let prefix = if idx == 0 {
                    width(label)
                } else {
                    width(settings::PROMPT_CONTINUATION)
                };
                prefix + width(line)
            })
            .collect(),
        Block::Suggestions { prompt, candidates } => {
            let spans = suggestion_spans(prompt, candidates);
            let end = spans
                .last()
                .map(|(_, end)| *end)
                .unwrap_or_else(|| width(console_settings::SUGGESTIONS_LABEL));
            vec![end]
        }
    }
}

/// Cell span `[start, end)` of each candidate on a painted suggestion line.
pub(crate) fn suggestion_spans(prompt: &str, candidates: &[String]) -> Vec<(usize, usize)> {
    let mut col = console_settings::SUGGESTIONS_LABEL.chars().count();
    let prompt_width = prompt.chars().count();
    candidates
        .iter()
        .map(|candidate| {
            col += settings::SUGGESTION_SEPARATOR.chars().count();
            let start = col;
            col += prompt_width + candidate.chars().count();
            (start, col)
        })
        .collect()
}

fn write_label<W>(out: &mut W, label: &str, color: bool) -> io::Result<()>
where
    W: Write + QueueableCommand,
{
    if color {
        out.queue(PrintStyledContent(
            label.with(settings::COLOR_PROMPT_LABEL).bold(),
        ))?;
    } else {
        out.queue(Print(label))?;
    }
    Ok(())
}

fn write_buffer_lines<W>(out: &mut W, text: &str, color: bool, tint: Color) -> io::Result<()>
where
    W: Write + QueueableCommand,
{
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    write_colored(out, first, color.then_some(tint))?;
    for line in lines {
        out.queue(Print(NEWLINE))?;
        write_colored(
            out,
            settings::PROMPT_CONTINUATION,
            color.then_some(settings::COLOR_CONTINUATION_PROMPT),
        )?;
        write_colored(out, line, color.then_some(tint))?;
    }
    Ok(())
}

fn write_colored<W>(out: &mut W, text: &str, tint: Option<Color>) -> io::Result<()>
where
    W: Write + QueueableCommand,
{
    match tint {
        Some(tint) => out.queue(PrintStyledContent(text.with(tint)))?,
        None => out.queue(Print(text))?,
    };
    Ok(())
}
