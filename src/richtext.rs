//! Rich-text buffer abstraction for the editor session.
//!
//! The editor session only needs a narrow contract from a rich-text engine:
//! promote plain text into an editable buffer, accept edits, and serialize
//! the buffer back to text. Any concrete engine can sit behind it; the
//! shipped one is markdown-block based.

use pulldown_cmark::{Event, Parser, Tag};

/// An editable working copy of one field's content.
///
/// Created by a [`RichTextEngine`] from the field's current text; the field
/// itself stays untouched until the buffer is serialized and committed.
pub trait RichTextBuffer: Send {
    /// Replace the entire buffer content.
    fn replace_text(&mut self, text: &str);

    /// Append one line (a new block) to the buffer.
    fn append_line(&mut self, line: &str);

    /// Serialize the buffer back to its text form.
    fn to_text(&self) -> String;

    /// True if the buffer holds no content.
    fn is_empty(&self) -> bool;
}

/// Factory for editor buffers.
pub trait RichTextEngine: Send {
    /// Promote field text into an editable buffer. Pre-existing markup is
    /// parsed back into editable structure rather than treated as a single
    /// opaque string.
    fn from_text(&self, text: &str) -> Box<dyn RichTextBuffer>;
}

/// Markdown-backed engine: buffers are sequences of markdown blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownEngine;

impl MarkdownEngine {
    pub fn new() -> Self {
        Self
    }
}

impl RichTextEngine for MarkdownEngine {
    fn from_text(&self, text: &str) -> Box<dyn RichTextBuffer> {
        Box::new(MarkdownBuffer::from_text(text))
    }
}

/// Editable markdown document: one `String` per block, blank-line separated
/// in the serialized form.
#[derive(Debug, Clone, Default)]
pub struct MarkdownBuffer {
    blocks: Vec<String>,
}

impl MarkdownBuffer {
    /// Parse text into editable blocks.
    ///
    /// Markdown block boundaries (paragraphs, headings, list items, code
    /// fences) come from the parser, so previously saved markup round-trips
    /// into the same editable structure instead of one opaque blob.
    pub fn from_text(text: &str) -> Self {
        Self {
            blocks: split_blocks(text),
        }
    }

    /// The current blocks, in order.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }
}

impl RichTextBuffer for MarkdownBuffer {
    fn replace_text(&mut self, text: &str) {
        self.blocks = split_blocks(text);
    }

    fn append_line(&mut self, line: &str) {
        self.blocks.push(line.to_string());
    }

    fn to_text(&self) -> String {
        self.blocks.join("\n\n")
    }

    fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Split source text into top-level markdown blocks.
///
/// A `Start` event's offset range spans the whole element in the source, so
/// top-level blocks are exactly the block-tag starts that begin at or after
/// the end of the previous top-level block. Slicing the original source
/// keeps each block's exact markup.
fn split_blocks(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    let mut last_end = 0usize;

    for (event, range) in Parser::new(text).into_offset_iter() {
        let top_level_block = match &event {
            Event::Start(tag) => is_block_tag(tag),
            // Thematic breaks are standalone events, not Start/End pairs
            Event::Rule => true,
            _ => false,
        };

        if top_level_block && range.start >= last_end {
            last_end = range.end;
            let block = text[range].trim();
            if !block.is_empty() {
                blocks.push(block.to_string());
            }
        }
    }

    if blocks.is_empty() {
        // Text the parser saw no blocks in; keep it as one block.
        return vec![text.trim().to_string()];
    }

    blocks
}

fn is_block_tag(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Paragraph
            | Tag::Heading { .. }
            | Tag::BlockQuote(..)
            | Tag::CodeBlock(..)
            | Tag::HtmlBlock
            | Tag::List(..)
            | Tag::Table(..)
    )
}
