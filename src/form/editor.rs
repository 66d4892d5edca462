//! Rich-text editor session: an isolated draft buffer over one field.
//!
//! The buffer is a working copy — the field store is untouched until an
//! explicit save, and cancel discards everything unconditionally.

use crate::error::{Result, VdraftError};
use crate::richtext::{RichTextBuffer, RichTextEngine};

/// A committed edit, ready to be applied through the field store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommit {
    pub field: usize,
    pub text: String,
}

struct OpenEditor {
    field: usize,
    buffer: Box<dyn RichTextBuffer>,
}

/// The form's single editor session.
pub struct EditorSession {
    engine: Box<dyn RichTextEngine>,
    open: Option<OpenEditor>,
}

impl EditorSession {
    pub fn new(engine: Box<dyn RichTextEngine>) -> Self {
        Self { engine, open: None }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Index of the field being edited, if any.
    pub fn editing_index(&self) -> Option<usize> {
        self.open.as_ref().map(|o| o.field)
    }

    /// Open the editor on `field`, seeding the draft buffer from the
    /// field's current content.
    ///
    /// # Errors
    /// `EditorOpen` if a session is already open — it must be saved or
    /// cancelled explicitly first, so no edit is ever silently dropped.
    pub fn open(&mut self, field: usize, current_content: &str) -> Result<()> {
        if let Some(open) = &self.open {
            return Err(VdraftError::EditorOpen { index: open.field });
        }

        self.open = Some(OpenEditor {
            field,
            buffer: self.engine.from_text(current_content),
        });
        Ok(())
    }

    /// Mutable access to the draft buffer while open.
    pub fn buffer_mut(&mut self) -> Option<&mut (dyn RichTextBuffer + 'static)> {
        self.open.as_mut().map(|o| &mut *o.buffer)
    }

    /// Read-only serialization of the draft buffer while open.
    pub fn draft_text(&self) -> Option<String> {
        self.open.as_ref().map(|o| o.buffer.to_text())
    }

    /// Serialize the buffer and close, yielding the commit for the form to
    /// apply through the field store. Returns None if no session is open.
    pub fn save(&mut self) -> Option<EditorCommit> {
        self.open.take().map(|o| EditorCommit {
            field: o.field,
            text: o.buffer.to_text(),
        })
    }

    /// Discard the draft buffer unconditionally and close. The underlying
    /// field is guaranteed untouched.
    pub fn cancel(&mut self) {
        self.open = None;
    }
}
