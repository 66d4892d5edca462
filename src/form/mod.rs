//! The drafting form: per-field content lifecycle and editing state machine.
//!
//! Owns the field store, the single recording session, the single editor
//! session, the view-mode toggle, and the user-visible error banner. Every
//! user action flows through here; remote and device failures are caught
//! at this boundary and surfaced as the banner, never propagated uncaught.

pub mod editor;
pub mod preview;
pub mod session;
pub mod store;

use crate::audio::recorder::AudioSource;
use crate::catalog::DocumentSchema;
use crate::error::{Result, VdraftError};
use crate::gateway::TranscriptionGateway;
use crate::richtext::{RichTextBuffer, RichTextEngine};

use editor::EditorSession;
use preview::{render_preview, PreviewDocument};
use session::{RecorderState, RecordingSession};
use store::{Field, FieldStore};

/// Whole-form display mode, orthogonal to the session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Edit,
    Preview,
}

/// The drafting form core.
pub struct DraftForm {
    title: String,
    store: FieldStore,
    recorder: RecordingSession,
    editor: EditorSession,
    view: ViewMode,
    preview: Option<PreviewDocument>,
    error: Option<String>,
}

impl DraftForm {
    /// Mount the form from a document schema.
    ///
    /// # Errors
    /// `DataShape` when the schema is missing its title or seeds no fields
    /// — the "no form data available" state, reported rather than crashed
    /// on.
    pub fn new(
        schema: &DocumentSchema,
        source: Box<dyn AudioSource>,
        engine: Box<dyn RichTextEngine>,
        sample_rate: u32,
    ) -> Result<Self> {
        let title = schema
            .field_name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| VdraftError::DataShape {
                message: "no form data available: document title missing".to_string(),
            })?;

        let seeds = schema
            .fields
            .as_deref()
            .ok_or_else(|| VdraftError::DataShape {
                message: "no form data available: field schema missing".to_string(),
            })?;

        Ok(Self {
            title,
            store: FieldStore::from_seeds(seeds)?,
            recorder: RecordingSession::new(source, sample_rate),
            editor: EditorSession::new(engine),
            view: ViewMode::Edit,
            preview: None,
            error: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[Field] {
        self.store.fields()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.recorder.state()
    }

    /// The current error banner, if any action left one behind.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // --- direct text editing -------------------------------------------

    /// Replace a field's content from direct typing. Verbatim, last write
    /// wins; false for an out-of-range index.
    pub fn set_field_content(&mut self, index: usize, content: impl Into<String>) -> bool {
        self.store.set_content(index, content)
    }

    /// Insert a placeholder field right after `index`. Returns the new
    /// field's index.
    pub fn insert_field_after(&mut self, index: usize) -> Option<usize> {
        self.store.insert_after(index, Field::placeholder())
    }

    // --- recording ------------------------------------------------------

    /// Start dictating into the field at `index`.
    ///
    /// Returns true when recording actually began. A start while another
    /// capture is live is ignored; a device failure leaves everything as it
    /// was and sets the error banner.
    pub fn start_recording(&mut self, index: usize) -> bool {
        if self.store.get(index).is_none() {
            return false;
        }
        if !self.recorder.state().is_idle() {
            return false;
        }

        match self.recorder.start(index) {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(format!(
                    "Failed to start recording. Check your microphone permissions. ({})",
                    e
                ));
                false
            }
        }
    }

    /// Drain pending samples from the audio source into the live capture.
    pub fn poll_audio(&mut self) {
        if let Err(e) = self.recorder.poll_source() {
            self.error = Some(format!("Audio capture failed: {}", e));
        }
    }

    /// Stop the live capture and run the transcription round-trip.
    ///
    /// Returns true when a transcription was committed into the field
    /// captured at start time. Without a live capture this is a no-op. Any
    /// failure returns the session to idle, leaves the field untouched, and
    /// sets the error banner.
    pub async fn stop_recording(&mut self, gateway: &dyn TranscriptionGateway) -> bool {
        let captured = match self.recorder.stop() {
            Ok(Some(captured)) => captured,
            Ok(None) => return false,
            Err(e) => {
                self.error = Some(format!("Failed to stop recording: {}", e));
                return false;
            }
        };

        // The field name travels with the request; the index was captured
        // at start time and inserts may have shifted neighbors since, but
        // this slot is still the one the user dictated into.
        let field_name = self
            .store
            .get(captured.field)
            .map(|f| f.name.clone())
            .unwrap_or_default();

        self.error = None;

        match gateway.transcribe(captured.wav, &field_name).await {
            Ok(text) => {
                if self.recorder.finish(captured.token) {
                    self.store.set_content(captured.field, text)
                } else {
                    log::debug!("discarding stale transcription for field {}", captured.field);
                    false
                }
            }
            Err(e) => {
                self.recorder.finish(captured.token);
                self.error = Some(gateway_error_message(&e));
                false
            }
        }
    }

    // --- rich-text editor ----------------------------------------------

    /// Open the editor session on the field at `index`.
    pub fn open_editor(&mut self, index: usize) -> Result<()> {
        let content = self
            .store
            .get(index)
            .map(|f| f.content.clone())
            .ok_or_else(|| VdraftError::Other(format!("no field at index {}", index)))?;

        self.editor.open(index, &content)
    }

    /// The open editor's draft buffer, for applying edits.
    pub fn editor_buffer_mut(&mut self) -> Option<&mut (dyn RichTextBuffer + 'static)> {
        self.editor.buffer_mut()
    }

    /// Index of the field under edit, if the editor is open.
    pub fn editing_index(&self) -> Option<usize> {
        self.editor.editing_index()
    }

    /// Serialized draft text, if the editor is open.
    pub fn editor_draft(&self) -> Option<String> {
        self.editor.draft_text()
    }

    /// Commit the editor's draft into its field and close. Returns true if
    /// a commit happened.
    pub fn save_editor(&mut self) -> bool {
        match self.editor.save() {
            Some(commit) => self.store.set_content(commit.field, commit.text),
            None => false,
        }
    }

    /// Discard the editor's draft and close; the field stays untouched.
    pub fn cancel_editor(&mut self) {
        self.editor.cancel();
    }

    // --- preview --------------------------------------------------------

    /// Toggle between Edit and Preview. Entering Preview takes a fresh
    /// snapshot of the committed state; returning to Edit discards it, so a
    /// re-entry always reflects edits made in between.
    pub fn toggle_preview(&mut self) -> ViewMode {
        self.view = match self.view {
            ViewMode::Edit => {
                self.preview = Some(render_preview(&self.title, self.store.fields()));
                ViewMode::Preview
            }
            ViewMode::Preview => {
                self.preview = None;
                ViewMode::Edit
            }
        };
        self.view
    }

    /// The preview snapshot while in Preview mode.
    pub fn preview(&self) -> Option<&PreviewDocument> {
        self.preview.as_ref()
    }
}

/// Map a gateway failure to the message shown in the error banner,
/// distinguishing no-response from server-reported from setup failures.
fn gateway_error_message(error: &VdraftError) -> String {
    match error {
        VdraftError::Service { message } => format!("Error processing audio: {}", message),
        VdraftError::Network { .. } => {
            "No response received from server. Please try again.".to_string()
        }
        other => format!("Failed to process audio: {}", other),
    }
}
