//! Default configuration constants for vdraft.
//!
//! Shared constants used across configuration types to keep the capture,
//! gateway, and catalog layers in agreement.

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and is what the
/// transcription service expects in uploaded WAV payloads.
pub const SAMPLE_RATE: u32 = 16000;

/// Default base URL of the drafting backend.
///
/// All three consumed services (document catalog, prompt sync,
/// transcription) live under one base URL.
pub const SERVER_URL: &str = "http://localhost:3000";

/// Path of the document catalog listing endpoint.
pub const DOCUMENTS_PATH: &str = "/api/documents";

/// Path of the audio transcription endpoint.
pub const PROCESS_AUDIO_PATH: &str = "/api/process-audio";

/// Path of the prompt sync endpoint.
pub const UPDATE_PROMPT_PATH: &str = "/updateprompt/update-env";

/// HTTP timeout for remote calls, in seconds.
///
/// Transcription of a long dictation can take a while server-side; 30s
/// keeps slow responses distinguishable from a dead connection.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Name seeded into a field created by "add field after".
pub const PLACEHOLDER_FIELD_NAME: &str = "New Field";

/// Filename the gateway attaches to the uploaded WAV part.
pub const AUDIO_UPLOAD_FILENAME: &str = "audio.wav";
