//! Transcription gateway: ships a captured WAV payload to the remote
//! transcription service and returns the recognized text.

use crate::defaults;
use crate::error::{Result, VdraftError};
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;

/// Format a field name the way the transcription service expects it:
/// uppercased, whitespace runs joined with underscores, all remaining
/// non-alphanumeric characters stripped.
pub fn format_field_name(name: &str) -> String {
    let upper = name.to_uppercase();
    let joined: String = upper
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    joined
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Trait for the audio transcription boundary.
///
/// This trait allows swapping implementations (real HTTP service vs mock),
/// so the form's recording flow can be exercised without a network.
#[async_trait]
pub trait TranscriptionGateway: Send + Sync {
    /// Transcribe a WAV payload captured for the named field.
    ///
    /// # Arguments
    /// * `audio_wav` - Complete WAV file bytes
    /// * `field_name` - Raw field name; formatted before sending
    ///
    /// # Returns
    /// The transcribed text, or an error classified by failure mode
    /// (`Network`, `Service`, `DataShape`, `RequestSetup`).
    async fn transcribe(&self, audio_wav: Vec<u8>, field_name: &str) -> Result<String>;
}

/// Success/error payload of the process-audio endpoint.
#[derive(Debug, Deserialize)]
struct ProcessAudioResponse {
    #[serde(rename = "processedText")]
    processed_text: Option<String>,
    error: Option<String>,
}

/// HTTP transcription gateway (`POST {base}/api/process-audio`).
pub struct HttpTranscriptionGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranscriptionGateway {
    /// Create a gateway for the given backend base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VdraftError::RequestSetup {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                defaults::PROCESS_AUDIO_PATH
            ),
        })
    }
}

#[async_trait]
impl TranscriptionGateway for HttpTranscriptionGateway {
    async fn transcribe(&self, audio_wav: Vec<u8>, field_name: &str) -> Result<String> {
        let part = multipart::Part::bytes(audio_wav)
            .file_name(defaults::AUDIO_UPLOAD_FILENAME)
            .mime_str("audio/wav")
            .map_err(|e| VdraftError::RequestSetup {
                message: format!("Failed to build audio part: {}", e),
            })?;

        let form = multipart::Form::new()
            .part("audio", part)
            .text("fieldName", format_field_name(field_name));

        log::debug!(
            "transcribing audio for field {:?} via {}",
            field_name,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body: ProcessAudioResponse =
            response.json().await.map_err(|e| VdraftError::DataShape {
                message: format!("Failed to parse transcription response: {}", e),
            })?;

        // The service reports structured failures in the body, with or
        // without an error status code.
        if let Some(error) = body.error {
            return Err(VdraftError::Service { message: error });
        }
        if !status.is_success() {
            return Err(VdraftError::Service {
                message: format!("transcription request failed with status {}", status),
            });
        }

        body.processed_text.ok_or_else(|| VdraftError::DataShape {
            message: "transcription response is missing processedText".to_string(),
        })
    }
}

/// Classify a reqwest send failure: no response received vs a request the
/// client could never construct or dispatch.
fn map_send_error(e: reqwest::Error) -> VdraftError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        VdraftError::Network {
            message: e.to_string(),
        }
    } else if e.is_builder() {
        VdraftError::RequestSetup {
            message: e.to_string(),
        }
    } else {
        VdraftError::Network {
            message: e.to_string(),
        }
    }
}

/// Mock gateway for testing
pub struct MockTranscriptionGateway {
    response: String,
    failure: Option<fn() -> VdraftError>,
    requests: Mutex<Vec<String>>,
}

impl MockTranscriptionGateway {
    /// Create a new mock gateway with default settings
    pub fn new() -> Self {
        Self {
            response: "mock transcription".to_string(),
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Configure the mock to return a specific transcription
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail as if no response was received
    pub fn with_network_failure(mut self) -> Self {
        self.failure = Some(|| VdraftError::Network {
            message: "mock network failure".to_string(),
        });
        self
    }

    /// Configure the mock to fail with a structured service error
    pub fn with_service_failure(mut self) -> Self {
        self.failure = Some(|| VdraftError::Service {
            message: "mock service failure".to_string(),
        });
        self
    }

    /// Field names (already formatted) this mock has been asked to transcribe
    pub fn requested_fields(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for MockTranscriptionGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptionGateway for MockTranscriptionGateway {
    async fn transcribe(&self, _audio_wav: Vec<u8>, field_name: &str) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(format_field_name(field_name));
        }
        match self.failure {
            Some(make_error) => Err(make_error()),
            None => Ok(self.response.clone()),
        }
    }
}
