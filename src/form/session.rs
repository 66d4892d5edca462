//! Recording session: the audio-capture state machine of the drafting form.
//!
//! One session instance exists per form and owns the audio device
//! exclusively. The lifecycle is driven by discrete commands (`start`,
//! `push_chunk`, `stop`, `finish`) so every transition is enumerable and
//! testable without real hardware.

use crate::audio::recorder::AudioSource;
use crate::audio::wav::encode_wav;
use crate::error::Result;

/// Where the session is in its lifecycle. `Recording` and `Processing`
/// remember which field the capture was started for; the field index is
/// captured at `start` time and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording { field: usize },
    Processing { field: usize },
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RecorderState::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, RecorderState::Recording { .. })
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, RecorderState::Processing { .. })
    }
}

/// A finalized capture, ready for the transcription gateway.
///
/// Carries the field index captured at `start` time and the session token
/// that gates applying the gateway's eventual result.
#[derive(Debug, Clone)]
pub struct CapturedAudio {
    pub field: usize,
    pub token: u64,
    pub wav: Vec<u8>,
}

/// The form's single recording session.
pub struct RecordingSession {
    state: RecorderState,
    buffer: Vec<i16>,
    token: u64,
    source: Box<dyn AudioSource>,
    sample_rate: u32,
}

impl RecordingSession {
    /// Create the session around an audio source.
    pub fn new(source: Box<dyn AudioSource>, sample_rate: u32) -> Self {
        Self {
            state: RecorderState::Idle,
            buffer: Vec::new(),
            token: 0,
            source,
            sample_rate,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Samples accumulated by the current capture.
    pub fn buffered_samples(&self) -> usize {
        self.buffer.len()
    }

    /// Begin capturing for `field`.
    ///
    /// Acquires the audio device; on failure (typically `PermissionDenied`)
    /// the state remains `Idle`, no partial state is left behind, and the
    /// error propagates for the form to surface. A start while already
    /// `Recording` or `Processing` is ignored.
    pub fn start(&mut self, field: usize) -> Result<()> {
        if !self.state.is_idle() {
            log::debug!("ignoring start({}) while {:?}", field, self.state);
            return Ok(());
        }

        self.source.start()?;

        self.buffer.clear();
        self.token += 1;
        self.state = RecorderState::Recording { field };
        Ok(())
    }

    /// Append captured samples to the session buffer. Ignored unless
    /// `Recording`; the buffer belongs to this session instance only.
    pub fn push_chunk(&mut self, samples: &[i16]) {
        if self.state.is_recording() {
            self.buffer.extend_from_slice(samples);
        }
    }

    /// Drain whatever the audio source captured since the last poll into
    /// the session buffer.
    pub fn poll_source(&mut self) -> Result<()> {
        if !self.state.is_recording() {
            return Ok(());
        }

        let samples = self.source.read_samples()?;
        self.buffer.extend_from_slice(&samples);
        Ok(())
    }

    /// Finalize the capture: release the device, encode the buffer into a
    /// single WAV payload, and transition to `Processing`.
    ///
    /// A stop without a live recording is a no-op returning `None`. If
    /// releasing the device or encoding fails, the session returns to
    /// `Idle` with no payload and the error propagates.
    pub fn stop(&mut self) -> Result<Option<CapturedAudio>> {
        let RecorderState::Recording { field } = self.state else {
            return Ok(None);
        };

        // Collect any samples still sitting in the source before release.
        let tail = self.source.read_samples().unwrap_or_default();
        self.buffer.extend_from_slice(&tail);

        if let Err(e) = self.source.stop() {
            self.buffer.clear();
            self.state = RecorderState::Idle;
            return Err(e);
        }

        let samples = std::mem::take(&mut self.buffer);
        let wav = match encode_wav(&samples, self.sample_rate) {
            Ok(wav) => wav,
            Err(e) => {
                self.state = RecorderState::Idle;
                return Err(e);
            }
        };

        self.state = RecorderState::Processing { field };
        Ok(Some(CapturedAudio {
            field,
            token: self.token,
            wav,
        }))
    }

    /// Close out a gateway round-trip.
    ///
    /// Returns true when `token` identifies the session currently
    /// `Processing` — only then may its result be applied — and moves the
    /// session back to `Idle`. A stale token changes nothing: a late
    /// response never clobbers a newer session's work.
    pub fn finish(&mut self, token: u64) -> bool {
        if self.state.is_processing() && token == self.token {
            self.state = RecorderState::Idle;
            true
        } else {
            false
        }
    }
}
