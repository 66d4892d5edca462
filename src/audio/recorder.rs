use crate::defaults;
use crate::error::{Result, VdraftError};

/// Trait for audio source devices.
///
/// This trait allows swapping implementations (real audio device vs mock),
/// so the recording state machine can be driven in tests without hardware.
pub trait AudioSource: Send {
    /// Acquire the device and start capturing audio.
    ///
    /// # Returns
    /// Ok(()) if the source started, `PermissionDenied` if the device
    /// refused access, or another capture error.
    fn start(&mut self) -> Result<()>;

    /// Release the device and stop capturing audio.
    fn stop(&mut self) -> Result<()>;

    /// Drain captured audio samples from the source.
    ///
    /// # Returns
    /// Whatever 16-bit PCM samples accumulated since the last read; an
    /// empty vector means nothing new arrived.
    fn read_samples(&mut self) -> Result<Vec<i16>>;
}

/// Configuration for audio source initialization
#[derive(Debug, Clone)]
pub struct AudioSourceConfig {
    pub sample_rate: u32,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

/// Mock audio source for testing
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    samples: Vec<i16>,
    deny_permission: bool,
    should_fail_stop: bool,
    error_message: String,
}

impl MockAudioSource {
    /// Create a new mock audio source with default settings
    pub fn new() -> Self {
        Self {
            is_started: false,
            samples: vec![0i16; 160],
            deny_permission: false,
            should_fail_stop: false,
            error_message: "mock audio error".to_string(),
        }
    }

    /// Configure the mock to return specific samples
    pub fn with_samples(mut self, samples: Vec<i16>) -> Self {
        self.samples = samples;
        self
    }

    /// Configure the mock to refuse device access on start
    pub fn with_permission_denied(mut self) -> Self {
        self.deny_permission = true;
        self
    }

    /// Configure the mock to fail on stop
    pub fn with_stop_failure(mut self) -> Self {
        self.should_fail_stop = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Check if the audio source is started
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.deny_permission {
            Err(VdraftError::PermissionDenied {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        if self.should_fail_stop {
            Err(VdraftError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = false;
            Ok(())
        }
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        if self.is_started {
            Ok(self.samples.clone())
        } else {
            Ok(Vec::new())
        }
    }
}
