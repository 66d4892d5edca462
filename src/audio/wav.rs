//! WAV payload assembly for captured audio.

use crate::error::{Result, VdraftError};
use std::io::Cursor;

/// Encode 16-bit PCM samples into a mono WAV payload.
///
/// The transcription service accepts a single `audio/wav` part, so the
/// session's accumulated samples are finalized into one in-memory file.
///
/// # Arguments
/// * `samples` - Audio samples as 16-bit PCM
/// * `sample_rate` - Sample rate of the captured audio in Hz
///
/// # Returns
/// The complete WAV file bytes, header included
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| VdraftError::AudioCapture {
                message: format!("Failed to create WAV writer: {}", e),
            })?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| VdraftError::AudioCapture {
                    message: format!("Failed to write WAV sample: {}", e),
                })?;
        }

        writer.finalize().map_err(|e| VdraftError::AudioCapture {
            message: format!("Failed to finalize WAV payload: {}", e),
        })?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_back(data: &[u8]) -> (hound::WavSpec, Vec<i16>) {
        let reader = hound::WavReader::new(Cursor::new(data.to_vec())).unwrap();
        let spec = reader.spec();
        let samples = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        (spec, samples)
    }

    #[test]
    fn test_encode_preserves_samples() {
        let samples = vec![0i16, 100, -100, i16::MAX, i16::MIN];
        let data = encode_wav(&samples, 16000).unwrap();

        let (spec, decoded) = read_back(&data);
        assert_eq!(decoded, samples);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);
    }

    #[test]
    fn test_encode_empty_buffer_is_valid_wav() {
        let data = encode_wav(&[], 16000).unwrap();

        let (spec, decoded) = read_back(&data);
        assert!(decoded.is_empty());
        assert_eq!(spec.sample_rate, 16000);
    }

    #[test]
    fn test_encode_carries_sample_rate() {
        let data = encode_wav(&[1i16, 2, 3], 48000).unwrap();

        let (spec, _) = read_back(&data);
        assert_eq!(spec.sample_rate, 48000);
    }

    #[test]
    fn test_encode_starts_with_riff_header() {
        let data = encode_wav(&[0i16; 16], 16000).unwrap();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");
    }

    #[test]
    fn test_encode_one_second_size() {
        // 1 second at 16kHz mono 16-bit = 32000 data bytes + 44 byte header
        let data = encode_wav(&vec![0i16; 16000], 16000).unwrap();
        assert_eq!(data.len(), 32044);
    }
}
