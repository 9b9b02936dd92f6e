//! Minimal WAV encoding for mono 16-bit PCM.
//!
//! The transcription API accepts standard RIFF/WAVE containers, so captured
//! samples are wrapped in a 44-byte canonical header. Only mono 16-bit PCM
//! is produced; that is the one format the recorder emits.

use lexivox_core::{LexivoxError, Result};

/// Duration of a mono sample buffer in seconds.
pub fn duration_secs(samples: &[i16], sample_rate: u32) -> f32 {
    if sample_rate == 0 {
        return 0.0;
    }
    samples.len() as f32 / sample_rate as f32
}

/// Truncate a sample buffer to at most `max_secs` of audio.
pub fn bound_samples(samples: &[i16], sample_rate: u32, max_secs: u32) -> &[i16] {
    let max_len = (sample_rate as usize).saturating_mul(max_secs as usize);
    &samples[..samples.len().min(max_len)]
}

/// Encode mono 16-bit PCM samples as WAV bytes.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    if samples.is_empty() {
        return Err(LexivoxError::Speech("no audio samples to encode".to_string()));
    }
    if sample_rate == 0 {
        return Err(LexivoxError::Speech("sample rate must be non-zero".to_string()));
    }

    let data_len = (samples.len() * 2) as u32;
    let byte_rate = sample_rate * 2;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk: PCM, mono, 16-bit.
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    Ok(out)
}
