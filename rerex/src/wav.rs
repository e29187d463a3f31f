//! minimal RIFF/WAVE output
//!
//! REX audio is 16-bit integer PCM end to end, so only the classic
//! 44-byte header (format tag 1) is ever emitted ahead of the samples.

use anyhow::{Context, Result};
use std::path::Path;

const RIFF_HEADER_LEN: usize = 44;

/// write interleaved 16-bit PCM to a WAV file
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32, channels: u16) -> Result<()> {
    std::fs::write(path, wav_bytes(samples, sample_rate, channels))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// serialize interleaved 16-bit PCM into a RIFF/WAVE buffer
pub fn wav_bytes(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let pcm_len = samples.len() * 2;
    let frame_len = u32::from(channels) * 2;

    let mut out = Vec::with_capacity(RIFF_HEADER_LEN + pcm_len);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((RIFF_HEADER_LEN - 8 + pcm_len) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // integer PCM
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * frame_len).to_le_bytes());
    out.extend_from_slice(&(frame_len as u16).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&(pcm_len as u32).to_le_bytes());
    for &sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }

    out
}
