//! common types for the rex reader

use serde::{Deserialize, Serialize};
use std::fmt;

// constants

/// upper bound on the slice table; SLCE chunks past this are ignored
pub const MAX_SLICES: usize = 256;

/// hard ceiling on decoded frames (~3.8 min @ 44.1kHz)
pub const MAX_FRAMES: usize = 10_000_000;

/// sample rate assumed until SINF says otherwise
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

// types

/// slice descriptor
///
/// A contiguous segment of the decoded audio, addressed in per-channel
/// frames from the start of the SDAT payload. Lengths are clamped to the
/// decoded buffer after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// frame offset into the decoded audio
    pub sample_offset: u32,
    /// length in frames
    pub sample_length: u32,
}

/// parsed rex file
///
/// Owns the decoded PCM buffer; dropping the value releases it. Stereo
/// audio is interleaved L,R,L,R.
#[derive(Debug, Clone, PartialEq)]
pub struct RexFile {
    /// tempo from GLOB, in BPM
    pub tempo_bpm: f32,
    pub bars: u16,
    pub beats: u8,
    pub time_sig_num: u8,
    pub time_sig_den: u8,

    /// sample rate in Hz (44100 unless SINF overrides)
    pub sample_rate: u32,
    /// 1 = mono, 2 = stereo
    pub channels: u8,
    /// from HEAD, typically 2
    pub bytes_per_sample: u8,

    /// playable slices, in file order
    pub slices: Vec<Slice>,

    /// decoded 16-bit PCM, interleaved when stereo
    pub pcm: Vec<i16>,
    /// per-channel frames actually decoded
    pub pcm_frames: usize,

    /// total length declared by SINF, in frames (0 if absent)
    pub total_sample_length: u32,
}

impl Default for RexFile {
    fn default() -> Self {
        RexFile {
            tempo_bpm: 0.0,
            bars: 0,
            beats: 0,
            time_sig_num: 0,
            time_sig_den: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
            bytes_per_sample: 0,
            slices: Vec::new(),
            pcm: Vec::new(),
            pcm_frames: 0,
            total_sample_length: 0,
        }
    }
}

impl RexFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// loop duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.pcm_frames as f64 / self.sample_rate as f64
    }

    /// interleaved PCM for one slice, or None if out of range
    pub fn slice_audio(&self, index: usize) -> Option<&[i16]> {
        let slice = self.slices.get(index)?;
        let ch = self.channels.max(1) as usize;
        let start = slice.sample_offset as usize * ch;
        let end = start + slice.sample_length as usize * ch;
        self.pcm.get(start..end)
    }
}

// errors

/// result type for rex parsing and decoding
pub type RexResult<T> = Result<T, RexError>;

/// fatal parse/decode errors
///
/// Every variant aborts the current parse; partial results are never
/// returned. Unknown chunks are skipped, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RexError {
    /// input shorter than the minimum viable header
    TooSmall(usize),
    /// top-level tag is not "CAT "
    NotIff,
    /// sidecar magic is not "RXWV"
    NotRexwav,
    /// sidecar version this reader does not understand
    Unsupported(u32),
    /// declared sizes run past the end of the buffer
    TruncatedChunk { needed: usize, got: usize },
    /// no SDAT chunk, or it produced no samples
    NoAudio,
    /// the bitstream violated a decoder invariant
    Corrupt(&'static str),
    /// declared or derived frame count exceeds the hard ceiling
    Oversize(usize),
    /// PCM allocation failed
    OutOfMemory(usize),
}

impl fmt::Display for RexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RexError::TooSmall(len) => write!(f, "file too small ({} bytes)", len),
            RexError::NotIff => write!(f, "not an IFF file (no CAT header)"),
            RexError::NotRexwav => write!(f, "not a REXWAV file (bad magic)"),
            RexError::Unsupported(v) => write!(f, "unsupported REXWAV version {}", v),
            RexError::TruncatedChunk { needed, got } => {
                write!(f, "file truncated (need {}, got {})", needed, got)
            }
            RexError::NoAudio => write!(f, "no audio data found in file"),
            RexError::Corrupt(msg) => write!(f, "corrupt stream: {}", msg),
            RexError::Oversize(frames) => write!(
                f,
                "frame count {} exceeds the {} frame ceiling",
                frames, MAX_FRAMES
            ),
            RexError::OutOfMemory(samples) => {
                write!(f, "failed to allocate {} samples", samples)
            }
        }
    }
}

impl std::error::Error for RexError {}
