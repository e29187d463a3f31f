//! reader for the pre-decoded .rexwav sidecar format
//!
//! The sidecar is what the desktop converter writes after doing the
//! expensive DWOP decode once: a fixed 64-byte little-endian header, a
//! slice table, then raw interleaved 16-bit PCM.

use crate::core::types::{RexError, RexFile, RexResult, Slice, MAX_FRAMES, MAX_SLICES};

pub const REXWAV_MAGIC: [u8; 4] = *b"RXWV";
pub const REXWAV_VERSION: u32 = 1;
pub const REXWAV_HEADER_SIZE: usize = 64;

/// parse a .rexwav buffer into a `RexFile`
///
/// Header layout (little-endian):
///   [0:4]   magic "RXWV"
///   [4:8]   version (must be 1)
///   [8:12]  sample rate
///   [12:16] channels
///   [16:20] slice count
///   [20:24] total frames
///   [24:28] tempo in milli-BPM
///   [28]    time signature numerator
///   [29]    time signature denominator
///   [30:64] reserved
pub fn parse(data: &[u8]) -> RexResult<RexFile> {
    if data.len() < REXWAV_HEADER_SIZE {
        return Err(RexError::TooSmall(data.len()));
    }

    if data[0..4] != REXWAV_MAGIC {
        return Err(RexError::NotRexwav);
    }

    let version = read_u32_le(data, 4);
    if version != REXWAV_VERSION {
        return Err(RexError::Unsupported(version));
    }

    let sample_rate = read_u32_le(data, 8);
    let channels = read_u32_le(data, 12);
    let slice_count = read_u32_le(data, 16) as usize;
    let total_frames = read_u32_le(data, 20) as usize;
    let tempo_mbpm = read_u32_le(data, 24);

    if channels != 1 && channels != 2 {
        return Err(RexError::Corrupt("channel count must be 1 or 2"));
    }
    if slice_count > MAX_SLICES {
        return Err(RexError::Corrupt("too many slices"));
    }
    if total_frames > MAX_FRAMES {
        return Err(RexError::Oversize(total_frames));
    }

    let slice_table_size = slice_count * 8;
    let pcm_size = total_frames * channels as usize * 2;
    let needed = REXWAV_HEADER_SIZE + slice_table_size + pcm_size;
    if data.len() < needed {
        return Err(RexError::TruncatedChunk {
            needed,
            got: data.len(),
        });
    }

    let mut file = RexFile::new();
    file.sample_rate = sample_rate;
    file.channels = channels as u8;
    file.bytes_per_sample = 2;
    file.tempo_bpm = tempo_mbpm as f32 / 1000.0;
    file.time_sig_num = data[28];
    file.time_sig_den = data[29];
    file.total_sample_length = total_frames as u32;

    let table = &data[REXWAV_HEADER_SIZE..REXWAV_HEADER_SIZE + slice_table_size];
    file.slices = table
        .chunks_exact(8)
        .map(|entry| Slice {
            sample_offset: read_u32_le(entry, 0),
            sample_length: read_u32_le(entry, 4),
        })
        .collect();

    // copy the PCM out; the input buffer is only borrowed
    let pcm_bytes = &data[REXWAV_HEADER_SIZE + slice_table_size..needed];
    file.pcm = pcm_bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    file.pcm_frames = total_frames;

    Ok(file)
}

fn read_u32_le(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}
