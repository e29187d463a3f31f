use log::{debug, warn};

use crate::core::types::{RexError, RexFile, RexResult, Slice, MAX_FRAMES, MAX_SLICES};
use crate::dwop;

/// binary parser for the rex2 container
///
/// Walks the IFF-style chunk tree (big-endian, "CAT " containers) and
/// decodes the DWOP audio payload into a `RexFile`.
pub struct Parser;

impl Parser {
    /// new parser
    pub fn new() -> Self {
        Parser
    }

    /// parse a rex2 file from an in-memory buffer
    ///
    /// The input is only borrowed; everything the result needs is copied
    /// out. Any fatal error aborts the parse with no partial result.
    pub fn parse(&self, data: &[u8]) -> RexResult<RexFile> {
        if data.len() < 12 {
            return Err(RexError::TooSmall(data.len()));
        }

        if data[0..4] != *b"CAT " {
            return Err(RexError::NotIff);
        }

        let mut file = RexFile::new();
        let mut sdat_done = false;
        self.walk(data, data.len(), 0, &mut file, &mut sdat_done)?;

        if !sdat_done || file.pcm.is_empty() {
            return Err(RexError::NoAudio);
        }

        if file.slices.is_empty() {
            // every SLCE entry was a transient marker; treat the whole
            // decoded buffer as one slice
            file.slices.push(Slice {
                sample_offset: 0,
                sample_length: file.pcm_frames as u32,
            });
        }

        clamp_slice_lengths(&mut file);

        Ok(file)
    }

    /// recursive chunk walker
    ///
    /// `boundary` limits how far this level may read: the whole file at
    /// the top, the container end inside a CAT. A chunk whose declared
    /// length overruns the boundary halts this level; chunks already
    /// parsed stay valid.
    fn walk(
        &self,
        data: &[u8],
        boundary: usize,
        mut offset: usize,
        file: &mut RexFile,
        sdat_done: &mut bool,
    ) -> RexResult<()> {
        while offset + 8 <= boundary {
            let tag = [
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ];
            let chunk_len = read_u32_be(data, offset + 4) as usize;

            // IFF pads chunks to even length
            let padded_len = chunk_len + (chunk_len & 1);

            if offset + 8 + padded_len > boundary {
                warn!(
                    "chunk {} at offset {} overruns its container (len {}, {} bytes left)",
                    String::from_utf8_lossy(&tag),
                    offset,
                    chunk_len,
                    boundary - offset - 8
                );
                break;
            }

            let payload = &data[offset + 8..offset + 8 + chunk_len];

            match &tag {
                b"CAT " => {
                    // containers carry a 4-byte type descriptor, then
                    // nested chunks bounded by this CAT's end
                    if chunk_len >= 4 {
                        let cat_boundary = offset + 8 + chunk_len;
                        self.walk(data, cat_boundary, offset + 12, file, sdat_done)?;
                    }
                }
                b"GLOB" => read_glob(file, payload),
                b"HEAD" => read_head(file, payload),
                b"SINF" => read_sinf(file, payload),
                b"SLCE" => read_slce(file, payload),
                b"SDAT" => {
                    if !*sdat_done {
                        decode_sdat(file, payload)?;
                        *sdat_done = true;
                    }
                }
                _ => {
                    debug!("skipping unknown chunk {}", String::from_utf8_lossy(&tag));
                }
            }

            offset += 8 + padded_len;
        }

        Ok(())
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// per-chunk readers

/// GLOB chunk: global metadata
///
/// Layout (offsets relative to payload start):
///   [0:4]   unknown (possibly PPQ-related)
///   [4:6]   bars (u16)
///   [6]     beats (u8)
///   [7]     time signature numerator (u8)
///   [8]     time signature denominator (u8)
///   [9]     sensitivity (u8)
///   [10:12] gate sensitivity (u16)
///   [12:14] gain (u16)
///   [14:16] pitch (u16)
///   [16:20] tempo in milli-BPM (u32)
fn read_glob(file: &mut RexFile, payload: &[u8]) {
    if payload.len() < 20 {
        return;
    }

    file.bars = read_u16_be(payload, 4);
    file.beats = payload[6];
    file.time_sig_num = payload[7];
    file.time_sig_den = payload[8];
    file.tempo_bpm = read_u32_be(payload, 16) as f32 / 1000.0;
}

/// HEAD chunk: audio format header; byte 5 is bytes per sample
fn read_head(file: &mut RexFile, payload: &[u8]) {
    if payload.len() < 6 {
        return;
    }
    file.bytes_per_sample = payload[5];
}

/// SINF chunk: sound info
///
/// Layout:
///   [0]     channels (1=mono, 2=stereo)
///   [1]     bit depth indicator (3=16-bit, 5=24-bit, unread)
///   [2:4]   unknown
///   [4:6]   sample rate (u16, e.g. 0xAC44 = 44100)
///   [6:10]  total length in per-channel frames (u32)
fn read_sinf(file: &mut RexFile, payload: &[u8]) {
    if payload.len() < 10 {
        return;
    }

    let ch = payload[0];
    if ch == 1 || ch == 2 {
        file.channels = ch;
    }

    let sr = read_u16_be(payload, 4);
    if sr > 0 {
        file.sample_rate = sr as u32;
    }

    file.total_sample_length = read_u32_be(payload, 6);
}

/// SLCE chunk: one slice descriptor
///
/// Layout: [0:4] frame offset, [4:8] frame length, then an amplitude
/// u16 and a pad byte in files that carry the full 11-byte form.
/// Length <= 1 marks a transient position inside a real slice, not a
/// playable slice; those are dropped.
fn read_slce(file: &mut RexFile, payload: &[u8]) {
    if payload.len() < 8 {
        return;
    }
    if file.slices.len() >= MAX_SLICES {
        return;
    }

    let sample_offset = read_u32_be(payload, 0);
    let sample_length = read_u32_be(payload, 4);

    if sample_length <= 1 {
        return;
    }

    file.slices.push(Slice {
        sample_offset,
        sample_length,
    });
}

/// SDAT chunk: decode the DWOP bitstream into the PCM buffer
///
/// Channel count and declared length come from whatever SINF state has
/// accumulated by the time the chunk is reached.
fn decode_sdat(file: &mut RexFile, payload: &[u8]) -> RexResult<()> {
    // frames to decode: the SINF-declared count, or a conservative
    // bound from the payload size when SINF is missing
    let declared = file.total_sample_length as usize;
    let max_frames = if declared > 0 {
        declared
    } else {
        payload.len() * 2 + 1024
    };

    if max_frames > MAX_FRAMES {
        return Err(RexError::Oversize(max_frames));
    }

    let is_stereo = file.channels == 2;
    let alloc_samples = max_frames * if is_stereo { 2 } else { 1 };

    let mut pcm: Vec<i16> = Vec::new();
    pcm.try_reserve_exact(alloc_samples)
        .map_err(|_| RexError::OutOfMemory(alloc_samples))?;
    pcm.resize(alloc_samples, 0);

    let produced = if is_stereo {
        dwop::decode_stereo(payload, &mut pcm)
    } else {
        dwop::decode_mono(payload, &mut pcm)
    };

    if produced == 0 {
        return Err(RexError::NoAudio);
    }
    if declared > 0 && produced < declared {
        return Err(RexError::Corrupt(
            "decoded output fell short of the declared frame count",
        ));
    }

    pcm.truncate(produced * if is_stereo { 2 } else { 1 });
    file.pcm = pcm;
    file.pcm_frames = produced;

    Ok(())
}

/// clamp slice lengths to the decoded buffer; slices keep file order
fn clamp_slice_lengths(file: &mut RexFile) {
    let frames = file.pcm_frames as u64;
    for slice in &mut file.slices {
        if slice.sample_offset as u64 + slice.sample_length as u64 > frames {
            if slice.sample_offset as u64 >= frames {
                slice.sample_length = 0;
            } else {
                slice.sample_length = (frames - slice.sample_offset as u64) as u32;
            }
        }
    }
}

// big-endian field helpers

fn read_u16_be(data: &[u8], pos: usize) -> u16 {
    u16::from_be_bytes([data[pos], data[pos + 1]])
}

fn read_u32_be(data: &[u8], pos: usize) -> u32 {
    u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}
