//! writer for the pre-decoded .rexwav sidecar format
//!
//! Inverse of `librex_audio::rexwav`: a fixed 64-byte little-endian
//! header, the slice table, then the raw interleaved PCM.

use librex_audio::rexwav::{REXWAV_HEADER_SIZE, REXWAV_MAGIC, REXWAV_VERSION};
use librex_audio::RexFile;

/// serialize a parsed rex file into .rexwav bytes
pub fn to_bytes(file: &RexFile) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(REXWAV_HEADER_SIZE + file.slices.len() * 8 + file.pcm.len() * 2);

    out.extend_from_slice(&REXWAV_MAGIC);
    out.extend_from_slice(&REXWAV_VERSION.to_le_bytes());
    out.extend_from_slice(&file.sample_rate.to_le_bytes());
    out.extend_from_slice(&(file.channels as u32).to_le_bytes());
    out.extend_from_slice(&(file.slices.len() as u32).to_le_bytes());
    out.extend_from_slice(&(file.pcm_frames as u32).to_le_bytes());
    out.extend_from_slice(&((file.tempo_bpm * 1000.0).round() as u32).to_le_bytes());
    out.push(file.time_sig_num);
    out.push(file.time_sig_den);
    out.resize(REXWAV_HEADER_SIZE, 0);

    for slice in &file.slices {
        out.extend_from_slice(&slice.sample_offset.to_le_bytes());
        out.extend_from_slice(&slice.sample_length.to_le_bytes());
    }

    for &sample in &file.pcm {
        out.extend_from_slice(&sample.to_le_bytes());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use librex_audio::Slice;

    #[test]
    fn test_sidecar_roundtrip() {
        let mut file = RexFile::new();
        file.sample_rate = 44100;
        file.channels = 2;
        file.bytes_per_sample = 2;
        file.tempo_bpm = 120.0;
        file.time_sig_num = 4;
        file.time_sig_den = 4;
        file.slices = vec![
            Slice {
                sample_offset: 0,
                sample_length: 2,
            },
            Slice {
                sample_offset: 2,
                sample_length: 1,
            },
        ];
        file.pcm = vec![10, -10, 20, -20, 30, -30];
        file.pcm_frames = 3;
        file.total_sample_length = 3;

        let bytes = to_bytes(&file);
        let parsed = librex_audio::rexwav::parse(&bytes).unwrap();

        assert_eq!(parsed.sample_rate, file.sample_rate);
        assert_eq!(parsed.channels, file.channels);
        assert_eq!(parsed.tempo_bpm, file.tempo_bpm);
        assert_eq!(parsed.time_sig_num, 4);
        assert_eq!(parsed.slices, file.slices);
        assert_eq!(parsed.pcm, file.pcm);
        assert_eq!(parsed.pcm_frames, 3);
    }

    #[test]
    fn test_header_is_64_bytes_before_table() {
        let mut file = RexFile::new();
        file.pcm = vec![0; 4];
        file.pcm_frames = 4;

        let bytes = to_bytes(&file);
        assert_eq!(&bytes[0..4], b"RXWV");
        assert_eq!(bytes.len(), REXWAV_HEADER_SIZE + 4 * 2);
    }
}
