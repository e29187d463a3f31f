//! Tests for the pre-decoded .rexwav sidecar reader

use librex_audio::rexwav;
use librex_audio::{RexError, Slice};

// ============================================================================
// File builder
// ============================================================================

fn build_rexwav(
    version: u32,
    sample_rate: u32,
    channels: u32,
    slices: &[(u32, u32)],
    pcm: &[i16],
    total_frames: u32,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"RXWV");
    out.extend_from_slice(&version.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&(slices.len() as u32).to_le_bytes());
    out.extend_from_slice(&total_frames.to_le_bytes());
    out.extend_from_slice(&96_000u32.to_le_bytes()); // 96.0 BPM
    out.push(4);
    out.push(4);
    out.resize(64, 0);

    for &(offset, length) in slices {
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&length.to_le_bytes());
    }
    for &sample in pcm {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_parse_mono_sidecar() {
    let data = build_rexwav(1, 44100, 1, &[(0, 2), (2, 2)], &[5, -5, 7, -7], 4);
    let file = rexwav::parse(&data).unwrap();

    assert_eq!(file.sample_rate, 44100);
    assert_eq!(file.channels, 1);
    assert_eq!(file.bytes_per_sample, 2);
    assert_eq!(file.tempo_bpm, 96.0);
    assert_eq!(file.time_sig_num, 4);
    assert_eq!(file.time_sig_den, 4);
    assert_eq!(file.pcm, vec![5, -5, 7, -7]);
    assert_eq!(file.pcm_frames, 4);
    assert_eq!(
        file.slices,
        vec![
            Slice {
                sample_offset: 0,
                sample_length: 2
            },
            Slice {
                sample_offset: 2,
                sample_length: 2
            },
        ]
    );
}

#[test]
fn test_parse_stereo_sidecar() {
    let data = build_rexwav(1, 48000, 2, &[(0, 2)], &[1, 2, 3, 4], 2);
    let file = rexwav::parse(&data).unwrap();

    assert_eq!(file.channels, 2);
    assert_eq!(file.pcm_frames, 2);
    assert_eq!(file.pcm, vec![1, 2, 3, 4]);
}

#[test]
fn test_trailing_bytes_are_ignored() {
    let mut data = build_rexwav(1, 44100, 1, &[], &[9], 1);
    data.extend_from_slice(&[0xaa; 16]);
    let file = rexwav::parse(&data).unwrap();
    assert_eq!(file.pcm, vec![9]);
}

#[test]
fn test_rejects_short_header() {
    assert_eq!(rexwav::parse(&[0u8; 10]), Err(RexError::TooSmall(10)));
}

#[test]
fn test_rejects_bad_magic() {
    let mut data = build_rexwav(1, 44100, 1, &[], &[0], 1);
    data[0..4].copy_from_slice(b"WAVE");
    assert_eq!(rexwav::parse(&data), Err(RexError::NotRexwav));
}

#[test]
fn test_rejects_unknown_version() {
    let data = build_rexwav(2, 44100, 1, &[], &[0], 1);
    assert_eq!(rexwav::parse(&data), Err(RexError::Unsupported(2)));
}

#[test]
fn test_rejects_bad_channel_count() {
    let data = build_rexwav(1, 44100, 3, &[], &[0], 1);
    assert!(matches!(rexwav::parse(&data), Err(RexError::Corrupt(_))));
}

#[test]
fn test_rejects_truncated_pcm() {
    // header declares 8 frames but carries only 2 samples
    let data = build_rexwav(1, 44100, 1, &[], &[1, 2], 8);
    match rexwav::parse(&data) {
        Err(RexError::TruncatedChunk { needed, got }) => {
            assert_eq!(needed, 64 + 16);
            assert_eq!(got, data.len());
        }
        other => panic!("expected TruncatedChunk, got {:?}", other),
    }
}

#[test]
fn test_rejects_oversize_frame_count() {
    let data = build_rexwav(1, 44100, 1, &[], &[0], 20_000_000);
    assert_eq!(rexwav::parse(&data), Err(RexError::Oversize(20_000_000)));
}

#[test]
fn test_rejects_too_many_slices() {
    let slices: Vec<(u32, u32)> = (0..300).map(|i| (i, 1)).collect();
    let data = build_rexwav(1, 44100, 1, &slices, &[0], 1);
    assert!(matches!(rexwav::parse(&data), Err(RexError::Corrupt(_))));
}
