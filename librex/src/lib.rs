use wasm_bindgen::prelude::*;

pub mod core;
pub mod dwop;
pub mod rexwav;

mod parser;

pub use self::core::{
    BitReader, BitWriter, RexError, RexFile, RexResult, Slice, DEFAULT_SAMPLE_RATE, MAX_FRAMES,
    MAX_SLICES,
};
pub use dwop::{decode_mono, decode_stereo, ChannelState};
pub use parser::Parser;

/// parse a rex2 file from an in-memory buffer
pub fn parse(data: &[u8]) -> RexResult<RexFile> {
    Parser::new().parse(data)
}

// result helpers

/// turn an error into js
fn to_js_err(e: RexError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// wasm api

/// info about a rex2 loop
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct LoopInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 or 2)
    pub channels: u8,
    /// Bytes per sample in the source file
    pub bytes_per_sample: u8,
    /// Tempo in BPM
    pub tempo_bpm: f32,
    pub bars: u16,
    pub beats: u8,
    pub time_sig_num: u8,
    pub time_sig_den: u8,
    /// Playable slices after transient filtering
    pub slice_count: u32,
    /// Decoded length in per-channel frames
    pub frames: u32,
    /// Loop duration in seconds
    pub duration_secs: f64,
}

/// decode a rex2 file to interleaved 16-bit PCM
#[wasm_bindgen]
pub fn decode(data: &[u8]) -> Result<Vec<i16>, JsValue> {
    parse(data).map(|file| file.pcm).map_err(to_js_err)
}

/// get information about a rex2 file
#[wasm_bindgen]
pub fn info(data: &[u8]) -> Result<LoopInfo, JsValue> {
    let file = parse(data).map_err(to_js_err)?;

    Ok(LoopInfo {
        sample_rate: file.sample_rate,
        channels: file.channels,
        bytes_per_sample: file.bytes_per_sample,
        tempo_bpm: file.tempo_bpm,
        bars: file.bars,
        beats: file.beats,
        time_sig_num: file.time_sig_num,
        time_sig_den: file.time_sig_den,
        slice_count: file.slices.len() as u32,
        frames: file.pcm_frames as u32,
        duration_secs: file.duration_secs(),
    })
}

/// get the slice table of a rex2 file
///
/// Returns an array of `{ sample_offset, sample_length }` objects.
#[wasm_bindgen]
pub fn slices(data: &[u8]) -> Result<JsValue, JsValue> {
    let file = parse(data).map_err(to_js_err)?;
    serde_wasm_bindgen::to_value(&file.slices).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// get lib version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// tests
