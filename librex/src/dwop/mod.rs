//! DWOP codec for rex2 audio
//!
//! Delta Width Optimized Predictor: a lossless codec built from five
//! adaptive difference predictors with energy-based selection and a
//! unary-plus-adaptive-range coded residual. Stereo streams carry the
//! left channel and a right-minus-left delta channel interleaved one
//! frame at a time.

mod decoder;

pub use decoder::{decode_mono, decode_stereo, ChannelState};
