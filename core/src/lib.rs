//! Audio uplink codec for wrist-worn fitness devices
//!
//! Bytes travel as UART-like frames (1 start bit, 8 data bits LSB first,
//! 2 stop bits) where every bit is a fixed-length cell of 8-bit PCM audio.
//! A logical 1 is a tone burst in the first half of its cell, a logical 0
//! is silence, and the second half of every cell is silent (return-to-zero).
//! The byte stream ends with a CRC-16 so the receiver can verify it.

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod sample;

pub use crc::{checksum_bytes, crc16, crc16_update};
pub use decoder::{detect_bit, DecodeReport, Decoder, DecoderConfig, Diagnostic};
pub use encoder::{Encoder, EncoderConfig};
pub use error::{Result, UplinkError};
pub use frame::{cell_range, frame_range, Frame, FramingError};

// Audio format
pub const SAMPLE_RATE: usize = 44100;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 8;

// Serial timing
pub const BAUD_RATE: usize = 100;
pub const SAMPLES_PER_BIT: usize = SAMPLE_RATE / BAUD_RATE; // 441
pub const BITS_PER_FRAME: usize = 11; // start + 8 data + 2 stop
pub const SAMPLES_PER_FRAME: usize = SAMPLES_PER_BIT * BITS_PER_FRAME; // 4851

/// Leading part of a cell that may carry the tone; the rest must be silent
pub const MARK_SAMPLES: usize = SAMPLES_PER_BIT / 2; // 220

// Thresholding
pub const SILENCE_LEVEL: u8 = 0x80;
pub const SILENCE_TOLERANCE: u8 = 3;
/// A bit is 1 when more than `window / ACTIVITY_DIVISOR` samples are active
pub const ACTIVITY_DIVISOR: usize = 3;

// Tone burst
pub const TONE_FREQUENCY: f32 = 2205.0; // Hz, 20 samples per period
pub const TONE_AMPLITUDE: u8 = 100; // peak, in PCM8 units
