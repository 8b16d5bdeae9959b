//! Sample representation shared by both directions
//!
//! Samples are 8-bit PCM values widened into the top byte of an `i32`, the
//! way audio front ends hand 8-bit data out as full-scale integers. The
//! thresholding works on the unsigned amplitude recovered from that top
//! byte, centered on `SILENCE_LEVEL`.

use crate::SILENCE_LEVEL;

/// Sample value of a silent tick
pub const SILENCE: i32 = 0;

/// Widen a signed 8-bit PCM value into the top byte of a sample
pub fn from_pcm8(value: i8) -> i32 {
    (value as i32) << 24
}

/// Signed 8-bit PCM value carried in the top byte of a sample
pub fn to_pcm8(sample: i32) -> i8 {
    (sample >> 24) as i8
}

/// Unsigned 8-bit amplitude of a sample, silence at `SILENCE_LEVEL`
pub fn amplitude(sample: i32) -> u8 {
    ((sample as u32) >> 24) as u8 ^ 0x80
}

/// Whether an amplitude lies within `tolerance` of the silence level (inclusive)
pub fn is_silent(amplitude: u8, tolerance: u8) -> bool {
    amplitude.abs_diff(SILENCE_LEVEL) <= tolerance
}
