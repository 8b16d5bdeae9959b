use std::fmt;
use std::ops::Range;

use crate::{BITS_PER_FRAME, SAMPLES_PER_BIT, SAMPLES_PER_FRAME};

pub const START_BIT: usize = 0;
pub const FIRST_DATA_BIT: usize = 1;
pub const DATA_BITS: usize = 8;
pub const STOP_BIT_1: usize = 9;
pub const STOP_BIT_2: usize = 10;

/// Sample range of one bit cell, assuming the stream starts on a start bit
pub fn cell_range(frame_index: usize, bit_index: usize) -> Range<usize> {
    let start = frame_index * SAMPLES_PER_FRAME + bit_index * SAMPLES_PER_BIT;
    start..start + SAMPLES_PER_BIT
}

/// Sample range of a whole frame
pub fn frame_range(frame_index: usize) -> Range<usize> {
    let start = frame_index * SAMPLES_PER_FRAME;
    start..start + SAMPLES_PER_FRAME
}

/// Start/stop bit violation found in a received frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingError {
    StartBitNotSet,
    StopBit1Set,
    StopBit2Set,
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FramingError::StartBitNotSet => "start bit not logical 1",
            FramingError::StopBit1Set => "stop bit #1 not logical 0",
            FramingError::StopBit2Set => "stop bit #2 not logical 0",
        };
        f.write_str(msg)
    }
}

/// The 11 bits of one serial frame, bit `i` of the word is cell `i`
///
/// Layout: start bit (1), 8 data bits LSB first, two stop bits (0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    bits: u16,
}

impl Frame {
    const MASK: u16 = (1 << BITS_PER_FRAME) - 1;

    /// Frame carrying `byte` with correct start and stop bits
    pub fn encode(byte: u8) -> Self {
        Self {
            bits: (1 << START_BIT) | ((byte as u16) << FIRST_DATA_BIT),
        }
    }

    /// Frame from recovered bits; anything above bit 10 is ignored
    pub fn from_bits(bits: u16) -> Self {
        Self {
            bits: bits & Self::MASK,
        }
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn bit(&self, index: usize) -> bool {
        index < BITS_PER_FRAME && (self.bits >> index) & 1 == 1
    }

    /// Data bits 1..=8, regardless of framing
    pub fn payload(&self) -> u8 {
        (self.bits >> FIRST_DATA_BIT) as u8
    }

    /// Every start/stop bit that holds the wrong value, in bit order
    pub fn violations(&self) -> Vec<FramingError> {
        let mut errors = Vec::new();
        if !self.bit(START_BIT) {
            errors.push(FramingError::StartBitNotSet);
        }
        if self.bit(STOP_BIT_1) {
            errors.push(FramingError::StopBit1Set);
        }
        if self.bit(STOP_BIT_2) {
            errors.push(FramingError::StopBit2Set);
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_range_geometry() {
        assert_eq!(cell_range(0, 0), 0..441);
        assert_eq!(cell_range(0, 10), 4410..4851);
        assert_eq!(cell_range(2, 3), 2 * 4851 + 3 * 441..2 * 4851 + 4 * 441);
        assert_eq!(frame_range(1), 4851..9702);
    }

    #[test]
    fn test_cells_tile_the_frame() {
        let frame = frame_range(3);
        assert_eq!(cell_range(3, 0).start, frame.start);
        assert_eq!(cell_range(3, BITS_PER_FRAME - 1).end, frame.end);
        for bit in 1..BITS_PER_FRAME {
            assert_eq!(cell_range(3, bit - 1).end, cell_range(3, bit).start);
        }
    }

    #[test]
    fn test_encode_layout_lsb_first() {
        let frame = Frame::encode(0b1000_0001);
        assert!(frame.bit(START_BIT));
        assert!(frame.bit(1)); // LSB
        assert!(!frame.bit(2));
        assert!(frame.bit(FIRST_DATA_BIT + DATA_BITS - 1)); // MSB
        assert!(!frame.bit(STOP_BIT_1));
        assert!(!frame.bit(STOP_BIT_2));
        assert_eq!(frame.bits(), 0b000_1000_0001_1);
    }

    #[test]
    fn test_encoded_frames_are_valid() {
        for byte in 0..=255u8 {
            let frame = Frame::encode(byte);
            assert!(frame.is_valid());
            assert_eq!(frame.payload(), byte);
        }
    }

    #[test]
    fn test_violations_in_bit_order() {
        let frame = Frame::from_bits(0b110_0000_0000);
        assert_eq!(
            frame.violations(),
            vec![
                FramingError::StartBitNotSet,
                FramingError::StopBit1Set,
                FramingError::StopBit2Set
            ]
        );
    }

    #[test]
    fn test_payload_extracted_despite_violations() {
        let frame = Frame::from_bits(1 | 0x5A << 1 | 1 << STOP_BIT_2);
        assert_eq!(frame.violations(), vec![FramingError::StopBit2Set]);
        assert_eq!(frame.payload(), 0x5A);
    }

    #[test]
    fn test_from_bits_masks_high_bits() {
        let frame = Frame::from_bits(0xF801);
        assert_eq!(frame.bits(), 0x0001);
        assert!(!frame.bit(11));
    }

    #[test]
    fn test_framing_error_messages() {
        assert_eq!(FramingError::StartBitNotSet.to_string(), "start bit not logical 1");
        assert_eq!(FramingError::StopBit1Set.to_string(), "stop bit #1 not logical 0");
        assert_eq!(FramingError::StopBit2Set.to_string(), "stop bit #2 not logical 0");
    }
}
