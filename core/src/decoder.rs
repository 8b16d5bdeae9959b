use std::fmt;

use crate::crc::crc16_update;
use crate::error::{Result, UplinkError};
use crate::frame::{cell_range, Frame, FramingError};
use crate::sample::{amplitude, is_silent};
use crate::{ACTIVITY_DIVISOR, BITS_PER_FRAME, MARK_SAMPLES, SAMPLES_PER_FRAME, SILENCE_TOLERANCE};

/// Recover one bit from the mark half of a cell
///
/// The bit is 1 when strictly more than a third of the window lies outside
/// the silence band. A clean burst activates nearly every sample, so the low
/// threshold tolerates partial signal loss while a few noise spikes stay 0.
pub fn detect_bit(window: &[i32], tolerance: u8) -> bool {
    let active = window
        .iter()
        .filter(|&&s| !is_silent(amplitude(s), tolerance))
        .count();
    active > window.len() / ACTIVITY_DIVISOR
}

#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Half-width of the silence band around `SILENCE_LEVEL`
    ///
    /// Raise it for noisy recordings of a played-back transmission.
    pub silence_tolerance: u8,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            silence_tolerance: SILENCE_TOLERANCE,
        }
    }
}

/// Something the decoder noticed while demodulating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Sample in the return-to-zero half of a cell that is not silent
    Noise { frame: usize, bit: usize, amplitude: u8 },
    /// Start or stop bit with the wrong value
    Framing { frame: usize, error: FramingError },
    /// Payload of a frame with framing errors, not emitted
    DroppedByte { frame: usize, value: u8, errors: usize },
    /// Accumulated CRC did not end at zero
    ChecksumMismatch { residual: u16 },
}

impl Diagnostic {
    /// Noise is informational; everything else cost data or integrity
    pub fn is_error(&self) -> bool {
        !matches!(self, Diagnostic::Noise { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Noise { frame, bit, amplitude } => write!(
                f,
                "RZ code in serial frame {:2} bit {:2}: waveform should be silent, instead: 0x{:02X}",
                frame, bit, amplitude
            ),
            Diagnostic::Framing { frame, error } => {
                write!(f, "error in serial frame {:2}: {}", frame, error)
            }
            Diagnostic::DroppedByte { frame, value, errors } => write!(
                f,
                "byte with value 0x{:02X} of serial frame {:2} ignored because of {} logical errors",
                value, frame, errors
            ),
            Diagnostic::ChecksumMismatch { residual } => {
                write!(f, "error in CRC: 0x{:04X} instead of 0", residual)
            }
        }
    }
}

/// Outcome of demodulating one sample stream
#[derive(Debug, Clone, Default)]
pub struct DecodeReport {
    /// Bytes of every correctly framed frame, checksum bytes included
    pub bytes: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of complete frames consumed
    pub frames: usize,
    /// CRC accumulator after the last byte
    pub residual: u16,
}

impl DecodeReport {
    pub fn checksum_ok(&self) -> bool {
        self.residual == 0
    }

    pub fn framing_errors(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::Framing { .. }))
            .count()
    }

    pub fn noise_warnings(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::Noise { .. }))
            .count()
    }

    /// The decoded bytes, or `ChecksumMismatch` when the residual is not zero
    pub fn into_result(self) -> Result<Vec<u8>> {
        if self.checksum_ok() {
            Ok(self.bytes)
        } else {
            Err(UplinkError::ChecksumMismatch {
                residual: self.residual,
            })
        }
    }
}

/// Demodulator for return-to-zero uplink audio
///
/// Assumes the first sample is the first sample of a start bit. Frames are
/// read back to back with no resynchronization; a trailing partial frame is
/// ignored.
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Demodulate every complete frame in `samples`
    ///
    /// Never fails: framing errors drop the byte, noise is only reported, and
    /// a nonzero CRC residual is recorded in the report.
    pub fn decode(&self, samples: &[i32]) -> DecodeReport {
        let mut report = DecodeReport::default();
        let frame_count = samples.len() / SAMPLES_PER_FRAME;
        let mut crc = 0u16;

        for frame_index in 0..frame_count {
            let frame = self.demodulate_frame(samples, frame_index, &mut report.diagnostics);
            let value = frame.payload();
            let violations = frame.violations();

            if violations.is_empty() {
                report.bytes.push(value);
                crc = crc16_update(crc, value);
            } else {
                for &error in &violations {
                    let framing = Diagnostic::Framing {
                        frame: frame_index,
                        error,
                    };
                    log::warn!("{}", framing);
                    report.diagnostics.push(framing);
                }
                let dropped = Diagnostic::DroppedByte {
                    frame: frame_index,
                    value,
                    errors: violations.len(),
                };
                log::warn!("{}", dropped);
                report.diagnostics.push(dropped);
            }
        }

        report.frames = frame_count;
        report.residual = crc;

        if crc != 0 {
            let mismatch = Diagnostic::ChecksumMismatch { residual: crc };
            log::error!("{}", mismatch);
            report.diagnostics.push(mismatch);
        }

        log::debug!(
            "Decoded {} bytes from {} frames ({} samples, {} left over)",
            report.bytes.len(),
            frame_count,
            samples.len(),
            samples.len() % SAMPLES_PER_FRAME
        );

        report
    }

    /// Recover the 11 bits of one frame, reporting noise in the RZ halves
    fn demodulate_frame(
        &self,
        samples: &[i32],
        frame_index: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Frame {
        let tolerance = self.config.silence_tolerance;
        let mut bits = 0u16;

        for bit in 0..BITS_PER_FRAME {
            let cell = &samples[cell_range(frame_index, bit)];
            let (mark, space) = cell.split_at(MARK_SAMPLES);

            if detect_bit(mark, tolerance) {
                bits |= 1 << bit;
            }

            for &s in space {
                let level = amplitude(s);
                if !is_silent(level, tolerance) {
                    let noise = Diagnostic::Noise {
                        frame: frame_index,
                        bit,
                        amplitude: level,
                    };
                    log::debug!("{}", noise);
                    diagnostics.push(noise);
                }
            }
        }

        Frame::from_bits(bits)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
