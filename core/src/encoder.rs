use std::f32::consts::PI;

use crate::crc::crc16_update;
use crate::decoder::detect_bit;
use crate::error::{Result, UplinkError};
use crate::frame::Frame;
use crate::sample::{from_pcm8, SILENCE};
use crate::{
    BITS_PER_FRAME, MARK_SAMPLES, SAMPLES_PER_BIT, SAMPLES_PER_FRAME, SAMPLE_RATE,
    SILENCE_TOLERANCE, TONE_AMPLITUDE, TONE_FREQUENCY,
};

/// Largest peak a signed 8-bit sample can carry
pub const MAX_TONE_AMPLITUDE: u8 = i8::MAX as u8;
/// Smallest peak that can leave the silence band at all
pub const MIN_TONE_AMPLITUDE: u8 = SILENCE_TOLERANCE + 1;

/// Tone burst parameters for logical-1 cells
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Burst frequency in Hz
    pub tone_frequency: f32,
    /// Peak amplitude in PCM8 units (`MIN_TONE_AMPLITUDE..=MAX_TONE_AMPLITUDE`)
    pub tone_amplitude: u8,
}

impl EncoderConfig {
    /// Reject settings whose burst a default decoder would not read as a 1
    pub fn validate(&self) -> Result<()> {
        let nyquist = SAMPLE_RATE as f32 / 2.0;
        if !(self.tone_frequency > 0.0 && self.tone_frequency < nyquist) {
            return Err(UplinkError::InvalidConfig(format!(
                "tone frequency {} Hz outside (0, {}) Hz",
                self.tone_frequency, nyquist
            )));
        }
        if !(MIN_TONE_AMPLITUDE..=MAX_TONE_AMPLITUDE).contains(&self.tone_amplitude) {
            return Err(UplinkError::InvalidConfig(format!(
                "tone amplitude {} outside {}..={}",
                self.tone_amplitude, MIN_TONE_AMPLITUDE, MAX_TONE_AMPLITUDE
            )));
        }
        Ok(())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            tone_frequency: TONE_FREQUENCY,
            tone_amplitude: TONE_AMPLITUDE,
        }
    }
}

/// Sine burst filling the mark half of a cell
///
/// Sampled half a tick off the zero crossing so that with the default
/// frequency (20 samples per period) the smallest burst sample is still
/// `amplitude * sin(PI / 20)` away from silence.
fn generate_burst(num_samples: usize, frequency: f32, amplitude: f32) -> Vec<i32> {
    let angular_freq = 2.0 * PI * frequency / SAMPLE_RATE as f32;
    (0..num_samples)
        .map(|i| {
            let value = amplitude * (angular_freq * (i as f32 + 0.5)).sin();
            from_pcm8(value.round().clamp(-127.0, 127.0) as i8)
        })
        .collect()
}

/// Return-to-zero modulator for the uplink serial protocol
///
/// Each byte becomes one 11-cell frame. A logical-1 cell is a tone burst
/// over its first `MARK_SAMPLES` followed by silence, a logical-0 cell is
/// silent throughout.
pub struct Encoder {
    burst: Vec<i32>,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            burst: generate_burst(MARK_SAMPLES, TONE_FREQUENCY, TONE_AMPLITUDE as f32),
        }
    }

    /// Encoder with a custom tone burst
    ///
    /// Fails with `InvalidConfig` when the parameters are out of range or the
    /// resulting burst would not decode as a logical 1 under the default
    /// silence tolerance.
    pub fn with_config(config: EncoderConfig) -> Result<Self> {
        config.validate()?;

        let burst = generate_burst(
            MARK_SAMPLES,
            config.tone_frequency,
            config.tone_amplitude as f32,
        );
        if !detect_bit(&burst, SILENCE_TOLERANCE) {
            return Err(UplinkError::InvalidConfig(format!(
                "{} Hz burst at amplitude {} stays within the silence band",
                config.tone_frequency, config.tone_amplitude
            )));
        }

        Ok(Self { burst })
    }

    /// Modulate `data` followed by its CRC-16 (high byte first)
    ///
    /// An empty payload yields no samples at all; the checksum is only
    /// appended behind actual data.
    pub fn encode(&self, data: &[u8]) -> Vec<i32> {
        if data.is_empty() {
            return Vec::new();
        }

        let mut samples = Vec::with_capacity((data.len() + 2) * SAMPLES_PER_FRAME);
        let mut crc = 0u16;
        for &byte in data {
            crc = crc16_update(crc, byte);
            self.modulate_byte(byte, &mut samples);
        }
        for byte in crc.to_be_bytes() {
            self.modulate_byte(byte, &mut samples);
        }

        log::debug!(
            "Encoded {} payload bytes + CRC 0x{:04X} into {} samples",
            data.len(),
            crc,
            samples.len()
        );
        samples
    }

    /// Modulate bytes as-is, one frame each, without appending a checksum
    pub fn modulate(&self, bytes: &[u8]) -> Vec<i32> {
        let mut samples = Vec::with_capacity(bytes.len() * SAMPLES_PER_FRAME);
        for &byte in bytes {
            self.modulate_byte(byte, &mut samples);
        }
        samples
    }

    /// Append the frame for one byte
    pub fn modulate_byte(&self, byte: u8, samples: &mut Vec<i32>) {
        let frame = Frame::encode(byte);
        for bit in 0..BITS_PER_FRAME {
            self.modulate_bit(frame.bit(bit), samples);
        }
    }

    fn modulate_bit(&self, bit: bool, samples: &mut Vec<i32>) {
        let silent_tail = SAMPLES_PER_BIT - MARK_SAMPLES;
        if bit {
            samples.extend_from_slice(&self.burst);
        } else {
            samples.resize(samples.len() + MARK_SAMPLES, SILENCE);
        }
        samples.resize(samples.len() + silent_tail, SILENCE);
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
