//! WAV container adapter: 8-bit mono PCM at 44100 Hz only

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use uplink_core::sample::{from_pcm8, to_pcm8};
use uplink_core::{UplinkError, BITS_PER_SAMPLE, CHANNELS, SAMPLES_PER_FRAME, SAMPLE_RATE};

use crate::error::Result;

pub fn uplink_spec() -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

fn check_spec(spec: &WavSpec) -> std::result::Result<(), UplinkError> {
    if *spec != uplink_spec() {
        return Err(UplinkError::UnsupportedFormat(format!(
            "{} Hz, {} channels, {} bits {:?} (need {} Hz mono 8-bit PCM)",
            spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format, SAMPLE_RATE
        )));
    }
    Ok(())
}

/// Read every sample, widened the way the decoder expects
pub fn read_samples(path: &Path) -> Result<Vec<i32>> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    println!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );
    check_spec(&spec)?;

    let samples: std::result::Result<Vec<i8>, _> = reader.samples::<i8>().collect();
    Ok(samples?.into_iter().map(from_pcm8).collect())
}

/// Write samples frame by frame, returning how many whole frames made it out
///
/// A failing write stops at the last complete frame instead of aborting, so
/// the caller can report how many serial bytes were written. Once a frame
/// has failed, a failing `finalize` is only logged since the same device
/// error usually hits the header update too.
pub fn write_frames(path: &Path, samples: &[i32]) -> Result<usize> {
    let mut writer = WavWriter::create(path, uplink_spec())?;
    let total = samples.len().div_ceil(SAMPLES_PER_FRAME);
    let mut written = 0;

    for frame in samples.chunks(SAMPLES_PER_FRAME) {
        if let Err(e) = frame
            .iter()
            .try_for_each(|&s| writer.write_sample(to_pcm8(s)))
        {
            log::error!("Writing frame {} failed: {}", written, e);
            break;
        }
        written += 1;
    }

    match writer.finalize() {
        Err(e) if written < total => {
            log::error!("Finalizing {} failed: {}", path.display(), e);
        }
        result => result?,
    }
    Ok(written)
}
