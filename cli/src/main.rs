mod error;
mod hex;
mod wav;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use uplink_core::{
    DecodeReport, Decoder, DecoderConfig, Diagnostic, Encoder, UplinkError, SILENCE_TOLERANCE,
};

use crate::error::{CliError, Result};

#[derive(Parser)]
#[command(name = "uplink")]
#[command(about = "Convert between uplink serial bytes and their audio waveform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode hex text (one byte per line) to a WAV audio file
    Encode {
        /// Input text file, one hex byte per line
        #[arg(value_name = "INPUT.TXT")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Input already ends with its CRC, do not append one
        #[arg(long)]
        raw: bool,
    },

    /// Decode a WAV audio file to the serial byte stream
    Decode {
        /// Input WAV file (8-bit mono PCM, 44100 Hz)
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Output file, one hex byte per line unless --binary
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Write raw bytes instead of hex text
        #[arg(long)]
        binary: bool,

        /// Silence band half-width; raise for noisy recordings
        #[arg(short, long, default_value_t = SILENCE_TOLERANCE)]
        tolerance: u8,

        /// Write a JSON summary of the decode run
        #[arg(long, value_name = "REPORT.JSON")]
        report: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode { input, output, raw } => encode_command(&input, &output, raw),
        Commands::Decode {
            input,
            output,
            binary,
            tolerance,
            report,
        } => decode_command(&input, &output, binary, tolerance, report.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Refuse to overwrite the input, including through `..`, links or a
/// different spelling of the same file
fn check_distinct(input: &Path, output: &Path) -> Result<()> {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        // Output not created yet, so it cannot alias an existing input
        _ => input == output,
    };
    if same {
        return Err(CliError::SamePath(input.to_path_buf()));
    }
    Ok(())
}

fn encode_command(input_path: &Path, output_path: &Path, raw: bool) -> Result<()> {
    check_distinct(input_path, output_path)?;

    let text = std::fs::read_to_string(input_path)?;
    let data = hex::parse_hex_lines(&text);
    println!("Read {} bytes from {}", data.len(), input_path.display());

    let encoder = Encoder::new();
    let (samples, expected) = if raw {
        (encoder.modulate(&data), data.len())
    } else if data.is_empty() {
        (Vec::new(), 0)
    } else {
        (encoder.encode(&data), data.len() + 2)
    };
    println!("Encoded {} serial bytes to {} audio samples", expected, samples.len());

    let written = wav::write_frames(output_path, &samples)?;
    if written != expected {
        return Err(UplinkError::ShortWrite { written, expected }.into());
    }

    println!("Wrote {} serial bytes to {}", written, output_path.display());
    Ok(())
}

fn decode_command(
    input_path: &Path,
    output_path: &Path,
    binary: bool,
    tolerance: u8,
    report_path: Option<&Path>,
) -> Result<()> {
    check_distinct(input_path, output_path)?;

    let samples = wav::read_samples(input_path)?;
    println!("Extracted {} samples", samples.len());

    let decoder = Decoder::with_config(DecoderConfig {
        silence_tolerance: tolerance,
    });
    let report = decoder.decode(&samples);
    println!(
        "Decoded {} bytes from {} frames ({} framing errors, {} noise warnings)",
        report.bytes.len(),
        report.frames,
        report.framing_errors(),
        report.noise_warnings()
    );

    // Partial output is written even when the checksum fails
    if binary {
        std::fs::write(output_path, &report.bytes)?;
    } else {
        std::fs::write(output_path, hex::format_hex_lines(&report.bytes))?;
    }
    println!("Wrote {} bytes to {}", report.bytes.len(), output_path.display());

    if let Some(path) = report_path {
        let summary = DecodeSummary::from_report(&report, decoder.config());
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        println!("Wrote report to {}", path.display());
    }

    report.into_result()?;
    println!("CRC OK");
    Ok(())
}

#[derive(Serialize)]
struct DecodeSummary {
    tolerance: u8,
    frames: usize,
    bytes: usize,
    residual: u16,
    checksum_ok: bool,
    framing_errors: usize,
    noise_warnings: usize,
    /// Diagnostics other than noise warnings
    errors: usize,
    diagnostics: Vec<String>,
}

impl DecodeSummary {
    fn from_report(report: &DecodeReport, config: &DecoderConfig) -> Self {
        Self {
            tolerance: config.silence_tolerance,
            frames: report.frames,
            bytes: report.bytes.len(),
            residual: report.residual,
            checksum_ok: report.checksum_ok(),
            framing_errors: report.framing_errors(),
            noise_warnings: report.noise_warnings(),
            errors: report.diagnostics.iter().filter(|d| d.is_error()).count(),
            diagnostics: report.diagnostics.iter().map(Diagnostic::to_string).collect(),
        }
    }
}
