//! CLI front-end over [`packer::save_as`]/[`packer::load_from`]:
//! round-trips a packer-encoded file through the chosen level, which
//! doubles as a way to inspect a file's size at each level and to
//! re-encode one file into another.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

/// Encode or re-encode a structured value to and from packer's binary format.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input file to read (an existing packer-encoded file).
    input: PathBuf,

    /// Output file to write.
    output: PathBuf,

    /// Compression level to write the output at.
    #[arg(short = 'l', long = "level", default_value_t = 2, value_parser = parse_level)]
    level: u8,

    /// Maximum table nesting depth to allow while decoding the input.
    #[arg(long = "max-depth", default_value_t = packer_core::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Write a level-3 payload even if the output path looks like a text sink.
    #[arg(short, long)]
    force: bool,
}

fn parse_level(s: &str) -> Result<u8, String> {
    let n: u8 = s.parse().map_err(|_| format!("not a number: {s}"))?;
    if packer_core::Level::from_u8(n).is_some() {
        Ok(n)
    } else {
        Err(format!("level must be 1, 2, or 3, got {n}"))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let level = packer_core::Level::from_u8(args.level).expect("validated by parse_level");

    let input_bytes = match std::fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("failed to read {}: {e}", args.input.display());
            return ExitCode::FAILURE;
        }
    };
    let value = match packer_core::decompress_with_max_depth(&input_bytes, args.max_depth) {
        Ok(v) => v,
        Err(e) => {
            error!("failed to decode {}: {e}", args.input.display());
            return ExitCode::FAILURE;
        }
    };

    match packer::save_as(&args.output, &value, level, args.force) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("failed to write {}: {e:?}", args.output.display());
            ExitCode::FAILURE
        }
    }
}
