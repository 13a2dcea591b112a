//! `dmr-trunkctl` — a development/diagnostic harness over the
//! `dmr_trunkctl` library.
//!
//! This binary is not a full radio application — tuner I/O and CSBK
//! acquisition are out of this crate's scope (spec.md §1) — it exists so the
//! crate is runnable from a terminal, the way the teacher's own `mbus-cli`
//! binary is a thin harness over its library.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use dmr_trunkctl::{init_logger, log_info, Config, Controller, CsPdu, NullTuner, SiteData};

#[derive(Parser)]
#[command(name = "dmr-trunkctl")]
#[command(about = "DMR control-signalling (CSBK/MBC/UDT) decode and trunking-policy harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a file of one-CSBK-per-line hex PDUs and log each decision.
    Decode {
        file: PathBuf,
        /// Policy configuration JSON (defaults match `PolicyConfig::default()`).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Persisted `trunk_chan_map`/`group_map` JSON.
        #[arg(long)]
        site_data: Option<PathBuf>,
    },
    /// Parse and pretty-print a policy configuration file.
    ShowConfig { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { file, config, site_data } => run_decode(file, config, site_data).await,
        Commands::ShowConfig { file } => show_config(file),
    }
}

async fn run_decode(file: PathBuf, config: Option<PathBuf>, site_data: Option<PathBuf>) -> Result<()> {
    let cfg = match config {
        Some(path) => Config::load(&path).with_context(|| format!("loading config {path:?}"))?,
        None => Config::default(),
    };
    let mut controller = Controller::new(cfg.into(), NullTuner::default());

    if let Some(path) = site_data {
        let data = SiteData::load(&path).with_context(|| format!("loading site data {path:?}"))?;
        controller.site.trunk_chan_map = data.trunk_chan_map.clone();
        controller.site.group_map = data.group_map();
    }

    let text = std::fs::read_to_string(&file).with_context(|| format!("reading {file:?}"))?;
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let pdu = parse_line(line).with_context(|| format!("{file:?}:{}", lineno + 1))?;
        let now = Instant::now();
        match controller.process(&pdu, now).await {
            Ok(outcome) => log_info(&format!("line {}: {outcome:?}", lineno + 1)),
            Err(err) => log_info(&format!("line {}: decode error: {err}", lineno + 1)),
        }
    }
    Ok(())
}

/// Parses one `decode` input line:
/// `<hex bytes> [crc_ok] [irrecoverable_errors] [synctype] [slot]`.
///
/// `hex bytes` is the packed CSBK (12 bytes for a bare CSBK, 22 bytes when a
/// grant carries an appended MBC absolute-parameters block); the four
/// trailing fields default to "well-formed, synctype 0, slot 0" when
/// omitted, matching spec.md §6's "Input PDU" shape.
fn parse_line(line: &str) -> Result<CsPdu> {
    let mut fields = line.split_whitespace();
    let hex = fields.next().context("missing hex PDU field")?;
    let bytes = hex_to_bytes(hex)?;
    let bits = bytes_to_bits(&bytes);

    let crc_ok = fields.next().map(|s| s != "0").unwrap_or(true);
    let irrecoverable_errors: u32 = fields.next().map(str::parse).transpose()?.unwrap_or(0);
    let synctype: u8 = fields.next().map(str::parse).transpose()?.unwrap_or(0);
    let slot: u8 = fields.next().map(str::parse).transpose()?.unwrap_or(0);

    Ok(CsPdu { bits, crc_ok, irrecoverable_errors, synctype, slot })
}

fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        bail!("hex PDU must have an even number of digits, got {hex:?}");
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid hex byte at offset {i} in {hex:?}"))
        })
        .collect()
}

fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

fn show_config(file: PathBuf) -> Result<()> {
    let cfg = Config::load(&file).with_context(|| format!("loading config {file:?}"))?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}
