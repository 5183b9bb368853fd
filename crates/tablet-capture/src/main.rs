#![deny(static_mut_refs)]

//! Exercise the capture pipeline without hardware: replay recorded frames
//! from a JSON capture file, or synthesize button frames at an interval,
//! and stream the resulting driver log to stdout.

use std::io::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use opentablet_device_types::{ButtonEmitPolicy, TabletConfig};
use opentablet_pipeline::transport::mock::MockTransferPort;
use opentablet_pipeline::{TabletDriver, TracingSink, TransferComplete, TransferPort};
use serde::{Deserialize, Serialize};

/// Exercise the tablet capture pipeline with replayed or synthetic frames.
#[derive(Parser)]
#[command(
    name = "tablet-capture",
    about = "Tablet input pipeline exerciser and log stream dumper"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay frames from a JSON capture file through the pipeline
    Replay {
        /// Path to the capture file
        #[arg(long)]
        input: String,
        /// Emit only button transitions instead of full state per frame
        #[arg(long)]
        transitions: bool,
        /// Ring log capacity in bytes
        #[arg(long, default_value = "4096")]
        capacity: usize,
    },
    /// Generate synthetic button frames at a fixed interval
    Synth {
        /// Number of frames to generate
        #[arg(long, default_value = "20")]
        frames: u64,
        /// Interval between frames in milliseconds
        #[arg(long, default_value = "10")]
        interval_ms: u64,
        /// Supported button count
        #[arg(long, default_value = "9")]
        buttons: u32,
        /// Emit only button transitions instead of full state per frame
        #[arg(long)]
        transitions: bool,
        /// Ring log capacity in bytes
        #[arg(long, default_value = "4096")]
        capacity: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct CaptureReport {
    timestamp_us: u64,
    report_id: u8,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CaptureFile {
    vendor_id: String,
    product_id: String,
    captures: Vec<CaptureReport>,
}

fn parse_hex_bytes(s: &str) -> Result<Vec<u8>> {
    s.split_whitespace()
        .map(|tok| {
            let tok = tok.trim_start_matches("0x").trim_start_matches("0X");
            u8::from_str_radix(tok, 16).with_context(|| format!("invalid hex byte '{tok}'"))
        })
        .collect()
}

fn parse_hex_u16(s: &str) -> Result<u16> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(s, 16).with_context(|| format!("invalid hex value '{s}'"))
}

/// Transfer port that produces one synthetic button frame per tick.
struct SynthPort {
    remaining: u64,
    interval: Duration,
    buttons: u32,
    tick: u64,
}

impl SynthPort {
    fn new(frames: u64, interval: Duration, buttons: u32) -> Self {
        Self {
            remaining: frames,
            interval,
            buttons,
            tick: 0,
        }
    }

    fn frame(&self) -> Vec<u8> {
        // Walk a single pressed button across the supported range.
        let mask: u32 = 1 << (self.tick % u64::from(self.buttons.max(1)));
        let mut frame = vec![0x02];
        frame.extend_from_slice(&mask.to_le_bytes()[..3]);
        frame
    }
}

#[async_trait]
impl TransferPort for SynthPort {
    async fn next_completion(&mut self) -> Option<TransferComplete> {
        if self.remaining == 0 {
            return None;
        }
        tokio::time::sleep(self.interval).await;
        let frame = self.frame();
        self.remaining -= 1;
        self.tick += 1;
        Some(TransferComplete::success(frame))
    }

    fn resubmit(&mut self) -> std::result::Result<(), opentablet_errors::TransportError> {
        Ok(())
    }

    async fn cancel(&mut self) -> std::result::Result<(), opentablet_errors::TransportError> {
        Ok(())
    }
}

fn base_config(transitions: bool, capacity: usize) -> TabletConfig {
    let policy = if transitions {
        ButtonEmitPolicy::TransitionsOnly
    } else {
        ButtonEmitPolicy::FullState
    };
    TabletConfig::default()
        .with_emit_policy(policy)
        .with_log_capacity(capacity)
}

async fn run_and_dump(
    config: TabletConfig,
    port: Box<dyn TransferPort>,
    expected_frames: u64,
) -> Result<()> {
    let driver = TabletDriver::attach(config, port, Box::new(TracingSink))
        .map_err(|e| anyhow::anyhow!(e))?;
    let reader = driver.reader();

    let mut stdout = std::io::stdout();
    let mut settle = 0u32;
    loop {
        let chunk = reader.read(512);
        if !chunk.is_empty() {
            stdout.write_all(&chunk)?;
            stdout.flush()?;
            settle = 0;
            continue;
        }
        let stats = driver.capture_stats();
        if stats.frames_enqueued + stats.short_frames + stats.queue_drops >= expected_frames {
            // Source exhausted; allow the worker a few empty polls to drain.
            settle += 1;
            if settle > 3 {
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let stats = driver.capture_stats();
    driver.detach().await.map_err(|e| anyhow::anyhow!(e))?;

    // Anything translated between the last read and detach.
    let tail = reader.read(usize::MAX);
    if !tail.is_empty() {
        stdout.write_all(&tail)?;
        stdout.flush()?;
    }

    eprintln!(
        "{} frame(s) enqueued, {} transport error(s), {} short, {} dropped",
        stats.frames_enqueued, stats.transport_errors, stats.short_frames, stats.queue_drops
    );
    Ok(())
}

async fn replay(input: &str, transitions: bool, capacity: usize) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read capture file '{input}'"))?;
    let file: CaptureFile =
        serde_json::from_str(&text).context("failed to parse capture file JSON")?;

    let vendor_id = parse_hex_u16(&file.vendor_id)?;
    let product_id = parse_hex_u16(&file.product_id)?;

    let mut port = MockTransferPort::new();
    let total = file.captures.len() as u64;
    for capture in &file.captures {
        port.push_completion(TransferComplete::success(parse_hex_bytes(&capture.data)?));
    }

    eprintln!(
        "Replaying {total} frame(s) for VID=0x{vendor_id:04X} PID=0x{product_id:04X}..."
    );
    let config = base_config(transitions, capacity).with_identity(vendor_id, product_id);
    run_and_dump(config, Box::new(port), total).await
}

async fn synth(
    frames: u64,
    interval_ms: u64,
    buttons: u32,
    transitions: bool,
    capacity: usize,
) -> Result<()> {
    eprintln!("Generating {frames} synthetic frame(s) every {interval_ms}ms...");
    let port = SynthPort::new(frames, Duration::from_millis(interval_ms), buttons);
    let config = base_config(transitions, capacity).with_button_count(buttons);
    run_and_dump(config, Box::new(port), frames).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay {
            input,
            transitions,
            capacity,
        } => replay(&input, transitions, capacity).await,
        Commands::Synth {
            frames,
            interval_ms,
            buttons,
            transitions,
            capacity,
        } => synth(frames, interval_ms, buttons, transitions, capacity).await,
    }
}
