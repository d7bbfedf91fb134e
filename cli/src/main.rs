//! Print an image on an ESC/POS thermal printer.
//!
//! Settings come from the environment (optionally a `.env` file); command
//! line flags override individual values. The encoded job is written to a
//! write-only device node or file, or to stdout with `--output -`.

mod config;

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use escpos_raster::{Pipeline, RawSink, WriterSink, loader};
use tracing_subscriber::EnvFilter;

use config::AppConfig;

/// ESC @ - initialize printer.
const INIT: [u8; 2] = [0x1b, 0x40];

/// ESC d n - print and feed n lines.
const FEED: [u8; 3] = [0x1b, 0x64, 0x04];

#[derive(Debug, Parser)]
#[command(version, about = "Dither an image and print it as an ESC/POS raster image")]
struct Args {
    /// Image path, relative to IMAGE_BASE_DIR.
    image: PathBuf,

    /// Treat IMAGE as a text file holding base64-encoded image data.
    #[arg(long)]
    base64: bool,

    /// Device or file to write to ("-" for stdout). Overrides PRINTER_DEVICE.
    #[arg(short, long)]
    output: Option<String>,

    /// Dither mode: threshold, floyd-steinberg, atkinson. Overrides DITHER_MODE.
    #[arg(short, long)]
    dither: Option<String>,

    /// Black/white threshold (0-255). Overrides THRESHOLD.
    #[arg(short, long)]
    threshold: Option<u8>,

    /// Target width in dots. Overrides IMAGE_WIDTH.
    #[arg(short, long)]
    width: Option<u32>,

    /// Save the dithered bitmap as PNG for inspection.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Process and encode, but do not write to the device.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load().context("failed to load configuration")?;
    apply_overrides(&mut config, &args);

    let profile = config.profile()?;
    tracing::info!(profile = %profile.model_info(), "Using printer profile");

    let loaded = if args.base64 {
        loader::load_from_base64_file(&config.image_base_dir, &args.image)
    } else {
        loader::load_from_file(&config.image_base_dir, &args.image)
    };
    let img = loaded.with_context(|| format!("failed to load image {}", args.image.display()))?;

    let pipeline = Pipeline::new(config.pipeline_options(&profile)?);
    let bitmap = pipeline.process(&img)?;

    if let Some(path) = &args.preview {
        bitmap
            .to_gray_image()
            .save(path)
            .with_context(|| format!("failed to write preview {}", path.display()))?;
        tracing::info!(path = %path.display(), "Preview saved");
    }

    let raster = config.encoder(&profile)?.encode(&bitmap)?;

    let mut job = Vec::with_capacity(INIT.len() + raster.len() + FEED.len());
    job.extend_from_slice(&INIT);
    job.extend_from_slice(&raster);
    job.extend_from_slice(&FEED);

    if config.dry_run_mode {
        tracing::info!(bytes = job.len(), "Dry run, nothing written");
        return Ok(());
    }

    send(&config.printer_device, &job)?;
    tracing::info!(device = %config.printer_device, bytes = job.len(), "Print job sent");
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(v) = &args.output {
        config.printer_device = v.clone();
    }
    if let Some(v) = &args.dither {
        config.dither_mode = v.clone();
    }
    if let Some(v) = args.threshold {
        config.threshold = Some(v);
    }
    if let Some(v) = args.width {
        config.image_width = Some(v);
    }
    if args.dry_run {
        config.dry_run_mode = true;
    }
}

fn send(device: &str, job: &[u8]) -> anyhow::Result<()> {
    if device == "-" {
        let mut sink = WriterSink::new(io::stdout().lock());
        sink.write(job).context("failed to write to stdout")?;
        return Ok(());
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(device)
        .with_context(|| format!("failed to open printer device {device}"))?;
    let mut sink = WriterSink::new(file);
    sink.write(job)
        .with_context(|| format!("failed to write to {device}"))?;
    Ok(())
}
