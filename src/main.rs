//! maskscan - locate known reference images in a decoded video stream

use std::io;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use tracing::info;

use maskscan::analysis::MaskStore;
use maskscan::session::StreamSession;
use maskscan::source::{GstFileSource, PixelFormat};
use maskscan::{Config, ScanConfig, SourceConfig, DEFAULT_THRESHOLD};

#[derive(Parser, Debug)]
#[command(name = "maskscan", about = "Scan a clip for frames matching reference masks")]
struct Args {
    /// Clip to scan
    clip: PathBuf,

    /// Reference mask files, compared in the order given
    #[arg(required = true)]
    masks: Vec<PathBuf>,

    /// Report matches with a score strictly below this
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Compare packed RGB frames (default)
    #[arg(long, conflicts_with = "yuv")]
    rgb: bool,

    /// Compare only the luma plane of I420 frames
    #[arg(long)]
    yuv: bool,

    /// Cap decoded delivery to N frames per second
    #[arg(long)]
    rate: Option<u32>,

    /// Write each matched frame's raw bytes to a file
    #[arg(long)]
    dump: bool,

    /// Directory for dumped frames
    #[arg(long, default_value = ".")]
    dump_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize error handling and logging
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose {
            "maskscan=debug"
        } else {
            "maskscan=warn"
        })
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(io::stderr)
        .init();

    let format = if args.yuv {
        PixelFormat::I420
    } else {
        PixelFormat::Rgb
    };

    let mut masks = MaskStore::new();
    for path in &args.masks {
        masks.load(path)?;
    }

    info!(
        "Scanning {:?} against {} mask(s), threshold {}",
        args.clip,
        masks.len(),
        args.threshold
    );

    let config = Config {
        format,
        source: SourceConfig {
            clip: args.clip,
            rate: args.rate,
        },
        scan: ScanConfig {
            threshold: args.threshold,
            dump: args.dump,
            dump_dir: args.dump_dir,
        },
    };

    let mut source = GstFileSource::new(&config)?;
    let stdout = io::stdout().lock();
    let mut session = StreamSession::new(masks, config, stdout)?;
    session.run(&mut source)?;

    Ok(())
}
