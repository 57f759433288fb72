pub mod analysis;
pub mod dump;
pub mod session;
pub mod source;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use source::PixelFormat;

/// Default similarity threshold; scores strictly below it are matches
pub const DEFAULT_THRESHOLD: f64 = 6.0;

/// System configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Session-wide pixel layout, used for both the decode caps and
    /// the scoring mode; masks must be prepared in the same layout
    pub format: PixelFormat,
    pub source: SourceConfig,
    pub scan: ScanConfig,
}

/// What to decode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub clip: PathBuf,
    /// Cap delivery to this many frames per second (videorate decimation)
    pub rate: Option<u32>,
}

/// How to score and report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub threshold: f64,
    pub dump: bool,
    pub dump_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: PixelFormat::Rgb,
            source: SourceConfig {
                clip: PathBuf::new(),
                rate: None,
            },
            scan: ScanConfig {
                threshold: DEFAULT_THRESHOLD,
                dump: false,
                dump_dir: PathBuf::from("."),
            },
        }
    }
}
