/// Command-line arguments
use crate::config::{CurveName, SegueConfig, StrategyName};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "segue")]
#[command(version, about = "Crossfade the end of one track into another", long_about = None)]
pub struct Cli {
    /// Outgoing track
    pub input_a: PathBuf,

    /// Incoming track
    pub input_b: PathBuf,

    /// Output file; the extension selects the container
    pub output: PathBuf,

    /// How the transition points are chosen
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyName>,

    /// Crossfade length in seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub fade: Option<f64>,

    /// Gain curve for both fades
    #[arg(long, value_enum)]
    pub curve: Option<CurveName>,

    /// Bitrate for lossy outputs
    #[arg(short, long, value_name = "KBPS")]
    pub bitrate: Option<u32>,

    /// Configuration file path
    #[arg(short, long, env = "SEGUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the mix report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Overlay the flags that were given onto `config`
    pub fn apply_to(&self, config: &mut SegueConfig) {
        if let Some(strategy) = self.strategy {
            config.mix.strategy = strategy;
        }
        if let Some(fade) = self.fade {
            config.mix.fade_seconds = fade;
        }
        if let Some(curve) = self.curve {
            config.mix.curve = curve;
        }
        if let Some(bitrate) = self.bitrate {
            config.output.bitrate_kbps = bitrate;
        }
    }
}
