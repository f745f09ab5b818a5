/// CLI configuration
///
/// Layered lowest to highest: built-in defaults, `segue.toml` (or the file
/// given with `--config`), `SEGUE_*` environment variables, command-line flags.
use crate::error::{CliError, Result};
use clap::ValueEnum;
use segue_core::locator::{
    DEFAULT_PEAK_THRESHOLD, DEFAULT_PEAK_WINDOW_SECONDS, DEFAULT_QUIET_WINDOW_SECONDS,
};
use segue_core::pipeline::DEFAULT_BITRATE_KBPS;
use segue_core::crossfade::DEFAULT_CROSSFADE_SECONDS;
use segue_core::{CrossfadeSpec, FadeCurve, PipelineConfig, TransitionStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "segue.toml";

/// Environment variable prefix; nested keys use `__`, e.g. `SEGUE_MIX__FADE_SECONDS`
pub const ENV_PREFIX: &str = "SEGUE";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SegueConfig {
    #[serde(default)]
    pub mix: MixSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub transcoding: TranscodingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MixSettings {
    #[serde(default)]
    pub strategy: StrategyName,

    #[serde(default = "default_fade_seconds")]
    pub fade_seconds: f64,

    #[serde(default)]
    pub curve: CurveName,

    #[serde(default = "default_quiet_window_seconds")]
    pub quiet_window_seconds: f64,

    #[serde(default = "default_peak_window_seconds")]
    pub peak_window_seconds: f64,

    #[serde(default = "default_peak_threshold")]
    pub peak_threshold: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSettings {
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscodingSettings {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Transition strategy names accepted in config files and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    /// Splice A at its quietest window
    #[default]
    QuietPoint,
    /// Leave A at its last peak, enter B at its first peak
    PeakMatch,
    /// Fade the end of A into the start of B
    TailHead,
}

/// Fade curve names accepted in config files and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CurveName {
    #[default]
    Linear,
    SquareRoot,
    SCurve,
    EqualPower,
}

impl From<CurveName> for FadeCurve {
    fn from(curve: CurveName) -> Self {
        match curve {
            CurveName::Linear => FadeCurve::Linear,
            CurveName::SquareRoot => FadeCurve::SquareRoot,
            CurveName::SCurve => FadeCurve::SCurve,
            CurveName::EqualPower => FadeCurve::EqualPower,
        }
    }
}

impl SegueConfig {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_file, None)
    }

    /// Load configuration, reading environment overrides from `env` instead of
    /// the process environment when given
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                // Load from the default file if it exists
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with SEGUE_)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(CliError::Config(format!("{name} must be positive, got {value}")))
            }
        };

        positive("mix.fade_seconds", self.mix.fade_seconds)?;
        positive("mix.quiet_window_seconds", self.mix.quiet_window_seconds)?;
        positive("mix.peak_window_seconds", self.mix.peak_window_seconds)?;

        if !(0.0..1.0).contains(&self.mix.peak_threshold) {
            return Err(CliError::Config(format!(
                "mix.peak_threshold must be in [0, 1), got {}",
                self.mix.peak_threshold
            )));
        }

        if self.output.bitrate_kbps == 0 {
            return Err(CliError::Config(
                "output.bitrate_kbps must be positive".to_string(),
            ));
        }

        if self.transcoding.timeout_seconds == 0 {
            return Err(CliError::Config(
                "transcoding.timeout_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Transition strategy described by the `[mix]` section
    ///
    /// The tail/head splice overlaps exactly one crossfade length.
    pub fn strategy(&self) -> TransitionStrategy {
        match self.mix.strategy {
            StrategyName::QuietPoint => TransitionStrategy::QuietPoint {
                window_seconds: self.mix.quiet_window_seconds,
            },
            StrategyName::PeakMatch => TransitionStrategy::PeakMatch {
                window_seconds: self.mix.peak_window_seconds,
                threshold: self.mix.peak_threshold,
            },
            StrategyName::TailHead => TransitionStrategy::TailHead {
                overlap_seconds: self.mix.fade_seconds,
            },
        }
    }

    /// Pipeline settings for this configuration
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig {
            strategy: self.strategy(),
            crossfade: CrossfadeSpec::with_curve(self.mix.fade_seconds, self.mix.curve.into())?,
            bitrate_kbps: self.output.bitrate_kbps,
        })
    }

    /// ffmpeg run limit
    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcoding.timeout_seconds)
    }
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            strategy: StrategyName::default(),
            fade_seconds: default_fade_seconds(),
            curve: CurveName::default(),
            quiet_window_seconds: default_quiet_window_seconds(),
            peak_window_seconds: default_peak_window_seconds(),
            peak_threshold: default_peak_threshold(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            bitrate_kbps: default_bitrate_kbps(),
        }
    }
}

impl Default for TranscodingSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// Default values
fn default_fade_seconds() -> f64 {
    DEFAULT_CROSSFADE_SECONDS
}

fn default_quiet_window_seconds() -> f64 {
    DEFAULT_QUIET_WINDOW_SECONDS
}

fn default_peak_window_seconds() -> f64 {
    DEFAULT_PEAK_WINDOW_SECONDS
}

fn default_peak_threshold() -> f64 {
    DEFAULT_PEAK_THRESHOLD
}

fn default_bitrate_kbps() -> u32 {
    DEFAULT_BITRATE_KBPS
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from(segue_audio::DEFAULT_FFMPEG_PATH)
}

fn default_timeout_seconds() -> u64 {
    segue_audio::DEFAULT_TIMEOUT.as_secs()
}
