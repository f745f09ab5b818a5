//! Segue command-line front end
//!
//! Wires the Symphonia decoder, the WAV or ffmpeg encoder and the lofty tag
//! store into a [`MixPipeline`], configured from `segue.toml`, `SEGUE_*`
//! environment variables and command-line flags.

pub mod cli;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use config::SegueConfig;
pub use error::{CliError, Result};

use segue_audio::{FfmpegEncoder, OutputFormat, SymphoniaDecoder, WavEncoder};
use segue_core::{AudioEncoder, MixPipeline, MixReport, PipelineConfig};
use segue_metadata::LoftyTagStore;
use std::fmt::Write as _;
use tracing::{debug, info};

/// Resolve the effective configuration for `cli`
pub fn load_config(cli: &Cli) -> Result<SegueConfig> {
    let mut config = SegueConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

/// Mix the two inputs named on the command line
///
/// # Errors
/// Fails before any output is written when an input is missing, the
/// configuration is invalid or ffmpeg is needed but cannot be run.
pub fn run(cli: &Cli) -> Result<MixReport> {
    for input in [&cli.input_a, &cli.input_b] {
        if !input.exists() {
            return Err(CliError::MissingInput(input.clone()));
        }
    }

    let config = load_config(cli)?;
    let pipeline_config = config.pipeline_config()?;
    debug!(?config, "Resolved configuration");

    let format = OutputFormat::from_path(&cli.output);
    if format == OutputFormat::Wav {
        return mix_with(WavEncoder::new(), pipeline_config, cli);
    }

    let encoder = FfmpegEncoder::new(config.transcoding.ffmpeg_path.clone())
        .with_timeout(config.transcode_timeout());
    if !encoder.is_available() {
        return Err(CliError::EncoderUnavailable(format!(
            "{} could not be run; install ffmpeg or write a .wav output",
            encoder.ffmpeg_path().display()
        )));
    }
    info!(?format, ffmpeg = %encoder.ffmpeg_path().display(), "Encoding through ffmpeg");
    mix_with(encoder, pipeline_config, cli)
}

fn mix_with<E: AudioEncoder>(encoder: E, config: PipelineConfig, cli: &Cli) -> Result<MixReport> {
    let mut pipeline = MixPipeline::new(SymphoniaDecoder::new(), encoder, LoftyTagStore::new(), config);
    Ok(pipeline.run(&cli.input_a, &cli.input_b, &cli.output)?)
}

/// Human-readable summary of a finished mix
pub fn render_summary(report: &MixReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Wrote {}", report.output.display());
    let _ = writeln!(out, "  strategy:   {}", report.strategy);
    let _ = writeln!(
        out,
        "  transition: A at {:.3}s, B at {:.3}s",
        report.point_a.time_offset_seconds, report.point_b.time_offset_seconds
    );
    let _ = writeln!(
        out,
        "  overlap:    {} samples @ {} Hz",
        report.overlap_samples, report.sample_rate
    );
    let _ = writeln!(out, "  duration:   {:.3}s", report.output_duration_seconds);

    if report.diagnostics.overlap_clamped {
        let _ = writeln!(
            out,
            "  note: overlap shortened from {} samples to fit the tracks",
            report.requested_overlap_samples
        );
    }
    if report.diagnostics.peak_fallback {
        let _ = writeln!(out, "  note: no peaks found, tracks joined at their starts");
    }

    let _ = writeln!(
        out,
        "  tags:       {} written, {} skipped, {} failed",
        report.tags.written.len(),
        report.tags.skipped.len(),
        report.tags.failed.len()
    );
    for error in &report.tag_read_errors {
        let _ = writeln!(out, "  warning: tags not read from {}", error);
    }
    if let Some(error) = &report.tag_write_error {
        let _ = writeln!(out, "  warning: tags not written: {}", error);
    }
    out
}
