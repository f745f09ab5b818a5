//! Mix orchestration
//!
//! decode → locate → synthesize → encode → tag, strictly in that order.
//!
//! Output is staged in a temporary directory next to the destination and
//! renamed into place only after encoding succeeded. The staging directory is
//! owned by a `TempDir`, so it is removed on every exit path, including errors,
//! and a failed run never leaves a partial output file behind.

use crate::crossfade::{self, CrossfadeSpec, MixDiagnostics, MixResult};
use crate::error::{MixError, Result};
use crate::locator::TransitionStrategy;
use crate::tags::{merge_tags, Tags, WriteReport};
use crate::traits::{AudioDecoder, AudioEncoder, TagReader, TagWriter};
use crate::types::{SignalBuffer, TransitionPoint};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default output bitrate for lossy encoders
pub const DEFAULT_BITRATE_KBPS: u32 = 320;

/// Prefix of the staging directory created beside the output
const STAGING_PREFIX: &str = ".segue-";

/// Pipeline settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How transition points are chosen
    pub strategy: TransitionStrategy,
    /// Crossfade duration and curves
    pub crossfade: CrossfadeSpec,
    /// Bitrate handed to the encoder
    pub bitrate_kbps: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strategy: TransitionStrategy::default(),
            crossfade: CrossfadeSpec::default(),
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
        }
    }
}

/// Summary of a completed mix
#[derive(Debug, Clone, Serialize)]
pub struct MixReport {
    /// Final output path
    pub output: PathBuf,
    /// Strategy that chose the transition points
    pub strategy: TransitionStrategy,
    /// Fade-out point in track A
    pub point_a: TransitionPoint,
    /// Fade-in point in track B
    pub point_b: TransitionPoint,
    /// Sample rate of the output
    pub sample_rate: u32,
    /// Overlap asked for
    pub requested_overlap_samples: usize,
    /// Overlap actually blended
    pub overlap_samples: usize,
    /// Length of the stitched output
    pub output_duration_seconds: f64,
    /// Absorbed degradations
    pub diagnostics: MixDiagnostics,
    /// Tag read failures, one message per track that could not be read
    pub tag_read_errors: Vec<String>,
    /// Per-key tag write outcome
    pub tags: WriteReport,
    /// Whole-file tag write failure, if the writer could not save at all
    pub tag_write_error: Option<String>,
}

/// Locate the transition and synthesize the crossfade, without any I/O
pub fn mix(
    a: &SignalBuffer,
    b: &SignalBuffer,
    strategy: TransitionStrategy,
    spec: &CrossfadeSpec,
) -> Result<MixResult> {
    let pair = strategy.locate(a, b)?;
    Ok(crossfade::synthesize(a, b, pair.a, pair.b, spec)?.with_strategy(strategy, &pair))
}

/// Two-track mixing pipeline over pluggable collaborators
pub struct MixPipeline<D, E, T> {
    decoder: D,
    encoder: E,
    tags: T,
    config: PipelineConfig,
}

impl<D, E, T> MixPipeline<D, E, T>
where
    D: AudioDecoder,
    E: AudioEncoder,
    T: TagReader + TagWriter,
{
    /// Create a pipeline
    pub fn new(decoder: D, encoder: E, tags: T, config: PipelineConfig) -> Self {
        Self {
            decoder,
            encoder,
            tags,
            config,
        }
    }

    /// Current settings
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Mix two already-decoded buffers with the configured strategy and crossfade
    pub fn mix_buffers(&self, a: &SignalBuffer, b: &SignalBuffer) -> Result<MixResult> {
        mix(a, b, self.config.strategy, &self.config.crossfade)
    }

    /// Mix `input_a` into `input_b` and write the result to `output`
    ///
    /// # Errors
    /// Fails with `MissingInput` if either input does not exist, and propagates
    /// decode, locate, synthesis and encode failures. Tag failures are recorded
    /// in the report instead.
    pub fn run(&mut self, input_a: &Path, input_b: &Path, output: &Path) -> Result<MixReport> {
        for input in [input_a, input_b] {
            if !input.exists() {
                return Err(MixError::MissingInput(input.to_path_buf()));
            }
        }

        info!(
            track_a = %input_a.display(),
            track_b = %input_b.display(),
            strategy = %self.config.strategy,
            "Decoding tracks"
        );
        let a = self.decoder.decode(input_a)?;
        let b = self.decoder.decode(input_b)?;
        debug!(
            samples_a = a.len(),
            samples_b = b.len(),
            sample_rate = a.sample_rate(),
            "Decoded tracks"
        );

        let mut tag_read_errors = Vec::new();
        let tags_a = self.read_tags_or_empty(input_a, &mut tag_read_errors);
        let tags_b = self.read_tags_or_empty(input_b, &mut tag_read_errors);
        let merged = merge_tags(&tags_a, &tags_b);

        let result = self.mix_buffers(&a, &b)?;
        info!(
            point_a = result.point_a.time_offset_seconds,
            point_b = result.point_b.time_offset_seconds,
            overlap_samples = result.overlap_samples,
            "Synthesized transition"
        );

        let (tags, tag_write_error) = self.write_staged(&result.buffer, &merged, output)?;

        info!(output = %output.display(), "Mix written");

        Ok(MixReport {
            output: output.to_path_buf(),
            strategy: self.config.strategy,
            point_a: result.point_a,
            point_b: result.point_b,
            sample_rate: result.buffer.sample_rate(),
            requested_overlap_samples: result.requested_overlap_samples,
            overlap_samples: result.overlap_samples,
            output_duration_seconds: result.buffer.duration_secs(),
            diagnostics: result.diagnostics,
            tag_read_errors,
            tags,
            tag_write_error,
        })
    }

    fn read_tags_or_empty(&self, path: &Path, errors: &mut Vec<String>) -> Tags {
        match self.tags.read_tags(path) {
            Ok(tags) => tags,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read tags, continuing without them");
                errors.push(format!("{}: {}", path.display(), e));
                Tags::new()
            }
        }
    }

    /// Encode and tag inside a staging directory, then move the file into place
    fn write_staged(
        &self,
        buffer: &SignalBuffer,
        tags: &Tags,
        output: &Path,
    ) -> Result<(WriteReport, Option<String>)> {
        let file_name = output.file_name().ok_or_else(|| {
            MixError::encode(format!("output path has no file name: {}", output.display()))
        })?;
        let parent = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)?;
        let staged = staging.path().join(file_name);
        debug!(staged = %staged.display(), "Encoding into staging directory");

        self.encoder
            .encode(buffer, &staged, self.config.bitrate_kbps)?;

        let (report, write_error) = match self.tags.write_tags(&staged, tags) {
            Ok(report) => (report, None),
            Err(e) => {
                warn!(error = %e, "Tag write failed, keeping untagged output");
                (WriteReport::default(), Some(e.to_string()))
            }
        };

        std::fs::rename(&staged, output)?;
        Ok((report, write_error))
    }
}
