//! Lossy output through an external ffmpeg process
//!
//! The mix is first written as a staged WAV in a private temporary directory,
//! then ffmpeg converts it to the container implied by the output extension.
//! The staging directory is removed when the encode returns, on success and
//! on failure alike.

use crate::encoder::WavEncoder;
use crate::error::{AudioError, Result};
use segue_core::{AudioEncoder, SignalBuffer};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Binary looked up on `PATH` when no explicit ffmpeg path is configured
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// Default wall-clock limit for one ffmpeg run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Lines of ffmpeg's log kept in error messages
const LOG_TAIL_LINES: usize = 20;

/// Container/codec selected from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// MPEG-1 Layer III
    Mp3,
    /// FLAC (lossless, bitrate ignored)
    Flac,
    /// Ogg Vorbis
    Ogg,
    /// Opus
    Opus,
    /// AAC in an MP4/M4A container
    Aac,
    /// PCM WAV (lossless, bitrate ignored)
    Wav,
    /// Anything else; ffmpeg picks the muxer from the extension
    Other,
}

impl OutputFormat {
    /// Pick the format from `path`'s extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "mp3" => Self::Mp3,
            "flac" => Self::Flac,
            "ogg" | "oga" => Self::Ogg,
            "opus" => Self::Opus,
            "m4a" | "mp4" | "aac" => Self::Aac,
            "wav" | "wave" => Self::Wav,
            _ => Self::Other,
        }
    }

    /// Codec arguments placed between the input and the output path
    pub fn codec_args(self, bitrate_kbps: u32) -> Vec<String> {
        let bitrate = format!("{}k", bitrate_kbps);
        let bitrate = bitrate.as_str();
        let args: &[&str] = match self {
            Self::Mp3 => &["-b:a", bitrate, "-f", "mp3"],
            Self::Flac => &["-compression_level", "5", "-f", "flac"],
            Self::Ogg => &["-c:a", "libvorbis", "-b:a", bitrate, "-f", "ogg"],
            Self::Opus => &["-c:a", "libopus", "-b:a", bitrate, "-f", "opus"],
            Self::Aac => &["-c:a", "aac", "-b:a", bitrate],
            Self::Wav => &["-c:a", "pcm_s16le", "-f", "wav"],
            Self::Other => &["-b:a", bitrate],
        };
        args.iter().map(|arg| (*arg).to_string()).collect()
    }
}

/// Encoder that shells out to ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: PathBuf,
    timeout: Duration,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_PATH)
    }
}

impl FfmpegEncoder {
    /// Create an encoder using the given ffmpeg binary
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the per-run timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured ffmpeg binary
    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// Configured per-run timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check whether the configured binary runs at all
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    /// Encode `buffer` to `output` at `bitrate_kbps`
    ///
    /// On failure a partially written `output` is removed, unless the file
    /// was already there before the call.
    pub fn transcode(&self, buffer: &SignalBuffer, output: &Path, bitrate_kbps: u32) -> Result<()> {
        let existed = output.exists();
        let result = self.run_ffmpeg(buffer, output, bitrate_kbps);
        if result.is_err() && !existed && output.exists() {
            if let Err(e) = fs::remove_file(output) {
                warn!(output = %output.display(), error = %e, "Could not remove partial output");
            }
        }
        result
    }

    fn run_ffmpeg(&self, buffer: &SignalBuffer, output: &Path, bitrate_kbps: u32) -> Result<()> {
        let staging = tempfile::Builder::new().prefix("segue-ffmpeg-").tempdir()?;
        let staged_wav = staging.path().join("staged.wav");
        let log_path = staging.path().join("ffmpeg.log");

        WavEncoder::write(buffer, &staged_wav)?;

        let format = OutputFormat::from_path(output);
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-hide_banner")
            .arg("-i")
            .arg(&staged_wav)
            .arg("-y") // Overwrite output file
            .args(format.codec_args(bitrate_kbps))
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(File::create(&log_path)?));

        debug!(
            ffmpeg = %self.ffmpeg_path.display(),
            output = %output.display(),
            ?format,
            bitrate_kbps,
            "Starting ffmpeg"
        );

        let mut child = cmd.spawn().map_err(|e| {
            AudioError::Transcoder(format!(
                "failed to start {}: {}",
                self.ffmpeg_path.display(),
                e
            ))
        })?;

        let status = wait_with_timeout(&mut child, self.timeout)?;
        if !status.success() {
            let log = fs::read_to_string(&log_path).unwrap_or_default();
            return Err(AudioError::Transcoder(format!(
                "ffmpeg exited with {}: {}",
                status,
                log_tail(&log, LOG_TAIL_LINES)
            )));
        }

        debug!(output = %output.display(), "ffmpeg finished");
        Ok(())
    }
}

impl AudioEncoder for FfmpegEncoder {
    fn encode(&self, buffer: &SignalBuffer, path: &Path, bitrate_kbps: u32) -> segue_core::Result<()> {
        Ok(self.transcode(buffer, path, bitrate_kbps)?)
    }
}

/// Wait for `child`, killing it once `timeout` has elapsed
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            warn!(timeout_secs = timeout.as_secs_f64(), "ffmpeg timed out, killing it");
            // The process may have exited between try_wait and kill
            if let Err(e) = child.kill() {
                debug!(error = %e, "kill after timeout failed");
            }
            child.wait()?;
            return Err(AudioError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Last `lines` non-empty lines of `log`, joined with " | "
fn log_tail(log: &str, lines: usize) -> String {
    let kept: Vec<&str> = log.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join(" | ")
}
