//! Audio decoder implementation using Symphonia
use crate::error::{AudioError, Result};
use segue_core::{saturate_i16, AudioDecoder, SignalBuffer};
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

/// File extensions the bundled Symphonia codecs and containers handle
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "mp2", "flac", "ogg", "oga", "wav", "wave", "m4a", "mp4", "aac", "aif", "aiff", "mka",
    "webm",
];

/// Audio decoder using Symphonia
///
/// Decodes the default track of a file into a mono 16-bit `SignalBuffer`.
/// Every channel is averaged into one, so stereo and surround sources are
/// analysed and mixed as mono.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode `path` into a mono buffer
    pub fn decode_file(path: &Path) -> Result<SignalBuffer> {
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Symphonia(format!("Failed to probe file: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| AudioError::DecodeError("No audio tracks found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AudioError::DecodeError("Track has no sample rate".to_string()))?;
        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::UnsupportedFormat(format!("{}: {}", path.display(), e)))?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(e) => {
                    return Err(AudioError::Symphonia(format!("Error reading packet: {}", e)));
                }
            };

            // Skip packets that are not for the default track
            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => append_mono(decoded, &mut samples)?,
                // Corrupt packets are skipped
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!(path = %path.display(), error = %e, "Skipping undecodable packet");
                }
                Err(e) => return Err(AudioError::DecodeError(e.to_string())),
            }
        }

        debug!(
            path = %path.display(),
            samples = samples.len(),
            sample_rate,
            "Decoded file"
        );

        SignalBuffer::new(samples, sample_rate)
            .map_err(|e| AudioError::DecodeError(e.to_string()))
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&mut self, path: &Path) -> segue_core::Result<SignalBuffer> {
        Ok(Self::decode_file(path)?)
    }

    fn supports_format(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
    }
}

/// Append one decoded packet to `out` as mono 16-bit samples
///
/// Integer formats are mapped onto the 16-bit scale and reduced by
/// `SignalBuffer::from_interleaved_i16`; float formats are averaged before
/// scaling by `SignalBuffer::from_interleaved_f32`.
fn append_mono(decoded: AudioBufferRef<'_>, out: &mut Vec<i16>) -> Result<()> {
    match decoded {
        AudioBufferRef::S16(buf) => downmix(&buf, out, f64::from),
        AudioBufferRef::S8(buf) => downmix(&buf, out, |s| f64::from(s) * 256.0),
        AudioBufferRef::S24(buf) => downmix(&buf, out, |s| f64::from(s.inner()) / 256.0),
        AudioBufferRef::S32(buf) => downmix(&buf, out, |s| f64::from(s) / 65_536.0),
        AudioBufferRef::U8(buf) => downmix(&buf, out, |s| (f64::from(s) - 128.0) * 256.0),
        AudioBufferRef::U16(buf) => downmix(&buf, out, |s| f64::from(s) - 32_768.0),
        AudioBufferRef::U24(buf) => {
            downmix(&buf, out, |s| (f64::from(s.inner()) - 8_388_608.0) / 256.0)
        }
        AudioBufferRef::U32(buf) => {
            downmix(&buf, out, |s| (f64::from(s) - 2_147_483_648.0) / 65_536.0)
        }
        AudioBufferRef::F32(buf) => downmix_float(&buf, out, |s| s),
        AudioBufferRef::F64(buf) => downmix_float(&buf, out, |s| s as f32),
    }
}

fn downmix<T, F>(buf: &AudioBuffer<T>, out: &mut Vec<i16>, to_i16_scale: F) -> Result<()>
where
    T: Sample + Copy,
    F: Fn(T) -> f64,
{
    let Some(width) = channel_width(buf, out)? else {
        return Ok(());
    };
    let interleaved = interleave(buf, |s| saturate_i16(to_i16_scale(s)));
    let mono = SignalBuffer::from_interleaved_i16(&interleaved, width, buf.spec().rate)
        .map_err(|e| AudioError::DecodeError(e.to_string()))?;
    out.extend_from_slice(mono.samples());
    Ok(())
}

fn downmix_float<T, F>(buf: &AudioBuffer<T>, out: &mut Vec<i16>, to_f32: F) -> Result<()>
where
    T: Sample + Copy,
    F: Fn(T) -> f32,
{
    let Some(width) = channel_width(buf, out)? else {
        return Ok(());
    };
    let interleaved = interleave(buf, to_f32);
    let mono = SignalBuffer::from_interleaved_f32(&interleaved, width, buf.spec().rate)
        .map_err(|e| AudioError::DecodeError(e.to_string()))?;
    out.extend_from_slice(mono.samples());
    Ok(())
}

/// Channel count of `buf`; a channel-less packet is appended as silence and yields `None`
fn channel_width<T: Sample>(buf: &AudioBuffer<T>, out: &mut Vec<i16>) -> Result<Option<u16>> {
    let channels = buf.spec().channels.count();
    if channels == 0 {
        out.resize(out.len() + buf.frames(), 0);
        return Ok(None);
    }
    u16::try_from(channels)
        .map(Some)
        .map_err(|_| AudioError::DecodeError(format!("unsupported channel count {}", channels)))
}

fn interleave<T, U, F>(buf: &AudioBuffer<T>, convert: F) -> Vec<U>
where
    T: Sample + Copy,
    F: Fn(T) -> U,
{
    let channels = buf.spec().channels.count();
    let mut interleaved = Vec::with_capacity(buf.frames() * channels);
    for frame in 0..buf.frames() {
        for ch in 0..channels {
            interleaved.push(convert(buf.chan(ch)[frame]));
        }
    }
    interleaved
}
