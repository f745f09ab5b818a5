//! WAV encode/decode integration tests
//!
//! Writes files with hound and reads them back through Symphonia.

use segue_audio::{SymphoniaDecoder, WavEncoder};
use segue_core::{AudioDecoder, AudioEncoder, MixError, SignalBuffer};
use std::path::Path;
use tempfile::TempDir;

/// Ramp across the full 16-bit range so every bit pattern class is exercised
fn ramp(len: usize, sample_rate: u32) -> SignalBuffer {
    let samples = (0..len)
        .map(|i| (i as i64 * 65_535 / len as i64 - 32_768) as i16)
        .collect();
    SignalBuffer::new(samples, sample_rate).unwrap()
}

fn write_stereo(path: &Path, frames: &[(i16, i16)], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &(left, right) in frames {
        writer.write_sample(left).unwrap();
        writer.write_sample(right).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn wav_encoder_writes_mono_16_bit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.wav");
    let buffer = ramp(4_410, 44_100);

    WavEncoder::new().encode(&buffer, &path, 320).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec(), WavEncoder::spec(44_100));
    let written: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(written, buffer.samples());
}

#[test]
fn symphonia_reads_back_encoded_wav_exactly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mix.wav");
    let buffer = ramp(22_050, 22_050);

    WavEncoder::write(&buffer, &path).unwrap();
    let decoded = SymphoniaDecoder::new().decode(&path).unwrap();

    assert_eq!(decoded.sample_rate(), 22_050);
    assert_eq!(decoded, buffer);
}

#[test]
fn stereo_wav_is_averaged_to_mono() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stereo.wav");
    write_stereo(&path, &[(1000, 3000), (-200, 200), (7, 8), (-32_768, -32_768)], 8_000);

    let decoded = SymphoniaDecoder::new().decode(&path).unwrap();

    assert_eq!(decoded.sample_rate(), 8_000);
    assert_eq!(decoded.samples(), &[2000, 0, 8, -32_768]);
}

#[test]
fn garbage_file_is_a_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not_audio.wav");
    std::fs::write(&path, b"definitely not a RIFF header").unwrap();

    let err = SymphoniaDecoder::new().decode(&path).unwrap_err();
    assert!(matches!(err, MixError::Decode(_)));
}

#[test]
fn missing_file_is_missing_input() {
    let err = SymphoniaDecoder::new()
        .decode(Path::new("/nonexistent/track.flac"))
        .unwrap_err();
    assert!(matches!(err, MixError::MissingInput(_)));
}
