/// Configuration layering and command-line parsing tests
use clap::Parser;
use segue_cli::config::{CurveName, SegueConfig, StrategyName};
use segue_cli::{Cli, CliError};
use segue_core::TransitionStrategy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    )
}

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("segue.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_defaults() {
    let config = SegueConfig::load_with_env(None, env(&[])).unwrap();

    assert_eq!(config.mix.strategy, StrategyName::QuietPoint);
    assert_eq!(config.mix.fade_seconds, 5.0);
    assert_eq!(config.mix.curve, CurveName::Linear);
    assert_eq!(config.mix.quiet_window_seconds, 2.0);
    assert_eq!(config.mix.peak_window_seconds, 0.1);
    assert_eq!(config.mix.peak_threshold, 0.7);
    assert_eq!(config.output.bitrate_kbps, 320);
    assert_eq!(config.transcoding.ffmpeg_path, Path::new("ffmpeg"));
    assert_eq!(config.transcoding.timeout_seconds, 300);
    assert!(config.validate().is_ok());
}

#[test]
fn test_file_values() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[mix]
strategy = "peak-match"
curve = "equal-power"
peak_threshold = 0.5

[output]
bitrate_kbps = 192

[transcoding]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
"#,
    );

    let config = SegueConfig::load_with_env(Some(&path), env(&[])).unwrap();

    assert_eq!(config.mix.strategy, StrategyName::PeakMatch);
    assert_eq!(config.mix.curve, CurveName::EqualPower);
    assert_eq!(config.mix.peak_threshold, 0.5);
    // Unset keys keep their defaults
    assert_eq!(config.mix.fade_seconds, 5.0);
    assert_eq!(config.output.bitrate_kbps, 192);
    assert_eq!(
        config.transcoding.ffmpeg_path,
        Path::new("/opt/ffmpeg/bin/ffmpeg")
    );
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[mix]\nfade_seconds = 3.0\nstrategy = \"tail-head\"\n");

    let config = SegueConfig::load_with_env(
        Some(&path),
        env(&[
            ("SEGUE_MIX__FADE_SECONDS", "4.5"),
            ("SEGUE_OUTPUT__BITRATE_KBPS", "128"),
        ]),
    )
    .unwrap();

    assert_eq!(config.mix.fade_seconds, 4.5);
    assert_eq!(config.mix.strategy, StrategyName::TailHead);
    assert_eq!(config.output.bitrate_kbps, 128);
}

#[test]
fn test_missing_explicit_config_file() {
    let err = SegueConfig::load_with_env(Some(Path::new("/nonexistent/segue.toml")), env(&[]))
        .unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn test_unknown_strategy_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[mix]\nstrategy = \"loudest\"\n");

    let err = SegueConfig::load_with_env(Some(&path), env(&[])).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn test_validation() {
    let mut config = SegueConfig::default();
    config.mix.fade_seconds = 0.0;
    assert!(config.validate().is_err());

    let mut config = SegueConfig::default();
    config.mix.peak_threshold = 1.0;
    assert!(config.validate().is_err());

    let mut config = SegueConfig::default();
    config.mix.quiet_window_seconds = f64::NAN;
    assert!(config.validate().is_err());

    let mut config = SegueConfig::default();
    config.output.bitrate_kbps = 0;
    assert!(config.validate().is_err());

    let mut config = SegueConfig::default();
    config.transcoding.timeout_seconds = 0;
    assert!(config.validate().is_err());

    let mut config = SegueConfig::default();
    config.mix.peak_threshold = 0.0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_strategy_mapping() {
    let mut config = SegueConfig::default();
    config.mix.fade_seconds = 3.0;

    config.mix.strategy = StrategyName::QuietPoint;
    assert_eq!(
        config.strategy(),
        TransitionStrategy::QuietPoint {
            window_seconds: 2.0
        }
    );

    config.mix.strategy = StrategyName::PeakMatch;
    assert_eq!(
        config.strategy(),
        TransitionStrategy::PeakMatch {
            window_seconds: 0.1,
            threshold: 0.7
        }
    );

    // The tail overlap follows the fade length
    config.mix.strategy = StrategyName::TailHead;
    assert_eq!(
        config.strategy(),
        TransitionStrategy::TailHead {
            overlap_seconds: 3.0
        }
    );

    let pipeline = config.pipeline_config().unwrap();
    assert_eq!(pipeline.crossfade.duration_seconds(), 3.0);
    assert_eq!(pipeline.bitrate_kbps, 320);
}

#[test]
fn test_cli_parsing() {
    let cli = Cli::try_parse_from([
        "segue",
        "a.mp3",
        "b.flac",
        "out.mp3",
        "--strategy",
        "peak-match",
        "--fade",
        "2.5",
        "--curve",
        "s-curve",
        "--bitrate",
        "256",
        "--json",
    ])
    .unwrap();

    assert_eq!(cli.input_a, Path::new("a.mp3"));
    assert_eq!(cli.input_b, Path::new("b.flac"));
    assert_eq!(cli.output, Path::new("out.mp3"));
    assert_eq!(cli.strategy, Some(StrategyName::PeakMatch));
    assert_eq!(cli.fade, Some(2.5));
    assert_eq!(cli.curve, Some(CurveName::SCurve));
    assert_eq!(cli.bitrate, Some(256));
    assert!(cli.json);
}

#[test]
fn test_cli_requires_three_paths() {
    assert!(Cli::try_parse_from(["segue", "a.mp3", "b.mp3"]).is_err());
    assert!(Cli::try_parse_from(["segue", "a.mp3", "b.mp3", "out.mp3", "--strategy", "loudest"]).is_err());
}

#[test]
fn test_flags_override_config() {
    let mut config = SegueConfig::default();
    config.mix.curve = CurveName::EqualPower;

    let cli = Cli::try_parse_from([
        "segue",
        "a.wav",
        "b.wav",
        "out.wav",
        "-s",
        "tail-head",
        "-f",
        "1.5",
    ])
    .unwrap();
    cli.apply_to(&mut config);

    assert_eq!(config.mix.strategy, StrategyName::TailHead);
    assert_eq!(config.mix.fade_seconds, 1.5);
    // Flags that were not given leave the config alone
    assert_eq!(config.mix.curve, CurveName::EqualPower);
    assert_eq!(config.output.bitrate_kbps, 320);
}
