//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::RecordingConfig;
use crate::visual::{ColorError, ColorScheme};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavepulse")]
#[command(about = "Audio-reactive waveform visualizer", long_about = None)]
pub struct Args {
    /// Audio file to load on startup
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Render FILE to numbered PNG frames instead of opening a window (duration in seconds)
    #[arg(long, value_name = "SECONDS", requires = "file")]
    pub record: Option<f32>,

    /// Color scheme: sunset, mint, candy, aurora (random per file when omitted)
    #[arg(long, value_name = "NAME")]
    pub scheme: Option<String>,

    /// Seed for scheme choice and particle placement
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Output directory for recordings
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output: PathBuf,
}

impl Args {
    /// Fixed color scheme, if one was requested
    pub fn color_scheme(&self) -> Result<Option<ColorScheme>, ColorError> {
        self.scheme.as_deref().map(ColorScheme::by_name).transpose()
    }

    /// Recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| RecordingConfig {
            output_dir: self.output.clone(),
            ..RecordingConfig::new(duration)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["wavepulse"]);
        assert!(args.file.is_none());
        assert!(args.recording_config().is_none());
        assert_eq!(args.color_scheme().unwrap(), None);
    }

    #[test]
    fn test_recording_args() {
        let args = Args::parse_from([
            "wavepulse",
            "song.mp3",
            "--record",
            "12.5",
            "--output",
            "out",
            "--scheme",
            "candy",
            "--seed",
            "9",
        ]);
        let config = args.recording_config().unwrap();
        assert_eq!(config.duration_secs, 12.5);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.fps, 60);
        assert_eq!(args.color_scheme().unwrap().unwrap().name, "Candy");
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn test_record_requires_file() {
        assert!(Args::try_parse_from(["wavepulse", "--record", "3"]).is_err());
    }

    #[test]
    fn test_unknown_scheme() {
        let args = Args::parse_from(["wavepulse", "--scheme", "plaid"]);
        assert!(args.color_scheme().is_err());
    }
}
