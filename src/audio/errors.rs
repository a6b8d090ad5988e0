use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

use crate::params::ConfigError;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to open file '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unrecognized audio format in '{path}': {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },
    #[error("No decodable audio track in '{path}'")]
    NoSuitableTrack { path: PathBuf },
    #[error("Sample rate missing in '{path}'")]
    MissingSampleRate { path: PathBuf },
    #[error("Failed to create decoder for '{path}': {source}")]
    DecoderCreation {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },
    #[error("Fatal decode error in '{path}': {source}")]
    FatalDecode {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },
    #[error("No samples decoded from '{path}'")]
    NoSamplesDecoded { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid analyser configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("No audio output device found")]
    NoOutputDevice,
    #[error("Failed to query output device configuration: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("Failed to build audio output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("Failed to start audio output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("Audio session has been closed")]
    Closed,
    #[error("No track loaded")]
    NoTrack,
}
