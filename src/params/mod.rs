//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, seconds, dB, etc.)
//! - Documented ranges and meanings
//! - Validation where a bad value would break analysis or rendering

mod audio;
mod render;
mod visual;

use thiserror::Error;

// Re-export all types
pub use audio::FftConfig;
pub use render::{RecordingConfig, RenderConfig};
pub use visual::VisualParams;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("FFT size must be a power of 2 in 32..=32768, got {0}")]
    FftSize(usize),
    #[error("Smoothing must be in [0, 1), got {0}")]
    Smoothing(f32),
    #[error("Decibel range is empty: min {min} dB >= max {max} dB")]
    DecibelRange { min: f32, max: f32 },
    #[error("Analysis tap ({capacity} samples) cannot hold an FFT window of {fft_size}")]
    TapCapacity { capacity: usize, fft_size: usize },
    #[error("Invalid canvas size {width}x{height}")]
    CanvasSize { width: u32, height: u32 },
    #[error("Invalid recording: {duration_secs}s at {fps} FPS")]
    Recording { duration_secs: f32, fps: u32 },
    #[error("Invalid visual parameters: {0}")]
    Visual(&'static str),
}
