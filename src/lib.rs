//! wavepulse library - audio-reactive waveform visualizer

pub mod audio;
pub mod cli;
pub mod params;
pub mod recording;
pub mod rendering;
pub mod scheduler;
pub mod visual;
pub mod visualizer;
