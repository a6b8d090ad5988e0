//! Rendering and recording configuration.

use std::path::PathBuf;

use super::ConfigError;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Logical canvas width the visuals are drawn at (pixels)
    pub canvas_width: u32,

    /// Logical canvas height the visuals are drawn at (pixels)
    pub canvas_height: u32,

    /// Initial window width (pixels)
    pub window_width: u32,

    /// Initial window height (pixels)
    pub window_height: u32,

    /// Height of the progress slider strip along the bottom edge (canvas pixels)
    pub slider_height: u32,

    /// Seek step for arrow keys (seconds)
    pub seek_step_s: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1400,
            canvas_height: 600,
            window_width: 1400,
            window_height: 600,
            slider_height: 28,
            seek_step_s: 5.0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::CanvasSize {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.slider_height >= self.canvas_height {
            return Err(ConfigError::CanvasSize {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Seconds between frames
    pub fn frame_interval_s(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of a single numbered frame
    pub fn frame_path(&self, frame_num: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{:05}.png", frame_num))
    }

    /// Audio file path
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join("audio.wav")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration_secs > 0.0) || self.fps == 0 {
            return Err(ConfigError::Recording {
                duration_secs: self.duration_secs,
                fps: self.fps,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_count() {
        let config = RecordingConfig::new(2.5);
        assert_eq!(config.total_frames(), 150);
        assert_eq!(
            config.frame_path(7),
            PathBuf::from("recording/frames/frame_00007.png")
        );
    }

    #[test]
    fn test_recording_rejects_zero_duration() {
        assert!(RecordingConfig::new(0.0).validate().is_err());
        assert!(RecordingConfig::new(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_slider_must_fit_canvas() {
        let mut config = RenderConfig::default();
        assert!(config.validate().is_ok());
        config.slider_height = config.canvas_height;
        assert!(config.validate().is_err());
    }
}
