//! Audio-reactive waveform visuals.

pub mod canvas;
pub mod color;
pub mod controls;
pub mod features;
pub mod history;
pub mod renderer;

// Re-export public types
pub use canvas::{Canvas, PixmapCanvas};
pub use color::{ColorError, ColorScheme, Rgb, COLOR_SCHEMES};
pub use controls::{format_time, ProgressSlider};
pub use features::FrameFeatures;
pub use history::BoundedHistory;
pub use renderer::FrameRenderer;
