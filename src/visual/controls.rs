//! Playback position slider drawn over the visualizer.

use super::canvas::Canvas;
use super::color::{ColorScheme, Rgb};

/// Alpha of the unfilled slider track
const TRACK_ALPHA: f32 = 0.1;

/// Format seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Horizontal progress slider occupying a strip along the bottom of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSlider {
    /// Strip height (canvas pixels)
    pub height: f32,
    /// Horizontal inset of the track (canvas pixels)
    pub margin: f32,
}

impl ProgressSlider {
    pub fn new(height: u32) -> Self {
        Self {
            height: height as f32,
            margin: 24.0,
        }
    }

    /// Filled fraction, 0 when the duration is unknown
    pub fn fraction(current_s: f64, duration_s: f64) -> f32 {
        if duration_s > 0.0 && duration_s.is_finite() {
            (current_s / duration_s).clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }

    /// Seek target for a click at canvas coordinates, `None` outside the strip
    pub fn seek_target(
        &self,
        x: f32,
        y: f32,
        canvas_width: f32,
        canvas_height: f32,
        duration_s: f64,
    ) -> Option<f64> {
        if y < canvas_height - self.height || y > canvas_height || duration_s <= 0.0 {
            return None;
        }
        let track = (canvas_width - 2.0 * self.margin).max(1.0);
        let fraction = ((x - self.margin) / track).clamp(0.0, 1.0) as f64;
        Some(fraction * duration_s)
    }

    /// Draw the track and filled portion
    pub fn draw(&self, canvas: &mut dyn Canvas, current_s: f64, duration_s: f64, scheme: &ColorScheme) {
        let width = canvas.width();
        let track_y = canvas.height() - self.height / 2.0;
        let track_len = (width - 2.0 * self.margin).max(0.0);
        let filled = track_len * Self::fraction(current_s, duration_s);

        canvas.stroke_polyline(
            &[(self.margin, track_y), (self.margin + track_len, track_y)],
            Rgb::WHITE,
            TRACK_ALPHA,
            6.0,
        );
        if filled > 0.0 {
            canvas.stroke_polyline(
                &[(self.margin, track_y), (self.margin + filled, track_y)],
                scheme.primary,
                1.0,
                6.0,
            );
        }
        canvas.fill_radial_particle(self.margin + filled, track_y, 8.0, scheme.primary);
    }
}
