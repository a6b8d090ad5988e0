//! Visual effect parameters for the waveform renderer.

use super::ConfigError;

/// Constants driving the audio-reactive waveform.
///
/// Pixel quantities are in canvas pixels at the logical canvas resolution.
#[derive(Debug, Clone)]
pub struct VisualParams {
    /// Lowest frequency bins averaged into bass energy
    pub bass_bins: usize,

    /// Bass energy samples kept for the breathing average (~1s at 60 FPS)
    pub bass_history_len: usize,

    /// Waveform snapshots kept for trailing echoes
    pub wave_history_len: usize,

    /// Bass energy above which a frame counts as a hit (0-1)
    pub hit_threshold: f32,

    /// Breathing amplitude = average bass * scale + base (pixels)
    pub breathe_scale_px: f32,
    pub breathe_base_px: f32,

    /// Per-point phase step of the breathing sine (radians)
    pub breathe_phase_step: f32,

    /// Vertical split between upper and mirrored trace per unit bass (pixels)
    pub split_scale_px: f32,

    /// Minimum split before the mirrored trace is drawn (pixels)
    pub mirror_min_split_px: f32,

    /// Points sampled across the spectrum per trace
    pub wave_points: usize,

    /// Leading fraction of the spectrum the trace samples
    pub spectrum_fraction: f32,

    /// Trace amplitude for a full-scale bin (pixels)
    pub wave_amplitude_px: f32,

    /// Vertical offset between consecutive trail echoes (pixels)
    pub trail_step_px: f32,

    /// Opacity of the newest trail echo
    pub trail_max_opacity: f32,

    /// Alpha of the per-frame black fade
    pub fade_alpha: f32,

    /// Particles per unit bass energy on a hit
    pub particles_per_bass: f32,

    /// Edge glow alpha at full spectral intensity
    pub edge_glow_max_alpha: f32,

    /// Fraction of canvas width covered by each edge glow
    pub edge_glow_width: f32,

    /// Stroke widths (pixels)
    pub trace_width_px: f32,
    pub trail_width_px: f32,

    /// Glow radius around the main traces (pixels)
    pub glow_radius_px: f32,
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            bass_bins: 8,
            bass_history_len: 60,
            wave_history_len: 8,
            hit_threshold: 0.7,
            breathe_scale_px: 30.0,
            breathe_base_px: 20.0,
            breathe_phase_step: 0.05,
            split_scale_px: 120.0,
            mirror_min_split_px: 10.0,
            wave_points: 180,
            spectrum_fraction: 0.4,
            wave_amplitude_px: 150.0,
            trail_step_px: 2.0,
            trail_max_opacity: 0.3,
            fade_alpha: 0.08,
            particles_per_bass: 20.0,
            edge_glow_max_alpha: 0.3,
            edge_glow_width: 0.3,
            trace_width_px: 3.0,
            trail_width_px: 2.0,
            glow_radius_px: 20.0,
        }
    }
}

impl VisualParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bass_bins == 0 || self.wave_points == 0 {
            return Err(ConfigError::Visual("bin and point counts must be > 0"));
        }
        if self.bass_history_len == 0 || self.wave_history_len == 0 {
            return Err(ConfigError::Visual("history lengths must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.spectrum_fraction) {
            return Err(ConfigError::Visual("spectrum fraction must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.hit_threshold) {
            return Err(ConfigError::Visual("hit threshold must be in [0, 1]"));
        }
        Ok(())
    }
}
