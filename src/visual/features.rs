//! Scalar features derived from a frequency snapshot.

use super::history::BoundedHistory;
use crate::params::VisualParams;

/// Per-frame features driving the waveform effects
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameFeatures {
    /// Mean of the lowest bins, normalized to [0, 1]
    pub bass_energy: f32,

    /// Mean of the bass history including this frame
    pub average_bass: f32,

    /// Amplitude of the breathing sine (pixels)
    pub breathe_amplitude: f32,

    /// Bass energy crossed the hit threshold
    pub is_hit: bool,

    /// Vertical split between upper and mirrored trace (pixels, 0 without a hit)
    pub split_amount: f32,

    /// Mean of all bins, normalized to [0, 1]
    pub spectral_intensity: f32,

    /// Alpha of the edge glow gradients
    pub edge_glow_alpha: f32,
}

impl FrameFeatures {
    /// Derive features and record this frame's bass energy in `bass_history`.
    pub fn derive(
        snapshot: &[u8],
        bass_history: &mut BoundedHistory<f32>,
        params: &VisualParams,
    ) -> Self {
        let bass_energy = bass_energy(snapshot, params.bass_bins);
        bass_history.push(bass_energy);
        let average_bass = bass_history.mean();

        let is_hit = bass_energy > params.hit_threshold;
        let split_amount = if is_hit {
            bass_energy * params.split_scale_px
        } else {
            0.0
        };

        let spectral_intensity = mean_normalized(snapshot);

        Self {
            bass_energy,
            average_bass,
            breathe_amplitude: average_bass * params.breathe_scale_px + params.breathe_base_px,
            is_hit,
            split_amount,
            spectral_intensity,
            edge_glow_alpha: spectral_intensity * params.edge_glow_max_alpha,
        }
    }

    /// Whether the mirrored lower trace is drawn
    pub fn draws_mirror(&self, params: &VisualParams) -> bool {
        self.split_amount > params.mirror_min_split_px
    }

    /// Particles emitted this frame
    pub fn particle_count(&self, params: &VisualParams) -> usize {
        if self.is_hit {
            (self.bass_energy * params.particles_per_bass).floor() as usize
        } else {
            0
        }
    }
}

/// Mean of the lowest `bins` values, normalized to [0, 1]
pub fn bass_energy(snapshot: &[u8], bins: usize) -> f32 {
    mean_normalized(&snapshot[..bins.min(snapshot.len())])
}

fn mean_normalized(values: &[u8]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u32 = values.iter().map(|&v| v as u32).sum();
    sum as f32 / values.len() as f32 / 255.0
}

/// Sample the leading part of the spectrum into trace amplitudes (pixels)
pub fn wave_points(snapshot: &[u8], params: &VisualParams) -> Vec<f32> {
    if snapshot.is_empty() {
        return vec![0.0; params.wave_points];
    }
    let span = snapshot.len() as f32 * params.spectrum_fraction;
    (0..params.wave_points)
        .map(|i| {
            let bin = ((i as f32 / params.wave_points as f32) * span).floor() as usize;
            let value = snapshot[bin.min(snapshot.len() - 1)];
            value as f32 / 255.0 * params.wave_amplitude_px
        })
        .collect()
}

/// Breathing offset of point `index` at wall-clock time `clock_s`
pub fn breathe_offset(index: usize, clock_s: f64, amplitude: f32, params: &VisualParams) -> f32 {
    let phase = index as f64 * params.breathe_phase_step as f64 + clock_s;
    phase.sin() as f32 * amplitude
}
