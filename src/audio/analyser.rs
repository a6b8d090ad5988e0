//! Frequency analyser producing byte spectra.
//!
//! Each snapshot windows the latest `fft_size` samples with a Blackman
//! window, takes magnitudes normalized by the FFT size, blends them with the
//! previous snapshot and maps decibels in `[min_db, max_db]` onto 0..=255.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::params::{ConfigError, FftConfig};

/// Stateful analyser (smoothing carries over between snapshots)
pub struct Analyser {
    config: FftConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl Analyser {
    pub fn new(config: FftConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| blackman_window(i, config.fft_size))
            .collect();
        Ok(Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            smoothed: vec![0.0; config.bin_count()],
            config,
        })
    }

    pub fn config(&self) -> &FftConfig {
        &self.config
    }

    /// Bins per snapshot
    pub fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    /// Forget smoothing state
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }

    /// Analyse the most recent `fft_size` samples of `samples` into `out`.
    ///
    /// Shorter input is zero-padded at the front. Only the first
    /// `min(out.len(), bin_count)` entries of `out` are written.
    pub fn byte_frequency_data(&mut self, samples: &[f32], out: &mut [u8]) {
        let n = self.config.fft_size;
        let recent = &samples[samples.len().saturating_sub(n)..];
        let pad = n - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let tau = self.config.smoothing;
        let scale = 1.0 / n as f32;
        let db_range = self.config.max_db - self.config.min_db;

        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
        }

        for (byte, &value) in out.iter_mut().zip(self.smoothed.iter()) {
            *byte = to_byte(value, self.config.min_db, db_range);
        }
    }
}

fn to_byte(magnitude: f32, min_db: f32, db_range: f32) -> u8 {
    if magnitude <= 0.0 || !magnitude.is_finite() {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = 255.0 * (db - min_db) / db_range;
    scaled.floor().clamp(0.0, 255.0) as u8
}

/// Blackman window (alpha = 0.16)
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f32 / size as f32;
    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f32, sample_rate: f32, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate).sin() * amplitude)
            .collect()
    }

    fn unsmoothed() -> FftConfig {
        FftConfig {
            smoothing: 0.0,
            ..FftConfig::default()
        }
    }

    #[test]
    fn test_silence_is_zero() {
        let mut analyser = Analyser::new(FftConfig::default()).unwrap();
        let mut out = vec![7u8; analyser.bin_count()];
        analyser.byte_frequency_data(&[0.0; 4096], &mut out);
        assert!(out.iter().all(|&b| b == 0));

        // Empty input is zero-padded
        analyser.byte_frequency_data(&[], &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        let mut analyser = Analyser::new(unsmoothed()).unwrap();
        let bin = 64;
        let freq = bin as f32 * 44100.0 / 2048.0;
        let signal = sine(freq, 44100.0, 0.001, 2048);

        let mut out = vec![0u8; analyser.bin_count()];
        analyser.byte_frequency_data(&signal, &mut out);

        let (peak_bin, &peak) = out.iter().enumerate().max_by_key(|(_, &v)| v).unwrap();
        assert_eq!(peak_bin, bin);
        assert!(peak > 0 && peak < 255, "peak byte {peak} should not clip");
        assert_eq!(out[bin * 4], 0);
    }

    #[test]
    fn test_smoothing_rises_gradually() {
        let mut analyser = Analyser::new(FftConfig::default()).unwrap();
        let signal = sine(1000.0, 44100.0, 0.001, 2048);
        let mut out = vec![0u8; analyser.bin_count()];

        analyser.byte_frequency_data(&signal, &mut out);
        let first = *out.iter().max().unwrap();
        for _ in 0..30 {
            analyser.byte_frequency_data(&signal, &mut out);
        }
        let settled = *out.iter().max().unwrap();
        assert!(settled > first);

        analyser.reset();
        analyser.byte_frequency_data(&signal, &mut out);
        assert_eq!(*out.iter().max().unwrap(), first);
    }

    #[test]
    fn test_blackman_window_shape() {
        assert!(blackman_window(0, 1024).abs() < 1e-6);
        assert!((blackman_window(512, 1024) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = FftConfig {
            fft_size: 1000,
            ..FftConfig::default()
        };
        assert!(Analyser::new(config).is_err());
    }
}
