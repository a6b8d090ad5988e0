//! Audio analysis configuration.

use super::ConfigError;

/// Frequency analyser configuration.
///
/// Defaults match the analyser the visuals were tuned against: a 2048-point
/// FFT with heavy temporal smoothing and a -100..-30 dB byte range.
#[derive(Debug, Clone)]
pub struct FftConfig {
    /// FFT window size in samples (power of 2, 32..=32768)
    pub fft_size: usize,

    /// Temporal smoothing between snapshots (0 = none, must be < 1)
    pub smoothing: f32,

    /// Magnitude (dB) mapped to byte 0
    pub min_db: f32,

    /// Magnitude (dB) mapped to byte 255
    pub max_db: f32,

    /// Samples of played audio kept for analysis (frames, mono)
    /// Must hold at least one full FFT window.
    pub tap_capacity: usize,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing: 0.85,
            min_db: -100.0,
            max_db: -30.0,
            tap_capacity: 8192,
        }
    }
}

impl FftConfig {
    /// Number of frequency bins in a snapshot
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        if self.min_db >= self.max_db {
            return Err(ConfigError::DecibelRange {
                min: self.min_db,
                max: self.max_db,
            });
        }
        if self.tap_capacity < self.fft_size {
            return Err(ConfigError::TapCapacity {
                capacity: self.tap_capacity,
                fft_size: self.fft_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FftConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bin_count(), 1024);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = FftConfig::default();
        config.fft_size = 1000;
        assert!(matches!(config.validate(), Err(ConfigError::FftSize(1000))));

        let mut config = FftConfig::default();
        config.smoothing = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Smoothing(_))));

        let mut config = FftConfig::default();
        config.min_db = -20.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DecibelRange { .. })
        ));

        let mut config = FftConfig::default();
        config.tap_capacity = 512;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TapCapacity { .. })
        ));
    }
}
