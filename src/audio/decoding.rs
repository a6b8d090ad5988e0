//! File decoding into interleaved and mono `f32` samples.

use std::fs::File;
use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer,
    codecs::{DecoderOptions, CODEC_TYPE_NULL},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

use super::errors::DecodeError;

/// A fully decoded audio file
#[derive(Debug, Clone)]
pub struct DecodedTrack {
    /// Display name (file name)
    pub name: String,
    pub sample_rate: u32,
    pub channels: usize,
    /// Interleaved samples, `channels` per frame
    pub samples: Vec<f32>,
    /// Per-frame channel average, used for analysis
    pub mono: Vec<f32>,
}

impl DecodedTrack {
    /// Build from interleaved samples
    pub fn from_interleaved(name: impl Into<String>, sample_rate: u32, channels: usize, samples: Vec<f32>) -> Self {
        let channels = channels.max(1);
        let mono = if channels == 1 {
            samples.clone()
        } else {
            samples
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };
        Self {
            name: name.into(),
            sample_rate,
            channels,
            samples,
            mono,
        }
    }

    pub fn frames(&self) -> usize {
        self.mono.len()
    }

    pub fn duration_s(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Mono downmix at fractional frame position (linear interpolation)
    pub fn mono_at(&self, frame: f64) -> f32 {
        let frames = self.mono.len();
        if frames == 0 || frame < 0.0 {
            return 0.0;
        }
        let index = frame.floor() as usize;
        if index >= frames {
            return 0.0;
        }
        let next = (index + 1).min(frames - 1);
        let t = (frame - index as f64) as f32;
        let a = self.mono[index];
        a + (self.mono[next] - a) * t
    }

    /// Sample of `channel` at fractional frame position (linear interpolation)
    pub fn sample_at(&self, frame: f64, channel: usize) -> f32 {
        let frames = self.frames();
        if frames == 0 || frame < 0.0 {
            return 0.0;
        }
        let channel = channel.min(self.channels - 1);
        let index = frame.floor() as usize;
        if index >= frames {
            return 0.0;
        }
        let next = (index + 1).min(frames - 1);
        let t = (frame - index as f64) as f32;
        let a = self.samples[index * self.channels + channel];
        let b = self.samples[next * self.channels + channel];
        a + (b - a) * t
    }
}

/// Decode a whole file
pub fn decode_file(path: &Path) -> Result<DecodedTrack, DecodeError> {
    let file = File::open(path).map_err(|e| DecodeError::FileOpen {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::Format {
            path: path.to_path_buf(),
            source: e,
        })?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::NoSuitableTrack {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::MissingSampleRate {
            path: path.to_path_buf(),
        })?;
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::DecoderCreation {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                log::debug!("Reached end of '{}'", path.display());
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                log::warn!("Decoder reset required for '{}', stopping early", path.display());
                break;
            }
            Err(e) => {
                return Err(DecodeError::FatalDecode {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(audio_buf.capacity() as u64, *audio_buf.spec())
                });
                channels = audio_buf.spec().channels.count();
                buf.copy_interleaved_ref(audio_buf);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(err)) => {
                log::warn!("Skipping undecodable packet in '{}': {}", path.display(), err);
            }
            Err(e) => {
                return Err(DecodeError::FatalDecode {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    }

    if samples.is_empty() || channels == 0 {
        return Err(DecodeError::NoSamplesDecoded {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let track = DecodedTrack::from_interleaved(name, sample_rate, channels, samples);
    log::debug!(
        "Decoded '{}': {} frames x {} channels at {} Hz ({:.1}s)",
        path.display(),
        track.frames(),
        track.channels,
        track.sample_rate,
        track.duration_s()
    );
    Ok(track)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Write a 16-bit sine WAV for tests
    pub(crate) fn write_sine_wav(
        path: &Path,
        sample_rate: u32,
        channels: u16,
        seconds: f32,
        freq_hz: f32,
        amplitude: f32,
    ) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let frames = (sample_rate as f32 * seconds) as usize;
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let value = (2.0 * std::f32::consts::PI * freq_hz * t).sin() * amplitude;
            for _ in 0..channels {
                writer.write_sample((value * i16::MAX as f32) as i16).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_stereo_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_sine_wav(&path, 22050, 2, 0.5, 440.0, 0.5);

        let track = decode_file(&path).unwrap();
        assert_eq!(track.name, "tone.wav");
        assert_eq!(track.sample_rate, 22050);
        assert_eq!(track.channels, 2);
        assert_eq!(track.frames(), 11025);
        assert_eq!(track.samples.len(), 2 * 11025);
        assert!((track.duration_s() - 0.5).abs() < 1e-6);
        let peak = track.mono.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!((peak - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_missing_file() {
        let err = decode_file(&PathBuf::from("/definitely/not/here.wav")).unwrap_err();
        assert!(matches!(err, DecodeError::FileOpen { .. }));
    }

    #[test]
    fn test_garbage_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.mp3");
        std::fs::write(&path, b"this is not audio at all").unwrap();
        assert!(decode_file(&path).is_err());
    }

    #[test]
    fn test_mono_mixdown_and_interpolation() {
        let track = DecodedTrack::from_interleaved("t", 4, 2, vec![0.0, 1.0, 1.0, 0.0, 0.5, 0.5]);
        assert_eq!(track.mono, vec![0.5, 0.5, 0.5]);
        assert_eq!(track.sample_at(0.5, 0), 0.5);
        assert_eq!(track.sample_at(0.5, 1), 0.5);
        assert_eq!(track.sample_at(2.0, 5), 0.5);
        assert_eq!(track.sample_at(3.0, 0), 0.0);
        assert_eq!(track.duration_s(), 0.75);
    }
}
