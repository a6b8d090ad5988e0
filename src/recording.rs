//! Headless recording: numbered PNG frames plus the matching audio span.
//!
//! Drives the same visualizer as the window with an offline session, so
//! frames line up exactly with the audio written next to them.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::{DecodedTrack, OfflineSession};
use crate::params::{ConfigError, FftConfig, RecordingConfig, RenderConfig, VisualParams};
use crate::visual::{ColorScheme, PixmapCanvas};
use crate::visualizer::{Visualizer, VisualizerError};

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("'{0}' is not an audio file")]
    NotAudio(PathBuf),
    #[error(transparent)]
    Visualizer(#[from] VisualizerError),
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("Failed to save frame '{path}': {source}")]
    Frame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to write audio '{path}': {source}")]
    Audio {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

/// Everything a recording run needs
#[derive(Debug, Clone)]
pub struct RecordingJob {
    pub input: PathBuf,
    pub recording: RecordingConfig,
    pub render: RenderConfig,
    pub visual: VisualParams,
    pub fft: FftConfig,
    pub scheme: Option<ColorScheme>,
    pub seed: Option<u64>,
}

/// What a finished recording produced
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSummary {
    pub frames: usize,
    pub audio_seconds: f64,
    pub scheme: ColorScheme,
}

/// Render `job.input` to frames and audio under the recording output directory
pub fn record(job: &RecordingJob) -> Result<RecordingSummary, RecordingError> {
    job.recording.validate()?;
    job.render.validate()?;
    job.visual.validate()?;
    job.fft.validate()?;

    let frames_dir = job.recording.frames_dir();
    std::fs::create_dir_all(&frames_dir).map_err(|source| RecordingError::CreateDir {
        path: frames_dir.clone(),
        source,
    })?;

    let fft = job.fft.clone();
    let mut vis = Visualizer::new(
        job.visual.clone(),
        Box::new(move || OfflineSession::new(fft.clone())),
    );
    if let Some(seed) = job.seed {
        vis = vis.with_seed(seed);
    }
    if let Some(scheme) = job.scheme {
        vis = vis.with_scheme(scheme);
    }

    if !vis.select_file(&job.input) {
        return Err(RecordingError::NotAudio(job.input.clone()));
    }
    vis.analyze()?;
    vis.toggle_play_pause()?;

    let (width, height) = (job.render.canvas_width, job.render.canvas_height);
    let mut canvas =
        PixmapCanvas::new(width, height).ok_or(RecordingError::Canvas { width, height })?;

    let total = job.recording.total_frames();
    let dt = job.recording.frame_interval_s();
    log::info!(
        "Recording {} frames at {} FPS to {}",
        total,
        job.recording.fps,
        job.recording.output_dir.display()
    );

    let mut frames = 0;
    for frame_num in 0..total {
        let clock_s = frame_num as f64 * dt;
        if vis.frame(Some(&mut canvas), clock_s).is_none() && !vis.is_playing() {
            log::info!("Track ended after {} frames", frames);
            break;
        }
        save_frame(&canvas, &job.recording.frame_path(frame_num))?;
        frames += 1;

        if let Some(session) = vis.session_mut() {
            session.advance(dt);
        }

        if frame_num % job.recording.fps as usize == 0 {
            log::debug!("Recorded frame {}/{}", frame_num, total);
        }
    }

    let audio_seconds = frames as f64 * dt;
    if let Some(track) = vis.session().and_then(|s| s.transport().track()) {
        write_audio_span(track, audio_seconds, &job.recording.audio_path())?;
    }

    let scheme = vis.scheme();
    vis.teardown();

    log::info!(
        "Recording complete: {} frames, {:.2}s of audio",
        frames,
        audio_seconds
    );
    Ok(RecordingSummary {
        frames,
        audio_seconds,
        scheme,
    })
}

fn save_frame(canvas: &PixmapCanvas, path: &Path) -> Result<(), RecordingError> {
    image::save_buffer(
        path,
        canvas.data(),
        canvas.pixel_width(),
        canvas.pixel_height(),
        image::ColorType::Rgba8,
    )
    .map_err(|source| RecordingError::Frame {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the first `seconds` of the track as 32-bit float WAV
fn write_audio_span(
    track: &DecodedTrack,
    seconds: f64,
    path: &Path,
) -> Result<(), RecordingError> {
    let wav_error = |source| RecordingError::Audio {
        path: path.to_path_buf(),
        source,
    };

    let spec = hound::WavSpec {
        channels: track.channels as u16,
        sample_rate: track.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let frames = ((seconds * track.sample_rate as f64).round() as usize).min(track.frames());

    let mut writer = hound::WavWriter::create(path, spec).map_err(wav_error)?;
    for &sample in &track.samples[..frames * track.channels] {
        writer.write_sample(sample).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decoding::tests::write_sine_wav;

    fn job(dir: &Path, input: PathBuf, seconds: f32) -> RecordingJob {
        let mut recording = RecordingConfig::new(seconds);
        recording.output_dir = dir.join("out");
        recording.fps = 10;
        RecordingJob {
            input,
            recording,
            render: RenderConfig {
                canvas_width: 140,
                canvas_height: 60,
                slider_height: 6,
                ..RenderConfig::default()
            },
            visual: VisualParams::default(),
            fft: FftConfig::default(),
            scheme: ColorScheme::by_name("Mint").ok(),
            seed: Some(1),
        }
    }

    #[test]
    fn test_records_frames_and_audio() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tone.wav");
        write_sine_wav(&input, 8000, 2, 1.0, 110.0, 0.8);

        let job = job(dir.path(), input, 0.5);
        let summary = record(&job).unwrap();
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.scheme.name, "Mint");
        assert!(job.recording.frame_path(0).exists());
        assert!(job.recording.frame_path(4).exists());
        assert!(!job.recording.frame_path(5).exists());

        let frame = image::open(job.recording.frame_path(4)).unwrap();
        assert_eq!((frame.width(), frame.height()), (140, 60));

        let reader = hound::WavReader::open(job.recording.audio_path()).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.duration(), 4000);
    }

    #[test]
    fn test_stops_at_end_of_track() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("short.wav");
        write_sine_wav(&input, 8000, 1, 0.3, 110.0, 0.8);

        let job = job(dir.path(), input, 2.0);
        let summary = record(&job).unwrap();
        assert_eq!(summary.frames, 3);
        assert!((summary.audio_seconds - 0.3).abs() < 1e-9);

        let reader = hound::WavReader::open(job.recording.audio_path()).unwrap();
        assert_eq!(reader.duration(), 2400);
    }

    #[test]
    fn test_rejects_non_audio_input() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), dir.path().join("cover.png"), 1.0);
        assert!(matches!(record(&job), Err(RecordingError::NotAudio(_))));
    }

    #[test]
    fn test_rejects_invalid_duration() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), dir.path().join("a.wav"), 0.0);
        assert!(matches!(record(&job), Err(RecordingError::Config(_))));
    }
}
