//! End-to-end: decode a generated file, play it through an offline session and
//! render frames into a pixmap.

use std::path::Path;

use wavepulse::audio::{AudioSession, OfflineSession};
use wavepulse::params::{FftConfig, VisualParams};
use wavepulse::visual::{BoundedHistory, PixmapCanvas};
use wavepulse::visualizer::Visualizer;

fn write_tone(path: &Path, freq_hz: f32, seconds: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (44100.0 * seconds) as usize;
    for i in 0..frames {
        let t = i as f32 / 44100.0;
        let value = (2.0 * std::f32::consts::PI * freq_hz * t).sin() * 0.9;
        writer.write_sample((value * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn visualizer() -> Visualizer<OfflineSession> {
    Visualizer::new(
        VisualParams::default(),
        Box::new(|| OfflineSession::new(FftConfig::default())),
    )
    .with_seed(42)
}

/// Play `path` for `frames` frames at 60 FPS, returning the mean bass energy
fn mean_bass(path: &Path, frames: usize) -> f32 {
    let mut vis = visualizer();
    let mut canvas = PixmapCanvas::new(1400, 600).unwrap();
    let mut bass = BoundedHistory::new(frames);

    assert!(vis.select_file(path));
    vis.analyze().unwrap();
    vis.toggle_play_pause().unwrap();
    for i in 0..frames {
        vis.session_mut().unwrap().advance(1.0 / 60.0);
        let features = vis.frame(Some(&mut canvas), i as f64 / 60.0).unwrap();
        assert!((0.0..=1.0).contains(&features.bass_energy));
        bass.push(features.bass_energy);
    }
    bass.mean()
}

#[test]
fn low_tone_drives_more_bass_than_high_tone() {
    let dir = tempfile::tempdir().unwrap();
    let low = dir.path().join("low.wav");
    let high = dir.path().join("high.wav");
    write_tone(&low, 60.0, 1.0);
    write_tone(&high, 5000.0, 1.0);

    let low_bass = mean_bass(&low, 30);
    let high_bass = mean_bass(&high, 30);
    assert!(low_bass > 0.1, "low tone bass {low_bass}");
    assert!(low_bass > high_bass * 2.0);
}

#[test]
fn playback_draws_and_stops_at_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_tone(&path, 220.0, 0.5);

    let mut vis = visualizer();
    let mut canvas = PixmapCanvas::new(1400, 600).unwrap();
    assert!(vis.select_file(&path));
    vis.analyze().unwrap();
    assert!((vis.duration_s() - 0.5).abs() < 1e-6);
    vis.toggle_play_pause().unwrap();

    let mut rendered = 0;
    for i in 0..120 {
        if vis.frame(Some(&mut canvas), i as f64 / 60.0).is_none() {
            break;
        }
        rendered += 1;
        vis.session_mut().unwrap().advance(1.0 / 60.0);
    }

    // 0.5 s at 60 FPS, plus the frame at time zero
    assert!((30..=31).contains(&rendered), "rendered {rendered} frames");
    assert!(!vis.is_playing());
    assert_eq!(vis.current_time_s(), 0.0);
    assert!(!vis.scheduler().is_pending());
    assert!(vis.renderer().wave_history().len() <= 8);
    assert!(canvas.data().chunks(4).any(|px| px[..3].iter().any(|&c| c > 0)));

    vis.teardown();
    assert!(vis.session().unwrap().is_closed());
}
