//! Audio analysis sessions: playback transport plus frequency analysis.

use std::sync::Arc;

use super::analyser::Analyser;
use super::decoding::DecodedTrack;
use super::errors::SessionError;
use crate::params::FftConfig;
use crate::visual::BoundedHistory;

/// Playback and analysis for one loaded track at a time.
///
/// A session is opened once per visualizer and reused across files; it must
/// be closed when the owning view goes away.
pub trait AudioSession {
    /// Replace the current track; playback stops at position 0.
    fn load(&mut self, track: Arc<DecodedTrack>) -> Result<(), SessionError>;

    /// Start or resume. Playing an ended track restarts it.
    fn play(&mut self) -> Result<(), SessionError>;

    fn pause(&mut self);

    /// Jump to `seconds`, clamped to the track
    fn seek(&mut self, seconds: f64);

    fn position_s(&self) -> f64;

    fn duration_s(&self) -> f64;

    fn is_playing(&self) -> bool;

    /// Playback ran off the end of the track
    fn is_ended(&self) -> bool;

    /// Bins per frequency snapshot
    fn bin_count(&self) -> usize;

    /// Fill `out` with the current byte spectrum
    fn frequency_data(&mut self, out: &mut [u8]);

    /// Release the output; further `load`/`play` calls fail with `Closed`.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Playback cursor over a decoded track, shared with the output callback
#[derive(Debug, Default)]
pub struct Transport {
    track: Option<Arc<DecodedTrack>>,
    /// Position in source frames (fractional when resampling)
    cursor: f64,
    playing: bool,
    ended: bool,
}

impl Transport {
    pub fn load(&mut self, track: Arc<DecodedTrack>) {
        self.track = Some(track);
        self.cursor = 0.0;
        self.playing = false;
        self.ended = false;
    }

    pub fn unload(&mut self) {
        self.track = None;
        self.cursor = 0.0;
        self.playing = false;
        self.ended = false;
    }

    pub fn track(&self) -> Option<&Arc<DecodedTrack>> {
        self.track.as_ref()
    }

    pub fn play(&mut self) -> Result<(), SessionError> {
        if self.track.is_none() {
            return Err(SessionError::NoTrack);
        }
        if self.ended {
            self.cursor = 0.0;
            self.ended = false;
        }
        self.playing = true;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn seek(&mut self, seconds: f64) {
        let Some(track) = &self.track else {
            return;
        };
        let frames = track.frames() as f64;
        let target = if seconds.is_finite() {
            seconds.max(0.0) * track.sample_rate as f64
        } else {
            0.0
        };
        self.cursor = target.min(frames);
        self.ended = false;
    }

    pub fn position_s(&self) -> f64 {
        match &self.track {
            Some(track) if track.sample_rate > 0 => self.cursor / track.sample_rate as f64,
            _ => 0.0,
        }
    }

    pub fn duration_s(&self) -> f64 {
        self.track.as_ref().map_or(0.0, |t| t.duration_s())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Mono samples of the `len` frames ending at the cursor
    pub fn recent_mono(&self, len: usize) -> &[f32] {
        let Some(track) = &self.track else {
            return &[];
        };
        let end = (self.cursor.floor() as usize).min(track.frames());
        &track.mono[end.saturating_sub(len)..end]
    }

    /// Advance by `seconds` of wall time without producing output
    pub fn advance(&mut self, seconds: f64) {
        if !self.playing {
            return;
        }
        let Some(track) = &self.track else {
            return;
        };
        self.cursor += seconds * track.sample_rate as f64;
        self.finish_if_past_end();
    }

    /// Fill an interleaved output buffer at `out_rate`, advancing the cursor
    /// and tapping the played mono signal for analysis.
    pub fn render(
        &mut self,
        out: &mut [f32],
        out_channels: usize,
        out_rate: u32,
        tap: &mut BoundedHistory<f32>,
    ) {
        let out_channels = out_channels.max(1);
        let track = match &self.track {
            Some(track) if self.playing && out_rate > 0 => Arc::clone(track),
            _ => {
                out.fill(0.0);
                return;
            }
        };
        let step = track.sample_rate as f64 / out_rate as f64;
        let frames = track.frames() as f64;

        for frame in out.chunks_mut(out_channels) {
            if !self.playing || self.cursor >= frames {
                frame.fill(0.0);
                continue;
            }
            let mono = track.mono_at(self.cursor);
            if out_channels < track.channels || track.channels == 1 {
                frame.fill(mono);
            } else {
                // Source channels map one to one; extra outputs stay silent
                for (c, sample) in frame.iter_mut().enumerate() {
                    *sample = if c < track.channels {
                        track.sample_at(self.cursor, c)
                    } else {
                        0.0
                    };
                }
            }
            tap.push(mono);
            self.cursor += step;
            self.finish_if_past_end();
        }
    }

    fn finish_if_past_end(&mut self) {
        let Some(track) = &self.track else {
            return;
        };
        let frames = track.frames() as f64;
        if self.cursor >= frames {
            self.cursor = frames;
            self.playing = false;
            self.ended = true;
        }
    }
}

/// Deterministic session without an output device.
///
/// Time only moves through [`OfflineSession::advance`]; the analyser reads the
/// samples just before the cursor. Used for frame export and tests.
pub struct OfflineSession {
    transport: Transport,
    analyser: Analyser,
    closed: bool,
}

impl OfflineSession {
    pub fn new(config: FftConfig) -> Result<Self, SessionError> {
        Ok(Self {
            transport: Transport::default(),
            analyser: Analyser::new(config)?,
            closed: false,
        })
    }

    /// Move playback forward by `seconds`
    pub fn advance(&mut self, seconds: f64) {
        self.transport.advance(seconds);
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

impl AudioSession for OfflineSession {
    fn load(&mut self, track: Arc<DecodedTrack>) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.transport.load(track);
        self.analyser.reset();
        Ok(())
    }

    fn play(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.transport.play()
    }

    fn pause(&mut self) {
        self.transport.pause();
    }

    fn seek(&mut self, seconds: f64) {
        self.transport.seek(seconds);
    }

    fn position_s(&self) -> f64 {
        self.transport.position_s()
    }

    fn duration_s(&self) -> f64 {
        self.transport.duration_s()
    }

    fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    fn is_ended(&self) -> bool {
        self.transport.is_ended()
    }

    fn bin_count(&self) -> usize {
        self.analyser.bin_count()
    }

    fn frequency_data(&mut self, out: &mut [u8]) {
        let window = self.transport.recent_mono(self.analyser.config().fft_size);
        self.analyser.byte_frequency_data(window, out);
    }

    fn close(&mut self) {
        self.transport.unload();
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
