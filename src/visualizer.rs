//! Visualizer view state: file selection, analysis, transport and the
//! per-refresh frame loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::audio::{decode_file, is_audio, AudioSession, DecodeError, SessionError};
use crate::params::VisualParams;
use crate::scheduler::FrameScheduler;
use crate::visual::{format_time, Canvas, ColorScheme, FrameFeatures, FrameRenderer};

#[derive(Error, Debug)]
pub enum VisualizerError {
    #[error("No audio file selected")]
    NoFile,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Audio session unavailable: {0}")]
    Session(#[from] SessionError),
}

/// Opens the audio session on first analysis
pub type SessionOpener<S> = Box<dyn FnMut() -> Result<S, SessionError>>;

/// A file the user picked
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

/// State of the visualizer view
pub struct Visualizer<S: AudioSession> {
    open_session: SessionOpener<S>,
    session: Option<S>,
    renderer: FrameRenderer,
    scheduler: FrameScheduler,
    snapshot: Vec<u8>,

    file: Option<SelectedFile>,
    analyzed: bool,
    playing: bool,
    duration_s: f64,
    current_time_s: f64,

    rng: StdRng,
    fixed_scheme: Option<ColorScheme>,
    last_error: Option<String>,
    torn_down: bool,
}

impl<S: AudioSession> Visualizer<S> {
    pub fn new(params: VisualParams, open_session: SessionOpener<S>) -> Self {
        Self {
            open_session,
            session: None,
            renderer: FrameRenderer::new(params, ColorScheme::default()),
            scheduler: FrameScheduler::new(),
            snapshot: Vec::new(),
            file: None,
            analyzed: false,
            playing: false,
            duration_s: 0.0,
            current_time_s: 0.0,
            rng: StdRng::from_entropy(),
            fixed_scheme: None,
            last_error: None,
            torn_down: false,
        }
    }

    /// Deterministic scheme choice and particle placement
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        let params = self.renderer.params().clone();
        self.renderer = FrameRenderer::with_seed(params, self.renderer.scheme(), seed);
        self
    }

    /// Use one scheme for every file instead of picking at random
    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.fixed_scheme = Some(scheme);
        self.renderer.set_scheme(scheme);
        self
    }

    /// Select a file. Files not declaring an `audio/*` type are ignored.
    pub fn select_file(&mut self, path: &Path) -> bool {
        if !is_audio(path) {
            log::warn!("Ignoring non-audio selection '{}'", path.display());
            return false;
        }

        if let Some(session) = self.session.as_mut() {
            session.pause();
        }
        self.scheduler.cancel();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.file = Some(SelectedFile {
            path: path.to_path_buf(),
            name,
        });
        self.analyzed = false;
        self.playing = false;
        self.current_time_s = 0.0;
        self.duration_s = 0.0;
        self.last_error = None;

        let scheme = self
            .fixed_scheme
            .unwrap_or_else(|| ColorScheme::random(&mut self.rng));
        self.renderer.set_scheme(scheme);
        self.renderer.reset();

        log::info!("Selected '{}' (scheme: {})", path.display(), scheme.name);
        true
    }

    /// Decode the selected file and load it into the (lazily opened) session.
    ///
    /// On failure the error is recorded and the view stays unanalyzed.
    pub fn analyze(&mut self) -> Result<(), VisualizerError> {
        match self.try_analyze() {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Analysis failed: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn try_analyze(&mut self) -> Result<(), VisualizerError> {
        let path = self
            .file
            .as_ref()
            .map(|f| f.path.clone())
            .ok_or(VisualizerError::NoFile)?;

        let track = Arc::new(decode_file(&path)?);

        // Reloading stops the transport, so the frame loop stops with it
        self.playing = false;
        self.scheduler.cancel();
        let session = self.ensure_session()?;
        session.pause();
        session.load(track)?;
        let duration_s = session.duration_s();
        self.duration_s = duration_s;
        self.current_time_s = 0.0;
        self.analyzed = true;
        log::info!(
            "Analyzed '{}' ({})",
            path.display(),
            format_time(self.duration_s)
        );
        Ok(())
    }

    /// Open the session if it is not open yet
    fn ensure_session(&mut self) -> Result<&mut S, SessionError> {
        if self.torn_down {
            return Err(SessionError::Closed);
        }
        if self.session.is_none() {
            let session = (self.open_session)()?;
            log::info!("Audio session opened");
            self.session = Some(session);
        }
        self.session.as_mut().ok_or(SessionError::Closed)
    }

    /// Toggle playback. Does nothing before analysis.
    pub fn toggle_play_pause(&mut self) -> Result<(), VisualizerError> {
        if !self.analyzed {
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        if self.playing {
            session.pause();
            self.scheduler.cancel();
            self.playing = false;
        } else {
            if let Err(e) = session.play() {
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
            self.playing = true;
            self.scheduler.request();
        }
        Ok(())
    }

    /// Seek to `seconds`, clamped to the track
    pub fn seek(&mut self, seconds: f64) {
        if !self.analyzed {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let target = if seconds.is_finite() {
            seconds.clamp(0.0, self.duration_s)
        } else {
            0.0
        };
        session.seek(target);
        self.current_time_s = target;
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta_s: f64) {
        self.seek(self.current_time_s + delta_s);
    }

    /// Display refresh callback.
    ///
    /// Runs only when a frame was scheduled. While playing it renders one
    /// frame and schedules the next; on pause or end nothing is rescheduled.
    pub fn frame(&mut self, canvas: Option<&mut dyn Canvas>, clock_s: f64) -> Option<FrameFeatures> {
        if !self.scheduler.take() || !self.playing {
            return None;
        }
        let session = self.session.as_mut()?;

        if session.is_ended() {
            self.handle_ended();
            return None;
        }

        self.snapshot.resize(session.bin_count(), 0);
        session.frequency_data(&mut self.snapshot);
        self.current_time_s = session.position_s();

        self.scheduler.request();
        self.renderer.render(&self.snapshot, clock_s, canvas)
    }

    fn handle_ended(&mut self) {
        log::info!("Playback ended");
        self.playing = false;
        self.current_time_s = 0.0;
        self.scheduler.cancel();
    }

    /// Forget the selected file
    pub fn clear_file(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.pause();
        }
        self.scheduler.cancel();
        self.file = None;
        self.analyzed = false;
        self.playing = false;
        self.duration_s = 0.0;
        self.current_time_s = 0.0;
        self.renderer.reset();
    }

    /// Stop scheduling and release the audio session. Safe to call twice.
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
        self.playing = false;
        if let Some(session) = self.session.as_mut() {
            if !session.is_closed() {
                session.close();
            }
        }
        self.torn_down = true;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn current_time_s(&self) -> f64 {
        self.current_time_s
    }

    pub fn scheme(&self) -> ColorScheme {
        self.renderer.scheme()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    /// One-line status for the window title
    pub fn status_line(&self) -> String {
        if let Some(error) = &self.last_error {
            return format!("wavepulse | error: {}", error);
        }
        match &self.file {
            None => "wavepulse | drop an audio file".to_string(),
            Some(file) if !self.analyzed => {
                format!("wavepulse | {} | press Enter to analyze", file.name)
            }
            Some(file) => format!(
                "wavepulse | {} | {} / {} | {} | {}",
                file.name,
                format_time(self.current_time_s),
                format_time(self.duration_s),
                self.scheme().name,
                if self.playing { "playing" } else { "paused" }
            ),
        }
    }
}

impl<S: AudioSession> Drop for Visualizer<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
