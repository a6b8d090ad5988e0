//! Real-time session playing through the default output device.

use std::sync::{Arc, Mutex, MutexGuard};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::analyser::Analyser;
use super::decoding::DecodedTrack;
use super::errors::SessionError;
use super::session::{AudioSession, Transport};
use crate::params::FftConfig;
use crate::visual::BoundedHistory;

/// Output stream plus analyser fed from what was actually played
pub struct DeviceSession {
    /// Playback cursor shared with the output callback
    transport: Arc<Mutex<Transport>>,

    /// Recently played mono samples (written by the callback)
    tap: Arc<Mutex<BoundedHistory<f32>>>,

    analyser: Analyser,
    scratch: Vec<f32>,

    /// Audio output stream (kept alive until closed)
    stream: Option<cpal::Stream>,
}

impl DeviceSession {
    /// Open the default output device and start its stream
    pub fn open(config: FftConfig) -> Result<Self, SessionError> {
        let analyser = Analyser::new(config.clone())?;

        let transport = Arc::new(Mutex::new(Transport::default()));
        let transport_cb = Arc::clone(&transport);

        let tap = Arc::new(Mutex::new(BoundedHistory::new(config.tap_capacity)));
        let tap_cb = Arc::clone(&tap);

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(SessionError::NoOutputDevice)?;
        let supported = device.default_output_config()?;
        let stream_config: cpal::StreamConfig = supported.into();
        let channels = stream_config.channels as usize;
        let sample_rate = stream_config.sample_rate.0;

        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let (Ok(mut transport), Ok(mut tap)) = (transport_cb.lock(), tap_cb.lock()) else {
                    data.fill(0.0);
                    return;
                };
                transport.render(data, channels, sample_rate, &mut tap);
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            transport,
            tap,
            analyser,
            scratch: Vec::with_capacity(config.tap_capacity),
            stream: Some(stream),
        })
    }

    fn transport(&self) -> MutexGuard<'_, Transport> {
        // A panicked audio callback leaves the cursor usable
        self.transport
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AudioSession for DeviceSession {
    fn load(&mut self, track: Arc<DecodedTrack>) -> Result<(), SessionError> {
        if self.stream.is_none() {
            return Err(SessionError::Closed);
        }
        log::info!(
            "Loaded '{}' ({:.1}s, {} Hz)",
            track.name,
            track.duration_s(),
            track.sample_rate
        );
        self.transport().load(track);
        if let Ok(mut tap) = self.tap.lock() {
            tap.clear();
        }
        self.analyser.reset();
        Ok(())
    }

    fn play(&mut self) -> Result<(), SessionError> {
        if self.stream.is_none() {
            return Err(SessionError::Closed);
        }
        self.transport().play()
    }

    fn pause(&mut self) {
        self.transport().pause();
    }

    fn seek(&mut self, seconds: f64) {
        self.transport().seek(seconds);
    }

    fn position_s(&self) -> f64 {
        self.transport().position_s()
    }

    fn duration_s(&self) -> f64 {
        self.transport().duration_s()
    }

    fn is_playing(&self) -> bool {
        self.transport().is_playing()
    }

    fn is_ended(&self) -> bool {
        self.transport().is_ended()
    }

    fn bin_count(&self) -> usize {
        self.analyser.bin_count()
    }

    fn frequency_data(&mut self, out: &mut [u8]) {
        if let Ok(tap) = self.tap.lock() {
            tap.copy_into(&mut self.scratch);
        }
        self.analyser.byte_frequency_data(&self.scratch, out);
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::warn!("Failed to pause output stream on close: {}", e);
            }
            log::info!("Audio session closed");
        }
        self.transport().unload();
    }

    fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.close();
    }
}
