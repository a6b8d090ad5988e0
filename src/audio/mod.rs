//! Audio decoding, playback and frequency analysis.
//!
//! Decodes user-selected files, plays them through the default output
//! device and produces byte frequency snapshots for the visuals.

pub mod analyser;
pub mod decoding;
pub mod device;
pub mod errors;
pub mod media;
pub mod session;

// Re-export public types
pub use analyser::Analyser;
pub use decoding::{decode_file, DecodedTrack};
pub use device::DeviceSession;
pub use errors::{DecodeError, SessionError};
pub use media::{declared_media_type, is_audio};
pub use session::{AudioSession, OfflineSession, Transport};
