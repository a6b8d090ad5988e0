//! Declared media type of a selected file.
//!
//! Selection is only validated by the type a file declares through its
//! extension; the content is not sniffed until it is decoded.

use std::path::Path;

const MEDIA_TYPES: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("wave", "audio/wav"),
    ("flac", "audio/flac"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/opus"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("aif", "audio/aiff"),
    ("aiff", "audio/aiff"),
    ("weba", "audio/webm"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
];

/// Media type a path declares through its extension
pub fn declared_media_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, media_type)| *media_type)
}

/// Whether a path declares an `audio/*` media type
pub fn is_audio(path: &Path) -> bool {
    declared_media_type(path).is_some_and(|media_type| media_type.starts_with("audio/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_extensions() {
        for name in ["song.mp3", "a/b/track.FLAC", "x.wav", "voice.ogg", "clip.m4a"] {
            assert!(is_audio(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn test_non_audio_rejected() {
        for name in ["movie.mp4", "cover.png", "notes.txt", "noext", ".mp3", "weird.xyz"] {
            assert!(!is_audio(Path::new(name)), "{name}");
        }
        assert_eq!(declared_media_type(Path::new("a.webm")), Some("video/webm"));
    }
}
