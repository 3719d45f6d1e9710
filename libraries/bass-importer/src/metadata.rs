//! Tag extraction from audio files

use crate::{ImportError, Result};
use lofty::{Accessor, AudioFile, MimeType, PictureType, Probe, TaggedFileExt};
use std::path::Path;

/// Artist used when a file carries no artist tag
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Embedded pictures above this size are ignored (5 MB)
const MAX_ARTWORK_SIZE: usize = 5 * 1024 * 1024;

/// Extracted metadata from an audio file
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTags {
    /// Title tag, or the file stem
    pub title: String,

    /// Artist tag, or [`UNKNOWN_ARTIST`]
    pub artist: String,

    /// Duration in seconds from the audio properties
    pub duration_seconds: f64,

    /// Embedded cover picture
    pub artwork: Option<Artwork>,
}

/// Embedded picture bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub data: Vec<u8>,
    /// File extension matching the picture format
    pub extension: &'static str,
}

/// Extract tags and properties from an audio file
///
/// Blocking; run on a blocking thread from async code.
pub fn read_tags(path: &Path) -> Result<ExtractedTags> {
    let tagged_file = Probe::open(path)
        .map_err(|e| ImportError::Metadata(format!("Failed to open file: {e}")))?
        .read()
        .map_err(|e| ImportError::Metadata(format!("Failed to read file: {e}")))?;

    let duration_seconds = tagged_file.properties().duration().as_secs_f64();
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let title = tag
        .and_then(|t| t.title().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(ToString::to_string)
        })
        .unwrap_or_default();

    let artist = tag
        .and_then(|t| t.artist().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    let artwork = tag.and_then(|tag| {
        let pictures = tag.pictures();
        let picture = pictures
            .iter()
            .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
            .or_else(|| pictures.first())?;

        let data = picture.data();
        if data.is_empty() || data.len() > MAX_ARTWORK_SIZE {
            tracing::warn!(
                path = %path.display(),
                size = data.len(),
                "Skipping embedded artwork"
            );
            return None;
        }

        Some(Artwork {
            data: data.to_vec(),
            extension: picture_extension(picture.mime_type()),
        })
    });

    Ok(ExtractedTags {
        title,
        artist,
        duration_seconds,
        artwork,
    })
}

fn picture_extension(mime: Option<&MimeType>) -> &'static str {
    match mime {
        Some(MimeType::Png) => "png",
        Some(MimeType::Gif) => "gif",
        Some(MimeType::Bmp) => "bmp",
        Some(MimeType::Tiff) => "tiff",
        _ => "jpg",
    }
}

/// Lowercase file extension, if any
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonexistent_file_is_metadata_error() {
        let result = read_tags(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(ImportError::Metadata(_))));
    }

    #[test]
    fn picture_extension_defaults_to_jpeg() {
        assert_eq!(picture_extension(Some(&MimeType::Png)), "png");
        assert_eq!(picture_extension(Some(&MimeType::Jpeg)), "jpg");
        assert_eq!(picture_extension(None), "jpg");
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension(Path::new("/a/B.MP3")).as_deref(), Some("mp3"));
        assert_eq!(file_extension(Path::new("/a/noext")), None);
    }
}
