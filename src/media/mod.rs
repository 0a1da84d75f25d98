use crate::error::MetadataError;
use std::path::Path;

pub mod metadata;
pub mod pictures;
pub mod tags;

pub use pictures::{EmbeddedPicture, PictureExport, PictureFormat, PictureType, select_picture};

/// The six tag fields carried from source to output. Absent fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub genre: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub track_number: String,
    pub title: String,
}

impl TrackMetadata {
    /// Build a value by asking for each field by its Vorbis comment key.
    pub fn from_fn(mut value: impl FnMut(&'static str) -> String) -> Self {
        Self {
            genre: value("GENRE"),
            artist: value("ARTIST"),
            album: value("ALBUM"),
            year: value("DATE"),
            track_number: value("TRACKNUMBER"),
            title: value("TITLE"),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "GENRE" => &self.genre,
            "ARTIST" => &self.artist,
            "ALBUM" => &self.album,
            "DATE" => &self.year,
            "TRACKNUMBER" => &self.track_number,
            "TITLE" => &self.title,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        crate::constants::TAG_KEYS
            .iter()
            .all(|key| self.get(key).is_none_or(str::is_empty))
    }
}

/// Reads tags and artwork out of a source file.
pub trait MetadataSource {
    /// Never fails: unreadable sources give an all-empty value.
    fn read_tags(&self, source: &Path) -> TrackMetadata;

    /// Write every supported embedded picture into `scratch`.
    fn export_pictures(&self, source: &Path, scratch: &Path)
    -> Result<PictureExport, MetadataError>;
}

/// Native reader for FLAC sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlacMetadata;

impl MetadataSource for FlacMetadata {
    fn read_tags(&self, source: &Path) -> TrackMetadata {
        if let Ok(info) = metadata::read_stream_info(source) {
            log::debug!(
                "{}: {} Hz, {}-bit, {} channel(s)",
                source.display(),
                info.sample_rate,
                info.bits_per_sample,
                info.channels
            );
        }
        tags::read_track_metadata(source)
    }

    fn export_pictures(
        &self,
        source: &Path,
        scratch: &Path,
    ) -> Result<PictureExport, MetadataError> {
        pictures::extract_pictures(source, scratch)
    }
}
