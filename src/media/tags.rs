//! Vorbis comment reading.

use super::TrackMetadata;
use super::metadata::read_flac;
use crate::error::MetadataError;
use std::path::Path;

/// Read GENRE, ARTIST, ALBUM, DATE, TRACKNUMBER and TITLE from a FLAC file.
///
/// The first value of each key wins. A source lofty cannot read yields an
/// all-empty result; callers substitute defaults later.
pub fn read_track_metadata(path: &Path) -> TrackMetadata {
    match read_vorbis_comment(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            log::debug!("No readable tags in {}: {e}", path.display());
            TrackMetadata::default()
        }
    }
}

fn read_vorbis_comment(path: &Path) -> Result<TrackMetadata, MetadataError> {
    let flac = read_flac(path)?;
    let Some(comments) = flac.vorbis_comments() else {
        return Ok(TrackMetadata::default());
    };

    Ok(TrackMetadata::from_fn(|key| {
        let value = comments.get(key).unwrap_or_default();
        if key == "TRACKNUMBER" {
            strip_leading_zeros(value).to_string()
        } else {
            value.to_string()
        }
    }))
}

/// `"007"` becomes `"7"`, `"000"` becomes `""`.
pub fn strip_leading_zeros(value: &str) -> &str {
    value.trim_start_matches('0')
}
