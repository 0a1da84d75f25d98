use super::slug::slugify;
use crate::constants::OUTPUT_EXTENSION;
use crate::error::PathError;
use crate::media::TrackMetadata;
use std::path::{Path, PathBuf};

/// Where a converted track lands, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    subdirectory: String,
    basename: String,
}

impl TargetPath {
    /// Resolve from normalized metadata.
    ///
    /// The track number must already be a plain non-negative integer; the
    /// normalization step substitutes `0` for anything else.
    pub fn resolve(metadata: &TrackMetadata) -> Result<Self, PathError> {
        let artist = non_empty_slug(&metadata.artist, "artist")?;
        let album = non_empty_slug(&metadata.album, "album")?;
        let title = non_empty_slug(&metadata.title, "title")?;

        let track: u32 = metadata
            .track_number
            .parse()
            .map_err(|_| PathError::TrackNumber(metadata.track_number.clone()))?;

        Ok(Self {
            subdirectory: format!("{artist}/{album}/"),
            basename: format!("{track:03}_{title}.{OUTPUT_EXTENSION}"),
        })
    }

    /// `artist/album/`, always with a trailing slash.
    pub fn subdirectory(&self) -> &str {
        &self.subdirectory
    }

    /// `NNN_title.mp3`
    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn directory_in(&self, root: &Path) -> PathBuf {
        root.join(&self.subdirectory)
    }

    pub fn file_in(&self, root: &Path) -> PathBuf {
        self.directory_in(root).join(&self.basename)
    }
}

fn non_empty_slug(value: &str, field: &'static str) -> Result<String, PathError> {
    let slug = slugify(value);
    if slug.is_empty() {
        return Err(PathError::EmptySlug { field });
    }
    Ok(slug)
}
