//! Embedded artwork: exporting a source's pictures to scratch storage and
//! picking the one that goes into the output file.

use super::metadata::read_flac;
use crate::constants::PICTURE_PRIORITY;
use crate::error::{MetadataError, PictureError};
use lofty::Picture;
use lofty::ogg::OggPictureStorage;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// ID3v2 / FLAC picture type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PictureType {
    Other,
    FileIcon32x32,
    OtherFileIcon,
    CoverFront,
    CoverBack,
    LeafletPage,
    Media,
    LeadArtist,
    ArtistPerformer,
    Conductor,
    BandOrchestra,
    Composer,
    Lyricist,
    RecordingLocation,
    DuringRecording,
    DuringPerformance,
    ScreenCapture,
    BrightColouredFish,
    Illustration,
    BandLogotype,
    PublisherLogotype,
}

impl PictureType {
    /// Codes above 20 are reserved; they are treated as `Other`.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::FileIcon32x32,
            2 => Self::OtherFileIcon,
            3 => Self::CoverFront,
            4 => Self::CoverBack,
            5 => Self::LeafletPage,
            6 => Self::Media,
            7 => Self::LeadArtist,
            8 => Self::ArtistPerformer,
            9 => Self::Conductor,
            10 => Self::BandOrchestra,
            11 => Self::Composer,
            12 => Self::Lyricist,
            13 => Self::RecordingLocation,
            14 => Self::DuringRecording,
            15 => Self::DuringPerformance,
            16 => Self::ScreenCapture,
            17 => Self::BrightColouredFish,
            18 => Self::Illustration,
            19 => Self::BandLogotype,
            20 => Self::PublisherLogotype,
            _ => Self::Other,
        }
    }

    /// Human-readable name as listed in the FLAC format documentation.
    pub fn description(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::FileIcon32x32 => "32x32 pixels 'file icon' (PNG only)",
            Self::OtherFileIcon => "Other file icon",
            Self::CoverFront => "Cover (front)",
            Self::CoverBack => "Cover (back)",
            Self::LeafletPage => "Leaflet page",
            Self::Media => "Media (e.g. label side of CD)",
            Self::LeadArtist => "Lead artist/lead performer/soloist",
            Self::ArtistPerformer => "Artist/performer",
            Self::Conductor => "Conductor",
            Self::BandOrchestra => "Band/Orchestra",
            Self::Composer => "Composer",
            Self::Lyricist => "Lyricist/text writer",
            Self::RecordingLocation => "Recording Location",
            Self::DuringRecording => "During recording",
            Self::DuringPerformance => "During performance",
            Self::ScreenCapture => "Movie/video screen capture",
            Self::BrightColouredFish => "A bright coloured fish",
            Self::Illustration => "Illustration",
            Self::BandLogotype => "Band/artist logotype",
            Self::PublisherLogotype => "Publisher/Studio logotype",
        }
    }

    /// Simplified label used as the scratch file stem, e.g. `COVER_FRONT`.
    pub fn label(self) -> String {
        simplify_label(self.description())
    }
}

impl fmt::Display for PictureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureFormat {
    Jpg,
    Png,
}

impl PictureFormat {
    /// Derive the format from a declared MIME type: the subtype, lowercased,
    /// with `jpeg` spelled `jpg`. The picture data itself is not inspected.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let subtype = mime.rsplit('/').next().unwrap_or(mime).trim();
        match subtype.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddedPicture {
    /// Position among the file's PICTURE blocks, from 0
    pub index: usize,
    pub picture_type: PictureType,
    pub format: PictureFormat,
    pub content: Vec<u8>,
}

impl EmbeddedPicture {
    /// Classify a picture read by lofty. Only JPEG and PNG are accepted.
    pub fn from_picture(index: usize, picture: &Picture) -> Result<Self, PictureError> {
        let mime = picture.mime_type().map(|m| m.as_str()).unwrap_or_default();
        let format =
            PictureFormat::from_mime(mime).ok_or_else(|| PictureError::UnsupportedFormat {
                index,
                mime: mime.to_string(),
            })?;

        if picture.data().is_empty() {
            return Err(PictureError::Empty { index });
        }

        Ok(Self {
            index,
            picture_type: PictureType::from_code(u32::from(picture.pic_type().as_u8())),
            format,
            content: picture.data().to_vec(),
        })
    }

    /// `<LABEL>.<ext>`, e.g. `COVER_FRONT.jpg`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.picture_type.label(), self.format.extension())
    }
}

/// Result of exporting a source's pictures to scratch storage.
#[derive(Debug, Default)]
pub struct PictureExport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PictureError>,
}

/// Write each supported embedded picture to `scratch/<LABEL>.<ext>`.
///
/// Pictures sharing a type overwrite each other; the last block wins.
/// Unsupported or empty pictures are collected in `skipped`.
pub fn extract_pictures(source: &Path, scratch: &Path) -> Result<PictureExport, MetadataError> {
    let flac = read_flac(source)?;
    let mut export = PictureExport::default();

    for (index, (picture, _)) in flac.pictures().iter().enumerate() {
        match EmbeddedPicture::from_picture(index, picture) {
            Ok(picture) => {
                let path = scratch.join(picture.file_name());
                fs::write(&path, &picture.content)?;
                log::debug!(
                    "Extracted picture {} ({}) to {}",
                    picture.index,
                    picture.picture_type,
                    path.display()
                );
                if !export.written.contains(&path) {
                    export.written.push(path);
                }
            }
            Err(skip) => export.skipped.push(skip),
        }
    }

    Ok(export)
}

/// Pick the highest-priority non-empty picture in `scratch`, PNG before JPG.
pub fn select_picture(scratch: &Path) -> Option<PathBuf> {
    PICTURE_PRIORITY.iter().find_map(|label| {
        [PictureFormat::Png, PictureFormat::Jpg]
            .iter()
            .map(|format| scratch.join(format!("{label}.{}", format.extension())))
            .find(|path| is_non_empty_file(path))
    })
}

fn is_non_empty_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}

/// Uppercase, collapse runs of non-alphanumerics into `_`, trim `_`.
fn simplify_label(description: &str) -> String {
    let mut label = String::with_capacity(description.len());
    let mut separator = false;

    for c in description.chars() {
        if c.is_ascii_alphanumeric() {
            if separator && !label.is_empty() {
                label.push('_');
            }
            separator = false;
            label.push(c.to_ascii_uppercase());
        } else {
            separator = true;
        }
    }

    label
}
