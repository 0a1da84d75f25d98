//! Error types for the conversion pipeline.

use crate::convert::Stage;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a source file's metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid FLAC metadata: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
}

/// Why a single embedded picture was not extracted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PictureError {
    #[error("picture {index}: unsupported picture format '{mime}'")]
    UnsupportedFormat { index: usize, mime: String },

    #[error("picture {index}: no image data")]
    Empty { index: usize },
}

impl PictureError {
    /// Position of the picture among the file's PICTURE blocks, from 0.
    pub fn index(&self) -> usize {
        match self {
            Self::UnsupportedFormat { index, .. } | Self::Empty { index } => *index,
        }
    }
}

/// Target path could not be formed from normalized tags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("{field} is empty after normalization")]
    EmptySlug { field: &'static str },

    #[error("track number '{0}' is not numeric")]
    TrackNumber(String),
}

/// Failures of the external decode/encode tools.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("'{tool}' not found, install it or set its path in the config file")]
    NotFound { tool: String },

    #[error("failed to run '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("'{tool}' exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },
}

/// A single conversion job failed.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Cannot name output file: {0}")]
    Path(#[from] PathError),

    #[error("{stage} failed: {source}")]
    Codec {
        stage: Stage,
        #[source]
        source: CodecError,
    },

    #[error("{stage} failed: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: io::Error,
    },

    #[error("Cannot append to playlist: {0}")]
    Playlist(#[source] io::Error),
}

impl JobError {
    /// Errors after which the rest of the batch cannot meet its output contract.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Playlist(_))
    }

    pub fn io(stage: Stage) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { stage, source }
    }
}
