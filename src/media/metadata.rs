//! Opening FLAC sources.
//!
//! Tags and pictures come from lofty, which also steps over the ID3v2 tag
//! some rippers prepend to FLAC files. Stream parameters come from claxon.

use crate::error::MetadataError;
use claxon::{FlacReader, FlacReaderOptions};
use lofty::flac::FlacFile;
use lofty::{AudioFile, ParseOptions};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read the metadata of a FLAC file: Vorbis comments and PICTURE blocks in
/// file order. Audio properties are not computed.
pub fn read_flac(path: &Path) -> Result<FlacFile, MetadataError> {
    let mut reader = BufReader::new(File::open(path)?);
    let options = ParseOptions::new().read_properties(false);
    Ok(FlacFile::read_from(&mut reader, options)?)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u32,
    pub bits_per_sample: u32,
    pub duration_seconds: Option<f64>,
}

/// STREAMINFO of a FLAC file, without touching the audio frames.
pub fn read_stream_info(path: &Path) -> Result<StreamInfo, claxon::Error> {
    let options = FlacReaderOptions {
        metadata_only: true,
        read_vorbis_comment: false,
    };
    let info = FlacReader::open_ext(path, options)?.streaminfo();

    let duration_seconds = match info.samples {
        Some(samples) if info.sample_rate > 0 && samples > 0 => {
            Some(samples as f64 / info.sample_rate as f64)
        }
        _ => None,
    };

    Ok(StreamInfo {
        sample_rate: info.sample_rate,
        channels: info.channels,
        bits_per_sample: info.bits_per_sample,
        duration_seconds,
    })
}
