//! Synthetic FLAC files: `fLaC`, STREAMINFO, then the requested blocks.
//! No audio frames; the codecs under test are fakes.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const VORBIS_COMMENT: u8 = 4;
pub const PICTURE: u8 = 6;

fn stream_info() -> Vec<u8> {
    let mut data = Vec::with_capacity(34);
    data.extend_from_slice(&4096u16.to_be_bytes());
    data.extend_from_slice(&4096u16.to_be_bytes());
    data.extend_from_slice(&[0; 6]);
    // 44.1 kHz, 2 channels, 16 bits, 10 seconds
    let packed: u64 = (44_100u64 << 44) | (1 << 41) | (15 << 36) | 441_000;
    data.extend_from_slice(&packed.to_be_bytes());
    data.extend_from_slice(&[0; 16]);
    data
}

pub fn comments(fields: &[&str]) -> (u8, Vec<u8>) {
    let vendor = b"fixture";
    let mut data = Vec::new();
    data.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    data.extend_from_slice(vendor);
    data.extend_from_slice(&(fields.len() as u32).to_le_bytes());
    for field in fields {
        data.extend_from_slice(&(field.len() as u32).to_le_bytes());
        data.extend_from_slice(field.as_bytes());
    }
    (VORBIS_COMMENT, data)
}

pub fn picture(picture_type: u32, mime: &str, content: &[u8]) -> (u8, Vec<u8>) {
    let mut data = Vec::new();
    data.extend_from_slice(&picture_type.to_be_bytes());
    data.extend_from_slice(&(mime.len() as u32).to_be_bytes());
    data.extend_from_slice(mime.as_bytes());
    data.extend_from_slice(&0u32.to_be_bytes());
    for value in [600u32, 600, 24, 0] {
        data.extend_from_slice(&value.to_be_bytes());
    }
    data.extend_from_slice(&(content.len() as u32).to_be_bytes());
    data.extend_from_slice(content);
    (PICTURE, data)
}

pub fn write_flac(dir: &Path, name: &str, blocks: &[(u8, Vec<u8>)]) -> PathBuf {
    let mut all = vec![(0u8, stream_info())];
    all.extend(blocks.iter().cloned());

    let mut bytes = b"fLaC".to_vec();
    let count = all.len();
    for (i, (block_type, payload)) in all.into_iter().enumerate() {
        let last = if i + 1 == count { 0x80 } else { 0 };
        bytes.push(last | block_type);
        bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes()[1..]);
        bytes.extend_from_slice(&payload);
    }

    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Prepend an empty ID3v2.4 tag, as some rippers do.
pub fn write_flac_with_id3(dir: &Path, name: &str, blocks: &[(u8, Vec<u8>)]) -> PathBuf {
    let path = write_flac(dir, name, blocks);
    let mut bytes = b"ID3\x04\x00\x00\x00\x00\x00\x10".to_vec();
    bytes.extend_from_slice(&[0; 16]);
    bytes.extend_from_slice(&fs::read(&path).unwrap());
    fs::write(&path, bytes).unwrap();
    path
}
