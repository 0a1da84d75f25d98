//! Reading source lists out of `.m3u` files and appending converted tracks
//! to the output playlist.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const FILE_URI_PREFIX: &str = "file://";

/// Append-only playlist of converted files, one path per line.
#[derive(Debug, Clone)]
pub struct Playlist {
    path: PathBuf,
}

impl Playlist {
    /// A playlist at `path`. Nothing is created until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the playlist if needed.
    pub fn append(&self, entry: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.display())
    }

    /// Number of entries, 0 if the playlist does not exist yet.
    pub fn line_count(&self) -> io::Result<usize> {
        match File::open(&self.path) {
            Ok(file) => Ok(BufReader::new(file).lines().count()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }
}

/// Read an `.m3u` file and return the FLAC entries it lists.
pub fn read_flac_entries(m3u: &Path) -> io::Result<Vec<PathBuf>> {
    let bytes = fs::read(m3u)?;
    Ok(parse_flac_entries(&String::from_utf8_lossy(&bytes)))
}

/// Select lines mentioning `.flac` (any case), skipping `#` directives, and
/// turn `file://` URIs into plain paths.
pub fn parse_flac_entries(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| line.to_ascii_lowercase().contains(".flac"))
        .map(|line| match line.strip_prefix(FILE_URI_PREFIX) {
            Some(uri_path) => PathBuf::from(decode_uri_path(uri_path)),
            None => PathBuf::from(line),
        })
        .collect()
}

/// Decode `%XX` escapes. Malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
fn decode_uri_path(uri_path: &str) -> String {
    match urlencoding::decode(uri_path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            String::from_utf8_lossy(&urlencoding::decode_binary(uri_path.as_bytes())).into_owned()
        }
    }
}
