//! Batch entry points: NUL-separated paths on stdin, or an `.m3u` playlist.

use flac2mp3::codec::ExternalCodec;
use flac2mp3::config::Config;
use flac2mp3::convert::Converter;
use flac2mp3::interrupt;
use flac2mp3::media::FlacMetadata;
use flac2mp3::playlist::{Playlist, read_flac_entries};
use flac2mp3::utils::report;
use flac2mp3::utils::validation::validate_path_exists;
use owo_colors::OwoColorize;
use std::error::Error;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Convert every NUL-terminated path read from standard input.
pub fn handle_stdin(config: &Config) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let sources = stdin
        .lock()
        .split(b'\0')
        .map_while(|chunk| match chunk {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::error!("Failed to read standard input: {e}");
                None
            }
        })
        .filter(|bytes| !bytes.is_empty())
        .map(path_from_bytes);

    run(config, sources)
}

/// Convert the FLAC entries listed in an `.m3u` playlist.
pub fn handle_playlist(m3u: &str, config: &Config) -> Result<(), Box<dyn Error>> {
    let m3u = PathBuf::from(shellexpand::tilde(m3u).as_ref());
    validate_path_exists(&m3u)?;

    let entries = read_flac_entries(&m3u)?;
    report::info(format!(
        "Found {} FLAC entries in {}",
        entries.len(),
        m3u.display()
    ));

    run(config, entries)
}

fn run<I>(config: &Config, sources: I) -> Result<(), Box<dyn Error>>
where
    I: IntoIterator<Item = PathBuf>,
{
    let output_root = config.output_root_path()?;
    let playlist = Playlist::new(output_root.join(&config.playlist_name));
    let converter = Converter::new(
        FlacMetadata,
        ExternalCodec::from_config(config),
        output_root,
        playlist,
    );
    interrupt::install_handler(converter.active_job().clone())?;

    let summary = converter.run_batch(sources)?;
    let lines = converter.playlist().line_count()?;

    eprintln!(
        "\n{} {} ({} {} in {})",
        "Done:".green().bold(),
        summary,
        lines,
        if lines == 1 { "entry" } else { "entries" },
        display_name(converter.playlist().path()).cyan()
    );

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}
