//! Decode and encode capabilities.
//!
//! The default implementation shells out to `sox` (FLAC → raw PCM) and
//! `lame` (raw PCM → tagged VBR MP3). Both are behind the [`Codec`] trait so
//! the conversion pipeline can run against fakes.

use crate::config::Config;
use crate::constants::{PCM_BITS_PER_SAMPLE, PCM_CHANNELS, PCM_SAMPLE_RATE};
use crate::error::CodecError;
use crate::media::TrackMetadata;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Everything the encoder needs for one track.
#[derive(Debug, Clone, Copy)]
pub struct EncodeRequest<'a> {
    pub pcm: &'a Path,
    pub output: &'a Path,
    pub tags: &'a TrackMetadata,
    pub picture: Option<&'a Path>,
}

pub trait Codec {
    /// Decode `source` into raw 44.1 kHz / 24-bit signed LE / stereo PCM at `pcm`.
    fn decode(&self, source: &Path, pcm: &Path) -> Result<(), CodecError>;

    /// Compress the PCM, writing non-empty tags and the picture if any.
    fn encode(&self, request: &EncodeRequest<'_>) -> Result<(), CodecError>;
}

/// lame's ID3 flags, keyed like `TrackMetadata::get`.
const ENCODER_TAG_FLAGS: &[(&str, &str)] = &[
    ("TITLE", "--tt"),
    ("ARTIST", "--ta"),
    ("ALBUM", "--tl"),
    ("DATE", "--ty"),
    ("TRACKNUMBER", "--tn"),
    ("GENRE", "--tg"),
];

/// Codec backed by external command-line tools.
#[derive(Debug, Clone)]
pub struct ExternalCodec {
    decoder: PathBuf,
    encoder: PathBuf,
    vbr_quality: u8,
}

impl ExternalCodec {
    /// Create a codec that runs the given programs.
    ///
    /// # Arguments
    ///
    /// * `decoder` - A sox-compatible program, looked up on `PATH` if bare
    /// * `encoder` - A lame-compatible program
    /// * `vbr_quality` - lame `-V` setting, 0 (best) to 9
    pub fn new(decoder: PathBuf, encoder: PathBuf, vbr_quality: u8) -> Self {
        Self {
            decoder,
            encoder,
            vbr_quality,
        }
    }

    /// Programs and quality from the user configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.decoder_program(),
            config.encoder_program(),
            config.vbr_quality,
        )
    }

    fn decode_command(&self, source: &Path, pcm: &Path) -> Command {
        let mut cmd = Command::new(&self.decoder);
        cmd.arg("-q")
            .arg(source)
            .args(["-t", "raw", "-e", "signed-integer", "-L"])
            .arg("-r")
            .arg(PCM_SAMPLE_RATE.to_string())
            .arg("-b")
            .arg(PCM_BITS_PER_SAMPLE.to_string())
            .arg("-c")
            .arg(PCM_CHANNELS.to_string())
            .arg(pcm);
        cmd
    }

    fn encode_command(&self, request: &EncodeRequest<'_>) -> Command {
        let mut cmd = Command::new(&self.encoder);
        cmd.args(["--quiet", "-r", "--signed", "--little-endian"])
            .arg("-s")
            .arg(format!("{}", PCM_SAMPLE_RATE as f64 / 1000.0))
            .arg("--bitwidth")
            .arg(PCM_BITS_PER_SAMPLE.to_string())
            .args(["-m", "j"])
            .arg(format!("-V{}", self.vbr_quality))
            .args(["--add-id3v2", "--ignore-tag-errors"]);

        for (key, flag) in ENCODER_TAG_FLAGS {
            if let Some(value) = request.tags.get(key).filter(|v| !v.is_empty()) {
                cmd.arg(flag).arg(value);
            }
        }

        if let Some(picture) = request.picture {
            cmd.arg("--ti").arg(picture);
        }

        cmd.arg(request.pcm).arg(request.output);
        cmd
    }
}

impl Codec for ExternalCodec {
    fn decode(&self, source: &Path, pcm: &Path) -> Result<(), CodecError> {
        run_tool(self.decode_command(source, pcm))
    }

    fn encode(&self, request: &EncodeRequest<'_>) -> Result<(), CodecError> {
        run_tool(self.encode_command(request))
    }
}

fn run_tool(mut cmd: Command) -> Result<(), CodecError> {
    let tool = cmd.get_program().to_string_lossy().to_string();
    log::debug!(
        "Running {tool} {}",
        cmd.get_args()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CodecError::NotFound { tool: tool.clone() }
            } else {
                CodecError::Spawn {
                    tool: tool.clone(),
                    source: e,
                }
            }
        })?;

    if !output.status.success() {
        return Err(CodecError::Failed {
            tool,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
