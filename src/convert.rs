//! Per-file conversion pipeline and the batch loop around it.
//!
//! A job walks the stages in [`Stage`] order and stops at the first error.
//! Every job gets its own scratch directory, removed when the job ends
//! whichever way it ends. The encoder writes to a hidden `.part` file next to
//! the target, renamed into place once encoding succeeds.

use crate::codec::{Codec, EncodeRequest};
use crate::constants::PCM_FILE_NAME;
use crate::error::JobError;
use crate::interrupt::ActiveJob;
use crate::media::{MetadataSource, TrackMetadata, select_picture};
use crate::naming::{TargetPath, normalize_metadata};
use crate::playlist::Playlist;
use crate::utils::progress::stage_spinner;
use crate::utils::report;
use crate::utils::validation::is_regular_file;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    ResetScratch,
    ExtractTags,
    Normalize,
    ExtractPictures,
    SelectPicture,
    ResolvePath,
    CreateDirectory,
    Decode,
    Encode,
    AppendPlaylist,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "validate",
            Self::ResetScratch => "scratch setup",
            Self::ExtractTags => "tag extraction",
            Self::Normalize => "normalization",
            Self::ExtractPictures => "picture extraction",
            Self::SelectPicture => "picture selection",
            Self::ResolvePath => "path resolution",
            Self::CreateDirectory => "directory creation",
            Self::Decode => "decode",
            Self::Encode => "encode",
            Self::AppendPlaylist => "playlist append",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A finished job.
#[derive(Debug, Clone)]
pub struct ConvertedTrack {
    pub source: PathBuf,
    pub output: PathBuf,
    pub tags: TrackMetadata,
    /// File name of the embedded picture, e.g. `COVER_FRONT.jpg`
    pub picture: Option<String>,
}

/// Per-batch tally. Missing sources count as skipped, every other
/// non-fatal job error as failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} skipped, {} failed",
            self.converted, self.skipped, self.failed
        )
    }
}

/// Runs conversion jobs against a metadata reader and a codec.
pub struct Converter<M, C> {
    metadata: M,
    codec: C,
    output_root: PathBuf,
    playlist: Playlist,
    active: ActiveJob,
}

impl<M: MetadataSource, C: Codec> Converter<M, C> {
    /// Create a converter.
    ///
    /// # Arguments
    ///
    /// * `metadata` - Reads tags and exports embedded pictures
    /// * `codec` - Decodes sources and encodes MP3s
    /// * `output_root` - Directory the `artist/album/` tree is created under
    /// * `playlist` - Receives one line per converted file
    pub fn new(metadata: M, codec: C, output_root: PathBuf, playlist: Playlist) -> Self {
        Self {
            metadata,
            codec,
            output_root,
            playlist,
            active: ActiveJob::new(),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The playlist converted files are appended to.
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Files of the job in flight, for the interrupt handler.
    pub fn active_job(&self) -> &ActiveJob {
        &self.active
    }

    /// Convert every source in turn. Per-file failures are reported and
    /// counted; only a fatal error (see [`JobError::is_fatal`]) stops the batch.
    pub fn run_batch<I>(&self, sources: I) -> Result<BatchSummary, JobError>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut summary = BatchSummary::default();

        for source in sources {
            match self.convert(&source) {
                Ok(track) => {
                    summary.converted += 1;
                    report::done(track.output.display());
                }
                Err(JobError::MissingSource(path)) => {
                    summary.skipped += 1;
                    report::warn(format!("Skipping missing file {}", path.display()));
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    summary.failed += 1;
                    report::error(format!("{}: {e}", source.display()));
                }
            }
        }

        Ok(summary)
    }

    /// Run one job through every stage.
    pub fn convert(&self, source: &Path) -> Result<ConvertedTrack, JobError> {
        enter(Stage::Validate, source);
        if !is_regular_file(source) {
            return Err(JobError::MissingSource(source.to_path_buf()));
        }
        report::info(format!("Converting {}", source.display()));

        enter(Stage::ResetScratch, source);
        let scratch = tempfile::Builder::new()
            .prefix("flac2mp3-")
            .tempdir()
            .map_err(JobError::io(Stage::ResetScratch))?;
        let job = self.active.track(scratch.path());

        enter(Stage::ExtractTags, source);
        let raw_tags = self.metadata.read_tags(source);

        enter(Stage::Normalize, source);
        let tags = normalize_metadata(&raw_tags);

        enter(Stage::ExtractPictures, source);
        match self.metadata.export_pictures(source, scratch.path()) {
            Ok(export) => {
                for skipped in &export.skipped {
                    report::warn(format!("{}: {skipped}", source.display()));
                }
            }
            Err(e) => report::warn(format!(
                "{}: cannot read embedded pictures: {e}",
                source.display()
            )),
        }

        enter(Stage::SelectPicture, source);
        let picture = select_picture(scratch.path());

        enter(Stage::ResolvePath, source);
        let target = TargetPath::resolve(&tags)?;

        enter(Stage::CreateDirectory, source);
        let directory = target.directory_in(&self.output_root);
        fs::create_dir_all(&directory).map_err(JobError::io(Stage::CreateDirectory))?;
        let output = target.file_in(&self.output_root);

        let name = file_label(source);

        enter(Stage::Decode, source);
        let pcm = scratch.path().join(PCM_FILE_NAME);
        let spinner = stage_spinner(format!("Decoding {name}"));
        let decoded = self.codec.decode(source, &pcm);
        spinner.finish_and_clear();
        decoded.map_err(|e| JobError::Codec {
            stage: Stage::Decode,
            source: e,
        })?;

        enter(Stage::Encode, source);
        let partial = directory.join(format!(".{}.part", target.basename()));
        let request = EncodeRequest {
            pcm: &pcm,
            output: &partial,
            tags: &tags,
            picture: picture.as_deref(),
        };
        job.writing(&partial);
        let spinner = stage_spinner(format!("Encoding {name}"));
        let encoded = self.codec.encode(&request);
        spinner.finish_and_clear();
        if let Err(e) = encoded {
            remove_partial(&partial);
            return Err(JobError::Codec {
                stage: Stage::Encode,
                source: e,
            });
        }
        if let Err(e) = fs::rename(&partial, &output) {
            remove_partial(&partial);
            return Err(JobError::Io {
                stage: Stage::Encode,
                source: e,
            });
        }
        job.committed();

        enter(Stage::AppendPlaylist, source);
        self.playlist.append(&output).map_err(JobError::Playlist)?;

        enter(Stage::Done, source);
        Ok(ConvertedTrack {
            source: source.to_path_buf(),
            output,
            tags,
            picture: picture
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned()),
        })
    }
}

fn remove_partial(partial: &Path) {
    if let Err(e) = fs::remove_file(partial)
        && e.kind() != io::ErrorKind::NotFound
    {
        log::debug!("Could not remove {}: {e}", partial.display());
    }
}

fn enter(stage: Stage, source: &Path) {
    log::debug!("[{stage}] {}", source.display());
}

fn file_label(source: &Path) -> String {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CodecError, MetadataError};
    use crate::media::PictureExport;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Metadata source that hands back fixed tags and writes fixed pictures.
    struct FixedMetadata {
        tags: TrackMetadata,
        pictures: Vec<(&'static str, &'static [u8])>,
    }

    impl MetadataSource for FixedMetadata {
        fn read_tags(&self, _source: &Path) -> TrackMetadata {
            self.tags.clone()
        }

        fn export_pictures(
            &self,
            _source: &Path,
            scratch: &Path,
        ) -> Result<PictureExport, MetadataError> {
            let mut export = PictureExport::default();
            for (name, content) in &self.pictures {
                let path = scratch.join(name);
                fs::write(&path, content)?;
                export.written.push(path);
            }
            Ok(export)
        }
    }

    /// Codec that records what it was asked to do.
    #[derive(Default)]
    struct RecordingCodec {
        fail_encode: bool,
        encoded: RefCell<Vec<(PathBuf, TrackMetadata, Option<Vec<u8>>)>>,
        scratch_dirs: RefCell<Vec<PathBuf>>,
    }

    impl Codec for RecordingCodec {
        fn decode(&self, _source: &Path, pcm: &Path) -> Result<(), CodecError> {
            fs::write(pcm, b"pcm").expect("scratch is writable");
            if let Some(dir) = pcm.parent() {
                self.scratch_dirs.borrow_mut().push(dir.to_path_buf());
            }
            Ok(())
        }

        fn encode(&self, request: &EncodeRequest<'_>) -> Result<(), CodecError> {
            fs::write(request.output, b"mp3").expect("output is writable");
            if self.fail_encode {
                return Err(CodecError::Failed {
                    tool: "lame".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "boom".to_string(),
                });
            }
            let picture = request.picture.map(|p| fs::read(p).expect("picture exists"));
            self.encoded.borrow_mut().push((
                request.output.to_path_buf(),
                request.tags.clone(),
                picture,
            ));
            Ok(())
        }
    }

    fn converter(
        root: &Path,
        metadata: FixedMetadata,
        codec: RecordingCodec,
    ) -> Converter<FixedMetadata, RecordingCodec> {
        Converter::new(
            metadata,
            codec,
            root.to_path_buf(),
            Playlist::new(root.join("playlist.m3u")),
        )
    }

    fn source_file(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("input.flac");
        fs::write(&path, b"fLaC").unwrap();
        path
    }

    #[test]
    fn test_convert_runs_all_stages() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let source = source_file(&input);

        let metadata = FixedMetadata {
            tags: TrackMetadata {
                artist: "Café Müller".to_string(),
                album: "Déjà Vu?".to_string(),
                title: "Naïve (Remix)".to_string(),
                track_number: "7".to_string(),
                ..Default::default()
            },
            pictures: vec![("COVER_FRONT.jpg", &b"jpg"[..]), ("COVER_FRONT.png", &b"png"[..])],
        };
        let converter = converter(out.path(), metadata, RecordingCodec::default());

        let track = converter.convert(&source).unwrap();

        let expected = out
            .path()
            .join("cafe_mueller")
            .join("deja_vu_q")
            .join("007_naive_remix.mp3");
        assert_eq!(track.output, expected);
        assert!(expected.exists());
        assert_eq!(track.picture.as_deref(), Some("COVER_FRONT.png"));

        let encoded = converter.codec().encoded.borrow();
        assert_eq!(encoded.len(), 1);
        assert_eq!(encoded[0].1.artist, "Cafe Mueller");
        assert_eq!(encoded[0].1.genre, "no genre");
        assert_eq!(encoded[0].2.as_deref(), Some(&b"png"[..]));

        let playlist = fs::read_to_string(out.path().join("playlist.m3u")).unwrap();
        assert_eq!(playlist, format!("{}\n", expected.display()));
    }

    #[test]
    fn test_scratch_is_removed_after_job() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let source = source_file(&input);
        let metadata = FixedMetadata {
            tags: TrackMetadata::default(),
            pictures: vec![],
        };
        let converter = converter(out.path(), metadata, RecordingCodec::default());

        converter.convert(&source).unwrap();
        converter.convert(&source).unwrap();

        let dirs = converter.codec().scratch_dirs.borrow();
        assert!(converter.active_job().is_idle());
        assert_eq!(dirs.len(), 2);
        assert_ne!(dirs[0], dirs[1]);
        assert!(dirs.iter().all(|d| !d.exists()));
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let out = TempDir::new().unwrap();
        let metadata = FixedMetadata {
            tags: TrackMetadata::default(),
            pictures: vec![],
        };
        let converter = converter(out.path(), metadata, RecordingCodec::default());

        let result = converter.convert(&out.path().join("gone.flac"));
        assert!(matches!(result, Err(JobError::MissingSource(_))));
        assert!(!out.path().join("playlist.m3u").exists());
    }

    #[test]
    fn test_empty_slug_aborts_job() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let source = source_file(&input);
        let metadata = FixedMetadata {
            tags: TrackMetadata {
                artist: "!!!".to_string(),
                ..Default::default()
            },
            pictures: vec![],
        };
        let converter = converter(out.path(), metadata, RecordingCodec::default());

        let result = converter.convert(&source);
        assert!(matches!(result, Err(JobError::Path(_))));
        assert!(converter.codec().encoded.borrow().is_empty());
    }

    #[test]
    fn test_encode_failure_removes_partial_output() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let source = source_file(&input);
        let metadata = FixedMetadata {
            tags: TrackMetadata::default(),
            pictures: vec![],
        };
        let codec = RecordingCodec {
            fail_encode: true,
            ..Default::default()
        };
        let converter = converter(out.path(), metadata, codec);

        let result = converter.convert(&source);
        assert!(matches!(
            result,
            Err(JobError::Codec {
                stage: Stage::Encode,
                ..
            })
        ));
        let album = out.path().join("no_artist/no_album");
        assert!(!album.join("000_no_title.mp3").exists());
        assert!(!album.join(".000_no_title.mp3.part").exists());
        assert!(!out.path().join("playlist.m3u").exists());
        assert!(converter.active_job().is_idle());
    }

    #[test]
    fn test_encode_failure_keeps_earlier_file_at_same_path() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let source = source_file(&input);
        let album = out.path().join("no_artist/no_album");
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("000_no_title.mp3"), b"earlier").unwrap();

        let metadata = FixedMetadata {
            tags: TrackMetadata::default(),
            pictures: vec![],
        };
        let codec = RecordingCodec {
            fail_encode: true,
            ..Default::default()
        };
        let converter = converter(out.path(), metadata, codec);

        assert!(converter.convert(&source).is_err());
        assert_eq!(fs::read(album.join("000_no_title.mp3")).unwrap(), b"earlier");
    }

    #[test]
    fn test_later_job_replaces_file_at_same_path() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let source = source_file(&input);
        let album = out.path().join("no_artist/no_album");
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("000_no_title.mp3"), b"earlier").unwrap();

        let metadata = FixedMetadata {
            tags: TrackMetadata::default(),
            pictures: vec![],
        };
        let converter = converter(out.path(), metadata, RecordingCodec::default());

        let track = converter.convert(&source).unwrap();
        assert_eq!(fs::read(&track.output).unwrap(), b"mp3");
        assert!(!album.join(".000_no_title.mp3.part").exists());
        assert!(converter.active_job().is_idle());
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let source = source_file(&input);
        let metadata = FixedMetadata {
            tags: TrackMetadata::default(),
            pictures: vec![],
        };
        let converter = converter(out.path(), metadata, RecordingCodec::default());

        let summary = converter
            .run_batch(vec![
                input.path().join("missing.flac"),
                source.clone(),
                input.path().to_path_buf(),
            ])
            .unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                converted: 1,
                skipped: 2,
                failed: 0
            }
        );
        assert_eq!(converter.playlist().line_count().unwrap(), 1);
    }

    #[test]
    fn test_unwritable_playlist_is_fatal() {
        let out = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let source = source_file(&input);
        let metadata = FixedMetadata {
            tags: TrackMetadata::default(),
            pictures: vec![],
        };
        let converter = Converter::new(
            metadata,
            RecordingCodec::default(),
            out.path().to_path_buf(),
            Playlist::new(out.path().join("no-such-dir").join("playlist.m3u")),
        );

        let result = converter.run_batch(vec![source.clone(), source]);
        assert!(matches!(result, Err(JobError::Playlist(_))));
        assert_eq!(converter.codec().encoded.borrow().len(), 1);
    }
}
