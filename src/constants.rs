//! Project-wide constants and static lookup tables.
//!
//! The picture priority order and the tag defaults live here as ordered
//! tables so the conversion code can iterate them instead of branching.

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Extension of the compressed output files
pub const OUTPUT_EXTENSION: &str = "mp3";

/// Default playlist file name, created in the output root
pub const PLAYLIST_NAME: &str = "playlist.m3u";

/// Maximum number of characters kept in a slug
pub const SLUG_MAX_LEN: usize = 200;

/// Intermediate PCM layout handed from the decoder to the encoder
pub const PCM_SAMPLE_RATE: u32 = 44_100;
pub const PCM_BITS_PER_SAMPLE: u16 = 24;
pub const PCM_CHANNELS: u16 = 2;

/// Name of the raw PCM file inside a job's scratch directory
pub const PCM_FILE_NAME: &str = "audio.raw";

/// Picture-type labels in selection order, front cover first.
pub const PICTURE_PRIORITY: &[&str] = &[
    "COVER_FRONT",
    "OTHER",
    "ILLUSTRATION",
    "COVER_BACK",
    "LEAD_ARTIST_LEAD_PERFORMER_SOLOIST",
    "ARTIST_PERFORMER",
    "CONDUCTOR",
    "BAND_ORCHESTRA",
    "COMPOSER",
    "LYRICIST_TEXT_WRITER",
    "LEAFLET_PAGE",
    "MEDIA_E_G_LABEL_SIDE_OF_CD",
    "RECORDING_LOCATION",
    "DURING_RECORDING",
    "DURING_PERFORMANCE",
    "MOVIE_VIDEO_SCREEN_CAPTURE",
    "BAND_ARTIST_LOGOTYPE",
    "PUBLISHER_STUDIO_LOGOTYPE",
];

/// Vorbis comment keys read from the source, in `TrackMetadata` field order
pub const TAG_KEYS: &[&str] = &["GENRE", "ARTIST", "ALBUM", "DATE", "TRACKNUMBER", "TITLE"];

/// Text substituted for tag fields that are empty after transliteration.
/// `DATE` has no default and stays empty.
pub const TAG_DEFAULTS: &[(&str, &str)] = &[
    ("GENRE", "no genre"),
    ("ARTIST", "no artist"),
    ("ALBUM", "no album"),
    ("TRACKNUMBER", "0"),
    ("TITLE", "no title"),
];

/// Look up the default text for a tag key.
pub fn tag_default(key: &str) -> Option<&'static str> {
    TAG_DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, value)| *value)
}
