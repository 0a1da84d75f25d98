//! Turning raw tag text into output names.

pub mod path;
pub mod slug;
pub mod transliterate;

pub use path::TargetPath;
pub use slug::slugify;
pub use transliterate::transliterate;

use crate::constants::tag_default;
use crate::media::TrackMetadata;

/// Transliterate every field, fix up the track number, then fill empty
/// fields from the defaults table.
pub fn normalize_metadata(raw: &TrackMetadata) -> TrackMetadata {
    TrackMetadata::from_fn(|key| {
        let mut value = transliterate(raw.get(key).unwrap_or_default());
        if key == "TRACKNUMBER" {
            value = normalize_track_number(&value);
        }
        if value.is_empty()
            && let Some(default) = tag_default(key)
        {
            value = default.to_string();
        }
        value
    })
}

/// Keep a plain integer (or the `N` of `N/M`), drop anything else.
fn normalize_track_number(value: &str) -> String {
    let number = value.split('/').next().unwrap_or_default().trim();
    match number.parse::<u32>() {
        Ok(n) => n.to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_round_trip() {
        let raw = TrackMetadata {
            artist: "Café Müller".to_string(),
            album: "Déjà Vu?".to_string(),
            title: "Naïve (Remix)".to_string(),
            track_number: "7".to_string(),
            ..Default::default()
        };

        let normalized = normalize_metadata(&raw);
        assert_eq!(normalized.artist, "Cafe Mueller");
        assert_eq!(normalized.album, "Deja Vu?");
        assert_eq!(normalized.genre, "no genre");
        assert_eq!(normalized.year, "");

        let target = TargetPath::resolve(&normalized).unwrap();
        assert_eq!(target.subdirectory(), "cafe_mueller/deja_vu_q/");
        assert_eq!(target.basename(), "007_naive_remix.mp3");
    }

    #[test]
    fn test_defaults_for_untagged_source() {
        let normalized = normalize_metadata(&TrackMetadata::default());
        assert_eq!(normalized.genre, "no genre");
        assert_eq!(normalized.artist, "no artist");
        assert_eq!(normalized.album, "no album");
        assert_eq!(normalized.track_number, "0");
        assert_eq!(normalized.title, "no title");
        assert!(normalized.year.is_empty());

        let target = TargetPath::resolve(&normalized).unwrap();
        assert_eq!(target.subdirectory(), "no_artist/no_album/");
        assert_eq!(target.basename(), "000_no_title.mp3");
    }

    #[test]
    fn test_untransliterable_fields_get_defaults() {
        let raw = TrackMetadata {
            artist: "\u{0001}\u{0002}".to_string(),
            ..Default::default()
        };
        assert_eq!(normalize_metadata(&raw).artist, "no artist");
    }

    #[test]
    fn test_track_number_forms() {
        assert_eq!(normalize_track_number("7"), "7");
        assert_eq!(normalize_track_number("3/12"), "3");
        assert_eq!(normalize_track_number(" 12 "), "12");
        assert_eq!(normalize_track_number("A1"), "");
        assert_eq!(normalize_track_number("-1"), "");
        assert_eq!(normalize_track_number(""), "");

        let raw = TrackMetadata {
            track_number: "side B".to_string(),
            ..Default::default()
        };
        assert_eq!(normalize_metadata(&raw).track_number, "0");
    }
}
