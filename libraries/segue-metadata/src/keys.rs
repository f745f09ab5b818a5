//! Supported tag keys
//!
//! Keys use the short lowercase names common to ID3 "easy" interfaces and
//! Vorbis comments. Each maps onto a format-independent lofty `ItemKey`, so
//! the same name works for MP3, FLAC, OGG, MP4 and WAV files.

use lofty::ItemKey;

/// Every key name the store reads and writes
pub const SUPPORTED_KEYS: &[&str] = &[
    "title",
    "artist",
    "album",
    "albumartist",
    "genre",
    "date",
    "tracknumber",
    "discnumber",
    "composer",
    "comment",
    "lyricist",
    "conductor",
    "performer",
    "bpm",
    "copyright",
    "encodedby",
    "organization",
    "isrc",
    "language",
    "mood",
    "titlesort",
    "albumsort",
    "artistsort",
    "albumartistsort",
    "musicbrainz_trackid",
    "musicbrainz_albumid",
    "musicbrainz_artistid",
];

/// lofty key for a supported name (case-insensitive)
pub fn item_key(name: &str) -> Option<ItemKey> {
    let key = match name.to_ascii_lowercase().as_str() {
        "title" => ItemKey::TrackTitle,
        "artist" => ItemKey::TrackArtist,
        "album" => ItemKey::AlbumTitle,
        "albumartist" => ItemKey::AlbumArtist,
        "genre" => ItemKey::Genre,
        "date" => ItemKey::RecordingDate,
        "tracknumber" => ItemKey::TrackNumber,
        "discnumber" => ItemKey::DiscNumber,
        "composer" => ItemKey::Composer,
        "comment" => ItemKey::Comment,
        "lyricist" => ItemKey::Lyricist,
        "conductor" => ItemKey::Conductor,
        "performer" => ItemKey::Performer,
        "bpm" => ItemKey::Bpm,
        "copyright" => ItemKey::CopyrightMessage,
        "encodedby" => ItemKey::EncodedBy,
        "organization" => ItemKey::Label,
        "isrc" => ItemKey::Isrc,
        "language" => ItemKey::Language,
        "mood" => ItemKey::Mood,
        "titlesort" => ItemKey::TrackTitleSortOrder,
        "albumsort" => ItemKey::AlbumTitleSortOrder,
        "artistsort" => ItemKey::TrackArtistSortOrder,
        "albumartistsort" => ItemKey::AlbumArtistSortOrder,
        "musicbrainz_trackid" => ItemKey::MusicBrainzRecordingId,
        "musicbrainz_albumid" => ItemKey::MusicBrainzReleaseId,
        "musicbrainz_artistid" => ItemKey::MusicBrainzArtistId,
        _ => return None,
    };
    Some(key)
}

/// Supported name for a lofty key
pub fn key_name(key: &ItemKey) -> Option<&'static str> {
    SUPPORTED_KEYS
        .iter()
        .copied()
        .find(|name| item_key(name).as_ref() == Some(key))
}
