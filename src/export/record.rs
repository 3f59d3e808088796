use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// CSV column order
pub const HEADERS: [&str; 13] = [
    "Row Index",
    "Title",
    "Artist",
    "Album",
    "Source Context",
    "Duration",
    "Date",
    "Popularity",
    "Favorited",
    "Has Lyrics",
    "Artist Link",
    "Album Link",
    "Cover URL",
];

/// One track row of the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Position assigned by the list (`aria-rowindex`), unique per run
    pub row_index: u32,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
    pub date: String,
    pub popularity: String,
    pub favorited: bool,
    pub has_lyrics: bool,
    pub artist_link: String,
    pub album_link: String,
    pub cover_url: String,

    /// Playlist or album title, identical for every record of a run
    pub source_context: String,
}

impl TrackRecord {
    /// Field values in [`HEADERS`] order
    pub fn fields(&self) -> [String; 13] {
        [
            self.row_index.to_string(),
            self.title.clone(),
            self.artist.clone(),
            self.album.clone(),
            self.source_context.clone(),
            self.duration.clone(),
            self.date.clone(),
            self.popularity.clone(),
            self.favorited.to_string(),
            self.has_lyrics.to_string(),
            self.artist_link.clone(),
            self.album_link.clone(),
            self.cover_url.clone(),
        ]
    }
}

/// Records collected so far, keyed by row index.
///
/// Keys are never removed, so the size only grows during a run.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: IndexMap<u32, TrackRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, row_index: u32) -> bool {
        self.records.contains_key(&row_index)
    }

    pub fn get(&self, row_index: u32) -> Option<&TrackRecord> {
        self.records.get(&row_index)
    }

    /// Store a record, replacing an earlier extraction of the same row.
    /// Returns true when the row index was not seen before.
    pub fn upsert(&mut self, record: TrackRecord) -> bool {
        self.records.insert(record.row_index, record).is_none()
    }

    /// Freeze the set into records ordered by ascending row index
    pub fn into_sorted(self) -> Vec<TrackRecord> {
        let mut records = self.records;
        records.sort_keys();
        records.into_values().collect()
    }
}
