//! Requests to and responses from the catalog.
//!
//! The catalog is loose about its schema: fields come and go depending on the kind of result,
//! and optional fields are occasionally the wrong type. Unknown fields are ignored, and an
//! optional field that doesn't decode is treated as missing instead of failing the response.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use strum::{Display, EnumIter, EnumString};

/// The title shown for a result that has neither a track nor a collection name.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// The most results the catalog will return for a single search.
pub const MAX_LIMIT: u32 = 200;

/// The kind of media to search for.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Movie,
    Podcast,
    #[default]
    Music,
    MusicVideo,
    Audiobook,
    ShortFilm,
    TvShow,
    Software,
    Ebook,
    All,
}

/// A single search against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub term: String,
    pub media: MediaKind,
    pub limit: u32,
}

impl SearchRequest {
    /// A search for `term`, for music, returning at most 50 results.
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            media: MediaKind::default(),
            limit: 50,
        }
    }

    #[must_use]
    pub const fn media(mut self, media: MediaKind) -> Self {
        self.media = media;
        self
    }

    /// Set the result limit, clamped to what the catalog accepts (1 to 200).
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// The query string parameters for this request.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("term", self.term.clone()),
            ("media", self.media.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// The response to a [`SearchRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSearchResponse", rename_all = "camelCase")]
pub struct SearchResponse {
    pub result_count: i64,
    pub results: Vec<SearchResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSearchResponse {
    #[serde(default, deserialize_with = "lenient")]
    result_count: Option<i64>,
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl From<RawSearchResponse> for SearchResponse {
    fn from(raw: RawSearchResponse) -> Self {
        let result_count = raw
            .result_count
            .unwrap_or_else(|| i64::try_from(raw.results.len()).unwrap_or(i64::MAX));
        Self {
            result_count,
            results: raw.results,
        }
    }
}

/// A track or collection from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub track_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    pub artist_name: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
    #[serde(
        rename = "artworkUrl100",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub artwork_url_100: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub primary_genre_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub wrapper_type: String,
}

impl SearchResult {
    /// The track id, or the collection id for results that aren't tracks.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        match self.track_id {
            Some(id) => Some(id),
            None => self.collection_id,
        }
    }

    /// The track name, falling back to the collection name, falling back to [`UNKNOWN_TITLE`].
    #[must_use]
    pub fn title(&self) -> &str {
        self.track_name
            .as_deref()
            .or(self.collection_name.as_deref())
            .unwrap_or(UNKNOWN_TITLE)
    }

    /// What kind of media this is, e.g. "song", or the wrapper type ("collection") if unset.
    #[must_use]
    pub fn media_kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(&self.wrapper_type)
    }
}

/// Decode an optional field, treating a value of the wrong type as missing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}
