//! Story draft model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a locally authored draft, using UUID v7
/// (time-sortable), distinct from any server-assigned story id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(Uuid);

impl DraftId {
    /// Create a new unique draft ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DraftId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// An in-memory photo payload attached to a story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoBlob {
    /// Original file name, sent to the remote service as-is
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`
    pub content_type: String,
    /// Raw image bytes, stored base64 in the serialized ledger
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

impl PhotoBlob {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Check if the photo carries no image data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A user-authored story before a draft id and timestamp are assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewStory {
    /// Story text, must be non-empty
    pub description: String,
    /// Photo payload, must carry data
    pub photo: PhotoBlob,
    /// Optional latitude, absent when the user supplied none
    pub lat: Option<f64>,
    /// Optional longitude
    pub lon: Option<f64>,
}

impl NewStory {
    #[must_use]
    pub fn new(description: impl Into<String>, photo: PhotoBlob) -> Self {
        Self {
            description: description.into(),
            photo,
            lat: None,
            lon: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }
}

/// A locally authored story submission, not yet acknowledged by the remote
/// service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDraft {
    /// Locally generated identifier, never reused
    pub id: DraftId,
    /// Story text
    pub description: String,
    /// Photo payload
    pub photo: PhotoBlob,
    /// Optional latitude; absent stays absent across serde round trips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Optional longitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Client-side creation timestamp, assigned once, never mutated
    pub created_at: DateTime<Utc>,
    /// False at creation; flips to true exactly once on remote acceptance
    pub synced: bool,
}

impl StoryDraft {
    /// Create a pending draft from author input
    #[must_use]
    pub fn new(story: NewStory) -> Self {
        Self {
            id: DraftId::new(),
            description: story.description,
            photo: story.photo,
            lat: story.lat,
            lon: story.lon,
            created_at: Utc::now(),
            synced: false,
        }
    }

    /// Get first line of the description as a preview, truncated to `max_len`
    #[must_use]
    pub fn preview(&self, max_len: usize) -> String {
        self.description
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
