//! Server-side story representation

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote service on story acceptance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteStoryId(pub String);

impl fmt::Display for RemoteStoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A story as returned by the remote listing/detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn remote_story_parses_listing_payload() {
        let payload = r#"
        {
          "id": "story-abc",
          "name": "Dimas",
          "description": "Lorem ipsum",
          "photoUrl": "https://cdn.example.com/photos/abc.jpg",
          "createdAt": "2022-01-08T06:34:18.598Z",
          "lat": -10.212,
          "lon": -16.002
        }
        "#;

        let story: RemoteStory = serde_json::from_str(payload).unwrap();
        assert_eq!(story.id, "story-abc");
        assert_eq!(story.photo_url, "https://cdn.example.com/photos/abc.jpg");
        assert_eq!(story.lat, Some(-10.212));
    }

    #[test]
    fn remote_story_tolerates_missing_coordinates() {
        let payload = r#"
        {
          "id": "story-xyz",
          "name": "Arif",
          "description": "No location attached",
          "photoUrl": "https://cdn.example.com/photos/xyz.jpg",
          "createdAt": "2022-01-08T06:34:18.598Z"
        }
        "#;

        let story: RemoteStory = serde_json::from_str(payload).unwrap();
        assert_eq!(story.lat, None);
        assert_eq!(story.lon, None);
    }
}
