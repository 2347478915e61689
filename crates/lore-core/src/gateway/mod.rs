//! Submission gateway to the remote story service.
//!
//! The sole path through which a draft's payload reaches the service. The
//! gateway never retries on its own; retry is the sync orchestrator's job,
//! applied at the next sync opportunity.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::auth::CredentialStore;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{PhotoBlob, RemoteStory, RemoteStoryId};
use crate::util::remote_error;

/// Remote story submission contract
#[async_trait]
pub trait StoryGateway: Send + Sync {
    /// Submit one story payload, returning the server-assigned id
    async fn submit(
        &self,
        description: &str,
        photo: &PhotoBlob,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<RemoteStoryId>;
}

/// HTTP client for the story service's authenticated endpoints
pub struct HttpStoryGateway<S: CredentialStore> {
    config: ApiConfig,
    client: Client,
    credentials: S,
}

impl<S: CredentialStore> HttpStoryGateway<S> {
    pub fn new(config: ApiConfig, credentials: S) -> Result<Self> {
        Ok(Self {
            config,
            client: Client::builder().build()?,
            credentials,
        })
    }

    /// Submit a story without an account (`stories/guest` endpoint)
    pub async fn submit_guest(
        &self,
        description: &str,
        photo: &PhotoBlob,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<RemoteStoryId> {
        validate_payload(description, photo)?;
        let form = story_form(description, photo, lat, lon)?;

        let response = self
            .client
            .post(self.config.endpoint("stories/guest"))
            .multipart(form)
            .send()
            .await?;
        parse_create_response(response).await
    }

    /// Fetch a page of stories from the service
    pub async fn list_stories(
        &self,
        page: Option<u32>,
        size: Option<u32>,
        include_location: bool,
    ) -> Result<Vec<RemoteStory>> {
        let token = self.token()?;

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = size {
            query.push(("size", size.to_string()));
        }
        if include_location {
            query.push(("location", "1".to_string()));
        }

        let response = self
            .client
            .get(self.config.endpoint("stories"))
            .query(&query)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }

        let payload = response.json::<ListStoriesResponse>().await?;
        Ok(payload.list_story)
    }

    /// Fetch a single story by its server-assigned id
    pub async fn story_detail(&self, id: &str) -> Result<RemoteStory> {
        let token = self.token()?;

        let response = self
            .client
            .get(self.config.endpoint(&format!("stories/{id}")))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }

        let payload = response.json::<StoryDetailResponse>().await?;
        payload
            .story
            .ok_or_else(|| Error::Payload("response did not include a story".to_string()))
    }

    fn token(&self) -> Result<String> {
        self.credentials.credential()?.ok_or(Error::AuthRequired)
    }
}

#[async_trait]
impl<S: CredentialStore> StoryGateway for HttpStoryGateway<S> {
    async fn submit(
        &self,
        description: &str,
        photo: &PhotoBlob,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<RemoteStoryId> {
        validate_payload(description, photo)?;
        let token = self.token()?;
        let form = story_form(description, photo, lat, lon)?;

        let response = self
            .client
            .post(self.config.endpoint("stories"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        parse_create_response(response).await
    }
}

fn validate_payload(description: &str, photo: &PhotoBlob) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::Validation(
            "Story description must not be empty".to_string(),
        ));
    }
    if photo.is_empty() {
        return Err(Error::Validation(
            "Story photo must carry image data".to_string(),
        ));
    }
    Ok(())
}

fn story_form(
    description: &str,
    photo: &PhotoBlob,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Form> {
    let part = Part::bytes(photo.bytes.clone())
        .file_name(photo.file_name.clone())
        .mime_str(&photo.content_type)?;

    let mut form = Form::new()
        .text("description", description.to_string())
        .part("photo", part);
    if let Some(lat) = lat {
        form = form.text("lat", lat.to_string());
    }
    if let Some(lon) = lon {
        form = form.text("lon", lon.to_string());
    }
    Ok(form)
}

async fn parse_create_response(response: reqwest::Response) -> Result<RemoteStoryId> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(remote_error(status, &body));
    }

    let payload = response.json::<CreateStoryResponse>().await?;
    payload.into_story_id()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateStoryResponse {
    id: Option<String>,
    story_id: Option<String>,
    story: Option<CreatedStory>,
}

#[derive(Debug, Deserialize)]
struct CreatedStory {
    id: Option<String>,
}

impl CreateStoryResponse {
    fn into_story_id(self) -> Result<RemoteStoryId> {
        self.id
            .or(self.story_id)
            .or_else(|| self.story.and_then(|story| story.id))
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(RemoteStoryId)
            .ok_or_else(|| Error::Payload("response did not include a story id".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListStoriesResponse {
    #[serde(default)]
    list_story: Vec<RemoteStory>,
}

#[derive(Debug, Deserialize)]
struct StoryDetailResponse {
    story: Option<RemoteStory>,
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::AuthSession;

    #[derive(Default)]
    struct MemoryCredentials {
        session: Mutex<Option<AuthSession>>,
    }

    impl CredentialStore for MemoryCredentials {
        fn load_session(&self) -> Result<Option<AuthSession>> {
            Ok(self.session.lock().unwrap().clone())
        }

        fn save_session(&self, session: &AuthSession) -> Result<()> {
            *self.session.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        fn clear_session(&self) -> Result<()> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    fn gateway() -> HttpStoryGateway<MemoryCredentials> {
        let config = ApiConfig::new("https://story-api.example.com/v1").unwrap();
        HttpStoryGateway::new(config, MemoryCredentials::default()).unwrap()
    }

    fn photo() -> PhotoBlob {
        PhotoBlob::new("photo.jpg", "image/jpeg", vec![1, 2, 3])
    }

    #[tokio::test]
    async fn submit_rejects_empty_description_before_any_network_call() {
        let error = gateway()
            .submit("   ", &photo(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
    }

    #[tokio::test]
    async fn submit_rejects_empty_photo() {
        let empty = PhotoBlob::new("photo.jpg", "image/jpeg", Vec::new());
        let error = gateway().submit("A story", &empty, None, None).await.unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
    }

    #[tokio::test]
    async fn submit_without_credential_is_auth_required() {
        let error = gateway()
            .submit("A story", &photo(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::AuthRequired));
    }

    #[tokio::test]
    async fn list_stories_without_credential_is_auth_required() {
        let error = gateway().list_stories(None, None, false).await.unwrap_err();
        assert!(matches!(error, Error::AuthRequired));
    }

    #[test]
    fn create_response_accepts_flat_and_nested_ids() {
        let flat: CreateStoryResponse =
            serde_json::from_str(r#"{"error": false, "id": "story-1"}"#).unwrap();
        assert_eq!(flat.into_story_id().unwrap(), RemoteStoryId("story-1".to_string()));

        let nested: CreateStoryResponse =
            serde_json::from_str(r#"{"error": false, "story": {"id": "story-2"}}"#).unwrap();
        assert_eq!(
            nested.into_story_id().unwrap(),
            RemoteStoryId("story-2".to_string())
        );
    }

    #[test]
    fn create_response_without_id_is_a_payload_error() {
        let bare: CreateStoryResponse =
            serde_json::from_str(r#"{"error": false, "message": "success"}"#).unwrap();
        assert!(matches!(bare.into_story_id(), Err(Error::Payload(_))));
    }

    #[test]
    fn story_form_builds_with_optional_coordinates() {
        assert!(story_form("desc", &photo(), None, None).is_ok());
        assert!(story_form("desc", &photo(), Some(-6.2), Some(106.8)).is_ok());
    }
}
