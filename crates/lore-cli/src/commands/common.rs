use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lore_core::config::ApiConfig;
use lore_core::connectivity::ConnectivityObserver;
use lore_core::gateway::{HttpStoryGateway, StoryGateway};
use lore_core::ledger::StoryLedger;
use lore_core::models::{PhotoBlob, RemoteStory, StoryDraft};
use lore_core::store::FileSnapshotStore;
use lore_core::sync::SyncOrchestrator;
use serde::Serialize;

use crate::error::CliError;
use crate::session::SessionStore;

/// Resolve the directory holding the offline ledger
pub fn resolve_data_dir(overridden: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(dir) = overridden {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join("lore"))
        .ok_or(CliError::NoDataDir)
}

pub fn open_ledger(data_dir: &Path) -> Result<Arc<StoryLedger<FileSnapshotStore>>, CliError> {
    let store = FileSnapshotStore::open(data_dir)?;
    Ok(Arc::new(StoryLedger::open(store)?))
}

pub fn build_gateway() -> Result<HttpStoryGateway<SessionStore>, CliError> {
    let config = ApiConfig::from_env()?;
    Ok(HttpStoryGateway::new(config, SessionStore::new())?)
}

/// Wire the ledger, gateway, and connectivity into an orchestrator.
///
/// A one-shot CLI process has no live reachability signal, so the observer
/// starts online and a failing direct submission falls back to the queue.
pub fn build_orchestrator(
    data_dir: &Path,
) -> Result<
    (
        SyncOrchestrator<FileSnapshotStore>,
        Arc<StoryLedger<FileSnapshotStore>>,
    ),
    CliError,
> {
    let ledger = open_ledger(data_dir)?;
    let gateway: Arc<dyn StoryGateway> = Arc::new(build_gateway()?);
    let (observer, _handle) = ConnectivityObserver::new(true);
    let orchestrator = SyncOrchestrator::new(Arc::clone(&ledger), gateway, observer);
    Ok((orchestrator, ledger))
}

/// Load a photo from disk into an in-memory blob
pub fn read_photo(path: &Path) -> Result<PhotoBlob, CliError> {
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Err(CliError::EmptyPhoto(path.display().to_string()));
    }
    let file_name = path
        .file_name()
        .map_or_else(|| "photo".to_string(), |name| name.to_string_lossy().into_owned());
    Ok(PhotoBlob::new(file_name, guess_content_type(path), bytes))
}

/// Map a file extension to the MIME type sent to the service
pub fn guess_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn normalize_description(raw: &str) -> Result<String, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Serialize)]
pub struct DraftListItem {
    pub id: String,
    pub description: String,
    pub photo_file: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub created_at: String,
    pub synced: bool,
}

pub fn draft_to_item(draft: &StoryDraft) -> DraftListItem {
    DraftListItem {
        id: draft.id.as_str(),
        description: draft.description.clone(),
        photo_file: draft.photo.file_name.clone(),
        lat: draft.lat,
        lon: draft.lon,
        created_at: format_timestamp(draft.created_at),
        synced: draft.synced,
    }
}

pub fn format_draft_lines(drafts: &[StoryDraft]) -> Vec<String> {
    drafts
        .iter()
        .map(|draft| {
            let status = if draft.synced { "synced " } else { "pending" };
            format!(
                "{}  {}  {}  {}",
                draft.id,
                status,
                format_timestamp(draft.created_at),
                draft.preview(60)
            )
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct StoryListItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub photo_url: String,
    pub created_at: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub fn story_to_item(story: &RemoteStory) -> StoryListItem {
    StoryListItem {
        id: story.id.clone(),
        name: story.name.clone(),
        description: story.description.clone(),
        photo_url: story.photo_url.clone(),
        created_at: format_timestamp(story.created_at),
        lat: story.lat,
        lon: story.lon,
    }
}

pub fn format_story_lines(stories: &[RemoteStory]) -> Vec<String> {
    stories
        .iter()
        .map(|story| {
            let location = match (story.lat, story.lon) {
                (Some(lat), Some(lon)) => format!("  ({lat}, {lon})"),
                _ => String::new(),
            };
            format!(
                "{}  {}  {}: {}{}",
                story.id,
                format_timestamp(story.created_at),
                story.name,
                preview(&story.description, 60),
                location
            )
        })
        .collect()
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn preview(text: &str, max_len: usize) -> String {
    text.lines().next().unwrap_or("").chars().take(max_len).collect()
}
