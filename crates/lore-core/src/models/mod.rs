//! Data models for Lore

mod draft;
mod report;
mod story;

pub use draft::{DraftId, NewStory, PhotoBlob, StoryDraft};
pub use report::SyncReport;
pub use story::{RemoteStory, RemoteStoryId};
