//! lore-core - Core library for Lore
//!
//! This crate contains the shared models, offline story ledger, connectivity
//! tracking, and sync logic used by all Lore interfaces.

pub mod auth;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod models;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{DraftId, NewStory, PhotoBlob, StoryDraft, SyncReport};
