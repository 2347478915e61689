//! Local story ledger.
//!
//! The durable, ordered list of locally authored story drafts. The ledger is
//! the only owner of the persisted representation: every mutation goes
//! through `append`/`mark_synced`, and each mutation rewrites the full
//! snapshot under one storage key.

use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::models::{DraftId, NewStory, StoryDraft};
use crate::store::SnapshotStore;

/// Storage key holding the serialized ledger
pub const LEDGER_KEY: &str = "offline_stories";

/// Ordered collection of story drafts backed by a snapshot store
pub struct StoryLedger<S: SnapshotStore> {
    store: S,
    drafts: Mutex<Vec<StoryDraft>>,
}

impl<S: SnapshotStore> StoryLedger<S> {
    /// Open the ledger, loading any previously persisted snapshot.
    ///
    /// An absent snapshot yields an empty ledger, never an error.
    pub fn open(store: S) -> Result<Self> {
        let drafts = match store.load(LEDGER_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(Self {
            store,
            drafts: Mutex::new(drafts),
        })
    }

    /// Append a new pending draft and persist the updated ledger.
    ///
    /// Assigns the draft id and creation timestamp. On a persistence
    /// failure the in-memory list is rolled back so it never diverges from
    /// the stored snapshot.
    pub fn append(&self, story: NewStory) -> Result<StoryDraft> {
        let draft = StoryDraft::new(story);
        let mut drafts = self.lock();
        drafts.push(draft.clone());

        if let Err(error) = self.persist(&drafts) {
            drafts.pop();
            return Err(error);
        }
        Ok(draft)
    }

    /// Snapshot of every draft, in insertion order
    #[must_use]
    pub fn list_all(&self) -> Vec<StoryDraft> {
        self.lock().clone()
    }

    /// Snapshot of unsynced drafts, preserving insertion order
    #[must_use]
    pub fn list_pending(&self) -> Vec<StoryDraft> {
        self.lock()
            .iter()
            .filter(|draft| !draft.synced)
            .cloned()
            .collect()
    }

    /// Number of unsynced drafts
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().iter().filter(|draft| !draft.synced).count()
    }

    /// Flip a draft to synced and persist the full ledger.
    ///
    /// A no-op (not an error) when `id` is absent - entries may have been
    /// pruned externally. The flag only ever transitions false to true; a
    /// persistence failure reverts the in-memory flag so the entry stays
    /// pending.
    pub fn mark_synced(&self, id: DraftId) -> Result<()> {
        let mut drafts = self.lock();
        let Some(index) = drafts.iter().position(|draft| draft.id == id) else {
            return Ok(());
        };

        let was_synced = drafts[index].synced;
        drafts[index].synced = true;

        if let Err(error) = self.persist(&drafts) {
            drafts[index].synced = was_synced;
            return Err(error);
        }
        Ok(())
    }

    fn persist(&self, drafts: &[StoryDraft]) -> Result<()> {
        let raw = serde_json::to_string(drafts)?;
        self.store.save(LEDGER_KEY, &raw)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StoryDraft>> {
        self.drafts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
