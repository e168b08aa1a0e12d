//! Locally persisted substitute for the remote notes API.
//!
//! # Responsibility
//! - Serve list/create/update/delete with the remote API's contract whenever
//!   the remote path fails.
//! - Seed the collection with two sample notes on first use.
//!
//! # Invariants
//! - Every operation re-reads persisted state, mutates it, and re-persists;
//!   nothing is cached between calls.
//! - A missing or undecodable record is treated as absent and replaced by the
//!   seed before use.
//! - `updated_at` never moves backwards and never precedes `created_at`.
//! - Lists are ordered by `updated_at` descending; ties keep stored order.
//!
//! Concurrent callers race on the read-modify-write cycle and the later
//! persist wins.

use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use uuid::Uuid;

use crate::error::NotesError;
use crate::storage::Storage;
use crate::types::{
    normalize_title, CreateNote, DeleteAck, Note, NoteRequest, NoteResponse, Timestamp, UpdateNote,
};

/// Key under which the note collection is persisted.
pub const STORAGE_KEY: &str = "notes_mock_store_v1";

/// Delay applied before every operation so loading indicators behave the
/// same on both paths.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(120);

pub const WELCOME_TITLE: &str = "Welcome to Simple Notes";
pub const TIPS_TITLE: &str = "Tips";

const WELCOME_CONTENT: &str = "This is a demo note. You can create, edit, and delete notes.\n\nIf the backend is not available, your notes are stored locally.";
const TIPS_CONTENT: &str = "- Click a note to edit\n- Use the + New Note button to create\n- Use the trash icon to delete\n- Changes save instantly";

/// Persisted layout: `{"notes": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    notes: Vec<Note>,
}

impl Snapshot {
    fn seed(now: Timestamp) -> Self {
        let sample = |id: &str, title: &str, content: &str| Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now.clone(),
            updated_at: now.clone(),
            extra: Map::new(),
        };
        Self {
            notes: vec![
                sample("1", WELCOME_TITLE, WELCOME_CONTENT),
                sample("2", TIPS_TITLE, TIPS_CONTENT),
            ],
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }
}

/// Fallback note store over an injected [`Storage`] handle.
#[derive(Debug)]
pub struct LocalStore<S> {
    storage: S,
    latency: Duration,
}

impl<S: Storage> LocalStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            latency: SIMULATED_LATENCY,
        }
    }

    /// Overrides the simulated latency; `Duration::ZERO` disables it.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Executes `request` and wraps the result in the matching response shape.
    pub async fn handle(&self, request: NoteRequest) -> Result<NoteResponse, NotesError> {
        match request {
            NoteRequest::List => self.list().await.map(NoteResponse::Notes),
            NoteRequest::Create(input) => self.create(input).await.map(NoteResponse::Note),
            NoteRequest::Update { id, changes } => {
                self.update(&id, changes).await.map(NoteResponse::Note)
            }
            NoteRequest::Delete { id } => self.delete(&id).await.map(NoteResponse::Deleted),
        }
    }

    pub async fn list(&self) -> Result<Vec<Note>, NotesError> {
        self.simulate_latency().await;
        let mut snapshot = self.load()?;
        snapshot.notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(snapshot.notes)
    }

    pub async fn create(&self, input: CreateNote) -> Result<Note, NotesError> {
        self.simulate_latency().await;
        let mut snapshot = self.load()?;
        let now = Timestamp::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: normalize_title(&input.title),
            content: input.content,
            created_at: now.clone(),
            updated_at: now,
            extra: Map::new(),
        };
        snapshot.notes.insert(0, note.clone());
        self.save(&snapshot)?;
        debug!("local create {}", note.id);
        Ok(note)
    }

    /// Fails with [`NotesError::NotFound`] when `id` is not stored.
    pub async fn update(&self, id: &str, changes: UpdateNote) -> Result<Note, NotesError> {
        self.simulate_latency().await;
        let mut snapshot = self.load()?;
        let idx = snapshot
            .position(id)
            .ok_or_else(|| NotesError::NotFound(id.to_string()))?;

        let note = &mut snapshot.notes[idx];
        if let Some(title) = changes.title {
            note.title = normalize_title(&title);
        }
        if let Some(content) = changes.content {
            note.content = content;
        }
        note.updated_at = Timestamp::now().max(note.updated_at.clone());
        let updated = note.clone();

        self.save(&snapshot)?;
        debug!("local update {id}");
        Ok(updated)
    }

    /// Deleting an unknown id succeeds without touching storage.
    pub async fn delete(&self, id: &str) -> Result<DeleteAck, NotesError> {
        self.simulate_latency().await;
        let mut snapshot = self.load()?;
        if let Some(idx) = snapshot.position(id) {
            snapshot.notes.remove(idx);
            self.save(&snapshot)?;
            debug!("local delete {id}");
        }
        Ok(DeleteAck::OK)
    }

    /// Drops the persisted collection; the next operation reseeds.
    pub fn clear(&self) -> Result<(), NotesError> {
        self.storage.remove_item(STORAGE_KEY)?;
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn load(&self) -> Result<Snapshot, NotesError> {
        if let Some(raw) = self.storage.get_item(STORAGE_KEY)? {
            match serde_json::from_str::<Snapshot>(&raw) {
                Ok(snapshot) => return Ok(snapshot),
                Err(err) => warn!("discarding unreadable note store: {err}"),
            }
        }
        let seed = Snapshot::seed(Timestamp::now());
        self.save(&seed)?;
        info!("seeded local note store with {} sample notes", seed.notes.len());
        Ok(seed)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), NotesError> {
        let raw = serde_json::to_string(snapshot)?;
        self.storage.set_item(STORAGE_KEY, &raw)?;
        Ok(())
    }
}
