//! Public note operations: try the remote service, fall back to the local
//! store.
//!
//! # Design
//! The fallback is an explicit two-stage strategy. `send` hands the request
//! to the `Dispatcher`; any `ApiError` is logged and the same request is
//! replayed against the `LocalStore`. Remote failures are therefore never
//! visible to callers; only errors from the local store are. `Served` records
//! which stage answered so tests can assert on it.

use log::warn;

use crate::client::NotesClient;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::NotesError;
use crate::storage::Storage;
use crate::store::LocalStore;
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreateNote, DeleteAck, Note, NoteRequest, NoteResponse, UpdateNote};

/// Which stage of the strategy produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    Fallback,
}

/// A response together with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub source: Source,
    pub response: NoteResponse,
}

pub struct NotesApi<T, S> {
    remote: Dispatcher<T>,
    local: LocalStore<S>,
}

impl<S: Storage> NotesApi<UreqTransport, S> {
    /// Remote base address from `config`, ureq transport, default latency.
    pub fn from_config(config: &Config, storage: S) -> Self {
        let client = NotesClient::new(&config.api_base_url);
        Self::new(
            Dispatcher::new(client, UreqTransport::new()),
            LocalStore::new(storage),
        )
    }
}

impl<T: Transport, S: Storage> NotesApi<T, S> {
    pub fn new(remote: Dispatcher<T>, local: LocalStore<S>) -> Self {
        Self { remote, local }
    }

    pub fn local(&self) -> &LocalStore<S> {
        &self.local
    }

    pub async fn send(&self, request: NoteRequest) -> Result<Served, NotesError> {
        match self.remote.dispatch(&request).await {
            Ok(response) => Ok(Served {
                source: Source::Remote,
                response,
            }),
            Err(err) => {
                warn!(
                    "{} {} failed remotely ({err}); using local store",
                    request.method(),
                    request.path()
                );
                let response = self.local.handle(request).await?;
                Ok(Served {
                    source: Source::Fallback,
                    response,
                })
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<Note>, NotesError> {
        self.send(NoteRequest::List).await?.response.into_notes()
    }

    pub async fn create(&self, input: CreateNote) -> Result<Note, NotesError> {
        self.send(NoteRequest::Create(input)).await?.response.into_note()
    }

    /// On the fallback path an unknown `id` fails with `NotesError::NotFound`.
    pub async fn update(&self, id: &str, changes: UpdateNote) -> Result<Note, NotesError> {
        let request = NoteRequest::Update {
            id: id.to_string(),
            changes,
        };
        self.send(request).await?.response.into_note()
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteAck, NotesError> {
        let request = NoteRequest::Delete { id: id.to_string() };
        self.send(request).await?.response.into_delete_ack()
    }
}
