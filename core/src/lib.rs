//! Notes API client with a locally persisted fallback store.
//!
//! # Overview
//! Every public operation (list, create, update, delete) is first sent to the
//! remote notes service. If that fails for any reason the same operation is
//! served by a local store that mimics the service's contract, so callers only
//! ever see data, never transport errors.
//!
//! # Design
//! - `NotesClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - `Transport` executes requests; `UreqTransport` is the production
//!   implementation and tests inject their own.
//! - `Dispatcher` makes exactly one remote attempt per request.
//! - `LocalStore` persists notes through an injected `Storage` handle and
//!   seeds sample notes on first use.
//! - `NotesApi` composes the two stages and reports which one answered.

pub mod api;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod storage;
pub mod store;
pub mod transport;
pub mod types;

pub use api::{NotesApi, Served, Source};
pub use client::NotesClient;
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{ApiError, NotesError, StorageError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::LocalStore;
pub use transport::{Transport, UreqTransport};
pub use types::{CreateNote, DeleteAck, Note, NoteRequest, NoteResponse, Timestamp, UpdateNote};
