//! Error types for the notes client.
//!
//! # Design
//! `ApiError` covers everything that can go wrong on the remote path. The
//! facade absorbs it and falls back to the local store, so it never reaches
//! callers of the public operations. `NotesError` is what those callers see:
//! a missing note on update, or a failure of the local storage medium.
//! `NotFound` gets a dedicated variant in both because "the resource does not
//! exist" is worth telling apart from "the server returned an unexpected
//! status".

use thiserror::Error;

/// Failure of a remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS,
    /// unresolvable relative URL, I/O error while reading the body).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// Failure of the key-value storage medium behind the fallback store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A writer panicked while holding the in-memory storage lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Error returned by the public note operations.
#[derive(Debug, Error)]
pub enum NotesError {
    /// Update targeted an id that is not in the fallback store.
    #[error("note not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The note collection could not be encoded for persistence.
    #[error("failed to encode notes: {0}")]
    Encode(#[from] serde_json::Error),

    /// A response did not have the shape of the requested operation.
    #[error("unexpected response: got {0}")]
    UnexpectedResponse(&'static str),
}
