//! Domain types for the notes API.
//!
//! # Design
//! `Note` mirrors the remote service's JSON schema (camelCase keys, ISO-8601
//! timestamps) and is also the record persisted by the fallback store, so a
//! caller gets the same shape from either path. The mock-server crate defines
//! its own copy; integration tests catch schema drift between the two.
//!
//! Decoding is lenient: whatever JSON object the remote answers with is
//! returned as a `Note`. Scalar ids are kept as their text, timestamps are
//! kept verbatim, missing fields default, and unknown fields are carried in
//! `extra`. Only a body that is not JSON, or not a JSON object where a note is
//! expected, fails to decode.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::NotesError;
use crate::http::HttpMethod;

/// Title given to notes saved with a blank title.
pub const UNTITLED: &str = "Untitled";

/// A single note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, deserialize_with = "scalar_text")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub content: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
    /// Fields the remote sent beyond the known ones, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An ISO-8601 timestamp kept exactly as written.
///
/// Ordering compares the instant when the text parses (RFC 3339, or a naive
/// date-time read as UTC); unparseable values sort before every parseable one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.0) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.0, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant()
            .cmp(&other.instant())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        scalar_text(deserializer).map(Timestamp)
    }
}

/// Strings as-is, `null` as empty, any other value as its JSON text.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Request payload for creating a note.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Request payload for updating a note. Only the fields present are applied;
/// omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Result of a delete. Always `success: true`; deleting an unknown id is not
/// an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAck {
    pub success: bool,
}

impl DeleteAck {
    pub const OK: DeleteAck = DeleteAck { success: true };
}

/// Trims `title` and substitutes [`UNTITLED`] when nothing is left.
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// One of the four operations of the notes API.
///
/// The same request value is first sent to the remote service and, if that
/// fails, replayed against the fallback store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteRequest {
    List,
    Create(CreateNote),
    Update { id: String, changes: UpdateNote },
    Delete { id: String },
}

impl NoteRequest {
    pub fn method(&self) -> HttpMethod {
        match self {
            NoteRequest::List => HttpMethod::Get,
            NoteRequest::Create(_) => HttpMethod::Post,
            NoteRequest::Update { .. } => HttpMethod::Put,
            NoteRequest::Delete { .. } => HttpMethod::Delete,
        }
    }

    /// Resource path relative to the base address.
    pub fn path(&self) -> String {
        match self {
            NoteRequest::List | NoteRequest::Create(_) => "/notes".to_string(),
            NoteRequest::Update { id, .. } | NoteRequest::Delete { id } => format!("/notes/{id}"),
        }
    }
}

/// Result shapes of the notes API: a list, a single note, or a delete ack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteResponse {
    Notes(Vec<Note>),
    Note(Note),
    Deleted(DeleteAck),
}

impl NoteResponse {
    pub fn into_notes(self) -> Result<Vec<Note>, NotesError> {
        match self {
            NoteResponse::Notes(notes) => Ok(notes),
            other => Err(NotesError::UnexpectedResponse(other.kind())),
        }
    }

    pub fn into_note(self) -> Result<Note, NotesError> {
        match self {
            NoteResponse::Note(note) => Ok(note),
            other => Err(NotesError::UnexpectedResponse(other.kind())),
        }
    }

    pub fn into_delete_ack(self) -> Result<DeleteAck, NotesError> {
        match self {
            NoteResponse::Deleted(ack) => Ok(ack),
            other => Err(NotesError::UnexpectedResponse(other.kind())),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            NoteResponse::Notes(_) => "note list",
            NoteResponse::Note(_) => "note",
            NoteResponse::Deleted(_) => "delete acknowledgement",
        }
    }
}
