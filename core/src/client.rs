//! Stateless HTTP request builder and response parser for the notes API.
//!
//! # Design
//! `NotesClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `build` and `parse` route a `NoteRequest` to the matching pair so the
//! dispatcher can treat all four operations uniformly.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateNote, DeleteAck, Note, NoteRequest, NoteResponse, UpdateNote};

/// Synchronous, stateless client for the notes API.
#[derive(Debug, Clone)]
pub struct NotesClient {
    base_url: String,
}

impl NotesClient {
    /// An empty `base_url` produces same-origin relative paths.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build(&self, request: &NoteRequest) -> Result<HttpRequest, ApiError> {
        match request {
            NoteRequest::List => Ok(self.build_list_notes()),
            NoteRequest::Create(input) => self.build_create_note(input),
            NoteRequest::Update { id, changes } => self.build_update_note(id, changes),
            NoteRequest::Delete { id } => Ok(self.build_delete_note(id)),
        }
    }

    pub fn parse(&self, request: &NoteRequest, response: HttpResponse) -> Result<NoteResponse, ApiError> {
        match request {
            NoteRequest::List => self.parse_list_notes(response).map(NoteResponse::Notes),
            NoteRequest::Create(_) => self.parse_create_note(response).map(NoteResponse::Note),
            NoteRequest::Update { .. } => self.parse_update_note(response).map(NoteResponse::Note),
            NoteRequest::Delete { .. } => self.parse_delete_note(response).map(NoteResponse::Deleted),
        }
    }

    pub fn build_list_notes(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/notes", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_note(&self, input: &CreateNote) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/notes", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_update_note(&self, id: &str, input: &UpdateNote) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/notes/{id}", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_note(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/notes/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_notes(&self, response: HttpResponse) -> Result<Vec<Note>, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_create_note(&self, response: HttpResponse) -> Result<Note, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_update_note(&self, response: HttpResponse) -> Result<Note, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    /// Any 2xx counts as success; the payload is ignored.
    pub fn parse_delete_note(&self, response: HttpResponse) -> Result<DeleteAck, ApiError> {
        check_status(&response)?;
        Ok(DeleteAck::OK)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
