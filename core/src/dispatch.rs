//! Remote half of the fetch-then-fallback strategy.

use log::debug;

use crate::client::NotesClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{NoteRequest, NoteResponse};

/// Sends a `NoteRequest` to the remote service exactly once.
///
/// Any failure (transport error, non-2xx status, unparseable payload) comes
/// back as `ApiError`; there is no retry and no timeout distinct from the
/// transport's own.
#[derive(Debug, Clone)]
pub struct Dispatcher<T> {
    client: NotesClient,
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(client: NotesClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub async fn dispatch(&self, request: &NoteRequest) -> Result<NoteResponse, ApiError> {
        let http = self.client.build(request)?;
        debug!("remote {} {}", http.method, http.path);
        let response = self.transport.execute(http).await?;
        self.client.parse(request, response)
    }
}
