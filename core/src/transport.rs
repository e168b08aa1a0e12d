//! Execution of `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the seam between the deterministic request/response
//! mapping and real I/O. Non-2xx responses come back as data so that
//! `NotesClient` interprets status codes in one place; only failures that
//! prevent a response from existing are errors here.

use std::future::Future;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// Production transport backed by a blocking `ureq` agent.
///
/// Each call runs on tokio's blocking pool so async callers are never
/// stalled by socket I/O.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        let agent = self.agent.clone();
        async move {
            tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?
        }
    }
}

fn execute_blocking(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let headers = req.headers;
    let result = match (req.method, req.body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&req.path), &headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(&req.path), &headers).call(),
        (HttpMethod::Post, Some(body)) => {
            with_headers(agent.post(&req.path), &headers).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => with_headers(agent.post(&req.path), &headers).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            with_headers(agent.put(&req.path), &headers).send(body.as_bytes())
        }
        (HttpMethod::Put, None) => with_headers(agent.put(&req.path), &headers).send_empty(),
    };
    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    Ok(HttpResponse { status, headers, body })
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relative_url_fails_as_transport_error() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            path: "/notes".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = UreqTransport::new().execute(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    async fn start_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(mock_server::run(listener));
        format!("http://{addr}")
    }

    fn post_notes(base_url: &str, headers: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{base_url}/notes"),
            headers,
            body: Some(r#"{"title":"Wire"}"#.to_string()),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn request_headers_reach_the_server() {
        let base_url = start_server().await;
        let transport = UreqTransport::new();

        // The server only accepts JSON bodies declared as such.
        let json = vec![("content-type".to_string(), "application/json".to_string())];
        let response = transport.execute(post_notes(&base_url, json)).await.unwrap();
        assert_eq!(response.status, 201);

        let response = transport.execute(post_notes(&base_url, Vec::new())).await.unwrap();
        assert_eq!(response.status, 415);
    }

    #[tokio::test]
    async fn refused_connection_fails_as_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let request = HttpRequest {
            method: HttpMethod::Delete,
            path: format!("http://127.0.0.1:{port}/notes/1"),
            headers: Vec::new(),
            body: None,
        };
        let err = UreqTransport::new().execute(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
