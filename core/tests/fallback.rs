//! Public operations keep their contract whichever path answers them.

use std::future::Future;
use std::time::Duration;

use notes_core::store::{STORAGE_KEY, TIPS_TITLE, WELCOME_TITLE};
use notes_core::{
    ApiError, CreateNote, DeleteAck, Dispatcher, HttpRequest, HttpResponse, LocalStore,
    MemoryStorage, NoteRequest, NotesApi, NotesClient, NotesError, Source, Storage, Transport,
    UpdateNote,
};

/// Fails every request before a response exists.
struct Offline;

impl Transport for Offline {
    fn execute(&self, _request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        async { Err(ApiError::Transport("connection refused".to_string())) }
    }
}

/// Answers every request with HTTP 500.
struct Broken;

impl Transport for Broken {
    fn execute(&self, _request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        async {
            Ok(HttpResponse {
                status: 500,
                headers: Vec::new(),
                body: "internal error".to_string(),
            })
        }
    }
}

/// Answers every request with 200 and a body that is not JSON.
struct Garbled;

impl Transport for Garbled {
    fn execute(&self, _request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        async {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: "<!doctype html><p>maintenance</p>".to_string(),
            })
        }
    }
}

/// Accepts every write with a note shaped differently from the local one:
/// numeric id, naive timestamps, an extra field.
struct LooseRemote;

impl Transport for LooseRemote {
    fn execute(&self, _request: HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        async {
            Ok(HttpResponse {
                status: 201,
                headers: Vec::new(),
                body: r#"{"id":7,"title":"Remote","content":"","createdAt":"2024-01-01T00:00:00","updatedAt":"2024-01-01T00:00:00","rev":1}"#.to_string(),
            })
        }
    }
}

fn api<T: Transport>(transport: T) -> NotesApi<T, MemoryStorage> {
    let _ = env_logger::builder().is_test(true).try_init();
    NotesApi::new(
        Dispatcher::new(NotesClient::new("http://notes.invalid"), transport),
        LocalStore::new(MemoryStorage::new()).with_latency(Duration::from_millis(2)),
    )
}

fn draft(title: &str) -> CreateNote {
    CreateNote {
        title: title.to_string(),
        content: String::new(),
    }
}

async fn exercise_contract<T: Transport>(api: NotesApi<T, MemoryStorage>) {
    // Seeding on first list.
    let notes = api.list().await.unwrap();
    let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec![WELCOME_TITLE, TIPS_TITLE]);

    // Create with a blank title.
    let n1 = api.create(draft("  ")).await.unwrap();
    assert!(!n1.id.is_empty());
    assert_eq!(n1.title, "Untitled");
    assert_eq!(n1.created_at, n1.updated_at);

    let n2 = api.create(draft("Second")).await.unwrap();
    assert!(api.list().await.unwrap().iter().any(|n| n.id == n2.id));

    // Update N1 so it moves ahead of N2.
    let updated = api
        .update(
            &n1.id,
            UpdateNote {
                title: Some("First".to_string()),
                content: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, n1.id);
    assert_eq!(updated.created_at, n1.created_at);
    assert!(updated.updated_at >= n1.updated_at);

    let ids: Vec<String> = api.list().await.unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(ids[0], n1.id);
    assert_eq!(ids[1], n2.id);

    // Update on a missing id surfaces NotFound.
    let err = api.update("missing", UpdateNote::default()).await.unwrap_err();
    assert!(matches!(err, NotesError::NotFound(_)));

    // Delete twice.
    assert_eq!(api.delete(&n2.id).await.unwrap(), DeleteAck::OK);
    let after_first = api.list().await.unwrap();
    assert_eq!(api.delete(&n2.id).await.unwrap(), DeleteAck::OK);
    let after_second = api.list().await.unwrap();
    assert_eq!(after_first.len(), after_second.len());
    assert!(after_second.iter().all(|n| n.id != n2.id));
}

#[tokio::test]
async fn network_failure_falls_back_for_every_operation() {
    exercise_contract(api(Offline)).await;
}

#[tokio::test]
async fn server_error_falls_back_for_every_operation() {
    exercise_contract(api(Broken)).await;
}

#[tokio::test]
async fn non_json_body_falls_back_for_every_operation() {
    exercise_contract(api(Garbled)).await;
}

#[tokio::test]
async fn fallback_is_reported_as_source() {
    for served in [
        api(Broken).send(NoteRequest::List).await.unwrap(),
        api(Garbled).send(NoteRequest::List).await.unwrap(),
        api(Offline).send(NoteRequest::List).await.unwrap(),
    ] {
        assert_eq!(served.source, Source::Fallback);
    }
}

#[tokio::test]
async fn loosely_shaped_remote_note_is_not_replayed_locally() {
    let api = api(LooseRemote);
    let served = api.send(NoteRequest::Create(draft("Remote"))).await.unwrap();
    assert_eq!(served.source, Source::Remote);

    let note = served.response.into_note().unwrap();
    assert_eq!(note.id, "7");
    assert_eq!(note.created_at.as_str(), "2024-01-01T00:00:00");
    assert_eq!(note.extra["rev"], 1);

    // The local store was never touched, so it was never seeded either.
    assert_eq!(api.local().storage().get_item(STORAGE_KEY).unwrap(), None);
}

#[tokio::test]
async fn fallback_state_persists_across_api_instances() {
    let tmp = tempfile::tempdir().unwrap();
    let build = || {
        NotesApi::new(
            Dispatcher::new(NotesClient::new(""), Offline),
            LocalStore::new(notes_core::FileStorage::new(tmp.path())).with_latency(Duration::ZERO),
        )
    };

    let created = build().create(draft("Survives restart")).await.unwrap();
    let notes = build().list().await.unwrap();
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0], created);
}
