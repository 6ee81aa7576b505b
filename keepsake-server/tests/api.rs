use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use keepsake::{
    backend::{DocumentStream, StoreBackend},
    bson::Document as BsonDocument,
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
    memory::InMemoryStore,
    store::DocumentStore,
};
use keepsake_server::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(store: DocumentStore) -> Router {
    router(AppState::new(store))
}

fn memory_app() -> (Router, InMemoryStore) {
    let backend = InMemoryStore::new();
    (app(DocumentStore::new(backend.clone())), backend)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Answers pings but fails every collection probe.
#[derive(Debug)]
struct BrokenProbe;

#[async_trait]
impl StoreBackend for BrokenProbe {
    fn database_name(&self) -> &str {
        "broken"
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        Ok(())
    }

    async fn insert_document(&self, _: BsonDocument, collection: &str) -> DocumentStoreResult<String> {
        Err(DocumentStoreError::WriteFailure(collection.to_string(), "duplicate key".into()))
    }

    async fn find_documents(&self, _: Filter, _: &str) -> DocumentStoreResult<DocumentStream> {
        Err(DocumentStoreError::StoreUnavailable("server selection timed out".into()))
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Err(DocumentStoreError::Backend(
            "not authorized on couples to execute command { listCollections: 1 }".into(),
        ))
    }
}

#[tokio::test]
async fn test_root_reports_running() {
    let (app, _) = memory_app();
    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Couples App Backend is running" }));
}

#[tokio::test]
async fn test_note_created_then_listed_with_same_id() {
    let (app, _) = memory_app();

    let (status, created) = post(&app, "/notes", json!({ "author": "A", "content": "hello" })).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let (status, listed) = get(&app, "/notes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([{ "id": id, "author": "A", "content": "hello" }]));
}

#[tokio::test]
async fn test_listed_documents_expose_only_public_id() {
    let (app, _) = memory_app();
    post(&app, "/plans", json!({ "author": "B", "title": "Picnic", "_id": "client-chosen" })).await;
    post(&app, "/plans", json!({ "author": "C", "title": "Dinner", "date": "2026-11-02" })).await;

    let (_, listed) = get(&app, "/plans").await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);

    for plan in listed {
        let object = plan.as_object().unwrap();
        assert!(object.get("id").unwrap().is_string());
        assert!(!object.contains_key("_id"));
        assert_ne!(object["id"], "client-chosen");
    }
}

#[tokio::test]
async fn test_photo_favorite_defaults_to_false() {
    let (app, _) = memory_app();
    post(&app, "/photos", json!({ "uploader": "A", "file_url": "https://cdn.example/1.jpg" })).await;

    let (_, listed) = get(&app, "/photos").await;
    assert_eq!(listed[0]["favorite"], json!(false));
    assert_eq!(listed[0]["caption"], Value::Null);
    assert_eq!(listed[0]["file_url"], "https://cdn.example/1.jpg");
}

#[tokio::test]
async fn test_photos_filtered_by_favorites() {
    let (app, _) = memory_app();
    post(&app, "/photos", json!({ "uploader": "A", "file_url": "a.jpg", "favorite": true })).await;
    post(&app, "/photos", json!({ "uploader": "B", "file_url": "b.jpg" })).await;
    post(&app, "/photos", json!({ "uploader": "C", "file_url": "c.jpg", "favorite": false })).await;

    let (_, favorites) = get(&app, "/photos?favorites=true").await;
    let favorites = favorites.as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["uploader"], "A");

    let (_, others) = get(&app, "/photos?favorites=false").await;
    assert_eq!(others.as_array().unwrap().len(), 2);

    let (_, all) = get(&app, "/photos").await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_favorites_accepts_common_boolean_spellings() {
    let (app, _) = memory_app();
    post(&app, "/photos", json!({ "uploader": "A", "file_url": "a.jpg", "favorite": true })).await;
    post(&app, "/photos", json!({ "uploader": "B", "file_url": "b.jpg" })).await;

    for (query, uploader) in [("1", "A"), ("True", "A"), ("off", "B")] {
        let (status, listed) = get(&app, &format!("/photos?favorites={query}")).await;
        assert_eq!(status, StatusCode::OK, "favorites={query}");

        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1, "favorites={query}");
        assert_eq!(listed[0]["uploader"], uploader);
    }
}

#[tokio::test]
async fn test_invalid_favorites_value_is_malformed() {
    let (app, _) = memory_app();
    let (status, body) = get(&app, "/photos?favorites=maybe").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "malformed_request");
}

#[tokio::test]
async fn test_song_without_title_is_rejected_and_not_stored() {
    let (app, backend) = memory_app();
    post(&app, "/songs", json!({ "title": "Holocene", "artist": "Bon Iver" })).await;

    let (status, body) = post(&app, "/songs", json!({ "artist": "Bon Iver" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "malformed_request");
    assert!(body["detail"].as_str().unwrap().contains("title"));

    assert_eq!(backend.count("song").await, 1);
}

#[tokio::test]
async fn test_body_without_content_type_is_parsed_as_json() {
    let (app, backend) = memory_app();
    let request = Request::post("/notes")
        .body(Body::from(json!({ "author": "A", "content": "hello" }).to_string()))
        .unwrap();

    let (status, created) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(created["id"].is_string());
    assert_eq!(backend.count("note").await, 1);
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let (app, backend) = memory_app();
    let content = "x".repeat(3 * 1024 * 1024);
    let (status, body) = post(&app, "/notes", json!({ "author": "A", "content": content })).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "unreadable_body");
    assert_eq!(backend.count("note").await, 0);
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let (app, _) = memory_app();
    let request = Request::post("/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"author\": "))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "malformed_request");
}

#[tokio::test]
async fn test_type_error_names_the_field() {
    let (app, backend) = memory_app();
    let (status, body) = post(&app, "/movies", json!({ "title": "Heat", "year": "nineteen" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("year"));
    assert_eq!(backend.count("movie").await, 0);
}

#[tokio::test]
async fn test_movie_defaults_and_unknown_fields() {
    let (app, backend) = memory_app();
    let (status, _) = post(
        &app,
        "/movies",
        json!({ "title": "Heat", "year": 1995, "rating": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = get(&app, "/movies").await;
    assert_eq!(listed[0]["year"], 1995);
    assert_eq!(listed[0]["watched"], false);
    assert_eq!(listed[0]["planned_by"], Value::Null);
    assert!(listed[0].get("rating").is_none());

    let stored = backend.snapshot("movie").await;
    assert!(!stored[0].contains_key("rating"));
}

#[tokio::test]
async fn test_list_ignores_unknown_query_parameters() {
    let (app, _) = memory_app();
    post(&app, "/notes", json!({ "author": "A", "content": "x" })).await;

    let (status, listed) = get(&app, "/notes?author=B").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_collection_lists_as_empty_array() {
    let (app, _) = memory_app();
    let (status, listed) = get(&app, "/songs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_disconnected_store_is_unavailable() {
    let app = app(DocumentStore::disconnected());

    let (status, body) = post(&app, "/notes", json!({ "author": "A", "content": "hello" })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "store_unavailable");

    let (status, _) = get(&app, "/photos").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_validation_runs_before_store_access() {
    let app = app(DocumentStore::disconnected());
    let (status, _) = post(&app, "/songs", json!({ "artist": "nobody" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_write_failure_is_server_error() {
    let app = app(DocumentStore::new(BrokenProbe));
    let (status, body) = post(&app, "/notes", json!({ "author": "A", "content": "hello" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "write_failure");
}

#[tokio::test]
async fn test_diagnostics_with_working_store() {
    let (app, _) = memory_app();
    post(&app, "/notes", json!({ "author": "A", "content": "hello" })).await;
    post(&app, "/songs", json!({ "title": "Holocene" })).await;

    let (status, body) = get(&app, "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "✅ Running");
    assert_eq!(body["database"], "✅ Connected & Working");
    assert_eq!(body["connection_status"], "Connected");
    assert_eq!(body["database_url"], "❌ Not Set");
    assert_eq!(body["database_name"], "❌ Not Set");
    assert_eq!(body["collections"], json!(["note", "song"]));
}

#[tokio::test]
async fn test_diagnostics_without_store() {
    let app = app(DocumentStore::disconnected());
    let (status, body) = get(&app, "/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "❌ Not Available");
    assert_eq!(body["connection_status"], "Not Connected");
    assert_eq!(body["collections"], json!([]));
}

#[tokio::test]
async fn test_diagnostics_degrade_when_probe_fails() {
    let app = app(DocumentStore::new(BrokenProbe));
    let (status, body) = get(&app, "/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "✅ Running");
    assert_eq!(body["connection_status"], "Connected");
    assert_eq!(body["collections"], json!([]));

    let database = body["database"].as_str().unwrap();
    let reason = database.strip_prefix("⚠️  Connected but Error: ").unwrap();
    assert_eq!(reason.chars().count(), 50);
}

#[tokio::test]
async fn test_diagnostics_caps_collection_list() {
    let (app, backend) = memory_app();
    for i in 0..12 {
        use keepsake::backend::StoreBackend as _;
        backend
            .insert_document(keepsake::bson::doc! { "n": i }, &format!("c{i:02}"))
            .await
            .unwrap();
    }

    let (_, body) = get(&app, "/test").await;
    assert_eq!(body["collections"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_cors_preflight_mirrors_origin_with_credentials() {
    let (app, _) = memory_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/photos")
        .header(header::ORIGIN, "https://us.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://us.example");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
}
