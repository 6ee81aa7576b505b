//! Generic create and list handlers, instantiated once per record type.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    routing::post,
};
use futures::TryStreamExt;
use keepsake::document::expose_identifier;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::{error::ApiError, records::Resource, server::AppState};

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

/// `POST path` creates a record, `GET path` lists them.
pub fn routes<R: Resource>(path: &str) -> Router<AppState> {
    Router::new().route(path, post(create::<R>).get(list::<R>))
}

/// The body is parsed as JSON whatever its `Content-Type` says.
async fn create<R: Resource>(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Created>, ApiError> {
    let Json(record) = Json::<R>::from_bytes(&body?)?;

    let id = state
        .store
        .typed_collection::<R>()?
        .create(&record)
        .await?;

    info!(collection = R::collection_name(), %id, "record created");

    Ok(Json(Created { id }))
}

async fn list<R: Resource>(
    State(state): State<AppState>,
    query: Result<Query<R::ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let Query(query) = query?;

    let documents = state
        .store
        .typed_collection::<R>()?
        .list(R::filter(query))
        .await?
        .and_then(|document| async move { expose_identifier(document) })
        .try_collect::<Vec<_>>()
        .await?;

    Ok(Json(documents))
}
