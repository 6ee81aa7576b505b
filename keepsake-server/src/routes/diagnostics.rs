//! `GET /test`: a status report that never fails.
//!
//! Each probe is guarded on its own, so a broken store degrades the `database` and
//! `collections` fields but the endpoint still answers 200.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::warn;

use crate::server::AppState;

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_or_not(set: bool) -> String {
    if set { "✅ Set" } else { "❌ Not Set" }.to_string()
}

pub async fn diagnostics(State(state): State<AppState>) -> Json<Diagnostics> {
    let mut report = Diagnostics {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: set_or_not(state.database_url_set),
        database_name: set_or_not(state.database_name_set),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if state.store.is_connected() {
        report.connection_status = "Connected".to_string();

        match state.store.list_collections().await {
            Ok(mut names) => {
                names.truncate(MAX_COLLECTIONS);
                report.collections = names;
                report.database = "✅ Connected & Working".to_string();
            }
            Err(err) => {
                warn!(error = %err, "collection probe failed");
                let reason: String = err.to_string().chars().take(MAX_ERROR_CHARS).collect();
                report.database = format!("⚠️  Connected but Error: {reason}");
            }
        }
    }

    Json(report)
}
