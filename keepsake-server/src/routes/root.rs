use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Status {
    message: &'static str,
}

pub async fn root() -> Json<Status> {
    Json(Status {
        message: "Couples App Backend is running",
    })
}
