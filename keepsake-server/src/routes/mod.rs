//! HTTP routes.

mod diagnostics;
mod records;
mod root;

use axum::{Router, routing::get};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    records::{Movie, Note, Photo, Plan, Song},
    server::AppState,
};

pub use diagnostics::Diagnostics;

/// Builds the application router with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/test", get(diagnostics::diagnostics))
        .merge(records::routes::<Photo>("/photos"))
        .merge(records::routes::<Song>("/songs"))
        .merge(records::routes::<Movie>("/movies"))
        .merge(records::routes::<Note>("/notes"))
        .merge(records::routes::<Plan>("/plans"))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Any origin, method and header, with credentials. Browsers refuse a wildcard origin
/// alongside credentials, so everything is mirrored from the request instead.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
