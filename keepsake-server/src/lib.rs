//! Keepsake server
//!
//! A small REST service over five document collections (photos, songs, movies, notes and
//! plans). Each collection supports creating a record and listing records; listings hide the
//! store's internal identifier behind a string `id`.

pub mod config;
pub mod error;
pub mod logging;
pub mod records;
pub mod routes;
pub mod server;

pub use config::Args;
pub use error::ApiError;
pub use routes::router;
pub use server::AppState;
