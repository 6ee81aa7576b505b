//! MongoDB backend implementation for keepsake.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait. Documents
//! are inserted with `insert_one`, identity is the server-assigned ObjectId under `_id`, and
//! listing runs a `find` whose cursor is handed out as a lazy stream.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! keepsake = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The driver connects lazily: building the store only parses the connection string.
//! Call [`StoreBackend::ping`](keepsake_core::backend::StoreBackend::ping) to find out
//! whether the deployment is reachable.
//!
//! # Example
//!
//! ```ignore
//! use keepsake::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "couples")
//!         .timeout(Duration::from_secs(3))
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as keepsake_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
