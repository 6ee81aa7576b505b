//! In-memory document storage backend for keepsake.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and backs the service in tests
//! and local development.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **MongoDB-shaped identifiers** - Every inserted document gets a fresh ObjectId under `_id`
//! - **Equality filters** - Same matching rules as MongoDB for the filters the service issues
//!
//! # Quick Start
//!
//! ```ignore
//! use keepsake::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let id = store.create("note", doc! { "author": "A", "content": "hello" }).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as keepsake_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
