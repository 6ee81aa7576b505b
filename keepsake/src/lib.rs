//! Main keepsake crate providing a unified interface to the document store gateway.
//!
//! This crate is the entry point for users of the keepsake storage layer. It re-exports the
//! core types from the sub-crates and provides access to the storage backends.
//!
//! # Features
//!
//! - **Typed records** - Define records with Serde and `#[derive(Document)]`
//! - **One generic gateway** - Create and list in any collection by name or by record type
//! - **Multiple backends** - In-memory and MongoDB storage behind one object-safe trait
//! - **Identifier normalization** - One function turns stored documents into public JSON
//!
//! # Quick Start
//!
//! ```ignore
//! use keepsake::{prelude::*, memory::InMemoryStore};
//! use futures::TryStreamExt;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Document)]
//! #[document(collection = "note")]
//! pub struct Note {
//!     pub author: String,
//!     pub content: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!     let notes = store.typed_collection::<Note>().unwrap();
//!
//!     let id = notes
//!         .create(&Note { author: "A".into(), content: "hello".into() })
//!         .await
//!         .unwrap();
//!
//!     let listed = notes
//!         .list(Filter::new().eq("author", "A"))
//!         .await
//!         .unwrap()
//!         .and_then(|doc| async move { expose_identifier(doc) })
//!         .try_collect::<Vec<_>>()
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(listed[0]["id"], id.as_str());
//! }
//! ```
//!
//! # Disconnected Stores
//!
//! A [`DocumentStore`](store::DocumentStore) can be created without any backend. Every data
//! operation on it fails with `StoreUnavailable`, which lets a service keep serving health
//! and diagnostic endpoints while its database is missing.
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

#[allow(unused_extern_crates)]
extern crate self as keepsake;

pub mod prelude;

pub use keepsake_core::{backend, collection, document, error, filter, store};
pub use keepsake_macros::Document;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use keepsake_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use keepsake_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
