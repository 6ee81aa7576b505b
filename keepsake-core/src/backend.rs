//! Storage backend abstraction for the document store.
//!
//! This module defines the traits that abstract over storage implementations, allowing the
//! gateway to work against MongoDB in production and an in-memory map in tests.
//!
//! # Overview
//!
//! The [`StoreBackend`] trait is the minimal surface the gateway needs from a document
//! database: insert one document, find documents by equality filter, and a few probes used
//! by diagnostics. It is object safe so a backend can be chosen at runtime and shared as
//! `Arc<dyn StoreBackend>`.
//!
//! # Examples
//!
//! ```ignore
//! use keepsake::backend::StoreBackend;
//! use keepsake::filter::Filter;
//! use bson::doc;
//! use futures::TryStreamExt;
//!
//! let id = backend.insert_document(doc! { "author": "A", "content": "hi" }, "note").await?;
//! let notes: Vec<_> = backend
//!     .find_documents(Filter::new().eq("author", "A"), "note")
//!     .await?
//!     .try_collect()
//!     .await?;
//! ```

use async_trait::async_trait;
use bson::Document as BsonDocument;
use futures::stream::BoxStream;
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, filter::Filter};

/// A lazy, finite stream of stored documents.
///
/// Each item still carries the internal identifier field; use
/// [`expose_identifier`](crate::document::expose_identifier) before handing it out.
pub type DocumentStream = BoxStream<'static, DocumentStoreResult<BsonDocument>>;

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single instance is shared by every in-flight
/// request. Backends perform no retries: a failed call is reported to its caller as is.
///
/// # Error Handling
///
/// Backends report an unreachable store as
/// [`DocumentStoreError::StoreUnavailable`](crate::error::DocumentStoreError::StoreUnavailable)
/// and a rejected insertion as
/// [`DocumentStoreError::WriteFailure`](crate::error::DocumentStoreError::WriteFailure).
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Returns the name of the database this backend reads and writes.
    fn database_name(&self) -> &str;

    /// Checks that the store answers requests.
    async fn ping(&self) -> DocumentStoreResult<()>;

    /// Inserts one document into a collection and returns its newly assigned identifier.
    ///
    /// The backend assigns the identifier and stores it under
    /// [`INTERNAL_ID_FIELD`](crate::document::INTERNAL_ID_FIELD), replacing any value the
    /// document already had there. The collection is created if it does not exist.
    ///
    /// # Arguments
    ///
    /// * `document` - The document body to store
    /// * `collection` - The name of the collection to insert into
    async fn insert_document(
        &self,
        document: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<String>;

    /// Finds every document in a collection that matches an equality filter.
    ///
    /// The returned stream is lazy and each call starts a fresh scan. A missing collection
    /// or a filter that matches nothing yields an empty stream, not an error.
    ///
    /// # Arguments
    ///
    /// * `filter` - Field equality constraints, all of which must hold
    /// * `collection` - The name of the collection to scan
    async fn find_documents(
        &self,
        filter: Filter,
        collection: &str,
    ) -> DocumentStoreResult<DocumentStream>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Cleanly shuts down the backend, releasing connections.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
