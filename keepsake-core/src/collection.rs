//! Collection handles for gateway operations.
//!
//! A collection handle binds a collection name to a backend. It offers exactly the two
//! operations the service needs: create a document and list documents by equality filter.
//!
//! # Collection Types
//!
//! - [`Collection`] - Untyped collection working with BSON documents, addressed by name
//! - [`TypedCollection`] - Collection of one record type, named by [`Document::collection_name`]
//!
//! # Example
//!
//! ```ignore
//! use keepsake::prelude::*;
//!
//! let notes = store.typed_collection::<Note>()?;
//! let id = notes.create(&Note { author: "A".into(), content: "hello".into() }).await?;
//! let all = notes.list(Filter::new()).await?.try_collect::<Vec<_>>().await?;
//! ```

use bson::Document as BsonDocument;
use std::marker::PhantomData;
use tracing::debug;

use crate::{
    backend::{DocumentStream, StoreBackend},
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    filter::Filter,
};

/// An untyped collection with a reference to a storage backend.
#[derive(Debug)]
pub struct Collection<'a> {
    name: String,
    backend: &'a dyn StoreBackend,
}

impl<'a> Collection<'a> {
    /// Creates a new collection reference (internal use).
    pub(crate) fn new(name: String, backend: &'a dyn StoreBackend) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts one document and returns the identifier the store assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::WriteFailure`](crate::error::DocumentStoreError::WriteFailure)
    /// if the store rejects the insertion.
    pub async fn create(&self, document: BsonDocument) -> DocumentStoreResult<String> {
        let id = self
            .backend
            .insert_document(document, self.name())
            .await?;

        debug!(collection = %self.name, %id, "document created");

        Ok(id)
    }

    /// Lists the documents matching `filter`, identifiers still under the internal field.
    pub async fn list(&self, filter: Filter) -> DocumentStoreResult<DocumentStream> {
        debug!(collection = %self.name, constraints = filter.len(), "listing documents");

        self.backend
            .find_documents(filter, self.name())
            .await
    }
}

/// A collection of one record type.
///
/// Records are serialized on the way in. Listing returns the raw stored documents so that
/// callers can apply identifier normalization uniformly.
#[derive(Debug)]
pub struct TypedCollection<'a, D: Document> {
    inner: Collection<'a>,
    _marker: PhantomData<D>,
}

impl<'a, D: Document> TypedCollection<'a, D> {
    /// Creates a new typed collection reference (internal use).
    pub(crate) fn new(backend: &'a dyn StoreBackend) -> Self {
        Self {
            inner: Collection::new(D::collection_name().to_string(), backend),
            _marker: PhantomData,
        }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Serializes and inserts one record, returning its assigned identifier.
    pub async fn create(&self, record: &D) -> DocumentStoreResult<String> {
        self.inner
            .create(record.to_document()?)
            .await
    }

    /// Lists the stored documents of this record type matching `filter`.
    pub async fn list(&self, filter: Filter) -> DocumentStoreResult<DocumentStream> {
        self.inner.list(filter).await
    }
}
