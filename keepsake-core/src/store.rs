//! The document store gateway.
//!
//! [`DocumentStore`] is the single persistence boundary of the service. It wraps a shared
//! backend (or the absence of one) and hands out collection handles. Every handler resolves
//! its request against the store on its own: the gateway holds no per-request state.
//!
//! # Example
//!
//! ```ignore
//! use keepsake::prelude::*;
//! use keepsake::memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let id = store.create("note", doc! { "author": "A", "content": "hi" }).await?;
//!
//! let offline = DocumentStore::disconnected();
//! assert!(offline.create("note", doc! {}).await.unwrap_err().is_unavailable());
//! ```

use bson::Document as BsonDocument;
use std::sync::Arc;

use crate::{
    backend::{DocumentStream, StoreBackend},
    collection::{Collection, TypedCollection},
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
};

/// A cheaply cloneable handle to the process-wide document store.
///
/// A store built with [`DocumentStore::disconnected`] has no backend; all data operations
/// then fail with [`DocumentStoreError::StoreUnavailable`] instead of panicking, so the
/// service can keep answering health and diagnostic requests.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    backend: Option<Arc<dyn StoreBackend>>,
}

impl DocumentStore {
    /// Creates a store over the given backend.
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Some(Arc::new(backend)),
        }
    }

    /// Creates a store with no connection.
    pub fn disconnected() -> Self {
        Self { backend: None }
    }

    /// Returns `true` if a backend is attached.
    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> DocumentStoreResult<&dyn StoreBackend> {
        self.backend
            .as_deref()
            .ok_or_else(|| DocumentStoreError::StoreUnavailable("no store connection established".into()))
    }

    /// Returns the name of the backing database, if connected.
    pub fn database_name(&self) -> Option<&str> {
        self.backend
            .as_deref()
            .map(|backend| backend.database_name())
    }

    /// Gets a typed collection for the specified record type.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::StoreUnavailable`] if the store is disconnected.
    pub fn typed_collection<D: Document>(&self) -> DocumentStoreResult<TypedCollection<'_, D>> {
        Ok(TypedCollection::new(self.backend()?))
    }

    /// Gets an untyped collection with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::StoreUnavailable`] if the store is disconnected.
    pub fn collection(&self, name: &str) -> DocumentStoreResult<Collection<'_>> {
        Ok(Collection::new(name.to_string(), self.backend()?))
    }

    /// Inserts a document into the named collection and returns its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::StoreUnavailable`] without a connection, or
    /// [`DocumentStoreError::WriteFailure`] if the insertion is rejected.
    pub async fn create(&self, collection: &str, document: BsonDocument) -> DocumentStoreResult<String> {
        self.collection(collection)?
            .create(document)
            .await
    }

    /// Lists the documents of the named collection that match `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::StoreUnavailable`] if the store cannot be reached.
    /// No match is an empty stream, not an error.
    pub async fn list(&self, collection: &str, filter: Filter) -> DocumentStoreResult<DocumentStream> {
        self.collection(collection)?
            .list(filter)
            .await
    }

    /// Lists all collection names in the store.
    pub async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.backend()?
            .list_collections()
            .await
    }

    /// Checks that the store answers requests.
    pub async fn ping(&self) -> DocumentStoreResult<()> {
        self.backend()?.ping().await
    }

    /// Shuts down the backend, if any, releasing its resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        match self.backend {
            Some(backend) => backend.shutdown().await,
            None => Ok(()),
        }
    }
}
