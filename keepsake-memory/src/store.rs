//! In-memory storage implementation for the document store.
//!
//! This module provides a simple backend that keeps documents as BSON in insertion order,
//! guarded by an async-aware read-write lock.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use mea::rwlock::RwLock;
use bson::{Bson, Document as BsonDocument, oid::ObjectId};

use keepsake_core::{
    backend::{DocumentStream, StoreBackend, StoreBackendBuilder},
    document::{INTERNAL_ID_FIELD, identifier_to_string},
    error::DocumentStoreResult,
    filter::Filter,
};

use crate::evaluator::DocumentEvaluator;

type CollectionList = Vec<BsonDocument>;
type StoreMap = HashMap<String, CollectionList>;

const DEFAULT_DATABASE: &str = "memory";


/// Thread-safe in-memory document storage backend.
///
/// Identifiers are fresh ObjectIds, exactly as MongoDB would assign them, so identifiers
/// observed through this backend look the same as in production.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state. Multiple clones
/// of the same instance share the same underlying data.
///
/// # Listing
///
/// [`find_documents`](StoreBackend::find_documents) snapshots the matching documents when
/// it is called; the returned stream never holds the lock.
///
/// # Example
///
/// ```ignore
/// use keepsake_memory::InMemoryStore;
/// use keepsake::{backend::StoreBackend, filter::Filter};
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = store.insert_document(doc! { "author": "A" }, "note").await?;
/// let docs = store.snapshot("note").await;
/// assert_eq!(docs.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
    database: String,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::with_database(DEFAULT_DATABASE)
    }

    /// Creates a new empty store reporting the given database name.
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            database: database.into(),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns a copy of every document currently stored in `collection`, identifiers included.
    pub async fn snapshot(&self, collection: &str) -> Vec<BsonDocument> {
        self.store
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of documents stored in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        Ok(())
    }

    async fn insert_document(&self, mut document: BsonDocument, collection: &str) -> DocumentStoreResult<String> {
        let id = Bson::ObjectId(ObjectId::new());
        document.insert(INTERNAL_ID_FIELD, id.clone());

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(identifier_to_string(&id))
    }

    async fn find_documents(&self, filter: Filter, collection: &str) -> DocumentStoreResult<DocumentStream> {
        let store = self.store.read().await;
        let matched = match store.get(collection) {
            Some(documents) => DocumentEvaluator::filter_documents(documents, &filter),
            None => vec![],
        };

        Ok(
            stream::iter(matched.into_iter().map(Ok))
                .boxed()
        )
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut names = self.store
            .read()
            .await
            .keys()
            .cloned()
            .collect::<Vec<_>>();

        names.sort();

        Ok(names)
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    database: Option<String>,
}

impl InMemoryStoreBuilder {
    /// Sets the database name the store reports.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(match self.database {
            Some(database) => InMemoryStore::with_database(database),
            None => InMemoryStore::new(),
        })
    }
}
