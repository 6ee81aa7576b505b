use std::time::Duration;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use bson::{Document, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    options::ClientOptions,
};
use tracing::{debug, info};
use keepsake_core::{
    backend::{DocumentStream, StoreBackend, StoreBackendBuilder},
    document::{INTERNAL_ID_FIELD, identifier_to_string},
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
};

use crate::query::{MongoFilterTranslator, read_error, write_error};


#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    // the server assigns `_id`; a caller-supplied one is discarded
    fn prepare_document(&self, mut document: Document) -> Document {
        document.remove(INTERNAL_ID_FIELD);
        document
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(read_error)?;

        Ok(())
    }

    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<String> {
        let result = self.get_collection(collection)
            .insert_one(self.prepare_document(document))
            .await
            .map_err(|e| write_error(e, collection))?;

        let id = identifier_to_string(&result.inserted_id);
        debug!(collection, %id, "inserted document");

        Ok(id)
    }

    async fn find_documents(&self, filter: Filter, collection: &str) -> DocumentStoreResult<DocumentStream> {
        Ok(
            self.get_collection(collection)
                .find(MongoFilterTranslator::translate(&filter))
                .await
                .map_err(read_error)?
                .map_err(read_error)
                .boxed()
        )
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.client
                .database(&self.database)
                .list_collection_names()
                .await
                .map_err(read_error)?
        )
    }

    async fn shutdown(&self) -> DocumentStoreResult<()> {
        self.client.clone().shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    timeout: Option<Duration>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            timeout: None,
        }
    }

    /// Bounds how long server selection and connection establishment may take, so that an
    /// unreachable deployment surfaces as an error instead of a hung request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        if let Some(timeout) = self.timeout {
            options.server_selection_timeout = Some(timeout);
            options.connect_timeout = Some(timeout);
        }

        let client = Client::with_options(options)
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        info!(database = %self.database, "mongodb client configured");

        Ok(MongoDbStore::new(client, self.database))
    }
}
