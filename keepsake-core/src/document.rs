//! Core traits for record representation and serialization.
//!
//! This module provides the trait that every stored record type implements, as well as
//! utilities for converting records to and from BSON and stored documents to public JSON.

use bson::{Bson, Document as BsonDocument, de::deserialize_from_document, ser::serialize_to_document};
use serde::{Deserialize, Serialize};
use serde_json::{Value, to_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the field under which backends keep a document's store-assigned identifier.
///
/// This field is internal to the store. Outbound documents must expose identity as `id`
/// instead (see [`expose_identifier`]).
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Name of the public identity field on every outbound document.
pub const PUBLIC_ID_FIELD: &str = "id";

/// Core trait that all records stored in a document store must implement.
///
/// A record does not carry its own identifier: the store assigns one on insertion and it
/// is only ever observed on the way out. Every record type names the collection it lives in.
///
/// # Deriving
///
/// `Document` can be derived with `keepsake_macros::Document`:
///
/// ```ignore
/// use keepsake::prelude::*;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "note")]
/// pub struct Note {
///     pub author: String,
///     pub content: String,
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this record type belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for records.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this record to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the record is not a map.
    fn to_document(&self) -> DocumentStoreResult<BsonDocument>;

    /// Creates a record from a stored BSON document.
    ///
    /// Unknown fields, including the internal identifier, are ignored.
    fn from_document(document: BsonDocument) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_document(&self) -> DocumentStoreResult<BsonDocument> {
        serialize_to_document(self).map_err(|e| {
            DocumentStoreError::InvalidDocument(format!(
                "{} record does not serialize to a document: {e}",
                D::collection_name()
            ))
        })
    }

    fn from_document(document: BsonDocument) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_document(document)?)
    }
}

/// Renders a store-assigned identifier as the opaque string handed to clients.
///
/// ObjectIds become their 24-character hex form, string identifiers are returned verbatim
/// and anything else falls back to its display form.
pub fn identifier_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Converts a stored document into its public JSON shape.
///
/// The internal identifier field is removed and re-inserted as a string under
/// [`PUBLIC_ID_FIELD`]. This is the only path by which documents
/// leave the store, so the internal field never reaches a client.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidDocument`] if the document carries no identifier,
/// or a serialization error if a value has no JSON representation.
pub fn expose_identifier(mut document: BsonDocument) -> DocumentStoreResult<Value> {
    let id = document.remove(INTERNAL_ID_FIELD).ok_or_else(|| {
        DocumentStoreError::InvalidDocument(format!(
            "stored document has no {INTERNAL_ID_FIELD} field"
        ))
    })?;
    // a stale public id inside the stored body must not shadow the real one
    document.remove(PUBLIC_ID_FIELD);

    let mut public = serde_json::Map::with_capacity(document.len() + 1);
    public.insert(PUBLIC_ID_FIELD.to_string(), Value::String(identifier_to_string(&id)));

    for (key, value) in document {
        public.insert(key, to_value(&value)?);
    }

    Ok(Value::Object(public))
}
