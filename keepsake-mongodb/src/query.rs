//! Translation from keepsake filters to MongoDB query documents, and from driver errors
//! to store errors.

use bson::{Bson, Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind};

use keepsake_core::{error::DocumentStoreError, filter::Filter};


/// Translates equality filters into MongoDB filter documents.
///
/// Every constraint becomes an explicit `$eq` so that a document-valued constraint is
/// compared as a value rather than interpreted as an operator expression.
pub(crate) struct MongoFilterTranslator;

impl MongoFilterTranslator {
    pub(crate) fn translate(filter: &Filter) -> Document {
        filter
            .iter()
            .map(|(field, value)| (field.to_string(), Bson::Document(doc! { "$eq": value.clone() })))
            .collect()
    }
}

/// Returns `true` for driver errors that mean the deployment could not be reached.
pub(crate) fn is_unreachable(err: &MongoError) -> bool {
    matches!(
        *err.kind,
        ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. }
    )
}

/// Maps a driver error from a read or probe.
pub(crate) fn read_error(err: MongoError) -> DocumentStoreError {
    if is_unreachable(&err) {
        DocumentStoreError::StoreUnavailable(err.to_string())
    } else {
        DocumentStoreError::Backend(err.to_string())
    }
}

/// Maps a driver error from an insertion into `collection`.
pub(crate) fn write_error(err: MongoError, collection: &str) -> DocumentStoreError {
    if is_unreachable(&err) {
        DocumentStoreError::StoreUnavailable(err.to_string())
    } else {
        DocumentStoreError::WriteFailure(collection.to_string(), err.to_string())
    }
}
