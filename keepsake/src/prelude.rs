//! Convenient re-exports of commonly used types from keepsake.
//!
//! ```ignore
//! use keepsake::prelude::*;
//! ```

pub use keepsake_core::{
    collection::{Collection, TypedCollection},
    store::DocumentStore,
    document::{Document, DocumentExt, expose_identifier, INTERNAL_ID_FIELD, PUBLIC_ID_FIELD},
    backend::{DocumentStream, StoreBackend, StoreBackendBuilder},
    filter::Filter,
    error::{DocumentStoreError, DocumentStoreResult},
};
pub use keepsake_macros::Document;
pub use bson::doc;
