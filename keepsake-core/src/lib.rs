//! The document store gateway behind the keepsake service.
//!
//! This crate is the core of the keepsake project and provides:
//!
//! - **Record traits** ([`document`]) - The trait every stored record implements, plus
//!   identifier normalization for outbound documents
//! - **Store backend abstraction** ([`backend`]) - The trait database backends implement
//! - **Equality filters** ([`filter`]) - Field-equals-value constraints for listing
//! - **Collections interface** ([`collection`]) - Create and list against one collection
//! - **Document store** ([`store`]) - The shared, collection-name-parameterized gateway
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use keepsake::prelude::*;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Document)]
//! #[document(collection = "song")]
//! pub struct Song {
//!     pub title: String,
//!     pub artist: Option<String>,
//! }
//!
//! let id = store
//!     .typed_collection::<Song>()?
//!     .create(&Song { title: "Harvest Moon".into(), artist: None })
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as keepsake_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod filter;
pub mod store;
