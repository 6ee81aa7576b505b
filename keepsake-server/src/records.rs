//! Record types served by the API.
//!
//! Each record is bound to its collection through `#[derive(Document)]` and to the HTTP
//! surface through [`Resource`], which names the query parameters its listing accepts.

use keepsake::prelude::*;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{DeserializeOwned, Error, Unexpected},
};

/// A record type exposed as a create/list resource.
pub trait Resource: Document {
    /// Query parameters accepted when listing.
    type ListQuery: DeserializeOwned + Send + 'static;

    /// Translates parsed query parameters into a store filter.
    fn filter(query: Self::ListQuery) -> Filter;
}

/// Listing query for resources without filterable fields. Any parameters are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct NoQuery {}

#[derive(Debug, Default, Deserialize)]
pub struct PhotoQuery {
    #[serde(default, deserialize_with = "query_flag")]
    pub favorites: Option<bool>,
}

/// Parses a boolean query value the way form-style clients send it: `true`/`false`, `1`/`0`,
/// `yes`/`no`, `on`/`off`, `t`/`f` and `y`/`n`, in any case.
fn query_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" | "t" => Ok(Some(true)),
        "false" | "0" | "no" | "n" | "off" | "f" => Ok(Some(false)),
        _ => Err(D::Error::invalid_value(Unexpected::Str(&raw), &"a boolean")),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "photo")]
pub struct Photo {
    pub uploader: String,
    pub caption: Option<String>,
    pub file_url: String,
    #[serde(default)]
    pub favorite: bool,
}

impl Resource for Photo {
    type ListQuery = PhotoQuery;

    fn filter(query: PhotoQuery) -> Filter {
        Filter::new().eq_opt("favorite", query.favorites)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "song")]
pub struct Song {
    pub title: String,
    pub artist: Option<String>,
    pub url: Option<String>,
    pub added_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "movie")]
pub struct Movie {
    pub title: String,
    pub year: Option<i64>,
    pub link: Option<String>,
    pub planned_by: Option<String>,
    #[serde(default)]
    pub watched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "note")]
pub struct Note {
    pub author: String,
    pub content: String,
}

/// A planned outing. `date` is kept as the client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "plan")]
pub struct Plan {
    pub author: String,
    pub date: Option<String>,
    pub title: String,
    pub details: Option<String>,
}

macro_rules! unfiltered {
    ($($record:ty),+ $(,)?) => {
        $(
            impl Resource for $record {
                type ListQuery = NoQuery;

                fn filter(_: NoQuery) -> Filter {
                    Filter::new()
                }
            }
        )+
    };
}

unfiltered!(Song, Movie, Note, Plan);
