//! Barback engine: upstream fetching, decoding and the recipe cache.
mod catalog;
mod decode;
mod fetch;
mod types;

pub use catalog::{
    CacheSnapshot, CacheStatus, CatalogError, CatalogSettings, Clock, RecipeCatalog,
    RefreshReport, SourceInfo,
};
pub use decode::{decode_text, DecodeError, DecodedText};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
