//! Barback core: pure ingestion of spreadsheet-published cocktail recipes.
//!
//! Everything here is synchronous and free of IO: delimiter sniffing,
//! header reconciliation, row sanitising, slugs and cache-state rules.
mod cache;
mod delimiter;
mod document;
mod headers;
mod query;
mod recipe;
mod slug;
mod source_url;
mod text;

pub use cache::{CacheState, DEFAULT_TTL};
pub use delimiter::{detect_delimiter, sniff_sample, Delimiter, SNIFF_SAMPLE_LEN};
pub use document::{parse_document, ParseError, ParsedDocument, RawRow};
pub use headers::{is_canonical_field, normalize_header, HeaderMap, CANONICAL_FIELDS};
pub use query::RecipeQuery;
pub use recipe::{parse_ingredients, parse_recipe, row_name, split_tags, Ingredient, Recipe};
pub use slug::slugify;
pub use source_url::resolve_source_url;
