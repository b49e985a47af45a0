//! Doxygen search index tables
//!
//! Loads the `search/*.js` tables a Doxygen HTML tree ships for its
//! client-side search, answers prefix queries over their normalized keys and
//! resolves the matches into link targets.
//!
//! # Usage
//!
//! ```rust,no_run
//! use doxsearch::index::SearchIndex;
//! use std::path::Path;
//!
//! let index = SearchIndex::from_path(Path::new("html/search/classes_5.js"))?;
//!
//! // Keys are normalized, so "Factory<" looks up "factory_3c"
//! for entry in index.search("Factory<") {
//!     if let Some(link) = entry.resolve(0) {
//!         println!("{} -> {}", link.display_label(), link.anchor_url);
//!     }
//! }
//! # Ok::<(), doxsearch::index::LoadError>(())
//! ```

mod catalog;
mod embedded;
mod normalize;
mod parser;
mod render;
mod types;
mod writer;

pub use catalog::{CATALOG_FILE, SearchCatalog, Section};
pub use embedded::{sample_index, sample_source};
pub use normalize::{escape_html, key_for_label, search_id, unescape_html};
pub use parser::{LoadError, ParseError};
pub use render::{absolute_url, render_html};
pub use types::{IndexEntry, Lookup, Resolved, SearchIndex, Variant};
pub use writer::{DEFAULT_VAR_NAME, from_json, to_js, to_json};
