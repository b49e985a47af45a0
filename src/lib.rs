//! doxsearch - Doxygen search index toolkit
//!
//! Loads, queries, validates and rewrites the search tables of generated
//! Doxygen HTML documentation.

pub mod index;

// Re-export commonly used types
pub use index::{IndexEntry, LoadError, ParseError, SearchIndex, Variant};
