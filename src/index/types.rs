use serde::{Deserialize, Serialize};
use std::path::Path;

use super::normalize::{search_id, unescape_html};
use super::parser::{LoadError, ParseError, parse_table};

/// One link target for a search key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Display label as emitted by the generator (HTML-escaped)
    pub label: String,
    pub anchor_url: String,
    /// Namespace or qualifier shown next to the result; empty when absent
    #[serde(default)]
    pub scope_label: String,
    /// Link opens in the parent frame
    #[serde(default = "default_parent_target")]
    pub parent_target: bool,
}

fn default_parent_target() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub key: String,
    pub variants: Vec<Variant>,
}

/// A variant ready to be rendered as a clickable result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub label: &'a str,
    pub anchor_url: &'a str,
    pub scope_label: &'a str,
}

impl Resolved<'_> {
    /// The label with HTML entities decoded, e.g. `Factory< T, K >`
    pub fn display_label(&self) -> String {
        unescape_html(self.label)
    }
}

impl IndexEntry {
    /// Resolve one variant of this entry into its (label, url, scope) triple.
    pub fn resolve(&self, variant_index: usize) -> Option<Resolved<'_>> {
        self.variants.get(variant_index).map(|v| Resolved {
            label: &v.label,
            anchor_url: &v.anchor_url,
            scope_label: &v.scope_label,
        })
    }

    /// Label of the first variant; all variants share it in generator output.
    pub fn label(&self) -> &str {
        self.variants
            .first()
            .map(|v| v.label.as_str())
            .unwrap_or_default()
    }

    pub fn has_shared_label(&self) -> bool {
        self.variants.windows(2).all(|w| w[0].label == w[1].label)
    }
}

/// An immutable, ordered search table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    /// Keys are in non-decreasing byte order, so prefix matches are contiguous
    sorted: bool,
}

impl SearchIndex {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        let sorted = entries.windows(2).all(|w| w[0].key <= w[1].key);
        SearchIndex { entries, sorted }
    }

    /// Parse a table literal such as the contents of `search/classes_5.js`.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parse_table(source).map(SearchIndex::new)
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let start = std::time::Instant::now();
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = SearchIndex::parse(&source)?;

        tracing::debug!(
            path = %path.display(),
            entries = index.len(),
            sorted = index.sorted,
            elapsed = ?start.elapsed(),
            "loaded search table"
        );
        if !index.sorted {
            tracing::warn!(
                path = %path.display(),
                "search table is not in key order, using linear scan"
            );
        }

        Ok(index)
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Entries whose key starts with an already-normalized prefix, in table order.
    pub fn lookup(&self, prefix: &str) -> Lookup<'_> {
        let start = if self.sorted {
            self.entries.partition_point(|e| e.key.as_str() < prefix)
        } else {
            0
        };

        Lookup {
            remaining: &self.entries[start..],
            prefix: prefix.to_string(),
            contiguous: self.sorted,
        }
    }

    /// Lookup for text as a user types it: lowercased and key-encoded first.
    pub fn search(&self, query: &str) -> Lookup<'_> {
        self.lookup(&search_id(&query.to_lowercase()))
    }

    /// First entry with exactly this key
    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.lookup(key).find(|e| e.key == key)
    }
}

/// Lazy iterator over prefix matches. Clone it to restart from the same point.
#[derive(Debug, Clone)]
pub struct Lookup<'a> {
    remaining: &'a [IndexEntry],
    prefix: String,
    contiguous: bool,
}

impl<'a> Iterator for Lookup<'a> {
    type Item = &'a IndexEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((entry, rest)) = self.remaining.split_first() {
            self.remaining = rest;
            if entry.key.starts_with(&self.prefix) {
                return Some(entry);
            }
            if self.contiguous {
                self.remaining = &[];
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::embedded::sample_index;
    use crate::index::normalize::key_for_label;

    fn keys<'a>(it: impl Iterator<Item = &'a IndexEntry>) -> Vec<&'a str> {
        it.map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_every_key_is_normalized_label() {
        for entry in sample_index().entries() {
            for variant in &entry.variants {
                assert_eq!(entry.key, key_for_label(&variant.label));
            }
        }
    }

    #[test]
    fn test_empty_prefix_returns_all_in_order() {
        let index = sample_index();
        let all: Vec<_> = index.lookup("").collect();
        assert_eq!(all.len(), index.len());
        assert!(all.iter().zip(index.entries()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn test_lookup_fact() {
        let found = keys(sample_index().lookup("fact"));
        assert_eq!(found.len(), 23);
        assert_eq!(found[0], "factory");
        assert!(found[1..18].iter().all(|k| k.starts_with("factory_3c_")));
        assert_eq!(
            &found[18..],
            &[
                "factorybase",
                "factoryobservable",
                "factoryobservable_3c_20propertyfactoryobject_20_3e",
                "factoryobserver",
                "factoryobserver_3c_20propertyfactoryobject_20_3e",
            ]
        );
    }

    #[test]
    fn test_lookup_narrows_monotonically() {
        let index = sample_index();
        for prefix in ["f", "fi", "fil", "file", "filep", "fxaa", "factory_3c"] {
            let narrow = keys(index.lookup(prefix));
            let wide = keys(index.lookup(&prefix[..prefix.len() - 1]));
            assert!(narrow.iter().all(|k| wide.contains(k)), "prefix {prefix}");
        }
    }

    #[test]
    fn test_lookup_no_match_is_empty() {
        let index = sample_index();
        assert_eq!(index.lookup("zzz").count(), 0);
        assert_eq!(index.lookup("factoryz").count(), 0);
    }

    #[test]
    fn test_lookup_is_restartable() {
        let index = sample_index();
        let mut lookup = index.lookup("fil");
        let first = lookup.next();
        let rest: Vec<_> = lookup.clone().collect();
        let again: Vec<_> = lookup.collect();
        assert_eq!(first.map(|e| e.key.as_str()), Some("filedialog"));
        assert_eq!(rest, again);
        assert_eq!(index.lookup("fil").count(), 16);
    }

    #[test]
    fn test_search_normalizes_query() {
        let index = sample_index();
        let found = keys(index.search("Factory< Property"));
        assert_eq!(
            found,
            vec![
                "factory_3c_20property_20_3e",
                "factory_3c_20propertywidget_2c_20property_20_2a_3e",
            ]
        );
        assert_eq!(keys(index.search("flat_ext")).len(), 4);
    }

    #[test]
    fn test_search_finds_non_ascii_labels() {
        let index = SearchIndex::parse(
            "[['élan',['Élan',['../classÉlan.html',1,'']]],['überclass',['Überclass',['../u.html',1,'']]]]",
        )
        .unwrap();
        for entry in index.entries() {
            assert_eq!(entry.key, key_for_label(entry.label()));
        }
        assert_eq!(keys(index.search("ÉLA")), vec!["élan"]);
        assert_eq!(keys(index.search("Über")), vec!["überclass"]);
    }

    #[test]
    fn test_resolve_fxaa_second_variant() {
        let entry = sample_index().get("fxaa").unwrap();
        let resolved = entry.resolve(1).unwrap();
        assert_eq!(
            (resolved.label, resolved.anchor_url, resolved.scope_label),
            ("fxaa", "../classinviwo_1_1FXAA.html", "inviwo::FXAA")
        );
        assert_eq!(entry.resolve(0).unwrap().scope_label, "glsl::fxaa");
        assert!(entry.resolve(2).is_none());
    }

    #[test]
    fn test_display_label_unescapes() {
        let entry = sample_index().get("factory_3c_20t_2c_20k_20_3e").unwrap();
        assert_eq!(entry.resolve(0).unwrap().display_label(), "Factory< T, K >");
    }

    #[test]
    fn test_unsorted_table_uses_linear_scan() {
        let index = SearchIndex::parse(
            "[['zeta',['Zeta','z.html']],['alpha',['Alpha','a.html']],['zebra',['Zebra','zb.html']]]",
        )
        .unwrap();
        assert!(!index.is_sorted());
        assert_eq!(keys(index.lookup("ze")), vec!["zeta", "zebra"]);
        assert_eq!(keys(index.lookup("")), vec!["zeta", "alpha", "zebra"]);
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let index =
            SearchIndex::parse("[['a',['A','1.html']],['a',['A','2.html']],['b',['B','3.html']]]")
                .unwrap();
        assert!(index.is_sorted());
        assert_eq!(index.lookup("a").count(), 2);
        assert_eq!(index.get("a").unwrap().variants[0].anchor_url, "1.html");
    }
}
