//! Serialization of search tables.

use super::parser::{LoadError, ParseError};
use super::types::{IndexEntry, SearchIndex, Variant};

/// Variable name Doxygen assigns the table to
pub const DEFAULT_VAR_NAME: &str = "searchData";

/// Write the table in the generator's layout.
///
/// Entries whose variants share a label use the compact
/// `[key,[label,[url,flag,scope],...]]` form. Mixed labels fall back to a
/// list of `[label,url,scope,flag]` tuples.
pub fn to_js(index: &SearchIndex, var_name: &str) -> String {
    let mut out = format!("var {}=\n[\n", var_name);
    let body: Vec<String> = index.entries().iter().map(entry_js).collect();
    out.push_str(&body.join(",\n"));
    out.push_str("\n];");
    out
}

fn entry_js(entry: &IndexEntry) -> String {
    let value = if entry.has_shared_label() {
        let links: Vec<String> = entry
            .variants
            .iter()
            .map(|v| {
                format!(
                    "[{},{},{}]",
                    js_string(&v.anchor_url),
                    u8::from(v.parent_target),
                    js_string(&v.scope_label)
                )
            })
            .collect();
        format!("[{},{}]", js_string(entry.label()), links.join(","))
    } else {
        let tuples: Vec<String> = entry.variants.iter().map(tuple_js).collect();
        format!("[{}]", tuples.join(","))
    };

    format!("  [{},{}]", js_string(&entry.key), value)
}

fn tuple_js(variant: &Variant) -> String {
    format!(
        "[{},{},{},{}]",
        js_string(&variant.label),
        js_string(&variant.anchor_url),
        js_string(&variant.scope_label),
        u8::from(variant.parent_target)
    )
}

fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Pretty JSON array of entries.
pub fn to_json(index: &SearchIndex) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(index.entries())
}

/// Inverse of [`to_json`]. Entries are held to the same shape rules as
/// [`SearchIndex::parse`], so the result always writes back as valid JS.
pub fn from_json(json: &str) -> Result<SearchIndex, LoadError> {
    let entries: Vec<IndexEntry> = serde_json::from_str(json)?;
    for (idx, entry) in entries.iter().enumerate() {
        let message = if entry.key.is_empty() {
            "key is empty".to_string()
        } else if entry.variants.is_empty() {
            format!("'{}': value is empty", entry.key)
        } else {
            continue;
        };
        return Err(ParseError::Shape { entry: idx, message }.into());
    }
    Ok(SearchIndex::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::embedded::{sample_index, sample_source};

    #[test]
    fn test_sample_rewrites_byte_identical() {
        assert_eq!(to_js(sample_index(), DEFAULT_VAR_NAME), sample_source());
    }

    #[test]
    fn test_js_round_trip() {
        let index = sample_index();
        let reloaded = SearchIndex::parse(&to_js(index, DEFAULT_VAR_NAME)).unwrap();
        assert_eq!(&reloaded, index);
    }

    #[test]
    fn test_mixed_labels_round_trip() {
        let index = SearchIndex::parse(
            "[['c',[['C','c1.html','ns\\'1'],['c','c2.html','',0]]],['d',['D','d.html']]]",
        )
        .unwrap();
        let js = to_js(&index, "custom");
        assert!(js.starts_with("var custom=\n[\n"));
        assert!(js.contains("[['C','c1.html','ns\\'1',1],['c','c2.html','',0]]"));
        assert_eq!(SearchIndex::parse(&js).unwrap(), index);
    }

    #[test]
    fn test_json_round_trip() {
        let index = sample_index();
        let json = to_json(index).unwrap();
        assert!(json.contains("\"anchor_url\": \"../classinviwo_1_1FXAA.html\""));
        assert_eq!(&from_json(&json).unwrap(), index);
    }

    #[test]
    fn test_json_rejects_entries_parse_would_reject() {
        let err = from_json(r#"[{"key":"","variants":[]}]"#).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse(ParseError::Shape { entry: 0, ref message }) if message == "key is empty"
        ));

        let json = r#"[
            {"key":"a","variants":[{"label":"A","anchor_url":"a.html"}]},
            {"key":"b","variants":[]}
        ]"#;
        let err = from_json(json).unwrap_err();
        assert_eq!(err.to_string(), "malformed entry #1: 'b': value is empty");

        assert!(matches!(from_json("{"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_json_defaults_missing_fields() {
        let index =
            from_json(r#"[{"key":"a","variants":[{"label":"A","anchor_url":"a.html"}]}]"#).unwrap();
        let variant = &index.entries()[0].variants[0];
        assert_eq!(variant.scope_label, "");
        assert!(variant.parent_target);
        assert_eq!(SearchIndex::parse(&to_js(&index, DEFAULT_VAR_NAME)).unwrap(), index);
    }

    #[test]
    fn test_empty_table() {
        let index = SearchIndex::new(Vec::new());
        let js = to_js(&index, DEFAULT_VAR_NAME);
        assert!(SearchIndex::parse(&js).unwrap().is_empty());
    }
}
