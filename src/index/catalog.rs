//! A complete Doxygen `search/` directory.
//!
//! `searchdata.js` lists the index sections (all, classes, functions, ...)
//! and, per section, the first characters that have a fragment file. The
//! fragment for a query is `<section>_<hex position of its first char>.js`,
//! e.g. `classes_5.js` for class names starting with `f`.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::parser::LoadError;
use super::types::{IndexEntry, SearchIndex};

pub const CATALOG_FILE: &str = "searchdata.js";

lazy_static! {
    static ref VAR_BLOCK: Regex = Regex::new(r"var\s+(\w+)\s*=\s*\{([^}]*)\}").unwrap();
    static ref VAR_ITEM: Regex = Regex::new(r#"(\d+)\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: u32,
    /// File name stem, e.g. `classes`
    pub name: String,
    /// Tab label, e.g. `Classes`
    pub label: String,
    /// First characters that have a fragment file, in file order
    pub content: Vec<char>,
}

#[derive(Debug, Clone)]
pub struct SearchCatalog {
    dir: PathBuf,
    sections: Vec<Section>,
}

impl SearchCatalog {
    pub fn open(dir: &Path) -> Result<Self, LoadError> {
        let path = dir.join(CATALOG_FILE);
        let source = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let sections = parse_catalog(&source).map_err(|message| LoadError::Catalog {
            path: path.clone(),
            message,
        })?;

        tracing::debug!(
            path = %path.display(),
            sections = sections.len(),
            "opened search catalog"
        );

        Ok(SearchCatalog {
            dir: dir.to_path_buf(),
            sections,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Find a section by file name or label, ignoring case
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name) || s.label.eq_ignore_ascii_case(name))
    }

    /// Fragment file covering queries that start like `query`
    pub fn fragment_path(&self, section: &Section, query: &str) -> Option<PathBuf> {
        let first = query.trim_start().chars().next()?.to_lowercase().next()?;
        let pos = section.content.iter().position(|&c| c == first)?;
        Some(self.dir.join(format!("{}_{:x}.js", section.name, pos)))
    }

    /// Every fragment file of a section that exists on disk, in content order
    pub fn fragment_paths(&self, section: &Section) -> Vec<PathBuf> {
        (0..section.content.len())
            .map(|pos| self.dir.join(format!("{}_{:x}.js", section.name, pos)))
            .filter(|path| path.exists())
            .collect()
    }

    /// Load the fragment for `query`; `Ok(None)` when no fragment covers it.
    pub fn index_for(&self, section: &str, query: &str) -> Result<Option<SearchIndex>, LoadError> {
        let section = self.section(section).ok_or_else(|| LoadError::Catalog {
            path: self.dir.join(CATALOG_FILE),
            message: format!("no section named '{}'", section),
        })?;

        match self.fragment_path(section, query) {
            Some(path) => SearchIndex::from_path(&path).map(Some),
            None => Ok(None),
        }
    }

    /// Entries of `section` matching a user-typed query
    pub fn search(&self, section: &str, query: &str) -> Result<Vec<IndexEntry>, LoadError> {
        Ok(self
            .index_for(section, query)?
            .map(|index| index.search(query.trim_start()).cloned().collect())
            .unwrap_or_default())
    }
}

fn parse_catalog(source: &str) -> Result<Vec<Section>, String> {
    let mut tables: BTreeMap<&str, BTreeMap<u32, String>> = BTreeMap::new();

    for block in VAR_BLOCK.captures_iter(source) {
        let (Some(name), Some(body)) = (block.get(1), block.get(2)) else {
            continue;
        };
        let items = VAR_ITEM
            .captures_iter(body.as_str())
            .filter_map(|item| {
                let id = item.get(1)?.as_str().parse().ok()?;
                Some((id, unescape_js(item.get(2)?.as_str())))
            })
            .collect();
        tables.insert(name.as_str(), items);
    }

    let content = tables
        .remove("indexSectionsWithContent")
        .ok_or("missing indexSectionsWithContent")?;
    let names = tables
        .remove("indexSectionNames")
        .ok_or("missing indexSectionNames")?;
    let mut labels = tables.remove("indexSectionLabels").unwrap_or_default();

    names
        .into_iter()
        .map(|(id, name)| {
            let chars = content
                .get(&id)
                .ok_or_else(|| format!("section {} ('{}') has no content list", id, name))?;
            let label = labels.remove(&id).unwrap_or_else(|| name.clone());
            Ok(Section {
                id,
                label,
                content: chars.chars().collect(),
                name,
            })
        })
        .collect()
}

fn unescape_js(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}
