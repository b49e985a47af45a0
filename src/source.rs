use doxsearch::index::{SearchCatalog, SearchIndex, sample_index};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use crate::config::Config;

/// Where search tables come from for this run.
#[derive(Debug)]
pub enum Source {
    Embedded,
    File { path: PathBuf, index: SearchIndex },
    Catalog { catalog: SearchCatalog, section: String },
}

impl Source {
    /// Pick the source: `--file`, then `--dir`, then the config file, then the
    /// embedded sample table.
    pub fn select(
        file: Option<PathBuf>,
        dir: Option<PathBuf>,
        section: Option<String>,
        config: &Config,
    ) -> Result<Self, String> {
        let section = section.unwrap_or_else(|| config.section.clone());

        if let Some(path) = file {
            return Self::open_file(path);
        }
        if let Some(dir) = dir {
            return Self::open_catalog(&dir, section);
        }
        if let Some(path) = config.index_file.clone() {
            return Self::open_file(path);
        }
        if let Some(dir) = &config.search_dir {
            return Self::open_catalog(dir, section);
        }
        Ok(Source::Embedded)
    }

    fn open_file(path: PathBuf) -> Result<Self, String> {
        let index = SearchIndex::from_path(&path).map_err(|e| e.to_string())?;
        Ok(Source::File { path, index })
    }

    fn open_catalog(dir: &Path, section: String) -> Result<Self, String> {
        let catalog = SearchCatalog::open(dir).map_err(|e| e.to_string())?;
        if catalog.section(&section).is_none() {
            let known: Vec<&str> = catalog.sections().iter().map(|s| s.name.as_str()).collect();
            return Err(format!(
                "Unknown section '{}' (available: {})",
                section,
                known.join(", ")
            ));
        }
        Ok(Source::Catalog { catalog, section })
    }

    pub fn describe(&self) -> String {
        match self {
            Source::Embedded => "embedded sample (classes_5.js)".to_string(),
            Source::File { path, .. } => path.display().to_string(),
            Source::Catalog { catalog, section } => {
                format!("{} [{}]", catalog.dir().display(), section)
            }
        }
    }

    /// The table that answers queries starting with `first_char`.
    pub fn table_for(
        &self,
        first_char: Option<char>,
    ) -> Result<Option<Cow<'_, SearchIndex>>, String> {
        match self {
            Source::Embedded => Ok(Some(Cow::Borrowed(sample_index()))),
            Source::File { index, .. } => Ok(Some(Cow::Borrowed(index))),
            Source::Catalog { catalog, section } => {
                let Some(first_char) = first_char else {
                    return Ok(None);
                };
                catalog
                    .index_for(section, &first_char.to_string())
                    .map(|found| found.map(Cow::Owned))
                    .map_err(|e| e.to_string())
            }
        }
    }

    /// Every table of the source with a display name, for whole-table commands.
    pub fn tables(&self) -> Result<Vec<(String, Cow<'_, SearchIndex>)>, String> {
        match self {
            Source::Embedded | Source::File { .. } => {
                let table = self.table_for(None)?.ok_or("no table loaded")?;
                Ok(vec![(self.describe(), table)])
            }
            Source::Catalog { catalog, section } => {
                let Some(section) = catalog.section(section) else {
                    return Ok(Vec::new());
                };
                catalog
                    .fragment_paths(section)
                    .into_iter()
                    .map(|path| {
                        let index = SearchIndex::from_path(&path).map_err(|e| e.to_string())?;
                        Ok((path.display().to_string(), Cow::Owned(index)))
                    })
                    .collect()
            }
        }
    }
}

/// First character of the name a normalized key was built from.
///
/// `factory_3c...` starts with `f`; `_7eprocessor` (`~Processor`) with `~`.
/// Only ASCII is escaped in keys, so `élan` simply starts with `é`.
pub fn key_leading_char(key: &str) -> Option<char> {
    if let Some(hex) = key.strip_prefix('_') {
        let byte = hex.get(..2).and_then(|h| u8::from_str_radix(h, 16).ok())?;
        return byte.is_ascii().then_some(byte as char);
    }
    key.chars().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_leading_char() {
        assert_eq!(key_leading_char("factory_3c_20t_20_3e"), Some('f'));
        assert_eq!(key_leading_char("_7eprocessor"), Some('~'));
        assert_eq!(key_leading_char("élan"), Some('é'));
        assert_eq!(key_leading_char("_zz"), None);
        assert_eq!(key_leading_char(""), None);
    }

    #[test]
    fn test_select_defaults_to_embedded() {
        let source = Source::select(None, None, None, &Config::default()).unwrap();
        assert!(matches!(source, Source::Embedded));
        let tables = source.tables().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].1.len(), 60);
    }

    #[test]
    fn test_select_missing_file_fails() {
        let result = Source::select(
            Some(PathBuf::from("/nonexistent/classes_5.js")),
            None,
            None,
            &Config::default(),
        );
        assert!(result.unwrap_err().contains("failed to read"));
    }

    #[test]
    fn test_file_flag_beats_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.js");
        std::fs::write(&path, "var searchData=[['a',['A',['a.html',1,'ns']]]];").unwrap();

        let config = Config {
            search_dir: Some(PathBuf::from("/nonexistent")),
            ..Config::default()
        };
        let source = Source::select(Some(path), None, None, &config).unwrap();
        let table = source.table_for(Some('a')).unwrap().unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unknown_catalog_section() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("searchdata.js"),
            "var indexSectionsWithContent = { 0: \"f\" };\nvar indexSectionNames = { 0: \"classes\" };",
        )
        .unwrap();
        let err = Source::select(
            None,
            Some(dir.path().to_path_buf()),
            Some("functions".to_string()),
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.contains("available: classes"));
    }
}
