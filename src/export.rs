use clap::ValueEnum;
use colored::*;
use doxsearch::index::{DEFAULT_VAR_NAME, SearchIndex, to_js, to_json};
use std::io::{self, Write};
use std::{fs, path::Path};

use crate::source::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// `var searchData=[...]` as Doxygen writes it
    Js,
    Json,
}

pub fn render(index: &SearchIndex, format: ExportFormat) -> Result<String, String> {
    match format {
        ExportFormat::Js => Ok(to_js(index, DEFAULT_VAR_NAME)),
        ExportFormat::Json => to_json(index).map_err(|e| format!("Failed to encode JSON: {}", e)),
    }
}

pub fn export(source: &Source, format: ExportFormat, output: Option<&Path>) -> Result<(), String> {
    export_to(source, format, output, &mut io::stdout().lock())
}

/// Like [`export`], with the table written to `stdout` when there is no
/// output file. Nothing is added after the table text.
fn export_to(
    source: &Source,
    format: ExportFormat,
    output: Option<&Path>,
    stdout: &mut impl Write,
) -> Result<(), String> {
    let tables = source.tables()?;
    let [(name, index)] = tables.as_slice() else {
        return Err(format!(
            "{} holds {} tables; export one at a time with --file",
            source.describe(),
            tables.len()
        ));
    };

    let text = render(index, format)?;

    match output {
        Some(path) => {
            fs::write(path, &text)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            eprintln!(
                "{} Exported {} entries from {} to {}",
                "✅".green(),
                index.len(),
                name,
                path.display()
            );
        }
        None => stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| format!("Failed to write to stdout: {}", e))?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxsearch::index::{from_json, sample_index, sample_source};

    #[test]
    fn test_export_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.json");
        export(&Source::Embedded, ExportFormat::Json, Some(&path)).unwrap();

        let reloaded = from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(&reloaded, sample_index());
    }

    #[test]
    fn test_export_js_to_stdout_is_byte_identical() {
        let mut out = Vec::new();
        export_to(&Source::Embedded, ExportFormat::Js, None, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), sample_source());
    }

    #[test]
    fn test_export_js_reloads() {
        let text = render(sample_index(), ExportFormat::Js).unwrap();
        assert_eq!(&SearchIndex::parse(&text).unwrap(), sample_index());
    }
}
