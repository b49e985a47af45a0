use colored::*;
use doxsearch::index::{SearchIndex, key_for_label};
use std::collections::HashSet;
use std::fmt;

use crate::search::print_table_header;
use crate::source::Source;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// Key is not the normalized form of a variant label
    KeyMismatch {
        entry: usize,
        key: String,
        expected: String,
    },
    OutOfOrder {
        entry: usize,
        key: String,
        previous: String,
    },
    DuplicateKey { entry: usize, key: String },
    NoVariants { entry: usize, key: String },
    EmptyAnchor { entry: usize, key: String, variant: usize },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::KeyMismatch {
                entry,
                key,
                expected,
            } => write!(f, "#{}: key '{}' should be '{}'", entry, key, expected),
            Issue::OutOfOrder {
                entry,
                key,
                previous,
            } => write!(f, "#{}: key '{}' sorts before '{}'", entry, key, previous),
            Issue::DuplicateKey { entry, key } => {
                write!(f, "#{}: duplicate key '{}'", entry, key)
            }
            Issue::NoVariants { entry, key } => {
                write!(f, "#{}: key '{}' has no link targets", entry, key)
            }
            Issue::EmptyAnchor {
                entry,
                key,
                variant,
            } => write!(f, "#{}: key '{}' variant {} has an empty URL", entry, key, variant),
        }
    }
}

/// Check the generator invariants of a loaded table
pub fn validate(index: &SearchIndex) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    let mut previous: Option<&str> = None;

    for (idx, entry) in index.entries().iter().enumerate() {
        let key = entry.key.clone();

        if entry.variants.is_empty() {
            issues.push(Issue::NoVariants { entry: idx, key: key.clone() });
        }

        for (v_idx, variant) in entry.variants.iter().enumerate() {
            let expected = key_for_label(&variant.label);
            if expected != entry.key {
                issues.push(Issue::KeyMismatch {
                    entry: idx,
                    key: key.clone(),
                    expected,
                });
            }
            if variant.anchor_url.is_empty() {
                issues.push(Issue::EmptyAnchor {
                    entry: idx,
                    key: key.clone(),
                    variant: v_idx,
                });
            }
        }

        if let Some(prev) = previous.filter(|prev| entry.key.as_str() < *prev) {
            issues.push(Issue::OutOfOrder {
                entry: idx,
                key: key.clone(),
                previous: prev.to_string(),
            });
        }
        if !seen.insert(entry.key.as_str()) {
            issues.push(Issue::DuplicateKey { entry: idx, key });
        }

        previous = Some(&entry.key);
    }

    issues
}

pub fn check(source: &Source, verbose: bool) -> Result<(), String> {
    let tables = source.tables()?;
    if tables.is_empty() {
        println!("{} No tables to check", "✨".cyan());
        return Ok(());
    }

    let mut total_issues = 0;
    let mut total_entries = 0;

    for (name, index) in &tables {
        let issues = validate(index);
        total_entries += index.len();
        total_issues += issues.len();

        if verbose || !issues.is_empty() {
            print_table_header(name, index);
        }
        for issue in &issues {
            println!("  {} {}", "✗".red(), issue);
        }
    }

    if total_issues > 0 {
        return Err(format!(
            "{} problem(s) in {} entries across {} table(s)",
            total_issues,
            total_entries,
            tables.len()
        ));
    }

    println!(
        "{} {} entries across {} table(s) are consistent",
        "✓".green(),
        total_entries.to_string().bold(),
        tables.len()
    );
    Ok(())
}
