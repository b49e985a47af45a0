//! Terminal front-end for search tables: lookup, resolve and interactive mode

use colored::*;
use doxsearch::index::{
    IndexEntry, SearchIndex, absolute_url, render_html, search_id, unescape_html,
};
use std::io::{self, BufRead, Write};
use terminal_size::{Width, terminal_size};

use crate::source::{Source, key_leading_char};
use crate::syntax::highlight_cpp;

#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub base_url: Option<String>,
    pub highlight: bool,
    pub max_results: usize,
}

/// Get the current terminal width, defaulting to 80 if unable to detect
fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        80
    }
}

fn separator() -> String {
    "─".repeat(get_terminal_width().saturating_sub(2).clamp(20, 100))
}

/// Normalize a query unless it is already a key
fn query_key(query: &str, raw: bool) -> String {
    if raw {
        query.to_string()
    } else {
        search_id(&query.trim_start().to_lowercase())
    }
}

/// Look up entries by prefix and print them (or their HTML markup)
pub fn lookup(
    source: &Source,
    query: &str,
    raw: bool,
    html: bool,
    opts: &DisplayOptions,
) -> Result<(), String> {
    let key = query_key(query, raw);
    let Some(table) = source.table_for(key_leading_char(&key))? else {
        println!("{} No results found for '{}'", "ℹ️".blue(), query);
        return Ok(());
    };

    if html {
        let results = table.lookup(&key).take(opts.max_results);
        print!("{}", render_html(results, opts.base_url.as_deref()));
        return Ok(());
    }

    let total = table.lookup(&key).count();
    if total == 0 {
        println!("{} No results found for '{}'", "ℹ️".blue(), query);
        let suggestions = get_suggestions(&table, query);
        if !suggestions.is_empty() {
            println!("\n{} Did you mean:", "💡".yellow());
            for label in suggestions {
                println!("  {} {}", "•".cyan(), label.green());
            }
        }
        return Ok(());
    }

    println!(
        "\n{} Found {} result(s) for '{}'\n",
        "🔍".cyan(),
        total.to_string().bold(),
        query
    );
    for entry in table.lookup(&key).take(opts.max_results) {
        display_entry(entry, opts);
    }
    if total > opts.max_results {
        println!("\n  ... and {} more", total - opts.max_results);
    }

    Ok(())
}

/// Print the (label, url, scope) triple of one variant of an exact key
pub fn resolve(
    source: &Source,
    key: &str,
    variant: Option<usize>,
    opts: &DisplayOptions,
) -> Result<(), String> {
    let table = source
        .table_for(key_leading_char(key))?
        .ok_or_else(|| format!("Key '{}' not found", key))?;
    let entry = table
        .get(key)
        .ok_or_else(|| format!("Key '{}' not found", key))?;

    let indices: Vec<usize> = match variant {
        Some(idx) => vec![idx],
        None => (0..entry.variants.len()).collect(),
    };

    for idx in indices {
        let resolved = entry.resolve(idx).ok_or_else(|| {
            format!(
                "Key '{}' has {} variant(s), index {} is out of range",
                key,
                entry.variants.len(),
                idx
            )
        })?;
        println!("{} [{}]", "▸".cyan(), idx);
        println!("  {:<7} {}", "label:".bold(), format_label(&resolved.display_label(), opts));
        println!(
            "  {:<7} {}",
            "url:".bold(),
            absolute_url(opts.base_url.as_deref(), resolved.anchor_url).blue()
        );
        println!("  {:<7} {}", "scope:".bold(), resolved.scope_label.yellow());
    }

    Ok(())
}

/// Interactive search mode
pub fn interactive_search(source: &Source, opts: &DisplayOptions) -> Result<(), String> {
    println!("{}", "╔═══════════════════════════════════════════╗".cyan());
    println!("{}", "║   Documentation Search                    ║".cyan());
    println!("{}", "╚═══════════════════════════════════════════╝".cyan());
    println!("  Source: {}", source.describe().dimmed());
    println!();
    print_help();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", "search>".blue().bold());
        stdout.flush().map_err(|e| e.to_string())?;

        let Some(input) = lines.next() else {
            break;
        };
        let input = input.map_err(|e| e.to_string())?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let result = match parse_command(input) {
            ReplCommand::Quit => {
                println!("Goodbye! 👋");
                break;
            }
            ReplCommand::Help => {
                print_help();
                Ok(())
            }
            ReplCommand::Resolve { key, variant } => resolve(source, key, variant, opts),
            ReplCommand::Key(prefix) => lookup(source, prefix, true, false, opts),
            ReplCommand::Lookup(query) => lookup(source, query, false, false, opts),
            ReplCommand::Invalid(message) => {
                println!("{} {}", "⚠️".yellow(), message);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {}", "❌".red(), e);
        }
        println!();
    }

    Ok(())
}

/// One line of interactive input. Commands start with `:` so that any bare
/// word, `key` and `quit` included, is a symbol search.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand<'a> {
    Quit,
    Help,
    Resolve { key: &'a str, variant: Option<usize> },
    Key(&'a str),
    Lookup(&'a str),
    Invalid(String),
}

fn parse_command(input: &str) -> ReplCommand<'_> {
    let Some(command) = input.strip_prefix(':') else {
        return ReplCommand::Lookup(input);
    };
    let mut parts = command.split_whitespace();

    match parts.next().unwrap_or_default() {
        "q" | "quit" | "exit" => ReplCommand::Quit,
        "h" | "help" | "?" => ReplCommand::Help,
        "r" | "resolve" => match (parts.next(), parts.next()) {
            (Some(key), None) => ReplCommand::Resolve { key, variant: None },
            (Some(key), Some(n)) => match n.parse() {
                Ok(idx) => ReplCommand::Resolve {
                    key,
                    variant: Some(idx),
                },
                Err(_) => ReplCommand::Invalid(format!("Variant must be a number, got '{}'", n)),
            },
            (None, _) => ReplCommand::Invalid("Usage: :resolve <key> [variant]".to_string()),
        },
        "k" | "key" => match parts.next() {
            Some(prefix) => ReplCommand::Key(prefix),
            None => ReplCommand::Invalid("Usage: :key <normalized prefix>".to_string()),
        },
        other => ReplCommand::Invalid(format!("Unknown command ':{}', try :help", other)),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  {}                    - Search symbols by prefix", "<text>".green());
    println!("  {} <prefix>            - Search by normalized key", ":key".green());
    println!("  {} <key> [n]       - Show link target(s) of a key", ":resolve".green());
    println!("  {}                    - Show this help", ":help".green());
    println!("  {}                    - Exit", ":quit".green());
    println!();
}

fn format_label(label: &str, opts: &DisplayOptions) -> String {
    if opts.highlight {
        highlight_cpp(label)
    } else {
        label.green().bold().to_string()
    }
}

/// Display one entry with all of its link targets
fn display_entry(entry: &IndexEntry, opts: &DisplayOptions) {
    let variant_count = entry.variants.len();

    if let [single] = entry.variants.as_slice() {
        let label = unescape_html(&single.label);
        println!(
            "  {} {}  {}",
            "•".cyan(),
            format_label(&label, opts),
            single.scope_label.yellow()
        );
        println!(
            "      {}",
            absolute_url(opts.base_url.as_deref(), &single.anchor_url).dimmed()
        );
        return;
    }

    let label = unescape_html(entry.label());
    println!(
        "  {} {}{}",
        "•".cyan(),
        format_label(&label, opts),
        format!(" ({} matches)", variant_count).dimmed()
    );
    for (idx, variant) in entry.variants.iter().enumerate() {
        let branch = if idx == variant_count - 1 { "    └─" } else { "    ├─" };
        let scope = if variant.scope_label.is_empty() {
            &variant.label
        } else {
            &variant.scope_label
        };
        println!(
            "{} {}  {}",
            branch.cyan(),
            scope.yellow(),
            absolute_url(opts.base_url.as_deref(), &variant.anchor_url).dimmed()
        );
    }
}

/// Print a one-line summary with a separator, used by whole-table commands
pub fn print_table_header(name: &str, index: &SearchIndex) {
    println!("{}", separator().dimmed());
    println!(
        "{} {} ({} entries{})",
        "📚".cyan(),
        name.bold(),
        index.len(),
        if index.is_sorted() { "" } else { ", unsorted" }
    );
}

/// Calculate simple edit distance between two strings (Levenshtein distance)
fn edit_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let mut prev: Vec<usize> = (0..=s2_chars.len()).collect();

    for (i, c1) in s1_chars.iter().enumerate() {
        let mut current = vec![i + 1; s2_chars.len() + 1];
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            current[j + 1] = (prev[j + 1] + 1).min(current[j] + 1).min(prev[j] + cost);
        }
        prev = current;
    }

    prev[s2_chars.len()]
}

/// Labels close to a query that matched nothing, closest first.
///
/// The query is compared against label prefixes of the same length, so a
/// typo early in a long name still finds it.
pub fn get_suggestions(index: &SearchIndex, query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let query_len = query.chars().count();

    let mut scored: Vec<(usize, String)> = index
        .entries()
        .iter()
        .map(|entry| unescape_html(entry.label()))
        .filter_map(|label| {
            let head: String = label.to_lowercase().chars().take(query_len).collect();
            let distance = edit_distance(&query, &head);
            (distance <= 2).then_some((distance, label))
        })
        .collect();

    // Stable sort keeps table order among equal distances
    scored.sort_by_key(|(dist, _)| *dist);
    scored.dedup_by(|a, b| a.1 == b.1);

    scored.into_iter().map(|(_, label)| label).take(5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxsearch::index::sample_index;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("fxaa", "fxaa"), 0);
    }

    #[test]
    fn test_query_key() {
        assert_eq!(query_key("  Factory<", false), "factory_3c");
        assert_eq!(query_key("factory_3c", true), "factory_3c");
    }

    #[test]
    fn test_bare_words_are_searches() {
        assert_eq!(parse_command("key"), ReplCommand::Lookup("key"));
        assert_eq!(parse_command("resolve fxaa"), ReplCommand::Lookup("resolve fxaa"));
        assert_eq!(parse_command("quit"), ReplCommand::Lookup("quit"));
        assert_eq!(parse_command("Factory< T"), ReplCommand::Lookup("Factory< T"));
    }

    #[test]
    fn test_colon_commands() {
        assert_eq!(parse_command(":q"), ReplCommand::Quit);
        assert_eq!(parse_command(":help"), ReplCommand::Help);
        assert_eq!(parse_command(":key factory_3c"), ReplCommand::Key("factory_3c"));
        assert_eq!(
            parse_command(":resolve fxaa 1"),
            ReplCommand::Resolve {
                key: "fxaa",
                variant: Some(1)
            }
        );
        assert_eq!(
            parse_command(":resolve fxaa"),
            ReplCommand::Resolve {
                key: "fxaa",
                variant: None
            }
        );
        assert!(matches!(parse_command(":resolve"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command(":resolve fxaa x"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command(":key"), ReplCommand::Invalid(_)));
        assert_eq!(
            parse_command(":frobnicate"),
            ReplCommand::Invalid("Unknown command ':frobnicate', try :help".to_string())
        );
    }

    #[test]
    fn test_suggestions_for_typo() {
        let suggestions = get_suggestions(sample_index(), "FindEgdes");
        assert_eq!(suggestions.first().map(String::as_str), Some("FindEdges"));
    }

    #[test]
    fn test_suggestions_empty_for_unrelated_query() {
        assert!(get_suggestions(sample_index(), "qqqqqqqq").is_empty());
        assert!(get_suggestions(sample_index(), "   ").is_empty());
    }

    #[test]
    fn test_lookup_and_resolve_run_on_sample() {
        let opts = DisplayOptions {
            base_url: None,
            highlight: false,
            max_results: 3,
        };
        let source = Source::Embedded;
        assert!(lookup(&source, "fil", false, false, &opts).is_ok());
        assert!(lookup(&source, "zzz", false, true, &opts).is_ok());
        assert!(resolve(&source, "fxaa", Some(1), &opts).is_ok());
        assert!(resolve(&source, "fxaa", Some(2), &opts).unwrap_err().contains("out of range"));
        assert!(resolve(&source, "nothing", None, &opts).unwrap_err().contains("not found"));
    }
}
