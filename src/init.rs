use colored::*;
use std::{fs, path::Path};

use crate::config::CONFIG_FILE;

const TEMPLATE: &str = r#"# doxsearch Configuration File

# A single search table to query
# index_file = "html/search/classes_5.js"

# Or a whole Doxygen search directory (containing searchdata.js)
# search_dir = "html/search"

# Section used with search_dir: all, classes, namespaces, files, functions, ...
section = "all"

# HTML output directory (or a page in it) that anchor URLs are resolved against
# base_url = "https://example.org/docs/html"

# Maximum number of results shown by lookup
max_results = 20

# Highlight C++ labels in terminal output
highlight = true
"#;

pub fn init_config(force: bool) -> Result<(), String> {
    write_template(Path::new(CONFIG_FILE), force)?;

    println!("{} Created {}", "✅".green(), CONFIG_FILE);
    println!("\n{}", "Configuration file created with defaults:".cyan());
    println!("  {} section = \"all\"", "•".blue());
    println!("  {} max_results = 20", "•".blue());
    println!("  {} highlight = true", "•".blue());
    println!(
        "\n{}",
        "Set index_file or search_dir to point at your documentation.".cyan()
    );

    Ok(())
}

fn write_template(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        ));
    }

    fs::write(path, TEMPLATE).map_err(|e| format!("Failed to create {}: {}", path.display(), e))
}
