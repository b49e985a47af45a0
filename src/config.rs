use colored::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const CONFIG_FILE: &str = "doxsearch.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Single search table, e.g. `html/search/classes_5.js`
    #[serde(default)]
    pub index_file: Option<PathBuf>,
    /// Doxygen `search/` directory containing `searchdata.js`
    #[serde(default)]
    pub search_dir: Option<PathBuf>,
    #[serde(default = "default_section")]
    pub section: String,
    /// Prefix for anchor URLs when printing links
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_highlight")]
    pub highlight: bool,
}

fn default_section() -> String {
    "all".to_string()
}

fn default_max_results() -> usize {
    20
}

fn default_highlight() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_file: None,
            search_dir: None,
            section: default_section(),
            base_url: None,
            max_results: default_max_results(),
            highlight: default_highlight(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = PathBuf::from(CONFIG_FILE);

        if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(content) => match Self::from_toml(&content) {
                    Ok(config) => {
                        return config;
                    }
                    Err(e) => {
                        eprintln!("{} Failed to parse {}: {}", "⚠️".yellow(), CONFIG_FILE, e);
                        eprintln!("   Using default configuration");
                    }
                },
                Err(e) => {
                    eprintln!("{} Failed to read {}: {}", "⚠️".yellow(), CONFIG_FILE, e);
                    eprintln!("   Using default configuration");
                }
            }
        }

        Config::default()
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
