use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::category::PiiCategory;
use crate::error::{PiiError, Result};
use crate::finder::{FinderOptions, TaskSelection};

/// Returns the global config file path: `~/.config/pii-extract/config.yml`
pub fn default_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home)
        .join(".config")
        .join("pii-extract")
        .join("config.yml")
}

/// Extraction settings, usually read from a YAML file and then
/// overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Document language. Default: `en`.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Countries to add country-specific detectors for.
    #[serde(default)]
    pub country: Option<Vec<String>>,

    /// Category names to detect.
    #[serde(default)]
    pub tasks: Vec<String>,

    /// Use every detector applicable to the language/countries.
    #[serde(default)]
    pub all_tasks: bool,

    /// Definition batch files added to the finder after construction.
    #[serde(default)]
    pub taskfiles: Vec<PathBuf>,
}

fn default_lang() -> String {
    "en".into()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            country: None,
            tasks: Vec::new(),
            all_tasks: false,
            taskfiles: Vec::new(),
        }
    }
}

impl ExtractConfig {
    /// Load config from a YAML file. Returns default if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| PiiError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Finder construction parameters. `all_tasks` wins over `tasks`.
    pub fn finder_options(&self) -> Result<FinderOptions> {
        let tasks = if self.all_tasks {
            TaskSelection::All
        } else if self.tasks.is_empty() {
            TaskSelection::None
        } else {
            let categories = self
                .tasks
                .iter()
                .map(|t| {
                    t.parse::<PiiCategory>()
                        .map_err(|reason| PiiError::InvalidArgument { reason })
                })
                .collect::<Result<Vec<_>>>()?;
            TaskSelection::Categories(categories)
        };
        Ok(FinderOptions {
            lang: self.lang.clone(),
            countries: self.country.clone(),
            tasks,
        })
    }
}
