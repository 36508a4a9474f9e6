//! Configuration handling for Planport
//!
//! The configuration lives in a single JSON document (`inputs/config.json`)
//! describing API credentials, the board, the target list, label rules, the
//! user map and an optional skip-keyword list. It is loaded once and is
//! immutable for the run.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "You must provide the config file at {0} (hint: run with --setup and \
         use config.example.json as a guide)"
    )]
    Missing(String),

    #[error(
        "Invalid configuration ({reason}). You must at least provide the board \
         id and api object:\n{example}",
        example = EXAMPLE_CONFIG
    )]
    Invalid { reason: String },
}

const EXAMPLE_CONFIG: &str = r#"{
  "api": { "key": "api key", "token": "user token" },
  "board": "board id"
}"#;

/// API credentials sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredentials {
    pub key: String,
    pub token: String,
}

/// A configured mapping from keyword matches to a label id
///
/// If `parent` is set, the rule only applies while the ambient category
/// equals it. If `search_only_in_category` is set, the rule's keywords are
/// tested against a task's category field only, never its name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRule {
    pub id: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub search_only_in_category: bool,
}

/// Loaded configuration, immutable for the run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api: ApiCredentials,

    /// Board id, used by setup mode to fetch members, labels and lists
    pub board: String,

    /// List the imported cards land on; only required in import mode
    #[serde(default)]
    pub target_list: Option<String>,

    /// Label rules, applied to every row in order
    #[serde(default)]
    pub labels: Vec<LabelRule>,

    /// Keywords that cause a whole task row to be discarded
    #[serde(default)]
    pub skip: Vec<String>,

    /// Resource name to member id
    #[serde(default)]
    pub users: HashMap<String, String>,
}

impl Config {
    /// Loads the configuration from a JSON file
    ///
    /// Fails with [`ConfigError::Missing`] if the file does not exist and
    /// [`ConfigError::Invalid`] if it cannot be parsed or lacks a required
    /// field (`api.key`, `api.token`, `board`). Nothing beyond presence is
    /// validated here; malformed label rules or user maps surface later
    /// during row processing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.display().to_string()).into());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Invalid {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    /// Returns the target list id, required in import mode
    pub fn require_target_list(&self) -> Result<&str> {
        self.target_list
            .as_deref()
            .ok_or_else(|| {
                ConfigError::Invalid {
                    reason: "targetList is required to import tasks".to_string(),
                }
                .into()
            })
    }
}
