use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{MemberLensError, Result};

/// Name of the configuration file stored inside the `.memberlens` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store memberlens metadata.
pub const MEMBERLENS_DIR: &str = ".memberlens";

/// Configuration for a memberlens project.
///
/// Points at the roster files backing the two candidate pools and controls
/// how ambiguous results are presented. Resolution itself has no settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Roster of members visible in the current channel, relative to the project root.
    pub channel_roster: Option<String>,
    /// Roster of every community member, relative to the project root.
    pub community_roster: String,
    /// Maximum number of tied candidates listed in text output.
    pub max_listed_candidates: usize,
    /// Whether the CLI prompts to pick among ambiguous candidates.
    pub interactive: bool,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            version: 1,
            channel_roster: Some("channel.json".to_string()),
            community_roster: "community.json".to_string(),
            max_listed_candidates: 10,
            interactive: false,
        }
    }
}

/// Returns the path to the `.memberlens` directory within the given project root.
pub fn get_memberlens_dir(project_root: &Path) -> PathBuf {
    project_root.join(MEMBERLENS_DIR)
}

/// Returns the path to the configuration file (`config.json`) within the `.memberlens` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_memberlens_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default configuration.
pub fn load_config(project_root: &Path) -> Result<LensConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(LensConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| MemberLensError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: LensConfig =
        serde_json::from_str(&contents).map_err(|e| MemberLensError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location.
pub fn save_config(project_root: &Path, config: &LensConfig) -> Result<()> {
    let lens_dir = get_memberlens_dir(project_root);
    fs::create_dir_all(&lens_dir).map_err(|e| MemberLensError::Config {
        message: format!(
            "failed to create memberlens directory '{}': {}",
            lens_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| MemberLensError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| MemberLensError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| MemberLensError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Resolves a roster path from the config against the project root.
///
/// Absolute paths are returned unchanged.
pub fn roster_path(project_root: &Path, roster: &str) -> PathBuf {
    let path = Path::new(roster);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
