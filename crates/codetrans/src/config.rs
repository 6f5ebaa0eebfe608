//! Rendering configuration.
//!
//! ```toml
//! indent = "    "
//! interpolate = false
//! script_roots = ["scripts", "/opt/shared/scripts"]
//! ```

use crate::script::DirLoader;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings shared by every backend session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// One level of indentation.
    pub indent: String,
    /// Render string concatenation as interpolated strings where the
    /// target supports it.
    pub interpolate: bool,
    /// Directories searched for script resources.
    pub script_roots: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            interpolate: true,
            script_roots: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Resource loader over `script_roots`.
    pub fn loader(&self) -> DirLoader {
        DirLoader::new(self.script_roots.clone())
    }
}
