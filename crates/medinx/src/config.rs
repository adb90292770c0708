//! # Configuration
//!
//! Medinx configuration is loaded with [`confique`] from TOML files and
//! environment variables.
//!
//! ## Storage Hierarchy
//!
//! Resolved in priority order:
//! 1. **Environment variables**: `MEDINX_SIDECAR_EXT`, `MEDINX_FOLLOW_LINKS`.
//! 2. **Project Config**: `<root>/.medinx.toml`, for the indexed tree.
//! 3. **Global Config**: `medinx.toml` in the OS config directory (via `directories`).
//! 4. **Compiled Defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `sidecar_ext` | `.mdf` | Extension appended to a path to name its side-car |
//! | `follow_links` | `false` | Follow symbolic links while scanning |

use std::path::{Path, PathBuf};

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{MedinxError, Result};

pub const PROJECT_CONFIG_FILE: &str = ".medinx.toml";
pub const GLOBAL_CONFIG_FILE: &str = "medinx.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MedinxConfig {
    /// Side-car extension (e.g. ".mdf", ".meta")
    #[config(default = ".mdf", env = "MEDINX_SIDECAR_EXT")]
    pub sidecar_ext: String,

    /// Follow symbolic links while scanning a folder
    #[config(default = false, env = "MEDINX_FOLLOW_LINKS")]
    pub follow_links: bool,
}

impl Default for MedinxConfig {
    fn default() -> Self {
        Self {
            sidecar_ext: ".mdf".to_string(),
            follow_links: false,
        }
    }
}

impl MedinxConfig {
    /// Loads the layered configuration for the tree rooted at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let mut builder = Self::builder()
            .env()
            .file(root.join(PROJECT_CONFIG_FILE));
        if let Some(global) = global_config_path() {
            builder = builder.file(global);
        }
        let config = builder
            .load()
            .map_err(|e| MedinxError::Config(e.to_string()))?;
        tracing::debug!(?config, root = %root.display(), "configuration loaded");
        Ok(config)
    }

    /// The side-car extension, normalized to start with a dot.
    pub fn sidecar_ext(&self) -> String {
        if self.sidecar_ext.starts_with('.') {
            self.sidecar_ext.clone()
        } else {
            format!(".{}", self.sidecar_ext)
        }
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "medinx").map(|dirs| dirs.config_dir().join(GLOBAL_CONFIG_FILE))
}
