//! Configuration management for ghq-nav
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GHQ_NAV_*)
//! 3. Config file (~/.config/ghq-nav/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Executables used to answer repository and package queries
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tools {
    /// Path to the ghq executable
    pub ghq: String,

    /// Path to the git executable
    pub git: String,

    /// Path to the npm executable
    pub npm: String,

    /// Path to the gem executable
    pub gem: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            ghq: "ghq".to_string(),
            git: "git".to_string(),
            npm: "npm".to_string(),
            gem: "gem".to_string(),
        }
    }
}

/// Editor used by the terminal host to open folders and files
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Editor command line program
    pub command: String,

    /// Flag asking the editor for a fresh window
    pub new_window_flag: String,

    /// Flag asking the editor to reuse the current window
    pub reuse_window_flag: String,

    /// Flag adding a folder to the current workspace
    pub add_flag: String,

    /// Workspace file holding the folder list, if any
    pub workspace_file: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: "code".to_string(),
            new_window_flag: "--new-window".to_string(),
            reuse_window_flag: "--reuse-window".to_string(),
            add_flag: "--add".to_string(),
            workspace_file: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// External tool configuration
    pub tools: Tools,

    /// Editor configuration
    pub editor: EditorConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/ghq-nav/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ghq-nav").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GHQ_NAV_GHQ, GHQ_NAV_GIT, GHQ_NAV_NPM, GHQ_NAV_GEM: tool paths
    /// - GHQ_NAV_EDITOR: editor command
    /// - GHQ_NAV_WORKSPACE_FILE: workspace file path
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ghq) = lookup("GHQ_NAV_GHQ") {
            self.tools.ghq = ghq;
        }
        if let Some(git) = lookup("GHQ_NAV_GIT") {
            self.tools.git = git;
        }
        if let Some(npm) = lookup("GHQ_NAV_NPM") {
            self.tools.npm = npm;
        }
        if let Some(gem) = lookup("GHQ_NAV_GEM") {
            self.tools.gem = gem;
        }
        if let Some(editor) = lookup("GHQ_NAV_EDITOR") {
            self.editor.command = editor;
        }
        if let Some(file) = lookup("GHQ_NAV_WORKSPACE_FILE") {
            self.editor.workspace_file = Some(PathBuf::from(file));
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, ghq_path: Option<String>, editor: Option<String>) -> Self {
        if let Some(path) = ghq_path {
            self.tools.ghq = path;
        }

        if let Some(editor) = editor {
            self.editor.command = editor;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(ghq_path: Option<String>, editor: Option<String>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(ghq_path, editor))
    }
}
