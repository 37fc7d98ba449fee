use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use page_loader::fetch::HttpOptions;
use page_loader::loader::DownloadOptions;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    pub http: HttpSettings,
    pub download: DownloadSettings,
}

/// HTTP client settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub accept_invalid_certs: bool,
}

/// Asset download settings
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DownloadSettings {
    /// Per-asset deadline in seconds; none by default
    pub task_timeout_secs: Option<u64>,

    /// Simultaneous downloads; unbounded by default
    pub max_concurrent: Option<usize>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        let defaults = HttpOptions::default();
        Self {
            user_agent: defaults.user_agent,
            request_timeout_secs: defaults.timeout.as_secs(),
            accept_invalid_certs: defaults.accept_invalid_certs,
        }
    }
}

impl HttpSettings {
    pub fn to_options(&self) -> HttpOptions {
        HttpOptions {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}

impl DownloadSettings {
    pub fn to_options(&self) -> DownloadOptions {
        DownloadOptions {
            task_timeout: self.task_timeout_secs.map(Duration::from_secs),
            max_concurrent: self.max_concurrent,
        }
    }
}

impl LoaderConfig {
    /// Get the path to the config directory
    fn config_dir() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "page-loader", "page-loader")
        {
            proj_dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from("./config")
        }
    }

    /// Load a profile by name; `default` is created on first use
    pub fn load(profile: &str) -> Result<Self> {
        let config_dir = Self::config_dir();

        if profile == "default" {
            Self::load_or_create(&config_dir.join("default.yaml"))
        } else {
            Self::load_profile(&config_dir, profile)
        }
    }

    /// Apply per-run command line overrides on top of the profile
    pub fn with_overrides(
        mut self,
        task_timeout_secs: Option<u64>,
        max_concurrent: Option<usize>,
    ) -> Self {
        if let Some(secs) = task_timeout_secs {
            self.download.task_timeout_secs = Some(secs);
        }
        if let Some(limit) = max_concurrent {
            self.download.max_concurrent = Some(limit);
        }
        self
    }

    fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from_file(path);
        }

        // First run: write the defaults out so they can be edited
        info!("Default configuration not found. Creating {}", path.display());
        let config = Self::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    fn load_profile(config_dir: &Path, profile: &str) -> Result<Self> {
        let profile_path = config_dir
            .join("profiles")
            .join(format!("{}.yaml", profile));

        if profile_path.exists() {
            Self::load_from_file(&profile_path)
        } else {
            anyhow::bail!(
                "Profile '{}' not found (expected {})",
                profile,
                profile_path.display()
            )
        }
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let contents = fs::read_to_string(path)
            .context(format!("Failed to read configuration file: {}", path.display()))?;

        // Missing sections fall back to their defaults
        serde_yaml::from_str(&contents)
            .context(format!("Failed to parse configuration file: {}", path.display()))
    }

    /// Save the configuration to a file
    fn save_to_file(&self, path: &Path) -> Result<()> {
        debug!("Saving configuration to: {}", path.display());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = serde_yaml::to_string(self).context("Failed to serialize configuration")?;
        fs::write(path, contents)
            .context(format!("Failed to write configuration file: {}", path.display()))
    }
}
