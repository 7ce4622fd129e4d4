//! Configuration file support for deploy-pruner

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub kubectl: KubectlSettings,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub behavior: Behavior,
}

/// How to reach the cluster tool
#[derive(Debug, Deserialize, Clone)]
pub struct KubectlSettings {
    #[serde(default = "default_kubectl_binary")]
    pub binary: String,

    /// Optional kubeconfig passed to every kubectl invocation.
    /// If not set, kubectl uses its own lookup rules.
    #[serde(default)]
    pub kubeconfig: Option<String>,
}

/// Default query scope, overridden by command-line flags
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Defaults {
    /// Comma-separated namespaces; empty queries without a namespace flag
    #[serde(default)]
    pub namespaces: String,

    /// Comma-separated resource types; empty discovers them from the cluster
    #[serde(default)]
    pub resource_types: String,
}

/// Behavior settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Behavior {
    #[serde(default)]
    pub dry_run: bool,
}

fn default_kubectl_binary() -> String {
    "kubectl".to_string()
}

impl Default for KubectlSettings {
    fn default() -> Self {
        Self {
            binary: default_kubectl_binary(),
            kubeconfig: None,
        }
    }
}

/// Values given on the command line; `None` leaves the settings value in place
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub kubectl: Option<String>,
    pub kubeconfig: Option<String>,
    pub namespaces: Option<String>,
    pub resource_types: Option<String>,
    pub dry_run: Option<bool>,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist and parse. Otherwise the standard
    /// locations are searched; a broken discovered file falls back to
    /// defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let config_dir = dirs::config_dir();
        Ok(Self::load_discovered(Self::find_config_file_in(
            &cwd,
            config_dir.as_deref(),
        )))
    }

    /// Load a discovered file, falling back to defaults if it is unusable
    pub fn load_discovered(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::load_from_file(&path).unwrap_or_else(|e| {
                crate::log_warn!("Ignoring config file: {:#}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        crate::log_info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .deploy-pruner.toml in `cwd`
    /// 2. deploy-pruner/config.toml under `config_dir` (XDG config directory)
    pub fn find_config_file_in(cwd: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
        let local_config = cwd.join(".deploy-pruner.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = config_dir {
            let xdg_config = config_dir.join("deploy-pruner").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Apply command-line values on top of these settings
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(binary) = overrides.kubectl {
            self.kubectl.binary = binary;
        }
        if let Some(kubeconfig) = overrides.kubeconfig {
            self.kubectl.kubeconfig = Some(kubeconfig);
        }
        if let Some(namespaces) = overrides.namespaces {
            self.defaults.namespaces = namespaces;
        }
        if let Some(resource_types) = overrides.resource_types {
            self.defaults.resource_types = resource_types;
        }
        if let Some(dry_run) = overrides.dry_run {
            self.behavior.dry_run = dry_run;
        }
        self
    }
}
