//! Layered configuration.
//!
//! Every directory from the starting point up to the filesystem root (or a
//! ceiling) may hold a `doccer.json`, or a `doccer.yaml` / `doccer.yml` when
//! there is no JSON file. Layers are deep-merged parent first, so the file
//! closest to the starting directory wins on scalar values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::inject::{MarkerPolicy, DEFAULT_MARKER_TAG};
use crate::render::PageLayout;

pub const CONFIG_FILE_NAMES: [&str; 3] = ["doccer.json", "doccer.yaml", "doccer.yml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to parse YAML config {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("config file {path} must contain an object at the top level")]
    NotAnObject { path: PathBuf },
    #[error("invalid merged configuration: {0}")]
    Schema(#[from] serde_json::Error),
}

/// An external command with its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>, args: &[&str]) -> Self {
        Self {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn default_install() -> Self {
        Self::new("npm", &["install"])
    }

    fn default_compiler() -> Self {
        Self::new("npx", &["typedoc"])
    }
}

/// One source repository to document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    pub url: String,
    /// Branch, tag, or commit. Defaults to `main`.
    #[serde(default)]
    pub reference: Option<String>,
    /// Globs relative to the checkout selecting documentation entry points.
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Whether to install the repository's dependencies after checkout.
    #[serde(default = "default_true")]
    pub install: bool,
}

impl Repository {
    pub fn reference(&self) -> &str {
        self.reference.as_deref().unwrap_or("main")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoccerConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub readme: Option<PathBuf>,
    #[serde(default = "default_marker")]
    pub index_marker: String,
    #[serde(default)]
    pub marker_policy: MarkerPolicy,
    #[serde(default)]
    pub page_layout: PageLayout,
    #[serde(default = "CommandSpec::default_install")]
    pub install: CommandSpec,
    #[serde(default = "CommandSpec::default_compiler")]
    pub compiler: CommandSpec,
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".doccer")
}

fn default_marker() -> String {
    DEFAULT_MARKER_TAG.to_string()
}

fn default_entry_points() -> Vec<String> {
    vec!["src/index.ts".to_string()]
}

fn default_true() -> bool {
    true
}

impl DoccerConfig {
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Make relative paths absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        self.out_dir = base.join(&self.out_dir);
        self.work_dir = base.join(&self.work_dir);
        if let Some(readme) = self.readme.take() {
            self.readme = Some(base.join(readme));
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            out_dir = %self.out_dir.display(),
            work_dir = %self.work_dir.display(),
            repositories = self.repositories.len(),
            "Loaded doccer config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}

/// Discovers and merges configuration layers.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    start: PathBuf,
    ceiling: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
            ceiling: None,
        }
    }

    /// Stop the upward walk at `ceiling` (inclusive).
    pub fn with_ceiling(mut self, ceiling: impl Into<PathBuf>) -> Self {
        self.ceiling = Some(ceiling.into());
        self
    }

    /// Load, merge, deserialise, and resolve paths against the start dir.
    pub fn load(&self) -> Result<DoccerConfig, ConfigError> {
        let start = absolute(&self.start)?;
        let (merged, files) = self.merged_value()?;
        info!(layers = files.len(), start = %start.display(), "Merged config layers");
        let mut config = DoccerConfig::from_value(merged).map_err(|e| {
            error!(error = %e, "Merged configuration does not match the schema");
            e
        })?;
        config.resolve_paths(&start);
        config.trace_loaded();
        Ok(config)
    }

    /// The merged raw value plus the files it was built from, root first.
    pub fn merged_value(&self) -> Result<(Value, Vec<PathBuf>), ConfigError> {
        let mut merged = Value::Object(Default::default());
        let mut files = Vec::new();
        for dir in self.layer_dirs()? {
            if let Some((path, layer)) = read_layer(&dir)? {
                debug!(path = %path.display(), "Merging config layer");
                merged = deep_merge(merged, layer);
                files.push(path);
            }
        }
        Ok((merged, files))
    }

    /// Directories to search, outermost first. Relative start and ceiling
    /// paths are taken against the current directory.
    fn layer_dirs(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let start = absolute(&self.start)?;
        let ceiling = self.ceiling.as_deref().map(absolute).transpose()?;
        let mut dirs = Vec::new();
        for dir in start.ancestors() {
            dirs.push(dir.to_path_buf());
            if ceiling.as_deref() == Some(dir) {
                break;
            }
        }
        dirs.reverse();
        Ok(dirs)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| {
        error!(error = ?source, path = %path.display(), "Failed to resolve config directory");
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn read_layer(dir: &Path) -> Result<Option<(PathBuf, Value)>, ConfigError> {
    let Some(path) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
    else {
        return Ok(None);
    };

    let content = fs::read_to_string(&path).map_err(|source| {
        error!(error = ?source, path = %path.display(), "Failed to read config file");
        ConfigError::Io {
            path: path.clone(),
            source,
        }
    })?;

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let value: Value = if is_json {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.clone(),
            source,
        })?
    };

    match value {
        Value::Null => Ok(None),
        Value::Object(_) => Ok(Some((path, value))),
        _ => Err(ConfigError::NotAnObject { path }),
    }
}

/// Merge `overlay` onto `base`: objects merge per key, arrays concatenate,
/// anything else is replaced by the overlay.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (Value::Array(mut base), Value::Array(overlay)) => {
            base.extend(overlay);
            Value::Array(base)
        }
        (_, overlay) => overlay,
    }
}
