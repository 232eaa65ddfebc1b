/// `load_config` module: resolves the layered `doccer.json` / `doccer.yaml`
/// configuration for a directory and applies environment overrides.
///
/// # Responsibilities
/// - Walk from the given directory to the filesystem root, merging every config layer found
/// - Apply `DOCCER_OUT_DIR` and `DOCCER_WORK_DIR` on top of the merged result
/// - Surface clear diagnostics: any failure in loading must name the file or variable at fault
///
/// # Errors
/// All errors in this module use `anyhow::Error` for context-rich diagnostics, and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use doccer_core::config::{ConfigLoader, DoccerConfig};
use std::path::{Path, PathBuf};
use tracing::info;

pub const OUT_DIR_ENV: &str = "DOCCER_OUT_DIR";
pub const WORK_DIR_ENV: &str = "DOCCER_WORK_DIR";

/// Loads the merged configuration seen from `dir`, then applies env overrides.
pub fn load_config<P: AsRef<Path>>(dir: P) -> Result<DoccerConfig> {
    let dir = std::path::absolute(dir.as_ref())
        .with_context(|| format!("Failed to resolve {}", dir.as_ref().display()))?;
    let dir = dir.as_path();
    info!(config_dir = ?dir, "Loading layered configuration");

    let mut config = ConfigLoader::new(dir)
        .load()
        .with_context(|| format!("Failed to load configuration for {}", dir.display()))?;

    if let Some(out_dir) = env_path(OUT_DIR_ENV, dir) {
        info!(out_dir = %out_dir.display(), "Output directory overridden from environment");
        config.out_dir = out_dir;
    }
    if let Some(work_dir) = env_path(WORK_DIR_ENV, dir) {
        info!(work_dir = %work_dir.display(), "Work directory overridden from environment");
        config.work_dir = work_dir;
    }

    Ok(config)
}

fn env_path(var: &str, base: &Path) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(|v| base.join(PathBuf::from(v)))
}
