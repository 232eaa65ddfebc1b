//! Selects the files of a checkout that the compiler should treat as
//! documentation entry points.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::contract::FetchedRepository;

#[derive(Debug, Error)]
pub enum EntryPointError {
    #[error("invalid glob pattern '{pattern}' for repository '{repo}': {source}")]
    Pattern {
        repo: String,
        pattern: String,
        source: glob::PatternError,
    },
    #[error("failed to read {path} while expanding entry points: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("entry point patterns of repository '{repo}' matched no files")]
    NoEntryPoints { repo: String },
}

/// Entry points selected for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoints {
    pub repo: String,
    pub files: Vec<PathBuf>,
}

pub fn select(fetched: &FetchedRepository) -> Result<EntryPoints, EntryPointError> {
    let repo = &fetched.repository;
    select_in(
        &fetched.name,
        &fetched.local_path,
        &repo.entry_points,
        &repo.exclude,
    )
}

/// Expand `include` globs under `root`, drop any path matching an
/// `exclude` glob (relative to `root`), and return the files sorted.
pub fn select_in(
    repo: &str,
    root: &Path,
    include: &[String],
    exclude: &[String],
) -> Result<EntryPoints, EntryPointError> {
    let excludes = exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| EntryPointError::Pattern {
                repo: repo.to_string(),
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut files = BTreeSet::new();
    for pattern in include {
        let full = root.join(pattern);
        let matches = glob::glob(&full.to_string_lossy()).map_err(|source| {
            error!(repo, pattern = %pattern, "Invalid entry point pattern");
            EntryPointError::Pattern {
                repo: repo.to_string(),
                pattern: pattern.clone(),
                source,
            }
        })?;
        for entry in matches {
            let path = entry.map_err(|e| EntryPointError::Io {
                path: e.path().to_path_buf(),
                source: e.into(),
            })?;
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if excludes.iter().any(|ex| ex.matches_path(relative)) {
                debug!(repo, path = %relative.display(), "Excluded entry point");
                continue;
            }
            files.insert(path);
        }
    }

    if files.is_empty() {
        error!(repo, "No entry points matched");
        return Err(EntryPointError::NoEntryPoints {
            repo: repo.to_string(),
        });
    }

    info!(repo, count = files.len(), "Selected entry points");
    Ok(EntryPoints {
        repo: repo.to_string(),
        files: files.into_iter().collect(),
    })
}
