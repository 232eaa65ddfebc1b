use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use futures::future::try_join_all;
use thiserror::Error;

use crate::config::{CommandSpec, Repository};
use crate::contract::{FetchedManifest, FetchedRepository, Fetcher};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to launch `{command}` for repository '{repo}': {source}")]
    Launch {
        repo: String,
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` for repository '{repo}' exited with {status}")]
    Status {
        repo: String,
        command: String,
        status: std::process::ExitStatus,
    },
    #[error("fetch worker for repository '{repo}' panicked or was cancelled")]
    Join { repo: String },
}

/// Deterministic checkout directory for a repository inside `work_dir`.
pub fn checkout_dir(work_dir: &Path, repo: &Repository) -> PathBuf {
    let dir_name = format!("{}_{}", repo.name, repo.reference())
        .replace(['/', '\\', ':'], "_");
    work_dir.join(dir_name)
}

/// Fetches with the `git` command line and installs dependencies with the
/// configured install command.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    work_dir: PathBuf,
    install: CommandSpec,
}

impl GitFetcher {
    pub fn new(work_dir: impl Into<PathBuf>, install: CommandSpec) -> Self {
        Self {
            work_dir: work_dir.into(),
            install,
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for GitFetcher {
    async fn fetch_all(&self, repositories: &[Repository]) -> Result<FetchedManifest, FetchError> {
        fs::create_dir_all(&self.work_dir).map_err(|source| {
            tracing::error!(error = ?source, path = %self.work_dir.display(), "Failed to create work directory");
            FetchError::Io {
                path: self.work_dir.clone(),
                source,
            }
        })?;

        let fetches = repositories.iter().cloned().map(|repo| {
            let work_dir = self.work_dir.clone();
            let install = self.install.clone();
            async move {
                let name = repo.name.clone();
                tokio::task::spawn_blocking(move || fetch_one(&work_dir, &install, repo))
                    .await
                    .map_err(|_| FetchError::Join { repo: name })?
            }
        });
        let fetched = try_join_all(fetches).await?;

        tracing::info!(repositories = fetched.len(), "All repositories fetched");
        Ok(FetchedManifest {
            repositories: fetched,
        })
    }
}

/// Clone, check out, and optionally install one repository.
pub fn fetch_one(
    work_dir: &Path,
    install: &CommandSpec,
    repo: Repository,
) -> Result<FetchedRepository, FetchError> {
    let path = checkout_dir(work_dir, &repo);

    // Start from a clean clone every time.
    if path.exists() {
        fs::remove_dir_all(&path).map_err(|source| {
            tracing::error!(error = ?source, path = %path.display(), "Failed to remove existing checkout");
            FetchError::Io {
                path: path.clone(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), "Removed existing checkout");
    }

    let mut clone = Command::new("git");
    clone.arg("clone").arg(&repo.url).arg(&path);
    run(&repo, "git clone", clone)?;
    tracing::info!(repo = %repo.name, url = %repo.url, path = %path.display(), "Cloned repository");

    let mut checkout = Command::new("git");
    checkout
        .arg("-C")
        .arg(&path)
        .arg("checkout")
        .arg(repo.reference());
    run(&repo, "git checkout", checkout)?;
    tracing::info!(repo = %repo.name, reference = repo.reference(), "Checked out reference");

    if repo.install {
        let mut cmd = Command::new(&install.command);
        cmd.args(&install.args).current_dir(&path);
        run(&repo, &install.command, cmd)?;
        tracing::info!(repo = %repo.name, command = %install.command, "Installed dependencies");
    } else {
        tracing::debug!(repo = %repo.name, "Dependency install disabled");
    }

    Ok(FetchedRepository {
        name: repo.name.clone(),
        local_path: path,
        repository: repo,
    })
}

fn run(repo: &Repository, label: &str, mut cmd: Command) -> Result<(), FetchError> {
    match cmd.status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => {
            tracing::error!(repo = %repo.name, command = label, %status, "Command exited with non-zero code");
            Err(FetchError::Status {
                repo: repo.name.clone(),
                command: label.to_string(),
                status,
            })
        }
        Err(source) => {
            tracing::error!(repo = %repo.name, command = label, error = ?source, "Failed to launch command");
            Err(FetchError::Launch {
                repo: repo.name.clone(),
                command: label.to_string(),
                source,
            })
        }
    }
}
