//! # contract: seams between the aggregation pipeline and the outside world
//!
//! The pipeline never shells out directly. Fetching repositories and running
//! the documentation compiler go through the [`Fetcher`] and [`Compiler`]
//! traits, so tests can drive the whole pipeline with `mockall` mocks
//! (`MockFetcher`, `MockCompiler`, exported with the `test-export-mocks`
//! feature).

use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::compiler::CompileError;
use crate::config::Repository;
use crate::download::FetchError;

/// Manifest returned from a fetch, describing what was checked out and where.
#[derive(Debug, Clone)]
pub struct FetchedManifest {
    pub repositories: Vec<FetchedRepository>,
}

#[derive(Debug, Clone)]
pub struct FetchedRepository {
    pub name: String,
    /// Checkout directory on the local filesystem.
    pub local_path: PathBuf,
    /// Declared repository, for audit.
    pub repository: Repository,
}

/// Options for the reflect phase: convert the entry points into a JSON dump
/// and render no pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectProject {
    /// Path of the emitted project file.
    pub project_file: PathBuf,
    /// Where the compiler writes its reflection JSON dump.
    pub json_out: PathBuf,
}

/// Options for the render phase: build the site from an indexed dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderProject {
    pub project_file: PathBuf,
    /// Reflection JSON the pages are rendered from.
    pub json_in: PathBuf,
    /// Directory the compiler renders pages into.
    pub out_dir: PathBuf,
}

/// Fetches every configured repository and installs its dependencies.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_all(&self, repositories: &[Repository]) -> Result<FetchedManifest, FetchError>;
}

/// Runs the external reflection-based documentation compiler in two phases,
/// so the dump can be rewritten between them.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Convert the sources and return the path of the reflection JSON dump.
    async fn reflect(&self, project: &ReflectProject) -> Result<PathBuf, CompileError>;

    /// Render the site from a dump and return the output directory.
    async fn render(&self, project: &RenderProject) -> Result<PathBuf, CompileError>;
}
