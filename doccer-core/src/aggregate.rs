//! High-level pipeline: fetch → select entry points → reflect → index → render.
//!
//! [`aggregate`] drives one documentation build for a loaded
//! [`DoccerConfig`]. It is fail-fast: the first failing step returns its
//! error and nothing after it runs. The I/O heavy steps go through the
//! [`Fetcher`] and [`Compiler`] traits so the pipeline can be exercised with
//! mocks.
//!
//! The compiler runs twice. The reflect phase only writes the reflection
//! JSON. The dump is then loaded, the symbol index is injected at the marker,
//! and the dump is written back. The render phase builds the site from that
//! indexed dump, so every page sees the injected index.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

use crate::compiler::CompileError;
use crate::config::DoccerConfig;
use crate::contract::{Compiler, Fetcher};
use crate::download::FetchError;
use crate::entry_points::{self, EntryPointError};
use crate::error::IndexError;
use crate::inject::{IndexInjector, InjectionReport};
use crate::project::{self, ProjectError};
use crate::reflection::ReflectionTree;
use crate::reflection_json;
use crate::render::IndexRenderer;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("entry point selection failed: {0}")]
    EntryPoints(#[from] EntryPointError),
    #[error("project emission failed: {0}")]
    Project(#[from] ProjectError),
    #[error("documentation compiler failed: {0}")]
    Compile(#[from] CompileError),
    #[error("index generation failed: {0}")]
    Index(#[from] IndexError),
    #[error("failed to access reflection dump {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct RepositoryReport {
    pub name: String,
    pub local_path: PathBuf,
    pub entry_points: usize,
}

#[derive(Debug)]
pub struct AggregateReport {
    pub repositories: Vec<RepositoryReport>,
    pub project_file: PathBuf,
    pub render_project_file: PathBuf,
    pub reflection_json: PathBuf,
    pub out_dir: PathBuf,
    pub index: InjectionReport,
}

/// Injector configured from the `indexMarker`, `markerPolicy` and
/// `pageLayout` settings.
pub fn injector_for(config: &DoccerConfig) -> IndexInjector {
    IndexInjector::new(config.index_marker.clone())
        .with_policy(config.marker_policy)
        .with_renderer(IndexRenderer::new(config.page_layout))
}

pub async fn aggregate<F, C>(
    config: &DoccerConfig,
    fetcher: &F,
    compiler: &C,
) -> Result<AggregateReport, AggregateError>
where
    F: Fetcher + ?Sized,
    C: Compiler + ?Sized,
{
    info!(
        repositories = config.repositories.len(),
        "[AGGREGATE] Starting documentation build"
    );

    let manifest = fetcher
        .fetch_all(&config.repositories)
        .await
        .map_err(|e| {
            error!(error = %e, "[AGGREGATE][ERROR] Fetch failed");
            e
        })?;
    info!(
        repositories = manifest.repositories.len(),
        "[AGGREGATE] Fetch succeeded"
    );

    let mut selected = Vec::with_capacity(manifest.repositories.len());
    let mut reports = Vec::with_capacity(manifest.repositories.len());
    for fetched in &manifest.repositories {
        let entry_points = entry_points::select(fetched).map_err(|e| {
            error!(repo = %fetched.name, error = %e, "[AGGREGATE][ERROR] Entry point selection failed");
            e
        })?;
        reports.push(RepositoryReport {
            name: fetched.name.clone(),
            local_path: fetched.local_path.clone(),
            entry_points: entry_points.files.len(),
        });
        selected.push(entry_points);
    }

    let project = project::emit(config, &selected)?;
    info!(project = %project.project_file.display(), "[AGGREGATE] Project file emitted");

    let reflection_json = compiler.reflect(&project).await.map_err(|e| {
        error!(error = %e, "[AGGREGATE][ERROR] Reflect phase failed");
        e
    })?;
    info!(json = %reflection_json.display(), "[AGGREGATE] Reflect phase succeeded");

    let (index, tree) = inject_dump(&reflection_json, &reflection_json, &injector_for(config))?;

    let render = project::emit_render(config, &reflection_json, tree.readme.as_deref())?;
    let out_dir = compiler.render(&render).await.map_err(|e| {
        error!(error = %e, "[AGGREGATE][ERROR] Render phase failed");
        e
    })?;
    info!(out_dir = %out_dir.display(), "[AGGREGATE] Render phase succeeded");

    Ok(AggregateReport {
        repositories: reports,
        project_file: project.project_file,
        render_project_file: render.project_file,
        reflection_json,
        out_dir,
        index,
    })
}

/// Load a reflection dump, inject the index, and write the result to `output`
/// (which may be the input path).
pub fn inject_file(
    input: &Path,
    output: &Path,
    injector: &IndexInjector,
) -> Result<InjectionReport, AggregateError> {
    inject_dump(input, output, injector).map(|(report, _)| report)
}

fn inject_dump(
    input: &Path,
    output: &Path,
    injector: &IndexInjector,
) -> Result<(InjectionReport, ReflectionTree), AggregateError> {
    let json = fs::read_to_string(input).map_err(|source| {
        error!(error = ?source, path = %input.display(), "Failed to read reflection dump");
        AggregateError::Io {
            path: input.to_path_buf(),
            source,
        }
    })?;

    let mut tree = reflection_json::from_json(&json)?;
    let report = injector.inject(&mut tree).map_err(|e| {
        error!(error = %e, path = %input.display(), "[AGGREGATE][ERROR] Index injection failed");
        e
    })?;

    let rewritten = reflection_json::to_json(&tree)?;
    fs::write(output, rewritten).map_err(|source| {
        error!(error = ?source, path = %output.display(), "Failed to write reflection dump");
        AggregateError::Io {
            path: output.to_path_buf(),
            source,
        }
    })?;
    info!(
        path = %output.display(),
        entries = report.entries,
        sites = report.injected.len(),
        "Wrote indexed reflection dump"
    );
    Ok((report, tree))
}
