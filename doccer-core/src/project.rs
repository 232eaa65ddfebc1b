//! Emits the project files the documentation compiler reads its options from.
//!
//! A build runs the compiler twice. The reflect project converts the entry
//! points into a JSON dump and sets no page output. The render project merges
//! the indexed dump back in and writes the site to `outDir`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::DoccerConfig;
use crate::contract::{ReflectProject, RenderProject};
use crate::entry_points::EntryPoints;

pub const PROJECT_FILE: &str = "typedoc.json";
pub const RENDER_PROJECT_FILE: &str = "typedoc.render.json";
pub const REFLECTION_JSON: &str = "reflection.json";
/// Readme text after injection, handed to the render phase.
pub const INDEXED_README: &str = "readme.indexed.md";

/// Entry point strategy that reads previously generated JSON dumps.
const MERGE_STRATEGY: &str = "merge";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to write compiler project file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialise compiler project file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options understood by TypeDoc's `--options` file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub entry_points: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point_strategy: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<PathBuf>,
}

impl ProjectFile {
    /// Reflect phase: every selected entry point, JSON output only.
    pub fn reflect(config: &DoccerConfig, entry_points: &[EntryPoints]) -> Self {
        Self {
            entry_points: entry_points
                .iter()
                .flat_map(|e| e.files.iter().cloned())
                .collect(),
            entry_point_strategy: None,
            out: None,
            json: Some(config.work_dir.join(REFLECTION_JSON)),
            name: config.name.clone(),
            readme: config.readme.clone(),
        }
    }

    /// Render phase: the indexed dump as the only entry point, pages only.
    pub fn render(config: &DoccerConfig, json_in: &Path, readme: Option<PathBuf>) -> Self {
        Self {
            entry_points: vec![json_in.to_path_buf()],
            entry_point_strategy: Some(MERGE_STRATEGY),
            out: Some(config.out_dir.clone()),
            json: None,
            name: config.name.clone(),
            readme: readme.or_else(|| config.readme.clone()),
        }
    }
}

/// Write the reflect project file into the work dir.
pub fn emit(
    config: &DoccerConfig,
    entry_points: &[EntryPoints],
) -> Result<ReflectProject, ProjectError> {
    let project = ProjectFile::reflect(config, entry_points);
    let path = config.work_dir.join(PROJECT_FILE);
    write(&path, &serde_json::to_string_pretty(&project)?)?;
    info!(
        path = %path.display(),
        entry_points = project.entry_points.len(),
        "Wrote compiler project file"
    );
    Ok(ReflectProject {
        project_file: path,
        json_out: config.work_dir.join(REFLECTION_JSON),
    })
}

/// Write the render project file for an indexed dump.
///
/// When the dump carries readme text it is written next to the project file
/// and replaces the configured readme, so the injected index shows up on the
/// site's landing page.
pub fn emit_render(
    config: &DoccerConfig,
    json_in: &Path,
    indexed_readme: Option<&str>,
) -> Result<RenderProject, ProjectError> {
    let readme = match indexed_readme {
        Some(text) => {
            let path = config.work_dir.join(INDEXED_README);
            write(&path, text)?;
            Some(path)
        }
        None => None,
    };

    let project = ProjectFile::render(config, json_in, readme);
    let path = config.work_dir.join(RENDER_PROJECT_FILE);
    write(&path, &serde_json::to_string_pretty(&project)?)?;
    info!(path = %path.display(), json = %json_in.display(), "Wrote render project file");
    Ok(RenderProject {
        project_file: path,
        json_in: json_in.to_path_buf(),
        out_dir: config.out_dir.clone(),
    })
}

fn write(path: &Path, content: &str) -> Result<(), ProjectError> {
    let io_err = |source: std::io::Error| {
        error!(error = ?source, path = %path.display(), "Failed to write project file");
        ProjectError::Io {
            path: path.to_path_buf(),
            source,
        }
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}
