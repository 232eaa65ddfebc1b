use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::CommandSpec;
use crate::contract::{Compiler, ReflectProject, RenderProject};

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to launch documentation compiler `{command}`: {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },
    #[error("documentation compiler `{command}` exited with {status}")]
    Status {
        command: String,
        status: std::process::ExitStatus,
    },
    #[error("documentation compiler did not produce {path}")]
    MissingOutput { path: PathBuf },
    #[error("compiler worker panicked or was cancelled")]
    Join,
}

/// Runs a TypeDoc-compatible compiler as `<command> <args..> --options <project file>`.
#[derive(Debug, Clone)]
pub struct TypedocCompiler {
    command: CommandSpec,
}

impl TypedocCompiler {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }

    fn run(command: &CommandSpec, project_file: &Path, expected: &Path) -> Result<(), CompileError> {
        let mut cmd = Command::new(&command.command);
        cmd.args(&command.args).arg("--options").arg(project_file);
        if let Some(dir) = project_file.parent() {
            cmd.current_dir(dir);
        }

        tracing::info!(
            command = %command.command,
            project = %project_file.display(),
            "Running documentation compiler"
        );
        let status = cmd.status().map_err(|source| {
            tracing::error!(error = ?source, command = %command.command, "Failed to launch documentation compiler");
            CompileError::Launch {
                command: command.command.clone(),
                source,
            }
        })?;
        if !status.success() {
            tracing::error!(command = %command.command, %status, "Documentation compiler exited with non-zero code");
            return Err(CompileError::Status {
                command: command.command.clone(),
                status,
            });
        }
        if !expected.exists() {
            tracing::error!(path = %expected.display(), "Compiler output missing");
            return Err(CompileError::MissingOutput {
                path: expected.to_path_buf(),
            });
        }
        Ok(())
    }

    async fn run_blocking(&self, project_file: PathBuf, expected: PathBuf) -> Result<PathBuf, CompileError> {
        let command = self.command.clone();
        tokio::task::spawn_blocking(move || {
            Self::run(&command, &project_file, &expected).map(|()| expected)
        })
        .await
        .map_err(|_| CompileError::Join)?
    }
}

#[async_trait::async_trait]
impl Compiler for TypedocCompiler {
    async fn reflect(&self, project: &ReflectProject) -> Result<PathBuf, CompileError> {
        self.run_blocking(project.project_file.clone(), project.json_out.clone())
            .await
    }

    async fn render(&self, project: &RenderProject) -> Result<PathBuf, CompileError> {
        self.run_blocking(project.project_file.clone(), project.out_dir.clone())
            .await
    }
}
