use thiserror::Error;

use crate::kind::ReflectionKind;

/// Failures of the symbol-index pipeline. Every variant aborts the build;
/// there is no partial index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot recognize kind code {code:#x} on reflection '{name}'")]
    UnknownKind { name: String, code: u32 },

    #[error("no index disposition for reflection '{name}' of kind {kind} ({code:#x})", code = .kind.code())]
    UnhandledKind { name: String, kind: ReflectionKind },

    #[error("cannot determine HTML class for reflection '{name}' of kind {kind}")]
    MissingRenderClass { name: String, kind: ReflectionKind },

    #[error("reflection '{name}' of kind {kind} is index-worthy but has no parent")]
    Orphan { name: String, kind: ReflectionKind },

    #[error("found {count} index markers; only one is allowed")]
    MultipleMarkers { count: usize },

    #[error("failed to write index markup: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("invalid reflection JSON: {0}")]
    Json(#[from] serde_json::Error),
}
