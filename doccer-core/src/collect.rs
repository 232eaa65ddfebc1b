//! Symbol collection: flattens a reflection tree into the sorted list of
//! entries that make up the cross-repository index.

use tracing::{debug, info};

use crate::error::IndexError;
use crate::kind::{symbolic_kind, KindLookup, ReflectionKind};
use crate::reflection::{ReflectionId, ReflectionTree};

/// A flattened, classified reference to one documented symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub kind: ReflectionKind,
    pub parent_name: String,
}

impl IndexEntry {
    pub fn new(
        name: impl Into<String>,
        kind: ReflectionKind,
        parent_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            parent_name: parent_name.into(),
        }
    }
}

/// What the collector does with a reflection of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Emit an index entry.
    Index,
    /// Containers and members that are never navigable on their own.
    Skip,
    /// Not yet triaged. Collecting such a reflection fails.
    Unhandled,
}

pub fn disposition(kind: ReflectionKind) -> Disposition {
    use ReflectionKind::*;
    match kind {
        Namespace | Enum | Variable | Function | Class | Interface | TypeAlias | Event => {
            Disposition::Index
        }
        Project | Module | EnumMember | Constructor | Property | Method | Accessor => {
            Disposition::Skip
        }
        CallSignature | IndexSignature | ConstructorSignature | Parameter | TypeLiteral
        | TypeParameter | GetSignature | SetSignature | ObjectLiteral | Reference => {
            Disposition::Unhandled
        }
    }
}

/// Walk the whole tree and return its index entries, sorted by upper-cased
/// name. Entries with equal keys keep their encounter order.
pub fn collect(tree: &ReflectionTree) -> Result<Vec<IndexEntry>, IndexError> {
    let mut entries = Vec::new();
    visit(tree, tree.root(), None, &mut entries)?;
    entries.sort_by_cached_key(|entry| entry.name.to_uppercase());
    info!(entries = entries.len(), "Collected index entries");
    Ok(entries)
}

fn visit(
    tree: &ReflectionTree,
    id: ReflectionId,
    parent_name: Option<&str>,
    entries: &mut Vec<IndexEntry>,
) -> Result<(), IndexError> {
    let node = tree.node(id);
    let kind = match symbolic_kind(node.kind_code) {
        KindLookup::Known(kind) => kind,
        KindLookup::Unknown(code) => {
            return Err(IndexError::UnknownKind {
                name: node.name.clone(),
                code,
            })
        }
    };

    match disposition(kind) {
        Disposition::Index => {
            let parent_name = parent_name.ok_or_else(|| IndexError::Orphan {
                name: node.name.clone(),
                kind,
            })?;
            debug!(name = %node.name, %kind, parent = parent_name, "Indexing reflection");
            entries.push(IndexEntry::new(node.name.clone(), kind, parent_name));
        }
        Disposition::Skip => {}
        Disposition::Unhandled => {
            return Err(IndexError::UnhandledKind {
                name: node.name.clone(),
                kind,
            })
        }
    }

    for &child in &node.children {
        visit(tree, child, Some(node.name.as_str()), entries)?;
    }
    Ok(())
}
