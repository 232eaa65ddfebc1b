//! Kind catalog: the bit-flag kind codes a reflection compiler assigns to
//! documented symbols, and the lookups the index pipeline needs on top of them.
//!
//! The code space follows TypeDoc's `ReflectionKind`. When upstream grows a
//! new kind, add a variant here; the exhaustive matches in this module and in
//! [`crate::collect::disposition`] then refuse to compile until the new kind
//! is triaged.

use std::fmt;

/// Symbolic name for a reflection kind code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReflectionKind {
    Project,
    Module,
    Namespace,
    Enum,
    EnumMember,
    Variable,
    Function,
    Class,
    Interface,
    Constructor,
    Property,
    Method,
    CallSignature,
    IndexSignature,
    ConstructorSignature,
    Parameter,
    TypeLiteral,
    TypeParameter,
    Accessor,
    GetSignature,
    SetSignature,
    ObjectLiteral,
    TypeAlias,
    Event,
    Reference,
}

/// Every kind the catalog knows, in code order.
pub const ALL_KINDS: [ReflectionKind; 25] = [
    ReflectionKind::Project,
    ReflectionKind::Module,
    ReflectionKind::Namespace,
    ReflectionKind::Enum,
    ReflectionKind::EnumMember,
    ReflectionKind::Variable,
    ReflectionKind::Function,
    ReflectionKind::Class,
    ReflectionKind::Interface,
    ReflectionKind::Constructor,
    ReflectionKind::Property,
    ReflectionKind::Method,
    ReflectionKind::CallSignature,
    ReflectionKind::IndexSignature,
    ReflectionKind::ConstructorSignature,
    ReflectionKind::Parameter,
    ReflectionKind::TypeLiteral,
    ReflectionKind::TypeParameter,
    ReflectionKind::Accessor,
    ReflectionKind::GetSignature,
    ReflectionKind::SetSignature,
    ReflectionKind::ObjectLiteral,
    ReflectionKind::TypeAlias,
    ReflectionKind::Event,
    ReflectionKind::Reference,
];

impl ReflectionKind {
    /// The numeric bit flag for this kind.
    pub fn code(self) -> u32 {
        match self {
            ReflectionKind::Project => 0x1,
            ReflectionKind::Module => 0x2,
            ReflectionKind::Namespace => 0x4,
            ReflectionKind::Enum => 0x8,
            ReflectionKind::EnumMember => 0x10,
            ReflectionKind::Variable => 0x20,
            ReflectionKind::Function => 0x40,
            ReflectionKind::Class => 0x80,
            ReflectionKind::Interface => 0x100,
            ReflectionKind::Constructor => 0x200,
            ReflectionKind::Property => 0x400,
            ReflectionKind::Method => 0x800,
            ReflectionKind::CallSignature => 0x1000,
            ReflectionKind::IndexSignature => 0x2000,
            ReflectionKind::ConstructorSignature => 0x4000,
            ReflectionKind::Parameter => 0x8000,
            ReflectionKind::TypeLiteral => 0x10000,
            ReflectionKind::TypeParameter => 0x20000,
            ReflectionKind::Accessor => 0x40000,
            ReflectionKind::GetSignature => 0x80000,
            ReflectionKind::SetSignature => 0x100000,
            ReflectionKind::ObjectLiteral => 0x200000,
            ReflectionKind::TypeAlias => 0x400000,
            ReflectionKind::Event => 0x800000,
            ReflectionKind::Reference => 0x1000000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReflectionKind::Project => "Project",
            ReflectionKind::Module => "Module",
            ReflectionKind::Namespace => "Namespace",
            ReflectionKind::Enum => "Enum",
            ReflectionKind::EnumMember => "EnumMember",
            ReflectionKind::Variable => "Variable",
            ReflectionKind::Function => "Function",
            ReflectionKind::Class => "Class",
            ReflectionKind::Interface => "Interface",
            ReflectionKind::Constructor => "Constructor",
            ReflectionKind::Property => "Property",
            ReflectionKind::Method => "Method",
            ReflectionKind::CallSignature => "CallSignature",
            ReflectionKind::IndexSignature => "IndexSignature",
            ReflectionKind::ConstructorSignature => "ConstructorSignature",
            ReflectionKind::Parameter => "Parameter",
            ReflectionKind::TypeLiteral => "TypeLiteral",
            ReflectionKind::TypeParameter => "TypeParameter",
            ReflectionKind::Accessor => "Accessor",
            ReflectionKind::GetSignature => "GetSignature",
            ReflectionKind::SetSignature => "SetSignature",
            ReflectionKind::ObjectLiteral => "ObjectLiteral",
            ReflectionKind::TypeAlias => "TypeAlias",
            ReflectionKind::Event => "Event",
            ReflectionKind::Reference => "Reference",
        }
    }

    /// Kinds the compiler renders on a page of their own rather than as an
    /// anchor inside their parent's page.
    pub fn has_own_page(self) -> bool {
        matches!(
            self,
            ReflectionKind::Class | ReflectionKind::Enum | ReflectionKind::TypeAlias
        )
    }
}

impl fmt::Display for ReflectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of looking a raw code up in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindLookup {
    Known(ReflectionKind),
    /// The code is outside the catalog; carries the raw value for diagnostics.
    Unknown(u32),
}

/// Resolve a raw kind code. Total over `u32`.
pub fn symbolic_kind(code: u32) -> KindLookup {
    ALL_KINDS
        .iter()
        .copied()
        .find(|kind| kind.code() == code)
        .map_or(KindLookup::Unknown(code), KindLookup::Known)
}

/// CSS class token used for a kind in the rendered index.
///
/// Only index-worthy kinds are registered. Everything else yields `None`,
/// which the renderer treats as an inconsistency in its own tables.
pub fn render_class(kind: ReflectionKind) -> Option<&'static str> {
    match kind {
        ReflectionKind::Namespace => Some("tsd-kind-namespace"),
        ReflectionKind::Enum => Some("tsd-kind-enum"),
        ReflectionKind::Variable => Some("tsd-kind-variable"),
        ReflectionKind::Function => Some("tsd-kind-function"),
        ReflectionKind::Class => Some("tsd-kind-class"),
        ReflectionKind::Interface => Some("tsd-kind-interface"),
        ReflectionKind::TypeAlias => Some("tsd-kind-type-alias"),
        ReflectionKind::Event => Some("tsd-kind-event"),
        _ => None,
    }
}

/// Folder the compiler places a kind's pages in when using its directory
/// layout.
pub fn page_dir(kind: ReflectionKind) -> &'static str {
    match kind {
        ReflectionKind::Class => "classes",
        ReflectionKind::Enum => "enums",
        ReflectionKind::TypeAlias => "types",
        _ => "modules",
    }
}
