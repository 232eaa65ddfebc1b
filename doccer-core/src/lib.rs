#![doc = "doccer-core: core logic library for doccer."]

//! This crate contains the data models and pipelines for doccer: layered
//! configuration, repository fetch, entry-point selection, compiler project
//! emission, and the cross-repository symbol index that is spliced into the
//! documentation compiler's reflection tree.
//!
//! # Usage
//! The index pipeline is synchronous and needs nothing but a tree:
//! build or load a [`ReflectionTree`], then hand it to an [`IndexInjector`].
//! The orchestration around it lives in [`aggregate`].

pub mod aggregate;
pub mod collect;
pub mod compiler;
pub mod config;
pub mod contract;
pub mod download;
pub mod entry_points;
pub mod error;
pub mod inject;
pub mod kind;
pub mod project;
pub mod reflection;
pub mod reflection_json;
pub mod render;

pub use collect::{collect, Disposition, IndexEntry};
pub use error::IndexError;
pub use inject::{IndexInjector, InjectionReport, InjectionSite, MarkerPolicy};
pub use kind::{symbolic_kind, KindLookup, ReflectionKind};
pub use reflection::{Comment, CommentTag, ReflectionId, ReflectionNode, ReflectionTree};
pub use render::{IndexRenderer, PageLayout};
