//! Injection hook: finds the index marker in a resolved reflection tree and
//! splices the rendered index into the surrounding documentation text.
//!
//! The hook is a plain two-phase API. Build (or load) the tree, then call
//! [`IndexInjector::inject`] / [`IndexInjector::transform`] before the pages
//! are emitted. The index is always collected over the whole tree, wherever
//! the marker sits.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collect::collect;
use crate::error::IndexError;
use crate::reflection::{ReflectionId, ReflectionTree};
use crate::render::IndexRenderer;

pub const DEFAULT_MARKER_TAG: &str = "fullindex";
pub const DEFAULT_PLACEHOLDER: &str = "{fullindex}";

/// What to do when the tree holds more than one injection site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerPolicy {
    /// Process the first site in pre-order; later sites stay untouched.
    ///
    /// Skipped markers keep their tags, so running the injector again over
    /// the same tree injects at the next remaining site. Inject once per
    /// build, or use [`MarkerPolicy::Reject`] when repeated runs are possible.
    #[default]
    FirstOnly,
    /// Splice the same index into every site.
    Broadcast,
    /// More than one site is an error.
    Reject,
}

/// A place the index can be spliced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionSite {
    /// The project readme contains the placeholder token.
    Readme,
    /// The comment of this reflection carries the marker tag.
    Comment(ReflectionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionReport {
    pub entries: usize,
    pub injected: Vec<InjectionSite>,
    pub skipped: Vec<InjectionSite>,
}

#[derive(Debug, Clone)]
pub struct IndexInjector {
    pub marker_tag: String,
    pub placeholder: String,
    pub policy: MarkerPolicy,
    pub renderer: IndexRenderer,
}

impl Default for IndexInjector {
    fn default() -> Self {
        Self {
            marker_tag: DEFAULT_MARKER_TAG.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            policy: MarkerPolicy::default(),
            renderer: IndexRenderer::default(),
        }
    }
}

impl IndexInjector {
    pub fn new(marker_tag: impl Into<String>) -> Self {
        let marker_tag = marker_tag.into();
        Self {
            placeholder: format!("{{{marker_tag}}}"),
            marker_tag,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: MarkerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_renderer(mut self, renderer: IndexRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Consume a resolved tree and return it with the index spliced in.
    pub fn transform(&self, mut tree: ReflectionTree) -> Result<ReflectionTree, IndexError> {
        self.inject(&mut tree)?;
        Ok(tree)
    }

    /// Collect and render the index, then splice it into the injection
    /// sites selected by the marker policy.
    ///
    /// The index is built even when there is no site, so classification
    /// errors always surface.
    pub fn inject(&self, tree: &mut ReflectionTree) -> Result<InjectionReport, IndexError> {
        let sites = self.find_sites(tree);
        if sites.len() > 1 && self.policy == MarkerPolicy::Reject {
            return Err(IndexError::MultipleMarkers { count: sites.len() });
        }

        let entries = collect(tree)?;
        let fragment = self.renderer.render(&entries)?;

        let (injected, skipped) = match self.policy {
            MarkerPolicy::FirstOnly if !sites.is_empty() => {
                let mut sites = sites;
                let rest = sites.split_off(1);
                (sites, rest)
            }
            _ => (sites, Vec::new()),
        };

        for site in &injected {
            self.splice(tree, *site, &fragment);
        }
        if !skipped.is_empty() {
            warn!(
                skipped = skipped.len(),
                marker = %self.marker_tag,
                "Ignoring index markers after the first one"
            );
        }
        if injected.is_empty() {
            info!(marker = %self.marker_tag, "No index marker found, index not inserted");
        } else {
            info!(
                sites = injected.len(),
                entries = entries.len(),
                "Injected full index"
            );
        }

        Ok(InjectionReport {
            entries: entries.len(),
            injected,
            skipped,
        })
    }

    /// Injection sites in processing order: readme first, then comments in
    /// pre-order.
    pub fn find_sites(&self, tree: &ReflectionTree) -> Vec<InjectionSite> {
        let mut sites = Vec::new();
        if tree
            .readme
            .as_deref()
            .is_some_and(|readme| readme.contains(&self.placeholder))
        {
            sites.push(InjectionSite::Readme);
        }
        for id in tree.walk() {
            let marked = tree
                .node(id)
                .comment
                .as_ref()
                .is_some_and(|c| c.find_tag(&self.marker_tag).is_some());
            if marked {
                sites.push(InjectionSite::Comment(id));
            }
        }
        sites
    }

    fn splice(&self, tree: &mut ReflectionTree, site: InjectionSite, fragment: &str) {
        match site {
            InjectionSite::Readme => {
                if let Some(readme) = tree.readme.as_mut() {
                    let block = format!("\n\n{fragment}\n\n");
                    *readme = readme.replacen(&self.placeholder, &block, 1);
                }
            }
            InjectionSite::Comment(id) => {
                let Some(comment) = tree.node_mut(id).comment.as_mut() else {
                    return;
                };
                let trailing = comment
                    .find_tag(&self.marker_tag)
                    .map(|tag| tag.text.clone())
                    .unwrap_or_default();
                comment.text.push_str("\n\n");
                comment.text.push_str(fragment);
                comment.text.push_str("\n\n");
                comment.text.push_str(&trailing);
                comment.tags.clear();
            }
        }
    }
}
