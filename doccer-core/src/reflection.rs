//! Arena-backed reflection tree.
//!
//! Nodes are owned by the [`ReflectionTree`] and refer to each other through
//! [`ReflectionId`] indices. A node's parent is only ever used to recover a
//! display name, so no node borrows another.

use serde_json::{Map, Value};

use crate::kind::ReflectionKind;

/// Index of a node inside its [`ReflectionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReflectionId(usize);

impl ReflectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One tag of a documentation comment, e.g. `@fullindex trailing text`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentTag {
    /// Tag name without the leading `@`.
    pub tag: String,
    pub text: String,
    pub extra: Map<String, Value>,
}

impl CommentTag {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            extra: Map::new(),
        }
    }
}

/// Documentation comment attached to a reflection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comment {
    pub text: String,
    pub tags: Vec<CommentTag>,
    /// Fields of the compiler's comment object this crate does not model.
    pub extra: Map<String, Value>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.tags.push(CommentTag::new(tag, text));
        self
    }

    pub fn find_tag(&self, tag: &str) -> Option<&CommentTag> {
        self.tags.iter().find(|t| t.tag == tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionNode {
    pub kind_code: u32,
    pub name: String,
    pub parent: Option<ReflectionId>,
    pub children: Vec<ReflectionId>,
    pub comment: Option<Comment>,
    /// Fields of the compiler's reflection object this crate does not model,
    /// kept so a loaded tree can be written back unchanged.
    pub extra: Map<String, Value>,
}

impl ReflectionNode {
    fn new(kind_code: u32, name: String, parent: Option<ReflectionId>) -> Self {
        Self {
            kind_code,
            name,
            parent,
            children: Vec::new(),
            comment: None,
            extra: Map::new(),
        }
    }
}

/// A rooted reflection tree as produced by the documentation compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionTree {
    nodes: Vec<ReflectionNode>,
    /// Project-level description, which may carry the index placeholder.
    pub readme: Option<String>,
}

impl ReflectionTree {
    /// Create a tree whose root is a `Project` reflection.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self::with_root(ReflectionKind::Project.code(), project_name)
    }

    /// Create a tree with an arbitrary root kind code.
    pub fn with_root(kind_code: u32, name: impl Into<String>) -> Self {
        Self {
            nodes: vec![ReflectionNode::new(kind_code, name.into(), None)],
            readme: None,
        }
    }

    pub fn root(&self) -> ReflectionId {
        ReflectionId(0)
    }

    /// Append a child to `parent`, after its existing children.
    ///
    /// # Panics
    /// If `parent` does not belong to this tree.
    pub fn add_child(
        &mut self,
        parent: ReflectionId,
        kind_code: u32,
        name: impl Into<String>,
    ) -> ReflectionId {
        let id = ReflectionId(self.nodes.len());
        self.nodes
            .push(ReflectionNode::new(kind_code, name.into(), Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Like [`add_child`](Self::add_child) for a catalog kind.
    pub fn add_kind(
        &mut self,
        parent: ReflectionId,
        kind: ReflectionKind,
        name: impl Into<String>,
    ) -> ReflectionId {
        self.add_child(parent, kind.code(), name)
    }

    pub fn node(&self, id: ReflectionId) -> &ReflectionNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: ReflectionId) -> &mut ReflectionNode {
        &mut self.nodes[id.0]
    }

    pub fn set_comment(&mut self, id: ReflectionId, comment: Comment) {
        self.nodes[id.0].comment = Some(comment);
    }

    pub fn parent_name(&self, id: ReflectionId) -> Option<&str> {
        self.node(id).parent.map(|p| self.node(p).name.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in depth-first pre-order, children in declaration order.
    pub fn walk(&self) -> Vec<ReflectionId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }
}
