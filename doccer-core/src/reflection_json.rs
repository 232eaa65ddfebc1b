//! Reading and writing the compiler's JSON project dump.
//!
//! Only the fields the index pipeline needs are modelled. Everything else
//! rides along in `extra` maps so a dump can be rewritten without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::IndexError;
use crate::reflection::{Comment, CommentTag, ReflectionId, ReflectionTree};

#[derive(Debug, Serialize, Deserialize)]
struct RawReflection {
    name: String,
    kind: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<RawComment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<RawReflection>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawComment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<RawTag>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTag {
    tag: String,
    #[serde(default)]
    text: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

const README_KEY: &str = "readme";

/// Parse a JSON project dump into a tree.
pub fn from_json(json: &str) -> Result<ReflectionTree, IndexError> {
    let mut raw: RawReflection = serde_json::from_str(json)?;
    let readme = match raw.extra.remove(README_KEY) {
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            raw.extra.insert(README_KEY.to_string(), other);
            None
        }
        None => None,
    };

    let mut tree = ReflectionTree::with_root(raw.kind, raw.name);
    tree.readme = readme;
    let root = tree.root();
    fill(&mut tree, root, raw.comment, raw.extra);
    for child in raw.children {
        insert(&mut tree, root, child);
    }
    Ok(tree)
}

/// Serialise a tree back to the nested JSON shape it was read from.
pub fn to_json(tree: &ReflectionTree) -> Result<String, IndexError> {
    let mut raw = export(tree, tree.root());
    if let Some(readme) = &tree.readme {
        raw.extra
            .insert(README_KEY.to_string(), Value::String(readme.clone()));
    }
    Ok(serde_json::to_string_pretty(&raw)?)
}

fn insert(tree: &mut ReflectionTree, parent: ReflectionId, raw: RawReflection) {
    let id = tree.add_child(parent, raw.kind, raw.name);
    fill(tree, id, raw.comment, raw.extra);
    for child in raw.children {
        insert(tree, id, child);
    }
}

fn fill(
    tree: &mut ReflectionTree,
    id: ReflectionId,
    comment: Option<RawComment>,
    extra: Map<String, Value>,
) {
    let node = tree.node_mut(id);
    node.extra = extra;
    node.comment = comment.map(|c| Comment {
        text: c.text,
        tags: c
            .tags
            .into_iter()
            .map(|t| CommentTag {
                tag: t.tag,
                text: t.text,
                extra: t.extra,
            })
            .collect(),
        extra: c.extra,
    });
}

fn export(tree: &ReflectionTree, id: ReflectionId) -> RawReflection {
    let node = tree.node(id);
    RawReflection {
        name: node.name.clone(),
        kind: node.kind_code,
        comment: node.comment.as_ref().map(|c| RawComment {
            text: c.text.clone(),
            tags: c
                .tags
                .iter()
                .map(|t| RawTag {
                    tag: t.tag.clone(),
                    text: t.text.clone(),
                    extra: t.extra.clone(),
                })
                .collect(),
            extra: c.extra.clone(),
        }),
        children: node.children.iter().map(|&c| export(tree, c)).collect(),
        extra: node.extra.clone(),
    }
}
