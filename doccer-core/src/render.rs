//! Index renderer: turns sorted [`IndexEntry`] values into an embeddable
//! markup fragment styled like the compiler's own index panels.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::collect::IndexEntry;
use crate::error::IndexError;
use crate::kind::{page_dir, render_class};

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("static regex is valid"));

/// How the compiler lays out its output pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageLayout {
    /// All pages side by side: `my_module.Foo.html`, `my_module.html#bar`.
    #[default]
    Flat,
    /// Pages grouped per kind: `classes/my_module.Foo.html`,
    /// `modules/my_module.html#bar`.
    Directories,
}

pub const DEFAULT_TITLE: &str = "Index";

#[derive(Debug, Clone)]
pub struct IndexRenderer {
    pub layout: PageLayout,
    pub title: String,
}

impl Default for IndexRenderer {
    fn default() -> Self {
        Self {
            layout: PageLayout::default(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl IndexRenderer {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render one list item per entry, in the order given.
    pub fn render(&self, entries: &[IndexEntry]) -> Result<String, IndexError> {
        let mut html = String::new();
        writeln!(html, r#"<section class="tsd-panel tsd-index-panel">"#)?;
        writeln!(html, "<h3>{}</h3>", escape_html(&self.title))?;
        writeln!(html, r#"<div class="tsd-index-content">"#)?;
        writeln!(html, r#"<section class="tsd-index-section">"#)?;
        writeln!(html, r#"<ul class="tsd-index-list">"#)?;

        for entry in entries {
            let class = render_class(entry.kind).ok_or_else(|| IndexError::MissingRenderClass {
                name: entry.name.clone(),
                kind: entry.kind,
            })?;
            let url = entry_url(entry, self.layout);
            writeln!(
                html,
                r#"<li class="{class} tsd-parent-kind-module"><a href="{}" class="tsd-kind-icon">{}</a></li>"#,
                escape_html(&url),
                word_break(&escape_html(&entry.name)),
            )?;
        }

        writeln!(html, "</ul>")?;
        writeln!(html, "</section>")?;
        writeln!(html, "</div>")?;
        write!(html, "</section>")?;
        Ok(html)
    }
}

/// Insert `<wbr/>` at every lower-to-upper case transition.
pub fn word_break(name: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(name, "${1}<wbr/>${2}")
        .into_owned()
}

/// Make a parent name usable as a page file name.
pub fn sanitize_parent(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn entry_url(entry: &IndexEntry, layout: PageLayout) -> String {
    let parent = sanitize_parent(&entry.parent_name);
    let page = if entry.kind.has_own_page() {
        format!("{parent}.{}.html", entry.name)
    } else {
        format!("{parent}.html#{}", entry.name)
    };
    match layout {
        PageLayout::Flat => page,
        PageLayout::Directories => format!("{}/{page}", page_dir(entry.kind)),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
