use doccer_core::render::{entry_url, sanitize_parent, word_break};
use doccer_core::{IndexEntry, IndexError, IndexRenderer, PageLayout, ReflectionKind};

#[test]
fn test_word_break_at_every_camel_case_boundary() {
    assert_eq!(
        word_break("GetAllProcessesApiResponse"),
        "Get<wbr/>All<wbr/>Processes<wbr/>Api<wbr/>Response"
    );
}

#[test]
fn test_word_break_leaves_names_without_boundaries_alone() {
    assert_eq!(word_break("ID"), "ID");
    assert_eq!(word_break("build"), "build");
    assert_eq!(word_break("MAX_SIZE"), "MAX_SIZE");
    assert_eq!(word_break("getHTTPResponse"), "get<wbr/>HTTPResponse");
}

#[test]
fn test_sanitize_parent_replaces_non_word_characters() {
    assert_eq!(sanitize_parent("my/module"), "my_module");
    assert_eq!(sanitize_parent("@scope/pkg-name"), "_scope_pkg_name");
    assert_eq!(sanitize_parent("plain_name42"), "plain_name42");
}

#[test]
fn test_url_topology_flat_layout() {
    let class = IndexEntry::new("Foo", ReflectionKind::Class, "my/module");
    let function = IndexEntry::new("bar", ReflectionKind::Function, "my/module");
    let alias = IndexEntry::new("Options", ReflectionKind::TypeAlias, "my/module");
    let enumeration = IndexEntry::new("Color", ReflectionKind::Enum, "my/module");

    assert_eq!(entry_url(&class, PageLayout::Flat), "my_module.Foo.html");
    assert_eq!(entry_url(&function, PageLayout::Flat), "my_module.html#bar");
    assert_eq!(entry_url(&alias, PageLayout::Flat), "my_module.Options.html");
    assert_eq!(entry_url(&enumeration, PageLayout::Flat), "my_module.Color.html");
}

#[test]
fn test_url_topology_directory_layout() {
    let class = IndexEntry::new("Foo", ReflectionKind::Class, "my/module");
    let function = IndexEntry::new("bar", ReflectionKind::Function, "my/module");
    let alias = IndexEntry::new("Options", ReflectionKind::TypeAlias, "my/module");

    assert_eq!(
        entry_url(&class, PageLayout::Directories),
        "classes/my_module.Foo.html"
    );
    assert_eq!(
        entry_url(&function, PageLayout::Directories),
        "modules/my_module.html#bar"
    );
    assert_eq!(
        entry_url(&alias, PageLayout::Directories),
        "types/my_module.Options.html"
    );
}

#[test]
fn test_render_emits_one_item_per_entry_in_order() {
    let entries = vec![
        IndexEntry::new("bar", ReflectionKind::Function, "my/module"),
        IndexEntry::new("Foo", ReflectionKind::Class, "my/module"),
        IndexEntry::new("GetAllProcessesApiResponse", ReflectionKind::Interface, "api"),
    ];

    let html = IndexRenderer::default()
        .render(&entries)
        .expect("Render should succeed");

    assert!(html.starts_with(r#"<section class="tsd-panel tsd-index-panel">"#));
    assert!(html.ends_with("</section>"));
    assert!(html.contains("<h3>Index</h3>"));
    assert!(html.contains(r#"<ul class="tsd-index-list">"#));
    assert_eq!(html.matches("<li ").count(), 3);

    assert!(html.contains(
        r#"<li class="tsd-kind-function tsd-parent-kind-module"><a href="my_module.html#bar" class="tsd-kind-icon">bar</a></li>"#
    ));
    assert!(html.contains(
        r#"<li class="tsd-kind-class tsd-parent-kind-module"><a href="my_module.Foo.html" class="tsd-kind-icon">Foo</a></li>"#
    ));
    assert!(html.contains(
        r#"href="api.html#GetAllProcessesApiResponse" class="tsd-kind-icon">Get<wbr/>All<wbr/>Processes<wbr/>Api<wbr/>Response</a>"#
    ));

    let bar = html.find(">bar<").expect("bar rendered");
    let foo = html.find(">Foo<").expect("Foo rendered");
    assert!(bar < foo, "Items must keep the given order");
}

#[test]
fn test_render_empty_index_has_container_only() {
    let html = IndexRenderer::default()
        .render(&[])
        .expect("Render should succeed");
    assert!(html.contains(r#"<ul class="tsd-index-list">"#));
    assert_eq!(html.matches("<li").count(), 0);
}

#[test]
fn test_render_uses_custom_title_and_escapes_it() {
    let html = IndexRenderer::new(PageLayout::Flat)
        .with_title("A & B")
        .render(&[])
        .expect("Render should succeed");
    assert!(html.contains("<h3>A &amp; B</h3>"), "got: {html}");
}

#[test]
fn test_render_fails_for_kind_without_class() {
    let entries = vec![IndexEntry::new("render", ReflectionKind::Method, "Widget")];
    let err = IndexRenderer::default().render(&entries).unwrap_err();
    match err {
        IndexError::MissingRenderClass { name, kind } => {
            assert_eq!(name, "render");
            assert_eq!(kind, ReflectionKind::Method);
        }
        other => panic!("Expected MissingRenderClass, got {other:?}"),
    }
}
