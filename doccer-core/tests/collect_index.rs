use doccer_core::collect::{disposition, Disposition};
use doccer_core::kind::{render_class, ALL_KINDS};
use doccer_core::{collect, IndexEntry, IndexError, ReflectionKind, ReflectionTree};

fn mixed_tree() -> ReflectionTree {
    let mut tree = ReflectionTree::new("project");
    let root = tree.root();
    let core = tree.add_kind(root, ReflectionKind::Module, "core");
    let widget = tree.add_kind(core, ReflectionKind::Class, "Widget");
    tree.add_kind(widget, ReflectionKind::Constructor, "constructor");
    tree.add_kind(widget, ReflectionKind::Method, "render");
    tree.add_kind(widget, ReflectionKind::Property, "size");
    tree.add_kind(core, ReflectionKind::Function, "build");
    let util = tree.add_kind(core, ReflectionKind::Namespace, "util");
    tree.add_kind(util, ReflectionKind::Variable, "VERSION");
    let color = tree.add_kind(core, ReflectionKind::Enum, "Color");
    tree.add_kind(color, ReflectionKind::EnumMember, "Red");
    tree
}

#[test]
fn test_collect_indexes_only_navigable_kinds_in_sorted_order() {
    let entries = collect(&mixed_tree()).expect("Collect should succeed");

    assert_eq!(
        entries,
        vec![
            IndexEntry::new("build", ReflectionKind::Function, "core"),
            IndexEntry::new("Color", ReflectionKind::Enum, "core"),
            IndexEntry::new("util", ReflectionKind::Namespace, "core"),
            IndexEntry::new("VERSION", ReflectionKind::Variable, "util"),
            IndexEntry::new("Widget", ReflectionKind::Class, "core"),
        ]
    );
}

#[test]
fn test_collect_recurses_through_skipped_parents() {
    // Project (skip) -> Module (skip) -> Module (skip) -> Interface (index)
    let mut tree = ReflectionTree::new("project");
    let root = tree.root();
    let outer = tree.add_kind(root, ReflectionKind::Module, "outer");
    let inner = tree.add_kind(outer, ReflectionKind::Module, "outer/inner");
    tree.add_kind(inner, ReflectionKind::Interface, "Options");

    let entries = collect(&tree).expect("Collect should succeed");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Options");
    assert_eq!(entries[0].parent_name, "outer/inner");
}

#[test]
fn test_collect_sort_is_case_insensitive_and_stable() {
    let mut tree = ReflectionTree::new("project");
    let root = tree.root();
    for (module, function) in [("a", "alpha"), ("b", "Beta"), ("c", "alpha")] {
        let m = tree.add_kind(root, ReflectionKind::Module, module);
        tree.add_kind(m, ReflectionKind::Function, function);
    }

    let entries = collect(&tree).expect("Collect should succeed");
    let order: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.parent_name.as_str()))
        .collect();
    assert_eq!(order, vec![("alpha", "a"), ("alpha", "c"), ("Beta", "b")]);
}

#[test]
fn test_collect_fails_on_unknown_kind_code() {
    let mut tree = ReflectionTree::new("project");
    let root = tree.root();
    let module = tree.add_kind(root, ReflectionKind::Module, "core");
    tree.add_child(module, 0x2000000, "Mystery");

    let err = collect(&tree).unwrap_err();
    match &err {
        IndexError::UnknownKind { name, code } => {
            assert_eq!(name, "Mystery");
            assert_eq!(*code, 0x2000000);
        }
        other => panic!("Expected UnknownKind, got {other:?}"),
    }
    assert!(err.to_string().contains("0x2000000"), "got: {err}");
}

#[test]
fn test_collect_fails_on_kind_without_disposition() {
    let mut tree = ReflectionTree::new("project");
    let root = tree.root();
    let module = tree.add_kind(root, ReflectionKind::Module, "core");
    let build = tree.add_kind(module, ReflectionKind::Function, "build");
    tree.add_kind(build, ReflectionKind::CallSignature, "__call");

    let err = collect(&tree).unwrap_err();
    match &err {
        IndexError::UnhandledKind { name, kind } => {
            assert_eq!(name, "__call");
            assert_eq!(*kind, ReflectionKind::CallSignature);
        }
        other => panic!("Expected UnhandledKind, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("__call") && msg.contains("CallSignature"), "got: {msg}");
}

#[test]
fn test_collect_fails_on_index_worthy_root() {
    let tree = ReflectionTree::with_root(ReflectionKind::Class.code(), "Lonely");
    let err = collect(&tree).unwrap_err();
    assert!(
        matches!(err, IndexError::Orphan { ref name, kind: ReflectionKind::Class } if name == "Lonely"),
        "got: {err:?}"
    );
}

#[test]
fn test_collect_on_bare_project_is_empty() {
    let tree = ReflectionTree::new("empty");
    assert!(collect(&tree).expect("Collect should succeed").is_empty());
}

#[test]
fn test_every_indexed_kind_has_a_render_class() {
    for kind in ALL_KINDS {
        if disposition(kind) == Disposition::Index {
            assert!(
                render_class(kind).is_some(),
                "{kind} is indexed but has no render class"
            );
        }
    }
}

#[test]
fn test_skip_and_unhandled_dispositions() {
    for kind in [
        ReflectionKind::Project,
        ReflectionKind::Module,
        ReflectionKind::EnumMember,
        ReflectionKind::Constructor,
        ReflectionKind::Property,
        ReflectionKind::Method,
        ReflectionKind::Accessor,
    ] {
        assert_eq!(disposition(kind), Disposition::Skip, "{kind}");
    }
    for kind in [
        ReflectionKind::Parameter,
        ReflectionKind::TypeParameter,
        ReflectionKind::Reference,
    ] {
        assert_eq!(disposition(kind), Disposition::Unhandled, "{kind}");
    }
}
