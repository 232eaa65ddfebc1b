use doccer_core::aggregate::{aggregate, AggregateError};
use doccer_core::config::{DoccerConfig, Repository};
use doccer_core::contract::{
    FetchedManifest, FetchedRepository, MockCompiler, MockFetcher, ReflectProject, RenderProject,
};
use doccer_core::download::FetchError;
use doccer_core::{IndexError, InjectionSite};
use mockall::Sequence;
use serde_json::{json, Value};
use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const COMPILED: &str = r##"{
  "name": "Unified API",
  "kind": 1,
  "readme": "# Welcome\n\n{fullindex}",
  "children": [
    {
      "name": "core/src/index",
      "kind": 2,
      "children": [
        { "name": "Widget", "kind": 128 },
        { "name": "build", "kind": 64 }
      ]
    }
  ]
}"##;

fn config_for(base: &Path) -> DoccerConfig {
    let mut config = DoccerConfig::from_value(json!({
        "name": "Unified API",
        "repositories": [{ "name": "core", "url": "https://example.com/core.git" }],
    }))
    .unwrap();
    config.resolve_paths(base);
    config
}

fn fetcher_returning(checkout: PathBuf, repository: Repository) -> MockFetcher {
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch_all().times(1).returning(move |repos| {
        assert_eq!(repos.len(), 1);
        Ok(FetchedManifest {
            repositories: vec![FetchedRepository {
                name: repos[0].name.clone(),
                local_path: checkout.clone(),
                repository: repository.clone(),
            }],
        })
    });
    fetcher
}

/// Compiler whose reflect phase writes `dump` and whose render phase records
/// the dump it was handed.
fn compiler_writing(dump: &'static str, rendered: Arc<Mutex<Option<String>>>) -> MockCompiler {
    let mut compiler = MockCompiler::new();
    let mut seq = Sequence::new();
    compiler
        .expect_reflect()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |project: &ReflectProject| {
            write(&project.json_out, dump).unwrap();
            Ok(project.json_out.clone())
        });
    compiler
        .expect_render()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |project: &RenderProject| {
            *rendered.lock().unwrap() = Some(read_to_string(&project.json_in).unwrap());
            create_dir_all(&project.out_dir).unwrap();
            Ok(project.out_dir.clone())
        });
    compiler
}

#[tokio::test]
async fn test_aggregate_renders_site_from_indexed_dump() {
    let tmp = tempdir().unwrap();
    let config = config_for(tmp.path());
    let checkout = tmp.path().join("checkouts").join("core");
    create_dir_all(checkout.join("src")).unwrap();
    write(checkout.join("src/index.ts"), "export class Widget {}\n").unwrap();

    let rendered = Arc::new(Mutex::new(None));
    let fetcher = fetcher_returning(checkout.clone(), config.repositories[0].clone());
    let compiler = compiler_writing(COMPILED, rendered.clone());

    let report = aggregate(&config, &fetcher, &compiler)
        .await
        .expect("Aggregate should succeed");

    assert_eq!(report.repositories.len(), 1);
    assert_eq!(report.repositories[0].name, "core");
    assert_eq!(report.repositories[0].entry_points, 1);
    assert_eq!(report.index.entries, 2);
    assert_eq!(report.index.injected, vec![InjectionSite::Readme]);
    assert_eq!(report.out_dir, tmp.path().join("docs"));

    let project: Value = serde_json::from_str(&read_to_string(&report.project_file).unwrap()).unwrap();
    assert_eq!(
        project["entryPoints"],
        json!([checkout.join("src/index.ts").to_string_lossy()])
    );
    assert!(project.get("out").is_none());

    let rendered = rendered.lock().unwrap().clone().expect("Render phase ran");
    let dump: Value = serde_json::from_str(&rendered).unwrap();
    let readme = dump["readme"].as_str().expect("readme kept");
    assert!(readme.starts_with("# Welcome\n\n\n\n<section"), "got: {readme}");
    assert!(readme.contains(r#"href="core_src_index.Widget.html""#));
    assert!(readme.contains(r#"href="core_src_index.html#build""#));
    assert!(!readme.contains("{fullindex}"));

    let render_project: Value =
        serde_json::from_str(&read_to_string(&report.render_project_file).unwrap()).unwrap();
    assert_eq!(
        render_project["entryPoints"],
        json!([report.reflection_json.to_string_lossy()])
    );
    let landing = render_project["readme"].as_str().expect("indexed readme passed on");
    assert_eq!(read_to_string(landing).unwrap(), readme);
}

#[tokio::test]
async fn test_aggregate_stops_when_fetch_fails() {
    let tmp = tempdir().unwrap();
    let config = config_for(tmp.path());

    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch_all().returning(|_| {
        Err(FetchError::Join {
            repo: "core".to_string(),
        })
    });
    let mut compiler = MockCompiler::new();
    compiler.expect_reflect().never();
    compiler.expect_render().never();

    let err = aggregate(&config, &fetcher, &compiler).await.unwrap_err();
    assert!(matches!(err, AggregateError::Fetch(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_aggregate_stops_when_checkout_has_no_entry_points() {
    let tmp = tempdir().unwrap();
    let config = config_for(tmp.path());
    let checkout = tmp.path().join("empty-checkout");
    create_dir_all(&checkout).unwrap();

    let fetcher = fetcher_returning(checkout, config.repositories[0].clone());
    let mut compiler = MockCompiler::new();
    compiler.expect_reflect().never();
    compiler.expect_render().never();

    let err = aggregate(&config, &fetcher, &compiler).await.unwrap_err();
    assert!(matches!(err, AggregateError::EntryPoints(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_aggregate_fails_build_on_unknown_kind() {
    let tmp = tempdir().unwrap();
    let config = config_for(tmp.path());
    let checkout = tmp.path().join("core");
    create_dir_all(checkout.join("src")).unwrap();
    write(checkout.join("src/index.ts"), "export {}\n").unwrap();

    let fetcher = fetcher_returning(checkout, config.repositories[0].clone());
    let mut compiler = MockCompiler::new();
    compiler
        .expect_reflect()
        .times(1)
        .returning(|project: &ReflectProject| {
            write(
                &project.json_out,
                r#"{ "name": "p", "kind": 1, "readme": "{fullindex}", "children": [{ "name": "Odd", "kind": 33554432 }] }"#,
            )
            .unwrap();
            Ok(project.json_out.clone())
        });
    compiler.expect_render().never();

    let err = aggregate(&config, &fetcher, &compiler).await.unwrap_err();
    assert!(
        matches!(err, AggregateError::Index(IndexError::UnknownKind { code: 0x2000000, .. })),
        "got: {err:?}"
    );
}
