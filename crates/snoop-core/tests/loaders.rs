//! End-to-end scanning of bundle fixtures: detect loaders, recover ids, resolve file names.

use std::path::PathBuf;

use snoop_core::{
    BoaEvaluator, ChunkId, Loader, SandboxLimits, SourceKind, parse_module, read_source, scan,
    scan_source,
};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    read_source(&path).expect("fixture should be readable")
}

fn loaders(name: &str) -> Vec<Loader> {
    scan_source(&fixture(name)).expect("fixture should parse")
}

fn ids(loader: &Loader) -> Vec<String> {
    loader.ids().iter().map(ToString::to_string).collect()
}

fn entries(loader: &Loader) -> Vec<String> {
    loader
        .entries(&BoaEvaluator::default())
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_resolves_webpack5_runtime() {
    let loaders = loaders("webpack5_runtime.js");
    assert_eq!(loaders.len(), 1, "only the .js file name helper qualifies");

    let loader = &loaders[0];
    assert_eq!(ids(loader), ["179", "216", "404"]);
    assert_eq!(
        entries(loader),
        [
            "179: static/js/179.5e6f1a2b.chunk.js",
            "216: static/js/216.0a1b2c3d.chunk.js",
            "404: static/js/404.9f8e7d6c.chunk.js",
        ]
    );
}

#[test]
fn test_resolves_webpack4_jsonp_with_public_path() {
    let loaders = loaders("webpack4_jsonp.js");
    assert_eq!(loaders.len(), 1);

    let loader = &loaders[0];
    assert!(loader.source_text().starts_with("function u(e)"));
    assert_eq!(ids(loader), ["0", "2", "3"]);
    assert_eq!(
        entries(loader),
        [
            "0: /app/static/js/vendors~main.3f9a.chunk.js",
            "2: /app/static/js/2.c1d2.chunk.js",
            "3: /app/static/js/3.e4f5.chunk.js",
        ]
    );
}

#[test]
fn test_resolves_switch_loader_with_quoted_ids() {
    let loaders = loaders("switch_loader.js");
    assert_eq!(loaders.len(), 1);
    assert_eq!(
        entries(&loaders[0]),
        [
            "\"home\": home.8c1f.js",
            "\"settings\": settings.02ab.js",
            "7: legacy.js",
        ]
    );
}

#[test]
fn test_resolves_equality_chain() {
    let loaders = loaders("ternary_loader.js");
    assert_eq!(loaders.len(), 1);
    assert_eq!(entries(&loaders[0]), ["1: admin.js", "2: reports.js"]);
}

#[test]
fn test_uses_assignments_made_after_the_loader() {
    let loaders = loaders("late_public_path.js");
    assert_eq!(loaders.len(), 1);
    assert_eq!(
        entries(&loaders[0]),
        [
            "0: https://cdn.example.com/assets/chunks/intro.bundle.js",
            "1: https://cdn.example.com/assets/chunks/core.bundle.js",
            "2: https://cdn.example.com/assets/chunks/extras.bundle.js",
        ]
    );
}

#[test]
fn test_rejects_functions_that_do_not_look_like_loaders() {
    assert!(loaders("not_loaders.js").is_empty());
}

#[test]
fn test_finds_multiple_loaders_in_visitation_order() {
    let loaders = scan_source(
        r#"
        var js = e => ["a.js", "b.js"][e];
        var css = e => ({ 1: "one.css" })[e] + ".css";
        var worker = function (e) { return e == "w" ? "worker.js" : void 0; };
        "#,
    )
    .unwrap();
    assert_eq!(loaders.len(), 2);
    assert_eq!(entries(&loaders[0]), ["0: a.js", "1: b.js"]);
    assert_eq!(entries(&loaders[1]), ["\"w\": worker.js"]);
}

#[test]
fn test_resolves_explicit_id_subsets() {
    let loaders = scan_source(r#"x = e => ({ 1: "a.js", 2: "b.js" })[e];"#).unwrap();
    let evaluator = BoaEvaluator::default();

    let only_two = [ChunkId::bare("2")];
    let entries = loaders[0].resolve(&evaluator, &only_two);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file, "b.js");

    let unknown = [ChunkId::quoted("zzz")];
    assert!(loaders[0].resolve(&evaluator, &unknown).is_empty());
}

#[test]
fn test_keeps_entries_before_a_failing_id() {
    let loaders = scan_source(
        r#"x = e => e === 9 ? ns + ".js" : ["a.js", "b.js"][e] || ["x"][e];"#,
    )
    .unwrap();
    // The equality on 9 is visited first, so evaluation fails on the very first id.
    assert_eq!(ids(&loaders[0]), ["9", "0", "1"]);
    assert!(entries(&loaders[0]).is_empty());

    let loaders = scan_source(
        r#"x = e => ["a.js", "b.js"][e] || (e === 9 ? ns + ".js" : void 0);"#,
    )
    .unwrap();
    assert_eq!(ids(&loaders[0]), ["0", "1", "9"]);
    assert_eq!(entries(&loaders[0]), ["0: a.js", "1: b.js"]);
}

#[test]
fn test_runaway_assignment_hits_loop_limit() {
    let loaders = scan_source(
        r#"
        r.p = (function () { for (;;) {} })();
        r.u = e => r.p + ["a.js"][e];
        "#,
    )
    .unwrap();
    let evaluator = BoaEvaluator::new(SandboxLimits {
        fuel: 10_000,
        max_call_depth: 32,
    });
    assert!(loaders[0].entries(&evaluator).is_empty());
}

#[test]
fn test_repeated_queries_are_stable() {
    let loaders = loaders("webpack4_jsonp.js");
    let loader = &loaders[0];
    assert_eq!(loader.ids(), loader.ids());
    assert_eq!(entries(loader), entries(loader));
}

#[test]
fn test_pretty_prints_loader() {
    let loaders = loaders("webpack5_runtime.js");
    let pretty = loaders[0].pretty();
    assert!(pretty.contains("\"static/js/\""));
    assert!(pretty.contains("=>"));
}

#[test]
fn test_scan_accepts_prebuilt_modules() {
    let module = parse_module(&fixture("switch_loader.js"), SourceKind::Script).unwrap();
    let loaders = scan(&module);
    assert_eq!(loaders.len(), 1);
    assert!(loaders[0].source_text().starts_with("function (id)"));
    assert_eq!(ids(&loaders[0]), ["\"home\"", "\"settings\"", "7"]);
}
