//! End-to-end resolution of exports maps.

use pkgexports_core::{resolve, Error, ExportsResolver, Package, ResolveOptions};
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;

fn package(exports: Value) -> Package {
    Package::from_value(json!({ "name": "fixture", "exports": exports })).unwrap()
}

fn import_prod() -> ResolveOptions {
    ResolveOptions::new().with_production(true)
}

#[test]
fn test_no_exports_never_matches() {
    let pkg = Package::from_value(json!({ "name": "legacy", "main": "./index.js" })).unwrap();
    let resolver = ExportsResolver::new();
    for entry in [".", "./index", "./index.js", "./"] {
        assert!(
            resolver.resolve(&pkg, entry, &import_prod()).unwrap().is_empty(),
            "{entry} should not resolve"
        );
    }
}

#[test]
fn test_exact_match_takes_precedence_over_wildcard() {
    let pkg = package(json!({
        "./*": "./dist/*.js",
        "./special": { "node": "./special-node.js" }
    }));
    // The exact key matches but no condition applies; the wildcard must not be used.
    assert!(ExportsResolver::new()
        .resolve(&pkg, "./special", &import_prod())
        .unwrap()
        .is_empty());
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, "./other", &import_prod())
            .unwrap(),
        vec!["./dist/other.js"]
    );
}

#[test]
fn test_exact_match_wins_even_when_declared_after_wildcard() {
    let pkg = package(json!({
        "./*": "./dist/*.js",
        "./special": "./special/index.js"
    }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, "./special", &import_prod())
            .unwrap(),
        vec!["./special/index.js"]
    );
}

#[test]
fn test_two_slot_substitution() {
    let pkg = package(json!({ "./*.*": "./*/index.*" }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, "./foo.coffee", &import_prod())
            .unwrap(),
        vec!["./foo/index.coffee"]
    );
}

#[test]
fn test_longest_static_prefix_wins() {
    let pkg = package(json!({
        "./foo/": "./1/",
        "./foo/bar/": "./2/",
        "./": "./3/"
    }));
    let resolver = ExportsResolver::new();
    assert_eq!(
        resolver
            .resolve(&pkg, "./foo/bar/main.js", &import_prod())
            .unwrap(),
        vec!["./2/main.js"]
    );
    assert_eq!(
        resolver.resolve(&pkg, "./foo/main.js", &import_prod()).unwrap(),
        vec!["./1/main.js"]
    );
    assert_eq!(
        resolver.resolve(&pkg, "./main.js", &import_prod()).unwrap(),
        vec!["./3/main.js"]
    );
}

#[test]
fn test_trailing_slash_equals_star() {
    let slash = package(json!({ "./lib/": "./dist/lib/" }));
    let star = package(json!({ "./lib/*": "./dist/lib/*" }));
    let resolver = ExportsResolver::new();
    assert_eq!(
        resolver.resolve(&slash, "./lib/a/b.js", &import_prod()).unwrap(),
        resolver.resolve(&star, "./lib/a/b.js", &import_prod()).unwrap()
    );
}

#[test]
fn test_trailing_slash_key_keeps_file_remainder() {
    let pkg = package(json!({ "./*/": "./dist/" }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, "./foo/bar.js", &import_prod())
            .unwrap(),
        vec!["./dist/bar.js"]
    );
}

#[test]
fn test_trailing_slash_key_fills_every_slot() {
    let pkg = package(json!({ "./*/": "./dist/*/lib/" }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, "./foo/bar/baz.js", &import_prod())
            .unwrap(),
        vec!["./dist/foo/lib/bar/baz.js"]
    );
}

#[test]
fn test_equal_specificity_keeps_first_declared() {
    let pkg = package(json!({ "./*b*": "./one/*", "./*/*": "./two/*" }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, "./b/c", &import_prod())
            .unwrap(),
        vec!["./one/"]
    );

    let swapped = package(json!({ "./*/*": "./two/*", "./*b*": "./one/*" }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&swapped, "./b/c", &import_prod())
            .unwrap(),
        vec!["./two/b"]
    );
}

#[test]
fn test_nested_condition_miss_falls_through_to_default() {
    let pkg = package(json!({
        ".": {
            "import": { "development": "./foo.js" },
            "default": "./foo.cjs"
        }
    }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, ".", &import_prod())
            .unwrap(),
        vec!["./foo.cjs"]
    );
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, ".", &ResolveOptions::new())
            .unwrap(),
        vec!["./foo.js"]
    );
}

#[test]
fn test_null_excludes_without_fallthrough() {
    let pkg = package(json!({
        ".": { "import": null, "default": "./bar.cjs" }
    }));
    let resolver = ExportsResolver::new();
    assert!(resolver.resolve(&pkg, ".", &import_prod()).unwrap().is_empty());
    assert_eq!(
        resolver
            .resolve(&pkg, ".", &import_prod().with_require(true))
            .unwrap(),
        vec!["./bar.cjs"]
    );
}

#[test]
fn test_fallback_array_keeps_order() {
    let pkg = package(json!({ "./*": ["./*.js", "./*.cjs"] }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, "./foo", &import_prod())
            .unwrap(),
        vec!["./foo.js", "./foo.cjs"]
    );
}

#[test]
fn test_wildcard_without_condition_lets_other_patterns_match() {
    let pkg = package(json!({
        "./features/*": { "node": "./node/features/*.js" },
        "./*": "./dist/*.js"
    }));
    assert_eq!(
        ExportsResolver::new()
            .resolve(&pkg, "./features/auth", &import_prod())
            .unwrap(),
        vec!["./dist/features/auth.js"]
    );
}

#[test]
fn test_more_specific_null_pattern_excludes() {
    let pkg = package(json!({
        "./*": "./dist/*.js",
        "./internal/*": null
    }));
    let resolver = ExportsResolver::new();
    assert!(resolver
        .resolve(&pkg, "./internal/secret", &import_prod())
        .unwrap()
        .is_empty());
    assert_eq!(
        resolver.resolve(&pkg, "./public", &import_prod()).unwrap(),
        vec!["./dist/public.js"]
    );
}

#[test]
fn test_less_specific_null_pattern_does_not_exclude() {
    let pkg = package(json!({
        "./*": null,
        "./public/*": "./dist/public/*.js"
    }));
    let resolver = ExportsResolver::new();
    assert_eq!(
        resolver
            .resolve(&pkg, "./public/button", &import_prod())
            .unwrap(),
        vec!["./dist/public/button.js"]
    );
    assert!(resolver.resolve(&pkg, "./other", &import_prod()).unwrap().is_empty());
}

#[test]
fn test_custom_conditions_follow_declaration_order() {
    let pkg = package(json!({
        ".": {
            "browser": "./browser.js",
            "node": "./node.js",
            "default": "./index.js"
        }
    }));
    let opts = import_prod().with_conditions(["node", "browser"]);
    assert_eq!(
        ExportsResolver::new().resolve(&pkg, ".", &opts).unwrap(),
        vec!["./browser.js"]
    );
}

#[test]
fn test_invalid_path_pattern_is_always_an_error() {
    let pkg = package(json!({ ".": "./index.js", "import": "./esm.js" }));
    let err = ExportsResolver::new()
        .resolve(&pkg, ".", &import_prod())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPathPattern { pattern } if pattern == "import"));
}

#[test]
fn test_mixed_root_conditions_is_invalid_condition() {
    let pkg = package(json!({ "node": "./node.js", "./feature": "./feature.js" }));
    let err = ExportsResolver::new()
        .resolve(&pkg, ".", &import_prod())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCondition { condition } if condition == "./feature"));
}

#[test]
fn test_repeated_resolution_reuses_compiled_patterns() {
    let pkg = package(json!({ ".": "./index.js", "./*": "./dist/*.js" }));
    let resolver = ExportsResolver::new();

    let first = resolver.resolve(&pkg, "./utils", &import_prod()).unwrap();
    let second = resolver.resolve(&pkg, "./utils", &import_prod()).unwrap();
    assert_eq!(first, second);

    let stats = resolver.cache().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_forget_recompiles_on_next_use() {
    let pkg = package(json!({ "./*": "./dist/*.js" }));
    let resolver = ExportsResolver::new();
    resolver.resolve(&pkg, "./a", &import_prod()).unwrap();
    assert!(resolver.cache().forget(&pkg));
    resolver.resolve(&pkg, "./a", &import_prod()).unwrap();
    assert_eq!(resolver.cache().stats().misses, 2);
}

#[test]
fn test_concurrent_resolution_is_consistent() {
    let pkg = Arc::new(package(json!({
        ".": "./index.js",
        "./*": { "import": "./esm/*.mjs", "require": "./cjs/*.cjs" },
        "./internal/*": null
    })));
    let resolver = Arc::new(ExportsResolver::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pkg = Arc::clone(&pkg);
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                let opts = ResolveOptions::new().with_require(i % 2 == 0);
                let expected = if i % 2 == 0 {
                    vec!["./cjs/utils.cjs".to_string()]
                } else {
                    vec!["./esm/utils.mjs".to_string()]
                };
                for _ in 0..100 {
                    assert_eq!(resolver.resolve(&pkg, "./utils", &opts).unwrap(), expected);
                    assert!(resolver
                        .resolve(&pkg, "./internal/x", &opts)
                        .unwrap()
                        .is_empty());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = resolver.cache().stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits + stats.misses, 8 * 200);
}

#[test]
fn test_uncached_resolve_function() {
    let pkg = package(json!({ "./*": "./dist/*.js" }));
    assert_eq!(
        resolve(&pkg, "./x", &import_prod()).unwrap(),
        vec!["./dist/x.js"]
    );
}

#[test]
fn test_options_from_json() {
    let pkg = package(json!({
        ".": { "production": { "require": "./prod.cjs" }, "default": "./dev.js" }
    }));
    let opts: ResolveOptions =
        serde_json::from_value(json!({ "isProduction": true, "isRequire": true })).unwrap();
    assert_eq!(
        ExportsResolver::new().resolve(&pkg, ".", &opts).unwrap(),
        vec!["./prod.cjs"]
    );
}
