use miette::{IntoDiagnostic, Result};
use pkgexports_core::resolver::TraceStep;
use pkgexports_core::{ConditionSet, ExportsResolver, Package, ResolveOptions};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Resolve result for JSON output.
#[derive(Serialize)]
struct ResolveOutput {
    ok: bool,
    entries: Vec<String>,
    paths: Vec<String>,
    conditions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<EntryTrace>>,
}

#[derive(Serialize)]
struct EntryTrace {
    entry: String,
    steps: Vec<TraceStep>,
}

/// Run the resolve command.
///
/// Prints one path per line, or a single JSON object with `--json`.
pub fn run(
    package_json: &Path,
    entries: &[String],
    options: &ResolveOptions,
    with_trace: bool,
    json: bool,
) -> Result<()> {
    let conditions: Vec<String> = ConditionSet::build(options, &[] as &[&str])
        .iter()
        .map(ToString::to_string)
        .collect();

    let pkg = match Package::from_path(package_json) {
        Ok(pkg) => pkg,
        Err(e) => return fail(entries, conditions, e, json),
    };
    debug!(package = pkg.display_name(), entries = entries.len(), "resolving");

    let resolver = ExportsResolver::new();
    let traces = with_trace.then(|| {
        entries
            .iter()
            .map(|entry| {
                let (_, trace) = resolver.resolve_with_trace(&pkg, entry, options);
                EntryTrace {
                    entry: entry.clone(),
                    steps: trace.steps,
                }
            })
            .collect::<Vec<_>>()
    });

    let paths = match resolver.resolve_entries(&pkg, entries, options) {
        Ok(paths) => paths,
        Err(e) => return fail(entries, conditions, e, json),
    };

    if json {
        let output = ResolveOutput {
            ok: true,
            entries: entries.to_vec(),
            paths,
            conditions,
            error: None,
            trace: traces,
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        for trace in traces.iter().flatten() {
            eprintln!("trace {}:", trace.entry);
            for step in &trace.steps {
                let mark = if step.ok { "+" } else { "-" };
                let key = step.key.as_deref().map(|k| format!(" [{k}]")).unwrap_or_default();
                let condition = step
                    .condition
                    .as_deref()
                    .map(|c| format!(" ({c})"))
                    .unwrap_or_default();
                eprintln!("  {mark} {}{key}{condition}: {}", step.step, step.detail);
            }
        }
        for path in &paths {
            println!("{path}");
        }
    }

    Ok(())
}

fn fail(
    entries: &[String],
    conditions: Vec<String>,
    err: pkgexports_core::Error,
    json: bool,
) -> Result<()> {
    if json {
        let output = ResolveOutput {
            ok: false,
            entries: entries.to_vec(),
            paths: Vec::new(),
            conditions,
            error: Some(err.to_string()),
            trace: None,
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        std::process::exit(1);
    }
    Err(err).into_diagnostic()
}
