//! Entry resolution: match an entry against a package's exports and build
//! the final path list.

use super::conditions::ConditionSet;
use super::mapping::{resolve_conditions, resolve_mapping, Resolution};
use super::package::{Package, PackageExports};
use super::pattern::CompiledPattern;
use super::specificity;
use super::trace::{steps, ResolveTrace, TraceStep};
use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, trace};

/// Whether `entry` is a specifier an exports map can answer for.
#[must_use]
pub fn is_valid_entry(entry: &str) -> bool {
    entry == "." || entry.starts_with("./")
}

/// One entry lookup against one package.
pub(crate) struct EntryRequest<'a> {
    pub pkg: &'a Package,
    pub entry: &'a str,
    pub conditions: &'a ConditionSet,
    pub assert_match: bool,
}

/// Best wildcard match seen so far.
struct Candidate<'p> {
    pattern: &'p CompiledPattern,
    captures: Vec<String>,
    resolution: Resolution,
}

impl EntryRequest<'_> {
    /// Resolve the entry. `load_patterns` is only called for path-pattern maps.
    pub(crate) fn resolve<F>(&self, load_patterns: F, trace: &mut ResolveTrace) -> Result<Vec<String>>
    where
        F: FnOnce() -> Result<Arc<[CompiledPattern]>>,
    {
        if !is_valid_entry(self.entry) {
            trace.record(|| {
                TraceStep::new(
                    steps::VALIDATE_ENTRY,
                    false,
                    format!("'{}' is neither '.' nor starts with './'", self.entry),
                )
            });
            debug!(entry = self.entry, "rejected entry specifier");
            return Ok(Vec::new());
        }
        trace.record(|| {
            TraceStep::new(steps::VALIDATE_ENTRY, true, format!("entry '{}'", self.entry))
        });

        if let PackageExports::Conditions(entries) = self.pkg.exports() {
            trace.success(steps::DETECT_SHAPE, "root conditions object");
            if self.entry != "." {
                trace.failure(
                    steps::FINAL_PATHS,
                    "conditions-only exports expose the root entry only",
                );
                return self.miss(self.missing_export());
            }
            let resolution = resolve_conditions(entries, self.conditions, trace)?;
            return self.finish_exact(resolution, trace);
        }
        trace.success(steps::DETECT_SHAPE, "path pattern map");

        let patterns = load_patterns()?;
        self.scan(&patterns, trace)
    }

    fn scan(&self, patterns: &[CompiledPattern], trace: &mut ResolveTrace) -> Result<Vec<String>> {
        let mut best: Option<Candidate<'_>> = None;
        let mut matched_any = false;

        for pattern in patterns {
            let Some(captures) = pattern.captures(self.entry) else {
                continue;
            };
            matched_any = true;
            trace.record(|| {
                TraceStep::new(
                    steps::MATCH_PATTERN,
                    true,
                    format!("{} wildcard slot(s) captured", captures.len()),
                )
                .with_key(pattern.key())
            });

            let resolution = resolve_mapping(pattern.mapping(), self.conditions, trace)?;

            if pattern.is_exact() {
                debug!(entry = self.entry, key = pattern.key(), "exact exports match");
                return self.finish_exact(resolution, trace);
            }

            if resolution == Resolution::Empty {
                trace!(key = pattern.key(), "wildcard matched but no condition applied");
                continue;
            }

            let replace = match &best {
                None => true,
                Some(current) => {
                    specificity::compare(pattern.normalized_key(), current.pattern.normalized_key())
                        == Ordering::Greater
                }
            };
            if replace {
                trace.record(|| {
                    TraceStep::new(steps::SELECT_CANDIDATE, true, "more specific candidate")
                        .with_key(pattern.key())
                });
                best = Some(Candidate {
                    pattern,
                    captures,
                    resolution,
                });
            }
        }

        match best {
            Some(Candidate {
                pattern,
                captures,
                resolution: Resolution::Found(templates),
            }) => {
                let paths: Vec<String> = templates
                    .iter()
                    .map(|template| substitute(template, &captures, pattern.trailing_slash()))
                    .collect();
                trace.record(|| {
                    TraceStep::new(steps::SUBSTITUTE, true, paths.join(", "))
                        .with_key(pattern.key())
                });
                debug!(entry = self.entry, key = pattern.key(), "wildcard exports match");
                Ok(paths)
            }
            Some(Candidate { pattern, .. }) => {
                trace.record(|| {
                    TraceStep::new(steps::FINAL_PATHS, false, "most specific match is null")
                        .with_key(pattern.key())
                });
                self.miss(self.missing_export())
            }
            None if matched_any => {
                trace.failure(steps::FINAL_PATHS, "patterns matched but no condition applied");
                self.miss(self.no_matching_condition())
            }
            None => {
                trace.failure(steps::FINAL_PATHS, "no exports key matched");
                self.miss(self.missing_export())
            }
        }
    }

    fn finish_exact(&self, resolution: Resolution, trace: &mut ResolveTrace) -> Result<Vec<String>> {
        match resolution {
            Resolution::Found(paths) => {
                trace.record(|| TraceStep::new(steps::FINAL_PATHS, true, paths.join(", ")));
                Ok(paths)
            }
            Resolution::Excluded => {
                trace.failure(steps::FINAL_PATHS, "entry is excluded by null");
                self.miss(self.missing_export())
            }
            Resolution::Empty => {
                trace.failure(steps::FINAL_PATHS, "no condition applied");
                self.miss(self.no_matching_condition())
            }
        }
    }

    /// Empty result, or `err` in strict mode.
    fn miss(&self, err: Error) -> Result<Vec<String>> {
        if self.assert_match {
            debug!(entry = self.entry, error = %err, "strict match failed");
            Err(err)
        } else {
            Ok(Vec::new())
        }
    }

    fn missing_export(&self) -> Error {
        Error::MissingExport {
            entry: self.entry.to_string(),
            package: self.pkg.display_name().to_string(),
        }
    }

    fn no_matching_condition(&self) -> Error {
        Error::NoMatchingCondition {
            entry: self.entry.to_string(),
            package: self.pkg.display_name().to_string(),
            conditions: self.conditions.to_string(),
        }
    }
}

/// Fill the `*` tokens of `template` with `captures`, left to right.
///
/// Tokens past the last capture reuse it. For trailing-slash keys a target
/// ending in `/` gets an implicit trailing `*`, which always takes the last
/// capture.
#[must_use]
pub fn substitute(template: &str, captures: &[String], trailing_slash: bool) -> String {
    let implicit_tail = trailing_slash && template.ends_with('/');

    let Some(last) = captures.len().checked_sub(1) else {
        return if implicit_tail {
            format!("{template}*")
        } else {
            template.to_string()
        };
    };

    let mut out = String::with_capacity(template.len() + captures[last].len());
    for (i, literal) in template.split('*').enumerate() {
        if i > 0 {
            out.push_str(&captures[(i - 1).min(last)]);
        }
        out.push_str(literal);
    }
    if implicit_tail {
        out.push_str(&captures[last]);
    }
    out
}
