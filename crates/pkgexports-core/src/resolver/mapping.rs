//! Export mapping values and their evaluation against a condition set.
//!
//! A mapping is what an exports key points at: a path, `null`, a fallback
//! array, or a conditions object. Object key order is significant, so
//! conditions are kept as an ordered list rather than a map.

use super::conditions::ConditionSet;
use super::trace::{steps, ResolveTrace, TraceStep};
use crate::error::{Error, Result};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;
use tracing::trace;

/// The value side of an exports entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportMapping {
    /// `null`: explicitly not exported.
    Null,
    /// A target path such as `"./dist/index.js"`.
    Literal(String),
    /// Fallback array; every item is resolved and the results concatenated.
    List(Vec<ExportMapping>),
    /// Conditions object in declaration order.
    Conditional(Vec<(String, ExportMapping)>),
}

/// Outcome of evaluating a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An explicit `null` was reached. Aborts the enclosing resolution.
    Excluded,
    /// Nothing applied under the active conditions.
    Empty,
    /// One or more target paths, in order.
    Found(Vec<String>),
}

impl Resolution {
    /// Paths found, or an empty vec for `Excluded`/`Empty`.
    #[must_use]
    pub fn into_paths(self) -> Vec<String> {
        match self {
            Self::Found(paths) => paths,
            Self::Excluded | Self::Empty => Vec::new(),
        }
    }
}

impl ExportMapping {
    /// Evaluate this mapping under `conditions`.
    pub fn resolve(&self, conditions: &ConditionSet) -> Result<Resolution> {
        resolve_mapping(self, conditions, &mut ResolveTrace::disabled())
    }
}

pub(crate) fn resolve_mapping(
    mapping: &ExportMapping,
    conditions: &ConditionSet,
    trace: &mut ResolveTrace,
) -> Result<Resolution> {
    match mapping {
        ExportMapping::Null => Ok(Resolution::Excluded),
        ExportMapping::Literal(path) => Ok(Resolution::Found(vec![path.clone()])),
        ExportMapping::List(items) => {
            let mut paths = Vec::new();
            for item in items {
                match resolve_mapping(item, conditions, trace)? {
                    Resolution::Excluded => return Ok(Resolution::Excluded),
                    Resolution::Empty => {}
                    Resolution::Found(found) => paths.extend(found),
                }
            }
            // An all-empty list is a soft miss, same as an unmatched conditions object.
            if paths.is_empty() {
                Ok(Resolution::Empty)
            } else {
                Ok(Resolution::Found(paths))
            }
        }
        ExportMapping::Conditional(entries) => resolve_conditions(entries, conditions, trace),
    }
}

/// Walk a conditions object in declaration order. First non-empty branch wins.
pub(crate) fn resolve_conditions(
    entries: &[(String, ExportMapping)],
    conditions: &ConditionSet,
    trace: &mut ResolveTrace,
) -> Result<Resolution> {
    for (key, value) in entries {
        if conditions.contains(key) {
            let resolution = resolve_mapping(value, conditions, trace)?;
            trace.record(|| {
                TraceStep::new(
                    steps::RESOLVE_CONDITION,
                    !matches!(resolution, Resolution::Empty),
                    describe(&resolution),
                )
                .with_condition(key.as_str())
            });
            match resolution {
                Resolution::Empty => {
                    trace!(condition = %key, "condition matched but resolved to nothing");
                }
                other => return Ok(other),
            }
        } else if key.starts_with('.') {
            return Err(Error::InvalidCondition {
                condition: key.clone(),
            });
        }
    }
    Ok(Resolution::Empty)
}

fn describe(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Excluded => "excluded by null".to_string(),
        Resolution::Empty => "no nested condition applied".to_string(),
        Resolution::Found(paths) => paths.join(", "),
    }
}

impl<'de> Deserialize<'de> for ExportMapping {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ExportMappingVisitor;

        impl<'de> Visitor<'de> for ExportMappingVisitor {
            type Value = ExportMapping;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, array, object, or null")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ExportMapping::Literal(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ExportMapping::Literal(v))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ExportMapping::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ExportMapping::Null)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element::<ExportMapping>()? {
                    items.push(item);
                }
                Ok(ExportMapping::List(items))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, ExportMapping>()? {
                    entries.push((key, value));
                }
                Ok(ExportMapping::Conditional(entries))
            }
        }

        deserializer.deserialize_any(ExportMappingVisitor)
    }
}
