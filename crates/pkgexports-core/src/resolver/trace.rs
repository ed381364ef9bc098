//! Resolution tracing.
//!
//! Records step-by-step why an entry resolved (or failed to resolve) to a
//! given set of paths. A disabled trace records nothing and never builds
//! its step details.

use serde::Serialize;

/// A single step in the resolution trace.
#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    /// Step name, one of [`steps`].
    pub step: &'static str,
    /// Whether this step succeeded
    pub ok: bool,
    /// Human-readable description of what happened
    pub detail: String,
    /// Exports key involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Condition taken, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl TraceStep {
    pub fn new(step: &'static str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            step,
            ok,
            detail: detail.into(),
            key: None,
            condition: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Ordered record of resolution steps.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveTrace {
    #[serde(skip)]
    enabled: bool,
    pub steps: Vec<TraceStep>,
}

impl Default for ResolveTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveTrace {
    /// Create a new, recording trace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            steps: Vec::new(),
        }
    }

    /// A trace that drops every step.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a step, building it only when tracing is on.
    pub fn record(&mut self, step: impl FnOnce() -> TraceStep) {
        if self.enabled {
            self.steps.push(step());
        }
    }

    /// Record a step with a fixed detail. Use [`record`](Self::record) for built details.
    pub fn success(&mut self, step: &'static str, detail: &'static str) {
        self.record(|| TraceStep::new(step, true, detail));
    }

    pub fn failure(&mut self, step: &'static str, detail: &'static str) {
        self.record(|| TraceStep::new(step, false, detail));
    }
}

/// Step names used in resolution tracing.
pub mod steps {
    pub const VALIDATE_ENTRY: &str = "validate_entry";
    pub const DETECT_SHAPE: &str = "detect_shape";
    pub const MATCH_PATTERN: &str = "match_pattern";
    pub const RESOLVE_CONDITION: &str = "resolve_condition";
    pub const SELECT_CANDIDATE: &str = "select_candidate";
    pub const SUBSTITUTE: &str = "substitute";
    pub const FINAL_PATHS: &str = "final_paths";
}
