use std::sync::{Arc, Mutex, PoisonError, RwLock};

use pottery_model::{Extracted, Field, Operation, OperationId, SchemaMismatch};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    outcome::{ErrorPayload, Payload, RequestOutcome},
    state::FieldStore,
};

/// Literal shown on the result surface when a request fails.
pub const ERROR_MARKER: &str = "Error";

/// The two text displays: last result and last error.
#[derive(Clone, Default)]
pub struct Surfaces {
    inner: Arc<RwLock<SurfacesSnapshot>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfacesSnapshot {
    pub result: String,
    pub error: String,
}

impl Surfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfacesSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, result: String, error: String) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *inner = SurfacesSnapshot { result, error };
    }
}

/// What one applied outcome changed, and what it could not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub operation: OperationId,
    pub success: bool,
    /// HTTP status of a failure, when one was received.
    pub status: Option<u16>,
    /// Fields overwritten from the payload, in declaration order.
    pub written: Vec<(Field, String)>,
    /// Declared outputs with no candidate path in the payload.
    pub missing: Vec<Field>,
    /// Declared outputs whose path pointed at an object or array.
    pub non_scalar: Vec<(Field, String)>,
    pub schema: Option<SchemaMismatch>,
    pub summary: Option<String>,
}

impl SyncReport {
    fn new(operation: OperationId, success: bool, status: Option<u16>) -> Self {
        Self {
            operation,
            success,
            status,
            written: Vec::new(),
            missing: Vec::new(),
            non_scalar: Vec::new(),
            schema: None,
            summary: None,
        }
    }
}

/// Applies request outcomes to the field store and the display surfaces.
///
/// Clones share one apply lock, so each outcome lands on both as a unit.
#[derive(Clone)]
pub struct ViewSynchronizer {
    fields: FieldStore,
    surfaces: Surfaces,
    apply_lock: Arc<Mutex<()>>,
}

impl ViewSynchronizer {
    pub fn new(fields: FieldStore, surfaces: Surfaces) -> Self {
        Self {
            fields,
            surfaces,
            apply_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    #[instrument(level = "debug", skip(self, op, outcome), fields(operation = %op.id))]
    pub fn apply(&self, op: &Operation, outcome: &RequestOutcome) -> SyncReport {
        let _guard = self.apply_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match outcome {
            RequestOutcome::Success(payload) => self.apply_success(op, payload),
            RequestOutcome::Failure { status, error } => self.apply_failure(op, *status, error),
        }
    }

    fn apply_success(&self, op: &Operation, payload: &Payload) -> SyncReport {
        let mut report = SyncReport::new(op.id, true, None);
        let doc = payload.json();

        let shown = match (&doc, payload) {
            (Some(v), _) => pretty(v),
            (None, Payload::Text(s)) => s.clone(),
            (None, Payload::Json(v)) => pretty(v),
        };
        self.surfaces.replace(shown, String::new());

        let Some(doc) = doc else {
            report.missing = op.output_fields().collect();
            return report;
        };

        for extraction in &op.outputs {
            match extraction.extract(&doc) {
                Extracted::Value(value) => {
                    self.fields.set(extraction.field, value.clone());
                    report.written.push((extraction.field, value));
                }
                Extracted::Missing => report.missing.push(extraction.field),
                Extracted::NotScalar { path } => {
                    warn!(field = %extraction.field, %path, "extracted value is not a scalar");
                    report.non_scalar.push((extraction.field, path));
                }
            }
        }

        if let Err(mismatch) = op.schema.check(&doc) {
            warn!(error = %mismatch, "unexpected payload shape");
            report.schema = Some(mismatch);
        }
        report.summary = op.schema.summarize(&doc);

        debug!(written = report.written.len(), missing = report.missing.len(), "outcome applied");
        report
    }

    fn apply_failure(&self, op: &Operation, status: Option<u16>, error: &ErrorPayload) -> SyncReport {
        let body = pretty(&error.to_json());
        let shown = match status {
            Some(code) => format!("HTTP {code}\n{body}"),
            None => body,
        };
        self.surfaces.replace(ERROR_MARKER.to_string(), shown);

        debug!(?status, "failure applied");
        SyncReport::new(op.id, false, status)
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
