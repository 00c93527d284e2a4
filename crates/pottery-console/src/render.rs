use std::fmt::Write;

use pottery_core::{Catalog, FieldSnapshot, SurfacesSnapshot, SyncReport};
use pottery_model::{Field, OperationId};

pub fn operations(catalog: &Catalog) -> String {
    let mut out = String::new();
    for op in catalog.iter() {
        let needs: Vec<_> = op.required_inputs().map(|f| f.as_str()).collect();
        let _ = write!(out, "{:<26} {:<6} {}", op.id.as_str(), op.method.as_str(), op.path);
        if !needs.is_empty() {
            let _ = write!(out, "  [{}]", needs.join(", "));
        }
        out.push('\n');
    }
    out
}

pub fn fields(snapshot: &FieldSnapshot) -> String {
    let mut out = String::new();
    for field in Field::ALL {
        let value = snapshot.value(field).unwrap_or("-");
        let _ = writeln!(out, "{:<20} {}", field.as_str(), value);
    }
    out
}

pub fn needs(catalog: &Catalog, snapshot: &FieldSnapshot, id: OperationId) -> String {
    let prerequisites = catalog.prerequisites(id);
    if prerequisites.is_empty() {
        return format!("{id} needs nothing\n");
    }

    let mut out = String::new();
    for (field, producers) in prerequisites {
        let state = match snapshot.value(field) {
            Some(v) => format!("= {v}"),
            None => "missing".to_string(),
        };
        let source = if producers.is_empty() {
            "set by hand".to_string()
        } else {
            let names: Vec<_> = producers.iter().map(|p| p.as_str()).collect();
            format!("filled by {}", names.join(", "))
        };
        let _ = writeln!(out, "{:<20} {:<24} {}", field.as_str(), state, source);
    }
    out
}

pub fn surfaces(view: &SurfacesSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "result:\n{}", view.result);
    if !view.error.is_empty() {
        let _ = writeln!(out, "error:\n{}", view.error);
    }
    out
}

/// Lines printed under a completed request.
pub fn report(report: &SyncReport) -> String {
    let mut out = String::new();
    let verdict = match (report.success, report.status) {
        (true, _) => "ok".to_string(),
        (false, Some(code)) => format!("failed (HTTP {code})"),
        (false, None) => "failed (no response)".to_string(),
    };
    let _ = writeln!(out, "{} {}", report.operation, verdict);

    if let Some(summary) = &report.summary {
        let _ = writeln!(out, "  {summary}");
    }
    for (field, value) in &report.written {
        let _ = writeln!(out, "  {} <- {}", field.as_str(), value);
    }
    for (field, path) in &report.non_scalar {
        let _ = writeln!(out, "  {} not updated: {} is not a scalar", field.as_str(), path);
    }
    if let Some(mismatch) = &report.schema {
        let _ = writeln!(out, "  note: {mismatch}");
    }
    out
}
