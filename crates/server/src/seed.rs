#![forbid(unsafe_code)]

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use todo_core::validate::{ms_from_due_at, normalize_due_at, parse_estimated_minutes};
use todo_core::{CategoryRef, Priority, TaskStatus};
use todo_storage::{SqliteStore, StoreError, TaskCreateRequest};

#[derive(Debug, thiserror::Error)]
pub(crate) enum SeedError {
    #[error("cannot read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed file must hold a JSON array of task records: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SeedReport {
    /// Distinct categories the imported rows landed in.
    pub(crate) categories: usize,
    pub(crate) created: usize,
    pub(crate) skipped: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeedRecord {
    nombre: Option<String>,
    categoria: Option<String>,
    estado: Option<String>,
    prioridad: Option<String>,
    fecha_limite: Option<String>,
    tiempo_estimado: Option<Value>,
    fecha_completado: Option<String>,
}

pub(crate) fn seed_from_file(
    store: &mut SqliteStore,
    path: &Path,
    now_ms: i64,
) -> Result<SeedReport, SeedError> {
    let raw = std::fs::read(path)?;
    let rows: Vec<Value> = serde_json::from_slice(&raw)?;
    seed_rows(store, rows, now_ms)
}

/// Imports rows leniently: bad optional fields fall back to defaults, rows
/// without a name or category are skipped.
pub(crate) fn seed_rows(
    store: &mut SqliteStore,
    rows: Vec<Value>,
    now_ms: i64,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();
    let mut categories = BTreeSet::new();

    for (index, row) in rows.into_iter().enumerate() {
        let line = index + 1;
        let record = match serde_json::from_value::<SeedRecord>(row) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(row = line, error = %err, "skipping malformed seed row");
                report.skipped += 1;
                continue;
            }
        };
        let Some(name) = non_empty(record.nombre.as_deref()) else {
            tracing::warn!(row = line, "skipping seed row without a task name");
            report.skipped += 1;
            continue;
        };
        let Some(category_name) = non_empty(record.categoria.as_deref()) else {
            tracing::warn!(row = line, "skipping seed row without a category");
            report.skipped += 1;
            continue;
        };

        let category = match store.get_or_create_category(category_name) {
            Ok(category) => category,
            Err(StoreError::Validation(err)) => {
                tracing::warn!(row = line, error = %err, "skipping seed row with invalid category");
                report.skipped += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let status = record
            .estado
            .as_deref()
            .and_then(|raw| TaskStatus::parse(raw).ok())
            .unwrap_or_default();
        let priority = record
            .prioridad
            .as_deref()
            .and_then(|raw| Priority::parse(raw).ok())
            .unwrap_or_default();
        let due_at = record
            .fecha_limite
            .as_deref()
            .and_then(|raw| normalize_due_at(raw).ok().flatten());
        let estimated_minutes = record.tiempo_estimado.as_ref().and_then(estimate_minutes);

        let created = store.create_task(TaskCreateRequest {
            name: name.to_string(),
            category: CategoryRef::Id(category.id),
            status: Some(status),
            priority: Some(priority),
            due_at,
            estimated_minutes,
            now_ms,
        });
        let task = match created {
            Ok(task) => task,
            Err(StoreError::Validation(err)) => {
                tracing::warn!(row = line, error = %err, "skipping invalid seed row");
                report.skipped += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if task.status.is_completed()
            && let Some(completed_at_ms) = record.fecha_completado.as_deref().and_then(ms_from_due_at)
        {
            store.set_completed_at(task.id, completed_at_ms)?;
        }

        categories.insert(category.id);
        report.created += 1;
    }

    report.categories = categories.len();
    tracing::info!(
        created = report.created,
        skipped = report.skipped,
        categories = report.categories,
        "seed import finished"
    );
    Ok(report)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Spreadsheet exports write whole minutes as `30.0`; accept those too.
fn estimate_minutes(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => {
            if let Some(minutes) = number.as_i64() {
                return (minutes >= 0).then_some(minutes);
            }
            let minutes = number.as_f64()?;
            (minutes >= 0.0 && minutes.fract() == 0.0 && minutes <= i64::MAX as f64)
                .then_some(minutes as i64)
        }
        Value::String(raw) => parse_estimated_minutes(raw).ok().flatten(),
        _ => None,
    }
}
