#![forbid(unsafe_code)]

use super::ApiError;
use crate::support::ts_ms_to_rfc3339;
use serde_json::{Map, Value, json};
use todo_core::validate::{parse_estimated_minutes, validate_estimated_minutes};
use todo_core::{Category, CategoryRef, Priority, Task, TaskStatus, ValidationError};
use todo_storage::{CategoryUsage, DaySpread, TaskCreateRequest, TaskStats, TaskUpdateRequest};

const WEEKDAYS: [&str; 7] = [
    "lunes",
    "martes",
    "miercoles",
    "jueves",
    "viernes",
    "sabado",
    "domingo",
];

pub(crate) fn task_json(task: &Task) -> Value {
    json!({
        "id": task.id,
        "nombre": task.name,
        "estado": task.status.as_str(),
        "categoria_id": task.category_id,
        "categoria": task.category_name,
        "prioridad": task.priority.as_str(),
        "fecha_limite": task.due_at,
        "tiempo_estimado": task.estimated_minutes,
        "completado_en": task.completed_at_ms.map(ts_ms_to_rfc3339),
        "created_at": ts_ms_to_rfc3339(task.created_at_ms),
        "updated_at": ts_ms_to_rfc3339(task.updated_at_ms),
    })
}

pub(crate) fn category_json(category: &Category) -> Value {
    json!({ "id": category.id, "nombre": category.name })
}

pub(crate) fn category_usage_json(usage: &CategoryUsage) -> Value {
    json!({
        "id": usage.category.id,
        "nombre": usage.category.name,
        "total": usage.total,
        "completadas": usage.completed,
    })
}

pub(crate) fn stats_json(stats: &TaskStats) -> Value {
    let by_status: Map<String, Value> = stats
        .by_status
        .iter()
        .map(|(status, count)| (status.as_str().to_string(), json!(count)))
        .collect();
    let by_priority: Map<String, Value> = stats
        .by_priority
        .iter()
        .map(|(priority, entry)| {
            (
                priority.as_str().to_string(),
                json!({
                    "total": entry.total,
                    "completadas": entry.completed,
                    "tiempo_estimado_promedio": entry.avg_estimated_minutes,
                }),
            )
        })
        .collect();
    let by_category: Vec<Value> = stats
        .by_category
        .iter()
        .map(|entry| {
            json!({
                "id": entry.category_id,
                "nombre": entry.name,
                "total": entry.total,
                "completadas": entry.completed,
            })
        })
        .collect();
    json!({
        "total": stats.total,
        "por_estado": by_status,
        "por_prioridad": by_priority,
        "por_categoria": by_category,
        "tasa_completado": stats.completion_rate,
        "vencidas": stats.overdue,
        "completadas_a_tiempo": stats.completed_on_time,
        "completadas_tarde": stats.completed_late,
        "tiempo_estimado_promedio": stats.avg_estimated_minutes,
        "creadas_por_dia": stats.created_per_day,
        "dias_hasta_completar": spread_json(&stats.days_to_complete),
        "dias_hasta_vencimiento": spread_json(&stats.days_until_due),
        "creadas_por_dia_semana": weekday_json(&stats.created_per_weekday),
        "vencimientos_por_dia_semana": weekday_json(&stats.due_per_weekday),
    })
}

fn spread_json(spread: &DaySpread) -> Value {
    json!({
        "muestras": spread.samples,
        "promedio": spread.mean,
        "mediana": spread.median,
    })
}

/// Array rather than object so Monday-first order survives serialization.
fn weekday_json(counts: &[i64; 7]) -> Value {
    Value::Array(
        WEEKDAYS
            .iter()
            .zip(counts.iter())
            .map(|(day, total)| json!({ "dia": day, "total": total }))
            .collect(),
    )
}

pub(crate) fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::bad_request("INVALID_JSON", "request body must be valid JSON"))?;
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request(
            "INVALID_JSON",
            "request body must be a JSON object",
        )),
    }
}

pub(crate) fn task_create_from_json(
    body: &Map<String, Value>,
    now_ms: i64,
) -> Result<TaskCreateRequest, ApiError> {
    let name = text_field(body, "nombre")?.ok_or(ValidationError::MissingTaskName)?;
    let category = match body.get("categoria") {
        None | Some(Value::Null) => return Err(ValidationError::MissingCategory.into()),
        Some(value) => category_value(value)?,
    };
    let status = choice_field(body, "estado")?
        .map(|raw| TaskStatus::parse(&raw))
        .transpose()?;
    let priority = choice_field(body, "prioridad")?
        .map(|raw| Priority::parse(&raw))
        .transpose()?;
    let due_at = text_field(body, "fecha_limite")?;
    let estimated_minutes = match body.get("tiempo_estimado") {
        None => None,
        Some(value) => estimate_value(value)?,
    };
    Ok(TaskCreateRequest {
        name,
        category,
        status,
        priority,
        due_at,
        estimated_minutes,
        now_ms,
    })
}

pub(crate) fn task_update_from_json(
    body: &Map<String, Value>,
) -> Result<TaskUpdateRequest, ApiError> {
    let mut request = TaskUpdateRequest::default();
    if body.contains_key("nombre") {
        request.name = Some(text_field(body, "nombre")?.unwrap_or_default());
    }
    if let Some(value) = body.get("categoria") {
        request.category = Some(category_value(value)?);
    }
    request.status = choice_field(body, "estado")?
        .map(|raw| TaskStatus::parse(&raw))
        .transpose()?;
    request.priority = choice_field(body, "prioridad")?
        .map(|raw| Priority::parse(&raw))
        .transpose()?;
    if body.contains_key("fecha_limite") {
        request.due_at = Some(text_field(body, "fecha_limite")?);
    }
    if let Some(value) = body.get("tiempo_estimado") {
        request.estimated_minutes = Some(estimate_value(value)?);
    }
    if request.is_empty() {
        return Err(ApiError::bad_request(
            "EMPTY_UPDATE",
            "request body has no updatable fields",
        ));
    }
    Ok(request)
}

pub(crate) fn category_name_from_json(body: &Map<String, Value>) -> Result<String, ApiError> {
    Ok(text_field(body, "nombre")?.ok_or(ValidationError::MissingCategoryName)?)
}

/// Strings pass through, numbers are rendered, `null` is absent.
fn text_field(body: &Map<String, Value>, key: &str) -> Result<Option<String>, ApiError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(_) => Err(ApiError::bad_request(
            "INVALID_FIELD",
            &format!("field {key:?} must be a string"),
        )),
    }
}

/// Enum-valued fields: a blank string is an unselected form control.
fn choice_field(body: &Map<String, Value>, key: &str) -> Result<Option<String>, ApiError> {
    Ok(text_field(body, key)?.filter(|raw| !raw.trim().is_empty()))
}

fn category_value(value: &Value) -> Result<CategoryRef, ApiError> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(CategoryRef::Id)
            .ok_or_else(|| ValidationError::MissingCategory.into()),
        Value::String(raw) => Ok(CategoryRef::parse(raw)?),
        _ => Err(ValidationError::MissingCategory.into()),
    }
}

fn estimate_value(value: &Value) -> Result<Option<i64>, ApiError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => {
            let minutes = number.as_i64().ok_or(ValidationError::NegativeEstimate)?;
            Ok(Some(validate_estimated_minutes(minutes)?))
        }
        Value::String(raw) => Ok(parse_estimated_minutes(raw)?),
        _ => Err(ValidationError::NegativeEstimate.into()),
    }
}
