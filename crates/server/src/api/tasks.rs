#![forbid(unsafe_code)]

use super::ApiError;
use super::json::{parse_object, task_create_from_json, task_json, task_update_from_json};
use crate::http::{HttpRequest, HttpResponse};
use serde_json::Value;
use todo_core::{CategoryRef, Priority, TaskStatus};
use todo_storage::{SqliteStore, StoreError, TaskFilter, TaskSort};

pub(super) fn list(store: &SqliteStore, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let query = request.query()?;
    let mut filter = TaskFilter::default();
    if let Some(raw) = query.get("estado") {
        filter.status = Some(TaskStatus::parse(raw)?);
    }
    if let Some(raw) = query.get("categoria") {
        filter.category_id = Some(store.resolve_category(&CategoryRef::parse(raw)?)?);
    }
    if let Some(raw) = query.get("prioridad") {
        filter.priority = Some(Priority::parse(raw)?);
    }
    filter.text = query.get("texto").map(str::to_string);
    filter.due_from = query.get("fecha_desde").map(str::to_string);
    filter.due_until = query.get("fecha_hasta").map(str::to_string);
    if let Some(raw) = query.get("orden") {
        filter.sort = TaskSort::parse(raw).ok_or_else(|| {
            ApiError::bad_request(
                "INVALID_SORT",
                "orden must be one of: id, nombre, prioridad, estado, fecha_creacion, fecha_limite",
            )
        })?;
    }
    if let Some(raw) = query.get("direccion") {
        filter.descending = match raw.to_ascii_lowercase().as_str() {
            "asc" => false,
            "desc" => true,
            _ => {
                return Err(ApiError::bad_request(
                    "INVALID_SORT",
                    "direccion must be asc or desc",
                ));
            }
        };
    }
    let tasks = store.list_tasks(&filter)?;
    Ok(HttpResponse::ok(&Value::Array(
        tasks.iter().map(task_json).collect(),
    )))
}

pub(super) fn create(
    store: &mut SqliteStore,
    request: &HttpRequest,
    now_ms: i64,
) -> Result<HttpResponse, ApiError> {
    let body = parse_object(&request.body)?;
    let task = store.create_task(task_create_from_json(&body, now_ms)?)?;
    tracing::debug!(id = task.id, "task created");
    Ok(HttpResponse::created(&task_json(&task)))
}

pub(super) fn get(store: &SqliteStore, id: i64) -> Result<HttpResponse, ApiError> {
    let task = store.task(id)?.ok_or(StoreError::UnknownId)?;
    Ok(HttpResponse::ok(&task_json(&task)))
}

pub(super) fn update(
    store: &mut SqliteStore,
    request: &HttpRequest,
    id: i64,
    now_ms: i64,
) -> Result<HttpResponse, ApiError> {
    let body = parse_object(&request.body)?;
    let update = task_update_from_json(&body)?;
    let task = store.update_task(id, update, now_ms)?;
    Ok(HttpResponse::ok(&task_json(&task)))
}

pub(super) fn delete(store: &mut SqliteStore, id: i64) -> Result<HttpResponse, ApiError> {
    store.delete_task(id)?;
    Ok(HttpResponse::no_content())
}

pub(super) fn toggle(
    store: &mut SqliteStore,
    id: i64,
    now_ms: i64,
) -> Result<HttpResponse, ApiError> {
    let task = store.toggle_status(id, now_ms)?;
    Ok(HttpResponse::ok(&task_json(&task)))
}
