#![forbid(unsafe_code)]

use super::ApiError;
use super::json::{category_json, category_name_from_json, category_usage_json, parse_object};
use crate::http::{HttpRequest, HttpResponse};
use serde_json::Value;
use todo_storage::{SqliteStore, StoreError};

pub(super) fn list(store: &SqliteStore) -> Result<HttpResponse, ApiError> {
    let usage = store.category_usage()?;
    Ok(HttpResponse::ok(&Value::Array(
        usage.iter().map(category_usage_json).collect(),
    )))
}

pub(super) fn create(
    store: &mut SqliteStore,
    request: &HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let body = parse_object(&request.body)?;
    let category = store.create_category(&category_name_from_json(&body)?)?;
    Ok(HttpResponse::created(&category_json(&category)))
}

pub(super) fn get(store: &SqliteStore, id: i64) -> Result<HttpResponse, ApiError> {
    let category = store.category(id)?.ok_or(StoreError::UnknownId)?;
    Ok(HttpResponse::ok(&category_json(&category)))
}

pub(super) fn rename(
    store: &mut SqliteStore,
    request: &HttpRequest,
    id: i64,
) -> Result<HttpResponse, ApiError> {
    let body = parse_object(&request.body)?;
    let category = store.rename_category(id, &category_name_from_json(&body)?)?;
    Ok(HttpResponse::ok(&category_json(&category)))
}

pub(super) fn delete(store: &mut SqliteStore, id: i64) -> Result<HttpResponse, ApiError> {
    store.delete_category(id)?;
    Ok(HttpResponse::no_content())
}
