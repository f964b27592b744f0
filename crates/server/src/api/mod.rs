#![forbid(unsafe_code)]

mod assets;
mod categories;
mod json;
mod tasks;

pub(crate) use json::stats_json;

use crate::auth::BasicAuth;
use crate::http::{BodyError, HttpRequest, HttpResponse, QueryError};
use serde_json::json;
use todo_core::ValidationError;
use todo_storage::{SqliteStore, StoreError};

/// JSON error surfaced to clients as `{"error": ..., "code": ...}`.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: &'static str,
    pub(crate) code: &'static str,
    pub(crate) message: String,
    allow: Option<&'static str>,
}

impl ApiError {
    pub(crate) fn bad_request(code: &'static str, message: &str) -> Self {
        Self {
            status: "400 Bad Request",
            code,
            message: message.to_string(),
            allow: None,
        }
    }

    fn not_found(message: &str) -> Self {
        Self {
            status: "404 Not Found",
            code: "NOT_FOUND",
            message: message.to_string(),
            allow: None,
        }
    }

    fn method_not_allowed(allow: &'static str) -> Self {
        Self {
            status: "405 Method Not Allowed",
            code: "METHOD_NOT_ALLOWED",
            message: format!("method not allowed; use {allow}"),
            allow: Some(allow),
        }
    }

    fn into_response(self) -> HttpResponse {
        let response = HttpResponse::error(self.status, self.code, &self.message);
        match self.allow {
            Some(allow) => response.with_header("Allow", allow),
            None => response,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.code(), &err.to_string())
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::bad_request("INVALID_QUERY", &err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::Validation(inner) => return inner.clone().into(),
            StoreError::UnknownId => "404 Not Found",
            StoreError::UnknownCategory | StoreError::Integrity(_) => "400 Bad Request",
            StoreError::CategoryExists | StoreError::CategoryInUse => "409 Conflict",
            StoreError::Io(_) | StoreError::Sql(_) | StoreError::SchemaTooNew { .. } => {
                tracing::error!(error = %err, "task store failure");
                return Self {
                    status: "500 Internal Server Error",
                    code: err.code(),
                    message: "internal storage error".to_string(),
                    allow: None,
                };
            }
        };
        Self {
            status,
            code: err.code(),
            message: err.to_string(),
            allow: None,
        }
    }
}

/// Routes requests onto one task store.
pub(crate) struct Api {
    store: SqliteStore,
    auth: Option<BasicAuth>,
}

impl Api {
    pub(crate) fn new(store: SqliteStore, auth: Option<BasicAuth>) -> Self {
        Self { store, auth }
    }

    pub(crate) fn handle(&mut self, request: &HttpRequest, now_ms: i64) -> HttpResponse {
        let path = request.path();
        if path != "/api/health"
            && let Some(auth) = self.auth.as_ref()
            && !auth.authorize(request.header("authorization"))
        {
            return HttpResponse::error("401 Unauthorized", "UNAUTHORIZED", "authentication required")
                .with_header("WWW-Authenticate", BasicAuth::challenge());
        }
        match request.body_error {
            Some(BodyError::TooLarge) => {
                return HttpResponse::error(
                    "413 Payload Too Large",
                    "PAYLOAD_TOO_LARGE",
                    "request body is too large",
                );
            }
            Some(BodyError::InvalidLength) => {
                return HttpResponse::error(
                    "400 Bad Request",
                    "BAD_REQUEST",
                    "Content-Length header is not a valid byte count",
                );
            }
            None => {}
        }
        match self.route(request, &path, now_ms) {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }

    fn route(
        &mut self,
        request: &HttpRequest,
        path: &str,
        now_ms: i64,
    ) -> Result<HttpResponse, ApiError> {
        let method = match request.method.as_str() {
            "HEAD" => "GET",
            other => other,
        };
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let store = &mut self.store;
        match segments.as_slice() {
            [""] | ["index.html"] => match method {
                "GET" => Ok(assets::index()),
                _ => Err(ApiError::method_not_allowed("GET")),
            },
            ["app.js"] => match method {
                "GET" => Ok(assets::script()),
                _ => Err(ApiError::method_not_allowed("GET")),
            },
            ["app.css"] => match method {
                "GET" => Ok(assets::stylesheet()),
                _ => Err(ApiError::method_not_allowed("GET")),
            },
            ["api", "health"] => match method {
                "GET" => Ok(HttpResponse::ok(&json!({ "status": "ok" }))),
                _ => Err(ApiError::method_not_allowed("GET")),
            },
            ["api", "tareas"] => match method {
                "GET" => tasks::list(store, request),
                "POST" => tasks::create(store, request, now_ms),
                _ => Err(ApiError::method_not_allowed("GET, POST")),
            },
            ["api", "tarea", id] => {
                let id = parse_id(id, "task")?;
                match method {
                    "GET" => tasks::get(store, id),
                    "PUT" => tasks::update(store, request, id, now_ms),
                    "DELETE" => tasks::delete(store, id),
                    _ => Err(ApiError::method_not_allowed("GET, PUT, DELETE")),
                }
            }
            ["api", "tarea", id, "toggle-estado"] => {
                let id = parse_id(id, "task")?;
                match method {
                    "POST" => tasks::toggle(store, id, now_ms),
                    _ => Err(ApiError::method_not_allowed("POST")),
                }
            }
            ["api", "categorias"] => match method {
                "GET" => categories::list(store),
                "POST" => categories::create(store, request),
                _ => Err(ApiError::method_not_allowed("GET, POST")),
            },
            ["api", "categoria", id] => {
                let id = parse_id(id, "category")?;
                match method {
                    "GET" => categories::get(store, id),
                    "PUT" => categories::rename(store, request, id),
                    "DELETE" => categories::delete(store, id),
                    _ => Err(ApiError::method_not_allowed("GET, PUT, DELETE")),
                }
            }
            ["api", "estadisticas"] => match method {
                "GET" => Ok(HttpResponse::ok(&stats_json(&store.task_stats(now_ms)?))),
                _ => Err(ApiError::method_not_allowed("GET")),
            },
            _ => Err(ApiError::not_found("no such route")),
        }
    }
}

fn parse_id(raw: &str, kind: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::not_found(&format!("no such {kind}")))
}
