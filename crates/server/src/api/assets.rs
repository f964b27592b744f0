#![forbid(unsafe_code)]

use crate::http::HttpResponse;

const INDEX_HTML: &str = include_str!("assets/index.html");
const APP_JS: &str = include_str!("assets/app.js");
const APP_CSS: &str = include_str!("assets/app.css");

pub(super) fn index() -> HttpResponse {
    HttpResponse::asset("text/html; charset=utf-8", INDEX_HTML)
}

pub(super) fn script() -> HttpResponse {
    HttpResponse::asset("text/javascript; charset=utf-8", APP_JS)
}

pub(super) fn stylesheet() -> HttpResponse {
    HttpResponse::asset("text/css; charset=utf-8", APP_CSS)
}
