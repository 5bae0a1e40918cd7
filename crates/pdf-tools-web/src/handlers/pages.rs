use crate::operation::Operation;
use crate::views;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

pub async fn index() -> Html<String> {
    views::index()
}

pub fn form(op: Operation) -> Html<String> {
    views::form(op)
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, views::not_found())
}
