use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::server::error::ApiError;
use crate::server::AppState;
use crate::source::TableSource;

const ADMIN_PAGE: &str = include_str!("../../public/admin.html");
const QUIZ_PAGE: &str = include_str!("../../public/quiz.html");
const ADMIN_SCRIPT: &str = include_str!("../../public/admin.js");
const QUIZ_SCRIPT: &str = include_str!("../../public/quiz.js");
const STYLESHEET: &str = include_str!("../../public/style.css");

pub const QUIZ_UNAVAILABLE: &str = "Quiz not found or no longer active";

pub async fn root() -> Redirect {
    Redirect::to("/admin")
}

pub async fn admin() -> Html<&'static str> {
    Html(ADMIN_PAGE)
}

pub async fn quiz<S: TableSource>(
    State(state): State<AppState<S>>,
    quiz_name: Result<Path<String>, PathRejection>,
) -> Response {
    let quiz_name = match quiz_name {
        Ok(Path(quiz_name)) => quiz_name,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    if !state.registry.is_active(&quiz_name).await {
        tracing::info!(quiz = %quiz_name, "refused inactive quiz page");
        return (StatusCode::NOT_FOUND, QUIZ_UNAVAILABLE).into_response();
    }
    Html(QUIZ_PAGE).into_response()
}

pub async fn style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

pub async fn admin_script() -> impl IntoResponse {
    javascript(ADMIN_SCRIPT)
}

pub async fn quiz_script() -> impl IntoResponse {
    javascript(QUIZ_SCRIPT)
}

fn javascript(source: &'static str) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        source,
    )
}
