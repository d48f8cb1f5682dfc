use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use url::{Position, Url};

use crate::quiz::{self, Question};
use crate::server::error::ApiError;
use crate::server::{AppState, SPREADSHEET_ID_PARAM};
use crate::source::{parse_table_id, Row, SourceError, TableSource};

lazy_static! {
    static ref LINK_BASE: Url = Url::parse("http://localhost/").unwrap();
}

const MISSING_TABLE_ID: &str = "Spreadsheet ID is required";
const QUIZ_NOT_ACTIVE: &str = "Quiz is not active";
const MISSING_ACTIVATION_FIELDS: &str = "Sheet name and spreadsheet ID are required";
const MISSING_SHEET_NAME: &str = "Sheet name is required";

#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    #[serde(rename = "spreadsheetId")]
    spreadsheet_id: Option<String>,
}

impl TableQuery {
    fn table_id(&self) -> Option<String> {
        resolve_table_id(self.spreadsheet_id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    sheet_name: Option<String>,
    spreadsheet_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateRequest {
    sheet_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetsResponse {
    sheets: Vec<String>,
    active_quizzes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateResponse {
    active_quizzes: Vec<String>,
    quiz_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateResponse {
    active_quizzes: Vec<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// Ids that fit neither the bare nor the URL shape are passed on as typed so
// the source reports them.
fn resolve_table_id(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;
    Some(parse_table_id(raw).unwrap_or_else(|| raw.to_owned()))
}

/// Shareable link to a quiz, relative to the service root.
pub fn quiz_url(sheet_name: &str, table_id: &str) -> String {
    let mut url = LINK_BASE.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push("quiz").push(sheet_name);
    }
    url.query_pairs_mut()
        .append_pair(SPREADSHEET_ID_PARAM, table_id);
    url[Position::BeforePath..].to_owned()
}

fn prepare_questions(rows: &[Row], passes: usize) -> Result<Vec<Question>, ApiError> {
    Ok(quiz::prepare(rows, passes, &mut rand::thread_rng())?)
}

fn questions_failure(error: SourceError) -> ApiError {
    let status = match &error {
        SourceError::AccessDenied { .. } => StatusCode::FORBIDDEN,
        SourceError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ApiError::Failed {
        status,
        error: "Failed to fetch questions".to_owned(),
        message: Some(error.to_string()),
        details: error.details().cloned(),
    }
}

fn sheets_failure(error: SourceError) -> ApiError {
    let status = match &error {
        SourceError::AccessDenied { .. } => StatusCode::FORBIDDEN,
        SourceError::NotFound { .. } => StatusCode::NOT_FOUND,
        SourceError::Unavailable {
            status: Some(status),
            ..
        } => StatusCode::from_u16(*status)
            .ok()
            .filter(|status| status.is_client_error() || status.is_server_error())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match &error {
        SourceError::AccessDenied { identity, .. } => {
            format!("Access denied. Please share the spreadsheet with: {}", identity)
        }
        error if error.is_unreachable() => {
            "Could not connect to Google Sheets API. Please check your internet connection."
                .to_owned()
        }
        error => format!("Failed to fetch sheets. {}", error),
    };
    ApiError::Failed {
        status,
        error: message,
        message: None,
        details: error.details().cloned(),
    }
}

pub async fn questions<S: TableSource>(
    State(state): State<AppState<S>>,
    sheet_name: Result<Path<String>, PathRejection>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let Path(sheet_name) = sheet_name?;
    let Query(query) = query?;
    let table_id = query
        .table_id()
        .ok_or_else(|| ApiError::bad_request(MISSING_TABLE_ID))?;
    tracing::info!(quiz = %sheet_name, table = %table_id, "fetching questions");

    if !state.registry.is_active(&sheet_name).await {
        return Err(ApiError::bad_request(QUIZ_NOT_ACTIVE));
    }

    let rows = state
        .source
        .read_range(&table_id, &quiz::quiz_range(&sheet_name))
        .await
        .map_err(|e| {
            tracing::error!(quiz = %sheet_name, table = %table_id, error = %e, "could not read quiz sheet");
            questions_failure(e)
        })?;
    tracing::debug!(rows = rows.len(), "read quiz sheet");

    let questions = prepare_questions(&rows, state.shuffle_passes)?;
    tracing::debug!(questions = questions.len(), "serving questions");
    Ok(Json(questions))
}

pub async fn sheets<S: TableSource>(
    State(state): State<AppState<S>>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> Result<Json<SheetsResponse>, ApiError> {
    let Query(query) = query?;
    let table_id = query
        .table_id()
        .ok_or_else(|| ApiError::bad_request(MISSING_TABLE_ID))?;
    tracing::info!(table = %table_id, "listing sheets");

    let listing = async {
        state.source.authorize().await?;
        state.source.sheet_names(&table_id).await
    };
    let sheets = listing.await.map_err(|e| {
        tracing::error!(table = %table_id, error = %e, "could not list sheets");
        sheets_failure(e)
    })?;

    if sheets.is_empty() {
        return Err(ApiError::Failed {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Failed to fetch sheets. No sheets found in spreadsheet".to_owned(),
            message: None,
            details: None,
        });
    }

    Ok(Json(SheetsResponse {
        sheets,
        active_quizzes: state.registry.list().await,
    }))
}

pub async fn activate<S: TableSource>(
    State(state): State<AppState<S>>,
    request: Result<Json<ActivateRequest>, JsonRejection>,
) -> Result<Json<ActivateResponse>, ApiError> {
    let Json(request) = request.map_err(|rejection| ApiError::Failed {
        status: StatusCode::BAD_REQUEST,
        error: MISSING_ACTIVATION_FIELDS.to_owned(),
        message: Some(rejection.body_text()),
        details: None,
    })?;
    let sheet_name = present(request.sheet_name);
    let table_id = resolve_table_id(request.spreadsheet_id.as_deref());
    let (sheet_name, table_id) = match (sheet_name, table_id) {
        (Some(sheet_name), Some(table_id)) => (sheet_name, table_id),
        _ => return Err(ApiError::bad_request(MISSING_ACTIVATION_FIELDS)),
    };

    let active_quizzes = state.registry.activate(&sheet_name).await?;
    Ok(Json(ActivateResponse {
        active_quizzes,
        quiz_url: quiz_url(&sheet_name, &table_id),
    }))
}

pub async fn deactivate<S: TableSource>(
    State(state): State<AppState<S>>,
    request: Result<Json<DeactivateRequest>, JsonRejection>,
) -> Result<Json<DeactivateResponse>, ApiError> {
    let Json(request) = request.map_err(|rejection| ApiError::Failed {
        status: StatusCode::BAD_REQUEST,
        error: MISSING_SHEET_NAME.to_owned(),
        message: Some(rejection.body_text()),
        details: None,
    })?;
    let sheet_name =
        present(request.sheet_name).ok_or_else(|| ApiError::bad_request(MISSING_SHEET_NAME))?;

    let active_quizzes = state.registry.deactivate(&sheet_name).await?;
    Ok(Json(DeactivateResponse { active_quizzes }))
}
