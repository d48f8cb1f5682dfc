use parking_lot::RwLock;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use url::Url;

use crate::source::{Row, SheetRange, SourceError, TableSource};

pub mod credentials;


pub use credentials::ServiceAccountKey;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets/";
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

/// Google Sheets v4, read through a service account.
pub struct GoogleSheets {
    http: reqwest::Client,
    key: ServiceAccountKey,
    api_base: Url,
    token: RwLock<Option<AccessToken>>,
}

impl GoogleSheets {
    pub fn new(key: ServiceAccountKey) -> Result<Self, SourceError> {
        let api_base = Url::parse(SHEETS_API).map_err(SourceError::unreachable)?;
        Self::with_api_base(key, api_base)
    }

    fn with_api_base(key: ServiceAccountKey, api_base: Url) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sheet-quiz/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SourceError::unreachable)?;
        Ok(GoogleSheets {
            http,
            key,
            api_base,
            token: RwLock::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, SourceError> {
        let cached = self
            .token
            .read()
            .as_ref()
            .filter(|token| token.is_fresh())
            .map(|token| token.value.clone());
        match cached {
            Some(token) => Ok(token),
            None => self.refresh_token().await,
        }
    }

    async fn refresh_token(&self) -> Result<String, SourceError> {
        let issued_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SourceError::Credentials(e.to_string()))?
            .as_secs();
        let assertion = self.key.assertion(issued_at)?;

        tracing::debug!(identity = %self.key.client_email, "requesting access token");
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(SourceError::unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Credentials(format!(
                "token endpoint answered {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(SourceError::unreachable)?;
        let value = token.access_token.clone();
        *self.token.write() = Some(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    fn spreadsheet_url(&self, table_id: &str, tail: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::unreachable("invalid Sheets API base URL"))?
            .pop_if_empty()
            .push(table_id)
            .extend(tail);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(SourceError::unreachable)?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(SourceError::unreachable);
        }

        let details = response.json::<Value>().await.ok();
        Err(classify_failure(status, details, &self.key.client_email))
    }
}

/// Maps a failed Sheets API call onto the source error taxonomy.
fn classify_failure(status: StatusCode, details: Option<Value>, identity: &str) -> SourceError {
    let message = details
        .as_ref()
        .and_then(|d| d.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SourceError::AccessDenied {
            identity: identity.to_owned(),
            details,
        },
        StatusCode::BAD_REQUEST if message.contains("Unable to parse range") => {
            SourceError::NotFound { message, details }
        }
        _ => SourceError::Unavailable {
            message,
            status: Some(status.as_u16()),
            details,
        },
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl TableSource for GoogleSheets {
    fn identity(&self) -> String {
        self.key.client_email.clone()
    }

    async fn authorize(&self) -> Result<(), SourceError> {
        self.refresh_token().await.map(|_| ())
    }

    async fn read_range(&self, table_id: &str, range: &SheetRange) -> Result<Vec<Row>, SourceError> {
        let a1_range = range.to_string();
        let url = self.spreadsheet_url(table_id, &["values", a1_range.as_str()])?;
        tracing::debug!(table_id, range = %a1_range, "reading range");
        let value_range: ValueRange = self.get_json(url).await?;
        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn sheet_names(&self, table_id: &str) -> Result<Vec<String>, SourceError> {
        let mut url = self.spreadsheet_url(table_id, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let spreadsheet: Spreadsheet = self.get_json(url).await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }
}
