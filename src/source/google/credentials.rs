use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::source::SourceError;

pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: u64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

/// The parts of a service account key file needed for the JWT bearer flow.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| SourceError::Credentials(e.to_string()))?;
        if key.client_email.is_empty() || key.private_key.is_empty() {
            return Err(SourceError::Credentials(
                "client_email and private_key are required".to_owned(),
            ));
        }
        Ok(key)
    }

    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let json = fs::read_to_string(path).map_err(|e| {
            SourceError::Credentials(format!("could not read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Signed assertion exchanged at `token_uri` for an access token.
    pub fn assertion(&self, issued_at: u64) -> Result<String, SourceError> {
        let claims = Claims {
            iss: &self.client_email,
            scope: READONLY_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| SourceError::Credentials(e.to_string()))?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| SourceError::Credentials(e.to_string()))
    }
}
