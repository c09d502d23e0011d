use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::spreadsheet::SpreadsheetError;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are renewed this long before the issuer's expiry.
const REFRESH_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".into()
}

/// The subset of a Google service-account key file needed for token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// # Errors
    ///
    /// Returns `SpreadsheetError::Credentials` if the file is missing or malformed.
    pub fn from_file(path: &Path) -> Result<Self, SpreadsheetError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpreadsheetError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns `SpreadsheetError::Credentials` if `json` is not a service-account key.
    pub fn from_json(json: &str) -> Result<Self, SpreadsheetError> {
        serde_json::from_str(json)
            .map_err(|e| SpreadsheetError::Credentials(format!("invalid key file: {e}")))
    }
}

/// JWT claim set for the OAuth2 JWT-bearer grant.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn new(key: &ServiceAccountKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Signs the claim set with the key's RSA private key (RS256).
///
/// # Errors
///
/// Returns `SpreadsheetError::Credentials` if the private key is not valid PEM,
/// or `SpreadsheetError::Auth` if signing fails.
pub fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, SpreadsheetError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| SpreadsheetError::Credentials(format!("invalid private key: {e}")))?;
    jsonwebtoken::encode(
        &Header::new(Algorithm::RS256),
        &Claims::new(key, now),
        &encoding_key,
    )
    .map_err(|e| SpreadsheetError::Auth(format!("cannot sign assertion: {e}")))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges a service-account key for OAuth2 access tokens and caches them
/// until shortly before expiry.
///
/// The key file is read on first use, not at construction.
pub struct TokenProvider {
    credentials_path: PathBuf,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    #[must_use]
    pub const fn new(credentials_path: PathBuf, client: reqwest::Client) -> Self {
        Self {
            credentials_path,
            client,
            cached: Mutex::new(None),
        }
    }

    fn cached_token(&self, now: DateTime<Utc>) -> Option<String> {
        let guard = self.cached.lock().ok()?;
        guard
            .as_ref()
            .filter(|t| t.expires_at > now)
            .map(|t| t.value.clone())
    }

    fn store(&self, token: CachedToken) {
        if let Ok(mut guard) = self.cached.lock() {
            *guard = Some(token);
        }
    }

    /// Returns a valid access token, fetching a new one when none is cached.
    ///
    /// # Errors
    ///
    /// Returns `SpreadsheetError::Credentials` when the key file is unusable and
    /// `SpreadsheetError::Auth` when the token endpoint refuses the assertion.
    pub async fn access_token(&self) -> Result<String, SpreadsheetError> {
        let now = Utc::now();
        if let Some(token) = self.cached_token(now) {
            return Ok(token);
        }

        let key = ServiceAccountKey::from_file(&self.credentials_path)?;
        let assertion = sign_assertion(&key, now)?;

        let resp = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| SpreadsheetError::Auth(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SpreadsheetError::Auth(format!(
                "token endpoint returned HTTP {status}: {}",
                body.trim()
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| SpreadsheetError::Auth(format!("invalid token response: {e}")))?;
        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        let expires_at = now + TimeDelta::seconds(lifetime - REFRESH_MARGIN_SECS);
        debug!("obtained access token for {}, valid until {expires_at}", key.client_email);

        self.store(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });
        Ok(token.access_token)
    }
}
