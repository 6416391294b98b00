//! OAuth access tokens for a service account (JWT bearer grant).

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::credentials::ServiceAccountKey;
use crate::error::{Result, SheetError};

/// Read-only access to spreadsheets.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion (the maximum Google allows).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Exchanges signed assertions for access tokens and caches them.
pub struct TokenProvider {
    key: ServiceAccountKey,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            cache: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// A valid access token, fetched on first use and when the cached one
    /// is about to expire.
    pub fn access_token(&self, client: &Client) -> Result<String> {
        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.as_ref()
                && Instant::now() + EXPIRY_MARGIN < cached.expires_at
            {
                return Ok(cached.token.clone());
            }
        }

        debug!(client_email = %self.key.client_email, "requesting access token");
        let assertion = self.sign_assertion(chrono::Utc::now().timestamp())?;
        let body = form_body(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])?;
        let response = client
            .post(self.key.token_uri.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(SheetError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let token: TokenResponse = response.json()?;

        let lifetime = Duration::from_secs(
            token
                .expires_in
                .unwrap_or(ASSERTION_LIFETIME_SECS as u64),
        );
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(CachedToken {
            token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    fn sign_assertion(&self, now: i64) -> Result<String> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_READONLY_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }
}

/// `application/x-www-form-urlencoded` body for `pairs`.
fn form_body(pairs: &[(&str, &str)]) -> Result<String> {
    let mut url = Url::parse("http://localhost/").map_err(|err| SheetError::Url(err.to_string()))?;
    url.query_pairs_mut().extend_pairs(pairs);
    Ok(url.query().unwrap_or_default().to_string())
}
