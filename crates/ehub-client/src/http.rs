// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP transport to the ElectricianHub API.

use async_trait::async_trait;
use ehub_core::RefreshOutcome;
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use parking_lot::RwLock;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};
use crate::identity::Identity;
use crate::provider::{ClaimsRefresher, TokenProvider};

const TOKEN_PATH: &str = "/api/v1/auth/token";
const REFRESH_PATH: &str = "/api/v1/functions/refreshUserToken";

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct MintedTokenBody {
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    kind: String,
    message: String,
}

// =============================================================================
// HubClient
// =============================================================================

/// Client for the ElectricianHub API.
///
/// Holds the session's current ID token and attaches it as a bearer token.
/// Tokens are decoded locally without signature verification: the payload
/// is only a display hint and the server re-verifies every call.
pub struct HubClient {
    http: reqwest::Client,
    base_url: String,
    id_token: RwLock<Option<String>>,
}

impl HubClient {
    /// Creates a client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http_client(http, base_url))
    }

    /// Creates a client reusing an existing `reqwest` client.
    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            id_token: RwLock::new(None),
        }
    }

    /// Sets the session's ID token.
    pub fn with_id_token(self, token: impl Into<String>) -> Self {
        self.set_id_token(Some(token.into()));
        self
    }

    /// Replaces the session's ID token. `None` clears it on sign-out.
    pub fn set_id_token(&self, token: Option<String>) {
        *self.id_token.write() = token;
    }

    /// Returns the session's ID token.
    pub fn id_token(&self) -> Option<String> {
        self.id_token.read().clone()
    }

    /// Obtains a freshly minted ID token and stores it.
    pub async fn mint_token(&self) -> ClientResult<String> {
        let body: MintedTokenBody = self.post(TOKEN_PATH).await?;
        self.set_id_token(Some(body.id_token.clone()));
        tracing::debug!("Obtained a new ID token");
        Ok(body.id_token)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let token = self.id_token().ok_or(ClientError::NotSignedIn)?;
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::decode(format!("Unexpected response body: {}", e)));
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => Err(ClientError::callable(
                status.as_u16(),
                body.error.kind,
                body.error.message,
            )),
            Err(_) => Err(ClientError::callable(
                status.as_u16(),
                "unknown",
                status.canonical_reason().unwrap_or("Request failed"),
            )),
        }
    }
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.id_token.read().is_some())
            .finish()
    }
}

#[async_trait]
impl TokenProvider for HubClient {
    async fn fetch_claims(
        &self,
        identity: &Identity,
        force_refresh: bool,
    ) -> ClientResult<serde_json::Value> {
        let token = match (force_refresh, self.id_token()) {
            (false, Some(token)) => token,
            _ => self.mint_token().await?,
        };

        let payload = decode_payload(&token)?;
        let subject = payload.get("sub").and_then(serde_json::Value::as_str);
        if subject != Some(identity.uid.as_str()) {
            return Err(ClientError::decode("ID token belongs to a different identity"));
        }
        Ok(payload)
    }
}

#[async_trait]
impl ClaimsRefresher for HubClient {
    async fn refresh_user_token(&self) -> ClientResult<RefreshOutcome> {
        self.post(REFRESH_PATH).await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Decodes an ID token payload without verifying it.
pub fn decode_payload(token: &str) -> ClientResult<serde_json::Value> {
    let header = decode_header(token)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<serde_json::Value>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}
