//! The OAuth code→token exchange proxy.
//!
//! The server holds no sessions; it trades the caller's authorization code
//! for the provider's access token and relays the provider's JSON verbatim.
//! A provider rejection is relayed as its exact status with a generic error
//! body, never the provider's own.

use axum::{
  extract::State,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use catedra_core::store::CatalogStore;
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── Client ───────────────────────────────────────────────────────────────────

/// Credentials and endpoint for the external identity provider.
#[derive(Clone)]
pub struct OAuthConfig {
  pub client_id:     String,
  pub client_secret: String,
  pub token_url:     String,
}

/// Server-to-server client for the provider's token endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OAuthClient {
  http:   reqwest::Client,
  config: OAuthConfig,
}

/// A provider response worth relaying: the token JSON, or the provider's
/// rejection status.
pub enum ExchangeOutcome {
  Token(Bytes),
  Rejected(StatusCode),
}

impl OAuthClient {
  pub fn new(config: OAuthConfig) -> Self {
    // No explicit timeout and no retries: the exchange inherits the
    // client's defaults and fails through to the caller.
    Self { http: reqwest::Client::new(), config }
  }

  /// Trade an authorization code for the provider's token response.
  ///
  /// Transport-level failures come back as [`ApiError::Exchange`] carrying
  /// the failure's text.
  pub async fn exchange(
    &self,
    code: &str,
    redirect_uri: &str,
  ) -> Result<ExchangeOutcome, ApiError> {
    let params = [
      ("client_id", self.config.client_id.as_str()),
      ("client_secret", self.config.client_secret.as_str()),
      ("code", code),
      ("redirect_uri", redirect_uri),
    ];

    let resp = self
      .http
      .post(&self.config.token_url)
      .header(header::ACCEPT, "application/json")
      .form(&params)
      .send()
      .await
      .map_err(|e| ApiError::Exchange(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
      tracing::warn!(%status, "provider rejected the code exchange");
      return Ok(ExchangeOutcome::Rejected(
        StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
      ));
    }

    let body = resp
      .bytes()
      .await
      .map_err(|e| ApiError::Exchange(e.to_string()))?;
    Ok(ExchangeOutcome::Token(body))
  }
}

// ─── Handler ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ExchangeBody {
  code:         Option<String>,
  redirect_uri: Option<String>,
}

/// `POST /exchange-code` — body: `{"code": "...", "redirect_uri": "..."}`.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<Response, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let payload: ExchangeBody = serde_json::from_slice(&body)
    .map_err(|_| ApiError::BadRequest("missing or malformed JSON payload".to_owned()))?;
  let code = payload
    .code
    .ok_or_else(|| ApiError::BadRequest("missing field: code".to_owned()))?;
  // redirect_uri is deliberately not validated here; a bad or absent value
  // comes back through the provider's own rejection.
  let redirect_uri = payload.redirect_uri.unwrap_or_default();

  match state.oauth.exchange(&code, &redirect_uri).await? {
    ExchangeOutcome::Token(body) => Ok(
      (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
      )
        .into_response(),
    ),
    ExchangeOutcome::Rejected(status) => Err(ApiError::Upstream(status)),
  }
}
