//! OAuth2 authorization code flow against the Spotify accounts service.
//!
//! # Responsibilities
//! - Build the authorization URL the user is redirected to
//! - Exchange the callback code for an access token
//! - Refresh the access token when it expires
//!
//! # Security Constraints
//! - `state` is random per process and checked on every callback
//! - Client secret never logged

use arc_swap::ArcSwapOption;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;

use crate::config::SpotifyConfig;
use crate::spotify::error::{SpotifyError, SpotifyResult};
use crate::spotify::types::{Token, TokenPayload};

const STATE_LEN: usize = 32;

/// Holds the OAuth configuration and the current access token.
pub struct Authenticator {
    config: SpotifyConfig,
    state: String,
    token: ArcSwapOption<Token>,
    http: reqwest::Client,
}

impl Authenticator {
    /// Create an authenticator. Fails when credentials are missing.
    pub fn new(config: SpotifyConfig, http: reqwest::Client) -> SpotifyResult<Self> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(SpotifyError::MissingConfig);
        }

        Ok(Self {
            config,
            state: generate_state(),
            token: ArcSwapOption::empty(),
            http,
        })
    }

    /// URL to redirect users to for authorization.
    pub fn auth_url(&self) -> SpotifyResult<String> {
        let scope = self.config.scopes.join(" ");
        let url = url::Url::parse_with_params(
            &format!("{}/authorize", self.config.accounts_url.trim_end_matches('/')),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", scope.as_str()),
                ("state", self.state.as_str()),
            ],
        )
        .map_err(|e| SpotifyError::InvalidResponse(format!("bad accounts URL: {}", e)))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for a token and store it.
    pub async fn exchange(&self, state: &str, code: &str) -> SpotifyResult<Arc<Token>> {
        if state != self.state {
            tracing::warn!("OAuth callback with unexpected state");
            return Err(SpotifyError::InvalidState);
        }

        let payload = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .await?;

        let token = Arc::new(Token::from_payload(payload, None));
        self.token.store(Some(token.clone()));
        tracing::info!(expires_in = token.expires_in(), "Spotify access token obtained");
        Ok(token)
    }

    /// Refresh the stored token using its refresh token.
    pub async fn refresh(&self) -> SpotifyResult<Arc<Token>> {
        let refresh_token = self
            .token()
            .and_then(|t| t.refresh_token.clone())
            .ok_or(SpotifyError::NoToken)?;

        let payload = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .await?;

        let token = Arc::new(Token::from_payload(payload, Some(refresh_token)));
        self.token.store(Some(token.clone()));
        tracing::info!(expires_in = token.expires_in(), "Spotify access token refreshed");
        Ok(token)
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<Arc<Token>> {
        self.token.load_full()
    }

    pub fn set_token(&self, token: Token) {
        self.token.store(Some(Arc::new(token)));
    }

    /// The `state` value expected on the callback.
    pub fn state(&self) -> &str {
        &self.state
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> SpotifyResult<TokenPayload> {
        let url = format!("{}/api/token", self.config.accounts_url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Token endpoint rejected request");
            return Err(SpotifyError::TokenExchange(format!("{}: {}", status, body)));
        }

        response
            .json::<TokenPayload>()
            .await
            .map_err(|e| SpotifyError::TokenExchange(e.to_string()))
    }
}

fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}
