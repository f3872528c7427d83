use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{DirectoryError, DirectoryResult};

#[derive(Debug, serde::Deserialize)]
struct ParsedAccessToken {
    exp: Option<i64>,
    appid: Option<String>,
    tid: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: Option<Arc<str>>,
    token_type: Option<String>,
}

/// Bearer token issued by the login service.
#[derive(Clone, Debug)]
pub struct SessionToken {
    access_token: Arc<str>,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Arc::from(access_token.into()),
            expires_at: None,
        }
    }

    fn parse_access_token(mut token: Self) -> Self {
        use base64::engine::{general_purpose::URL_SAFE_NO_PAD, Engine};
        if let Some(parsed) = token
            .access_token
            .split('.')
            .nth(1)
            .and_then(|s| {
                URL_SAFE_NO_PAD
                    .decode(s.trim_end_matches('='))
                    .map_err(|e| {
                        tracing::debug!("access token payload is not base64: {e}");
                        e
                    })
                    .ok()
            })
            .and_then(|b| {
                serde_json::from_slice::<ParsedAccessToken>(&b)
                    .map_err(|e| {
                        tracing::debug!("access token payload is not json: {e}");
                        e
                    })
                    .ok()
            })
        {
            tracing::debug!(
                app_id = parsed.appid.as_deref().unwrap_or_default(),
                tenant_id = parsed.tid.as_deref().unwrap_or_default(),
                "access token claims decoded"
            );
            token.expires_at = parsed.exp.and_then(|exp| DateTime::from_timestamp(exp, 0));
        }
        token
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Expiry taken from the `exp` claim, when the token is a readable JWT.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

struct SessionClientInner {
    config: Config,
    client: reqwest::Client,
}

/// Performs the client-credentials exchange against the login service.
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<SessionClientInner>,
}

impl SessionClient {
    pub fn new(config: Config, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(SessionClientInner { config, client }),
        }
    }

    async fn acquire(&self) -> DirectoryResult<SessionToken> {
        let config = &self.inner.config;
        let url = format!("{}/{}/oauth2/token", config.login_url(), config.domain());
        let resource = config.resource();
        let response = self
            .inner
            .client
            .post(&url)
            .query(&[("api-version", config.api_version())])
            .form(&[
                ("redirect_uri", config.redirect_uri()),
                ("grant_type", "client_credentials"),
                ("client_id", config.client_id()),
                ("client_secret", config.client_secret()),
                ("resource", resource.as_ref()),
            ])
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(DirectoryError::HttpFailure {
                status: status.as_u16(),
                text,
            });
        }
        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            token_type = token.token_type.as_deref().unwrap_or("Bearer"),
            "login service issued a token"
        );
        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(|access_token| {
                SessionToken::parse_access_token(SessionToken {
                    access_token,
                    expires_at: None,
                })
            })
            .ok_or(DirectoryError::MissingAccessToken)
    }
}

/// Auth context for one run.
///
/// The token is acquired on first use and kept until the session is dropped.
/// A failed acquisition leaves the session empty so the next caller tries again.
pub struct Session {
    client: SessionClient,
    token: RwLock<Option<SessionToken>>,
}

impl Session {
    pub fn new(client: SessionClient) -> Self {
        Self {
            client,
            token: RwLock::new(None),
        }
    }

    /// Session that starts with an already issued token.
    pub fn with_token(client: SessionClient, token: SessionToken) -> Self {
        Self {
            client,
            token: RwLock::new(Some(token)),
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Returns the cached bearer token, acquiring one first if none is cached.
    pub async fn ensure_token(&self) -> DirectoryResult<Arc<str>> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.access_token.clone());
        }
        let mut cache = self.token.write().await;
        if let Some(token) = cache.as_ref() {
            return Ok(token.access_token.clone());
        }
        match self.client.acquire().await {
            Ok(token) => {
                match token.expires_at() {
                    Some(expires_at) => {
                        tracing::info!("authenticated to login service, token valid until {expires_at}")
                    }
                    None => tracing::info!("authenticated to login service"),
                }
                let access_token = token.access_token.clone();
                *cache = Some(token);
                Ok(access_token)
            }
            Err(err) => {
                tracing::error!("unable to authenticate to login service: {err}");
                Err(err)
            }
        }
    }
}
