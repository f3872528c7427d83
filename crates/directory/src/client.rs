use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode, Url};

pub use crate::config::Config as DirectoryConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::schema::{AssignLicense, NewUser, UserPatch};
use crate::session::{Session, SessionClient, SessionToken};

struct Inner {
    config: DirectoryConfig,
    client: reqwest::Client,
    session: Session,
}

#[derive(Default)]
pub struct DirectoryBuilder {
    config: Option<DirectoryConfig>,
    token: Option<SessionToken>,
    http_client: Option<reqwest::Client>,
}

impl DirectoryBuilder {
    pub fn with_config(mut self, config: DirectoryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Seeds the session with a token so no login exchange happens.
    pub fn with_token(mut self, token: SessionToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn build(self) -> anyhow::Result<Directory> {
        let config = match self.config {
            Some(config) => config,
            None => DirectoryConfig::new()?,
        };
        let client = self.http_client.unwrap_or_default();
        let session_client = SessionClient::new(config.clone(), client.clone());
        let session = match self.token {
            Some(token) => Session::with_token(session_client, token),
            None => Session::new(session_client),
        };
        Ok(Directory {
            inner: Arc::new(Inner {
                config,
                client,
                session,
            }),
        })
    }
}

/// REST client for the users collection of one directory domain.
#[derive(Clone)]
pub struct Directory {
    inner: Arc<Inner>,
}

impl Directory {
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::default()
    }

    pub fn new() -> anyhow::Result<Self> {
        DirectoryBuilder::default().build()
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn principal_name(&self, username: &str) -> String {
        self.inner.config.principal_name(username)
    }

    /// Acquires the run's bearer token if it is not cached yet.
    pub async fn ensure_token(&self) -> DirectoryResult<Arc<str>> {
        self.inner.session.ensure_token().await
    }

    /// Each entry of `segments` becomes exactly one encoded path segment
    /// below `{api}/{domain}`.
    fn url(&self, segments: &[&str]) -> DirectoryResult<Url> {
        let config = &self.inner.config;
        let mut url = Url::parse(config.api_url())
            .map_err(|e| DirectoryError::InvalidUrl(format!("{}: {e}", config.api_url())))?;
        url.path_segments_mut()
            .map_err(|_| DirectoryError::InvalidUrl(config.api_url().to_string()))?
            .pop_if_empty()
            .push(config.domain())
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, segments: &[&str]) -> DirectoryResult<RequestBuilder> {
        let url = self.url(segments)?;
        let token = self.inner.session.ensure_token().await?;
        tracing::debug!("{method} {url}");
        Ok(self
            .inner
            .client
            .request(method, url)
            .bearer_auth(token)
            .query(&[("api-version", self.inner.config.api_version())]))
    }

    /// Looks a principal name up. Only a 200 counts as present; any other
    /// status or a failed request is reported as absent.
    pub async fn exists(&self, principal_name: &str) -> bool {
        let response: DirectoryResult<reqwest::Response> = match self
            .request(Method::GET, &["users", principal_name])
            .await
        {
            Ok(builder) => builder.send().await.map_err(Into::into),
            Err(err) => Err(err),
        };
        match response {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                tracing::info!(
                    "user {principal_name} does not exist in the directory ({})",
                    response.status()
                );
                false
            }
            Err(err) => {
                tracing::error!("problem searching for {principal_name} in the directory: {err}");
                false
            }
        }
    }

    pub async fn create_user(&self, user: &NewUser) -> DirectoryResult<StatusCode> {
        let response = self
            .request(Method::POST, &["users"])
            .await?
            .json(user)
            .send()
            .await?;
        Ok(response.status())
    }

    pub async fn assign_license(
        &self,
        principal_name: &str,
        license: &AssignLicense,
    ) -> DirectoryResult<StatusCode> {
        let response = self
            .request(Method::POST, &["users", principal_name, "assignLicense"])
            .await?
            .json(license)
            .send()
            .await?;
        Ok(response.status())
    }

    pub async fn patch_user(
        &self,
        principal_name: &str,
        patch: &UserPatch,
    ) -> DirectoryResult<StatusCode> {
        let response = self
            .request(Method::PATCH, &["users", principal_name])
            .await?
            .json(patch)
            .send()
            .await?;
        Ok(response.status())
    }

    pub async fn delete_user(&self, principal_name: &str) -> DirectoryResult<StatusCode> {
        let response = self
            .request(Method::DELETE, &["users", principal_name])
            .await?
            .send()
            .await?;
        Ok(response.status())
    }
}
