use std::borrow::Cow;
use std::sync::Arc;

#[derive(Default)]
pub struct ConfigBuilder<'a> {
    prefix: Option<&'a str>,
}

impl<'a> ConfigBuilder<'a> {
    pub fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn build(self) -> envy::Result<Config> {
        let mut cfg: Config = if let Some(prefix) = self.prefix {
            envy::prefixed(prefix)
        } else {
            envy::prefixed("DIRECTORY_")
        }
        .from_env()?;
        if cfg.api_version.is_none() {
            cfg.api_version = Some("1.6".into());
        }
        if cfg.login_url.is_none() {
            cfg.login_url = Some("https://login.windows.net".into());
        }
        if cfg.api_url.is_none() {
            cfg.api_url = Some("https://graph.windows.net".into());
        }
        if cfg.redirect_uri.is_none() {
            cfg.redirect_uri = Some("http://127.0.0.1:8000".into());
        }
        if cfg.usage_location.is_none() {
            cfg.usage_location = Some("US".into());
        }
        Ok(cfg)
    }
}

/// Connection settings for the directory service and its login endpoint.
#[derive(Clone, serde::Deserialize)]
pub struct Config {
    client_id: Arc<str>,
    client_secret: Arc<str>,
    domain: Arc<str>,
    api_version: Option<Arc<str>>,
    login_url: Option<Arc<str>>,
    api_url: Option<Arc<str>>,
    resource: Option<Arc<str>>,
    redirect_uri: Option<Arc<str>>,
    usage_location: Option<Arc<str>>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("domain", &self.domain)
            .field("api_version", &self.api_version())
            .field("login_url", &self.login_url())
            .field("api_url", &self.api_url())
            .finish()
    }
}

impl Config {
    pub fn new() -> envy::Result<Self> {
        ConfigBuilder::default().build()
    }

    pub fn builder<'a>() -> ConfigBuilder<'a> {
        ConfigBuilder::default()
    }

    /// Config with explicit credentials and built-in defaults for everything else.
    pub fn with_credentials<T>(client_id: T, client_secret: T, domain: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            client_id: Arc::from(client_id.into()),
            client_secret: Arc::from(client_secret.into()),
            domain: Arc::from(domain.into()),
            api_version: None,
            login_url: None,
            api_url: None,
            resource: None,
            redirect_uri: None,
            usage_location: None,
        }
    }

    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = Some(Arc::from(login_url.into()));
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(Arc::from(api_url.into()));
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or("1.6")
    }

    pub fn login_url(&self) -> &str {
        self.login_url
            .as_deref()
            .unwrap_or("https://login.windows.net")
            .trim_end_matches('/')
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or("https://graph.windows.net")
            .trim_end_matches('/')
    }

    /// Resource requested at login; follows the api url unless set.
    pub fn resource(&self) -> Cow<'_, str> {
        match self.resource.as_deref() {
            Some(resource) => Cow::Borrowed(resource),
            None => Cow::Owned(format!("{}/", self.api_url())),
        }
    }

    pub fn redirect_uri(&self) -> &str {
        self.redirect_uri
            .as_deref()
            .unwrap_or("http://127.0.0.1:8000")
    }

    pub fn usage_location(&self) -> &str {
        self.usage_location.as_deref().unwrap_or("US")
    }

    /// Builds the `username@domain` principal name used as the directory key.
    pub fn principal_name(&self, username: &str) -> String {
        format!("{username}@{}", self.domain)
    }
}
