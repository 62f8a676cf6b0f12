use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// JupyterHub endpoint configuration.
    pub hub: HubConfig,
}

/// Where the JupyterHub deployment lives and how to authenticate to it.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Base URL of the hub's administrative API, e.g. `http://hub:8000`.
    pub api_url: String,
    /// Service-level API token with admin scope.
    pub api_token: String,
    /// Public-facing hub URL used in browser redirects. Defaults to
    /// `api_url` when `JUPYTERHUB_PUBLIC_URL` is unset.
    pub public_url: String,
}

impl HubConfig {
    /// Load hub configuration from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if `JUPYTERHUB_API_URL` or `JUPYTERHUB_API_TOKEN` is not set.
    pub fn from_env() -> Self {
        let api_url = std::env::var("JUPYTERHUB_API_URL")
            .expect("JUPYTERHUB_API_URL must be set in the environment");
        let api_token = std::env::var("JUPYTERHUB_API_TOKEN")
            .expect("JUPYTERHUB_API_TOKEN must be set in the environment");
        let public_url =
            std::env::var("JUPYTERHUB_PUBLIC_URL").unwrap_or_else(|_| api_url.clone());

        Self {
            api_url,
            api_token,
            public_url,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            hub: HubConfig::from_env(),
        }
    }
}
