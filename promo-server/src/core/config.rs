/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP service port |
/// | PLATFORM_API_URL | http://localhost:4000 | Commerce platform admin API |
/// | PLATFORM_API_TOKEN | (empty) | Admin API access token |
/// | SHOP_DOMAIN | dev-shop.example | Shop the server operates on |
/// | FALLBACK_CURRENCY | EUR | Currency when no price resolves |
/// | ENVIRONMENT | development | Runtime environment |
/// | REQUEST_TIMEOUT_MS | 30000 | Outbound request timeout (ms) |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 SHOP_DOMAIN=myshop.example cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API service port
    pub http_port: u16,
    /// Base URL of the commerce platform admin API
    pub platform_api_url: String,
    /// Access token for the admin API
    pub platform_api_token: String,
    /// Shop domain used for settings documents
    pub shop_domain: String,
    /// Currency reported when no item price resolves
    pub fallback_currency: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Outbound request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            platform_api_url: std::env::var("PLATFORM_API_URL")
                .unwrap_or_else(|_| "http://localhost:4000".into()),
            platform_api_token: std::env::var("PLATFORM_API_TOKEN").unwrap_or_default(),
            shop_domain: std::env::var("SHOP_DOMAIN")
                .unwrap_or_else(|_| "dev-shop.example".into()),
            fallback_currency: std::env::var("FALLBACK_CURRENCY")
                .unwrap_or_else(|_| "EUR".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// Override selected settings
    ///
    /// Mainly for tests
    pub fn with_overrides(platform_api_url: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.platform_api_url = platform_api_url.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
