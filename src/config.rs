use serde::Deserialize;

/// Sandbox host for the standard Spinwheel API.
pub const DEFAULT_BASE_URL: &str = "https://sandbox-api.spinwheel.io";
/// Sandbox host for the secure Spinwheel API (direct user creation).
pub const DEFAULT_SECURE_URL: &str = "https://secure-sandbox-api.spinwheel.io";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// May be empty; the client warns at construction and the provider
    /// rejects the first unauthenticated call.
    pub spinwheel_secret_key: String,
    pub spinwheel_base_url: String,
    pub spinwheel_secure_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            spinwheel_secret_key: std::env::var("SPINWHEEL_SECRET_KEY").unwrap_or_default(),
            spinwheel_base_url: base_url_from_env("SPINWHEEL_BASE_URL", DEFAULT_BASE_URL)?,
            spinwheel_secure_url: base_url_from_env("SPINWHEEL_SECURE_URL", DEFAULT_SECURE_URL)?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Spinwheel Base URL: {}", config.spinwheel_base_url);
        tracing::debug!("Spinwheel Secure URL: {}", config.spinwheel_secure_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Reads a base URL from the environment, falling back to the sandbox default
/// when the variable is unset or blank.
fn base_url_from_env(var: &str, default: &str) -> anyhow::Result<String> {
    match std::env::var(var) {
        Ok(url) if !url.trim().is_empty() => {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", var);
            }
            Ok(url)
        }
        _ => Ok(default.to_string()),
    }
}
