use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    ConnectUserResponse, DebtProfile, InitiateSmsRequest, InitiateSmsResponse, SpinwheelErrorBody,
    VerifyOtpResponse,
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Client for the Spinwheel API.
///
/// Spinwheel splits its endpoints across two hosts: the standard API host and
/// a "secure" host used for direct user creation. Both take the same bearer
/// key, and error payloads from both are normalized the same way.
#[derive(Clone)]
pub struct SpinwheelClient {
    client: reqwest::Client,
    base_url: String,
    secure_url: String,
    api_key: String,
}

impl SpinwheelClient {
    /// Creates a new `SpinwheelClient` from the application configuration.
    ///
    /// Construction always succeeds. A missing secret key only matters once a
    /// call reaches the provider, so it is logged here rather than rejected.
    pub fn new(config: &Config) -> Self {
        if config.spinwheel_secret_key.is_empty() {
            tracing::warn!("SPINWHEEL_SECRET_KEY is not set; provider calls will be rejected");
        }

        Self {
            client: reqwest::Client::new(),
            base_url: config.spinwheel_base_url.clone(),
            secure_url: config.spinwheel_secure_url.clone(),
            api_key: config.spinwheel_secret_key.clone(),
        }
    }

    /// Connects a user directly, without the SMS OTP flow.
    ///
    /// # Arguments
    ///
    /// * `phone_number` - Phone number in E.164 format.
    /// * `method` - Connection method, "sms" or "pre-verified".
    pub async fn connect_user(
        &self,
        phone_number: &str,
        method: &str,
    ) -> Result<ConnectUserResponse, AppError> {
        let url = format!("{}/v1/users", self.secure_url);
        tracing::info!("Connecting user via Spinwheel, method: {}", method);

        self.execute(self.authed(self.client.post(&url)).json(&json!({
            "phoneNumber": phone_number,
            "method": method,
        })))
        .await
    }

    /// Starts the two-step SMS connection flow.
    ///
    /// The returned `data.userId` must be carried into [`Self::verify_otp`].
    /// Calling this again issues a new code provider-side.
    pub async fn initiate_sms_connection(
        &self,
        request: &InitiateSmsRequest,
    ) -> Result<InitiateSmsResponse, AppError> {
        let url = format!("{}/v1/users/connect/sms/", self.base_url);
        tracing::info!(
            "Initiating SMS connection for extUserId {}",
            request.ext_user_id
        );

        self.execute(self.authed(self.client.post(&url)).json(request))
            .await
    }

    /// Verifies the OTP code the user received.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The id returned by initiation, not an externally-chosen id.
    /// * `code` - The caller-entered code.
    pub async fn verify_otp(
        &self,
        user_id: &str,
        code: &str,
    ) -> Result<VerifyOtpResponse, AppError> {
        let url = format!("{}/v1/users/{}/connect/sms/verify", self.base_url, user_id);
        tracing::info!("Verifying OTP for Spinwheel user {}", user_id);

        self.execute(self.authed(self.client.post(&url)).json(&json!({ "code": code })))
            .await
    }

    /// Fetches the aggregated debt profile for a connected user.
    pub async fn get_debt_profile(&self, user_id: &str) -> Result<DebtProfile, AppError> {
        let url = format!("{}/v1/users/{}/debt-profile", self.base_url, user_id);
        tracing::info!("Fetching debt profile for Spinwheel user {}", user_id);

        self.execute(self.authed(self.client.get(&url))).await
    }

    /// Applies the shared header discipline: bearer auth and JSON content
    /// type, identical for both hosts.
    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    /// Sends one request and unwraps the JSON response.
    ///
    /// Single attempt per call: no retries, no timeout beyond the transport
    /// default. Non-2xx responses are normalized into a single message via
    /// [`SpinwheelErrorBody::normalized_message`]; an unparseable error body
    /// gets a synthesized `HTTP <status>: <reason>` message.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Spinwheel request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body: SpinwheelErrorBody =
                response.json().await.unwrap_or_else(|_| SpinwheelErrorBody {
                    error: Some("Unknown error".to_string()),
                    message: Some(format!(
                        "HTTP {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    )),
                    status: None,
                });
            return Err(AppError::Provider(body.normalized_message()));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::InvalidResponse(format!("Failed to parse Spinwheel response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            port: 3000,
            spinwheel_secret_key: "test_key".to_string(),
            spinwheel_base_url: "https://sandbox-api.spinwheel.io".to_string(),
            spinwheel_secure_url: "https://secure-sandbox-api.spinwheel.io".to_string(),
        }
    }

    #[test]
    fn client_construction_with_key() {
        let client = SpinwheelClient::new(&test_config());
        assert_eq!(client.base_url, "https://sandbox-api.spinwheel.io");
        assert_eq!(client.secure_url, "https://secure-sandbox-api.spinwheel.io");
    }

    #[test]
    fn client_construction_without_key_does_not_fail() {
        let mut config = test_config();
        config.spinwheel_secret_key = String::new();
        let client = SpinwheelClient::new(&config);
        assert!(client.api_key.is_empty());
    }
}
