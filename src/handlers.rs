use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::{ConnectUserResponse, DebtProfile, InitiateSmsRequest, InitiateSmsResponse, VerifyOtpResponse};
use crate::spinwheel::SpinwheelClient;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for communicating with the Spinwheel API.
    pub spinwheel: SpinwheelClient,
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "spinwheel-debt-api",
            "version": "0.1.0"
        })),
    )
}

/// Rejects a missing or blank required field before anything leaves the boundary.
fn require_field(value: Option<String>, message: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(message.to_string())),
    }
}

/// Body for POST /api/connect.
///
/// Fields are optional at the serde level so a missing field surfaces as our
/// own 400 body instead of an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

/// POST /api/connect
///
/// Single-step connection for pre-verified numbers, an alternative to the
/// SMS OTP flow.
pub async fn connect_user(
    State(state): State<Arc<AppState>>,
    Json(params): Json<ConnectParams>,
) -> Result<Json<ConnectUserResponse>, AppError> {
    tracing::info!("POST /api/connect");

    let phone_number = require_field(params.phone_number, "Phone number is required")?;
    let method = params.method.unwrap_or_else(|| "sms".to_string());

    let result = state
        .spinwheel
        .connect_user(&phone_number, &method)
        .await
        .context("Failed to connect user")?;

    Ok(Json(result))
}

/// Body for POST /api/connect/initiate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateParams {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub ext_user_id: Option<String>,
}

/// POST /api/connect/initiate
///
/// Starts the SMS OTP flow. All three fields must be present and non-empty
/// before the provider is called.
pub async fn initiate_connection(
    State(state): State<Arc<AppState>>,
    Json(params): Json<InitiateParams>,
) -> Result<Json<InitiateSmsResponse>, AppError> {
    tracing::info!("POST /api/connect/initiate");

    const REQUIRED: &str = "Phone number, date of birth, and extUserId are required";
    let request = InitiateSmsRequest {
        phone_number: require_field(params.phone_number, REQUIRED)?,
        date_of_birth: require_field(params.date_of_birth, REQUIRED)?,
        ext_user_id: require_field(params.ext_user_id, REQUIRED)?,
    };

    let result = state
        .spinwheel
        .initiate_sms_connection(&request)
        .await
        .context("Failed to initiate SMS connection")?;

    Ok(Json(result))
}

/// Body for POST /api/connect/verify.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyParams {
    /// The provider user id returned by initiation.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// POST /api/connect/verify
///
/// Submits the OTP code for the pending connection. The response is proxied
/// as-is; resolving the dual-shape confirmed user id is the wizard's job.
pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(params): Json<VerifyParams>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    tracing::info!("POST /api/connect/verify");

    const REQUIRED: &str = "userId and OTP code are required";
    let user_id = require_field(params.user_id, REQUIRED)?;
    let code = require_field(params.code, REQUIRED)?;

    let result = state
        .spinwheel
        .verify_otp(&user_id, &code)
        .await
        .context("Failed to verify OTP")?;

    Ok(Json(result))
}

/// Query parameters for GET /api/debt-profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtProfileQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// GET /api/debt-profile?userId=...
///
/// Fetches the liabilities collection for a connected user. The provider's
/// liability ordering is passed through untouched.
pub async fn get_debt_profile(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DebtProfileQuery>,
) -> Result<Json<DebtProfile>, AppError> {
    tracing::info!("GET /api/debt-profile");

    let user_id = require_field(params.user_id, "userId is required")?;

    let profile = state
        .spinwheel
        .get_debt_profile(&user_id)
        .await
        .context("Failed to fetch debt profile")?;

    Ok(Json(profile))
}
