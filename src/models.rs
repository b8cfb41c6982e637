use serde::{Deserialize, Serialize};

// ============ Connection Models ============

/// Request body for the direct (single-step) user connection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectUserRequest {
    /// Phone number in E.164 format.
    pub phone_number: String,
    /// Connection method: "sms" or "pre-verified".
    pub method: String,
}

/// Response from the direct user connection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectUserResponse {
    /// Spinwheel-assigned user identifier.
    pub user_id: String,
    /// Connection status.
    pub status: String,
}

/// Request body for initiating the SMS OTP connection flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateSmsRequest {
    /// Phone number in E.164 format.
    pub phone_number: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub date_of_birth: String,
    /// Caller-chosen identifier correlating the connection to our own user record.
    pub ext_user_id: String,
}

/// Status block carried by Spinwheel envelope responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub code: i64,
    pub desc: String,
}

/// Expiry window for the SMS code issued at initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsCodeWindow {
    /// Epoch timestamp after which the code is no longer valid.
    pub code_expires_at: i64,
    pub code_timeout_seconds: i64,
}

/// Connection details returned by a successful initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    /// Spinwheel user id. Required for the verification and debt-profile calls.
    pub user_id: String,
    pub ext_user_id: String,
    pub connection_id: String,
    /// Enum-like string, e.g. "pending".
    pub connection_status: String,
    pub sms: SmsCodeWindow,
}

/// Response from initiating the SMS connection flow.
///
/// Re-initiating is not idempotent: each call issues a new code provider-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiateSmsResponse {
    pub status: ResponseStatus,
    pub data: ConnectionData,
}

/// Nested confirmation data in a verification response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpData {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<String>,
}

/// Response from OTP verification.
///
/// Spinwheel has been observed returning two shapes here: the documented
/// envelope with a nested `data.userId`, and a bare top-level `userId`. Both
/// are accepted; see [`VerifyOtpResponse::confirmed_user_id`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<VerifyOtpData>,
    /// Fallback shape: user id at the top level instead of under `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl VerifyOtpResponse {
    /// The confirmed user id: `data.userId` if present, else top-level `userId`.
    ///
    /// `None` means the provider confirmed the connection without telling us
    /// who was connected, which callers must treat as a shape error.
    pub fn confirmed_user_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.user_id.as_str())
            .or(self.user_id.as_deref())
    }
}

// ============ Debt Profile Models ============

/// A single debt account record (credit card, loan, etc.).
///
/// Not every liability type reports every field, so the financial fields are
/// all optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    /// Unique within a profile.
    pub id: String,
    pub account_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    pub account_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_payment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl Liability {
    /// Account number masked for display: `****` plus the last 4 characters.
    pub fn masked_account_number(&self) -> Option<String> {
        self.account_number.as_ref().map(|number| {
            let chars: Vec<char> = number.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
            format!("****{}", tail)
        })
    }
}

/// A user's aggregated debt liabilities.
///
/// `liabilities` keeps the provider's ordering; it is never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtProfile {
    pub user_id: String,
    pub liabilities: Vec<Liability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

// ============ Provider Error Models ============

/// One entry of `status.messages[]` in a Spinwheel error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpinwheelErrorMessage {
    #[serde(default)]
    pub desc: Option<String>,
}

/// Status block of a Spinwheel error body. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpinwheelErrorStatus {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<SpinwheelErrorMessage>>,
}

/// Error payload returned by Spinwheel on non-2xx responses.
///
/// The provider is loose about which fields it populates, so this is an
/// explicit all-optional structure with one normalization routine instead of
/// field probing scattered across call sites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpinwheelErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<SpinwheelErrorStatus>,
}

impl SpinwheelErrorBody {
    /// Selects a single human-readable message from the error payload.
    ///
    /// Tried in order: first `status.messages[].desc`, then `status.desc`,
    /// then `message`, then `error`, then a literal fallback.
    pub fn normalized_message(&self) -> String {
        self.status
            .as_ref()
            .and_then(|s| s.messages.as_ref())
            .and_then(|msgs| msgs.first())
            .and_then(|m| m.desc.clone())
            .or_else(|| self.status.as_ref().and_then(|s| s.desc.clone()))
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "API request failed".to_string())
    }
}
