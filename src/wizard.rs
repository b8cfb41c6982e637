use crate::errors::AppError;
use crate::models::{InitiateSmsResponse, VerifyOtpResponse};

/// The two-step connection flow as an explicit state value.
///
/// Keeping the selected step, pending provider user id, and confirmation
/// together in one enum makes invalid combinations unrepresentable: there is
/// no way to hold an OTP step without the provider user id it verifies
/// against.
///
/// Spinwheel exposes no cancellation endpoint, so [`WizardState::back`] just
/// discards the pending id; re-initiating with the same external user id
/// starts a fresh provider-side attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    /// Awaiting phone number and date of birth.
    Initiating,
    /// SMS code sent; awaiting the caller-entered OTP.
    AwaitingOtp {
        /// The id from initiation, required by the verification call.
        provider_user_id: String,
        /// Epoch timestamp after which the issued code expires.
        code_expires_at: i64,
    },
    /// Verification confirmed. This id is what callers persist.
    Connected { user_id: String },
}

impl WizardState {
    pub fn new() -> Self {
        WizardState::Initiating
    }

    /// Applies a successful initiation response.
    ///
    /// Allowed from `Initiating` and from `AwaitingOtp` (a re-initiation
    /// replaces the pending code). Requires the documented `201` status.
    pub fn submit_initiation(self, response: &InitiateSmsResponse) -> Result<Self, AppError> {
        match self {
            WizardState::Initiating | WizardState::AwaitingOtp { .. } => {
                if response.status.code != 201 {
                    return Err(AppError::InvalidResponse(format!(
                        "Unexpected initiation status code {}",
                        response.status.code
                    )));
                }
                Ok(WizardState::AwaitingOtp {
                    provider_user_id: response.data.user_id.clone(),
                    code_expires_at: response.data.sms.code_expires_at,
                })
            }
            WizardState::Connected { .. } => Err(AppError::BadRequest(
                "Already connected; disconnect before re-initiating".to_string(),
            )),
        }
    }

    /// Applies a successful verification response.
    ///
    /// The confirmed id is taken from the nested `data.userId` when present,
    /// falling back to the top-level `userId`; a response with neither is a
    /// shape error, not a connection.
    pub fn submit_verification(self, response: &VerifyOtpResponse) -> Result<Self, AppError> {
        match self {
            WizardState::AwaitingOtp { .. } => match response.confirmed_user_id() {
                Some(user_id) => Ok(WizardState::Connected {
                    user_id: user_id.to_string(),
                }),
                None => Err(AppError::InvalidResponse(
                    "User ID not received from verification".to_string(),
                )),
            },
            _ => Err(AppError::BadRequest(
                "No OTP verification in progress".to_string(),
            )),
        }
    }

    /// Returns to the initiation step, discarding any pending provider user
    /// id and entered code. No provider call is made.
    pub fn back(self) -> Self {
        match self {
            WizardState::AwaitingOtp { .. } => WizardState::Initiating,
            other => other,
        }
    }

    /// The pending provider user id, present only while awaiting the OTP.
    pub fn provider_user_id(&self) -> Option<&str> {
        match self {
            WizardState::AwaitingOtp {
                provider_user_id, ..
            } => Some(provider_user_id),
            _ => None,
        }
    }

    /// The confirmed user id, present only once connected.
    pub fn connected_user_id(&self) -> Option<&str> {
        match self {
            WizardState::Connected { user_id } => Some(user_id),
            _ => None,
        }
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}
