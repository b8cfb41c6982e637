/// End-to-end tests for the connection flow: boundary validation in the
/// handlers and the two-step wizard driven against a mocked provider.
use axum::extract::{Query, State};
use axum::Json;
use spinwheel_debt_api::config::Config;
use spinwheel_debt_api::errors::AppError;
use spinwheel_debt_api::handlers::{self, AppState, ConnectParams, DebtProfileQuery, InitiateParams, VerifyParams};
use spinwheel_debt_api::spinwheel::SpinwheelClient;
use spinwheel_debt_api::wizard::WizardState;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_state(uri: String) -> Arc<AppState> {
    let config = Config {
        port: 8080,
        spinwheel_secret_key: "test_key".to_string(),
        spinwheel_base_url: uri.clone(),
        spinwheel_secure_url: uri,
    };
    let spinwheel = SpinwheelClient::new(&config);
    Arc::new(AppState { config, spinwheel })
}

/// Mounts a catch-all mock that must never be hit. Validation failures must
/// be rejected at the boundary without any outbound provider call.
async fn mock_server_expecting_no_calls() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn connect_without_phone_number_is_rejected_before_any_call() {
    let mock_server = mock_server_expecting_no_calls().await;
    let state = test_state(mock_server.uri());

    let err = handlers::connect_user(
        State(state),
        Json(ConnectParams {
            phone_number: None,
            method: Some("sms".to_string()),
        }),
    )
    .await
    .unwrap_err();

    match err {
        AppError::BadRequest(msg) => assert_eq!(msg, "Phone number is required"),
        other => panic!("expected bad request, got {:?}", other),
    }
}

#[tokio::test]
async fn initiate_with_any_missing_field_is_rejected_before_any_call() {
    let mock_server = mock_server_expecting_no_calls().await;
    let state = test_state(mock_server.uri());

    let incomplete = [
        InitiateParams {
            phone_number: None,
            date_of_birth: Some("1990-01-01".to_string()),
            ext_user_id: Some("user_123".to_string()),
        },
        InitiateParams {
            phone_number: Some("+14155552671".to_string()),
            date_of_birth: None,
            ext_user_id: Some("user_123".to_string()),
        },
        InitiateParams {
            phone_number: Some("+14155552671".to_string()),
            date_of_birth: Some("1990-01-01".to_string()),
            ext_user_id: None,
        },
        // Blank counts as missing
        InitiateParams {
            phone_number: Some("  ".to_string()),
            date_of_birth: Some("1990-01-01".to_string()),
            ext_user_id: Some("user_123".to_string()),
        },
    ];

    for params in incomplete {
        let err = handlers::initiate_connection(State(state.clone()), Json(params))
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "Phone number, date of birth, and extUserId are required")
            }
            other => panic!("expected bad request, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn verify_with_missing_field_is_rejected_before_any_call() {
    let mock_server = mock_server_expecting_no_calls().await;
    let state = test_state(mock_server.uri());

    for params in [
        VerifyParams {
            user_id: None,
            code: Some("458264".to_string()),
        },
        VerifyParams {
            user_id: Some("u1".to_string()),
            code: None,
        },
    ] {
        let err = handlers::verify_otp(State(state.clone()), Json(params))
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "userId and OTP code are required"),
            other => panic!("expected bad request, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn debt_profile_without_user_id_is_rejected_before_any_call() {
    let mock_server = mock_server_expecting_no_calls().await;
    let state = test_state(mock_server.uri());

    let err = handlers::get_debt_profile(
        State(state),
        Query(DebtProfileQuery { user_id: None }),
    )
    .await
    .unwrap_err();

    match err {
        AppError::BadRequest(msg) => assert_eq!(msg, "userId is required"),
        other => panic!("expected bad request, got {:?}", other),
    }
}

#[tokio::test]
async fn full_two_step_flow_connects_and_fetches_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/users/connect/sms/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": { "code": 201, "desc": "Created" },
            "data": {
                "userId": "u1",
                "extUserId": "user_123",
                "connectionId": "conn_1",
                "connectionStatus": "pending",
                "sms": { "codeExpiresAt": 1700000600, "codeTimeoutSeconds": 600 }
            }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/users/u1/connect/sms/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": { "code": 200, "desc": "OK" },
            "data": { "userId": "u1", "connectionStatus": "connected" }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/users/u1/debt-profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "userId": "u1",
            "liabilities": [],
            "totalBalance": 0.0
        })))
        .mount(&mock_server)
        .await;

    let state = test_state(mock_server.uri());

    // Step one: initiate
    let Json(initiation) = handlers::initiate_connection(
        State(state.clone()),
        Json(InitiateParams {
            phone_number: Some("+14155552671".to_string()),
            date_of_birth: Some("1990-01-01".to_string()),
            ext_user_id: Some("user_123".to_string()),
        }),
    )
    .await
    .unwrap();

    let wizard = WizardState::new().submit_initiation(&initiation).unwrap();
    let provider_user_id = wizard.provider_user_id().unwrap().to_string();
    assert_eq!(provider_user_id, "u1");

    // Step two: verify with the id from initiation
    let Json(verification) = handlers::verify_otp(
        State(state.clone()),
        Json(VerifyParams {
            user_id: Some(provider_user_id),
            code: Some("458264".to_string()),
        }),
    )
    .await
    .unwrap();

    let wizard = wizard.submit_verification(&verification).unwrap();
    let connected = wizard.connected_user_id().unwrap().to_string();
    assert_eq!(connected, "u1");

    // Connected: the profile is now fetchable
    let Json(profile) = handlers::get_debt_profile(
        State(state),
        Query(DebtProfileQuery {
            user_id: Some(connected),
        }),
    )
    .await
    .unwrap();

    assert_eq!(profile.user_id, "u1");
    assert!(profile.liabilities.is_empty());
}

#[tokio::test]
async fn provider_failure_rides_through_handler_with_context() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/users/connect/sms/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "status": { "messages": [{ "desc": "Invalid phone number" }] }
        })))
        .mount(&mock_server)
        .await;

    let state = test_state(mock_server.uri());
    let err = handlers::initiate_connection(
        State(state),
        Json(InitiateParams {
            phone_number: Some("+1".to_string()),
            date_of_birth: Some("1990-01-01".to_string()),
            ext_user_id: Some("user_123".to_string()),
        }),
    )
    .await
    .unwrap_err();

    // The normalized provider message survives the handler's context wrapper.
    assert_eq!(err.message(), "Invalid phone number");
    assert!(err.to_string().starts_with("Failed to initiate SMS connection"));
}
