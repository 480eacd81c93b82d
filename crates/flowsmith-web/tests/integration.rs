//! Integration tests for the flowsmith-web crate.
//!
//! Handlers are exercised directly with a mock-backed orchestrator, so the
//! status mapping and review lifecycle are verified without binding a
//! listener.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use flowsmith_orchestrator::{GeneratorConfig, WorkflowGenerator};
use flowsmith_web::{AppState, WebConfig, WebServer, api};

fn mock_state() -> Arc<AppState> {
    let config = GeneratorConfig::anthropic("sk-test").with_mock_data(true);
    let generator = Arc::new(WorkflowGenerator::from_config(config).unwrap());
    Arc::new(AppState::new(generator))
}

fn unconfigured_state() -> Arc<AppState> {
    let generator = Arc::new(WorkflowGenerator::from_config(GeneratorConfig::unconfigured()).unwrap());
    Arc::new(AppState::new(generator))
}

#[test]
fn web_config_defaults() {
    let config = WebConfig::default();
    assert_eq!(config.bind_addr, "127.0.0.1");
    assert_eq!(config.port, 3000);
}

#[test]
fn web_config_custom() {
    let config = WebConfig {
        bind_addr: "0.0.0.0".into(),
        port: 8080,
    };
    assert_eq!(config.bind_addr, "0.0.0.0");
    assert_eq!(config.port, 8080);
}

#[test]
fn server_addr_combines_bind_and_port() {
    let state = mock_state();
    let server = WebServer::new(
        WebConfig {
            bind_addr: "0.0.0.0".into(),
            port: 8080,
        },
        Arc::clone(&state.generator),
    );
    assert_eq!(server.addr(), "0.0.0.0:8080");
}

#[tokio::test]
async fn generate_returns_200_on_success() {
    let state = mock_state();
    let response = api::generate(
        State(state),
        Json(api::GenerateRequest {
            prompt: "send me a Slack message when a new row is added to my spreadsheet".into(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_returns_400_on_empty_prompt() {
    let state = mock_state();
    let response = api::generate(
        State(state),
        Json(api::GenerateRequest { prompt: "  ".into() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_returns_200_remediation_without_credential() {
    let state = unconfigured_state();
    let response = api::generate(
        State(state),
        Json(api::GenerateRequest {
            prompt: "notify me".into(),
        }),
    )
    .await;
    // Remediation is an accepted request, not a server failure.
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn review_lifecycle_over_the_handlers() {
    let state = mock_state();

    let response = api::analyze(
        State(Arc::clone(&state)),
        Json(api::GenerateRequest {
            prompt: "email me every morning".into(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The review is registered in shared state.
    let review_id = {
        let reviews = state.reviews.read().await;
        assert_eq!(reviews.len(), 1);
        *reviews.keys().next().unwrap()
    };

    let response = api::edit_review(
        State(Arc::clone(&state)),
        Path(review_id),
        Json(api::EditRequest {
            blueprint: "send the digest at 9am instead".into(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = api::approve_review(State(Arc::clone(&state)), Path(review_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Terminal reviews conflict on further transitions.
    let response = api::reject_review(State(Arc::clone(&state)), Path(review_id)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_review_is_404() {
    let state = mock_state();
    let response = api::get_review(State(state), Path(uuid::Uuid::now_v7())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_reports_configuration() {
    let state = mock_state();
    let Json(body) = api::status(State(state)).await;
    assert_eq!(body.status, "ok");
    assert!(body.ai_available);
    assert!(body.mock_data);
    assert_eq!(body.open_reviews, 0);
}
