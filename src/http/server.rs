//! HTTP server setup and the account-creation handler.
//!
//! # Responsibilities
//! - Create the Axum router with the single gateway route
//! - Inject the shared contract handle into the handler
//! - Bind the server to an already-accepted listener
//! - Map submission outcomes to the fixed plain-text responses
//!
//! There is deliberately no auth, no rate limiting, no request timeout and
//! no body validation here: the façade forwards fields verbatim and lets the
//! ledger reject what it will.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::ledger::Contract;
use crate::observability::metrics;

/// Transaction name invoked for account creation.
const CREATE_ACCOUNT: &str = "CreateAccount";

/// Request-body fields forwarded as positional arguments, in order.
const ACCOUNT_FIELDS: [&str; 8] = [
    "dealerID",
    "msisdn",
    "mpin",
    "balance",
    "status",
    "transAmount",
    "transType",
    "remarks",
];

/// Application state injected into handlers.
///
/// The contract handle is the only shared resource; it is invoked, never
/// mutated, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub contract: Arc<Contract>,
}

/// HTTP server for the REST gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around an initialized contract handle.
    pub fn new(_config: &GatewayConfig, contract: Contract) -> Self {
        let state = AppState {
            contract: Arc::new(contract),
        };
        let router = Self::build_router(state);
        Self { router }
    }

    /// Build the Axum router. One route, JSON body parsing, request tracing.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/createAccount", post(create_account))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Account creation handler.
///
/// Extracts the eight fields in fixed order and performs exactly one awaited
/// submission. Success returns the fixed confirmation; any error collapses
/// into a flat 500 with the error text, uncategorized by design.
async fn create_account(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let start = Instant::now();
    let args: Vec<String> = ACCOUNT_FIELDS
        .iter()
        .map(|field| field_value(&body, field))
        .collect();

    match state.contract.submit_transaction(CREATE_ACCOUNT, &args).await {
        Ok(_payload) => {
            metrics::record_submission(CREATE_ACCOUNT, true, start);
            tracing::info!(transaction = CREATE_ACCOUNT, "Account created");
            (StatusCode::OK, "Account created successfully").into_response()
        }
        Err(e) => {
            metrics::record_submission(CREATE_ACCOUNT, false, start);
            tracing::error!(
                transaction = CREATE_ACCOUNT,
                error = %e,
                "Submission failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create account: {}", e),
            )
                .into_response()
        }
    }
}

/// Forward a body field verbatim: strings as-is, missing or null fields as
/// empty, other scalars in their JSON rendering. Nothing is rejected here.
fn field_value(body: &Value, field: &str) -> String {
    match body.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
