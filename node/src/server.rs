// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use axum_extra::TypedHeader;
use headers::authorization::Bearer;
use headers::Authorization;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use revenant_core::ledger::LedgerReader;
use revenant_core::payload::SalvagePayload;
use revenant_core::payment::{PaymentInfo, PaymentValidator, ValidationResult};
use revenant_core::revival::{generate_spawn_command, RevivalProtocol};
use revenant_core::salvage::{SalvageProtocol, SalvageReceipt, WriteCapability};
use revenant_core::{ErrorKind, RevenantError};

use crate::api::*;
use crate::config::NodeConfig;
use crate::errors::ApiError;
use crate::ledger_store::{FallbackReader, ObjectLedger};
use crate::network::{http_client, GatewayClient, SolanaRpcClient};

/// Everything a handler needs. Protocols are stateless, so this is shared
/// without locking.
#[derive(Clone)]
pub struct AppState {
    pub salvage: Arc<SalvageProtocol>,
    pub revival: Arc<RevivalProtocol>,
    pub payments: Arc<PaymentValidator>,
    pub salvage_price: Option<u64>,
}

impl AppState {
    /// Wire concrete clients from configuration. A configured ledger takes
    /// writes and is read first, with the Arweave gateway behind it for ids
    /// it does not hold. Without one, salvage is demo-only and revival reads
    /// from the gateway.
    pub fn from_config(cfg: &NodeConfig) -> Result<Self, RevenantError> {
        let http = http_client(cfg.request_timeout_secs)?;

        let gateway = Arc::new(GatewayClient::new(cfg.gateway_url.clone(), http.clone()));
        let (capability, reader): (WriteCapability, Arc<dyn LedgerReader>) = match &cfg.ledger {
            Some(credential) => {
                let ledger = Arc::new(ObjectLedger::from_credential(credential)?);
                (
                    WriteCapability::Live(ledger.clone()),
                    Arc::new(FallbackReader::new(ledger, gateway)),
                )
            }
            None => (WriteCapability::Demo, gateway),
        };

        let chain = Arc::new(SolanaRpcClient::new(cfg.rpc_url.clone(), cfg.commitment.clone(), http));
        let payments = PaymentValidator::new(chain, cfg.payment_config()?);

        Ok(Self {
            salvage: Arc::new(SalvageProtocol::new(capability)),
            revival: Arc::new(RevivalProtocol::new(reader)),
            payments: Arc::new(payments),
            salvage_price: cfg.salvage_price,
        })
    }
}

async fn auth_guard(
    State(token): State<Arc<String>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match bearer {
        Some(TypedHeader(Authorization(provided))) if provided.token() == token.as_str() => {
            Ok(next.run(req).await)
        }
        _ => Err(ApiError::Unauthorized),
    }
}

pub fn build_router(state: AppState, auth_token: Option<String>) -> Router {
    let mut protected = Router::new()
        .route("/salvage", post(salvage))
        .route("/revive", post(revive));

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required for salvage and revive");
        protected = protected.route_layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    Router::new()
        .merge(protected)
        .route("/payments/validate", post(validate_payment))
        .route("/payments/info", get(payment_info))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn require_payment(state: &AppState, price: u64, signature: Option<&str>) -> Result<(), ApiError> {
    let signature = signature
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::PaymentRequired(format!("paymentSignature for {} base units", price)))?;

    let result = state.payments.validate(signature.trim(), price).await?;
    if !result.valid {
        return Err(ApiError::PaymentRequired(
            result.error.unwrap_or_else(|| "payment not valid".to_string()),
        ));
    }
    Ok(())
}

async fn salvage(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SalvageRequest>, ApiError>,
) -> Result<Json<SalvageReceipt>, ApiError> {
    if let Some(price) = state.salvage_price {
        require_payment(&state, price, req.payment_signature.as_deref()).await?;
    }

    let raw_state = req.raw_state();
    let payload = SalvagePayload::from_parts(req.files, raw_state, req.metadata.unwrap_or_default());

    let result = state.salvage.salvage(&payload).await;
    let status = result.as_ref().map(|r| r.status.as_str()).unwrap_or("error");
    metrics::increment_counter!("revenant_salvage_total", "status" => status);

    Ok(Json(result?))
}

async fn revive(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ReviveRequest>, ApiError>,
) -> Result<Json<ReviveResponse>, ApiError> {
    let id = req.id.unwrap_or_default();

    let result = state.revival.revive(id.trim()).await;
    let status = result.as_ref().map(|r| r.status.as_str()).unwrap_or("error");
    metrics::increment_counter!("revenant_revive_total", "status" => status);

    let revival = result?;
    let spawn_command = generate_spawn_command(&revival.state);
    Ok(Json(ReviveResponse { revival, spawn_command }))
}

async fn validate_payment(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ValidatePaymentRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let signature = req.signature.trim();
    if signature.is_empty() {
        return Err(ApiError::InvalidInput("signature is required".to_string()));
    }

    match state.payments.validate(signature, req.expected_amount).await {
        Ok(result) => {
            let valid = if result.valid { "true" } else { "false" };
            metrics::increment_counter!("revenant_payment_validations_total", "valid" => valid);
            Ok(Json(result).into_response())
        }
        // Transport failures keep the validation shape so clients parse one body.
        Err(e) if e.kind() == ErrorKind::ChainQueryFailure => {
            metrics::increment_counter!("revenant_payment_validations_total", "valid" => "error");
            let body = ValidationResult {
                valid: false,
                amount: None,
                signature: signature.to_string(),
                block_time: None,
                error: Some(e.to_string()),
            };
            Ok((StatusCode::BAD_GATEWAY, Json(body)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

async fn payment_info(State(state): State<AppState>) -> Json<PaymentInfo> {
    Json(state.payments.payment_info())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mode = if state.salvage.is_live() { "live" } else { "demo" };
    Json(HealthResponse {
        status: "ok".to_string(),
        salvage_mode: mode.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
