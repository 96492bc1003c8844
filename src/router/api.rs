// Router HTTP API implementation
// This file provides HTTP endpoints for fee administration, quotes and
// trades against the shared sandbox
//
// Numan Thabit 2025 Nov

use super::execution::ExecutionStats;
use super::quotes::{BuyQuote, BuyReceipt, SellQuote, SellReceipt, TokenInfo};
use crate::control::{AdmissionControl, AdmissionPermit};
use crate::errors::RouterError;
use crate::metrics;
use crate::sandbox::SharedSandbox;
use crate::state::FeeRate;
use alloy_primitives::{Address, U256};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct ApiState {
    pub sandbox: SharedSandbox,
    pub admission: AdmissionControl,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                code: code.to_string(),
            },
        }
    }

    fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", error)
    }
}

impl From<RouterError> for ApiError {
    fn from(err: RouterError) -> Self {
        let status = match &err {
            RouterError::Unauthorized => StatusCode::FORBIDDEN,
            RouterError::SlippageExceeded { .. } | RouterError::InsufficientAllowance { .. } => {
                StatusCode::CONFLICT
            }
            RouterError::ExternalCallFailed(_) => StatusCode::BAD_GATEWAY,
            RouterError::FeeTooHigh
            | RouterError::ZeroAddress
            | RouterError::UnsupportedPair
            | RouterError::AlreadyListed
            | RouterError::UnsupportedManagerVersion
            | RouterError::Arithmetic(_)
            | RouterError::ZeroAmount => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Create the HTTP router with API endpoints
pub fn create_api_router(state: ApiState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .route("/api/v1/config", get(get_config))
        .route("/api/v1/fee", post(set_fee))
        .route("/api/v1/owner", post(transfer_ownership))
        .route("/api/v1/tokens/:token", get(token_info))
        .route("/api/v1/quote/buy", post(quote_buy))
        .route("/api/v1/quote/sell", post(quote_sell))
        .route("/api/v1/buy", post(buy))
        .route("/api/v1/sell", post(sell))
        .route("/api/v1/approve", post(approve))
        .route("/api/v1/balances/:account", get(balances))
        .route("/api/v1/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn admit(state: &ApiState) -> Result<AdmissionPermit, ApiError> {
    state.admission.acquire().await.map_err(|err| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            err.to_string(),
        )
    })
}

fn parse_address(raw: &str) -> Result<Address, ApiError> {
    Address::from_str(raw).map_err(|err| ApiError::bad_request(format!("invalid address {raw}: {err}")))
}

/// Health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn render_metrics() -> Response {
    match metrics::render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "METRICS_UNAVAILABLE",
            err.to_string(),
        )
        .into_response(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub owner: Address,
    pub fee_rate: u32,
    pub fee_bps: u32,
    pub fee_recipient: Address,
    pub registry: Address,
    pub account: Address,
    pub base_currency: Address,
    pub supported_manager_version: u32,
}

fn config_response(state: &crate::sandbox::Sandbox) -> ConfigResponse {
    let router = &state.router;
    let fee = router.fee_config();
    ConfigResponse {
        owner: router.owner(),
        fee_rate: fee.rate().percent(),
        fee_bps: fee.rate().basis_points(),
        fee_recipient: fee.recipient(),
        registry: router.registry_address(),
        account: router.account(),
        base_currency: router.base_currency(),
        supported_manager_version: router.supported_manager_version(),
    }
}

async fn get_config(State(state): State<ApiState>) -> ApiResult<ConfigResponse> {
    let _permit = admit(&state).await?;
    let sandbox = state.sandbox.lock().await;
    Ok(Json(config_response(&sandbox)))
}

#[derive(Debug, Deserialize)]
pub struct SetFeeRequest {
    pub caller: Address,
    pub fee_rate: u32,
    pub fee_recipient: Address,
}

async fn set_fee(
    State(state): State<ApiState>,
    payload: Result<Json<SetFeeRequest>, JsonRejection>,
) -> ApiResult<ConfigResponse> {
    let Json(req) = payload?;
    let _permit = admit(&state).await?;
    let mut sandbox = state.sandbox.lock().await;
    sandbox
        .router
        .set_fee(req.caller, FeeRate::new(req.fee_rate), req.fee_recipient)?;
    Ok(Json(config_response(&sandbox)))
}

#[derive(Debug, Deserialize)]
pub struct TransferOwnershipRequest {
    pub caller: Address,
    pub new_owner: Address,
}

async fn transfer_ownership(
    State(state): State<ApiState>,
    payload: Result<Json<TransferOwnershipRequest>, JsonRejection>,
) -> ApiResult<ConfigResponse> {
    let Json(req) = payload?;
    let _permit = admit(&state).await?;
    let mut sandbox = state.sandbox.lock().await;
    sandbox.router.transfer_ownership(req.caller, req.new_owner)?;
    Ok(Json(config_response(&sandbox)))
}

async fn token_info(
    State(state): State<ApiState>,
    Path(token): Path<String>,
) -> ApiResult<TokenInfo> {
    let token = parse_address(&token)?;
    let _permit = admit(&state).await?;
    let sandbox = state.sandbox.lock().await;
    Ok(Json(sandbox.router.get_token_info(token)))
}

#[derive(Debug, Deserialize)]
pub struct BuyQuoteRequest {
    pub token: Address,
    #[serde(default)]
    pub token_amount: U256,
    #[serde(default)]
    pub bnb_amount: U256,
}

async fn quote_buy(
    State(state): State<ApiState>,
    payload: Result<Json<BuyQuoteRequest>, JsonRejection>,
) -> ApiResult<BuyQuote> {
    let Json(req) = payload?;
    let _permit = admit(&state).await?;
    let sandbox = state.sandbox.lock().await;
    let quote = sandbox.try_buy(req.token, req.token_amount, req.bnb_amount)?;
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
pub struct SellQuoteRequest {
    pub token: Address,
    pub token_amount: U256,
}

async fn quote_sell(
    State(state): State<ApiState>,
    payload: Result<Json<SellQuoteRequest>, JsonRejection>,
) -> ApiResult<SellQuote> {
    let Json(req) = payload?;
    let _permit = admit(&state).await?;
    let sandbox = state.sandbox.lock().await;
    let quote = sandbox.try_sell(req.token, req.token_amount)?;
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub caller: Address,
    pub token: Address,
    #[serde(default)]
    pub min_amount: U256,
    pub payment: U256,
}

async fn buy(
    State(state): State<ApiState>,
    payload: Result<Json<BuyRequest>, JsonRejection>,
) -> ApiResult<BuyReceipt> {
    let Json(req) = payload?;
    let _permit = admit(&state).await?;
    let mut sandbox = state.sandbox.lock().await;
    let receipt = sandbox.buy(req.caller, req.token, req.min_amount, req.payment)?;
    Ok(Json(receipt))
}

#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub caller: Address,
    pub token: Address,
    pub token_amount: U256,
    #[serde(default)]
    pub min_funds: U256,
}

async fn sell(
    State(state): State<ApiState>,
    payload: Result<Json<SellRequest>, JsonRejection>,
) -> ApiResult<SellReceipt> {
    let Json(req) = payload?;
    let _permit = admit(&state).await?;
    let mut sandbox = state.sandbox.lock().await;
    let receipt = sandbox.sell(req.caller, req.token, req.token_amount, req.min_funds)?;
    Ok(Json(receipt))
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub caller: Address,
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveResponse {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub allowance: U256,
}

async fn approve(
    State(state): State<ApiState>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> ApiResult<ApproveResponse> {
    let Json(req) = payload?;
    let _permit = admit(&state).await?;
    let mut sandbox = state.sandbox.lock().await;
    sandbox
        .approve(req.caller, req.token, req.spender, req.amount)
        .map_err(RouterError::from)?;
    Ok(Json(ApproveResponse {
        token: req.token,
        owner: req.caller,
        spender: req.spender,
        allowance: req.amount,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account: Address,
    pub native: U256,
    pub token: Option<Address>,
    pub token_balance: Option<U256>,
}

async fn balances(
    State(state): State<ApiState>,
    Path(account): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<BalanceResponse> {
    let account = parse_address(&account)?;
    let token = query.token.as_deref().map(parse_address).transpose()?;
    let _permit = admit(&state).await?;
    let sandbox = state.sandbox.lock().await;
    Ok(Json(BalanceResponse {
        account,
        native: sandbox.native_balance(account),
        token,
        token_balance: token.map(|t| sandbox.token_balance(t, account)),
    }))
}

async fn get_stats(State(state): State<ApiState>) -> ApiResult<ExecutionStats> {
    let _permit = admit(&state).await?;
    let sandbox = state.sandbox.lock().await;
    Ok(Json(sandbox.router.stats()))
}
