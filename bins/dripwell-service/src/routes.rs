//! Axum router and HTTP handlers.
//!
//! Amounts cross the wire as base-unit decimal strings: u128 values do not
//! survive JSON number round-trips in common clients.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use dripwell_core::constants::MIN_CLAIM;
use dripwell_core::display::format_units;
use dripwell_core::error::EngineError;
use dripwell_core::types::{Address, Amount, AssetId};

use crate::AppState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/config", get(api_config))
        .route("/api/pools", get(api_pools))
        .route("/api/pool/:asset", get(api_pool))
        .route("/api/user/:user/:asset", get(api_user))
        .route("/api/claim", post(api_claim))
        .route("/api/fund-pool", post(api_fund_pool))
        .route("/api/top-up", post(api_top_up))
        .route("/api/admin/set-pool", post(api_set_pool))
        .route("/api/admin/send", post(api_admin_send))
        .route("/api/admin/batch-send", post(api_batch_send))
        .route("/api/admin/withdraw", post(api_withdraw))
        .route("/api/admin/increase-pool", post(api_increase_pool))
        .with_state(state)
        .layer(cors)
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

/// `GET /api/config` — engine parameters fixed at startup.
async fn api_config(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "admin": state.config.admin.to_string(),
            "cooldown_secs": state.config.cooldown_secs,
            "day_length_secs": state.config.day_length_secs,
            "min_claim": MIN_CLAIM.to_string(),
            "min_claim_units": format_units(MIN_CLAIM),
        })),
    )
}

/// `GET /api/pools` — every pool the engine has a record for.
async fn api_pools(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    let pools: Vec<Value> = engine
        .pools()
        .into_iter()
        .map(|(asset, pool)| {
            json!({
                "asset": asset.to_string(),
                "total": pool.total.to_string(),
                "total_units": format_units(pool.total),
                "max_send": pool.max_send.to_string(),
                "is_native": pool.is_native,
                "configured": pool.is_configured(),
            })
        })
        .collect();
    (StatusCode::OK, Json(json!({ "pools": pools })))
}

/// `GET /api/pool/:asset` — one pool plus its derived reserve.
async fn api_pool(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> impl IntoResponse {
    let asset = match parse_asset(&asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let engine = state.engine.lock().await;
    let pool = engine.get_pool(asset);
    (
        StatusCode::OK,
        Json(json!({
            "asset": asset.to_string(),
            "total": pool.total.to_string(),
            "total_units": format_units(pool.total),
            "max_send": pool.max_send.to_string(),
            "is_native": pool.is_native,
            "configured": pool.is_configured(),
            "reserve": engine.reserve(asset).to_string(),
        })),
    )
}

/// `GET /api/user/:user/:asset` — claim state for a (user, asset) pair.
async fn api_user(
    State(state): State<AppState>,
    Path((user, asset)): Path<(String, String)>,
) -> impl IntoResponse {
    let user = match parse_address(&user) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let engine = state.engine.lock().await;
    let info = engine.get_user_info(user, asset);
    (
        StatusCode::OK,
        Json(json!({
            "user": user.to_string(),
            "asset": asset.to_string(),
            "streak": info.streak,
            "effective_max_send": info.effective_max_send.to_string(),
            "last_claim": info.last_claim,
            "has_claimed": info.has_claimed(),
        })),
    )
}

// ---------------------------------------------------------------------------
// Claim and public funding
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ClaimRequest {
    caller: String,
    asset: String,
}

/// `POST /api/claim` — draw a payout for the caller.
async fn api_claim(
    State(state): State<AppState>,
    Json(req): Json<ClaimRequest>,
) -> impl IntoResponse {
    let caller = match parse_address(&req.caller) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&req.asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    info!(%caller, %asset, "Claim request");

    let mut engine = state.engine.lock().await;
    match engine.claim(caller, asset, unix_now()) {
        Ok(receipt) => {
            info!(
                %caller,
                amount_units = %format_units(receipt.amount),
                streak = receipt.streak,
                "Claim paid"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "caller": caller.to_string(),
                    "asset": asset.to_string(),
                    "amount": receipt.amount.to_string(),
                    "amount_units": format_units(receipt.amount),
                    "streak": receipt.streak,
                    "effective_cap": receipt.effective_cap.to_string(),
                })),
            )
        }
        Err(e) => {
            warn!(error = %e, %caller, %asset, "Claim failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct FundPoolRequest {
    caller: String,
    asset: String,
    amount: String,
    #[serde(default)]
    is_native: bool,
}

/// `POST /api/fund-pool` — deposit from the caller into a pool's total.
async fn api_fund_pool(
    State(state): State<AppState>,
    Json(req): Json<FundPoolRequest>,
) -> impl IntoResponse {
    let caller = match parse_address(&req.caller) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&req.asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let amount = match parse_amount(&req.amount) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let mut engine = state.engine.lock().await;
    match engine.fund_pool(caller, asset, amount, req.is_native) {
        Ok(total) => {
            info!(%caller, %asset, amount_units = %format_units(amount), "Pool funded");
            (
                StatusCode::OK,
                Json(json!({
                    "asset": asset.to_string(),
                    "total": total.to_string(),
                    "total_units": format_units(total),
                })),
            )
        }
        Err(e) => {
            warn!(error = %e, %caller, %asset, "Fund pool failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct TopUpRequest {
    caller: String,
    asset: String,
    amount: String,
}

/// `POST /api/top-up` — deposit from the caller into the reserve.
async fn api_top_up(
    State(state): State<AppState>,
    Json(req): Json<TopUpRequest>,
) -> impl IntoResponse {
    let caller = match parse_address(&req.caller) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&req.asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let amount = match parse_amount(&req.amount) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let mut engine = state.engine.lock().await;
    match engine.top_up(caller, asset, amount) {
        Ok(()) => {
            info!(%caller, %asset, amount_units = %format_units(amount), "Reserve topped up");
            (
                StatusCode::OK,
                Json(json!({
                    "asset": asset.to_string(),
                    "reserve": engine.reserve(asset).to_string(),
                })),
            )
        }
        Err(e) => {
            warn!(error = %e, %caller, %asset, "Top up failed");
            error_response(&e)
        }
    }
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SetPoolRequest {
    caller: String,
    asset: String,
    total: String,
    max_send: String,
    #[serde(default)]
    is_native: bool,
}

/// `POST /api/admin/set-pool` — replace a pool's configuration wholesale.
async fn api_set_pool(
    State(state): State<AppState>,
    Json(req): Json<SetPoolRequest>,
) -> impl IntoResponse {
    let caller = match parse_address(&req.caller) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&req.asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let total = match parse_amount(&req.total) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let max_send = match parse_amount(&req.max_send) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let mut engine = state.engine.lock().await;
    match engine.set_pool(caller, asset, total, max_send, req.is_native) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "asset": asset.to_string(),
                "total": total.to_string(),
                "max_send": max_send.to_string(),
                "is_native": req.is_native,
            })),
        ),
        Err(e) => {
            warn!(error = %e, %caller, %asset, "Set pool failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct AdminSendRequest {
    caller: String,
    asset: String,
    to: String,
    amount: String,
}

/// `POST /api/admin/send` — direct payout from the pool.
async fn api_admin_send(
    State(state): State<AppState>,
    Json(req): Json<AdminSendRequest>,
) -> impl IntoResponse {
    let caller = match parse_address(&req.caller) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&req.asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let to = match parse_address(&req.to) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let amount = match parse_amount(&req.amount) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let mut engine = state.engine.lock().await;
    match engine.admin_send(caller, asset, to, amount) {
        Ok(()) => {
            info!(%to, %asset, amount_units = %format_units(amount), "Admin send");
            (
                StatusCode::OK,
                Json(json!({
                    "asset": asset.to_string(),
                    "to": to.to_string(),
                    "amount": amount.to_string(),
                    "pool_total": engine.get_pool(asset).total.to_string(),
                })),
            )
        }
        Err(e) => {
            warn!(error = %e, %to, %asset, "Admin send failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct BatchSendRequest {
    caller: String,
    asset: String,
    recipients: Vec<String>,
    max_send: String,
}

/// `POST /api/admin/batch-send` — randomized payouts to a recipient list.
async fn api_batch_send(
    State(state): State<AppState>,
    Json(req): Json<BatchSendRequest>,
) -> impl IntoResponse {
    let caller = match parse_address(&req.caller) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&req.asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let max_send = match parse_amount(&req.max_send) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let mut recipients = Vec::with_capacity(req.recipients.len());
    for raw in &req.recipients {
        match parse_address(raw) {
            Ok(a) => recipients.push(a),
            Err(resp) => return resp,
        }
    }

    let mut engine = state.engine.lock().await;
    match engine.admin_batch_send(caller, asset, &recipients, max_send) {
        Ok(receipt) => {
            info!(
                %asset,
                recipients = receipt.payouts.len(),
                total_units = %format_units(receipt.total),
                "Batch send paid"
            );
            let payouts: Vec<Value> = receipt
                .payouts
                .iter()
                .map(|(to, amount)| {
                    json!({
                        "to": to.to_string(),
                        "amount": amount.to_string(),
                    })
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "asset": asset.to_string(),
                    "payouts": payouts,
                    "total": receipt.total.to_string(),
                })),
            )
        }
        Err(e) => {
            warn!(error = %e, %asset, "Batch send failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct WithdrawRequest {
    caller: String,
    asset: String,
    amount: String,
}

/// `POST /api/admin/withdraw` — pay reserve funds out to the admin.
async fn api_withdraw(
    State(state): State<AppState>,
    Json(req): Json<WithdrawRequest>,
) -> impl IntoResponse {
    let caller = match parse_address(&req.caller) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&req.asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let amount = match parse_amount(&req.amount) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let mut engine = state.engine.lock().await;
    match engine.withdraw(caller, asset, amount) {
        Ok(()) => {
            info!(%asset, amount_units = %format_units(amount), "Reserve withdrawal");
            (
                StatusCode::OK,
                Json(json!({
                    "asset": asset.to_string(),
                    "amount": amount.to_string(),
                    "reserve": engine.reserve(asset).to_string(),
                })),
            )
        }
        Err(e) => {
            warn!(error = %e, %asset, "Withdraw failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct IncreasePoolRequest {
    caller: String,
    asset: String,
    amount: String,
}

/// `POST /api/admin/increase-pool` — reclassify reserve into the pool.
async fn api_increase_pool(
    State(state): State<AppState>,
    Json(req): Json<IncreasePoolRequest>,
) -> impl IntoResponse {
    let caller = match parse_address(&req.caller) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let asset = match parse_asset(&req.asset) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let amount = match parse_amount(&req.amount) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let mut engine = state.engine.lock().await;
    match engine.increase_pool(caller, asset, amount) {
        Ok(total) => {
            info!(%asset, amount_units = %format_units(amount), "Pool increased");
            (
                StatusCode::OK,
                Json(json!({
                    "asset": asset.to_string(),
                    "total": total.to_string(),
                    "reserve": engine.reserve(asset).to_string(),
                })),
            )
        }
        Err(e) => {
            warn!(error = %e, %asset, "Increase pool failed");
            error_response(&e)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current unix time in seconds; zero if the host clock is before the epoch.
fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn bad_request(msg: String) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })))
}

fn parse_address(s: &str) -> Result<Address, (StatusCode, Json<Value>)> {
    s.trim()
        .parse()
        .map_err(|e| bad_request(format!("invalid address {s:?}: {e}")))
}

fn parse_asset(s: &str) -> Result<AssetId, (StatusCode, Json<Value>)> {
    s.trim()
        .parse()
        .map_err(|e| bad_request(format!("invalid asset {s:?}: {e}")))
}

fn parse_amount(s: &str) -> Result<Amount, (StatusCode, Json<Value>)> {
    s.trim()
        .parse()
        .map_err(|_| bad_request(format!("invalid amount {s:?}: expected a base-unit integer")))
}

/// Map an engine error to an HTTP status and JSON body.
///
/// Cooldown rejections carry a machine-readable `retry_in_secs` alongside
/// the message.
fn error_response(err: &EngineError) -> (StatusCode, Json<Value>) {
    let status = match err {
        EngineError::Unauthorized => StatusCode::FORBIDDEN,
        EngineError::ClaimTooSoon { .. } => StatusCode::TOO_MANY_REQUESTS,
        EngineError::PoolNotConfigured(_)
        | EngineError::PoolExhausted { .. }
        | EngineError::InsufficientPool { .. }
        | EngineError::InsufficientReserve { .. } => StatusCode::CONFLICT,
        EngineError::TransferFailed(_) => StatusCode::BAD_GATEWAY,
        EngineError::AmountOverflow => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let mut body = json!({ "error": err.to_string() });
    if let EngineError::ClaimTooSoon { retry_in_secs } = err {
        body["retry_in_secs"] = json!(retry_in_secs);
    }
    (status, Json(body))
}
