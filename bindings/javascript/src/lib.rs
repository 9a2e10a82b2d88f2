//! JavaScript/TypeScript bindings for the crowdfund dapp
//!
//! Thin wrapper around `crowdfund-core` compiled to WebAssembly.
//! No logic here; every rule comes from the Rust core.
//!
//! Structured values cross the boundary as JSON strings. Wei amounts are
//! always decimal strings so they survive `JSON.parse` without losing
//! precision.

use crowdfund_core::launch::{self, Diagnostic};
use crowdfund_core::{DappConfig, LaunchForm, WalletSession, WeiAmount};
use wasm_bindgen::prelude::*;

/// Normalize one raw campaign record (tuple or object form).
///
/// Never fails on odd field values; only invalid JSON throws.
///
/// @param json - JSON text of the contract read
/// @param now - unix seconds, defaults to the browser clock
/// @returns JSON string of the canonical campaign
#[wasm_bindgen(js_name = "normalizeCampaign")]
pub fn normalize_campaign(json: &str, now: Option<f64>) -> Result<String, JsError> {
    let raw = parse_json(json)?;
    let campaign = crowdfund_core::normalize_campaign(&raw, unix_seconds(now));
    to_json(&campaign)
}

/// Normalize a `getAllCampaigns` result. Non-array input yields `[]`.
///
/// @param json - JSON text of the contract read
/// @param now - unix seconds, defaults to the browser clock
/// @returns JSON string array of canonical campaigns
#[wasm_bindgen(js_name = "normalizeCampaigns")]
pub fn normalize_campaigns(json: &str, now: Option<f64>) -> Result<String, JsError> {
    let raw = parse_json(json)?;
    let campaigns = crowdfund_core::normalize_campaigns(&raw, unix_seconds(now));
    to_json(&campaigns)
}

/// Percentage of the goal reached; 0 when the goal is 0.
#[wasm_bindgen(js_name = "fundingPercentage")]
pub fn funding_percentage(pledged: f64, goal: f64) -> f64 {
    crowdfund_core::funding_percentage(pledged, goal)
}

/// Whole days until `endAt`, rounded up; 0 once ended.
#[wasm_bindgen(js_name = "daysLeft")]
pub fn days_left(end_at: f64, now: Option<f64>) -> f64 {
    crowdfund_core::days_left(whole_u64(end_at), unix_seconds(now)) as f64
}

/// Exact ether rendering of a wei amount.
///
/// @param wei - decimal or `0x` hex integer string
/// @throws Error if the amount is not a non-negative integer
#[wasm_bindgen(js_name = "formatEther")]
pub fn format_ether(wei: &str) -> Result<String, JsError> {
    let amount: WeiAmount = wei.parse().map_err(|e| JsError::new(&format!("{}", e)))?;
    Ok(crowdfund_core::format_ether(&amount))
}

/// Convert a decimal ether amount to a wei string.
///
/// @throws Error for empty, negative or non-decimal input
#[wasm_bindgen(js_name = "parseEther")]
pub fn parse_ether(amount: &str) -> Result<String, JsError> {
    crowdfund_core::parse_ether(amount)
        .map(|wei| wei.to_string())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Plan a pledge: either the pledge itself or the approval it needs.
///
/// @param campaignId - campaign id
/// @param amount - ether amount as typed
/// @param allowance - current allowance in wei, or undefined while loading
/// @param wallet - connected address, or undefined
/// @param config - optional TOML overriding the contract addresses
/// @returns JSON string: { step: "approve" | "pledge", call: {...} }
/// @throws Error if no wallet is connected or the amount is invalid
#[wasm_bindgen(js_name = "planPledge")]
pub fn plan_pledge(
    campaign_id: f64,
    amount: &str,
    allowance: Option<String>,
    wallet: Option<String>,
    config: Option<String>,
) -> Result<String, JsError> {
    let config = load_config(config.as_deref())?;
    let wallet = wallet_session(wallet.as_deref())?;
    let allowance = allowance
        .as_deref()
        .map(str::parse::<WeiAmount>)
        .transpose()
        .map_err(|e| JsError::new(&e.to_string()))?;

    let plan = crowdfund_core::plan_pledge(
        &config,
        &wallet,
        whole_u64(campaign_id),
        amount,
        allowance.as_ref(),
    )
    .map_err(|e| JsError::new(&e.to_string()))?;
    to_json(&plan)
}

/// Check a launch form without planning anything.
///
/// @param form - JSON: { title, description, goal, category, start, end }
/// @param now - unix seconds, defaults to the browser clock
/// @param config - optional TOML overriding the launch window
/// @returns JSON string: { valid: boolean, errors: [...], warnings: [...] }
#[wasm_bindgen(js_name = "checkLaunch")]
pub fn check_launch(
    form: &str,
    now: Option<f64>,
    config: Option<String>,
) -> Result<String, JsError> {
    let config = load_config(config.as_deref())?;
    let form = parse_form(form)?;
    let check = launch::check_launch(&form, unix_seconds(now), &config);

    let output = serde_json::json!({
        "valid": check.is_valid(),
        "errors": check.errors().into_iter().map(diagnostic_json).collect::<Vec<_>>(),
        "warnings": check.warnings().into_iter().map(diagnostic_json).collect::<Vec<_>>(),
    });
    to_json(&output)
}

/// Plan the `launch` call for a form.
///
/// @param form - JSON: { title, description, goal, category, start, end }
/// @param wallet - connected address, or undefined
/// @param now - unix seconds, defaults to the browser clock
/// @param config - optional TOML overriding the contract addresses
/// @returns JSON string of the write call
/// @throws Error listing every failed check, or if no wallet is connected
#[wasm_bindgen(js_name = "planLaunch")]
pub fn plan_launch(
    form: &str,
    wallet: Option<String>,
    now: Option<f64>,
    config: Option<String>,
) -> Result<String, JsError> {
    let config = load_config(config.as_deref())?;
    let wallet = wallet_session(wallet.as_deref())?;
    let form = parse_form(form)?;

    let call = crowdfund_core::plan_launch(&config, &wallet, &form, unix_seconds(now))
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_json(&call)
}

// ── Helpers ───────────────────────────────────────────────

fn unix_seconds(now: Option<f64>) -> u64 {
    whole_u64(now.unwrap_or_else(|| js_sys::Date::now() / 1000.0))
}

/// JS numbers (timestamps, ids) to whole `u64`; negatives and NaN clamp to 0
fn whole_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

fn parse_json(json: &str) -> Result<serde_json::Value, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("JSON error: {}", e)))
}

fn parse_form(json: &str) -> Result<LaunchForm, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid launch form: {}", e)))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn load_config(toml: Option<&str>) -> Result<DappConfig, JsError> {
    match toml {
        Some(text) => DappConfig::parse_toml(text).map_err(|e| JsError::new(&e.to_string())),
        None => Ok(DappConfig::default()),
    }
}

fn wallet_session(address: Option<&str>) -> Result<WalletSession, JsError> {
    match address {
        Some(text) => crowdfund_core::Address::parse(text)
            .map(WalletSession::connected)
            .map_err(|e| JsError::new(&e.to_string())),
        None => Ok(WalletSession::disconnected()),
    }
}

fn diagnostic_json(diagnostic: &Diagnostic) -> serde_json::Value {
    serde_json::json!({
        "field": diagnostic.field.to_string(),
        "message": diagnostic.message,
    })
}
