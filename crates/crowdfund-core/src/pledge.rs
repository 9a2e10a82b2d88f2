//! Pledging tokens to a campaign
//!
//! The crowdfunding contract pulls tokens with `transferFrom`, so a pledge
//! only goes through once the token allowance covers it. When it does not,
//! the plan is an `approve` instead and the user pledges again afterwards.

use serde::Serialize;
use serde_json::Value;

use crate::boundary::{ContractWriter, WriteCall, WriteFunction};
use crate::config::DappConfig;
use crate::units::{parse_ether, WeiAmount};
use crate::wallet::WalletSession;
use crate::{Error, Result};

/// The one transaction a pledge attempt submits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", content = "call", rename_all = "camelCase")]
pub enum PledgePlan {
    /// Allowance too low: approve the crowdfunding contract first
    Approve(WriteCall),
    /// Allowance sufficient: pledge directly
    Pledge(WriteCall),
}

impl PledgePlan {
    pub fn call(&self) -> &WriteCall {
        match self {
            PledgePlan::Approve(call) | PledgePlan::Pledge(call) => call,
        }
    }

    pub fn is_approval(&self) -> bool {
        matches!(self, PledgePlan::Approve(_))
    }

    /// Hand the planned call to the wallet. Fire-and-forget.
    pub fn submit(self, writer: &dyn ContractWriter) {
        let call = match self {
            PledgePlan::Approve(call) | PledgePlan::Pledge(call) => call,
        };
        writer.submit(call);
    }
}

/// Plan a pledge of `amount` (ether text) to campaign `campaign_id`.
///
/// An unknown allowance (read still pending) counts as zero.
///
/// # Errors
/// - `WalletNotConnected` before anything else is checked
/// - `InvalidAmount` for unparseable or zero amounts
pub fn plan_pledge(
    config: &DappConfig,
    wallet: &WalletSession,
    campaign_id: u64,
    amount: &str,
    allowance: Option<&WeiAmount>,
) -> Result<PledgePlan> {
    wallet.require_connected()?;

    let amount_wei = parse_ether(amount)?;
    if amount_wei.is_zero() {
        return Err(Error::InvalidAmount("pledge amount must be positive".into()));
    }

    let zero = WeiAmount::zero();
    let allowance = allowance.unwrap_or(&zero);

    let plan = if allowance < &amount_wei {
        PledgePlan::Approve(WriteCall {
            contract: config.token_address.clone(),
            function: WriteFunction::Approve,
            args: vec![
                Value::String(config.crowdfunding_address.to_string()),
                Value::String(amount_wei.to_string()),
            ],
        })
    } else {
        PledgePlan::Pledge(WriteCall {
            contract: config.crowdfunding_address.clone(),
            function: WriteFunction::Pledge,
            args: vec![Value::from(campaign_id), Value::String(amount_wei.to_string())],
        })
    };

    tracing::info!(
        campaign_id,
        amount = %amount_wei,
        %allowance,
        step = plan.call().function.name(),
        "pledge planned"
    );
    Ok(plan)
}
