//! Campaign normalizer: converts raw contract records to the display model
//!
//! A [`CanonicalCampaign`] is rebuilt from scratch every time the contract
//! boundary delivers data. It is never patched in place.
//!
//! # Guarantees
//!
//! - **Total**: every input normalizes; bad fields become `0`, `""` or `false`
//! - **Shape-independent**: a tuple and an object holding the same values
//!   normalize identically
//! - **Pure**: output depends only on the record and the `now` argument

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::Category;
use crate::record::{CampaignField, RawCampaignRecord, RecordShape};
use crate::units::{format_display, format_ether, WeiAmount};

pub const SECONDS_PER_DAY: u64 = 86_400;

/// A campaign ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCampaign {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub creator: String,
    /// Exact goal in wei; zero if the record held a negative value
    pub goal: WeiAmount,
    /// Exact pledged total in wei; zero if the record held a negative value
    pub pledged: WeiAmount,
    /// Goal in ether, sign preserved; display and arithmetic only
    #[serde(rename = "goalNumber")]
    pub goal_ether: f64,
    /// Pledged total in ether; display and arithmetic only
    #[serde(rename = "pledgedNumber")]
    pub pledged_ether: f64,
    /// Deadline, unix seconds
    pub end_at: u64,
    pub days_left: u64,
    pub claimed: bool,
}

impl CanonicalCampaign {
    pub fn funding_percentage(&self) -> f64 {
        funding_percentage(self.pledged_ether, self.goal_ether)
    }

    pub fn category_kind(&self) -> Category {
        Category::parse(&self.category)
    }

    pub fn is_ended(&self) -> bool {
        self.days_left == 0
    }

    /// Exact raised amount for the detail view (`"1200"`, `"0.5"`)
    pub fn raised_text(&self) -> String {
        format_ether(&self.pledged)
    }

    /// Exact goal for the detail view
    pub fn goal_text(&self) -> String {
        format_ether(&self.goal)
    }
}

/// List-view rendering of one campaign
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCard {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub raised: String,
    pub goal: String,
    pub percentage: f64,
    pub days_left: u64,
}

impl From<&CanonicalCampaign> for CampaignCard {
    fn from(campaign: &CanonicalCampaign) -> Self {
        CampaignCard {
            id: campaign.id,
            title: campaign.title.clone(),
            description: campaign.description.clone(),
            category: campaign.category.clone(),
            raised: format_display(campaign.pledged_ether),
            goal: format_display(campaign.goal_ether),
            percentage: campaign.funding_percentage(),
            days_left: campaign.days_left,
        }
    }
}

// ── Public API ─────────────────────────────────────────────

/// Normalize one raw record (tuple or object) at time `now` (unix seconds).
pub fn normalize_campaign(raw: &Value, now: u64) -> CanonicalCampaign {
    let record = RawCampaignRecord::new(raw);
    if record.shape() == RecordShape::Unrecognized {
        tracing::debug!(%raw, "campaign record is neither tuple nor object, using defaults");
    }

    let goal = record.signed_amount(CampaignField::Goal);
    let pledged = record.signed_amount(CampaignField::Pledged);
    if goal.negative || pledged.negative {
        tracing::debug!(%goal, %pledged, "negative campaign amount");
    }
    let end_at = record.integer(CampaignField::EndAt);

    CanonicalCampaign {
        id: record.integer(CampaignField::Id),
        title: record.text(CampaignField::Title),
        description: record.text(CampaignField::Description),
        category: record.text(CampaignField::Category),
        creator: record.text(CampaignField::Creator),
        goal_ether: goal.to_ether(),
        pledged_ether: pledged.to_ether(),
        goal: goal.non_negative(),
        pledged: pledged.non_negative(),
        end_at,
        days_left: days_left(end_at, now),
        claimed: record.flag(CampaignField::Claimed),
    }
}

/// Normalize a list result (`getAllCampaigns`).
///
/// A non-array input yields an empty list; a bad element still normalizes
/// (to defaults) without affecting its neighbours.
pub fn normalize_campaigns(raw: &Value, now: u64) -> Vec<CanonicalCampaign> {
    match raw {
        Value::Array(items) => items.iter().map(|item| normalize_campaign(item, now)).collect(),
        other => {
            tracing::warn!(kind = value_kind(other), "campaign list is not an array");
            Vec::new()
        }
    }
}

/// [`normalize_campaign`] against the system clock
pub fn normalize_campaign_now(raw: &Value) -> CanonicalCampaign {
    normalize_campaign(raw, unix_now())
}

/// [`normalize_campaigns`] against the system clock
pub fn normalize_campaigns_now(raw: &Value) -> Vec<CanonicalCampaign> {
    normalize_campaigns(raw, unix_now())
}

/// Whole days until `end_at`, rounded up, never negative.
pub fn days_left(end_at: u64, now: u64) -> u64 {
    end_at.saturating_sub(now).div_ceil(SECONDS_PER_DAY)
}

/// `pledged / goal * 100`, or `0` when the goal is zero.
pub fn funding_percentage(pledged_ether: f64, goal_ether: f64) -> f64 {
    if goal_ether == 0.0 {
        return 0.0;
    }
    let percentage = pledged_ether / goal_ether * 100.0;
    if percentage.is_finite() {
        percentage
    } else {
        0.0
    }
}

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
