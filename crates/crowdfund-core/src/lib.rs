//! Crowdfund Core - presentation logic for the crowdfunding dapp
//!
//! All campaign state and business rules live in the smart contract. This
//! crate owns what the frontend does with them: turning raw contract reads
//! into a display model, and turning user input into contract calls.
//!
//! # Architecture
//!
//! ```text
//! contract read → RawCampaignRecord → Normalizer → CanonicalCampaign → CampaignStore → views
//!                                                                         ↑
//! user input → pledge / launch planners → WriteCall → contract write      │
//!                                                     (wallet)      refresh
//! ```
//!
//! # Guarantees
//!
//! - **Total**: normalization never fails; bad fields degrade to defaults
//! - **Exact**: wei amounts are kept as exact integers next to their float
//!   ether value
//! - **Blocking**: no call is planned without a connected wallet

pub mod boundary;
pub mod campaign;
pub mod category;
pub mod config;
pub mod error;
pub mod launch;
pub mod pledge;
pub mod record;
pub mod store;
pub mod units;
pub mod wallet;

pub use boundary::{ContractReader, ContractWriter, ReadCall, ReadState, WriteCall, WriteFunction};
pub use campaign::{
    days_left, funding_percentage, normalize_campaign, normalize_campaigns, CampaignCard,
    CanonicalCampaign,
};
pub use config::DappConfig;
pub use error::{Error, Result};
pub use launch::{check_launch, plan_launch, LaunchForm};
pub use pledge::{plan_pledge, PledgePlan};
pub use store::CampaignStore;
pub use units::{format_ether, normalize_amount, parse_ether, WeiAmount};
pub use wallet::{Address, WalletSession};
