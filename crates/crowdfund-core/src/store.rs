//! Shared campaign store feeding both the list and the detail view
//!
//! Campaigns are normalized once per delivered read and shared; neither
//! view keeps its own copy. Loaded data is replaced wholesale, never
//! patched field by field.

use serde_json::Value;

use crate::boundary::{ContractReader, ReadCall, ReadState};
use crate::campaign::{normalize_campaign, normalize_campaigns, CanonicalCampaign};
use crate::category::{categories_of, filter_by_category};

/// What the list view renders
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Listing {
    /// Nothing delivered yet; render a placeholder
    #[default]
    Loading,
    Loaded(Vec<CanonicalCampaign>),
    Failed(String),
}

/// What the detail view renders for one id
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailView<'a> {
    Loading,
    NotFound,
    Ready(&'a CanonicalCampaign),
}

#[derive(Debug, Clone, Default)]
pub struct CampaignStore {
    listing: Listing,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Apply a `getAllCampaigns` result.
    ///
    /// `Pending` leaves loaded data in place (or keeps the placeholder)
    /// and normalizes nothing.
    pub fn apply_list(&mut self, state: ReadState<Value>, now: u64) {
        match state {
            ReadState::Pending => {
                if matches!(self.listing, Listing::Failed(_)) {
                    self.listing = Listing::Loading;
                }
            }
            ReadState::Ready(raw) => {
                let campaigns = normalize_campaigns(&raw, now);
                tracing::debug!(count = campaigns.len(), "campaign list loaded");
                self.listing = Listing::Loaded(campaigns);
            }
            ReadState::Failed(message) => {
                tracing::warn!(%message, "campaign list read failed");
                self.listing = Listing::Failed(message);
            }
        }
    }

    /// Apply a single `campaigns(id)` result, replacing the matching
    /// entry or appending it.
    pub fn apply_single(&mut self, state: ReadState<Value>, now: u64) {
        let raw = match state {
            ReadState::Ready(raw) => raw,
            ReadState::Pending => return,
            ReadState::Failed(message) => {
                tracing::warn!(%message, "campaign read failed");
                return;
            }
        };

        let campaign = normalize_campaign(&raw, now);
        match &mut self.listing {
            Listing::Loaded(campaigns) => {
                match campaigns.iter().position(|c| c.id == campaign.id) {
                    Some(index) => campaigns[index] = campaign,
                    None => campaigns.push(campaign),
                }
            }
            listing => *listing = Listing::Loaded(vec![campaign]),
        }
    }

    /// Read every campaign through `reader` and apply the result.
    pub fn refresh(&mut self, reader: &dyn ContractReader, now: u64) {
        let state = reader.read(&ReadCall::AllCampaigns);
        self.apply_list(state, now);
    }

    /// Read one campaign through `reader` and apply the result.
    pub fn refresh_one(&mut self, reader: &dyn ContractReader, id: u64, now: u64) {
        let state = reader.read(&ReadCall::Campaign { id });
        self.apply_single(state, now);
    }

    /// Loaded campaigns; empty while loading or after a failure
    pub fn campaigns(&self) -> &[CanonicalCampaign] {
        match &self.listing {
            Listing::Loaded(campaigns) => campaigns,
            _ => &[],
        }
    }

    pub fn get(&self, id: u64) -> Option<&CanonicalCampaign> {
        self.campaigns().iter().find(|c| c.id == id)
    }

    pub fn detail(&self, id: u64) -> DetailView<'_> {
        match &self.listing {
            Listing::Loaded(_) => self.get(id).map_or(DetailView::NotFound, DetailView::Ready),
            _ => DetailView::Loading,
        }
    }

    pub fn filtered(&self, selected: &str) -> Vec<&CanonicalCampaign> {
        filter_by_category(self.campaigns(), selected)
    }

    pub fn categories(&self) -> Vec<String> {
        categories_of(self.campaigns())
    }
}
