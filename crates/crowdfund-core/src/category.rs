//! Campaign categories and list filtering

use std::fmt;

use crate::campaign::CanonicalCampaign;

/// Filter value that matches every campaign
pub const ALL_CATEGORIES: &str = "All";

/// Known campaign category.
///
/// Categories are free text on-chain; anything unrecognized is kept as
/// [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Education,
    Community,
    Technology,
    Environment,
    ArtsAndCulture,
    Wellness,
    Other(String),
}

impl Category {
    /// Categories offered when launching a campaign, in menu order
    pub const KNOWN: [Category; 6] = [
        Category::Education,
        Category::Community,
        Category::Technology,
        Category::Environment,
        Category::ArtsAndCulture,
        Category::Wellness,
    ];

    pub fn parse(text: &str) -> Category {
        match text {
            "Education" => Category::Education,
            "Community" => Category::Community,
            "Technology" => Category::Technology,
            "Environment" => Category::Environment,
            "Arts & Culture" => Category::ArtsAndCulture,
            "Wellness" => Category::Wellness,
            other => Category::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Education => "Education",
            Category::Community => "Community",
            Category::Technology => "Technology",
            Category::Environment => "Environment",
            Category::ArtsAndCulture => "Arts & Culture",
            Category::Wellness => "Wellness",
            Category::Other(text) => text,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Campaigns whose category text equals `selected`; `"All"` keeps everything.
pub fn filter_by_category<'a>(
    campaigns: &'a [CanonicalCampaign],
    selected: &str,
) -> Vec<&'a CanonicalCampaign> {
    campaigns
        .iter()
        .filter(|c| selected == ALL_CATEGORIES || c.category == selected)
        .collect()
}

/// Distinct categories present in `campaigns`, in first-seen order.
pub fn categories_of(campaigns: &[CanonicalCampaign]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for campaign in campaigns {
        if !seen.iter().any(|c| c == &campaign.category) {
            seen.push(campaign.category.clone());
        }
    }
    seen
}
