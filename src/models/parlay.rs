use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::selection::{ParlayItem, Selection};

/// Combined economics of the current slip, rounded for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ParlayTotals {
    /// Product of all leg prices (2 dp); 0 for an empty slip
    pub total_odds: f64,

    /// Stake multiplied by the combined odds (2 dp)
    pub potential_return: f64,

    /// Implied win probability in percent (1 dp)
    pub probability: f64,

    /// Qualitative risk of the slip
    pub risk: RiskLevel,
}

/// Risk classification of a parlay
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// At most 2 legs and probability above 20%
    Low,
    /// At most 4 legs and probability above 10%
    Medium,
    /// Everything else
    High,
}

impl RiskLevel {
    /// Classify from leg count and unrounded probability (percent).
    /// LOW is tried first, then MEDIUM, then HIGH as the fallback.
    pub fn classify(selection_count: usize, probability: f64) -> Self {
        if selection_count <= 2 && probability > 20.0 {
            RiskLevel::Low
        } else if selection_count <= 4 && probability > 10.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = anyhow::Error;

    /// Accepts "LOW" / "MEDIUM" / "HIGH" in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High]
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown risk level '{}'", s))
    }
}

/// Request body for the parlay endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ParlayRequest {
    pub items: Vec<ParlayItem>,
}

impl ParlayRequest {
    pub fn from_selections(selections: &[Selection]) -> Self {
        Self {
            items: selections.iter().map(Selection::to_wire).collect(),
        }
    }
}

/// Server-side quote for a parlay
#[derive(Debug, Clone, Deserialize)]
pub struct ParlayQuote {
    pub items: Vec<ParlayItem>,
    pub combined_odds: f64,
    pub probability: f64,
    pub potential_return: f64,
    /// "Low" / "Medium" / "High"
    pub risk_assessment: String,
}

/// Parlay as stored by the backend after saving
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteParlay {
    pub id: String,
    pub items: Vec<ParlayItem>,
    pub combined_odds: f64,
    pub probability: f64,
    pub created_at: String,
}

/// Saved slip kept in the local history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedParlay {
    /// Local row id
    pub id: Option<i64>,

    /// Id assigned by the backend, if the save reached it
    pub remote_id: Option<String>,

    /// Legs at the time of saving
    pub selections: Vec<Selection>,

    pub stake: f64,

    pub totals: ParlayTotals,

    pub created_at: DateTime<Utc>,
}
