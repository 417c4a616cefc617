use serde::{Deserialize, Serialize};

/// Default market label when a caller does not name one
pub const DEFAULT_MARKET: &str = "1X2";

/// Default sport when a caller does not name one
pub const DEFAULT_SPORT: &str = "football";

/// One leg of a parlay: a single outcome chosen on a single match
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    /// Identifier of the underlying match; unique within a slip
    pub match_id: String,

    /// Home team display name
    pub home_team: String,

    /// Away team display name
    pub away_team: String,

    /// Chosen outcome label (e.g. "Home", "Draw", "Over 2.5")
    pub selection_name: String,

    /// Decimal odds
    pub price: f64,

    /// Display string, "{home} vs {away}" unless supplied
    pub match_name: String,

    /// Market category (e.g. "1X2", "Over/Under", "BTTS")
    pub market: String,

    /// League the match belongs to
    pub league: String,

    /// Sport the match belongs to
    pub sport: String,
}

impl Selection {
    /// Whether the price can take part in an accumulator
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    /// Shape used by the remote parlay endpoints
    pub fn to_wire(&self) -> ParlayItem {
        ParlayItem {
            match_id: self.match_id.clone(),
            selection: self.selection_name.clone(),
            odds: self.price,
            match_name: self.match_name.clone(),
        }
    }
}

/// Parlay leg as exchanged with the backend API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParlayItem {
    pub match_id: String,
    pub selection: String,
    pub odds: f64,
    pub match_name: String,
}
