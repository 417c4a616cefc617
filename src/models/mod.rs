pub mod parlay;
pub mod selection;
pub mod sport;

pub use parlay::{ParlayQuote, ParlayRequest, ParlayTotals, RemoteParlay, RiskLevel, SavedParlay};
pub use selection::{ParlayItem, Selection, DEFAULT_MARKET, DEFAULT_SPORT};
pub use sport::{AiAnalysis, HeadToHead, League, LeagueTable, Match, MatchDetail, Standing};
