pub mod odds;
pub mod team_resolver;

pub use odds::{extract_match_odds, market_prices, pick_payload, BetPreset, MarketPrice, MatchOdds, BET_PRESETS};
pub use team_resolver::TeamResolver;
