use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::matching::TeamResolver;
use crate::models::{Match, DEFAULT_MARKET};

/// Upstream market names treated as the match-winner market
const MATCH_WINNER_MARKETS: &[&str] = &["match winner", "h2h", "1x2", "moneyline"];

/// Canonical match-winner prices
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MatchOdds {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

impl MatchOdds {
    /// Both sides priced; draw is optional (no draw in basketball)
    pub fn is_complete(&self) -> bool {
        self.home.is_some() && self.away.is_some()
    }
}

/// One bettable outcome of a match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPrice {
    /// Short market label (e.g. "1X2", "Over/Under", "BTTS")
    pub market: String,
    pub outcome: String,
    pub price: f64,
}

/// Extract match-winner odds from either payload shape the API produces.
///
/// Keyed shape: `{"Match Winner": {"Home": "1.85", "Draw": "3.40", "Away": "4.10"}}`.
/// Bookmaker shape: `[{"markets": [{"key": "h2h", "outcomes": [{"name", "price"}]}]}]`,
/// optionally wrapped as `{"bookmakers": [...]}`. Bookmaker outcomes are assigned by
/// team name, never by position.
pub fn extract_match_odds(fixture: &Match, resolver: &TeamResolver) -> Option<MatchOdds> {
    let odds = fixture.odds.as_ref()?;

    let extracted = match bookmakers(odds) {
        Some(books) => books
            .iter()
            .map(|book| from_bookmaker(book, fixture, resolver))
            .find(MatchOdds::is_complete),
        None => odds.as_object().and_then(|markets| from_keyed(markets, fixture, resolver)),
    };

    if extracted.is_none() {
        debug!("No usable match-winner odds for {}", fixture.id);
    }
    extracted
}

/// Flatten every priced outcome of a match into `(market, outcome, price)`
pub fn market_prices(fixture: &Match, resolver: &TeamResolver) -> Vec<MarketPrice> {
    let Some(odds) = fixture.odds.as_ref() else {
        return Vec::new();
    };

    if bookmakers(odds).is_none() {
        if let Some(markets) = odds.as_object() {
            return markets
                .iter()
                .filter_map(|(name, outcomes)| Some((market_label(name), outcomes.as_object()?)))
                .flat_map(|(label, outcomes)| {
                    outcomes.iter().filter_map(move |(outcome, price)| {
                        Some(MarketPrice {
                            market: label.clone(),
                            outcome: outcome.clone(),
                            price: price_value(price)?,
                        })
                    })
                })
                .collect();
        }
    }

    let Some(odds) = extract_match_odds(fixture, resolver) else {
        return Vec::new();
    };

    [("Home", odds.home), ("Draw", odds.draw), ("Away", odds.away)]
        .into_iter()
        .filter_map(|(outcome, price)| {
            Some(MarketPrice {
                market: market_label("h2h"),
                outcome: outcome.to_string(),
                price: price?,
            })
        })
        .collect()
}

/// A bet type offered even when the API lists no price for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetPreset {
    pub key: &'static str,
    pub label: &'static str,
    pub market: &'static str,
    /// Outcome label the API uses for the same bet
    pub outcome: &'static str,
    pub default_price: f64,
}

pub const BET_PRESETS: &[BetPreset] = &[
    BetPreset { key: "home_win", label: "Home Win", market: "1X2", outcome: "Home", default_price: 1.85 },
    BetPreset { key: "away_win", label: "Away Win", market: "1X2", outcome: "Away", default_price: 2.10 },
    BetPreset { key: "draw", label: "Draw", market: "1X2", outcome: "Draw", default_price: 3.40 },
    BetPreset { key: "over_2.5", label: "Over 2.5 Goals", market: "Over/Under", outcome: "Over", default_price: 1.75 },
    BetPreset { key: "under_2.5", label: "Under 2.5 Goals", market: "Over/Under", outcome: "Under", default_price: 2.05 },
    BetPreset { key: "btts_yes", label: "Both Teams Score - Yes", market: "BTTS", outcome: "Yes", default_price: 1.80 },
    BetPreset { key: "btts_no", label: "Both Teams Score - No", market: "BTTS", outcome: "No", default_price: 1.95 },
];

/// Preset by key (`over_2.5`) or label (`Over 2.5 Goals`), case-insensitively
pub fn find_preset(name: &str) -> Option<&'static BetPreset> {
    let name = name.trim();
    BET_PRESETS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(name) || p.label.eq_ignore_ascii_case(name))
}

/// Build the add payload for `outcome` on `fixture`.
///
/// A listed price wins; otherwise a preset supplies the market and a default
/// price. `custom_price` replaces whichever price was found and is passed on
/// raw, so the slip applies its usual price check. An outcome that is neither
/// listed nor a preset needs a custom price.
pub fn pick_payload(
    fixture: &Match,
    prices: &[MarketPrice],
    outcome: &str,
    market: Option<&str>,
    custom_price: Option<&str>,
) -> Option<Value> {
    let chosen = match find_price(prices, outcome, market) {
        Some(listed) => listed.clone(),
        None => match find_preset(outcome) {
            Some(preset) => find_price(prices, preset.outcome, Some(preset.market))
                .cloned()
                .unwrap_or(MarketPrice {
                    market: preset.market.to_string(),
                    outcome: preset.label.to_string(),
                    price: preset.default_price,
                }),
            None => MarketPrice {
                market: market.unwrap_or(DEFAULT_MARKET).to_string(),
                outcome: outcome.trim().to_string(),
                price: 0.0,
            },
        },
    };

    let mut payload = selection_payload(fixture, &chosen);
    match custom_price {
        Some(raw) => payload["price"] = Value::String(raw.trim().to_string()),
        None if chosen.price <= 0.0 => return None,
        None => {}
    }
    Some(payload)
}

/// Find an outcome by label, case-insensitively, optionally within one market
pub fn find_price<'a>(
    prices: &'a [MarketPrice],
    outcome: &str,
    market: Option<&str>,
) -> Option<&'a MarketPrice> {
    prices.iter().find(|p| {
        p.outcome.eq_ignore_ascii_case(outcome)
            && market.map_or(true, |m| p.market.eq_ignore_ascii_case(m))
    })
}

/// Short label for an upstream market name
pub fn market_label(upstream: &str) -> String {
    let lower = upstream.trim().to_lowercase();

    if MATCH_WINNER_MARKETS.contains(&lower.as_str()) {
        "1X2".to_string()
    } else if lower.starts_with("over/under") || lower == "totals" {
        "Over/Under".to_string()
    } else if lower.starts_with("both teams") || lower == "btts" {
        "BTTS".to_string()
    } else {
        upstream.trim().to_string()
    }
}

/// Payload an odds control hands to the parlay slip
pub fn selection_payload(fixture: &Match, price: &MarketPrice) -> Value {
    json!({
        "match_id": fixture.id,
        "home_team": fixture.home_team,
        "away_team": fixture.away_team,
        "selection_name": price.outcome,
        "price": price.price,
        "market": price.market,
        "league": fixture.league,
        "sport": fixture.sport,
        "match_name": fixture.display_name(),
    })
}

fn bookmakers(odds: &Value) -> Option<&Vec<Value>> {
    match odds {
        Value::Array(books) => Some(books),
        Value::Object(map) => map.get("bookmakers").and_then(Value::as_array),
        _ => None,
    }
}

fn from_keyed(
    markets: &Map<String, Value>,
    fixture: &Match,
    resolver: &TeamResolver,
) -> Option<MatchOdds> {
    let outcomes = markets
        .iter()
        .find(|(name, _)| market_label(name) == "1X2")
        .and_then(|(_, outcomes)| outcomes.as_object())?;

    let mut odds = MatchOdds::default();
    for (label, price) in outcomes {
        assign(&mut odds, label, price_value(price), fixture, resolver);
    }

    odds.is_complete().then_some(odds)
}

fn from_bookmaker(book: &Value, fixture: &Match, resolver: &TeamResolver) -> MatchOdds {
    let mut odds = MatchOdds::default();

    let market = book
        .get("markets")
        .and_then(Value::as_array)
        .and_then(|markets| {
            markets.iter().find(|m| {
                m.get("key")
                    .and_then(Value::as_str)
                    .map_or(false, |key| market_label(key) == "1X2")
            })
        });

    let outcomes = market
        .and_then(|m| m.get("outcomes"))
        .and_then(Value::as_array);

    for outcome in outcomes.into_iter().flatten() {
        let Some(name) = outcome.get("name").and_then(Value::as_str) else {
            continue;
        };
        let price = outcome.get("price").and_then(price_value);
        assign(&mut odds, name, price, fixture, resolver);
    }

    odds
}

/// Place a price by outcome label or team name
fn assign(
    odds: &mut MatchOdds,
    label: &str,
    price: Option<f64>,
    fixture: &Match,
    resolver: &TeamResolver,
) {
    let Some(price) = price else {
        return;
    };

    let lower = label.trim().to_lowercase();
    if lower == "home" || lower == "1" || resolver.names_match(label, &fixture.home_team) {
        odds.home = Some(price);
    } else if lower == "away" || lower == "2" || resolver.names_match(label, &fixture.away_team) {
        odds.away = Some(price);
    } else if lower == "draw" || lower == "x" || lower == "tie" {
        odds.draw = Some(price);
    }
}

/// Decimal price from a number or numeric string; only positive finite values
fn price_value(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };

    (price.is_finite() && price > 0.0).then_some(price)
}
