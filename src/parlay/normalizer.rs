use serde_json::Value;

use crate::models::{Selection, DEFAULT_MARKET, DEFAULT_SPORT};

// Accepted field names, canonical first
const MATCH_ID: &[&str] = &["match_id", "matchId", "id"];
const HOME_TEAM: &[&str] = &["home_team", "homeTeam"];
const AWAY_TEAM: &[&str] = &["away_team", "awayTeam"];
const SELECTION_NAME: &[&str] = &["selection_name", "selection", "selectionName"];
const PRICE: &[&str] = &["price", "odds"];
const MATCH_NAME: &[&str] = &["match_name", "matchName"];
const MARKET: &[&str] = &["market"];
const LEAGUE: &[&str] = &["league"];
const SPORT: &[&str] = &["sport"];

/// Build a canonical selection from a loosely-typed payload.
///
/// Every field is resolved canonical name first, then its aliases, then the
/// default. A price that cannot be read as a number comes back as NaN; the
/// caller decides whether to accept it.
pub fn normalize(input: &Value) -> Selection {
    let home_team = text(input, HOME_TEAM).unwrap_or_default();
    let away_team = text(input, AWAY_TEAM).unwrap_or_default();

    let match_name =
        text(input, MATCH_NAME).unwrap_or_else(|| format!("{} vs {}", home_team, away_team));

    Selection {
        match_id: text(input, MATCH_ID).unwrap_or_default(),
        selection_name: text(input, SELECTION_NAME).unwrap_or_default(),
        price: lookup(input, PRICE).map(coerce_price).unwrap_or(f64::NAN),
        market: text(input, MARKET).unwrap_or_else(|| DEFAULT_MARKET.to_string()),
        league: text(input, LEAGUE).unwrap_or_default(),
        sport: text(input, SPORT).unwrap_or_else(|| DEFAULT_SPORT.to_string()),
        home_team,
        away_team,
        match_name,
    }
}

/// First present value among `names`; null and empty strings count as absent
fn lookup<'a>(input: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().filter_map(|name| input.get(*name)).find(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

fn text(input: &Value, names: &[&str]) -> Option<String> {
    // Ids arrive as numbers from some call sites
    lookup(input, names).and_then(|v| match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn coerce_price(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_payload() {
        let s = normalize(&json!({
            "match_id": "fd_1",
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "selection_name": "Home",
            "price": 1.85,
            "market": "1X2",
            "league": "Premier League",
            "sport": "football",
            "match_name": "Arsenal vs Chelsea"
        }));

        assert_eq!(s.match_id, "fd_1");
        assert_eq!(s.selection_name, "Home");
        assert_eq!(s.price, 1.85);
        assert_eq!(s.league, "Premier League");
        assert_eq!(s.match_name, "Arsenal vs Chelsea");
    }

    #[test]
    fn test_aliases_and_defaults() {
        let s = normalize(&json!({
            "matchId": 42,
            "homeTeam": "Lakers",
            "awayTeam": "Celtics",
            "selection": "Away",
            "odds": "2.10"
        }));

        assert_eq!(s.match_id, "42");
        assert_eq!(s.home_team, "Lakers");
        assert_eq!(s.selection_name, "Away");
        assert_eq!(s.price, 2.10);
        assert_eq!(s.market, "1X2");
        assert_eq!(s.league, "");
        assert_eq!(s.sport, "football");
        assert_eq!(s.match_name, "Lakers vs Celtics");
    }

    #[test]
    fn test_canonical_name_wins_over_alias() {
        let s = normalize(&json!({
            "match_id": "a",
            "matchId": "b",
            "selection_name": "Draw",
            "selection": "Home",
            "price": 3.4,
            "odds": 9.9
        }));

        assert_eq!(s.match_id, "a");
        assert_eq!(s.selection_name, "Draw");
        assert_eq!(s.price, 3.4);
    }

    #[test]
    fn test_empty_canonical_falls_back() {
        let s = normalize(&json!({
            "match_id": "",
            "matchId": "m2",
            "price": null,
            "odds": 1.5
        }));

        assert_eq!(s.match_id, "m2");
        assert_eq!(s.price, 1.5);
    }

    #[test]
    fn test_unreadable_price_is_kept_as_nan() {
        assert!(normalize(&json!({"match_id": "x", "price": "n/a"})).price.is_nan());
        assert!(normalize(&json!({"match_id": "x"})).price.is_nan());
        // A match record's odds map is not a price
        assert!(normalize(&json!({"id": "x", "odds": {"Match Winner": {}}})).price.is_nan());
        assert_eq!(normalize(&json!({"match_id": "x", "price": -2})).price, -2.0);
    }

    #[test]
    fn test_match_record_shape() {
        let s = normalize(&json!({
            "id": "bb_9",
            "home_team": "Fenerbahce",
            "away_team": "Monaco",
            "league": "EuroLeague",
            "sport": "basketball"
        }));

        assert_eq!(s.match_id, "bb_9");
        assert_eq!(s.sport, "basketball");
        assert_eq!(s.match_name, "Fenerbahce vs Monaco");
    }

    #[test]
    fn test_non_object_input() {
        let s = normalize(&json!("garbage"));
        assert_eq!(s.match_id, "");
        assert!(s.price.is_nan());
        assert_eq!(s.match_name, " vs ");
    }
}
