use tracing::warn;

use crate::models::{ParlayTotals, RiskLevel, Selection};

/// Stake used when the caller supplies nothing usable
pub const DEFAULT_STAKE: f64 = 10.0;

/// Compute the combined economics of a slip for `stake`.
///
/// An empty slip reports all-zero totals rather than the empty product.
/// Risk is classified from the unrounded probability; rounding only touches
/// the reported figures. A product too large for `f64` saturates at
/// `f64::MAX` so totals stay finite.
pub fn compute_totals(selections: &[Selection], stake: f64) -> ParlayTotals {
    if selections.is_empty() {
        return ParlayTotals {
            total_odds: 0.0,
            potential_return: 0.0,
            probability: 0.0,
            risk: RiskLevel::classify(0, 0.0),
        };
    }

    let mut total_odds = combined_odds(selections);
    if !total_odds.is_finite() {
        warn!("Combined odds overflowed across {} legs, saturating", selections.len());
        total_odds = saturate(total_odds);
    }
    let potential_return = saturate(total_odds * stake);
    let probability = implied_probability(total_odds);

    ParlayTotals {
        total_odds: round_to(total_odds, 2),
        potential_return: round_to(potential_return, 2),
        probability: round_to(probability, 1),
        risk: RiskLevel::classify(selections.len(), probability),
    }
}

/// Unrounded product of all leg prices (1.0 for no legs)
pub fn combined_odds(selections: &[Selection]) -> f64 {
    selections.iter().map(|s| s.price).product()
}

/// Implied win probability in percent; 0 when there are no odds
pub fn implied_probability(total_odds: f64) -> f64 {
    if total_odds > 0.0 {
        100.0 / total_odds
    } else {
        0.0
    }
}

/// Turn raw stake text into a usable stake, falling back to `default`
pub fn parse_stake(raw: &str, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(stake) if stake.is_finite() && stake > 0.0 => stake,
        _ => default,
    }
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Too large to carry any decimals
        return value;
    }
    scaled.round() / factor
}

fn saturate(value: f64) -> f64 {
    if value.is_infinite() {
        f64::MAX.copysign(value)
    } else {
        value
    }
}
