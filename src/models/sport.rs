use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fixture as listed by the data API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Prefixed identifier (e.g. "fd_12345", "bb_678")
    pub id: String,

    #[serde(default)]
    pub sport: String,

    #[serde(default)]
    pub league: String,

    #[serde(default)]
    pub league_code: String,

    pub home_team: String,

    pub away_team: String,

    #[serde(default)]
    pub home_logo: Option<String>,

    #[serde(default)]
    pub away_logo: Option<String>,

    /// ISO 8601 kickoff time, empty when unknown
    #[serde(default)]
    pub match_date: String,

    /// Short status code (NS, LIVE, HT, FT, ...)
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub home_score: Option<i32>,

    #[serde(default)]
    pub away_score: Option<i32>,

    #[serde(default)]
    pub has_odds: bool,

    /// Raw odds payload; see `matching::odds` for the accepted shapes
    #[serde(default)]
    pub odds: Option<serde_json::Value>,
}

impl Match {
    pub fn display_name(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Kickoff time, if the API supplied a parseable one
    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.match_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Match with head-to-head history, recent form and AI analysis
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub fixture: Match,

    #[serde(default)]
    pub head_to_head: Vec<HeadToHead>,

    /// Last results, most recent first ("W", "D", "L")
    #[serde(default)]
    pub home_form: Vec<String>,

    #[serde(default)]
    pub away_form: Vec<String>,

    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
}

/// Previous meeting between the two teams
#[derive(Debug, Clone, Deserialize)]
pub struct HeadToHead {
    #[serde(default)]
    pub date: String,
    pub home: String,
    pub away: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

/// Model-generated betting insight for a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub prediction: String,

    /// Confidence in percent (0-100)
    pub confidence: f64,

    pub best_bet: String,

    pub reasoning: String,

    /// "low" / "medium" / "high" / "unknown"
    pub risk_level: String,
}

/// Competition available from the data API
#[derive(Debug, Clone, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub sport: String,
}

/// One row of a league table
#[derive(Debug, Clone, Deserialize)]
pub struct Standing {
    pub position: i32,
    pub team: String,
    #[serde(default)]
    pub team_logo: Option<String>,
    pub played: i32,
    pub won: i32,
    #[serde(default)]
    pub drawn: i32,
    pub lost: i32,
    #[serde(default)]
    pub goals_for: i32,
    #[serde(default)]
    pub goals_against: i32,
    #[serde(default)]
    pub goal_difference: i32,
    pub points: i32,
    #[serde(default)]
    pub form: Vec<String>,
}

/// League table response
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueTable {
    pub league: String,
    pub standings: Vec<Standing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_from_api_json() {
        let json = r#"{
            "id": "fd_1001",
            "sport": "football",
            "league": "Premier League",
            "league_id": "PL",
            "league_code": "PL",
            "home_team": "Arsenal FC",
            "away_team": "Chelsea FC",
            "match_date": "2026-10-24T14:00:00Z",
            "status": "NS",
            "has_odds": true,
            "odds": {"Match Winner": {"Home": "1.85", "Draw": "3.40", "Away": "4.10"}}
        }"#;

        let m: Match = serde_json::from_str(json).unwrap();
        assert_eq!(m.display_name(), "Arsenal FC vs Chelsea FC");
        assert!(m.kickoff().is_some());
        assert!(m.odds.is_some());
        assert_eq!(m.home_score, None);
    }

    #[test]
    fn test_match_detail_flattens_fixture() {
        let json = r#"{
            "id": "bb_77",
            "home_team": "Real Madrid",
            "away_team": "Olympiacos",
            "home_form": ["W", "W", "L"],
            "ai_analysis": {
                "prediction": "Home Win",
                "confidence": 72.5,
                "best_bet": "Home Win",
                "reasoning": "Strong home record.",
                "risk_level": "medium"
            }
        }"#;

        let detail: MatchDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.fixture.id, "bb_77");
        assert_eq!(detail.home_form.len(), 3);
        assert!(detail.away_form.is_empty());
        assert_eq!(detail.ai_analysis.unwrap().confidence, 72.5);
    }
}
