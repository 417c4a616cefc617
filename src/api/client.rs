use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{
    AiAnalysis, League, LeagueTable, Match, MatchDetail, ParlayQuote, ParlayRequest, RemoteParlay,
    Selection,
};

/// Client for the match, odds, standings and analysis API
pub struct BetsApiClient {
    client: Client,
    base_url: String,
}

/// Optional filters for the match listing
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    /// League code (e.g. "PL", "EURO")
    pub league: Option<String>,
    /// "football" or "basketball"
    pub sport: Option<String>,
    /// Upstream status, e.g. "SCHEDULED"
    pub status: Option<String>,
}

impl MatchFilter {
    fn query_string(&self) -> String {
        let params: Vec<String> = [
            ("league", &self.league),
            ("sport", &self.sport),
            ("status", &self.status),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Match facts sent for an on-demand analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub id: String,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub home_form: Vec<String>,
    pub away_form: Vec<String>,
}

impl From<&MatchDetail> for AnalysisRequest {
    fn from(detail: &MatchDetail) -> Self {
        Self {
            id: detail.fixture.id.clone(),
            sport: detail.fixture.sport.clone(),
            home_team: detail.fixture.home_team.clone(),
            away_team: detail.fixture.away_team.clone(),
            league: detail.fixture.league.clone(),
            home_form: detail.home_form.clone(),
            away_form: detail.away_form.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LeaguesResponse {
    leagues: Vec<League>,
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    matches: Vec<Match>,
    #[serde(default)]
    total: usize,
}

#[derive(Debug, Deserialize)]
struct ParlaysResponse {
    parlays: Vec<RemoteParlay>,
}

impl BetsApiClient {
    /// Create a new client for the API served at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("{}/api", base_url.trim_end_matches('/')),
        })
    }

    /// Fetch all leagues the API serves
    pub async fn fetch_leagues(&self) -> Result<Vec<League>> {
        let response = self.get("/leagues").await.context("Failed to fetch leagues")?;
        let body: LeaguesResponse = read_json(response, "leagues").await?;

        debug!("API returned {} leagues", body.leagues.len());
        Ok(body.leagues)
    }

    /// Fetch upcoming matches, sorted by kickoff
    pub async fn fetch_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>> {
        let path = format!("/matches{}", filter.query_string());
        let response = self.get(&path).await.context("Failed to fetch matches")?;
        let body: MatchesResponse = read_json(response, "matches").await?;

        info!(
            "Fetched {} matches (API total: {})",
            body.matches.len(),
            body.total
        );
        Ok(body.matches)
    }

    /// Fetch a match with head-to-head, form and AI analysis
    pub async fn fetch_match(&self, match_id: &str) -> Result<Option<MatchDetail>> {
        let path = format!("/matches/{}", urlencoding::encode(match_id));
        let response = self.get(&path).await.context("Failed to fetch match")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let detail: MatchDetail = read_json(response, "match").await?;
        Ok(Some(detail))
    }

    /// Request a fresh AI analysis
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AiAnalysis> {
        let response = self
            .post("/analyze", request)
            .await
            .context("Failed to request analysis")?;

        read_json(response, "analysis").await
    }

    /// Fetch a league table
    pub async fn fetch_standings(&self, league_code: &str) -> Result<Option<LeagueTable>> {
        let path = format!("/standings/{}", urlencoding::encode(league_code));
        let response = self.get(&path).await.context("Failed to fetch standings")?;

        if response.status() == StatusCode::NOT_FOUND {
            warn!("Unknown league: {}", league_code);
            return Ok(None);
        }

        let table: LeagueTable = read_json(response, "standings").await?;
        Ok(Some(table))
    }

    /// Ask the API to price a parlay
    pub async fn calculate_parlay(&self, selections: &[Selection]) -> Result<ParlayQuote> {
        let request = ParlayRequest::from_selections(selections);
        let response = self
            .post("/parlay/calculate", &request)
            .await
            .context("Failed to calculate parlay")?;

        read_json(response, "parlay quote").await
    }

    /// Save a parlay; this is how a bet is "placed"
    pub async fn save_parlay(&self, selections: &[Selection]) -> Result<RemoteParlay> {
        let request = ParlayRequest::from_selections(selections);
        let response = self
            .post("/parlays", &request)
            .await
            .context("Failed to save parlay")?;

        let saved: RemoteParlay = read_json(response, "saved parlay").await?;
        info!("Parlay saved remotely with id {}", saved.id);
        Ok(saved)
    }

    /// List parlays saved on the backend
    pub async fn fetch_saved_parlays(&self) -> Result<Vec<RemoteParlay>> {
        let response = self
            .get("/parlays")
            .await
            .context("Failed to fetch saved parlays")?;
        let body: ParlaysResponse = read_json(response, "saved parlays").await?;

        Ok(body.parlays)
    }

    async fn get(&self, path: &str) -> reqwest::Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        self.client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> reqwest::Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        self.client
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
    }
}

/// Decode a JSON body, turning non-success statuses into errors
async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        anyhow::bail!("API error fetching {}: {} - {}", what, status, text);
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string() {
        assert_eq!(MatchFilter::default().query_string(), "");

        let filter = MatchFilter {
            league: Some("PL".to_string()),
            sport: None,
            status: Some("SCHEDULED".to_string()),
        };
        assert_eq!(filter.query_string(), "?league=PL&status=SCHEDULED");

        let filter = MatchFilter {
            sport: Some("foot ball".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.query_string(), "?sport=foot%20ball");
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = BetsApiClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_parlay_request_wire_shape() {
        let selection = crate::parlay::normalize(&serde_json::json!({
            "match_id": "fd_1",
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "selection_name": "Home",
            "price": 1.85
        }));

        let body = serde_json::to_value(ParlayRequest::from_selections(&[selection])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"items": [{
                "match_id": "fd_1",
                "selection": "Home",
                "odds": 1.85,
                "match_name": "Arsenal vs Chelsea"
            }]})
        );
    }
}
