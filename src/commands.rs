use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use parlay_builder::api::{AnalysisRequest, BetsApiClient, MatchFilter};
use parlay_builder::config::Config;
use parlay_builder::db::ParlayHistory;
use parlay_builder::matching::{odds, TeamResolver};
use parlay_builder::models::SavedParlay;
use parlay_builder::parlay::ParlaySession;
use parlay_builder::storage::FileStorage;

/// Match listings, AI analysis and an accumulator slip
#[derive(Parser, Debug)]
#[command(name = "parlay-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List available leagues
    Leagues,

    /// List upcoming matches
    Matches {
        /// League code (e.g. PL)
        #[arg(long)]
        league: Option<String>,

        /// Sport (football, basketball)
        #[arg(long)]
        sport: Option<String>,
    },

    /// Match detail, odds and AI analysis
    Match { match_id: String },

    /// League table
    Standings { league: String },

    /// Add or change the pick for a match
    ///
    /// OUTCOME is a listed outcome ("Home", "Over") or a bet type
    /// (home_win, away_win, draw, over_2.5, under_2.5, btts_yes, btts_no).
    Pick {
        match_id: String,

        outcome: String,

        /// Market to look the outcome up in
        #[arg(long)]
        market: Option<String>,

        /// Custom decimal odds for this leg
        #[arg(long, allow_negative_numbers = true)]
        odds: Option<String>,
    },

    /// Remove a match from the slip
    Remove { match_id: String },

    /// Empty the slip
    Clear,

    /// Show the slip and its totals
    Slip(StakeArg),

    /// Price the slip on the server
    Quote(StakeArg),

    /// Save (place) the current slip
    Save(StakeArg),

    /// Previously saved slips
    History {
        /// Number of slips to show
        #[arg(long, default_value_t = 20)]
        limit: i64,

        /// List slips stored by the backend instead
        #[arg(long)]
        remote: bool,
    },
}

/// Stake shared by the slip commands; unusable input falls back to the default
#[derive(Args, Debug, Clone, PartialEq)]
pub struct StakeArg {
    #[arg(long, allow_negative_numbers = true)]
    pub stake: Option<String>,
}

/// Everything a command needs, built once at start-up
pub struct App {
    config: Config,
    api: BetsApiClient,
    resolver: TeamResolver,
    session: ParlaySession<FileStorage>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let api = BetsApiClient::new(&config.api_base_url, Duration::from_secs(config.http_timeout))?;
        let resolver = load_team_resolver(Path::new(&config.team_aliases_path))?;
        let storage = FileStorage::open(&config.storage_dir)?;
        let session = ParlaySession::with_default_stake(storage, config.default_stake);

        Ok(Self {
            config,
            api,
            resolver,
            session,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Leagues => self.leagues().await,
            Command::Matches { league, sport } => self.matches(league, sport).await,
            Command::Match { match_id } => self.match_detail(&match_id).await,
            Command::Standings { league } => self.standings(&league).await,
            Command::Pick {
                match_id,
                outcome,
                market,
                odds,
            } => {
                self.pick(&match_id, &outcome, market.as_deref(), odds.as_deref())
                    .await
            }
            Command::Remove { match_id } => {
                self.session.store_mut().remove_selection(&match_id);
                self.print_slip();
                Ok(())
            }
            Command::Clear => {
                self.session.store_mut().clear();
                println!("Parlay cleared");
                Ok(())
            }
            Command::Slip(StakeArg { stake }) => {
                self.apply_stake(stake);
                self.session.panel_mut().open();
                self.print_slip();
                Ok(())
            }
            Command::Quote(StakeArg { stake }) => {
                self.apply_stake(stake);
                self.quote().await
            }
            Command::Save(StakeArg { stake }) => {
                self.apply_stake(stake);
                self.save().await
            }
            Command::History { limit, remote } => {
                if remote {
                    self.remote_history().await
                } else {
                    self.history(limit).await
                }
            }
        }
    }

    async fn leagues(&self) -> Result<()> {
        for league in self.api.fetch_leagues().await? {
            println!(
                "{:<6} {:<20} {:<10} {}",
                league.code, league.name, league.sport, league.country
            );
        }
        Ok(())
    }

    async fn matches(&self, league: Option<String>, sport: Option<String>) -> Result<()> {
        let filter = MatchFilter {
            league,
            sport,
            ..Default::default()
        };

        let matches = self.api.fetch_matches(&filter).await?;
        if matches.is_empty() {
            println!("No matches available");
        }

        for fixture in &matches {
            let kickoff = fixture
                .kickoff()
                .map(|k| k.format("%a %d %b %H:%M").to_string())
                .unwrap_or_else(|| "TBD".to_string());

            let prices = odds::extract_match_odds(fixture, &self.resolver)
                .map(|o| {
                    format!(
                        "{} / {} / {}",
                        format_price(o.home),
                        format_price(o.draw),
                        format_price(o.away)
                    )
                })
                .unwrap_or_else(|| "no odds".to_string());

            let marker = if self.session.store().contains(&fixture.id) { "*" } else { " " };
            println!(
                "{} {:<12} {:<16} {:<18} {:<45} {}",
                marker,
                fixture.id,
                kickoff,
                fixture.league,
                fixture.display_name(),
                prices
            );
        }
        Ok(())
    }

    async fn match_detail(&self, match_id: &str) -> Result<()> {
        let Some(detail) = self.api.fetch_match(match_id).await? else {
            println!("Match not found: {}", match_id);
            return Ok(());
        };
        let fixture = &detail.fixture;

        println!("{} ({})", fixture.display_name(), fixture.league);
        if let Some(kickoff) = fixture.kickoff() {
            println!("Kickoff: {}", kickoff.format("%A %d %B %Y %H:%M UTC"));
        }
        println!("Form: {} | {}", detail.home_form.join(""), detail.away_form.join(""));

        for h2h in &detail.head_to_head {
            println!(
                "  H2H {} {} {}-{} {}",
                h2h.date.get(..10).unwrap_or(&h2h.date),
                h2h.home,
                h2h.home_score.map_or("-".to_string(), |s| s.to_string()),
                h2h.away_score.map_or("-".to_string(), |s| s.to_string()),
                h2h.away
            );
        }

        let current = self.session.store().selection_for(&fixture.id);
        for price in odds::market_prices(fixture, &self.resolver) {
            let picked = current.map_or(false, |s| {
                s.market == price.market && s.selection_name == price.outcome
            });
            println!(
                "  {} {:<12} {:<8} {:.2}",
                if picked { ">" } else { " " },
                price.market,
                price.outcome,
                price.price
            );
        }

        let analysis = match &detail.ai_analysis {
            Some(analysis) => Some(analysis.clone()),
            None => match self.api.analyze(&AnalysisRequest::from(&detail)).await {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    warn!("AI analysis unavailable: {:#}", e);
                    None
                }
            },
        };

        if let Some(analysis) = analysis {
            println!(
                "AI: {} ({:.0}% confidence, {} risk) - best bet: {}",
                analysis.prediction, analysis.confidence, analysis.risk_level, analysis.best_bet
            );
            println!("    {}", analysis.reasoning);
        }
        Ok(())
    }

    async fn standings(&self, league: &str) -> Result<()> {
        let Some(table) = self.api.fetch_standings(league).await? else {
            println!("League not found: {}", league);
            return Ok(());
        };

        println!("{}", table.league);
        for row in &table.standings {
            println!(
                "{:>2}. {:<28} P{:<3} W{:<3} D{:<3} L{:<3} GD{:>+4} {:>4} pts  {}",
                row.position,
                row.team,
                row.played,
                row.won,
                row.drawn,
                row.lost,
                row.goal_difference,
                row.points,
                row.form.join("")
            );
        }
        Ok(())
    }

    async fn pick(
        &mut self,
        match_id: &str,
        outcome: &str,
        market: Option<&str>,
        custom_odds: Option<&str>,
    ) -> Result<()> {
        let Some(detail) = self.api.fetch_match(match_id).await? else {
            println!("Match not found: {}", match_id);
            return Ok(());
        };

        let prices = odds::market_prices(&detail.fixture, &self.resolver);
        let Some(payload) = odds::pick_payload(&detail.fixture, &prices, outcome, market, custom_odds)
        else {
            println!(
                "Odds not available for {} on {} (pass --odds or a bet type)",
                outcome,
                detail.fixture.display_name()
            );
            return Ok(());
        };

        let result = self.session.pick(&payload);
        println!("{}", result.message);

        if self.session.panel().is_open() {
            self.print_slip();
        }
        Ok(())
    }

    async fn quote(&self) -> Result<()> {
        let store = self.session.store();
        if store.is_empty() {
            println!("Add selections to see calculations");
            return Ok(());
        }

        let quote = self.api.calculate_parlay(store.selections()).await?;
        let local = self.session.summary();

        println!(
            "Server: odds {:.2} | win chance {:.2}% | risk {}",
            quote.combined_odds, quote.probability, quote.risk_assessment
        );
        println!(
            "Local:  odds {:.2} | win chance {:.1}% | risk {} | return {:.2} on {:.2}",
            local.total_odds,
            local.probability,
            local.risk,
            local.potential_return,
            self.session.stake()
        );
        Ok(())
    }

    async fn save(&mut self) -> Result<()> {
        let store = self.session.store();
        if store.is_empty() {
            println!("Add matches to your parlay first");
            return Ok(());
        }

        let selections = store.selections().to_vec();
        let totals = self.session.summary();

        let remote_id = match self.api.save_parlay(&selections).await {
            Ok(saved) => Some(saved.id),
            Err(e) => {
                warn!("Failed to save parlay remotely: {:#}", e);
                None
            }
        };

        let history = ParlayHistory::new(&self.config.database_url).await?;
        let id = history
            .record(&SavedParlay {
                id: None,
                remote_id: remote_id.clone(),
                selections,
                stake: self.session.stake(),
                totals,
                created_at: Utc::now(),
            })
            .await?;

        match remote_id {
            Some(remote) => println!("Parlay saved successfully! ({})", remote),
            None => println!("Failed to save parlay remotely; kept locally as #{}", id),
        }
        Ok(())
    }

    async fn history(&self, limit: i64) -> Result<()> {
        let history = ParlayHistory::new(&self.config.database_url).await?;
        let saved = history.recent(limit).await?;

        if saved.is_empty() {
            println!("No saved parlays");
        }

        for parlay in saved {
            println!(
                "#{:<4} {}  {} legs  @ {:.2}  stake {:.2} -> {:.2}  {:.1}%  {}",
                parlay.id.unwrap_or_default(),
                parlay.created_at.format("%Y-%m-%d %H:%M"),
                parlay.selections.len(),
                parlay.totals.total_odds,
                parlay.stake,
                parlay.totals.potential_return,
                parlay.totals.probability,
                parlay.totals.risk
            );
        }
        Ok(())
    }

    async fn remote_history(&self) -> Result<()> {
        let saved = self.api.fetch_saved_parlays().await?;
        if saved.is_empty() {
            println!("No saved parlays");
        }

        for parlay in saved {
            println!(
                "{}  {}  {} legs  @ {:.2}  {:.2}%",
                parlay.id,
                parlay.created_at.get(..16).unwrap_or(&parlay.created_at),
                parlay.items.len(),
                parlay.combined_odds,
                parlay.probability
            );
        }
        Ok(())
    }

    fn apply_stake(&mut self, stake: Option<String>) {
        if let Some(raw) = stake {
            self.session.set_stake_input(&raw);
        }
    }

    fn print_slip(&self) {
        let store = self.session.store();
        println!("Bet slip ({})", store.count());

        if store.is_empty() {
            println!("  No selections yet");
            return;
        }

        for selection in store.selections() {
            println!(
                "  {:<12} {:<40} {:<10} {:<10} @ {:.2}",
                selection.match_id,
                selection.match_name,
                selection.market,
                selection.selection_name,
                selection.price
            );
        }

        let totals = self.session.summary();
        println!(
            "Stake {:.2} | Odds {:.2} | Return {:.2} | Win chance {:.1}% | Risk {}",
            self.session.stake(),
            totals.total_odds,
            totals.potential_return,
            totals.probability,
            totals.risk
        );
    }
}

/// Load team resolver from JSON file or create default
fn load_team_resolver(path: &Path) -> Result<TeamResolver> {
    if path.exists() {
        TeamResolver::load_from_file(path)
    } else {
        info!("No team aliases file found, using default resolver");
        Ok(TeamResolver::new())
    }
}

fn format_price(price: Option<f64>) -> String {
    price.map_or("-".to_string(), |p| format!("{:.2}", p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("parlay-builder").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pick_with_market_and_odds() {
        let command = parse(&["pick", "--market", "BTTS", "fd_1", "Yes"]).unwrap();
        assert_eq!(
            command,
            Command::Pick {
                match_id: "fd_1".to_string(),
                outcome: "Yes".to_string(),
                market: Some("BTTS".to_string()),
                odds: None,
            }
        );

        let command = parse(&["pick", "fd_2", "over_2.5", "--odds", "1.9"]).unwrap();
        assert_eq!(
            command,
            Command::Pick {
                match_id: "fd_2".to_string(),
                outcome: "over_2.5".to_string(),
                market: None,
                odds: Some("1.9".to_string()),
            }
        );

        // Left for the slip to refuse
        let command = parse(&["pick", "fd_2", "draw", "--odds", "-1"]).unwrap();
        assert!(matches!(command, Command::Pick { odds: Some(ref o), .. } if o == "-1"));
    }

    #[test]
    fn test_parse_flags_and_defaults() {
        assert_eq!(
            parse(&["matches", "--league", "PL"]).unwrap(),
            Command::Matches {
                league: Some("PL".to_string()),
                sport: None
            }
        );
        assert_eq!(
            parse(&["slip", "--stake", "25"]).unwrap(),
            Command::Slip(StakeArg {
                stake: Some("25".to_string())
            })
        );
        assert_eq!(
            parse(&["history"]).unwrap(),
            Command::History {
                limit: 20,
                remote: false
            }
        );
    }

    #[test]
    fn test_parse_remote_history() {
        assert_eq!(
            parse(&["history", "--remote", "--limit", "5"]).unwrap(),
            Command::History {
                limit: 5,
                remote: true
            }
        );
        assert_eq!(parse(&["quote"]).unwrap(), Command::Quote(StakeArg { stake: None }));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["pick", "fd_1"]).is_err());
        assert!(parse(&["remove"]).is_err());
        assert!(parse(&["history", "--limit", "many"]).is_err());
        assert!(parse(&["bet"]).is_err());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(2.5)), "2.50");
        assert_eq!(format_price(None), "-");
    }
}
