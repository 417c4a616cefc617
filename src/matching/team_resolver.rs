use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Resolves the many spellings bookmakers and data feeds use for a team
pub struct TeamResolver {
    /// Map of alias -> canonical name
    aliases: HashMap<String, String>,
}

/// Team alias configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAliases {
    pub teams: Vec<TeamAliasEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAliasEntry {
    /// Canonical team name
    pub canonical: String,
    /// Variations used by other sources (e.g. "Man Utd", "Manchester United FC")
    pub aliases: Vec<String>,
}

impl TeamResolver {
    /// Create a new resolver with no aliases
    pub fn new() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Load aliases from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context("Failed to read team aliases file")?;

        let config: TeamAliases =
            serde_json::from_str(&content).context("Failed to parse team aliases JSON")?;

        let mut resolver = Self::new();
        for entry in config.teams {
            resolver.add_alias(&entry.canonical, &entry.canonical);
            for alias in &entry.aliases {
                resolver.add_alias(alias, &entry.canonical);
            }
        }

        info!("Loaded {} team alias mappings", resolver.aliases.len());
        Ok(resolver)
    }

    /// Normalize a team name to its canonical form
    pub fn normalize(&self, name: &str) -> String {
        let key = fold(name);
        self.aliases.get(&key).cloned().unwrap_or(key)
    }

    /// Check if two team names match (accounting for aliases)
    pub fn names_match(&self, name_a: &str, name_b: &str) -> bool {
        self.normalize(name_a) == self.normalize(name_b)
    }

    /// Add a new alias mapping
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases.insert(fold(alias), fold(canonical));
    }
}

impl Default for TeamResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase and collapse internal whitespace
fn fold(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let mut resolver = TeamResolver::new();
        resolver.add_alias("Man Utd", "Manchester United");
        resolver.add_alias("Manchester United FC", "Manchester United");

        assert_eq!(resolver.normalize("Manchester United"), "manchester united");
        assert_eq!(resolver.normalize("MAN  UTD"), "manchester united");
        assert_eq!(resolver.normalize(" Manchester United FC "), "manchester united");
        assert_eq!(resolver.normalize("Everton"), "everton"); // Unknown team stays as-is
    }

    #[test]
    fn test_names_match() {
        let mut resolver = TeamResolver::new();
        resolver.add_alias("Spurs", "Tottenham Hotspur");

        assert!(resolver.names_match("Tottenham Hotspur", "spurs"));
        assert!(resolver.names_match("Arsenal", "arsenal "));
        assert!(!resolver.names_match("Spurs", "Arsenal"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team_aliases.json");
        std::fs::write(
            &path,
            r#"{"teams": [{"canonical": "Paris Saint-Germain", "aliases": ["PSG", "Paris SG"]}]}"#,
        )
        .unwrap();

        let resolver = TeamResolver::load_from_file(&path).unwrap();
        assert!(resolver.names_match("psg", "Paris Saint-Germain"));
        assert!(resolver.names_match("Paris SG", "PSG"));
    }
}
