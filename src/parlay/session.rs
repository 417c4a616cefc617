use serde_json::Value;
use tracing::info;

use crate::models::ParlayTotals;
use crate::parlay::aggregator::{self, DEFAULT_STAKE};
use crate::parlay::panel::SlipPanel;
use crate::parlay::store::{AddResult, SelectionStore};
use crate::storage::KeyValueStorage;

/// Application-wide parlay context: the one store, the summary panel and
/// the stake. Built once at start-up and passed to whatever needs it.
pub struct ParlaySession<S: KeyValueStorage> {
    store: SelectionStore<S>,
    panel: SlipPanel,
    stake: f64,
    default_stake: f64,
}

impl<S: KeyValueStorage> ParlaySession<S> {
    pub fn new(storage: S) -> Self {
        Self::with_default_stake(storage, DEFAULT_STAKE)
    }

    pub fn with_default_stake(storage: S, default_stake: f64) -> Self {
        Self {
            store: SelectionStore::load(storage),
            panel: SlipPanel::default(),
            stake: default_stake,
            default_stake,
        }
    }

    /// Add a pick from an odds control; opens the panel when it lands
    pub fn pick(&mut self, input: &Value) -> AddResult {
        let result = self.store.add_selection(input);

        if result.success {
            info!("{} ({} on slip)", result.message, self.store.count());
            self.panel.open();
        }

        result
    }

    /// Set the stake from raw user input, keeping it positive
    pub fn set_stake_input(&mut self, raw: &str) {
        self.stake = aggregator::parse_stake(raw, self.default_stake);
    }

    pub fn stake(&self) -> f64 {
        self.stake
    }

    /// Totals of the live slip at the current stake
    pub fn summary(&self) -> ParlayTotals {
        self.store.totals(self.stake)
    }

    pub fn store(&self) -> &SelectionStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SelectionStore<S> {
        &mut self.store
    }

    pub fn panel(&self) -> &SlipPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut SlipPanel {
        &mut self.panel
    }
}
