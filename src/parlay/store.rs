use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::SelectionError;
use crate::models::{ParlayTotals, Selection};
use crate::parlay::{aggregator, normalizer};
use crate::storage::KeyValueStorage;

/// Storage key holding the serialized slip
pub const STORAGE_KEY: &str = "parlayItems";

/// Outcome of adding a selection to the slip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddResult {
    pub success: bool,
    pub message: String,
}

impl AddResult {
    fn accepted(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }

    fn rejected(error: SelectionError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
        }
    }
}

/// Authoritative set of parlay selections, mirrored to durable storage.
///
/// Holds at most one selection per match. Adding a selection for a match
/// already on the slip replaces it in place.
pub struct SelectionStore<S: KeyValueStorage> {
    selections: Vec<Selection>,
    storage: S,
}

impl<S: KeyValueStorage> SelectionStore<S> {
    /// Create a store, restoring whatever slip `storage` holds.
    ///
    /// A missing or unreadable value yields an empty slip.
    pub fn load(storage: S) -> Self {
        let selections = match storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read saved parlay, starting empty: {}", e);
                Vec::new()
            }
        };

        info!("Parlay slip loaded with {} selections", selections.len());
        Self {
            selections,
            storage,
        }
    }

    /// Add a selection from a loosely-typed payload, replacing any existing
    /// pick for the same match at its current position.
    pub fn add_selection(&mut self, input: &Value) -> AddResult {
        let selection = normalizer::normalize(input);

        if let Err(e) = validate(&selection) {
            debug!("Rejected selection for match '{}': {}", selection.match_id, e);
            return AddResult::rejected(e);
        }

        let name = selection.selection_name.clone();
        let message = if upsert(&mut self.selections, selection) {
            format!("Changed to {}", name)
        } else {
            format!("Added {}", name)
        };

        self.persist();
        AddResult::accepted(message)
    }

    /// Remove the selection for `match_id`; absent ids are ignored
    pub fn remove_selection(&mut self, match_id: &str) {
        let before = self.selections.len();
        self.selections.retain(|s| s.match_id != match_id);

        if self.selections.len() == before {
            return;
        }

        debug!("Removed selection for match {}", match_id);
        self.persist();
    }

    /// Empty the slip
    pub fn clear(&mut self) {
        self.selections.clear();
        self.persist();
    }

    pub fn count(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.position(match_id).is_some()
    }

    /// Current pick for `match_id`, if any
    pub fn selection_for(&self, match_id: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.match_id == match_id)
    }

    /// Selections in insertion order
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Totals of the live slip for `stake`
    pub fn totals(&self, stake: f64) -> ParlayTotals {
        aggregator::compute_totals(&self.selections, stake)
    }

    /// Give back the underlying storage
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn position(&self, match_id: &str) -> Option<usize> {
        self.selections.iter().position(|s| s.match_id == match_id)
    }

    fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.selections) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to encode parlay slip: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set_item(STORAGE_KEY, &encoded) {
            warn!("Failed to save parlay slip: {}", e);
        }
    }
}

/// Insert `selection`, or replace the pick for its match in place.
/// Returns whether an existing pick was replaced.
fn upsert(selections: &mut Vec<Selection>, selection: Selection) -> bool {
    match selections.iter().position(|s| s.match_id == selection.match_id) {
        Some(index) => {
            selections[index] = selection;
            true
        }
        None => {
            selections.push(selection);
            false
        }
    }
}

fn validate(selection: &Selection) -> Result<(), SelectionError> {
    if selection.match_id.is_empty() {
        return Err(SelectionError::MissingMatchId);
    }

    if !selection.has_valid_price() {
        return Err(SelectionError::InvalidPrice {
            selection: selection.selection_name.clone(),
            raw: selection.price.to_string(),
        });
    }

    Ok(())
}

/// Decode a persisted slip, upgrading legacy field names on the way in.
/// Entries that no longer validate are dropped. A repeated match replays
/// like a later add: the last entry wins at the first entry's position.
fn decode(raw: &str) -> Vec<Selection> {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Saved parlay is corrupt, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut selections: Vec<Selection> = Vec::with_capacity(entries.len());

    for entry in &entries {
        let selection = normalizer::normalize(entry);

        if let Err(e) = validate(&selection) {
            warn!("Dropping saved selection: {}", e);
            continue;
        }

        let match_id = selection.match_id.clone();
        if upsert(&mut selections, selection) {
            warn!("Saved parlay repeats match {}, keeping the later pick", match_id);
        }
    }

    selections
}
