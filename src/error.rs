use thiserror::Error;

/// Reasons a selection is refused by the parlay slip
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SelectionError {
    #[error("Odds not available for {selection} ({raw})")]
    InvalidPrice { selection: String, raw: String },

    #[error("Selection has no match id")]
    MissingMatchId,
}
