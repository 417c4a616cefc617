pub mod aggregator;
pub mod normalizer;
pub mod panel;
pub mod session;
pub mod store;

pub use aggregator::{compute_totals, DEFAULT_STAKE};
pub use normalizer::normalize;
pub use panel::SlipPanel;
pub use session::ParlaySession;
pub use store::{AddResult, SelectionStore, STORAGE_KEY};
