pub mod history;

pub use history::ParlayHistory;
