pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod matching;
pub mod models;
pub mod parlay;
pub mod storage;

pub use error::SelectionError;
pub use parlay::{AddResult, ParlaySession, SelectionStore};
