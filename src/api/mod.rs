pub mod client;

pub use client::{AnalysisRequest, BetsApiClient, MatchFilter};
