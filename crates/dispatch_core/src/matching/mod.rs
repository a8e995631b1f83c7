//! Driver recommendations for a trip.
//!
//! A [`DriverMatchScorer`] combines five sub-scores (vehicle, availability,
//! proximity, performance, workload) into a 0..=100 composite, keeps the top
//! candidates above a viability floor and explains each with [`Reason`]s.

pub mod batch;
pub mod config;
pub mod error;
pub mod scorer;
pub mod scoring;
pub mod types;
pub mod workload;

pub use batch::pending_trips;
pub use config::{MatchingConfig, ScoreWeights};
pub use error::MatchError;
pub use scorer::DriverMatchScorer;
pub use types::{
    BatchRanking, BlockerCounts, MatchDetails, NoMatchExplanation, NoMatchReason, Reason,
    ReasonKind, Suggestion,
};
