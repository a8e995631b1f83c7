use thiserror::Error;

/// Structural problems with scorer input. Business non-matches are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("invalid trip input: {0}")]
    InvalidTripInput(String),
}
