use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    /// Both records must carry encodings of the same length to be compared.
    #[error("cannot compare {left} with {right}: {reason}")]
    InvalidComparison {
        left: String,
        right: String,
        reason: String,
    },
    /// The source image or a derived crop broke a shape guarantee.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
