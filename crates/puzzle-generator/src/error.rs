//! Error types for the generation engine.
//!
//! Only contract violations live here. Ordinary puzzle outcomes (an
//! unsatisfied verifier, a solver that finds nothing, a duplicate proposal)
//! are handled inside the pipeline and never become errors.

use thiserror::Error;

/// Misuse of a [`RandomSource`](crate::rng::RandomSource) sampling helper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandomError {
    /// A selection was requested from an empty collection.
    #[error("{operation} called on empty input")]
    EmptyInput {
        /// The helper that was called.
        operation: &'static str,
    },

    /// Weighted choice was given a different number of weights than items.
    #[error("weighted choice got {items} items but {weights} weights")]
    WeightMismatch { items: usize, weights: usize },

    /// Weights were negative, non-finite, or summed to zero.
    #[error("weighted choice needs finite, non-negative weights with a positive total")]
    InvalidWeights,
}

/// A parameter record or call did not match a definition's declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("missing required parameter `{0}`")]
    MissingParameter(String),

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("expected at most {expected} positional arguments, got {actual}")]
    TooManyArguments { expected: usize, actual: usize },

    /// A bound value was read through a typed accessor of the wrong kind.
    #[error("parameter `{name}` expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: String,
    },
}

/// Failure of a build or registry operation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A definition's records do not fit its own parameter descriptor.
    #[error("binding error in puzzle `{puzzle}`: {source}")]
    Binding {
        puzzle: String,
        #[source]
        source: BindingError,
    },

    /// A random proposer misused its random source.
    #[error(transparent)]
    Random(#[from] RandomError),

    /// The solver produced an answer its own verifier rejects.
    #[error("solution for `{instance}` failed verification: {detail}")]
    UnsoundSolution { instance: String, detail: String },

    #[error("puzzle `{0}` not found")]
    UnknownPuzzle(String),

    #[error("puzzle `{0}` is already registered")]
    DuplicatePuzzle(String),
}

impl GenerationError {
    pub(crate) fn binding(puzzle: &str, source: BindingError) -> Self {
        GenerationError::Binding {
            puzzle: puzzle.to_string(),
            source,
        }
    }
}
