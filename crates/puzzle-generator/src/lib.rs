//! Deterministic instance generation for verifier/solver puzzles.
//!
//! A puzzle is defined by a verifier, a reference solver and a few ways of
//! proposing inputs (a fixed example, a systematic sweep, random draws).
//! This crate turns such definitions into reproducible, de-duplicated
//! instance lists: the same definition and seed always yield the same
//! instances, and a bounded attempt budget guarantees every build ends.

pub mod binding;
pub mod catalog;
pub mod dedup;
pub mod definition;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod rng;

// Re-export main types
pub use binding::{Args, BoundArgs, Param, ParamSpec};
pub use dedup::InstanceDeduplicator;
pub use definition::{Proposals, PuzzleDefinition, PuzzleMeta, Verdict};
pub use error::{BindingError, GenerationError, RandomError};
pub use pipeline::{
    BuildConfig, BuildReport, GenerationPipeline, GenerationState, Instance, DEFAULT_MAX_ATTEMPTS,
};
pub use record::ParameterRecord;
pub use registry::Registry;
pub use rng::{RandomSource, Seed};
