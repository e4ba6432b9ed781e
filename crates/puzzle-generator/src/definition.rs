//! The contract between the engine and individual puzzle definitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::binding::{Args, BoundArgs, ParamSpec};
use crate::error::{BindingError, RandomError};
use crate::record::ParameterRecord;
use crate::rng::{RandomSource, Seed};

/// Immutable descriptive configuration for one puzzle definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Seed override. Builds seed from `name` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Seed>,
    /// Never offer the fixed example.
    #[serde(default)]
    pub skip_example: bool,
}

impl PuzzleMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tags: BTreeSet::new(),
            seed: None,
            skip_example: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn without_example(mut self) -> Self {
        self.skip_example = true;
        self
    }

    /// The seed a build will use.
    pub fn effective_seed(&self) -> Seed {
        self.seed
            .clone()
            .unwrap_or_else(|| Seed::Text(self.name.clone()))
    }
}

/// Outcome of checking a candidate answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Satisfied,
    Unsatisfied,
    /// The verifier bailed out with a domain message (e.g. an illegal move).
    /// Counts as unsatisfied.
    Aborted(String),
}

impl Verdict {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Verdict::Satisfied)
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok {
            Verdict::Satisfied
        } else {
            Verdict::Unsatisfied
        }
    }
}

/// Sink for parameter records proposed by a definition.
///
/// Enumerators and random proposers push into this rather than returning
/// records, since they may propose any number of them.
#[derive(Debug, Default)]
pub struct Proposals {
    records: Vec<ParameterRecord>,
}

impl Proposals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, record: ParameterRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, ParameterRecord> {
        self.records.drain(..)
    }
}

/// A puzzle: a verifier, a reference solver, and the ways to propose inputs.
pub trait PuzzleDefinition: Send + Sync {
    fn meta(&self) -> &PuzzleMeta;

    /// Declared parameters shared by the verifier and the solver.
    fn params(&self) -> &ParamSpec;

    /// Check `answer` against the bound parameters.
    fn verify(&self, answer: &Value, args: &BoundArgs) -> Result<Verdict, BindingError>;

    /// Reference answer, or `None` when no solution was found.
    fn solve(&self, args: &BoundArgs) -> Result<Option<Value>, BindingError>;

    /// Hand-picked instance offered before anything else.
    fn example(&self) -> ParameterRecord {
        self.params().defaults_record()
    }

    /// Deterministic sweep. `budget` is how many instances are still wanted;
    /// proposing more or fewer is allowed.
    fn enumerate(&self, _budget: usize, _out: &mut Proposals) {}

    /// Propose zero or one record per call using `rng`.
    fn propose_random(
        &self,
        _rng: &mut RandomSource,
        _out: &mut Proposals,
    ) -> Result<(), RandomError> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.meta().name
    }

    /// Verify with arguments in either call shape.
    fn verify_args(&self, answer: &Value, args: Args<'_>) -> Result<Verdict, BindingError> {
        let bound = self.params().bind(args)?;
        self.verify(answer, &bound)
    }

    /// Solve with arguments in either call shape.
    fn solve_args(&self, args: Args<'_>) -> Result<Option<Value>, BindingError> {
        let bound = self.params().bind(args)?;
        self.solve(&bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Doubler {
        meta: PuzzleMeta,
        params: ParamSpec,
    }

    impl Doubler {
        fn new() -> Self {
            Self {
                meta: PuzzleMeta::new("Doubler").with_tags(["math"]),
                params: ParamSpec::new().required("x").optional("factor", 2),
            }
        }
    }

    impl PuzzleDefinition for Doubler {
        fn meta(&self) -> &PuzzleMeta {
            &self.meta
        }

        fn params(&self) -> &ParamSpec {
            &self.params
        }

        fn verify(&self, answer: &Value, args: &BoundArgs) -> Result<Verdict, BindingError> {
            let expected = args.i64("x")? * args.i64("factor")?;
            Ok((answer.as_i64() == Some(expected)).into())
        }

        fn solve(&self, args: &BoundArgs) -> Result<Option<Value>, BindingError> {
            Ok(Some(json!(args.i64("x")? * args.i64("factor")?)))
        }
    }

    #[test]
    fn test_verify_args_both_shapes() {
        let puzzle = Doubler::new();
        let positional = puzzle
            .verify_args(&json!(8), Args::Positional(&[json!(4)]))
            .unwrap();
        let record = ParameterRecord::new().with("factor", 3).with("x", 4);
        let named = puzzle.verify_args(&json!(12), Args::Named(&record)).unwrap();
        assert!(positional.is_satisfied());
        assert!(named.is_satisfied());
        assert_eq!(
            puzzle.verify_args(&json!(9), Args::Named(&record)).unwrap(),
            Verdict::Unsatisfied
        );
    }

    #[test]
    fn test_binding_error_is_not_a_verdict() {
        let puzzle = Doubler::new();
        let record = ParameterRecord::new().with("factor", 3);
        assert_eq!(
            puzzle.solve_args(Args::Named(&record)),
            Err(BindingError::MissingParameter("x".to_string()))
        );
    }

    #[test]
    fn test_default_example_is_defaults_record() {
        let puzzle = Doubler::new();
        assert_eq!(puzzle.example().canonical_key(), r#"{"factor":2}"#);
    }

    #[test]
    fn test_effective_seed() {
        let meta = PuzzleMeta::new("Doubler");
        assert_eq!(meta.effective_seed(), Seed::Text("Doubler".to_string()));
        let meta = meta.with_seed(9u64);
        assert_eq!(meta.effective_seed(), Seed::Number(9));
    }

    #[test]
    fn test_meta_deserializes_with_defaults() {
        let meta: PuzzleMeta =
            serde_json::from_str(r#"{"name": "X", "tags": ["b", "a"], "skipExample": true}"#)
                .unwrap();
        assert_eq!(meta.name, "X");
        assert!(meta.skip_example);
        assert_eq!(meta.tags.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(meta.seed.is_none());
    }
}
