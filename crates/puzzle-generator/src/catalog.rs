//! Reference puzzle definitions.
//!
//! Small string and list puzzles that exercise every channel of the
//! definition contract: fixed examples, a systematic sweep, random
//! proposals, a verifier abort, and a solver that can come up empty.

use serde_json::{json, Value};

use crate::binding::{BoundArgs, ParamSpec};
use crate::definition::{Proposals, PuzzleDefinition, PuzzleMeta, Verdict};
use crate::error::{BindingError, GenerationError, RandomError};
use crate::record::ParameterRecord;
use crate::registry::Registry;
use crate::rng::RandomSource;

const LOWERCASE: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Longest string, in bytes, `RepeatString` will build.
const MAX_REPEAT_LEN: usize = 1 << 20;

/// Registry holding every catalog puzzle.
pub fn registry() -> Result<Registry, GenerationError> {
    let mut registry = Registry::new();
    registry.register(HelloWorld::new())?;
    registry.register(ReverseString::new())?;
    registry.register(RepeatString::new())?;
    registry.register(ListSum::new())?;
    registry.register(ListMax::new())?;
    registry.register(CountPositive::new())?;
    Ok(registry)
}

/// Integer list with length in `[min_len, max_len]` and values in `[lo, hi]`.
fn random_int_list(
    rng: &mut RandomSource,
    min_len: i64,
    max_len: i64,
    lo: i64,
    hi: i64,
) -> Vec<i64> {
    let len = rng.int_inclusive(min_len, max_len);
    (0..len).map(|_| rng.int_inclusive(lo, hi)).collect()
}

/// Find a string which, followed by "world", gives "Hello world".
pub struct HelloWorld {
    meta: PuzzleMeta,
    params: ParamSpec,
}

impl HelloWorld {
    pub fn new() -> Self {
        Self {
            meta: PuzzleMeta::new("HelloWorld")
                .with_description(
                    "Find a string that when concatenated onto 'world' gives 'Hello world'.",
                )
                .with_tags(["trivial", "strings"]),
            params: ParamSpec::new().optional("s", ""),
        }
    }
}

impl Default for HelloWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleDefinition for HelloWorld {
    fn meta(&self) -> &PuzzleMeta {
        &self.meta
    }

    fn params(&self) -> &ParamSpec {
        &self.params
    }

    fn verify(&self, answer: &Value, _args: &BoundArgs) -> Result<Verdict, BindingError> {
        Ok(answer
            .as_str()
            .is_some_and(|a| format!("{a}world") == "Hello world")
            .into())
    }

    fn solve(&self, _args: &BoundArgs) -> Result<Option<Value>, BindingError> {
        Ok(Some(json!("Hello ")))
    }
}

/// Reverse a given string.
pub struct ReverseString {
    meta: PuzzleMeta,
    params: ParamSpec,
}

impl ReverseString {
    pub fn new() -> Self {
        Self {
            meta: PuzzleMeta::new("ReverseString")
                .with_description("Reverse a given string.")
                .with_tags(["trivial", "strings"]),
            params: ParamSpec::new().optional("s", "hello"),
        }
    }
}

impl Default for ReverseString {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleDefinition for ReverseString {
    fn meta(&self) -> &PuzzleMeta {
        &self.meta
    }

    fn params(&self) -> &ParamSpec {
        &self.params
    }

    fn verify(&self, answer: &Value, args: &BoundArgs) -> Result<Verdict, BindingError> {
        let expected: String = args.str("s")?.chars().rev().collect();
        Ok((answer.as_str() == Some(expected.as_str())).into())
    }

    fn solve(&self, args: &BoundArgs) -> Result<Option<Value>, BindingError> {
        let reversed: String = args.str("s")?.chars().rev().collect();
        Ok(Some(json!(reversed)))
    }

    fn propose_random(
        &self,
        rng: &mut RandomSource,
        out: &mut Proposals,
    ) -> Result<(), RandomError> {
        let s = rng.random_string(1, 20, &LOWERCASE)?;
        out.submit(ParameterRecord::new().with("s", s));
        Ok(())
    }
}

/// Repeat a string n times.
pub struct RepeatString {
    meta: PuzzleMeta,
    params: ParamSpec,
}

impl RepeatString {
    pub fn new() -> Self {
        Self {
            meta: PuzzleMeta::new("RepeatString")
                .with_description("Repeat a string n times.")
                .with_tags(["trivial", "strings"]),
            params: ParamSpec::new().optional("s", "abc").optional("n", 5),
        }
    }
}

impl Default for RepeatString {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleDefinition for RepeatString {
    fn meta(&self) -> &PuzzleMeta {
        &self.meta
    }

    fn params(&self) -> &ParamSpec {
        &self.params
    }

    fn verify(&self, answer: &Value, args: &BoundArgs) -> Result<Verdict, BindingError> {
        match repeated(args.str("s")?, args.u64("n")?) {
            Some(expected) => Ok((answer.as_str() == Some(expected.as_str())).into()),
            None => Ok(Verdict::Aborted("repeated string too long".to_string())),
        }
    }

    fn solve(&self, args: &BoundArgs) -> Result<Option<Value>, BindingError> {
        Ok(repeated(args.str("s")?, args.u64("n")?).map(Value::from))
    }

    /// Sweep the repeat count for a fixed two-letter word.
    fn enumerate(&self, budget: usize, out: &mut Proposals) {
        for n in 1..=budget {
            out.submit(ParameterRecord::new().with("s", "ab").with("n", n));
        }
    }

    fn propose_random(
        &self,
        rng: &mut RandomSource,
        out: &mut Proposals,
    ) -> Result<(), RandomError> {
        let s = rng.random_string(1, 5, &LOWERCASE)?;
        let n = rng.int_inclusive(1, 20);
        out.submit(ParameterRecord::new().with("s", s).with("n", n));
        Ok(())
    }
}

/// `s` repeated `n` times, or `None` past [`MAX_REPEAT_LEN`].
fn repeated(s: &str, n: u64) -> Option<String> {
    let n = usize::try_from(n).ok()?;
    match s.len().checked_mul(n) {
        Some(len) if len <= MAX_REPEAT_LEN => Some(s.repeat(n)),
        _ => None,
    }
}

/// Find the sum of a list of integers.
pub struct ListSum {
    meta: PuzzleMeta,
    params: ParamSpec,
}

impl ListSum {
    pub fn new() -> Self {
        Self {
            meta: PuzzleMeta::new("ListSum")
                .with_description("Find the sum of a list of integers.")
                .with_tags(["math"]),
            params: ParamSpec::new().optional("nums", json!([1, 2, 3, 4, 5])),
        }
    }
}

impl Default for ListSum {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleDefinition for ListSum {
    fn meta(&self) -> &PuzzleMeta {
        &self.meta
    }

    fn params(&self) -> &ParamSpec {
        &self.params
    }

    fn verify(&self, answer: &Value, args: &BoundArgs) -> Result<Verdict, BindingError> {
        match checked_sum(&args.i64_list("nums")?) {
            Some(sum) => Ok((answer.as_i64() == Some(sum)).into()),
            None => Ok(Verdict::Aborted("sum overflows i64".to_string())),
        }
    }

    fn solve(&self, args: &BoundArgs) -> Result<Option<Value>, BindingError> {
        Ok(checked_sum(&args.i64_list("nums")?).map(Value::from))
    }

    fn propose_random(
        &self,
        rng: &mut RandomSource,
        out: &mut Proposals,
    ) -> Result<(), RandomError> {
        let nums = random_int_list(rng, 1, 20, -100, 100);
        out.submit(ParameterRecord::new().with("nums", nums));
        Ok(())
    }
}

fn checked_sum(nums: &[i64]) -> Option<i64> {
    nums.iter().try_fold(0i64, |acc, n| acc.checked_add(*n))
}

/// Find the maximum value in a list.
pub struct ListMax {
    meta: PuzzleMeta,
    params: ParamSpec,
}

impl ListMax {
    pub fn new() -> Self {
        Self {
            meta: PuzzleMeta::new("ListMax")
                .with_description("Find the maximum value in a list.")
                .with_tags(["math"]),
            params: ParamSpec::new().optional("nums", json!([3, 7, 2, 9, 1])),
        }
    }
}

impl Default for ListMax {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleDefinition for ListMax {
    fn meta(&self) -> &PuzzleMeta {
        &self.meta
    }

    fn params(&self) -> &ParamSpec {
        &self.params
    }

    fn verify(&self, answer: &Value, args: &BoundArgs) -> Result<Verdict, BindingError> {
        match args.i64_list("nums")?.into_iter().max() {
            Some(max) => Ok((answer.as_i64() == Some(max)).into()),
            None => Ok(Verdict::Aborted("max of an empty list".to_string())),
        }
    }

    fn solve(&self, args: &BoundArgs) -> Result<Option<Value>, BindingError> {
        Ok(args.i64_list("nums")?.into_iter().max().map(|max| json!(max)))
    }

    fn propose_random(
        &self,
        rng: &mut RandomSource,
        out: &mut Proposals,
    ) -> Result<(), RandomError> {
        let nums = random_int_list(rng, 1, 50, -1000, 1000);
        out.submit(ParameterRecord::new().with("nums", nums));
        Ok(())
    }
}

/// Count the number of positive integers in a list.
pub struct CountPositive {
    meta: PuzzleMeta,
    params: ParamSpec,
}

impl CountPositive {
    pub fn new() -> Self {
        Self {
            meta: PuzzleMeta::new("CountPositive")
                .with_description("Count the number of positive integers in a list.")
                .with_tags(["math"]),
            params: ParamSpec::new().optional("nums", json!([1, -2, 3, -4, 5])),
        }
    }
}

impl Default for CountPositive {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleDefinition for CountPositive {
    fn meta(&self) -> &PuzzleMeta {
        &self.meta
    }

    fn params(&self) -> &ParamSpec {
        &self.params
    }

    fn verify(&self, answer: &Value, args: &BoundArgs) -> Result<Verdict, BindingError> {
        let count = args.i64_list("nums")?.iter().filter(|n| **n > 0).count() as u64;
        Ok((answer.as_u64() == Some(count)).into())
    }

    fn solve(&self, args: &BoundArgs) -> Result<Option<Value>, BindingError> {
        let count = args.i64_list("nums")?.iter().filter(|n| **n > 0).count();
        Ok(Some(json!(count)))
    }

    fn propose_random(
        &self,
        rng: &mut RandomSource,
        out: &mut Proposals,
    ) -> Result<(), RandomError> {
        let nums = random_int_list(rng, 1, 50, -100, 100);
        out.submit(ParameterRecord::new().with("nums", nums));
        Ok(())
    }
}
