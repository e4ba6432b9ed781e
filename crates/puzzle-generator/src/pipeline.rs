//! Bounded generation of unique instances for one puzzle definition.
//!
//! A build walks a fixed sequence of phases: the definition's fixed example,
//! one call to its systematic enumerator, then repeated random proposals
//! until the target is met or the attempt budget runs dry. Each build starts
//! from a fresh random source and an empty deduplicator, so repeating a
//! build reproduces the same instances.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::binding::Args;
use crate::dedup::InstanceDeduplicator;
use crate::definition::{Proposals, PuzzleDefinition, Verdict};
use crate::error::GenerationError;
use crate::record::ParameterRecord;
use crate::rng::RandomSource;

/// Default cap on consecutive unproductive random proposals.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// One accepted (parameters, solution) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub name: String,
    pub parameters: ParameterRecord,
    pub solution_signature: String,
    pub solution: Value,
}

/// Knobs for a single build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    /// Number of instances wanted.
    pub target: usize,
    /// Random proposals allowed per missing instance before giving up.
    pub max_attempts: usize,
    /// Skip the fixed example even if the definition offers one.
    pub skip_example: bool,
    /// Re-run the verifier on every solver answer.
    pub verify_solutions: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            target: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            skip_example: false,
            verify_solutions: false,
        }
    }
}

impl BuildConfig {
    pub fn with_target(target: usize) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }
}

/// Phase of a build. `Done` and `Stalled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    Init,
    Seeded,
    Example,
    Systematic,
    RandomFill,
    /// Target reached.
    Done,
    /// Attempt budget exhausted short of the target.
    Stalled,
}

/// Result of a build: the instances plus how the run went.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub instances: Vec<Instance>,
    pub state: GenerationState,
    /// Records received from any channel.
    pub proposals_seen: usize,
    pub duplicates_rejected: usize,
    /// New records the solver could not solve.
    pub unsolved_skipped: usize,
    pub random_calls: usize,
}

impl BuildReport {
    pub fn is_stalled(&self) -> bool {
        self.state == GenerationState::Stalled
    }
}

/// Drives builds for a single definition.
///
/// The random source and deduplicator belong to the pipeline and are
/// replaced at the start of every build.
pub struct GenerationPipeline<'a, D: PuzzleDefinition + ?Sized> {
    definition: &'a D,
    dedup: InstanceDeduplicator,
    rng: RandomSource,
    state: GenerationState,
    run: RunStats,
}

#[derive(Debug, Default)]
struct RunStats {
    instances: Vec<Instance>,
    proposals_seen: usize,
    duplicates_rejected: usize,
    unsolved_skipped: usize,
    random_calls: usize,
}

impl<'a, D: PuzzleDefinition + ?Sized> GenerationPipeline<'a, D> {
    pub fn new(definition: &'a D) -> Self {
        Self {
            definition,
            dedup: InstanceDeduplicator::new(),
            rng: RandomSource::new(definition.meta().effective_seed()),
            state: GenerationState::Init,
            run: RunStats::default(),
        }
    }

    /// State the last build ended in (`Init` before any build and after a
    /// failed one).
    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Generate up to `target` instances, allowing `max_attempts` random
    /// proposals per missing instance.
    pub fn build(
        &mut self,
        target: usize,
        max_attempts: usize,
    ) -> Result<Vec<Instance>, GenerationError> {
        let config = BuildConfig {
            target,
            max_attempts,
            ..BuildConfig::default()
        };
        Ok(self.build_with(&config)?.instances)
    }

    /// Run every phase under `config`.
    ///
    /// A build that fails leaves the pipeline back in `Init` with no
    /// partial counters or seen records kept.
    pub fn build_with(&mut self, config: &BuildConfig) -> Result<BuildReport, GenerationError> {
        let definition = self.definition;
        let meta = definition.meta();
        let stalled = match self.run_phases(config) {
            Ok(stalled) => stalled,
            Err(err) => {
                self.abandon();
                return Err(err);
            }
        };

        let run = std::mem::take(&mut self.run);
        if stalled {
            self.enter(GenerationState::Stalled);
            warn!(
                puzzle = %meta.name,
                accepted = run.instances.len(),
                target = config.target,
                max_attempts = config.max_attempts,
                "generation stalled before reaching target"
            );
        } else {
            self.enter(GenerationState::Done);
        }
        info!(
            puzzle = %meta.name,
            state = ?self.state,
            accepted = run.instances.len(),
            proposals = run.proposals_seen,
            duplicates = run.duplicates_rejected,
            unsolved = run.unsolved_skipped,
            random_calls = run.random_calls,
            "build finished"
        );

        Ok(BuildReport {
            instances: run.instances,
            state: self.state,
            proposals_seen: run.proposals_seen,
            duplicates_rejected: run.duplicates_rejected,
            unsolved_skipped: run.unsolved_skipped,
            random_calls: run.random_calls,
        })
    }

    /// Example, systematic and random phases. Returns whether the random
    /// phase stalled.
    fn run_phases(&mut self, config: &BuildConfig) -> Result<bool, GenerationError> {
        let definition = self.definition;
        let meta = definition.meta();
        self.enter(GenerationState::Init);

        self.dedup.reset();
        self.rng = RandomSource::new(meta.effective_seed());
        self.run = RunStats::default();
        self.enter(GenerationState::Seeded);

        self.enter(GenerationState::Example);
        if !config.skip_example && !meta.skip_example {
            self.offer(definition.example(), config)?;
        }

        self.enter(GenerationState::Systematic);
        let accepted = self.run.instances.len();
        if accepted < config.target {
            let mut proposals = Proposals::new();
            definition.enumerate(config.target - accepted, &mut proposals);
            self.offer_all(&mut proposals, config)?;
        }

        self.enter(GenerationState::RandomFill);
        let mut proposals = Proposals::new();
        let mut stalled = false;
        while self.run.instances.len() < config.target {
            let before = self.run.instances.len();
            for _ in 0..config.max_attempts {
                self.run.random_calls += 1;
                definition.propose_random(&mut self.rng, &mut proposals)?;
                self.offer_all(&mut proposals, config)?;
                if self.run.instances.len() > before {
                    break;
                }
            }
            if self.run.instances.len() == before {
                stalled = true;
                break;
            }
        }
        Ok(stalled)
    }

    fn abandon(&mut self) {
        debug!(puzzle = %self.definition.name(), state = ?self.state, "build failed");
        self.dedup.reset();
        self.run = RunStats::default();
        self.state = GenerationState::Init;
    }

    fn enter(&mut self, state: GenerationState) {
        trace!(puzzle = %self.definition.name(), ?state, "entering phase");
        self.state = state;
    }

    fn offer_all(
        &mut self,
        proposals: &mut Proposals,
        config: &BuildConfig,
    ) -> Result<(), GenerationError> {
        for record in proposals.drain() {
            self.offer(record, config)?;
        }
        Ok(())
    }

    /// Deduplicate, solve and possibly accept one record.
    fn offer(
        &mut self,
        record: ParameterRecord,
        config: &BuildConfig,
    ) -> Result<(), GenerationError> {
        let definition = self.definition;
        let name = definition.name();
        self.run.proposals_seen += 1;

        if !self.dedup.try_add(&record) {
            self.run.duplicates_rejected += 1;
            return Ok(());
        }

        let args = definition
            .params()
            .bind(Args::Named(&record))
            .map_err(|e| GenerationError::binding(name, e))?;
        let solution = match definition
            .solve(&args)
            .map_err(|e| GenerationError::binding(name, e))?
        {
            Some(solution) => solution,
            None => {
                debug!(puzzle = %name, params = %record, "no solution, skipping");
                self.run.unsolved_skipped += 1;
                return Ok(());
            }
        };

        let instance_name = format!("{}:{}", name, self.run.instances.len());
        if config.verify_solutions {
            let verdict = definition
                .verify(&solution, &args)
                .map_err(|e| GenerationError::binding(name, e))?;
            match verdict {
                Verdict::Satisfied => {}
                Verdict::Unsatisfied => {
                    return Err(GenerationError::UnsoundSolution {
                        instance: instance_name,
                        detail: "verifier returned false".to_string(),
                    });
                }
                Verdict::Aborted(message) => {
                    debug!(puzzle = %name, %message, "verifier aborted");
                    return Err(GenerationError::UnsoundSolution {
                        instance: instance_name,
                        detail: message,
                    });
                }
            }
        }

        debug!(puzzle = %name, instance = %instance_name, params = %record, "accepted");
        self.run.instances.push(Instance {
            name: instance_name,
            solution_signature: record.signature(),
            parameters: record,
            solution,
        });
        Ok(())
    }
}
