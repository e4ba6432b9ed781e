//! Name-indexed collection of puzzle definitions.

use tracing::info;

use crate::definition::PuzzleDefinition;
use crate::error::GenerationError;
use crate::pipeline::{BuildConfig, BuildReport, GenerationPipeline, Instance};

/// Registered definitions, kept in registration order.
///
/// Definitions are immutable once registered, so a registry can be shared
/// read-only across threads.
#[derive(Default)]
pub struct Registry {
    definitions: Vec<Box<dyn PuzzleDefinition>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        definition: impl PuzzleDefinition + 'static,
    ) -> Result<(), GenerationError> {
        if self.find(definition.name()).is_some() {
            return Err(GenerationError::DuplicatePuzzle(definition.name().to_string()));
        }
        self.definitions.push(Box::new(definition));
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&dyn PuzzleDefinition, GenerationError> {
        self.find(name)
            .ok_or_else(|| GenerationError::UnknownPuzzle(name.to_string()))
    }

    /// Build one registered puzzle.
    pub fn build(&self, name: &str, config: &BuildConfig) -> Result<BuildReport, GenerationError> {
        GenerationPipeline::new(self.get(name)?).build_with(config)
    }

    /// Build every registered puzzle in turn, each with its own random source
    /// and deduplicator. Results are returned in registration order.
    pub fn generate_all(
        &self,
        config: &BuildConfig,
    ) -> Result<Vec<(String, Vec<Instance>)>, GenerationError> {
        let mut results = Vec::with_capacity(self.definitions.len());
        for definition in &self.definitions {
            let report = GenerationPipeline::new(definition.as_ref()).build_with(config)?;
            results.push((definition.name().to_string(), report.instances));
        }
        let total: usize = results.iter().map(|(_, instances)| instances.len()).sum();
        info!(puzzles = results.len(), instances = total, "generated all puzzles");
        Ok(results)
    }

    fn find(&self, name: &str) -> Option<&dyn PuzzleDefinition> {
        self.definitions
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ListSum, ReverseString};

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        registry.register(ReverseString::new()).unwrap();
        registry.register(ListSum::new()).unwrap();

        assert_eq!(registry.names(), vec!["ReverseString", "ListSum"]);
        assert_eq!(registry.get("ListSum").unwrap().name(), "ListSum");
        assert!(matches!(
            registry.get("Nope"),
            Err(GenerationError::UnknownPuzzle(name)) if name == "Nope"
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = Registry::new();
        registry.register(ListSum::new()).unwrap();
        assert!(matches!(
            registry.register(ListSum::new()),
            Err(GenerationError::DuplicatePuzzle(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_generate_all_matches_individual_builds() {
        let mut registry = Registry::new();
        registry.register(ReverseString::new()).unwrap();
        registry.register(ListSum::new()).unwrap();
        let config = BuildConfig::with_target(4);

        let all = registry.generate_all(&config).unwrap();
        assert_eq!(all.len(), 2);
        for (name, instances) in &all {
            let single = registry.build(name, &config).unwrap();
            assert_eq!(&single.instances, instances);
            assert_eq!(instances.len(), 4);
        }
    }
}
