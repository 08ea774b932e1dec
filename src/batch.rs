//! Batch generation of independent stochastic trees ("worlds").
//!
//! A [`BatchDriver`] runs the full rewrite + interpretation pipeline once per
//! world. World `i` always draws from [`TreeRng::for_world`]`(seed, i)`, so a
//! batch gives the same trees whether it is generated sequentially or in
//! parallel, and a failing world never touches its siblings.

use crate::error::ArborError;
use crate::interpreter::{TreeParams, TurtleInterpreter};
use crate::rewriter::{LSystem, estimate_branch_groups};
use crate::rng::TreeRng;
use crate::rules::{RuleStatistics, RuleTable};
use crate::skeleton::TreeSkeleton;
use crate::turtle::TurtleOp;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

fn default_generations() -> u32 {
    4
}

/// Everything needed to grow one family of trees.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeRecipe {
    pub name: String,
    pub axiom: String,
    pub rules: RuleTable,
    #[serde(default = "default_generations")]
    pub generations: u32,
    /// Symbol deleted from the final string before interpretation.
    #[serde(default)]
    pub strip_symbol: Option<char>,
    #[serde(default)]
    pub params: TreeParams,
}

impl TreeRecipe {
    pub fn new(name: impl Into<String>, axiom: impl Into<String>, rules: RuleTable) -> Self {
        Self {
            name: name.into(),
            axiom: axiom.into(),
            rules,
            generations: default_generations(),
            strip_symbol: None,
            params: TreeParams::default(),
        }
    }

    pub fn with_generations(mut self, generations: u32) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_strip_symbol(mut self, symbol: char) -> Self {
        self.strip_symbol = Some(symbol);
        self
    }

    pub fn with_params(mut self, params: TreeParams) -> Self {
        self.params = params;
        self
    }
}

/// One independently grown tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeWorld {
    /// Position of this world within its batch.
    pub index: u64,
    /// The final symbol string that was interpreted.
    pub symbols: String,
    pub skeleton: TreeSkeleton,
    pub statistics: RuleStatistics,
    /// Estimated number of branch groups, see [`estimate_branch_groups`].
    pub branch_groups: usize,
}

/// Repeats the rewrite + interpretation pipeline for a [`TreeRecipe`].
#[derive(Clone, Debug)]
pub struct BatchDriver {
    recipe: TreeRecipe,
    interpreter: TurtleInterpreter,
    seed: u64,
}

impl BatchDriver {
    /// Creates a driver using the standard turtle symbol table.
    pub fn new(recipe: TreeRecipe, seed: u64) -> Self {
        let interpreter = TurtleInterpreter::standard(recipe.params.clone());
        Self {
            recipe,
            interpreter,
            seed,
        }
    }

    /// Overrides the turtle operation for one symbol (builder pattern).
    pub fn with_op(mut self, symbol: char, op: TurtleOp) -> Self {
        self.interpreter.set_op(symbol, op);
        self
    }

    pub fn recipe(&self) -> &TreeRecipe {
        &self.recipe
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewrites the axiom with draws from `rng`, strips the configured symbol
    /// and interprets the result.
    pub fn grow<R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<(String, RuleStatistics, TreeSkeleton), ArborError> {
        let mut system = LSystem::new(self.recipe.axiom.as_str(), &self.recipe.rules);
        system.iterate(self.recipe.generations, rng);
        if let Some(symbol) = self.recipe.strip_symbol {
            system.remove_symbol(symbol);
        }

        let skeleton = self.interpreter.interpret(system.state())?;
        let statistics = system.statistics().clone();
        Ok((system.into_state(), statistics, skeleton))
    }

    /// Grows world `index` from its own derived random stream.
    pub fn generate_world(&self, index: u64) -> Result<TreeWorld, ArborError> {
        let mut rng = TreeRng::for_world(self.seed, index);
        let (symbols, statistics, skeleton) = self.grow(&mut rng).inspect_err(|e| {
            tracing::warn!(recipe = %self.recipe.name, index, error = %e, "world failed");
        })?;

        Ok(TreeWorld {
            index,
            branch_groups: estimate_branch_groups(&symbols),
            symbols,
            skeleton,
            statistics,
        })
    }

    /// Grows `count` worlds one after another.
    pub fn generate(&self, count: usize) -> Vec<Result<TreeWorld, ArborError>> {
        tracing::info!(recipe = %self.recipe.name, count, seed = self.seed, "generating worlds");
        let worlds: Vec<_> = (0..count)
            .map(|index| self.generate_world(index as u64))
            .collect();
        self.log_finished(&worlds);
        worlds
    }

    /// Grows `count` worlds on the rayon thread pool.
    ///
    /// Output order and content match [`generate`](Self::generate).
    pub fn generate_parallel(&self, count: usize) -> Vec<Result<TreeWorld, ArborError>> {
        tracing::info!(
            recipe = %self.recipe.name,
            count,
            seed = self.seed,
            "generating worlds in parallel"
        );
        let worlds: Vec<_> = (0..count)
            .into_par_iter()
            .map(|index| self.generate_world(index as u64))
            .collect();
        self.log_finished(&worlds);
        worlds
    }

    fn log_finished(&self, worlds: &[Result<TreeWorld, ArborError>]) {
        let failed = worlds.iter().filter(|w| w.is_err()).count();
        tracing::info!(
            recipe = %self.recipe.name,
            succeeded = worlds.len() - failed,
            failed,
            "batch finished"
        );
    }
}

/// Aggregate view over a generated batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Segment count of each successful world, in world order.
    pub segment_counts: Vec<usize>,
    /// Rule firing counts summed over successful worlds.
    pub statistics: RuleStatistics,
}

impl BatchSummary {
    pub fn from_worlds(worlds: &[Result<TreeWorld, ArborError>]) -> Self {
        let mut summary = Self::default();
        for world in worlds {
            match world {
                Ok(world) => {
                    summary.succeeded += 1;
                    summary.segment_counts.push(world.skeleton.len());
                    summary.statistics.merge(&world.statistics);
                }
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}
