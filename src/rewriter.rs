//! Stochastic, longest-match-wins string rewriting.
//!
//! Each generation scans the current string left to right. At every position the
//! rules whose pattern matches are collected and only the longest pattern length
//! is kept. One uniform value `u` in `[0, 1)` is drawn for that group and weights
//! are accumulated in table order; the first rule whose running total reaches `u`
//! fires. If none does (the group's weights sum to less than `u`), the matched
//! substring is copied through unchanged. Positions with no matching rule copy a
//! single symbol.
//!
//! Random draws happen strictly in scan order, one per matched group, so a fixed
//! seed reproduces the same string.

use crate::rules::{RuleStatistics, RuleTable};
use rand::Rng;

/// Turtle commands that start a branch when they directly follow `[`.
const ROTATION_SYMBOLS: [char; 7] = ['+', '-', '&', '^', '/', '\\', '|'];

/// A grammar state being rewritten under a rule table.
#[derive(Clone, Debug)]
pub struct LSystem<'a> {
    table: &'a RuleTable,
    state: String,
    statistics: RuleStatistics,
    generation: u32,
}

impl<'a> LSystem<'a> {
    pub fn new(axiom: impl Into<String>, table: &'a RuleTable) -> Self {
        Self {
            table,
            state: axiom.into(),
            statistics: table.empty_statistics(),
            generation: 0,
        }
    }

    /// The current symbol string.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn into_state(self) -> String {
        self.state
    }

    pub fn statistics(&self) -> &RuleStatistics {
        &self.statistics
    }

    /// Number of generations applied so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Rewrites the state for `generations` generations.
    pub fn iterate<R: Rng>(&mut self, generations: u32, rng: &mut R) {
        for _ in 0..generations {
            self.step(rng);
        }
    }

    /// Applies one generation of rewriting.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        let symbols: Vec<char> = self.state.chars().collect();
        let mut next = String::with_capacity(self.state.len() * 2);
        let mut i = 0;
        let mut fallbacks = 0usize;

        while i < symbols.len() {
            let Some(len) = self.table.longest_match(&symbols, i) else {
                next.push(symbols[i]);
                i += 1;
                continue;
            };

            let u: f64 = rng.gen_range(0.0..1.0);
            let mut cumulative = 0.0;
            let mut fired = None;
            for (index, rule) in self.table.candidates_at(&symbols, i, len) {
                if rule.weight == 0.0 {
                    continue;
                }
                cumulative += rule.weight;
                if u <= cumulative {
                    fired = Some((index, rule));
                    break;
                }
            }

            match fired {
                Some((index, rule)) => {
                    next.push_str(&rule.replacement);
                    self.table.record(&mut self.statistics, index);
                }
                // Not renormalized: the whole matched window passes through.
                None => {
                    next.extend(&symbols[i..i + len]);
                    fallbacks += 1;
                }
            }
            i += len;
        }

        self.state = next;
        self.generation += 1;

        if fallbacks > 0 {
            tracing::trace!(
                generation = self.generation,
                fallbacks,
                "rule groups kept their matched symbols"
            );
        }
        tracing::debug!(
            generation = self.generation,
            len = self.state.len(),
            "rewrote generation"
        );
    }

    /// Deletes every occurrence of `symbol` from the state.
    pub fn remove_symbol(&mut self, symbol: char) {
        self.state.retain(|c| c != symbol);
    }

    /// See [`estimate_branch_groups`].
    pub fn estimate_branch_groups(&self) -> usize {
        estimate_branch_groups(&self.state)
    }
}

/// Rewrites `axiom` for `generations` generations and returns the final string
/// together with the rule firing counts.
pub fn expand<R: Rng>(
    axiom: &str,
    table: &RuleTable,
    generations: u32,
    rng: &mut R,
) -> (String, RuleStatistics) {
    let mut system = LSystem::new(axiom, table);
    system.iterate(generations, rng);
    let LSystem {
        state, statistics, ..
    } = system;
    (state, statistics)
}

/// Returns `symbols` with every occurrence of `symbol` removed.
pub fn remove_symbol(symbols: &str, symbol: char) -> String {
    symbols.chars().filter(|&c| c != symbol).collect()
}

/// Counts `[` immediately followed by a rotation command.
///
/// Each such pair opens a branch that leaves the parent axis, so the count is a
/// cheap estimate of how many branch groups the interpreted tree will have.
pub fn estimate_branch_groups(symbols: &str) -> usize {
    let chars: Vec<char> = symbols.chars().collect();
    chars
        .windows(2)
        .filter(|w| w[0] == '[' && ROTATION_SYMBOLS.contains(&w[1]))
        .count()
}
