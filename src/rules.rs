//! Production rules, the validated rule table and per-rule firing statistics.

use crate::error::ArborError;
use serde::{Deserialize, Serialize};

/// A single stochastic production: `pattern -> replacement` with a selection weight.
///
/// Weights of rules sharing a pattern need not sum to one. A weight of zero keeps
/// the rule in longest-match grouping but it is never selected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionRule {
    pub pattern: String,
    pub replacement: String,
    pub weight: f64,
}

impl ProductionRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>, weight: f64) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            weight,
        }
    }

    /// The statistics key for this rule, e.g. `"F -> FRF"`.
    pub fn label(&self) -> String {
        format!("{} -> {}", self.pattern, self.replacement)
    }
}

/// A rule with its pattern pre-split into symbols for window comparison.
#[derive(Clone, Debug)]
struct CompiledRule {
    pattern: Vec<char>,
    /// Index of this rule's counter in [`RuleStatistics`].
    slot: usize,
}

/// Immutable, ordered list of validated production rules.
///
/// Order is significant: among longest-match candidates, weights are accumulated
/// in table order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<ProductionRule>", into = "Vec<ProductionRule>")]
pub struct RuleTable {
    rules: Vec<ProductionRule>,
    compiled: Vec<CompiledRule>,
    labels: Vec<String>,
}

impl RuleTable {
    /// Validates and freezes `rules`.
    ///
    /// Fails on an empty pattern or a negative / non-finite weight.
    pub fn new(rules: Vec<ProductionRule>) -> Result<Self, ArborError> {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut labels: Vec<String> = Vec::new();

        for rule in &rules {
            if rule.pattern.is_empty() {
                return Err(ArborError::EmptyPattern {
                    replacement: rule.replacement.clone(),
                });
            }
            if !rule.weight.is_finite() || rule.weight < 0.0 {
                return Err(ArborError::InvalidRuleWeight {
                    pattern: rule.pattern.clone(),
                    replacement: rule.replacement.clone(),
                    weight: rule.weight,
                });
            }

            // Rules with identical labels share a counter.
            let label = rule.label();
            let slot = match labels.iter().position(|l| *l == label) {
                Some(slot) => slot,
                None => {
                    labels.push(label);
                    labels.len() - 1
                }
            };

            compiled.push(CompiledRule {
                pattern: rule.pattern.chars().collect(),
                slot,
            });
        }

        Ok(Self {
            rules,
            compiled,
            labels,
        })
    }

    pub fn rules(&self) -> &[ProductionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Length of the longest pattern matching `symbols` at `index`, if any.
    ///
    /// Patterns that would run past the end of `symbols` never match.
    pub fn longest_match(&self, symbols: &[char], index: usize) -> Option<usize> {
        self.compiled
            .iter()
            .filter(|rule| matches_at(&rule.pattern, symbols, index))
            .map(|rule| rule.pattern.len())
            .max()
    }

    /// Rules of exactly `len` symbols matching at `index`, in table order.
    ///
    /// Yields `(rule_index, rule)` pairs.
    pub fn candidates_at<'a>(
        &'a self,
        symbols: &'a [char],
        index: usize,
        len: usize,
    ) -> impl Iterator<Item = (usize, &'a ProductionRule)> + 'a {
        self.compiled
            .iter()
            .enumerate()
            .filter(move |(_, rule)| {
                rule.pattern.len() == len && matches_at(&rule.pattern, symbols, index)
            })
            .map(move |(i, _)| (i, &self.rules[i]))
    }

    /// A zeroed statistics map with one entry per distinct rule label.
    pub fn empty_statistics(&self) -> RuleStatistics {
        RuleStatistics {
            entries: self.labels.iter().map(|l| (l.clone(), 0)).collect(),
        }
    }

    /// Increments the counter of the rule at `rule_index` in `statistics`.
    ///
    /// `statistics` must come from [`empty_statistics`](Self::empty_statistics)
    /// on this table.
    pub(crate) fn record(&self, statistics: &mut RuleStatistics, rule_index: usize) {
        if let Some(rule) = self.compiled.get(rule_index) {
            statistics.entries[rule.slot].1 += 1;
        }
    }
}

impl TryFrom<Vec<ProductionRule>> for RuleTable {
    type Error = ArborError;

    fn try_from(rules: Vec<ProductionRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<RuleTable> for Vec<ProductionRule> {
    fn from(table: RuleTable) -> Self {
        table.rules
    }
}

fn matches_at(pattern: &[char], symbols: &[char], index: usize) -> bool {
    symbols
        .get(index..index + pattern.len())
        .is_some_and(|window| window == pattern)
}

/// Number of times each rule fired, keyed by `"pattern -> replacement"`.
///
/// Counters only ever increase. Entries keep the order of the rule table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleStatistics {
    entries: Vec<(String, u64)>,
}

impl RuleStatistics {
    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, count)| count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Total number of rule applications.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Adds `other`'s counts into `self`, appending labels not yet present.
    pub fn merge(&mut self, other: &RuleStatistics) {
        for (label, count) in &other.entries {
            match self.entries.iter_mut().find(|(l, _)| l == label) {
                Some(entry) => entry.1 += count,
                None => self.entries.push((label.clone(), *count)),
            }
        }
    }
}
