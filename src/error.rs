//! Error type shared by rule construction, parameter validation and interpretation.

/// Errors raised while building a grammar or interpreting a symbol string.
///
/// None of these are retryable: rewriting and interpretation are deterministic
/// for a given random stream, so the same input reproduces the same error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArborError {
    /// A `]` was read while the frame stack was empty.
    #[error("malformed grammar: unmatched '{symbol}' at position {position}")]
    MalformedGrammar { position: usize, symbol: char },

    /// A production rule carried a negative or non-finite weight.
    #[error("invalid weight {weight} for rule \"{pattern} -> {replacement}\"")]
    InvalidRuleWeight {
        pattern: String,
        replacement: String,
        weight: f64,
    },

    /// A production rule with an empty pattern would match everywhere.
    #[error("rule with replacement \"{replacement}\" has an empty pattern")]
    EmptyPattern { replacement: String },

    /// A geometric parameter was outside its valid range.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}
