//! Merge configuration.

use std::fmt;
use std::str::FromStr;

/// How a change set is turned into a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Guard every changed field with `current = baseline OR current = desired`
    /// and write without reading first.
    #[default]
    Equality,
    /// Fetch current values, re-apply a text patch per field, and write the
    /// patched values guarded by the fetched ones.
    Patch,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Equality => write!(f, "equality"),
            MergeStrategy::Patch => write!(f, "patch"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equality" => Ok(MergeStrategy::Equality),
            "patch" => Ok(MergeStrategy::Patch),
            other => Err(format!(
                "unknown merge strategy '{}' (expected 'equality' or 'patch')",
                other
            )),
        }
    }
}

/// Patch engine tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchConfig {
    /// Maximum match score accepted when locating a hunk (0.0 = exact, 1.0 = anything)
    pub match_threshold: f32,
    /// Distance in characters at which positional drift alone costs a score of 1.0
    /// (0 = only the expected location is acceptable)
    pub match_distance: usize,
    /// Characters of unchanged context kept around each hunk
    pub patch_margin: usize,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.1,
            match_distance: 1000,
            patch_margin: 4,
        }
    }
}

/// Merge configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeConfig {
    /// Conditional write strategy
    pub strategy: MergeStrategy,
    /// Patch engine tunables (used by [`MergeStrategy::Patch`])
    pub patch: PatchConfig,
    /// Remove `\r` from submitted values before comparing them
    pub strip_carriage_returns: bool,
}

impl MergeConfig {
    /// Creates a configuration for the given strategy with default tunables.
    pub fn with_strategy(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }
}
