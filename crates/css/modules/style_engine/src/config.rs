//! Configuration settings for the style engine.
//!
//! Configuration can be loaded from environment variables or constructed
//! programmatically.

use core::str::FromStr;
use std::env;

use log::warn;

/// When derived stages are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecomputeMode {
    /// Stages derive on first read after an invalidation.
    #[default]
    Lazy,
    /// Every changed attribute is settled through `Actual` right after a cascade.
    Immediate,
}

impl FromStr for RecomputeMode {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "lazy" => Ok(Self::Lazy),
            "immediate" => Ok(Self::Immediate),
            other => Err(format!("unknown recompute mode `{other}`")),
        }
    }
}

/// Runtime configuration for a styled document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleConfig {
    /// Threads of the dedicated cascade pool; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    pub recompute: RecomputeMode,
}

impl StyleConfig {
    /// Construct a new `StyleConfig` with explicit values.
    ///
    /// A thread count of zero is treated as `None`.
    #[inline]
    #[must_use]
    pub const fn new(threads: Option<usize>, recompute: RecomputeMode) -> Self {
        let threads = match threads {
            Some(0) => None,
            other => other,
        };
        Self { threads, recompute }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `VALOR_STYLE_THREADS`: threads of the dedicated cascade pool (default: global pool)
    /// - `VALOR_STYLE_RECOMPUTE`: `lazy` (default) or `immediate`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("VALOR_STYLE_THREADS").ok().as_deref(),
            env::var("VALOR_STYLE_RECOMPUTE").ok().as_deref(),
        )
    }

    fn from_vars(threads: Option<&str>, recompute: Option<&str>) -> Self {
        let threads = threads.and_then(|val| val.trim().parse::<usize>().ok());
        let recompute = recompute
            .map(|val| {
                val.parse().unwrap_or_else(|error| {
                    warn!(target: "style_engine", "{error}; using lazy recompute");
                    RecomputeMode::Lazy
                })
            })
            .unwrap_or_default();
        Self::new(threads, recompute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_parse_leniently() {
        let config = StyleConfig::from_vars(Some(" 4 "), Some("Immediate"));
        assert_eq!(config, StyleConfig::new(Some(4), RecomputeMode::Immediate));

        let fallback = StyleConfig::from_vars(Some("many"), Some("eager"));
        assert_eq!(fallback, StyleConfig::default());

        assert_eq!(StyleConfig::new(Some(0), RecomputeMode::Lazy).threads, None);
    }
}
