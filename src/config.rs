//! Game Configuration
//!
//! Fixed per deployment. Every field has a default and can be
//! overridden from the environment.

use std::time::Duration;

use crate::game::question::Difficulty;
use crate::{DEFAULT_TICK_INTERVAL_MS, TIMER_MAX};

/// Banner shown before a game starts.
pub const DEFAULT_BANNER_URL: &str =
    "https://assets.tvokids.com/prod/s3fs-public/app-images/tileSM_app_mathMaster.jpg";

/// Configuration for games run by a bot.
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Countdown length per round, in ticks.
    pub timer_max: i32,
    /// Time between ticks.
    pub tick_interval: Duration,
    /// Pause between intro lines.
    pub intro_delay: Duration,
    /// Question difficulty.
    pub difficulty: Difficulty,
    /// Banner image sent before the intro, if any.
    pub banner_url: Option<String>,
    /// Fixed question seed. When unset each game derives its own.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timer_max: TIMER_MAX,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            intro_delay: Duration::from_millis(1000),
            difficulty: Difficulty::default(),
            banner_url: Some(DEFAULT_BANNER_URL.to_string()),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create config from environment variables.
    ///
    /// - `MATH_MASTER_TIMER_MAX`: ticks per round
    /// - `MATH_MASTER_TICK_MS`: tick interval in milliseconds
    /// - `MATH_MASTER_INTRO_DELAY_MS`: pause between intro lines
    /// - `MATH_MASTER_SEED`: fixed question seed
    /// - `MATH_MASTER_BANNER_URL`: banner image, empty to disable
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            timer_max: lookup("MATH_MASTER_TIMER_MAX")
                .and_then(|v| v.trim().parse::<i32>().ok())
                .filter(|v| *v >= 0)
                .unwrap_or(defaults.timer_max),
            tick_interval: parse("MATH_MASTER_TICK_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            intro_delay: parse("MATH_MASTER_INTRO_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.intro_delay),
            difficulty: defaults.difficulty,
            banner_url: match lookup("MATH_MASTER_BANNER_URL") {
                Some(url) if url.trim().is_empty() => None,
                Some(url) => Some(url),
                None => defaults.banner_url,
            },
            seed: parse("MATH_MASTER_SEED"),
        }
    }

    /// Config with no intro pauses and no banner.
    pub fn quick() -> Self {
        Self {
            intro_delay: Duration::ZERO,
            banner_url: None,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.timer_max, TIMER_MAX);
        assert_eq!(config.tick_interval, Duration::from_millis(1000));
        assert!(config.banner_url.is_some());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = GameConfig::from_lookup(lookup(&[
            ("MATH_MASTER_TIMER_MAX", "5"),
            ("MATH_MASTER_TICK_MS", "250"),
            ("MATH_MASTER_INTRO_DELAY_MS", "0"),
            ("MATH_MASTER_SEED", "99"),
            ("MATH_MASTER_BANNER_URL", ""),
        ]));

        assert_eq!(config.timer_max, 5);
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.intro_delay, Duration::ZERO);
        assert_eq!(config.seed, Some(99));
        assert!(config.banner_url.is_none());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = GameConfig::from_lookup(lookup(&[
            ("MATH_MASTER_TIMER_MAX", "-3"),
            ("MATH_MASTER_TICK_MS", "0"),
            ("MATH_MASTER_SEED", "abc"),
        ]));

        assert_eq!(config.timer_max, TIMER_MAX);
        assert_eq!(config.tick_interval, Duration::from_millis(DEFAULT_TICK_INTERVAL_MS));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_quick() {
        let config = GameConfig::quick();
        assert_eq!(config.intro_delay, Duration::ZERO);
        assert!(config.banner_url.is_none());
    }
}
