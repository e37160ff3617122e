//! Service configuration from environment variables.
//!
//! `PORT` (default 8080), `DATA_DIR` (unset ⇒ in-memory store), `ENFORCE_SEX`,
//! `ENFORCE_QUANTITY` (default off), `STRICT_VALIDATION` (default on).
//! Boolean flags accept `1` or `true` (any case); anything else is false.

use crate::eligibility::MatchRules;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub port: u16,
    /// JSON-file store directory. `None` keeps records in memory only.
    pub data_dir: Option<PathBuf>,
    pub rules: MatchRules,
    /// Reject demand listings with no regions or an inverted age range at the API.
    pub strict_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_dir: None,
            rules: MatchRules::default(),
            strict_validation: true,
        }
    }
}

fn parse_flag(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (env, map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| lookup(key).map(|v| parse_flag(v.trim())).unwrap_or(default);
        Self {
            port: lookup("PORT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.port),
            data_dir: lookup("DATA_DIR")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            rules: MatchRules {
                enforce_sex: flag("ENFORCE_SEX", defaults.rules.enforce_sex),
                enforce_quantity: flag("ENFORCE_QUANTITY", defaults.rules.enforce_quantity),
            },
            strict_validation: flag("STRICT_VALIDATION", defaults.strict_validation),
        }
    }
}
