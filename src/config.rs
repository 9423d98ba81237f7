// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Run Configuration

//! Flat `key=value` run configuration.
//!
//! ```text
//! # scale-free network, herding on
//! model=ba
//! size=1000
//! timesteps=200
//! investor_start=0.25
//! herd=true
//! ```
//!
//! `ws` additionally requires `k` (even degree) and `rewire`. Optional keys:
//! `seed`, `attachment` (`roulette` | `independent`), `cooldown`,
//! `rate_limit`, `recency`.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::params::DecisionParams;
use crate::social_sphere::{AttachmentRule, TopologyModel, SEED_CORE_SIZE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub topology: TopologyModel,
    pub size: usize,
    pub timesteps: u64,
    /// Chance that an investor starts in the market.
    pub investor_start: f64,
    /// Enables the peer influence and peer recency factors.
    pub herd: bool,
    pub seed: Option<u64>,
    pub cooldown: Option<u32>,
    pub rate_limit: Option<f64>,
    pub recency: Option<u32>,
}

impl SimConfig {
    pub fn barabasi_albert(size: usize, timesteps: u64, investor_start: f64, herd: bool) -> Self {
        Self::with_topology(
            TopologyModel::barabasi_albert(AttachmentRule::default()),
            size,
            timesteps,
            investor_start,
            herd,
        )
    }

    pub fn watts_strogatz(
        size: usize,
        timesteps: u64,
        investor_start: f64,
        herd: bool,
        k: usize,
        rewire: f64,
    ) -> Self {
        Self::with_topology(
            TopologyModel::watts_strogatz(k, rewire),
            size,
            timesteps,
            investor_start,
            herd,
        )
    }

    fn with_topology(
        topology: TopologyModel,
        size: usize,
        timesteps: u64,
        investor_start: f64,
        herd: bool,
    ) -> Self {
        Self {
            topology,
            size,
            timesteps,
            investor_start,
            herd,
            seed: None,
            cooldown: None,
            rate_limit: None,
            recency: None,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    /// Checks value ranges and the size/degree compatibility of the model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::invalid("size", "0", "must be positive"));
        }
        if self.timesteps == 0 {
            return Err(ConfigError::invalid("timesteps", "0", "must be positive"));
        }
        check_unit("investor_start", self.investor_start)?;
        match &self.topology {
            TopologyModel::PreferentialAttachment { .. } => {
                if self.size < SEED_CORE_SIZE {
                    return Err(ConfigError::invalid(
                        "size",
                        &self.size.to_string(),
                        format!("preferential attachment needs at least {SEED_CORE_SIZE} vertices"),
                    ));
                }
            }
            TopologyModel::SmallWorld { k, rewire } => {
                if *k == 0 || k % 2 == 1 {
                    return Err(ConfigError::invalid(
                        "k",
                        &k.to_string(),
                        "must be an even positive integer",
                    ));
                }
                if *k > self.size - 1 {
                    return Err(ConfigError::invalid(
                        "k",
                        &k.to_string(),
                        format!("exceeds size-1 = {}", self.size - 1),
                    ));
                }
                check_unit("rewire", *rewire)?;
            }
        }
        if let Some(rate) = self.rate_limit {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::invalid("rate_limit", &rate.to_string(), "must be in (0, 1]"));
            }
        }
        Ok(())
    }

    /// Default decision parameters with this configuration's overrides.
    pub fn decision_params(&self) -> DecisionParams {
        self.apply_overrides(DecisionParams::default())
    }

    pub fn apply_overrides(&self, mut params: DecisionParams) -> DecisionParams {
        if let Some(cooldown) = self.cooldown {
            params.cooldown = cooldown;
        }
        if let Some(rate) = self.rate_limit {
            params.rate_limit = rate;
        }
        if let Some(recency) = self.recency {
            params.recency_window = recency;
        }
        params
    }
}

impl FromStr for SimConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let entries = parse_entries(text)?;
        let raw = |key: &'static str| entries.get(key).map(String::as_str);
        let required = |key: &'static str| raw(key).ok_or(ConfigError::MissingKey(key));

        let size: usize = parse_value("size", required("size")?)?;
        let timesteps: u64 = parse_value("timesteps", required("timesteps")?)?;
        let investor_start: f64 = parse_value("investor_start", required("investor_start")?)?;
        let herd = parse_bool("herd", required("herd")?)?;

        let topology = match required("model")?.to_ascii_lowercase().as_str() {
            "ba" => {
                let rule = match raw("attachment") {
                    None => AttachmentRule::default(),
                    Some(v) => match v.to_ascii_lowercase().as_str() {
                        "roulette" => AttachmentRule::Roulette,
                        "independent" => AttachmentRule::Independent,
                        _ => {
                            return Err(ConfigError::invalid(
                                "attachment",
                                v,
                                "expected `roulette` or `independent`",
                            ))
                        }
                    },
                };
                TopologyModel::barabasi_albert(rule)
            }
            "ws" => {
                let k: usize = parse_value("k", required("k")?)?;
                let rewire: f64 = parse_value("rewire", required("rewire")?)?;
                TopologyModel::watts_strogatz(k, rewire)
            }
            other => return Err(ConfigError::UnknownModel(other.to_string())),
        };

        let config = SimConfig {
            topology,
            size,
            timesteps,
            investor_start,
            herd,
            seed: raw("seed").map(|v| parse_value("seed", v)).transpose()?,
            cooldown: raw("cooldown").map(|v| parse_value("cooldown", v)).transpose()?,
            rate_limit: raw("rate_limit").map(|v| parse_value("rate_limit", v)).transpose()?,
            recency: raw("recency").map(|v| parse_value("recency", v)).transpose()?,
        };
        config.validate()?;
        Ok(config)
    }
}

// ─── Parsing helpers ────────────────────────────────────────────────────────

const KNOWN_KEYS: &[&str] = &[
    "model",
    "size",
    "timesteps",
    "investor_start",
    "herd",
    "k",
    "rewire",
    "seed",
    "attachment",
    "cooldown",
    "rate_limit",
    "recency",
];

fn parse_entries(text: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut entries = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(ConfigError::MalformedLine {
                line: idx + 1,
                content: trimmed.to_string(),
            });
        };
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(ConfigError::MalformedLine {
                line: idx + 1,
                content: trimmed.to_string(),
            });
        }
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!("ignoring unknown config key `{}` on line {}", key, idx + 1);
            continue;
        }
        if entries.insert(key.clone(), value.trim().to_string()).is_some() {
            warn!("config key `{}` repeated on line {}; last value wins", key, idx + 1);
        }
    }
    Ok(entries)
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, value, e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected a boolean")),
    }
}

fn check_unit(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, &value.to_string(), "must be a probability in [0, 1]"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BA: &str = "\
# scale-free
model=ba
size=50
timesteps=20

investor_start=0.3
herd=true
";

    #[test]
    fn test_parse_ba() {
        let config: SimConfig = BA.parse().unwrap();
        assert_eq!(config.size, 50);
        assert_eq!(config.timesteps, 20);
        assert!(config.herd);
        assert_eq!(config.topology, TopologyModel::barabasi_albert(AttachmentRule::Roulette));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_parse_ws_with_optionals() {
        let text = "model=ws\nsize=30\ntimesteps=5\ninvestor_start=0.5\nherd=no\nk=4\nrewire=0.1\nseed=9\ncooldown=2\n";
        let config: SimConfig = text.parse().unwrap();
        assert_eq!(config.topology, TopologyModel::watts_strogatz(4, 0.1));
        assert!(!config.herd);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.decision_params().cooldown, 2);
    }

    #[test]
    fn test_missing_ws_key_is_named() {
        let text = "model=ws\nsize=30\ntimesteps=5\ninvestor_start=0.5\nherd=true\nk=4\n";
        let err = text.parse::<SimConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("rewire")));
        assert_eq!(err.key(), Some("rewire"));
    }

    #[test]
    fn test_unknown_model() {
        let text = BA.replace("model=ba", "model=er");
        let err = text.parse::<SimConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownModel(ref m) if m == "er"));
        assert_eq!(err.key(), Some("model"));
    }

    #[test]
    fn test_non_numeric_value() {
        let text = BA.replace("size=50", "size=fifty");
        let err = text.parse::<SimConfig>().unwrap_err();
        assert_eq!(err.key(), Some("size"));
    }

    #[test]
    fn test_odd_k_rejected() {
        let text = "model=ws\nsize=30\ntimesteps=5\ninvestor_start=0.5\nherd=true\nk=3\nrewire=0.1\n";
        let err = text.parse::<SimConfig>().unwrap_err();
        assert_eq!(err.key(), Some("k"));
    }

    #[test]
    fn test_k_too_large_rejected() {
        let text = "model=ws\nsize=4\ntimesteps=5\ninvestor_start=0.5\nherd=true\nk=4\nrewire=0.1\n";
        let err = text.parse::<SimConfig>().unwrap_err();
        assert_eq!(err.key(), Some("k"));
    }

    #[test]
    fn test_probability_out_of_range() {
        let text = BA.replace("investor_start=0.3", "investor_start=1.5");
        let err = text.parse::<SimConfig>().unwrap_err();
        assert_eq!(err.key(), Some("investor_start"));
    }

    #[test]
    fn test_malformed_line() {
        let text = format!("{BA}just words\n");
        let err = text.parse::<SimConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::MalformedLine { line: 8, .. }));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let text = format!("{BA}colour=blue\n");
        assert!(text.parse::<SimConfig>().is_ok());
    }

    #[test]
    fn test_bad_attachment_rule() {
        let text = format!("{BA}attachment=random\n");
        let err = text.parse::<SimConfig>().unwrap_err();
        assert_eq!(err.key(), Some("attachment"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BA.as_bytes()).unwrap();
        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.size, 50);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimConfig::load("/definitely/not/here.cfg").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(err.key(), None);
    }
}
