// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Error Types

use std::path::PathBuf;

/// Infeasible network requests, raised while a topology is being built.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("network needs at least {minimum} vertices, {requested} requested")]
    TooFewVertices { requested: usize, minimum: usize },

    #[error("degree {degree} exceeds n-1 for {vertices} vertices")]
    DegreeTooHigh { degree: usize, vertices: usize },

    #[error("odd degree {degree} cannot be regular over an odd vertex count {vertices}")]
    OddDegreeOddSize { degree: usize, vertices: usize },

    #[error("ring lattice degree must be even, got {0}")]
    OddRingDegree(usize),
}

/// Problems with the key=value configuration input.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown model `{0}` (expected `ba` or `ws`)")]
    UnknownModel(String),

    #[error("line {line} is not a key=value pair: `{content}`")]
    MalformedLine { line: usize, content: String },

    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// The configuration key at fault, when one is identifiable.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey(k) => Some(k),
            Self::InvalidValue { key, .. } => Some(key),
            Self::UnknownModel(_) => Some("model"),
            Self::MalformedLine { .. } | Self::Io { .. } => None,
        }
    }
}

/// Any failure that aborts a run before it produces a series.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),
}
