// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Per-Tick JSONL Recorder

use herd_engine::TickResult;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub total_shares: f64,
    pub fullness: f64,
    pub in_market: usize,
    pub joins: usize,
    pub leaves: usize,
    pub blocked_by_capacity: usize,
    pub blocked_by_cooldown: usize,
    pub blocked_by_rate_limit: usize,
}

impl TickSnapshot {
    pub fn from_result(result: &TickResult, limit: f64) -> Self {
        let fullness = if limit > 0.0 { result.total_shares / limit } else { 0.0 };
        Self {
            tick: result.tick,
            total_shares: result.total_shares,
            fullness,
            in_market: result.in_market,
            joins: result.joins,
            leaves: result.leaves,
            blocked_by_capacity: result.blocked_by_capacity,
            blocked_by_cooldown: result.blocked_by_cooldown,
            blocked_by_rate_limit: result.blocked_by_rate_limit,
        }
    }
}

/// Accumulates snapshots and writes them as JSON lines
#[derive(Default)]
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &TickResult, limit: f64) {
        self.snapshots.push(TickSnapshot::from_result(result, limit));
    }

    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot).map_err(std::io::Error::other)?;
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(tick: u64, total: f64) -> TickResult {
        TickResult {
            tick,
            total_shares: total,
            in_market: 3,
            joins: 1,
            leaves: 0,
            blocked_by_capacity: 0,
            blocked_by_cooldown: 2,
            blocked_by_rate_limit: 0,
        }
    }

    #[test]
    fn test_write_jsonl_one_line_per_tick() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("seed-0.jsonl");
        let mut rec = TimeSeriesRecorder::new();
        rec.record(&result(1, 5.0), 10.0);
        rec.record(&result(2, 7.5), 10.0);
        rec.write_jsonl(&path).unwrap();
        assert_eq!(rec.len(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["tick"], 2);
        assert_eq!(second["fullness"], 0.75);
    }
}
