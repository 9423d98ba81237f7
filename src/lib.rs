// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite

pub mod error;
pub mod graph;
pub mod social_sphere;
pub mod shares;
pub mod likelihood;
pub mod params;
pub mod market;
pub mod investor;
pub mod types;
pub mod config;
pub mod simulation;
pub mod output;
pub mod metrics;

pub use config::SimConfig;
pub use error::{ConfigError, SimError, TopologyError};
pub use investor::{Investor, MarketPosition};
pub use market::Market;
pub use metrics::SeriesSummary;
pub use params::{Band, DecisionParams};
pub use shares::Shares;
pub use simulation::{Simulation, DEFAULT_SEED};
pub use social_sphere::{AttachmentRule, SocialSphere, TopologyModel};
pub use types::*;

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl Simulation {
    /// Builds a simulation from configuration text in `key=value` form.
    #[wasm_bindgen(constructor)]
    pub fn from_config_text(config_text: &str, seed: u64) -> Result<Simulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config: SimConfig = config_text
            .parse()
            .map_err(|e: ConfigError| JsValue::from_str(&e.to_string()))?;
        Simulation::new(config, seed).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Next tick's result, or `null` once the configured run is over.
    pub fn tick(&mut self) -> JsValue {
        match self.step() {
            Some(result) => serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Run up to N ticks without returning results, stopping at `timesteps`
    pub fn run_batch(&mut self, ticks: u32) {
        for _ in 0..ticks {
            if self.step().is_none() {
                break;
            }
        }
    }

    pub fn get_series(&self) -> Vec<f64> {
        self.series.clone()
    }

    pub fn get_investors(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.investor_snapshots()).unwrap_or(JsValue::NULL)
    }

    pub fn get_stats(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.stats()).unwrap_or(JsValue::NULL)
    }

    pub fn get_tick(&self) -> u64 {
        self.current_tick
    }

    /// Reset simulation to its initial state under the same seed
    pub fn reset(&mut self) {
        let config = self.config.clone();
        let params = self.params.clone();
        match Simulation::with_params(config, params, self.seed) {
            Ok(fresh) => *self = fresh,
            Err(e) => {
                log::warn!("reset failed, keeping current state: {}", e);
                debug_assert!(false, "validated configuration failed to rebuild: {}", e);
            }
        }
    }
}
