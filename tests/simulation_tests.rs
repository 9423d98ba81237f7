#[cfg(test)]
mod tests {
    use herd_engine::output::write_csv_row;
    use herd_engine::*;
    use std::io::Write;

    const BA_CONFIG: &str = "model=ba\nsize=50\ntimesteps=20\ninvestor_start=0.3\nherd=true\n";
    const WS_CONFIG: &str =
        "model=ws\nsize=60\ntimesteps=25\ninvestor_start=0.5\nherd=true\nk=4\nrewire=0.1\n";

    fn sim_from(text: &str, seed: u64) -> Simulation {
        let config: SimConfig = text.parse().unwrap();
        Simulation::new(config, seed).unwrap()
    }

    fn in_market_capacity(sim: &Simulation) -> Shares {
        sim.investors()
            .iter()
            .filter(|i| i.in_market())
            .map(|i| i.num_shares())
            .sum()
    }

    // ========== End-to-end runs ==========

    #[test]
    fn test_ba_run_produces_full_series() {
        let _ = env_logger::try_init();
        let mut sim = sim_from(BA_CONFIG, 42);
        let initial: Shares = sim
            .investors()
            .iter()
            .filter(|i| i.started_in_market())
            .map(|i| i.num_shares())
            .sum();

        let series = sim.run().to_vec();
        assert_eq!(series.len(), 21);
        assert_eq!(series[0], initial.to_f64());
        assert!(series.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert_eq!(*series.last().unwrap(), sim.market().total_shares().to_f64());
    }

    #[test]
    fn test_ws_run_produces_full_series() {
        let _ = env_logger::try_init();
        let mut sim = sim_from(WS_CONFIG, 8);
        assert!(sim.sphere().rewire_report().is_some());
        assert_eq!(sim.run().len(), 26);
        assert!(sim.market().within_capacity());
    }

    #[test]
    fn test_herd_disabled_still_runs() {
        let text = BA_CONFIG.replace("herd=true", "herd=false");
        let mut sim = sim_from(&text, 3);
        assert!(!sim.config().herd);
        assert_eq!(sim.run().len(), 21);
    }

    // ========== Determinism ==========

    #[test]
    fn test_same_seed_same_series() {
        let mut a = sim_from(BA_CONFIG, 1234);
        let mut b = sim_from(BA_CONFIG, 1234);
        assert_eq!(a.run(), b.run());

        let mut csv_a = Vec::new();
        let mut csv_b = Vec::new();
        write_csv_row(&mut csv_a, a.series()).unwrap();
        write_csv_row(&mut csv_b, b.series()).unwrap();
        assert_eq!(csv_a, csv_b);
    }

    #[test]
    fn test_same_seed_same_network_and_capacities() {
        let a = sim_from(WS_CONFIG, 77);
        let b = sim_from(WS_CONFIG, 77);
        assert_eq!(a.sphere().graph().edges(), b.sphere().graph().edges());
        assert_eq!(a.investors(), b.investors());
        assert_eq!(a.market(), b.market());
    }

    #[test]
    fn test_reset_replays_run() {
        let mut sim = sim_from(BA_CONFIG, 19);
        let first = sim.run().to_vec();
        sim.reset();
        assert_eq!(sim.current_tick(), 0);
        assert_eq!(sim.run(), first.as_slice());
    }

    #[test]
    fn test_run_batch_stops_at_timesteps() {
        let mut sim = sim_from(BA_CONFIG, 42);
        sim.run_batch(30);
        assert_eq!(sim.series().len(), 21);
        assert!(sim.is_finished());

        let mut native = sim_from(BA_CONFIG, 42);
        assert_eq!(sim.series(), native.run());
        assert!(native.step().is_none());
    }

    #[test]
    fn test_config_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# from disk\n{}seed=5\n", BA_CONFIG).unwrap();
        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.seed, Some(5));

        let mut from_file = Simulation::new(config, 5).unwrap();
        let mut from_text = sim_from(BA_CONFIG, 5);
        assert_eq!(from_file.run(), from_text.run());
    }

    // ========== Invariants ==========

    #[test]
    fn test_capacity_never_exceeded() {
        for seed in 0..5 {
            let mut sim = sim_from(BA_CONFIG, seed);
            while !sim.is_finished() {
                let result = sim.tick_core();
                let market = sim.market();
                assert!(market.within_capacity(), "seed {} tick {}", seed, result.tick);
                assert_eq!(market.total_shares(), in_market_capacity(&sim));
                assert_eq!(result.in_market, sim.in_market_count());
            }
        }
    }

    #[test]
    fn test_rate_limit_respected_every_tick() {
        let mut sim = sim_from(WS_CONFIG, 6);
        let budget = sim.params().moves_per_tick(60);
        while !sim.is_finished() {
            let r = sim.tick_core();
            assert!(r.joins <= budget);
            assert!(r.leaves <= budget);
        }
    }

    #[test]
    fn test_cooldown_spaces_transitions() {
        let mut sim = sim_from(BA_CONFIG, 99);
        sim.run();
        let cooldown = sim.params().cooldown as usize;

        for investor in sim.investors() {
            let mut state = investor.started_in_market();
            let mut last_change: Option<usize> = None;
            for (tick, &now) in investor.history().iter().enumerate() {
                if now != state {
                    if let Some(prev) = last_change {
                        assert!(tick - prev > cooldown, "changes at {} and {}", prev, tick);
                    }
                    last_change = Some(tick);
                    state = now;
                }
            }
            assert_eq!(investor.history().len(), 20);
        }
    }

    #[test]
    fn test_join_leave_counts_match_history() {
        let mut sim = sim_from(WS_CONFIG, 12);
        sim.run();
        let stats = sim.stats();
        let joins: u64 = sim.investors().iter().map(|i| i.times_joined() as u64).sum();
        let leaves: u64 = sim.investors().iter().map(|i| i.times_left() as u64).sum();
        assert_eq!(stats.total_joins, joins);
        assert_eq!(stats.total_leaves, leaves);
    }

    // ========== Errors ==========

    #[test]
    fn test_missing_key_names_offender() {
        let text = BA_CONFIG.replace("timesteps=20\n", "");
        let err = text.parse::<SimConfig>().unwrap_err();
        assert_eq!(err.key(), Some("timesteps"));
    }

    #[test]
    fn test_infeasible_lattice_is_config_error() {
        let text = WS_CONFIG.replace("size=60", "size=4");
        let config = text.parse::<SimConfig>();
        let err = match config {
            Ok(config) => Simulation::new(config, 0).err().map(|e| e.to_string()),
            Err(e) => Some(e.to_string()),
        };
        assert!(err.is_some());
    }

    #[test]
    fn test_topology_error_surfaces_through_sim_error() {
        let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(0);
        let err = SocialSphere::build(2, TopologyModel::barabasi_albert(AttachmentRule::Roulette), &mut rng)
            .unwrap_err();
        let sim_err: SimError = err.into();
        assert!(matches!(sim_err, SimError::Topology(TopologyError::TooFewVertices { .. })));
    }
}
