#[cfg(test)]
mod tests {
    use herd_engine::graph::Graph;
    use herd_engine::investor::DecisionContext;
    use herd_engine::social_sphere::{preferential_attachment, ring_lattice, small_world};
    use herd_engine::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn assert_simple(g: &Graph) {
        // Adjacency is symmetric and loop free, and the edge set has no repeats.
        let mut half_edges = 0;
        for v in g.vertices() {
            for w in g.neighbors(v) {
                assert_ne!(v, w);
                assert!(g.has_edge(w, v));
                half_edges += 1;
            }
        }
        assert_eq!(half_edges, 2 * g.edge_count());
        assert_eq!(g.edges().len(), g.edge_count());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_ba_connected_simple(size in 3usize..120, seed in any::<u64>(), independent in any::<bool>()) {
            let rule = if independent { AttachmentRule::Independent } else { AttachmentRule::Roulette };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let g = preferential_attachment(size, 2, rule, &mut rng).unwrap();
            prop_assert_eq!(g.vertex_count(), size);
            prop_assert!(g.is_connected());
            assert_simple(&g);
        }

        #[test]
        fn prop_ws_keeps_edge_count(half_k in 1usize..=3, extra in 1usize..60, p in 0.0f64..=1.0, seed in any::<u64>()) {
            let k = 2 * half_k;
            let size = k + extra;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (g, report) = small_world(size, k, p, &mut rng).unwrap();
            prop_assert_eq!(g.vertex_count(), size);
            prop_assert_eq!(g.edge_count(), size * k / 2);
            prop_assert!(report.rewired + report.stranded <= report.considered);
            assert_simple(&g);
        }

        #[test]
        fn prop_ws_without_rewiring_is_lattice(half_k in 1usize..=3, extra in 1usize..40, seed in any::<u64>()) {
            let k = 2 * half_k;
            let size = k + extra;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (g, report) = small_world(size, k, 0.0, &mut rng).unwrap();
            prop_assert_eq!(report.rewired, 0);
            prop_assert!(g.is_regular());
            prop_assert_eq!(g.edges(), ring_lattice(size, k).unwrap().edges());
        }

        #[test]
        fn prop_probabilities_stay_in_unit_interval(seed in any::<u64>(), ticks in 0u32..15, herd in any::<bool>()) {
            let mut config = SimConfig::barabasi_albert(40, 30, 0.4, herd);
            config.seed = Some(seed);
            let mut sim = Simulation::new(config, seed).unwrap();
            sim.run_batch(ticks);

            let ctx = DecisionContext {
                sphere: sim.sphere(),
                investors: sim.investors(),
                market: sim.market(),
                series: sim.series(),
                params: sim.params(),
                herd,
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
            for investor in sim.investors() {
                let join = investor.probability_to_join(&ctx, &mut rng);
                let leave = investor.probability_to_leave(&ctx, &mut rng);
                prop_assert!((0.0..=1.0).contains(&join));
                prop_assert!((0.0..=1.0).contains(&leave));
            }
        }
    }

    #[test]
    fn test_roulette_newcomers_get_two_links() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let g = preferential_attachment(200, 2, AttachmentRule::Roulette, &mut rng).unwrap();
        // Seed core has two edges, every later vertex adds exactly two.
        assert_eq!(g.edge_count(), 2 + 2 * (200 - 3));
    }

    #[test]
    fn test_sphere_degree_stats() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let sphere = SocialSphere::build(30, TopologyModel::watts_strogatz(4, 0.0), &mut rng).unwrap();
        assert_eq!(sphere.size(), 30);
        assert_eq!(sphere.average_degree(), 4.0);
        assert_eq!(sphere.largest_degree(), 4);
    }
}
