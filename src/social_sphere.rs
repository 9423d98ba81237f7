// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Social Network Generation

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TopologyError;
use crate::graph::{Graph, VertexId};

/// Vertices in the preferential-attachment seed core.
pub const SEED_CORE_SIZE: usize = 3;
pub const DEFAULT_EDGES_PER_VERTEX: usize = 2;

// ─── Model selection ────────────────────────────────────────────────────────

/// How a newcomer picks its partners during preferential attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentRule {
    /// Exactly `edges_per_vertex` distinct partners chosen by roulette wheel.
    #[default]
    Roulette,
    /// Every existing vertex is an independent Bernoulli candidate.
    Independent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum TopologyModel {
    PreferentialAttachment {
        edges_per_vertex: usize,
        rule: AttachmentRule,
    },
    SmallWorld {
        k: usize,
        rewire: f64,
    },
}

impl TopologyModel {
    pub fn barabasi_albert(rule: AttachmentRule) -> Self {
        Self::PreferentialAttachment {
            edges_per_vertex: DEFAULT_EDGES_PER_VERTEX,
            rule,
        }
    }

    pub fn watts_strogatz(k: usize, rewire: f64) -> Self {
        Self::SmallWorld { k, rewire }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::PreferentialAttachment { .. } => "ba",
            Self::SmallWorld { .. } => "ws",
        }
    }
}

/// Outcome of the Watts–Strogatz rewiring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewireReport {
    /// Lattice edges visited by the pass.
    pub considered: usize,
    /// Edges moved to a new target.
    pub rewired: usize,
    /// Edges selected for rewiring that had no admissible target.
    pub stranded: usize,
}

// ─── SocialSphere ───────────────────────────────────────────────────────────

/// The investor social network. Built once; read-only afterwards.
#[derive(Debug, Clone)]
pub struct SocialSphere {
    graph: Graph,
    model: TopologyModel,
    rewire_report: Option<RewireReport>,
    average_degree: f64,
    largest_degree: usize,
}

impl SocialSphere {
    pub fn build<R: Rng + ?Sized>(
        size: usize,
        model: TopologyModel,
        rng: &mut R,
    ) -> Result<Self, TopologyError> {
        let (graph, rewire_report) = match &model {
            TopologyModel::PreferentialAttachment {
                edges_per_vertex,
                rule,
            } => (
                preferential_attachment(size, *edges_per_vertex, *rule, rng)?,
                None,
            ),
            TopologyModel::SmallWorld { k, rewire } => {
                let (graph, report) = small_world(size, *k, *rewire, rng)?;
                (graph, Some(report))
            }
        };

        let largest_degree = graph
            .vertices()
            .into_iter()
            .map(|v| graph.degree(v))
            .max()
            .unwrap_or(0);
        let average_degree = if graph.vertex_count() > 0 {
            graph.degree_sum() as f64 / graph.vertex_count() as f64
        } else {
            0.0
        };

        info!(
            "social sphere built: model={} vertices={} edges={} avg_degree={:.2} max_degree={}",
            model.short_name(),
            graph.vertex_count(),
            graph.edge_count(),
            average_degree,
            largest_degree
        );

        Ok(Self {
            graph,
            model,
            rewire_report,
            average_degree,
            largest_degree,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn model(&self) -> &TopologyModel {
        &self.model
    }

    pub fn rewire_report(&self) -> Option<RewireReport> {
        self.rewire_report
    }

    pub fn size(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.graph.degree(v)
    }

    pub fn connections(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.neighbors(v)
    }

    pub fn average_degree(&self) -> f64 {
        self.average_degree
    }

    pub fn largest_degree(&self) -> usize {
        self.largest_degree
    }
}

// ─── Preferential attachment ────────────────────────────────────────────────

/// Grows a scale-free network from a three-vertex core ("1"-"3", "2"-"3").
pub fn preferential_attachment<R: Rng + ?Sized>(
    size: usize,
    edges_per_vertex: usize,
    rule: AttachmentRule,
    rng: &mut R,
) -> Result<Graph, TopologyError> {
    if size < SEED_CORE_SIZE {
        return Err(TopologyError::TooFewVertices {
            requested: size,
            minimum: SEED_CORE_SIZE,
        });
    }

    let mut graph = Graph::new();
    let v1 = graph.add_vertex("1");
    let v2 = graph.add_vertex("2");
    let v3 = graph.add_vertex("3");
    graph.connect(v1, v3);
    graph.connect(v2, v3);

    while graph.vertex_count() < size {
        add_preferential(&mut graph, edges_per_vertex, rule, rng);
    }
    Ok(graph)
}

fn add_preferential<R: Rng + ?Sized>(
    graph: &mut Graph,
    edges_per_vertex: usize,
    rule: AttachmentRule,
    rng: &mut R,
) {
    // Degrees are snapshotted before the newcomer attaches.
    let existing = graph.vertices();
    let degrees: Vec<usize> = existing.iter().map(|&v| graph.degree(v)).collect();
    let degree_sum: usize = degrees.iter().sum();

    let newcomer = graph.add_vertex((existing.len() + 1).to_string());

    match rule {
        AttachmentRule::Independent => {
            let mut attached = false;
            for (&v, &d) in existing.iter().zip(&degrees) {
                let prob = d as f64 / degree_sum as f64;
                if rng.gen::<f64>() < prob {
                    graph.connect(newcomer, v);
                    attached = true;
                }
            }
            if !attached {
                let mut excluded = vec![false; existing.len()];
                if let Some(v) = roulette_pick(&degrees, &mut excluded, degree_sum as f64, rng) {
                    graph.connect(newcomer, existing[v]);
                }
            }
        }
        AttachmentRule::Roulette => {
            let picks = edges_per_vertex.min(existing.len());
            let mut excluded = vec![false; existing.len()];
            let mut wheel = degree_sum as f64;
            for _ in 0..picks {
                match roulette_pick(&degrees, &mut excluded, wheel, rng) {
                    Some(v) => {
                        wheel -= degrees[v] as f64;
                        graph.connect(newcomer, existing[v]);
                    }
                    None => break,
                }
            }
        }
    }
    debug!(
        "attached vertex {} with degree {}",
        newcomer,
        graph.degree(newcomer)
    );
}

/// Spins the wheel once over the non-excluded, non-isolated candidates and
/// marks the winner as excluded. Returns its index into `degrees`.
fn roulette_pick<R: Rng + ?Sized>(
    degrees: &[usize],
    excluded: &mut [bool],
    wheel: f64,
    rng: &mut R,
) -> Option<usize> {
    let mut remaining = rng.gen::<f64>() * wheel;
    let mut last_eligible = None;
    let mut chosen = None;
    for (i, &d) in degrees.iter().enumerate() {
        if excluded[i] || d == 0 {
            continue;
        }
        last_eligible = Some(i);
        remaining -= d as f64;
        if remaining <= 0.0 {
            chosen = Some(i);
            break;
        }
    }
    // Float residue can walk past the end of the wheel.
    let pick = chosen.or(last_eligible)?;
    excluded[pick] = true;
    Some(pick)
}

// ─── Watts–Strogatz ─────────────────────────────────────────────────────────

/// k-regular ring over `size` vertices labelled "1".."size".
pub fn ring_lattice(size: usize, k: usize) -> Result<Graph, TopologyError> {
    if k % 2 == 1 {
        return Err(TopologyError::OddRingDegree(k));
    }
    let mut graph = Graph::new();
    for i in 1..=size {
        graph.add_vertex(i.to_string());
    }
    graph.add_regular_edges(k)?;
    Ok(graph)
}

pub fn small_world<R: Rng + ?Sized>(
    size: usize,
    k: usize,
    rewire_prob: f64,
    rng: &mut R,
) -> Result<(Graph, RewireReport), TopologyError> {
    let mut graph = ring_lattice(size, k)?;
    let report = rewire(&mut graph, k, rewire_prob, rng);
    info!(
        "rewired {}/{} lattice edges (p={})",
        report.rewired, report.considered, rewire_prob
    );
    if report.stranded > 0 {
        warn!(
            "{} edge(s) kept in place: no free rewire target (size={}, k={})",
            report.stranded, size, k
        );
    }
    Ok((graph, report))
}

/// Watts–Strogatz rewiring over a ring lattice of degree `k`.
pub fn rewire<R: Rng + ?Sized>(
    graph: &mut Graph,
    k: usize,
    rewire_prob: f64,
    rng: &mut R,
) -> RewireReport {
    let n = graph.vertex_count();
    let mut report = RewireReport::default();
    if n < 2 {
        return report;
    }

    for level in 1..=k / 2 {
        for i in 0..n {
            let v = VertexId(i);
            let old = VertexId((i + level) % n);
            let Some(edge) = graph.get_edge(v, old).copied() else {
                continue;
            };
            report.considered += 1;
            if rng.gen::<f64>() >= rewire_prob {
                continue;
            }
            // `old` is a neighbour, so the only non-candidates are v and its
            // current neighbours.
            if graph.degree(v) >= n - 1 {
                report.stranded += 1;
                continue;
            }
            graph.remove_edge(edge);
            let target = loop {
                let t = VertexId(rng.gen_range(0..n));
                if t != v && t != old && !graph.has_edge(v, t) {
                    break t;
                }
            };
            graph.connect(v, target);
            report.rewired += 1;
        }
    }
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
