//! Closed-form 3D layouts.
//!
//! Every layout is a pure function of the node count (plus the engine's RNG
//! for `random`). Positions are assigned by node index, so the order of the
//! node sequence decides where each node lands.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Graph, Position};

const CIRCULAR_MIN_RADIUS: f64 = 5.0;
const CIRCULAR_RADIUS_PER_NODE: f64 = 0.5;
const SPHERE_MIN_RADIUS: f64 = 8.0;
const SPHERE_RADIUS_PER_NODE: f64 = 0.4;
const RANDOM_MIN_RANGE: f64 = 10.0;
const RANDOM_RANGE_PER_NODE: f64 = 0.6;

/// Layout algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Ring in the XZ plane.
    Circular,
    /// Even spread over a sphere surface.
    Sphere,
    /// Uniform scatter in a cube.
    Random,
    /// Keep whatever positions the server assigned.
    #[default]
    #[serde(alias = "spring")]
    Force,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Circular,
        LayoutKind::Sphere,
        LayoutKind::Random,
        LayoutKind::Force,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Circular => "circular",
            LayoutKind::Sphere => "sphere",
            LayoutKind::Random => "random",
            LayoutKind::Force => "force",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circular" => Ok(LayoutKind::Circular),
            "sphere" => Ok(LayoutKind::Sphere),
            "random" => Ok(LayoutKind::Random),
            "force" | "spring" => Ok(LayoutKind::Force),
            other => Err(AppError::UnknownLayout(other.to_string())),
        }
    }
}

/// Computes node positions. Owns the RNG used by random layouts.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    rng: StdRng,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LayoutEngine {
    /// Seeded engine for reproducible random layouts; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Positions for `node_count` nodes, or `None` when the layout leaves
    /// positions alone (`force`).
    pub fn compute_positions(&mut self, node_count: usize, kind: LayoutKind) -> Option<Vec<Position>> {
        match kind {
            LayoutKind::Circular => Some(circular(node_count)),
            LayoutKind::Sphere => Some(sphere(node_count)),
            LayoutKind::Random => Some(self.random(node_count)),
            LayoutKind::Force => None,
        }
    }

    /// Write a layout into the graph's nodes. Returns whether anything moved.
    pub fn apply(&mut self, graph: &mut Graph, kind: LayoutKind) -> bool {
        if graph.nodes.is_empty() {
            return false;
        }
        let Some(positions) = self.compute_positions(graph.nodes.len(), kind) else {
            tracing::debug!("Layout {} keeps existing positions", kind);
            return false;
        };

        for (node, position) in graph.nodes.iter_mut().zip(positions) {
            node.position = Some(position);
        }
        tracing::debug!("Applied {} layout to {} nodes", kind, graph.nodes.len());
        true
    }

    /// Give every node a position on load.
    ///
    /// When more than half the nodes are already placed, only the missing ones
    /// get a circular slot at their own index. Otherwise the whole graph is
    /// laid out in a circle. Returns the number of nodes that were placed.
    pub fn ensure_positions(&mut self, graph: &mut Graph) -> usize {
        let total = graph.nodes.len();
        if total == 0 {
            return 0;
        }

        let placed = graph.nodes.iter().filter(|n| n.has_position()).count();
        let ring = circular(total);

        if placed * 2 > total {
            let mut filled = 0;
            for (node, slot) in graph.nodes.iter_mut().zip(ring) {
                if !node.has_position() {
                    node.position = Some(slot);
                    filled += 1;
                }
            }
            tracing::debug!("Kept {} server positions, filled {}", placed, filled);
            filled
        } else {
            for (node, slot) in graph.nodes.iter_mut().zip(ring) {
                node.position = Some(slot);
            }
            tracing::debug!("Placed all {} nodes on a circle", total);
            total
        }
    }

    fn random(&mut self, n: usize) -> Vec<Position> {
        let range = RANDOM_MIN_RANGE.max(n as f64 * RANDOM_RANGE_PER_NODE);
        (0..n)
            .map(|_| {
                let x = (self.rng.gen::<f64>() - 0.5) * range;
                let y = (self.rng.gen::<f64>() - 0.5) * range;
                let z = (self.rng.gen::<f64>() - 0.5) * range;
                Position::new(x, y, z)
            })
            .collect()
    }
}

/// Radius used by the circular layout for `n` nodes.
pub fn circular_radius(n: usize) -> f64 {
    CIRCULAR_MIN_RADIUS.max(n as f64 * CIRCULAR_RADIUS_PER_NODE)
}

/// Radius used by the sphere layout for `n` nodes.
pub fn sphere_radius(n: usize) -> f64 {
    SPHERE_MIN_RADIUS.max(n as f64 * SPHERE_RADIUS_PER_NODE)
}

fn circular(n: usize) -> Vec<Position> {
    let radius = circular_radius(n);
    let count = n as f64;
    (0..n)
        .map(|i| {
            let angle = (i as f64 / count) * PI * 2.0;
            Position::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

/// Golden-spiral style spread: `phi` walks from pole to pole, `theta` winds
/// around proportionally.
fn sphere(n: usize) -> Vec<Position> {
    let radius = sphere_radius(n);
    if n == 1 {
        return vec![Position::new(radius, 0.0, 0.0)];
    }

    let count = n as f64;
    (0..n)
        .map(|i| {
            let phi = (-1.0 + (2.0 * i as f64) / count).acos();
            let theta = (count * PI).sqrt() * phi;
            Position::new(
                radius * theta.cos() * phi.sin(),
                radius * theta.sin() * phi.sin(),
                radius * phi.cos(),
            )
        })
        .collect()
}
