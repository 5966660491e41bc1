//! Force-directed simulation
//!
//! Velocity-Verlet relaxation in the d3 style: every force is scaled by the
//! temperature `alpha`, which decays towards `alpha_target` each tick. The
//! forces are
//! - many-body repulsion, `charge * alpha / distance`
//! - link springs towards `link_distance`
//! - collision between node radii
//! - centroid pull towards the viewport center
//!
//! [`tick`] is pure; the state is small enough that cloning it per frame is
//! cheaper than the O(n²) repulsion pass.

use crate::config::ForceConfig;
use crate::error::LayoutError;
use crate::geometry::{NodePosition, Point, Viewport};
use nexus_model::GraphSnapshot;
use rand::Rng;
use std::collections::HashMap;
use std::f64::consts::TAU;

/// One simulated node
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Node id
    pub id: String,
    /// Current center
    pub position: Point,
    /// Displacement applied last tick
    pub velocity: Point,
    /// Pinned coordinates while dragged
    pub fixed: Option<Point>,
}

/// Full simulation state
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    bodies: Vec<Body>,
    links: Vec<(usize, usize)>,
    config: ForceConfig,
    viewport: Viewport,
    alpha: f64,
    alpha_target: f64,
    ticks: u64,
    energy: f64,
}

/// Deterministic nudge for coincident bodies
fn jitter(i: usize, j: usize) -> Point {
    #[allow(clippy::cast_precision_loss)]
    let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * TAU;
    Point::new(angle.cos(), angle.sin()) * 1e-3
}

impl SimulationState {
    /// Seeds every node at a random spot around the viewport center
    ///
    /// Edges with an unknown endpoint, and self-loops, exert no force.
    #[must_use]
    pub fn new<R: Rng>(
        snapshot: &GraphSnapshot,
        config: ForceConfig,
        viewport: Viewport,
        rng: &mut R,
    ) -> Self {
        let center = viewport.center();
        #[allow(clippy::cast_precision_loss)]
        let spread = config.link_distance.abs() * (snapshot.nodes().len() as f64).sqrt().max(1.0);
        let spread = if spread.is_finite() {
            spread
        } else {
            ForceConfig::default().link_distance
        };

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut bodies = Vec::with_capacity(snapshot.nodes().len());
        for (i, node) in snapshot.nodes().iter().enumerate() {
            index.entry(node.id.as_str()).or_insert(i);
            let offset = Point::new(
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
            );
            bodies.push(Body {
                id: node.id.clone(),
                position: center + offset,
                velocity: Point::ZERO,
                fixed: None,
            });
        }

        let links = snapshot
            .edges()
            .iter()
            .filter_map(|e| {
                let s = *index.get(e.source.as_str())?;
                let t = *index.get(e.target.as_str())?;
                (s != t).then_some((s, t))
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            bodies = bodies.len(),
            links = links.len(),
            "force simulation seeded"
        );

        Self {
            bodies,
            links,
            config,
            viewport,
            alpha: config.alpha,
            alpha_target: 0.0,
            ticks: 0,
            energy: 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Resolved links as body indices
    #[inline]
    #[must_use]
    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Mean squared displacement of the free bodies in the last tick,
    /// centering included
    #[inline]
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    #[inline]
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether another tick would still move anything
    #[must_use]
    pub fn is_hot(&self) -> bool {
        if self.bodies.is_empty() {
            return false;
        }
        if self.alpha_target > 0.0 {
            return true;
        }
        let settled = self.ticks > 0 && self.energy < self.config.energy_threshold;
        self.alpha >= self.config.alpha_min && !settled
    }

    /// Current center of a node
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.bodies.iter().find(|b| b.id == id).map(|b| b.position)
    }

    /// Positions in node order
    #[must_use]
    pub fn positions(&self) -> Vec<NodePosition> {
        self.bodies
            .iter()
            .map(|b| NodePosition {
                id: b.id.clone(),
                position: b.position,
            })
            .collect()
    }

    fn body_index(&self, id: &str) -> Result<usize, LayoutError> {
        self.bodies
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| LayoutError::UnknownNode(id.to_string()))
    }

    /// Raises the temperature and forgets the settled energy
    #[must_use]
    pub fn reheat(&self, alpha: f64) -> Self {
        let mut next = self.clone();
        next.alpha = self.alpha.max(alpha);
        next.ticks = 0;
        next
    }

    /// Recenters on a new surface size
    #[must_use]
    pub fn with_viewport(&self, viewport: Viewport) -> Self {
        let mut next = self.reheat(self.config.drag_alpha_target);
        next.viewport = viewport;
        next
    }

    /// Starts a drag: pins the node where it is and keeps the system hot
    ///
    /// # Errors
    /// [`LayoutError::UnknownNode`] if `id` is not simulated.
    pub fn pin(&self, id: &str) -> Result<Self, LayoutError> {
        let i = self.body_index(id)?;
        let mut next = self.reheat(self.config.drag_alpha_target);
        next.alpha_target = self.config.drag_alpha_target;
        next.bodies[i].fixed = Some(next.bodies[i].position);
        tracing::trace!(node_id = id, "drag start");
        Ok(next)
    }

    /// Moves a pinned node
    ///
    /// # Errors
    /// [`LayoutError::NotDragging`] when the node is not pinned.
    pub fn move_pinned(&self, id: &str, to: Point) -> Result<Self, LayoutError> {
        let i = self.body_index(id)?;
        if self.bodies[i].fixed.is_none() {
            return Err(LayoutError::NotDragging(id.to_string()));
        }
        let mut next = self.clone();
        next.bodies[i].fixed = Some(to);
        next.bodies[i].position = to;
        Ok(next)
    }

    /// Ends a drag; physics resumes from the current temperature
    ///
    /// # Errors
    /// [`LayoutError::NotDragging`] when the node is not pinned.
    pub fn release(&self, id: &str) -> Result<Self, LayoutError> {
        let i = self.body_index(id)?;
        if self.bodies[i].fixed.is_none() {
            return Err(LayoutError::NotDragging(id.to_string()));
        }
        let mut next = self.reheat(0.0);
        next.bodies[i].fixed = None;
        if next.bodies.iter().all(|b| b.fixed.is_none()) {
            next.alpha_target = 0.0;
        }
        tracing::trace!(node_id = id, "drag end");
        Ok(next)
    }

    /// Ticks until the system cools or `max_ticks` is reached
    #[must_use]
    pub fn run_to_rest(&self, max_ticks: usize) -> Self {
        let mut state = self.clone();
        for _ in 0..max_ticks {
            if !state.is_hot() {
                break;
            }
            state = tick(&state, 1.0);
        }
        tracing::debug!(ticks = state.ticks, alpha = state.alpha, "simulation at rest");
        state
    }
}

/// Advances the simulation by one step of `dt` frames
#[must_use]
pub fn tick(state: &SimulationState, dt: f64) -> SimulationState {
    let cfg = state.config;
    let mut next = state.clone();
    next.alpha += (state.alpha_target - state.alpha) * cfg.alpha_decay;
    let alpha = next.alpha;

    let positions: Vec<Point> = state.bodies.iter().map(|b| b.position).collect();
    let mut velocity: Vec<Point> = state.bodies.iter().map(|b| b.velocity).collect();
    let n = positions.len();

    for &(s, t) in &state.links {
        let mut delta = (positions[t] + velocity[t]) - (positions[s] + velocity[s]);
        if delta.length_sq() < 1e-12 {
            delta = jitter(s, t);
        }
        let len = delta.length();
        let shift = delta * ((len - cfg.link_distance) / len * alpha * cfg.link_strength);
        velocity[t] -= shift * 0.5;
        velocity[s] += shift * 0.5;
    }

    let min_distance = cfg.collision_radius * 2.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let mut delta = positions[i] - positions[j];
            if delta.length_sq() < 1e-12 {
                delta = jitter(i, j);
            }
            let distance = delta.length();
            let direction = delta * (1.0 / distance);

            let repulsion = cfg.charge * alpha / distance.max(1.0);
            velocity[i] += direction * repulsion;
            velocity[j] -= direction * repulsion;

            if distance < min_distance {
                let push = (min_distance - distance) * cfg.collision_strength * 0.5;
                velocity[i] += direction * push;
                velocity[j] -= direction * push;
            }
        }
    }

    let center_shift = if n == 0 {
        Point::ZERO
    } else {
        let sum = positions.iter().fold(Point::ZERO, |acc, p| acc + *p);
        #[allow(clippy::cast_precision_loss)]
        let mean = sum * (1.0 / n as f64);
        (state.viewport.center() - mean) * cfg.center_strength
    };

    let retain = 1.0 - cfg.velocity_decay;
    let mut energy = 0.0;
    let mut free = 0_usize;
    for (i, body) in next.bodies.iter_mut().enumerate() {
        if let Some(pinned) = body.fixed {
            body.position = pinned;
            body.velocity = Point::ZERO;
            continue;
        }
        let v = (velocity[i] * retain).clamp_length(cfg.max_speed);
        body.velocity = v;
        let step = center_shift + v * dt;
        body.position = body.position + step;
        energy += 0.5 * step.length_sq();
        free += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean_energy = if free == 0 { 0.0 } else { energy / free as f64 };
    next.energy = mean_energy;
    next.ticks = state.ticks + 1;
    next
}
