//! Layout tuning
//!
//! All fields have defaults, so a partial TOML table is enough:
//!
//! ```toml
//! [layout.force]
//! link_distance = 120.0
//! seed = 7
//! ```

use crate::error::LayoutError;
use serde::{Deserialize, Serialize};

fn finite(name: &str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig(format!("{name} must be finite, got {value}")))
    }
}

/// Force-directed simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Many-body repulsion strength
    pub charge: f64,
    /// Rest length of link springs
    pub link_distance: f64,
    /// Spring stiffness in `[0, 1]`
    pub link_strength: f64,
    /// Node radius used for collision
    pub collision_radius: f64,
    /// Fraction of the overlap resolved per tick
    pub collision_strength: f64,
    /// Fraction of the centroid offset removed per tick
    pub center_strength: f64,
    /// Starting temperature
    pub alpha: f64,
    /// Simulation stops below this temperature
    pub alpha_min: f64,
    /// Per-tick approach rate towards the target temperature
    pub alpha_decay: f64,
    /// Target temperature while a node is dragged
    pub drag_alpha_target: f64,
    /// Velocity lost per tick
    pub velocity_decay: f64,
    /// Per-tick displacement cap
    pub max_speed: f64,
    /// Mean kinetic energy under which the layout counts as settled
    pub energy_threshold: f64,
    /// Fixed seed for initial placement
    pub seed: Option<u64>,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge: 300.0,
            link_distance: 90.0,
            link_strength: 0.4,
            collision_radius: 22.0,
            collision_strength: 0.7,
            center_strength: 0.1,
            alpha: 1.0,
            alpha_min: 0.001,
            // 300 ticks from 1.0 down to alpha_min
            alpha_decay: 0.0228,
            drag_alpha_target: 0.3,
            velocity_decay: 0.4,
            max_speed: 40.0,
            energy_threshold: 0.005,
            seed: None,
        }
    }
}

impl ForceConfig {
    /// With fixed placement seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects non-finite parameters
    ///
    /// # Errors
    /// [`LayoutError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        finite("charge", self.charge)?;
        finite("link_distance", self.link_distance)?;
        finite("link_strength", self.link_strength)?;
        finite("collision_radius", self.collision_radius)?;
        finite("collision_strength", self.collision_strength)?;
        finite("center_strength", self.center_strength)?;
        finite("alpha", self.alpha)?;
        finite("alpha_min", self.alpha_min)?;
        finite("alpha_decay", self.alpha_decay)?;
        finite("drag_alpha_target", self.drag_alpha_target)?;
        finite("velocity_decay", self.velocity_decay)?;
        finite("max_speed", self.max_speed)?;
        finite("energy_threshold", self.energy_threshold)
    }

    /// With link rest length
    #[inline]
    #[must_use]
    pub fn with_link_distance(mut self, distance: f64) -> Self {
        self.link_distance = distance;
        self
    }
}

/// Rank layout parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalConfig {
    /// Distance between consecutive ranks before scaling
    pub rank_spacing: f64,
    /// Distance between nodes of one rank before scaling
    pub node_spacing: f64,
    /// Multiplier applied to both spacings
    pub spacing_factor: f64,
}

impl Default for HierarchicalConfig {
    fn default() -> Self {
        Self {
            rank_spacing: 160.0,
            node_spacing: 60.0,
            spacing_factor: 1.2,
        }
    }
}

/// Layout section of the application config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Explore view
    pub force: ForceConfig,
    /// Visualize view
    pub hierarchical: HierarchicalConfig,
    /// Driver tick period in milliseconds
    pub frame_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            force: ForceConfig::default(),
            hierarchical: HierarchicalConfig::default(),
            frame_ms: 16,
        }
    }
}

impl LayoutConfig {
    /// With force parameters
    #[inline]
    #[must_use]
    pub fn with_force(mut self, force: ForceConfig) -> Self {
        self.force = force;
        self
    }

    /// With rank parameters
    #[inline]
    #[must_use]
    pub fn with_hierarchical(mut self, hierarchical: HierarchicalConfig) -> Self {
        self.hierarchical = hierarchical;
        self
    }

    /// Rejects non-finite parameters in either strategy
    ///
    /// # Errors
    /// [`LayoutError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.force.validate()?;
        finite("rank_spacing", self.hierarchical.rank_spacing)?;
        finite("node_spacing", self.hierarchical.node_spacing)?;
        finite("spacing_factor", self.hierarchical.spacing_factor)
    }

    /// Tick period, never zero
    #[must_use]
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_ms.max(1))
    }
}
