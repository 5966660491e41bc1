//! Layout engine
//!
//! Owns the current graph, viewport and strategy state and turns them into
//! frames. Nothing is computed until both a graph and a drawable viewport
//! are known. A new graph with the same structure (fingerprint) keeps the
//! running simulation; a structural change restarts it from scratch.
//! Shrinking the surface to nothing suspends the layout: no ticks and no
//! frames until a drawable size is observed again.

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::force::{tick, SimulationState};
use crate::geometry::{NodePosition, Point, Viewport};
use crate::hierarchical;
use nexus_model::{GraphSnapshot, ViewMode};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Layout strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Interactive force-directed layout
    Force,
    /// Left-to-right ranks
    Hierarchical,
}

impl LayoutMode {
    /// Strategy backing a view, if it draws a graph
    #[must_use]
    pub fn for_view(mode: ViewMode) -> Option<Self> {
        match mode {
            ViewMode::Explore => Some(Self::Force),
            ViewMode::Visualize => Some(Self::Hierarchical),
            ViewMode::Ask | ViewMode::Wall => None,
        }
    }
}

impl std::str::FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "force" | "explore" => Ok(Self::Force),
            "hierarchical" | "visualize" | "dag" => Ok(Self::Hierarchical),
            other => Err(format!("unknown layout mode: {other}")),
        }
    }
}

/// One rendered layout
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Snapshot revision the frame was computed for
    pub revision: u64,
    /// Node centers in node order
    pub positions: Vec<NodePosition>,
    /// Whether more frames will follow without input
    pub hot: bool,
}

#[derive(Debug, Clone)]
enum Strategy {
    Force(SimulationState),
    Hierarchical(Vec<NodePosition>),
}

/// Layout engine for one graph view
#[derive(Debug)]
pub struct LayoutEngine {
    mode: LayoutMode,
    config: LayoutConfig,
    viewport: Viewport,
    snapshot: Option<GraphSnapshot>,
    fingerprint: Option<u64>,
    strategy: Option<Strategy>,
    rng: StdRng,
}

impl LayoutEngine {
    /// Create engine; the seed in `config.force` makes placement reproducible
    #[must_use]
    pub fn new(mode: LayoutMode, config: LayoutConfig) -> Self {
        let rng = match config.force.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            mode,
            config,
            viewport: Viewport::default(),
            snapshot: None,
            fingerprint: None,
            strategy: None,
            rng,
        }
    }

    /// Active strategy
    #[inline]
    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Last observed surface size
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Installs a graph
    pub fn set_graph(&mut self, snapshot: GraphSnapshot) {
        let fingerprint = snapshot.fingerprint();
        let same_structure = self.fingerprint == Some(fingerprint);
        self.snapshot = Some(snapshot);
        self.fingerprint = Some(fingerprint);

        if same_structure && self.strategy.is_some() {
            if let Some(Strategy::Hierarchical(_)) = self.strategy {
                self.rebuild();
            }
            tracing::trace!(fingerprint, "graph structure unchanged");
            return;
        }
        self.rebuild();
    }

    /// Reacts to a surface size change
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;

        if !viewport.is_drawable() {
            tracing::debug!("viewport hidden, layout suspended");
            return;
        }
        match &self.strategy {
            Some(Strategy::Force(state)) => {
                self.strategy = Some(Strategy::Force(state.with_viewport(viewport)));
            }
            _ => self.rebuild(),
        }
    }

    /// Switches strategy, restarting the layout
    pub fn set_mode(&mut self, mode: LayoutMode) {
        if mode != self.mode {
            self.mode = mode;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            self.strategy = None;
            return;
        };
        if !self.viewport.is_drawable() {
            tracing::debug!("viewport not measured yet, deferring layout");
            self.strategy = None;
            return;
        }

        self.strategy = Some(match self.mode {
            LayoutMode::Force => Strategy::Force(SimulationState::new(
                snapshot,
                self.config.force,
                self.viewport,
                &mut self.rng,
            )),
            LayoutMode::Hierarchical => Strategy::Hierarchical(hierarchical::layout(
                snapshot,
                self.viewport,
                &self.config.hierarchical,
            )),
        });
    }

    /// Strategy state, hidden while the viewport is not drawable
    fn active(&self) -> Option<&Strategy> {
        self.strategy.as_ref().filter(|_| self.viewport.is_drawable())
    }

    /// Whether [`LayoutEngine::step`] would change anything
    #[must_use]
    pub fn is_hot(&self) -> bool {
        matches!(self.active(), Some(Strategy::Force(state)) if state.is_hot())
    }

    /// Advances the force simulation by one frame
    ///
    /// Returns whether the layout is still hot.
    pub fn step(&mut self) -> bool {
        if let Some(Strategy::Force(state)) = self.active() {
            if state.is_hot() {
                let next = tick(state, 1.0);
                let hot = next.is_hot();
                self.strategy = Some(Strategy::Force(next));
                return hot;
            }
        }
        false
    }

    fn simulation(&self) -> Result<&SimulationState, LayoutError> {
        match &self.strategy {
            Some(Strategy::Force(state)) => Ok(state),
            _ => Err(LayoutError::NotInteractive),
        }
    }

    /// Pins a node under the pointer
    ///
    /// # Errors
    /// [`LayoutError::NotInteractive`] outside the force layout,
    /// [`LayoutError::UnknownNode`] for ids not on screen.
    pub fn drag_start(&mut self, id: &str) -> Result<(), LayoutError> {
        let next = self.simulation()?.pin(id)?;
        self.strategy = Some(Strategy::Force(next));
        Ok(())
    }

    /// Moves a pinned node
    ///
    /// # Errors
    /// As [`LayoutEngine::drag_start`], plus [`LayoutError::NotDragging`].
    pub fn drag_move(&mut self, id: &str, to: Point) -> Result<(), LayoutError> {
        let next = self.simulation()?.move_pinned(id, to)?;
        self.strategy = Some(Strategy::Force(next));
        Ok(())
    }

    /// Releases a pinned node
    ///
    /// # Errors
    /// As [`LayoutEngine::drag_move`].
    pub fn drag_end(&mut self, id: &str) -> Result<(), LayoutError> {
        let next = self.simulation()?.release(id)?;
        self.strategy = Some(Strategy::Force(next));
        Ok(())
    }

    /// Current frame; `None` until a graph and a drawable viewport are known
    #[must_use]
    pub fn frame(&self) -> Option<Frame> {
        let revision = self.snapshot.as_ref()?.revision();
        let (positions, hot) = match self.active()? {
            Strategy::Force(state) => (state.positions(), state.is_hot()),
            Strategy::Hierarchical(positions) => (positions.clone(), false),
        };
        Some(Frame {
            revision,
            positions,
            hot,
        })
    }

    /// Runs the simulation until it cools, then returns the frame
    pub fn settle(&mut self, max_ticks: usize) -> Option<Frame> {
        for _ in 0..max_ticks {
            if !self.step() {
                break;
            }
        }
        self.frame()
    }
}
