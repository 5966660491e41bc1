//! Hierarchical (rank) layout
//!
//! Nodes are ranked left to right by longest path along edge direction.
//! Ready nodes are taken in input order, so ties are stable. When only
//! cycles remain, the earliest remaining input node is released as if it
//! had no predecessors; back edges into already placed nodes are ignored.

use crate::config::HierarchicalConfig;
use crate::geometry::{NodePosition, Point, Viewport};
use nexus_model::GraphSnapshot;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// Rank of every node, in node order
#[must_use]
pub fn ranks(snapshot: &GraphSnapshot) -> Vec<usize> {
    let n = snapshot.nodes().len();
    let mut first_index: HashMap<&str, usize> = HashMap::new();
    for (i, node) in snapshot.nodes().iter().enumerate() {
        first_index.entry(node.id.as_str()).or_insert(i);
    }

    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::with_capacity(n, snapshot.edges().len());
    for i in 0..n {
        graph.add_node(i);
    }
    for edge in snapshot.edges() {
        let (Some(&s), Some(&t)) = (
            first_index.get(edge.source.as_str()),
            first_index.get(edge.target.as_str()),
        ) else {
            continue;
        };
        if s != t {
            graph.add_edge(s, t, ());
        }
    }

    if petgraph::algo::is_cyclic_directed(&graph) {
        tracing::debug!(nodes = n, "graph has cycles, releasing nodes in input order");
    }

    let mut pending: Vec<usize> = (0..n)
        .map(|i| graph.neighbors_directed(i, Direction::Incoming).count())
        .collect();
    let mut placed = vec![false; n];
    let mut rank = vec![0_usize; n];
    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
    let mut remaining = n;

    while remaining > 0 {
        let next = match ready.pop_first() {
            Some(i) => i,
            None => {
                // Only cycles left
                let Some(i) = (0..n).find(|&i| !placed[i]) else {
                    break;
                };
                tracing::trace!(node = i, "breaking cycle");
                i
            }
        };
        if placed[next] {
            continue;
        }
        placed[next] = true;
        remaining -= 1;

        for succ in graph.neighbors_directed(next, Direction::Outgoing) {
            if placed[succ] {
                continue;
            }
            rank[succ] = rank[succ].max(rank[next] + 1);
            pending[succ] = pending[succ].saturating_sub(1);
            if pending[succ] == 0 {
                ready.insert(succ);
            }
        }
    }

    rank
}

/// Places ranked nodes inside `viewport`
///
/// Ranks run along x, nodes within a rank along y in input order; the
/// drawing is centered on the viewport. Returns nothing for a viewport that
/// cannot be drawn on.
#[must_use]
pub fn layout(
    snapshot: &GraphSnapshot,
    viewport: Viewport,
    config: &HierarchicalConfig,
) -> Vec<NodePosition> {
    if !viewport.is_drawable() {
        return Vec::new();
    }

    let ranks = ranks(snapshot);
    let rank_step = config.rank_spacing * config.spacing_factor;
    let node_step = config.node_spacing * config.spacing_factor;
    let max_rank = ranks.iter().copied().max().unwrap_or(0);

    let mut per_rank = vec![0_usize; max_rank + 1];
    for &r in &ranks {
        per_rank[r] += 1;
    }

    let center = viewport.center();
    let mut slot = vec![0_usize; max_rank + 1];
    let positions: Vec<NodePosition> = snapshot
        .nodes()
        .iter()
        .zip(&ranks)
        .map(|(node, &r)| {
            #[allow(clippy::cast_precision_loss)]
            let (x_off, y_off) = (
                r as f64 - max_rank as f64 / 2.0,
                slot[r] as f64 - (per_rank[r] - 1) as f64 / 2.0,
            );
            slot[r] += 1;
            NodePosition {
                id: node.id.clone(),
                position: Point::new(center.x + x_off * rank_step, center.y + y_off * node_step),
            }
        })
        .collect();

    tracing::debug!(
        nodes = positions.len(),
        ranks = max_rank + 1,
        "hierarchical layout computed"
    );
    positions
}
