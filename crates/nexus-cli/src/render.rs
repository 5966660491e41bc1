//! Plain-text views of session state

use nexus_curation::{
    AnchorDrawer, BrickPanel, ControlView, HighlightLevel, NeighborEntry, RecallView, Session,
    TransitionOutcome, Wall,
};
use nexus_model::{ConceptNode, Lifecycle};
use std::fmt::Write as _;

pub(crate) fn recall(view: &RecallView) -> String {
    if let Some(message) = view.message() {
        return format!("{message}\n");
    }
    let mut out = String::new();
    for hit in view.hits() {
        let _ = writeln!(out, "{:<40} {:.2}", hit.brick_id, hit.confidence);
    }
    out
}

/// Matched nodes only; neutral ones are omitted
pub(crate) fn highlights(session: &Session) -> String {
    let mut out = String::new();
    for (node_id, level) in session.highlights() {
        if level == HighlightLevel::None {
            continue;
        }
        let label = session
            .snapshot()
            .and_then(|s| s.node(&node_id))
            .map_or(node_id.as_str(), |n| n.label.as_str());
        let _ = writeln!(out, "{label:<30} {}", level.legend());
    }
    out
}

pub(crate) fn graph(session: &Session) -> String {
    let Some(view) = session.graph() else {
        return format!("{}\n", session.graph_error().unwrap_or("No graph loaded"));
    };
    let snapshot = &view.snapshot;
    let mut out = format!(
        "{} nodes, {} edges (revision {})\n",
        snapshot.nodes().len(),
        snapshot.edges().len(),
        snapshot.revision()
    );
    for node in snapshot.nodes() {
        let _ = writeln!(out, "  {:<10} {:<8} {}", node.id, node.lifecycle, node.label);
    }
    if !view.index_content.is_empty() {
        let _ = write!(out, "\n{}\n", view.index_content.trim_end());
    }
    out
}

pub(crate) fn neighbors(entries: &[NeighborEntry<'_>]) -> String {
    if entries.is_empty() {
        return "No neighbors\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "  {:<30} [{}]  {}",
            entry.neighbor.label(),
            entry.edge_type,
            entry.note()
        );
    }
    out
}

pub(crate) fn drawer(drawer: &AnchorDrawer) -> String {
    if drawer.is_empty() {
        return "No anchors\n".to_string();
    }
    let mut out = String::new();
    for row in &drawer.hard {
        let _ = writeln!(out, "  hard  {}", row.display_id());
    }
    for row in &drawer.soft {
        let status = row.badge().unwrap_or("promote | reject");
        let _ = writeln!(out, "  soft  {}  {status}", row.display_id());
    }
    out
}

pub(crate) fn wall(wall: &Wall<&ConceptNode>) -> String {
    let mut out = String::new();
    let counts: Vec<String> = wall
        .lane_counts()
        .into_iter()
        .map(|(state, n)| format!("{state} {n}"))
        .collect();
    let _ = writeln!(out, "{}", counts.join(" | "));

    match wall.empty_message() {
        Some(message) => {
            let _ = writeln!(out, "  {message}");
        }
        None => {
            for node in wall.visible() {
                let _ = writeln!(
                    out,
                    "  {:<8} {:.2}  {}",
                    node.lifecycle, node.confidence, node.label
                );
            }
        }
    }

    if wall.cemetery_open() && wall.active_lane() != Some(Lifecycle::Killed) {
        let _ = writeln!(out, "{} (cemetery)", Lifecycle::Killed);
        for node in wall.cemetery() {
            let _ = writeln!(out, "  {:.2}  {}", node.confidence, node.label);
        }
    }
    out
}

pub(crate) fn controls(view: &ControlView) -> String {
    let mut out = match view.surface.status_text() {
        Some(status) => format!("{status}\n"),
        None => {
            let labels: Vec<&str> = view.enabled_buttons().iter().map(|b| b.label).collect();
            format!("[{}]\n", labels.join("] ["))
        }
    };
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

pub(crate) fn transition(outcome: &TransitionOutcome) -> String {
    match outcome {
        TransitionOutcome::Acknowledged => "acknowledged\n".to_string(),
        TransitionOutcome::Rejected(message) => format!("rejected: {message}\n"),
        TransitionOutcome::Failed(message) => format!("failed: {message}\n"),
    }
}

pub(crate) fn brick(panel: &BrickPanel) -> String {
    match panel {
        BrickPanel::Closed => String::new(),
        BrickPanel::Loading { .. } | BrickPanel::Failed { .. } => {
            format!("{}\n", panel.message().unwrap_or_default())
        }
        BrickPanel::Loaded { meta, full } => {
            let mut out = format!("{}\nsource: {}\n", meta.brick_id, meta.source_file);
            if let Some(sample) = &meta.text_sample {
                let _ = writeln!(out, "sample: {sample}");
            }
            if let Some(full) = full {
                let _ = write!(out, "\n{}\n", full.full_text);
            }
            out
        }
    }
}
