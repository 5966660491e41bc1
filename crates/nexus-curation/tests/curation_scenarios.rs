//! End-to-end curation scenarios over a decoded `/graph-index` payload

use nexus_curation::recall::NO_MATCHES;
use nexus_curation::{HighlightLevel, Session, TransitionOutcome, TransitionRequest};
use nexus_model::{AskPreview, GraphIndex, Lifecycle};
use pretty_assertions::assert_eq;
use serde_json::json;

fn session() -> Session {
    let index = GraphIndex::from_value(&json!({
        "nodes": { "nodes": [
            { "id": "n1", "label": "Budget", "anchors": { "hard": ["b1"], "soft": ["b3"] } },
            { "id": "n2", "label": "Projections", "lifecycle": "loose", "bricks": ["b2"] }
        ]},
        "edges": [{ "source": { "id": "n1" }, "target": "n2", "type": "supports" }],
        "index_content": "# Budget"
    }));
    Session::new().load_graph(index)
}

fn preview(value: serde_json::Value) -> AskPreview {
    serde_json::from_value(value).unwrap()
}

#[test]
fn budget_projections_recall() {
    let (pending, ticket) = session().begin_recall("budget projections").unwrap();
    let session = pending.resolve_recall::<String>(
        &ticket,
        Ok(preview(json!({
            "query": "budget projections",
            "top_bricks": [
                { "brick_id": "b2", "confidence": 0.4 },
                { "brick_id": "b1", "confidence": 0.9 }
            ],
            "status": "ok"
        }))),
    );

    let order: Vec<_> = session.recall().hits().iter().map(|h| h.brick_id.as_str()).collect();
    assert_eq!(order, vec!["b1", "b2"]);

    // n2 only holds b2 in its legacy list, which never highlights
    assert_eq!(
        session.highlights(),
        vec![
            ("n1".to_string(), HighlightLevel::Strong),
            ("n2".to_string(), HighlightLevel::None),
        ]
    );
}

#[test]
fn empty_recall_reads_no_matches() {
    let (pending, ticket) = session().begin_recall("budget projections").unwrap();
    let session = pending.resolve_recall::<String>(
        &ticket,
        Ok(preview(json!({ "query": "budget projections", "top_bricks": [], "status": "ok" }))),
    );
    assert_eq!(session.recall().message(), Some(NO_MATCHES));
}

#[test]
fn double_toggle_restores_neighbors() {
    let base = session();
    let twice = base.toggle_neighbors("n1").toggle_neighbors("n1");
    assert_eq!(twice.traversal(), base.traversal());
}

#[test]
fn failed_promote_leaves_n2_unchanged() {
    let (pending, ticket) = session()
        .begin_transition("n2", TransitionRequest::Promote, "curator")
        .unwrap();
    let after = pending.resolve_transition(
        &ticket,
        TransitionOutcome::Failed("HTTP 500 Internal Server Error".into()),
    );

    let n2 = after.snapshot().unwrap().node("n2").unwrap();
    assert_eq!(n2.lifecycle, Lifecycle::Loose);
    let control = after.control_view("n2").unwrap();
    assert_eq!(control.error.as_deref(), Some("HTTP 500 Internal Server Error"));
    assert_eq!(control.enabled_buttons().len(), 2);
}

#[test]
fn second_promote_freezes() {
    let mut session = session();
    for _ in 0..2 {
        let (pending, ticket) = session
            .begin_transition("n1", TransitionRequest::Promote, "curator")
            .unwrap();
        session = pending.resolve_transition(&ticket, TransitionOutcome::Acknowledged);
    }
    let control = session.control_view("n1").unwrap();
    assert!(control.surface.is_read_only());
    assert_eq!(
        control.surface.status_text().as_deref(),
        Some("STATUS: FROZEN (ReadOnly)")
    );
}

#[test]
fn legacy_bricks_fill_the_drawer() {
    let session = session().toggle_anchors("n2");
    let drawer = session.drawer("n2").unwrap();
    assert_eq!(drawer.soft.len(), 1);
    assert!(drawer.soft[0].actions_available());
}
