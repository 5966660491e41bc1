//! Curator flows against a scripted backend

use nexus_client::{BackendError, Curator, NexusConfig};
use nexus_curation::recall::{DETAIL_ERROR, NO_MATCHES};
use nexus_curation::session::GRAPH_UNAVAILABLE;
use nexus_curation::{BrickPanel, CurationError, HighlightLevel, RecallStatus, TransitionOutcome};
use nexus_model::{Ack, AnchorAction, AnchorRequest, Lifecycle, PromoteRequest};
use nexus_test_utils::{
    brick_full, brick_meta, budget_preview, empty_preview, rejected, unreachable, Recorded,
    ScriptedBackend,
};
use pretty_assertions::assert_eq;

fn config() -> NexusConfig {
    NexusConfig::new().with_actor("curator")
}

async fn loaded(backend: ScriptedBackend) -> Curator<ScriptedBackend> {
    let mut curator = Curator::new(backend, config());
    curator.load_graph().await.unwrap();
    curator
}

fn lifecycle(curator: &Curator<ScriptedBackend>, id: &str) -> Lifecycle {
    curator.session().snapshot().unwrap().node(id).unwrap().lifecycle
}

#[tokio::test]
async fn recall_highlights_anchored_concept() {
    let backend = ScriptedBackend::with_sample_graph().with_preview(Ok(budget_preview()));
    let mut curator = loaded(backend).await;

    assert_eq!(curator.ask("  budget projections ").await, Some(RecallStatus::Ready));

    let order: Vec<_> = curator
        .session()
        .recall()
        .hits()
        .iter()
        .map(|h| h.brick_id.clone())
        .collect();
    assert_eq!(order, vec!["b1", "b2"]);

    let strong: Vec<_> = curator
        .session()
        .highlights()
        .into_iter()
        .filter(|(_, level)| *level == HighlightLevel::Strong)
        .map(|(id, _)| id)
        .collect();
    assert_eq!(strong, vec!["n1"]);

    assert_eq!(
        curator.backend().requests().last(),
        Some(&Recorded::AskPreview {
            query: "budget projections".into(),
            use_genai: false,
        })
    );
}

#[tokio::test]
async fn blank_and_empty_recalls() {
    let backend = ScriptedBackend::with_sample_graph().with_preview(Ok(empty_preview("zzz")));
    let mut curator = loaded(backend).await;

    assert_eq!(curator.ask("   ").await, None);
    assert_eq!(curator.ask("zzz").await, Some(RecallStatus::Empty));
    assert_eq!(curator.session().recall().message(), Some(NO_MATCHES));
}

#[tokio::test]
async fn unreachable_graph_is_reported_not_fatal() {
    let backend = ScriptedBackend::new().with_graph(Err(unreachable()));
    let mut curator = Curator::new(backend, config());

    let err = curator.load_graph().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(curator.session().graph_error(), Some(GRAPH_UNAVAILABLE));
    assert!(curator.session().snapshot().is_none());
}

#[tokio::test]
async fn anchor_submits_once_and_refreshes() {
    let mut curator = loaded(ScriptedBackend::with_sample_graph()).await;

    assert!(curator.anchor("n1", "b3", AnchorAction::Promote).await.unwrap());
    assert!(!curator.anchor("n1", "b3", AnchorAction::Reject).await.unwrap());
    // seeded from the server's overrides
    assert!(!curator.anchor("n1", "b4", AnchorAction::Promote).await.unwrap());

    assert_eq!(
        curator.backend().requests(),
        vec![
            Recorded::GraphIndex,
            Recorded::Anchor(AnchorRequest {
                brick_id: "b3".into(),
                action: AnchorAction::Promote,
            }),
            Recorded::GraphIndex,
        ]
    );
    let intent = curator.session().ledger().intent_for("n1", "b3").unwrap();
    assert_eq!(intent.action, AnchorAction::Promote);
}

#[tokio::test]
async fn failed_anchor_keeps_intent_and_shows_error() {
    let backend = ScriptedBackend::with_sample_graph().with_ack(Err(unreachable()));
    let mut curator = loaded(backend).await;

    let err = curator.anchor("n1", "b3", AnchorAction::Reject).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
    assert!(curator.session().ledger().intent_for("n1", "b3").is_some());
    assert_eq!(curator.session().anchor_error("n1", "b3"), Some("Backend unreachable"));
    assert_eq!(curator.backend().graph_fetches(), 1);
}

#[tokio::test]
async fn promote_sends_promoted_anchors_and_applies_on_ack() {
    let mut curator = loaded(ScriptedBackend::with_sample_graph()).await;
    curator.anchor("n1", "b3", AnchorAction::Promote).await.unwrap();

    let outcome = curator.promote("n1").await.unwrap();
    assert_eq!(outcome, TransitionOutcome::Acknowledged);
    assert_eq!(lifecycle(&curator, "n1"), Lifecycle::Forming);

    assert_eq!(
        curator.backend().requests().last(),
        Some(&Recorded::Promote(PromoteRequest {
            node_id: "n1".into(),
            promote_bricks: vec!["b3".into()],
            actor: "curator".into(),
        }))
    );

    // second step freezes
    curator.promote("n1").await.unwrap();
    assert_eq!(lifecycle(&curator, "n1"), Lifecycle::Frozen);
    let controls = curator.session().control_view("n1").unwrap();
    assert!(controls.enabled_buttons().is_empty());
}

#[tokio::test]
async fn rejected_promote_leaves_lifecycle() {
    let backend = ScriptedBackend::with_sample_graph().with_ack(Err(rejected("confidence too low")));
    let mut curator = loaded(backend).await;

    let outcome = curator.promote("n2").await.unwrap();
    assert_eq!(outcome, TransitionOutcome::Rejected("confidence too low".into()));
    assert_eq!(lifecycle(&curator, "n2"), Lifecycle::Loose);

    let controls = curator.session().control_view("n2").unwrap();
    assert_eq!(controls.error.as_deref(), Some("confidence too low"));
    assert_eq!(controls.enabled_buttons().len(), 2);
}

#[tokio::test]
async fn transport_failure_on_kill_is_inline() {
    let backend = ScriptedBackend::with_sample_graph().with_ack(Err(BackendError::Status {
        endpoint: "node/kill".into(),
        status: 500,
    }));
    let mut curator = loaded(backend).await;

    let outcome = curator.kill("n3", "duplicate").await.unwrap();
    assert_eq!(outcome, TransitionOutcome::Failed("Backend error (500)".into()));
    assert_eq!(lifecycle(&curator, "n3"), Lifecycle::Forming);
}

#[tokio::test]
async fn kill_requires_reason() {
    let mut curator = loaded(ScriptedBackend::with_sample_graph()).await;

    let err = curator.kill("n2", "   ").await.unwrap_err();
    assert_eq!(err, CurationError::MissingReason);
    let controls = curator.session().control_view("n2").unwrap();
    assert_eq!(controls.error.as_deref(), Some("a reason is required to kill a node"));
    assert!(!curator
        .backend()
        .requests()
        .iter()
        .any(|r| matches!(r, Recorded::Kill(_))));
}

#[tokio::test]
async fn killed_node_moves_to_cemetery() {
    let mut curator = loaded(ScriptedBackend::with_sample_graph().with_ack(Ok(Ack::success()))).await;
    curator.kill("n2", "merged into n1").await.unwrap();
    assert_eq!(lifecycle(&curator, "n2"), Lifecycle::Killed);

    let wall = curator.session().wall().toggle_cemetery();
    let dead: Vec<_> = wall.cemetery().iter().map(|n| n.id.as_str()).collect();
    // cemetery keeps confidence order
    assert_eq!(dead, vec!["n5", "n2"]);

    // terminal nodes refuse further transitions without a request
    let before = curator.backend().requests().len();
    assert!(matches!(
        curator.promote("n2").await,
        Err(CurationError::Lifecycle(_))
    ));
    assert_eq!(curator.backend().requests().len(), before);
}

#[tokio::test]
async fn brick_selection_loads_meta_then_full_text() {
    let backend = ScriptedBackend::with_sample_graph()
        .with_meta(Ok(brick_meta("b1")))
        .with_full(Ok(brick_full("b1")));
    let mut curator = loaded(backend).await;

    curator.select_brick(Some("b1")).await;
    match curator.session().brick_panel() {
        BrickPanel::Loaded { meta, full } => {
            assert_eq!(meta.source_file, "notes/budget.md");
            assert_eq!(full.as_ref().unwrap().full_text, "Projected spend for Q3 is flat.");
        }
        other => panic!("unexpected panel: {other:?}"),
    }
    assert!(curator.session().app().right_panel_open);

    curator.select_brick(None).await;
    assert_eq!(curator.session().brick_panel(), &BrickPanel::Closed);
}

#[tokio::test]
async fn brick_meta_failure_skips_full_text() {
    let backend = ScriptedBackend::with_sample_graph().with_meta(Err(unreachable()));
    let mut curator = loaded(backend).await;

    curator.select_brick(Some("b9")).await;
    assert_eq!(curator.session().brick_panel().message(), Some(DETAIL_ERROR));
    assert!(!curator
        .backend()
        .requests()
        .iter()
        .any(|r| matches!(r, Recorded::BrickFull(_))));
}
