//! Layout driver tests on a paused clock

use nexus_layout::{
    ForceConfig, Frame, LayoutCommand, LayoutConfig, LayoutDriver, LayoutEngine, LayoutError,
    LayoutMode, Point, Viewport,
};
use nexus_model::{ConceptEdge, ConceptNode, GraphSnapshot};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::watch;

const FRAME: Duration = Duration::from_millis(16);

fn triangle() -> GraphSnapshot {
    GraphSnapshot::new(
        vec![
            ConceptNode::new("a", "A"),
            ConceptNode::new("b", "B"),
            ConceptNode::new("c", "C"),
        ],
        vec![
            ConceptEdge::new("a", "b", "related"),
            ConceptEdge::new("b", "c", "related"),
        ],
    )
}

fn force_driver() -> LayoutDriver {
    let config = LayoutConfig::default().with_force(ForceConfig::default().with_seed(7));
    LayoutDriver::spawn(LayoutEngine::new(LayoutMode::Force, config), FRAME)
}

async fn next_matching(
    frames: &mut watch::Receiver<Option<Frame>>,
    pred: impl Fn(&Frame) -> bool,
) -> Frame {
    frames
        .wait_for(|f| f.as_ref().is_some_and(&pred))
        .await
        .unwrap()
        .clone()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn force_layout_cools_and_stops_ticking() {
    let driver = force_driver();
    assert!(driver.latest().is_none());
    let mut frames = driver.frames();

    driver.send(LayoutCommand::SetGraph(triangle())).await.unwrap();
    driver
        .send(LayoutCommand::Resize(Viewport::new(800.0, 600.0)))
        .await
        .unwrap();

    let first = next_matching(&mut frames, |f| f.hot).await;
    assert_eq!(first.positions.len(), 3);

    let cooled = next_matching(&mut frames, |f| !f.hot).await;
    assert!(cooled.positions.iter().all(|p| p.position.is_finite()));

    // no further frames once cold
    frames.mark_unchanged();
    tokio::time::sleep(FRAME * 50).await;
    assert!(!frames.has_changed().unwrap());
    assert_eq!(driver.latest(), Some(cooled));

    driver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dragging_pins_node_and_reheats() {
    let driver = force_driver();
    let mut frames = driver.frames();
    driver.send(LayoutCommand::SetGraph(triangle())).await.unwrap();
    driver
        .send(LayoutCommand::Resize(Viewport::new(800.0, 600.0)))
        .await
        .unwrap();
    next_matching(&mut frames, |f| !f.hot).await;

    let target = Point::new(100.0, 100.0);
    driver.send(LayoutCommand::DragStart("a".into())).await.unwrap();
    driver
        .send(LayoutCommand::DragMove("a".into(), target))
        .await
        .unwrap();

    let dragged = next_matching(&mut frames, |f| {
        f.hot && f.positions.iter().any(|p| p.id == "a" && p.position == target)
    })
    .await;
    assert!(dragged.hot);

    // stays hot while held
    tokio::time::sleep(FRAME * 500).await;
    assert!(driver.latest().unwrap().hot);

    driver.send(LayoutCommand::DragEnd("a".into())).await.unwrap();
    next_matching(&mut frames, |f| !f.hot).await;

    driver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn hierarchical_frames_are_never_hot() {
    let driver = force_driver();
    let mut frames = driver.frames();
    driver
        .send(LayoutCommand::SetMode(LayoutMode::Hierarchical))
        .await
        .unwrap();
    driver.send(LayoutCommand::SetGraph(triangle())).await.unwrap();
    driver
        .send(LayoutCommand::Resize(Viewport::new(800.0, 600.0)))
        .await
        .unwrap();

    let frame = next_matching(&mut frames, |f| f.positions.len() == 3).await;
    assert!(!frame.hot);
    let xs: Vec<f64> = frame.positions.iter().map(|p| p.position.x).collect();
    assert!(xs[0] < xs[1] && xs[1] < xs[2]);

    // drag is rejected but the driver keeps running
    driver.send(LayoutCommand::DragStart("a".into())).await.unwrap();
    driver.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn invalid_commands_do_not_stop_the_driver() {
    let driver = force_driver();
    let frames = driver.frames();
    driver.send(LayoutCommand::DragEnd("ghost".into())).await.unwrap();
    driver
        .send(LayoutCommand::DragMove("ghost".into(), Point::ZERO))
        .await
        .unwrap();
    driver.send(LayoutCommand::SetGraph(triangle())).await.unwrap();
    driver.shutdown().await.unwrap();

    // graph known but the surface was never measured
    assert!(frames.borrow().is_none());
}

#[test]
fn driver_stopped_message() {
    let err = LayoutError::DriverStopped("channel closed".into());
    assert_eq!(err.to_string(), "layout driver stopped: channel closed");
}
