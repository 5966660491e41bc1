//! Frame driver
//!
//! Runs a [`LayoutEngine`] on its own tokio task. Commands arrive over an
//! mpsc channel; frames go out on a `watch` channel so slow readers only see
//! the latest one. The interval timer is polled only while the simulation is
//! hot, so an idle layout costs nothing.

use crate::engine::{Frame, LayoutEngine, LayoutMode};
use crate::error::LayoutError;
use crate::geometry::{Point, Viewport};
use nexus_model::GraphSnapshot;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const COMMAND_BUFFER: usize = 64;

/// Input to the driver task
#[derive(Debug, Clone)]
pub enum LayoutCommand {
    /// New or refreshed graph
    SetGraph(GraphSnapshot),
    /// Surface size observed
    Resize(Viewport),
    /// Switch strategy
    SetMode(LayoutMode),
    /// Pointer down on a node
    DragStart(String),
    /// Pointer moved while dragging
    DragMove(String, Point),
    /// Pointer released
    DragEnd(String),
}

fn apply(engine: &mut LayoutEngine, command: LayoutCommand) {
    let result = match command {
        LayoutCommand::SetGraph(snapshot) => {
            engine.set_graph(snapshot);
            Ok(())
        }
        LayoutCommand::Resize(viewport) => {
            engine.resize(viewport);
            Ok(())
        }
        LayoutCommand::SetMode(mode) => {
            engine.set_mode(mode);
            Ok(())
        }
        LayoutCommand::DragStart(id) => engine.drag_start(&id),
        LayoutCommand::DragMove(id, to) => engine.drag_move(&id, to),
        LayoutCommand::DragEnd(id) => engine.drag_end(&id),
    };
    if let Err(err) = result {
        tracing::debug!(%err, "layout command ignored");
    }
}

async fn run(
    mut engine: LayoutEngine,
    mut commands: mpsc::Receiver<LayoutCommand>,
    frames: watch::Sender<Option<Frame>>,
    frame_interval: Duration,
) {
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                apply(&mut engine, command);
                frames.send_replace(engine.frame());
            }
            _ = ticker.tick(), if engine.is_hot() => {
                engine.step();
                frames.send_replace(engine.frame());
            }
        }
    }
    tracing::debug!("layout driver stopped");
}

/// Handle to a running layout task
///
/// Dropping the handle aborts the task; [`LayoutDriver::shutdown`] stops it
/// and waits for it to finish.
#[derive(Debug)]
pub struct LayoutDriver {
    commands: Option<mpsc::Sender<LayoutCommand>>,
    frames: watch::Receiver<Option<Frame>>,
    task: Option<JoinHandle<()>>,
}

impl LayoutDriver {
    /// Spawns the driver on the current runtime
    #[must_use]
    pub fn spawn(engine: LayoutEngine, frame_interval: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (frame_tx, frame_rx) = watch::channel(engine.frame());
        let task = tokio::spawn(run(engine, command_rx, frame_tx, frame_interval));
        Self {
            commands: Some(command_tx),
            frames: frame_rx,
            task: Some(task),
        }
    }

    /// Queues a command
    ///
    /// # Errors
    /// [`LayoutError::DriverStopped`] once the task has ended.
    pub async fn send(&self, command: LayoutCommand) -> Result<(), LayoutError> {
        let Some(commands) = self.commands.as_ref() else {
            return Err(LayoutError::DriverStopped("shut down".to_string()));
        };
        commands
            .send(command)
            .await
            .map_err(|_| LayoutError::DriverStopped("channel closed".to_string()))
    }

    /// Receiver for published frames
    #[must_use]
    pub fn frames(&self) -> watch::Receiver<Option<Frame>> {
        self.frames.clone()
    }

    /// Latest published frame
    #[must_use]
    pub fn latest(&self) -> Option<Frame> {
        self.frames.borrow().clone()
    }

    /// Closes the command channel and waits for the task to exit
    ///
    /// # Errors
    /// [`LayoutError::DriverStopped`] if the task panicked or was cancelled.
    pub async fn shutdown(mut self) -> Result<(), LayoutError> {
        self.commands.take();
        match self.task.take() {
            Some(task) => task
                .await
                .map_err(|e| LayoutError::DriverStopped(e.to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for LayoutDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
