//! `nexus` - explore and curate the concept graph from a terminal
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); command output goes to
//! stdout.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use nexus_client::{Curator, HttpBackend, NexusConfig};
use nexus_curation::{Session, TransitionOutcome};
use nexus_layout::{LayoutEngine, LayoutMode, Viewport};
use nexus_model::{AnchorAction, GraphIndex, Lifecycle};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "nexus", version, about = "Explore and curate the Nexus concept graph")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides file and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Actor recorded with lifecycle transitions
    #[arg(long, global = true)]
    actor: Option<String>,

    /// Read the graph from a saved `/graph-index` response instead of the backend
    #[arg(long, global = true)]
    graph_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recall bricks for a query and show which concepts they anchor
    Ask {
        query: String,
        /// Use generative reranking
        #[arg(long)]
        genai: bool,
    },
    /// List nodes and the curated index
    Graph,
    /// Expand a node's neighbors
    Neighbors { node_id: String },
    /// Show a node's anchor drawer
    Anchors { node_id: String },
    /// Lifecycle wall
    Wall {
        /// Only list one lane
        #[arg(long)]
        lane: Option<Lifecycle>,
        /// Show killed nodes
        #[arg(long)]
        cemetery: bool,
    },
    /// Compute node positions and print them as JSON
    Layout {
        #[arg(long, default_value = "force")]
        mode: LayoutMode,
        #[arg(long, default_value_t = 1200.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Upper bound on simulation frames
        #[arg(long, default_value_t = 2000)]
        max_ticks: usize,
    },
    /// Show a brick's provenance and text
    Brick { brick_id: String },
    /// Decide a soft anchor
    Anchor {
        concept_id: String,
        brick_id: String,
        #[arg(value_enum)]
        action: AnchorChoice,
    },
    /// Promote a node one lifecycle step
    Promote { node_id: String },
    /// Kill a node
    Kill {
        node_id: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AnchorChoice {
    Promote,
    Reject,
}

impl From<AnchorChoice> for AnchorAction {
    fn from(choice: AnchorChoice) -> Self {
        match choice {
            AnchorChoice::Promote => Self::Promote,
            AnchorChoice::Reject => Self::Reject,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<NexusConfig> {
    let mut config =
        NexusConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(actor) = &cli.actor {
        config = config.with_actor(actor.clone());
    }
    Ok(config)
}

fn read_graph_file(path: &Path) -> anyhow::Result<GraphIndex> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    GraphIndex::from_json_str(&text).with_context(|| format!("{} is not JSON", path.display()))
}

/// Session with a graph, from the file if one was given
async fn graph_session(
    curator: &mut Curator<HttpBackend>,
    graph_file: Option<&Path>,
) -> anyhow::Result<Session> {
    match graph_file {
        Some(path) => Ok(Session::new().load_graph(read_graph_file(path)?)),
        None => {
            curator.load_graph().await.context("failed to fetch graph")?;
            Ok(curator.session().clone())
        }
    }
}

fn require_node(session: &Session, node_id: &str) -> anyhow::Result<()> {
    let known = session.snapshot().is_some_and(|s| s.contains(node_id));
    if !known {
        bail!("unknown node: {node_id}");
    }
    Ok(())
}

fn report_transition(
    curator: &Curator<HttpBackend>,
    node_id: &str,
    outcome: &TransitionOutcome,
) -> anyhow::Result<()> {
    print!("{}", render::transition(outcome));
    if let Some(view) = curator.session().control_view(node_id) {
        print!("{}", render::controls(&view));
    }
    if *outcome != TransitionOutcome::Acknowledged {
        bail!("transition for {node_id} was not applied");
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(&cli)?;
    if let Command::Ask { genai: true, .. } = &cli.command {
        config = config.with_genai(true);
    }
    let layout_config = config.layout;
    let backend = HttpBackend::new(&config).context("invalid backend configuration")?;
    let mut curator = Curator::new(backend, config);
    let graph_file = cli.graph_file.as_deref();

    match cli.command {
        Command::Ask { query, .. } => {
            if let Err(err) = curator.load_graph().await {
                tracing::warn!(%err, "continuing without graph");
            }
            if curator.ask(&query).await.is_none() {
                bail!("query is empty");
            }
            print!("{}", render::recall(curator.session().recall()));
            print!("{}", render::highlights(curator.session()));
        }
        Command::Graph => {
            let session = graph_session(&mut curator, graph_file).await?;
            print!("{}", render::graph(&session));
        }
        Command::Neighbors { node_id } => {
            let session = graph_session(&mut curator, graph_file).await?;
            require_node(&session, &node_id)?;
            let session = session.toggle_neighbors(&node_id);
            print!("{}", render::neighbors(&session.neighbors(&node_id)));
        }
        Command::Anchors { node_id } => {
            let session = graph_session(&mut curator, graph_file).await?;
            require_node(&session, &node_id)?;
            let session = session.toggle_anchors(&node_id);
            if let Some(drawer) = session.drawer(&node_id) {
                print!("{}", render::drawer(&drawer));
            }
        }
        Command::Wall { lane, cemetery } => {
            let session = graph_session(&mut curator, graph_file).await?;
            let mut wall = session.wall().with_lane(lane);
            if cemetery {
                wall = wall.toggle_cemetery();
            }
            print!("{}", render::wall(&wall));
        }
        Command::Layout {
            mode,
            width,
            height,
            max_ticks,
        } => {
            let session = graph_session(&mut curator, graph_file).await?;
            let snapshot = session.snapshot().cloned().unwrap_or_default();
            let mut engine = LayoutEngine::new(mode, layout_config);
            engine.set_graph(snapshot);
            engine.resize(Viewport::new(width, height));
            let frame = engine
                .settle(max_ticks)
                .context("nothing to lay out; width and height must be positive")?;
            if frame.hot {
                tracing::warn!(max_ticks, "layout still moving after the frame limit");
            }
            println!("{}", serde_json::to_string_pretty(&frame.positions)?);
        }
        Command::Brick { brick_id } => {
            curator.select_brick(Some(&brick_id)).await;
            print!("{}", render::brick(curator.session().brick_panel()));
        }
        Command::Anchor {
            concept_id,
            brick_id,
            action,
        } => {
            curator.load_graph().await.context("failed to fetch graph")?;
            let submitted = curator
                .anchor(&concept_id, &brick_id, action.into())
                .await
                .context("anchor submission failed")?;
            if submitted {
                println!("{} {concept_id}/{brick_id}", AnchorAction::from(action));
            } else {
                println!("already decided: {concept_id}/{brick_id}");
            }
        }
        Command::Promote { node_id } => {
            curator.load_graph().await.context("failed to fetch graph")?;
            let outcome = curator.promote(&node_id).await?;
            report_transition(&curator, &node_id, &outcome)?;
        }
        Command::Kill { node_id, reason } => {
            curator.load_graph().await.context("failed to fetch graph")?;
            let outcome = curator.kill(&node_id, &reason).await?;
            report_transition(&curator, &node_id, &outcome)?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "nexus starting");
    run(cli).await
}
