//! Nexus Client - backend access for the concept explorer
//!
//! - [`CortexBackend`]: async seam over the knowledge backend endpoints
//! - [`HttpBackend`]: `reqwest` implementation, paths resolved against a base URL
//! - [`NexusConfig`]: defaults, TOML file and `NEXUS_*` environment overrides
//! - [`Curator`]: runs a [`nexus_curation::Session`] against a backend
//!
//! # Example
//!
//! ```rust,no_run
//! use nexus_client::{Curator, HttpBackend, NexusConfig};
//!
//! # async fn run() -> Result<(), nexus_client::BackendError> {
//! let config = NexusConfig::load(None)?;
//! let mut curator = Curator::new(HttpBackend::new(&config)?, config);
//! curator.load_graph().await?;
//! curator.ask("budget projections").await;
//! for (node_id, level) in curator.session().highlights() {
//!     println!("{node_id}: {level}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod config;
pub mod curator;
pub mod error;
pub mod http;

pub use backend::CortexBackend;
pub use config::NexusConfig;
pub use curator::Curator;
pub use error::BackendError;
pub use http::HttpBackend;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for talking to the backend
    pub use crate::{BackendError, CortexBackend, Curator, HttpBackend, NexusConfig};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
