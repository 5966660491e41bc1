//! Client configuration
//!
//! Resolution order: built-in defaults, then an optional TOML file, then
//! `NEXUS_*` environment variables.
//!
//! ```toml
//! base_url = "http://localhost:5001/jarvis"
//! actor = "curator"
//! timeout_secs = 10
//!
//! [layout.force]
//! charge = 250.0
//! ```

use crate::error::BackendError;
use nexus_layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment override for [`NexusConfig::base_url`]
pub const ENV_BASE_URL: &str = "NEXUS_BASE_URL";
/// Environment override for [`NexusConfig::actor`]
pub const ENV_ACTOR: &str = "NEXUS_ACTOR";
/// Environment override for [`NexusConfig::timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "NEXUS_TIMEOUT_SECS";

/// Nexus client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NexusConfig {
    /// Prefix every endpoint path is resolved against
    pub base_url: String,
    /// Name sent with lifecycle transitions
    pub actor: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Ask the backend to use generative reranking for recall
    pub use_genai: bool,
    /// Layout tuning
    pub layout: LayoutConfig,
}

impl NexusConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With actor
    #[inline]
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With generative recall
    #[inline]
    #[must_use]
    pub fn with_genai(mut self, enabled: bool) -> Self {
        self.use_genai = enabled;
        self
    }

    /// With layout tuning
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Parses TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// [`BackendError::Config`] on malformed TOML or non-finite layout tuning.
    pub fn from_toml_str(text: &str) -> Result<Self, BackendError> {
        let config: Self =
            toml::from_str(text).map_err(|e| BackendError::Config(format!("invalid config: {e}")))?;
        config
            .layout
            .validate()
            .map_err(|e| BackendError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Reads a TOML file
    ///
    /// # Errors
    /// [`BackendError::Config`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, BackendError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BackendError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Applies overrides from a variable lookup
    ///
    /// # Errors
    /// [`BackendError::Config`] when a numeric override does not parse.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, BackendError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(actor) = lookup(ENV_ACTOR) {
            self.actor = actor;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                BackendError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got {raw:?}"))
            })?;
        }
        Ok(self)
    }

    /// Defaults, then `path` if given, then the process environment
    ///
    /// # Errors
    /// As [`NexusConfig::from_file`] and [`NexusConfig::with_overrides`].
    pub fn load(path: Option<&Path>) -> Result<Self, BackendError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        tracing::debug!(base_url = %config.base_url, actor = %config.actor, "configuration loaded");
        Ok(config)
    }
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001/jarvis".to_string(),
            actor: "user".to_string(),
            timeout_secs: 30,
            use_genai: false,
            layout: LayoutConfig::default(),
        }
    }
}
