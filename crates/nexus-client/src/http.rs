//! HTTP backend on `reqwest`

use crate::backend::CortexBackend;
use crate::config::NexusConfig;
use crate::error::BackendError;
use nexus_model::{
    Ack, AnchorRequest, AskPreview, BrickFull, BrickMeta, GraphIndex, KillRequest, PromoteRequest,
};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

const ASK_PREVIEW: &str = "ask-preview";
const GRAPH_INDEX: &str = "graph-index";
const BRICK_META: &str = "brick-meta";
const BRICK_FULL: &str = "brick-full";
const ANCHOR: &str = "anchor";
const NODE_PROMOTE: &str = "node/promote";
const NODE_KILL: &str = "node/kill";

/// Backend reached over HTTP, all paths relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Builds a client from configuration
    ///
    /// # Errors
    /// [`BackendError::Config`] for an unparseable base URL.
    pub fn new(config: &NexusConfig) -> Result<Self, BackendError> {
        // trailing slash so joins keep the mount prefix
        let mut raw = config.base_url.trim_end_matches('/').to_string();
        raw.push('/');
        let base_url = Url::parse(&raw)
            .map_err(|e| BackendError::Config(format!("invalid base url {:?}: {e}", config.base_url)))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Resolved base URL
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint path
    ///
    /// # Errors
    /// [`BackendError::Config`] if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::Config(format!("cannot resolve {path}: {e}")))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport(path, &e))?;
        read_json(path, response).await
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Ack, BackendError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(path, &e))?;
        let ack: Ack = read_json(path, response).await?;
        match ack.rejection() {
            Some(message) => Err(BackendError::Rejected(message.to_string())),
            None => Ok(ack),
        }
    }
}

fn transport(path: &str, err: &reqwest::Error) -> BackendError {
    tracing::warn!(endpoint = path, %err, "request failed");
    BackendError::Transport(err.to_string())
}

async fn read_body(path: &str, response: Response) -> Result<String, BackendError> {
    let status = response.status();
    let text = response.text().await.map_err(|e| transport(path, &e))?;
    if status.is_success() {
        return Ok(text);
    }
    // error statuses may still carry a readable `{error}` body
    if let Ok(ack) = serde_json::from_str::<Ack>(&text) {
        if let Some(message) = ack.rejection() {
            return Err(BackendError::Rejected(message.to_string()));
        }
    }
    tracing::warn!(endpoint = path, status = status.as_u16(), "unexpected status");
    Err(BackendError::Status {
        endpoint: path.to_string(),
        status: status.as_u16(),
    })
}

async fn read_json<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, BackendError> {
    let text = read_body(path, response).await?;
    serde_json::from_str(&text).map_err(|e| BackendError::Decode {
        endpoint: path.to_string(),
        message: e.to_string(),
    })
}

#[async_trait::async_trait]
impl CortexBackend for HttpBackend {
    async fn ask_preview(&self, query: &str, use_genai: bool) -> Result<AskPreview, BackendError> {
        let mut params = vec![("query", query)];
        if use_genai {
            params.push(("use_genai", "true"));
        }
        let preview: AskPreview = self.get(ASK_PREVIEW, &params).await?;
        Ok(preview.sorted())
    }

    async fn graph_index(&self) -> Result<GraphIndex, BackendError> {
        let raw: serde_json::Value = self.get(GRAPH_INDEX, &[]).await?;
        Ok(GraphIndex::from_value(&raw))
    }

    async fn brick_meta(&self, brick_id: &str) -> Result<BrickMeta, BackendError> {
        self.get(BRICK_META, &[("brick_id", brick_id)]).await
    }

    async fn brick_full(&self, brick_id: &str) -> Result<BrickFull, BackendError> {
        self.get(BRICK_FULL, &[("brick_id", brick_id)]).await
    }

    async fn submit_anchor(&self, request: &AnchorRequest) -> Result<Ack, BackendError> {
        self.post(ANCHOR, request).await
    }

    async fn promote_node(&self, request: &PromoteRequest) -> Result<Ack, BackendError> {
        self.post(NODE_PROMOTE, request).await
    }

    async fn kill_node(&self, request: &KillRequest) -> Result<Ack, BackendError> {
        self.post(NODE_KILL, request).await
    }
}
