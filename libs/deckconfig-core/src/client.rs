//! Request/response channel for loading and saving presets.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::error::TransportError;
use crate::types::{DeckConfigsForUpdate, DeckConfigsForUpdateIn, UpdateDeckConfigsIn};

pub const DECK_CONFIGS_FOR_UPDATE_PATH: &str = "/_anki/deckConfigsForUpdate";
pub const UPDATE_DECK_CONFIGS_PATH: &str = "/_anki/updateDeckConfigs";

/// A URL-addressed channel that posts a body and returns the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// HTTP transport talking to a backend at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, bytes = body.len(), "posting request");

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/binary")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(%url, status, "request failed");
            return Err(TransportError::Backend { status, message });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Fetch the preset snapshot for `deck_id`.
pub async fn get_deck_config_info<T>(
    transport: &T,
    deck_id: i64,
) -> Result<DeckConfigsForUpdate, TransportError>
where
    T: Transport + ?Sized,
{
    let body = serde_json::to_vec(&DeckConfigsForUpdateIn { deck_id })?;
    let bytes = transport.post(DECK_CONFIGS_FOR_UPDATE_PATH, body).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Send a save payload. The acknowledgement body is ignored.
pub async fn save_deck_config<T>(
    transport: &T,
    input: &UpdateDeckConfigsIn,
) -> Result<(), TransportError>
where
    T: Transport + ?Sized,
{
    let body = serde_json::to_vec(input)?;
    transport.post(UPDATE_DECK_CONFIGS_PATH, body).await?;
    Ok(())
}
