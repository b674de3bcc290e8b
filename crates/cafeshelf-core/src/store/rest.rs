//! REST client for the hosted realtime database.
//!
//! Append and remove are plain JSON requests; change notifications arrive
//! over a Server-Sent Events stream read by a background task.

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::models::{EntryKey, NewCafeEntry};
use crate::store::{stream, ListingStore, StoreEvent, Subscription, EVENT_CHANNEL_CAPACITY};
use crate::util::{compact_text, is_http_url};
use crate::{Error, Result};

const COLLECTION: &str = "cafes";
const ORDER_FIELD: &str = "\"createdAt\"";

/// Sentinel the backend replaces with its own write timestamp.
fn server_timestamp() -> serde_json::Value {
    serde_json::json!({ ".sv": "timestamp" })
}

/// Listing store backed by the hosted realtime database REST API.
#[derive(Clone)]
pub struct RestListingStore {
    base_url: String,
    auth_token: Option<String>,
    client: Client,
}

impl RestListingStore {
    /// Create a store client for the given database base URL
    /// (e.g. `https://my-project.firebaseio.example`).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = base_url.as_ref().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::InvalidInput(
                "Database base URL must not be empty".to_string(),
            ));
        }
        if !is_http_url(&base_url) {
            return Err(Error::InvalidInput(
                "Database base URL must include http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            auth_token: None,
            client: Client::builder().build()?,
        })
    }

    /// Attach the signed-in user's token to every request.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn collection_url(&self) -> String {
        format!("{}/{COLLECTION}.json", self.base_url)
    }

    fn entry_url(&self, key: &EntryKey) -> String {
        format!(
            "{}/{COLLECTION}/{}.json",
            self.base_url,
            urlencoding::encode(key.as_str())
        )
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        self.auth_token
            .as_ref()
            .map(|token| vec![("auth", token.clone())])
            .unwrap_or_default()
    }
}

impl ListingStore for RestListingStore {
    async fn push(&self, entry: NewCafeEntry) -> Result<EntryKey> {
        let mut payload = serde_json::to_value(&entry)?;
        if let Some(fields) = payload.as_object_mut() {
            fields.insert("createdAt".to_string(), server_timestamp());
        }

        let response = self
            .client
            .post(self.collection_url())
            .query(&self.auth_query())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(write_error("push", response.status(), response.text().await));
        }

        let body: PushResponse = response.json().await?;
        Ok(body.name.into())
    }

    async fn remove(&self, key: &EntryKey) -> Result<()> {
        let response = self
            .client
            .delete(self.entry_url(key))
            .query(&self.auth_query())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(write_error(
                "remove",
                response.status(),
                response.text().await,
            ));
        }

        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        let mut query = vec![("orderBy", ORDER_FIELD.to_string())];
        query.extend(self.auth_query());

        let response = self
            .client
            .get(self.collection_url())
            .query(&query)
            .header("Accept", "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Stream(format!(
                "subscribe failed with HTTP {}",
                response.status().as_u16()
            )));
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let reader = tokio::spawn(read_event_stream(response, tx));

        Ok(Subscription::new(rx, Some(reader)))
    }
}

async fn read_event_stream(response: reqwest::Response, tx: mpsc::Sender<StoreEvent>) {
    let mut buffer = String::new();
    let mut pending: Vec<u8> = Vec::new();
    let mut byte_stream = std::pin::pin!(response.bytes_stream());

    while let Some(chunk_result) = byte_stream.next().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(error) => {
                tracing::error!("Listing event stream failed: {}", error);
                return;
            }
        };

        // Chunk boundaries are not UTF-8 aligned: a multibyte character
        // (listing text is often Japanese) can be split across chunks.
        pending.extend_from_slice(&chunk);
        drain_decoded_text(&mut pending, &mut buffer);

        while let Some(raw) = stream::extract_frame(&mut buffer) {
            let Some(frame) = stream::parse_frame(&raw) else {
                continue;
            };
            let events = match stream::decode_frame(&frame) {
                Ok(events) => events,
                Err(error) => {
                    tracing::error!("Failed to decode listing event: {}", error);
                    return;
                }
            };
            for event in events {
                // Receiver dropped means the subscriber detached.
                if tx.send(event).await.is_err() {
                    return;
                }
            }
        }
    }
}

/// Move the decodable prefix of `pending` into `buffer`.
///
/// An incomplete trailing character stays pending until its remaining
/// bytes arrive with the next chunk; invalid sequences are skipped.
fn drain_decoded_text(pending: &mut Vec<u8>, buffer: &mut String) {
    loop {
        match std::str::from_utf8(pending) {
            Ok(text) => {
                buffer.push_str(text);
                pending.clear();
                return;
            }
            Err(error) => {
                let valid = error.valid_up_to();
                if let Ok(text) = std::str::from_utf8(&pending[..valid]) {
                    buffer.push_str(text);
                }
                match error.error_len() {
                    None => {
                        pending.drain(..valid);
                        return;
                    }
                    Some(skipped) => {
                        tracing::warn!("Skipping {} invalid bytes in event stream", skipped);
                        pending.drain(..valid + skipped);
                    }
                }
            }
        }
    }
}

fn write_error(
    operation: &str,
    status: StatusCode,
    body: std::result::Result<String, reqwest::Error>,
) -> Error {
    let body = body.unwrap_or_default();
    let detail = if body.trim().is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(&body), status.as_u16())
    };
    Error::Write(format!("{operation}: {detail}"))
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}
