//! HTTP client for the note-storage service.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::NoteStorage;
use crate::config::ClientConfig;
use crate::models::{CreateNoteRequest, DeleteNoteRequest, Note, UpdateNoteRequest};
use crate::util::compact_text;
use crate::{Error, Result};

/// [`NoteStorage`] backed by the `/notes` HTTP routes.
#[derive(Clone)]
pub struct HttpNoteStorage {
    notes_url: String,
    api_token: Option<String>,
    client: Client,
}

impl HttpNoteStorage {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            notes_url: config.notes_url(),
            api_token: config.api_token.clone(),
            client: Client::builder().timeout(config.timeout).build()?,
        })
    }

    #[must_use]
    pub fn notes_url(&self) -> &str {
        &self.notes_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/json");
        match self.api_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: parse_api_error(status, &body),
            });
        }
        Ok(response)
    }
}

impl NoteStorage for HttpNoteStorage {
    async fn list(&self) -> Result<Vec<Note>> {
        let response = self.send(self.client.get(&self.notes_url)).await?;
        Ok(response.json::<Vec<Note>>().await?)
    }

    async fn create(&self, request: CreateNoteRequest) -> Result<Note> {
        tracing::debug!("POST {}", self.notes_url);
        let response = self
            .send(self.client.post(&self.notes_url).json(&request))
            .await?;
        Ok(response.json::<Note>().await?)
    }

    async fn update(&self, request: UpdateNoteRequest) -> Result<Note> {
        tracing::debug!("PUT {} id={}", self.notes_url, request.id);
        let response = self
            .send(self.client.put(&self.notes_url).json(&request))
            .await?;
        Ok(response.json::<Note>().await?)
    }

    async fn delete(&self, request: DeleteNoteRequest) -> Result<()> {
        tracing::debug!("DELETE {} id={}", self.notes_url, request.id);
        self.send(self.client.delete(&self.notes_url).json(&request))
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.error.or(payload.message) {
            return compact_text(&message);
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed
    }
}
