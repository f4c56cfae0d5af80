use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::api::models::{extract_reply, form_body, is_json_content_type, json_body};
use crate::config::settings::Settings;
use crate::render::{format_response, user_bubble, NO_CONTENT_HTML, SEND_FAILED_TEXT};
use crate::session::history::Sender;
use crate::session::manager::SessionManager;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("json attempt failed: {json}; form attempt failed: {form}")]
    Exhausted { json: Box<DispatchError>, form: Box<DispatchError> },
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub endpoint: String,
    pub method: Method,
    pub field_name: String,
    pub reply_fields: Vec<String>,
}

impl DispatchConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let method = Method::from_bytes(settings.method.trim().to_uppercase().as_bytes())
            .with_context(|| format!("Invalid HTTP method: {}", settings.method))?;
        Ok(Self {
            endpoint: settings.endpoint(),
            method,
            field_name: settings.field_name.clone(),
            reply_fields: settings.reply_fields.clone(),
        })
    }
}

/// How a reply reached us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// JSON request, JSON response
    Json,
    /// JSON request, non-JSON response
    Text,
    /// Form-encoded retry
    Form,
    /// Both attempts failed
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub html: String,
    pub delivery: Delivery,
}

/// A prompt that passed validation and was echoed locally.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub prompt: String,
    pub user_html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub outgoing: Outgoing,
    pub reply: Reply,
}

#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(client: Client, config: DispatchConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &DispatchConfig { &self.config }

    /// Full round trip. `None` when the input is blank.
    pub async fn send(&self, session: &mut SessionManager, input: &str) -> Option<Exchange> {
        let outgoing = self.accept(session, input)?;
        let reply = self.dispatch(session, &outgoing).await;
        Some(Exchange { outgoing, reply })
    }

    /// Trims the input, records it and renders the local echo.
    pub fn accept(&self, session: &mut SessionManager, input: &str) -> Option<Outgoing> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }
        session.push(Sender::User, prompt);
        Some(Outgoing { prompt: prompt.to_string(), user_html: user_bubble(prompt) })
    }

    /// Delivers an accepted prompt and renders whatever came back.
    /// Never fails: a total failure becomes the static error bubble.
    pub async fn dispatch(&self, session: &mut SessionManager, outgoing: &Outgoing) -> Reply {
        match self.deliver(&outgoing.prompt).await {
            Ok((text, delivery)) => {
                session.push(Sender::Assistant, text.clone());
                let html = if text.is_empty() { NO_CONTENT_HTML.to_string() } else { format_response(&text) };
                Reply { text, html, delivery }
            }
            Err(err) => {
                error!(endpoint = %self.config.endpoint, error = %err, "message could not be delivered");
                Reply {
                    text: SEND_FAILED_TEXT.to_string(),
                    html: format_response(SEND_FAILED_TEXT),
                    delivery: Delivery::Failed,
                }
            }
        }
    }

    /// JSON first, one form-encoded retry on transport failure.
    pub async fn deliver(&self, prompt: &str) -> Result<(String, Delivery), DispatchError> {
        let json_err = match self.try_json(prompt).await {
            Ok(ok) => return Ok(ok),
            Err(e) => e,
        };
        warn!(error = %json_err, "json request failed, retrying form-encoded");
        match self.try_form(prompt).await {
            Ok(text) if text.is_empty() => Ok((json_err.to_string(), Delivery::Form)),
            Ok(text) => Ok((text, Delivery::Form)),
            Err(form_err) => Err(DispatchError::Exhausted {
                json: Box::new(json_err),
                form: Box::new(form_err),
            }),
        }
    }

    async fn try_json(&self, prompt: &str) -> Result<(String, Delivery), DispatchError> {
        let body = json_body(&self.config.field_name, prompt);
        debug!(endpoint = %self.config.endpoint, %body, "sending json request");
        let resp = self
            .client
            .request(self.config.method.clone(), &self.config.endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "chat endpoint returned an error status");
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if is_json_content_type(&content_type) {
            let data: Value = resp.json().await?;
            Ok((extract_reply(&data, &self.config.reply_fields), Delivery::Json))
        } else {
            Ok((resp.text().await?, Delivery::Text))
        }
    }

    async fn try_form(&self, prompt: &str) -> Result<String, DispatchError> {
        debug!(endpoint = %self.config.endpoint, "sending form request");
        let resp = self
            .client
            .request(self.config.method.clone(), &self.config.endpoint)
            .header(ACCEPT, "text/plain")
            .form(&form_body(&self.config.field_name, prompt))
            .send()
            .await?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "chat endpoint returned an error status");
        }
        Ok(resp.text().await?)
    }
}
