//! Sendinblue v3 SMTP template endpoints.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::config::ApiConfig;
use crate::error::ExitError;

/// Templates fetched by a download. There is no pagination: anything past
/// the first page is not fetched.
pub const PAGE_LIMIT: u32 = 1000;

/// Upper bound on a response body. A full page of HTML templates can exceed
/// ureq's default limit.
const MAX_RESPONSE_BYTES: u64 = 256 * 1024 * 1024;

/// A remote template. Fields the sync does not use are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: u64,
    pub name: String,
    pub html_content: String,
}

#[derive(Debug, Deserialize)]
struct TemplateList {
    // Omitted by the API when the account has no templates.
    #[serde(default)]
    templates: Vec<Template>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTemplate<'a> {
    html_content: &'a str,
}

/// Remote side of a sync.
pub trait TemplateApi {
    /// First page of templates in ascending id order.
    fn list_templates(&self) -> Result<Vec<Template>>;

    /// Replace a template's HTML content.
    fn update_html_content(&self, id: u64, html_content: &str) -> Result<()>;
}

/// Blocking HTTP client for the template API.
pub struct SendinblueClient {
    config: ApiConfig,
    agent: Agent,
}

impl SendinblueClient {
    pub fn new(config: ApiConfig) -> Self {
        let agent = Agent::new_with_config(
            Agent::config_builder()
                .http_status_as_error(false)
                .build(),
        );
        Self::with_agent(config, agent)
    }

    /// Use a preconfigured agent. It must not treat HTTP status codes as
    /// errors, otherwise error bodies are lost.
    pub fn with_agent(config: ApiConfig, agent: Agent) -> Self {
        Self { config, agent }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Read the body, mapping any non-2xx status to [`ExitError::Api`].
    fn read_body(
        mut response: ureq::http::Response<ureq::Body>,
        what: &str,
    ) -> Result<String> {
        let status = response.status();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .with_context(|| format!("reading response to {what}"))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "{what} failed");
            return Err(ExitError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(body)
    }
}

impl TemplateApi for SendinblueClient {
    fn list_templates(&self) -> Result<Vec<Template>> {
        let url = self.url("/smtp/templates");
        tracing::debug!(%url, limit = PAGE_LIMIT, "listing templates");

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .header("api-key", &self.config.api_key)
            .query("limit", PAGE_LIMIT.to_string())
            .query("offset", "0")
            .query("sort", "asc")
            .call()
            .with_context(|| format!("GET {url}"))?;

        let body = Self::read_body(response, "list templates")?;
        let list: TemplateList =
            serde_json::from_str(&body).context("parsing template list response")?;

        tracing::debug!(count = list.templates.len(), "templates listed");
        Ok(list.templates)
    }

    fn update_html_content(&self, id: u64, html_content: &str) -> Result<()> {
        let url = self.url(&format!("/smtp/templates/{id}"));
        tracing::debug!(%url, bytes = html_content.len(), "updating template");

        let payload = serde_json::to_string(&UpdateTemplate { html_content })?;
        let response = self
            .agent
            .put(&url)
            .header("Accept", "application/json")
            .header("api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .with_context(|| format!("PUT {url}"))?;

        Self::read_body(response, &format!("update template {id}"))?;
        Ok(())
    }
}
