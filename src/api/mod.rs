//! Fastly REST API client
//!
//! A thin typed layer over `reqwest`. Every call is a single request with no
//! retries; failures come back as [`FastlyError`].

mod logging;
mod types;

pub use logging::{Datadog, Ftp, LoggingEndpoint, Loggly, Splunk};
pub use types::{DynamicSnippet, Service, Snippet, SnippetType, Version};

use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::FastlyError;

pub const DEFAULT_ENDPOINT: &str = "https://api.fastly.com";
const AUTH_HEADER: &str = "Fastly-Key";

/// Form-encoded request body, in the order fields were added.
pub type Form = Vec<(&'static str, String)>;

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl Client {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self, FastlyError> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| FastlyError::InvalidEndpoint(endpoint.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(FastlyError::InvalidEndpoint(endpoint.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fastly-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let token = token.filter(|t| !t.trim().is_empty());
        Ok(Self { http, endpoint, token })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, FastlyError> {
        let token = self.token.as_deref().ok_or(FastlyError::NoToken)?;
        tracing::debug!("{} {}", method, url.path());
        Ok(self
            .http
            .request(method, url)
            .header(AUTH_HEADER, token)
            .header("Accept", "application/json"))
    }

    /// Send a request and return the body of a successful response.
    async fn send_raw(&self, req: RequestBuilder) -> Result<String, FastlyError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(ApiErrorBody { msg: Some(msg), detail: Some(detail) }) => {
                    format!("{}: {}", msg, detail)
                }
                Ok(ApiErrorBody { msg: Some(msg), detail: None }) => msg,
                _ => status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
            tracing::debug!(status = status.as_u16(), "API error: {}", message);
            return Err(FastlyError::Api { status: status.as_u16(), message });
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, FastlyError> {
        let body = self.send_raw(req).await?;
        serde_json::from_str(&body).map_err(|e| FastlyError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, FastlyError> {
        let req = self.request(Method::GET, self.url(segments))?;
        self.send(req).await
    }

    async fn with_form<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        form: &Form,
    ) -> Result<T, FastlyError> {
        let req = self.request(method, self.url(segments))?.form(form);
        self.send(req).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), FastlyError> {
        // delete replies are `{"status":"ok"}` or empty; either way nothing to decode
        let req = self.request(Method::DELETE, self.url(segments))?;
        self.send_raw(req).await?;
        Ok(())
    }

    // ============ Services & versions ============

    /// Look up a service by its name.
    pub async fn search_service(&self, name: &str) -> Result<Service, FastlyError> {
        let mut url = self.url(&["service", "search"]);
        url.query_pairs_mut().append_pair("name", name);
        let req = self.request(Method::GET, url)?;
        self.send(req).await
    }

    pub async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>, FastlyError> {
        self.get(&["service", service_id, "version"]).await
    }

    pub async fn get_version(&self, service_id: &str, version: u32) -> Result<Version, FastlyError> {
        self.get(&["service", service_id, "version", &version.to_string()]).await
    }

    pub async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version, FastlyError> {
        let v = version.to_string();
        let segments = ["service", service_id, "version", v.as_str(), "clone"];
        self.with_form(Method::PUT, &segments, &Form::new()).await
    }

    // ============ Logging endpoints ============

    pub async fn list_logging<E: LoggingEndpoint>(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Vec<E>, FastlyError> {
        let v = version.to_string();
        self.get(&["service", service_id, "version", &v, "logging", E::KIND]).await
    }

    pub async fn get_logging<E: LoggingEndpoint>(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<E, FastlyError> {
        let v = version.to_string();
        self.get(&["service", service_id, "version", &v, "logging", E::KIND, name]).await
    }

    pub async fn create_logging<E: LoggingEndpoint>(
        &self,
        service_id: &str,
        version: u32,
        form: &Form,
    ) -> Result<E, FastlyError> {
        let v = version.to_string();
        let segments = ["service", service_id, "version", v.as_str(), "logging", E::KIND];
        self.with_form(Method::POST, &segments, form).await
    }

    pub async fn update_logging<E: LoggingEndpoint>(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        form: &Form,
    ) -> Result<E, FastlyError> {
        let v = version.to_string();
        let segments = ["service", service_id, "version", v.as_str(), "logging", E::KIND, name];
        self.with_form(Method::PUT, &segments, form).await
    }

    pub async fn delete_logging<E: LoggingEndpoint>(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<(), FastlyError> {
        let v = version.to_string();
        self.delete(&["service", service_id, "version", &v, "logging", E::KIND, name]).await
    }

    // ============ VCL snippets ============

    pub async fn list_snippets(&self, service_id: &str, version: u32) -> Result<Vec<Snippet>, FastlyError> {
        self.get(&["service", service_id, "version", &version.to_string(), "snippet"]).await
    }

    pub async fn get_snippet(&self, service_id: &str, version: u32, name: &str) -> Result<Snippet, FastlyError> {
        self.get(&["service", service_id, "version", &version.to_string(), "snippet", name]).await
    }

    pub async fn get_dynamic_snippet(&self, service_id: &str, snippet_id: &str) -> Result<DynamicSnippet, FastlyError> {
        self.get(&["service", service_id, "snippet", snippet_id]).await
    }

    pub async fn create_snippet(&self, service_id: &str, version: u32, form: &Form) -> Result<Snippet, FastlyError> {
        let v = version.to_string();
        self.with_form(Method::POST, &["service", service_id, "version", &v, "snippet"], form).await
    }

    pub async fn update_snippet(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        form: &Form,
    ) -> Result<Snippet, FastlyError> {
        let v = version.to_string();
        self.with_form(Method::PUT, &["service", service_id, "version", &v, "snippet", name], form)
            .await
    }

    pub async fn update_dynamic_snippet(
        &self,
        service_id: &str,
        snippet_id: &str,
        form: &Form,
    ) -> Result<DynamicSnippet, FastlyError> {
        self.with_form(Method::PUT, &["service", service_id, "snippet", snippet_id], form).await
    }

    pub async fn delete_snippet(&self, service_id: &str, version: u32, name: &str) -> Result<(), FastlyError> {
        self.delete(&["service", service_id, "version", &version.to_string(), "snippet", name]).await
    }
}
