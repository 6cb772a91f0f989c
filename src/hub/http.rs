//! Hub implementation over the REST API
//!
//! All requests are blocking. Callers that live on an async runtime must
//! run builds on a blocking thread.

use base64::Engine;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use tracing::{debug, instrument};

use super::error::{HubError, HubResult};
use super::Hub;
use crate::config::BuilderConfig;
use crate::descriptor::{Endpoint, InterfaceDescriptor};

/// Longest response body kept in a `HubError::Status`
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Deserialize)]
struct WhoAmI {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpaceHost {
    host: String,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    #[serde(default)]
    pipeline_tag: Option<String>,
}

/// Blocking REST client for the Hub
#[derive(Debug, Clone)]
pub struct HttpHub {
    client: Client,
    endpoint: String,
}

impl HttpHub {
    /// Build a client from the configured endpoint and timeout
    pub fn new(config: &BuilderConfig) -> HubResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("space-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HubError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.hub_base().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Send a request, turning transport failures into `HubError::Transport`
    fn send(&self, request: RequestBuilder, url: &str) -> HubResult<Response> {
        request.send().map_err(|e| HubError::Transport {
            url: url.to_string(),
            source: Box::new(e),
        })
    }

    /// Send a request and require a success status
    fn send_ok(&self, request: RequestBuilder, url: &str) -> HubResult<Response> {
        let response = self.send(request, url)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(HubError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    fn json<T: serde::de::DeserializeOwned>(response: Response, url: &str) -> HubResult<T> {
        response.json::<T>().map_err(|e| HubError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn space_descriptor(&self, repo_id: &str) -> HubResult<InterfaceDescriptor> {
        let host_url = self.url(&format!("/api/spaces/{}/host", repo_id));
        let host: SpaceHost = Self::json(self.send_ok(self.client.get(&host_url), &host_url)?, &host_url)?;

        let config_url = format!("{}/config", host.host.trim_end_matches('/'));
        debug!(space = repo_id, url = %config_url, "Fetching gradio config");
        let config: serde_json::Value =
            Self::json(self.send_ok(self.client.get(&config_url), &config_url)?, &config_url)?;

        InterfaceDescriptor::from_gradio_config(&config_url, &config)
    }

    fn model_descriptor(&self, repo_id: &str) -> HubResult<InterfaceDescriptor> {
        let url = self.url(&format!("/api/models/{}", repo_id));
        let info: ModelInfo = Self::json(self.send_ok(self.client.get(&url), &url)?, &url)?;

        let tag = info.pipeline_tag;
        tag.as_deref()
            .and_then(InterfaceDescriptor::for_pipeline)
            .ok_or(HubError::UnsupportedPipeline {
                model: repo_id.to_string(),
                tag,
            })
    }
}

/// Split `<owner>/<name>` for endpoints that take them separately
fn split_repo_id(repo_id: &str) -> (Option<&str>, &str) {
    match repo_id.split_once('/') {
        Some((owner, name)) => (Some(owner), name),
        None => (None, repo_id),
    }
}

impl Hub for HttpHub {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip_all)]
    fn whoami(&self, token: &str) -> HubResult<String> {
        let url = self.url("/api/whoami-v2");
        let response = self.send_ok(self.client.get(&url).bearer_auth(token), &url)?;
        let who: WhoAmI = Self::json(response, &url)?;
        Ok(who.name)
    }

    #[instrument(skip(self))]
    fn space_exists(&self, repo_id: &str) -> HubResult<bool> {
        let url = self.url(&format!("/spaces/{}", repo_id));
        let response = self.send(self.client.get(&url), &url)?;
        debug!(status = response.status().as_u16(), "Existence probe answered");
        Ok(response.status() == StatusCode::OK)
    }

    #[instrument(skip(self))]
    fn fetch_descriptor(&self, identifier: &str) -> HubResult<InterfaceDescriptor> {
        let endpoint = Endpoint::parse(identifier)?;
        debug!(repo = endpoint.repo_id(), "Resolved identifier");
        match endpoint {
            Endpoint::Space(repo_id) => self.space_descriptor(&repo_id),
            Endpoint::Model(repo_id) => self.model_descriptor(&repo_id),
        }
    }

    #[instrument(skip(self, token))]
    fn create_space(&self, token: &str, name: &str, sdk: &str) -> HubResult<()> {
        let url = self.url("/api/repos/create");
        let body = json!({
            "name": name,
            "type": "space",
            "sdk": sdk,
            "private": false,
        });
        self.send_ok(self.client.post(&url).bearer_auth(token).json(&body), &url)?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    fn space_ready(&self, token: &str, repo_id: &str) -> HubResult<bool> {
        let url = self.url(&format!("/api/spaces/{}", repo_id));
        let response = self.send(self.client.get(&url).bearer_auth(token), &url)?;
        Ok(response.status().is_success())
    }

    #[instrument(skip(self, token, local_path))]
    fn upload_file(
        &self,
        token: &str,
        repo_id: &str,
        local_path: &Path,
        path_in_repo: &str,
    ) -> HubResult<()> {
        let content = std::fs::read(local_path)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&content);

        let header = json!({
            "key": "header",
            "value": {
                "summary": format!("Upload {} with space-builder", path_in_repo),
                "description": "",
            }
        });
        let file = json!({
            "key": "file",
            "value": {
                "content": encoded,
                "path": path_in_repo,
                "encoding": "base64",
            }
        });
        let payload = format!("{}\n{}\n", header, file);

        let url = self.url(&format!("/api/spaces/{}/commit/main", repo_id));
        self.send_ok(
            self.client
                .post(&url)
                .bearer_auth(token)
                .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
                .body(payload),
            &url,
        )?;
        debug!(bytes = content.len(), "Committed artifact");
        Ok(())
    }

    #[instrument(skip(self, token))]
    fn delete_space(&self, token: &str, repo_id: &str) -> HubResult<()> {
        let url = self.url("/api/repos/delete");
        let (organization, name) = split_repo_id(repo_id);
        let body = json!({
            "name": name,
            "organization": organization,
            "type": "space",
        });
        self.send_ok(self.client.delete(&url).bearer_auth(token).json(&body), &url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_repo_id() {
        assert_eq!(split_repo_id("alice/mixer"), (Some("alice"), "mixer"));
        assert_eq!(split_repo_id("mixer"), (None, "mixer"));
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let config = BuilderConfig {
            hub_endpoint: "http://localhost:9/".to_string(),
            ..Default::default()
        };
        let hub = HttpHub::new(&config).unwrap();
        assert_eq!(hub.endpoint(), "http://localhost:9");
        assert_eq!(hub.url("/api/whoami-v2"), "http://localhost:9/api/whoami-v2");
    }
}
