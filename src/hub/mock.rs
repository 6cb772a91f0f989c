//! In-memory Hub for tests
//!
//! Records every call so tests can assert on ordering, and lets individual
//! operations be switched to fail.
//!
//! # Example
//!
//! ```rust
//! use space_builder::descriptor::InterfaceDescriptor;
//! use space_builder::hub::{Hub, MockHub};
//!
//! let hub = MockHub::new()
//!     .with_token("hf_test", "alice")
//!     .with_descriptor("models/gpt2", InterfaceDescriptor::new(["textbox"], ["textbox"]));
//!
//! assert_eq!(hub.whoami("hf_test").unwrap(), "alice");
//! assert!(!hub.space_exists("alice/mixer").unwrap());
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, RwLock};

use super::error::{HubError, HubResult};
use super::Hub;
use crate::descriptor::InterfaceDescriptor;

/// A single recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubCall {
    WhoAmI,
    SpaceExists(String),
    FetchDescriptor(String),
    CreateSpace { name: String, sdk: String },
    SpaceReady(String),
    UploadFile { repo_id: String, path_in_repo: String },
    DeleteSpace(String),
}

#[derive(Debug, Default)]
struct MockState {
    tokens: HashMap<String, String>,
    descriptors: HashMap<String, InterfaceDescriptor>,
    spaces: HashSet<String>,
    uploads: HashMap<(String, String), String>,
    calls: Vec<HubCall>,
    offline: bool,
    reject_create: bool,
    reject_upload: bool,
    probes_until_ready: u32,
}

/// Mock Hub implementation for testing
#[derive(Debug, Clone)]
pub struct MockHub {
    endpoint: String,
    state: Arc<RwLock<MockState>>,
}

impl Default for MockHub {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHub {
    /// Create an empty hub at the default endpoint
    pub fn new() -> Self {
        Self {
            endpoint: "https://huggingface.co".to_string(),
            state: Arc::new(RwLock::new(MockState::default())),
        }
    }

    /// Accept `token` as belonging to `owner`
    pub fn with_token(self, token: &str, owner: &str) -> Self {
        self.write()
            .tokens
            .insert(token.to_string(), owner.to_string());
        self
    }

    /// Make `identifier` loadable with the given descriptor
    pub fn with_descriptor(self, identifier: &str, descriptor: InterfaceDescriptor) -> Self {
        self.write()
            .descriptors
            .insert(identifier.to_string(), descriptor);
        self
    }

    /// Register an existing space
    pub fn with_space(self, repo_id: &str) -> Self {
        self.write().spaces.insert(repo_id.to_string());
        self
    }

    /// Fail every call with a transport error
    pub fn offline(self) -> Self {
        self.write().offline = true;
        self
    }

    /// Refuse repository creation
    pub fn rejecting_create(self) -> Self {
        self.write().reject_create = true;
        self
    }

    /// Refuse uploads
    pub fn rejecting_upload(self) -> Self {
        self.write().reject_upload = true;
        self
    }

    /// Report a new space as not ready for the first `probes` readiness checks
    pub fn ready_after(self, probes: u32) -> Self {
        self.write().probes_until_ready = probes;
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<HubCall> {
        self.read().calls.clone()
    }

    /// Whether a space exists
    pub fn has_space(&self, repo_id: &str) -> bool {
        self.read().spaces.contains(repo_id)
    }

    /// Content uploaded to `path_in_repo` of a space
    pub fn uploaded(&self, repo_id: &str, path_in_repo: &str) -> Option<String> {
        self.read()
            .uploads
            .get(&(repo_id.to_string(), path_in_repo.to_string()))
            .cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and fail it if the hub is offline
    fn record(&self, call: HubCall) -> HubResult<std::sync::RwLockWriteGuard<'_, MockState>> {
        let mut state = self.write();
        state.calls.push(call);
        if state.offline {
            return Err(HubError::Transport {
                url: self.endpoint.clone(),
                source: "connection refused".into(),
            });
        }
        Ok(state)
    }

    fn owner(state: &MockState, token: &str) -> HubResult<String> {
        state.tokens.get(token).cloned().ok_or_else(|| HubError::Status {
            url: "mock://whoami".to_string(),
            status: 401,
            body: "Invalid user token".to_string(),
        })
    }
}

impl Hub for MockHub {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn whoami(&self, token: &str) -> HubResult<String> {
        let state = self.record(HubCall::WhoAmI)?;
        Self::owner(&state, token)
    }

    fn space_exists(&self, repo_id: &str) -> HubResult<bool> {
        let state = self.record(HubCall::SpaceExists(repo_id.to_string()))?;
        Ok(state.spaces.contains(repo_id))
    }

    fn fetch_descriptor(&self, identifier: &str) -> HubResult<InterfaceDescriptor> {
        let state = self.record(HubCall::FetchDescriptor(identifier.to_string()))?;
        state
            .descriptors
            .get(identifier)
            .cloned()
            .ok_or_else(|| HubError::Status {
                url: format!("mock://{}", identifier),
                status: 404,
                body: String::new(),
            })
    }

    fn create_space(&self, token: &str, name: &str, sdk: &str) -> HubResult<()> {
        let mut state = self.record(HubCall::CreateSpace {
            name: name.to_string(),
            sdk: sdk.to_string(),
        })?;
        let owner = Self::owner(&state, token)?;
        if state.reject_create {
            return Err(HubError::Status {
                url: "mock://repos/create".to_string(),
                status: 400,
                body: "Invalid repo name".to_string(),
            });
        }
        let repo_id = format!("{}/{}", owner, name);
        if !state.spaces.insert(repo_id.clone()) {
            return Err(HubError::Status {
                url: "mock://repos/create".to_string(),
                status: 409,
                body: format!("{} already exists", repo_id),
            });
        }
        Ok(())
    }

    fn space_ready(&self, _token: &str, repo_id: &str) -> HubResult<bool> {
        let mut state = self.record(HubCall::SpaceReady(repo_id.to_string()))?;
        if state.probes_until_ready > 0 {
            state.probes_until_ready -= 1;
            return Ok(false);
        }
        Ok(state.spaces.contains(repo_id))
    }

    fn upload_file(
        &self,
        _token: &str,
        repo_id: &str,
        local_path: &Path,
        path_in_repo: &str,
    ) -> HubResult<()> {
        let mut state = self.record(HubCall::UploadFile {
            repo_id: repo_id.to_string(),
            path_in_repo: path_in_repo.to_string(),
        })?;
        if state.reject_upload || !state.spaces.contains(repo_id) {
            return Err(HubError::Status {
                url: format!("mock://spaces/{}/commit/main", repo_id),
                status: 500,
                body: String::new(),
            });
        }
        let content = std::fs::read_to_string(local_path)?;
        state
            .uploads
            .insert((repo_id.to_string(), path_in_repo.to_string()), content);
        Ok(())
    }

    fn delete_space(&self, _token: &str, repo_id: &str) -> HubResult<()> {
        let mut state = self.record(HubCall::DeleteSpace(repo_id.to_string()))?;
        state.spaces.remove(repo_id);
        Ok(())
    }
}
