//! Access to the model Hub
//!
//! Every remote call a build makes goes through the [`Hub`] trait, one method
//! per call. [`HttpHub`] talks to the real REST API with blocking requests;
//! [`MockHub`] keeps everything in memory for tests and local experiments.
//!
//! # Example
//!
//! ```no_run
//! use space_builder::hub::{Hub, HttpHub};
//! use space_builder::BuilderConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = HttpHub::new(&BuilderConfig::default())?;
//!     let owner = hub.whoami("hf_xxx")?;
//!     println!("token belongs to {}", owner);
//!     Ok(())
//! }
//! ```

pub mod error;
mod http;
pub mod mock;

pub use error::{HubError, HubResult};
pub use http::HttpHub;
pub use mock::MockHub;

use std::path::Path;

use crate::descriptor::InterfaceDescriptor;

/// Remote operations needed to build a space
///
/// Implementors must be `Send + Sync` so one instance can serve concurrent
/// web form requests.
pub trait Hub: Send + Sync {
    /// Base URL of the Hub, used in user-facing messages and URLs
    fn endpoint(&self) -> &str;

    /// Resolve the account that owns `token`
    ///
    /// # Errors
    ///
    /// Fails when the token is rejected or the Hub cannot be reached.
    fn whoami(&self, token: &str) -> HubResult<String>;

    /// Fully-qualified `<owner>/<name>` for a repository owned by `token`
    fn full_repo_name(&self, token: &str, name: &str) -> HubResult<String> {
        let owner = self.whoami(token)?;
        Ok(format!("{}/{}", owner, name))
    }

    /// Whether the public page of a space answers with HTTP 200
    ///
    /// Any other status means the name is free. Only transport failures are
    /// errors.
    fn space_exists(&self, repo_id: &str) -> HubResult<bool>;

    /// Load the interface descriptor of a space or model identifier
    fn fetch_descriptor(&self, identifier: &str) -> HubResult<InterfaceDescriptor>;

    /// Create a public space named `name` under the token's owner
    fn create_space(&self, token: &str, name: &str, sdk: &str) -> HubResult<()>;

    /// Whether a freshly created space accepts API calls yet
    fn space_ready(&self, token: &str, repo_id: &str) -> HubResult<bool>;

    /// Commit the local file to `path_in_repo` in the space
    fn upload_file(
        &self,
        token: &str,
        repo_id: &str,
        local_path: &Path,
        path_in_repo: &str,
    ) -> HubResult<()>;

    /// Delete a space
    fn delete_space(&self, token: &str, repo_id: &str) -> HubResult<()>;
}
