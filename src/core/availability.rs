/*!
 * Target name availability
 */

use tracing::{info, warn};

use crate::error::{BuildError, Result};
use crate::hub::{Hub, HubError};

/// Check that `name` is free under the token owner's namespace
///
/// Returns the fully-qualified `<owner>/<name>` when the space does not exist
/// yet. A rejected token, an existing space and an unreachable Hub each map
/// to their own error.
pub fn check_name_availability(hub: &dyn Hub, token: &str, name: &str) -> Result<String> {
    let repo_id = hub.full_repo_name(token, name).map_err(|e| {
        warn!(reason = token_failure(&e), error = %e, "Token could not be resolved to an owner");
        BuildError::InvalidToken
    })?;

    match hub.space_exists(&repo_id) {
        Ok(true) => {
            info!(repo = %repo_id, "Space name already used");
            Err(BuildError::NameTaken { repo_id })
        }
        Ok(false) => {
            info!(repo = %repo_id, "Space name is available");
            Ok(repo_id)
        }
        Err(e) => {
            warn!(error = %e, "Existence probe failed");
            Err(BuildError::HubUnreachable {
                endpoint: hub.endpoint().to_string(),
            })
        }
    }
}

/// Why the owner lookup failed; every reason surfaces as `InvalidToken`
fn token_failure(error: &HubError) -> &'static str {
    if error.is_auth_error() {
        "rejected"
    } else if error.is_retriable() {
        "hub unavailable"
    } else if error.is_not_found() {
        "whoami endpoint missing"
    } else {
        "unexpected response"
    }
}
