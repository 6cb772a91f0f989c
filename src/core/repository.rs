/*!
 * Target space creation and artifact upload
 */

use serde::Serialize;
use tracing::{error, info, warn};

use super::artifact::{render_artifact, write_artifact};
use super::readiness::{wait_until_ready, Readiness};
use crate::config::BuilderConfig;
use crate::error::{BuildError, Result};
use crate::hub::Hub;

/// Inputs of the repository step
#[derive(Debug, Clone, Copy)]
pub struct TargetSpec<'a> {
    pub identifiers: &'a [String],
    pub target_name: &'a str,
    pub token: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

/// A successfully built space
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    /// Fully-qualified `<owner>/<name>`
    pub repo_id: String,
    /// Browsable URL of the new space
    pub url: String,
}

/// Create the target space and upload the generated program to it
///
/// Every step is a hard failure point; nothing created before the failing
/// step is undone unless `rollback_on_upload_failure` is set.
pub fn create_target_space(
    hub: &dyn Hub,
    config: &BuilderConfig,
    spec: &TargetSpec<'_>,
) -> Result<BuildOutcome> {
    hub.create_space(spec.token, spec.target_name, &config.space_sdk)
        .map_err(|e| {
            warn!(name = spec.target_name, error = %e, "Space creation refused");
            BuildError::InvalidTargetName
        })?;

    let repo_id = hub
        .full_repo_name(spec.token, spec.target_name)
        .map_err(|e| {
            warn!(error = %e, "Token could not be resolved after creation");
            BuildError::InvalidToken
        })?;
    info!(repo = %repo_id, "Created space");

    let contents = render_artifact(spec.identifiers, spec.title, spec.description);
    let file = write_artifact(&contents)?;

    if let Readiness::Ready { probes } = wait_until_ready(hub, config, spec.token, &repo_id) {
        info!(probes, "Space accepted readiness probe");
    }

    if let Err(e) = hub.upload_file(spec.token, &repo_id, file.path(), &config.path_in_repo) {
        error!(repo = %repo_id, error = %e, "Upload failed");
        if config.rollback_on_upload_failure {
            match hub.delete_space(spec.token, &repo_id) {
                Ok(()) => info!(repo = %repo_id, "Rolled back space after failed upload"),
                Err(e) => warn!(repo = %repo_id, error = %e, "Rollback failed, space left behind"),
            }
        }
        return Err(BuildError::UploadFailed);
    }

    let url = config.space_url(&repo_id);
    info!(url = %url, "Space built");
    Ok(BuildOutcome { repo_id, url })
}
