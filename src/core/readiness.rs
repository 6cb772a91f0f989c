/*!
 * Wait for a freshly created space before uploading to it
 *
 * The Hub does not always accept a commit right after a repository is
 * created. A fixed delay is followed by a bounded number of readiness probes.
 */

use std::thread;

use tracing::{debug, warn};

use crate::config::BuilderConfig;
use crate::hub::Hub;

/// How the wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// A probe reported the space ready
    Ready { probes: u32 },
    /// Polling is disabled; only the fixed delay applied
    Unchecked,
    /// Every probe failed or reported not ready
    Exhausted { probes: u32 },
}

/// Sleep the fixed delay, then poll until the space is ready or probes run out
pub fn wait_until_ready(
    hub: &dyn Hub,
    config: &BuilderConfig,
    token: &str,
    repo_id: &str,
) -> Readiness {
    let delay = config.upload_delay();
    if !delay.is_zero() {
        debug!(?delay, "Waiting before upload");
        thread::sleep(delay);
    }

    if config.readiness_attempts == 0 {
        return Readiness::Unchecked;
    }

    for probe in 1..=config.readiness_attempts {
        match hub.space_ready(token, repo_id) {
            Ok(true) => {
                debug!(probe, "Space ready");
                return Readiness::Ready { probes: probe };
            }
            Ok(false) => debug!(probe, "Space not ready yet"),
            Err(e) => debug!(probe, error = %e, "Readiness probe failed"),
        }
        if probe < config.readiness_attempts {
            thread::sleep(config.readiness_interval());
        }
    }

    warn!(
        repo = repo_id,
        probes = config.readiness_attempts,
        "Space never reported ready, uploading anyway"
    );
    Readiness::Exhausted {
        probes: config.readiness_attempts,
    }
}
