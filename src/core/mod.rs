/*!
 * Core build steps
 */

pub mod artifact;
pub mod availability;
pub mod compatibility;
pub mod identifiers;
pub mod loader;
pub mod orchestrate;
pub mod readiness;
pub mod repository;

pub use artifact::{render_artifact, write_artifact};
pub use availability::check_name_availability;
pub use compatibility::check_compatibility;
pub use identifiers::split_identifiers;
pub use loader::{load_and_check, load_descriptors};
pub use orchestrate::{build_space, BuildForm, BuildPlan, SpaceBuilder, Validation};
pub use readiness::{wait_until_ready, Readiness};
pub use repository::{create_target_space, BuildOutcome, TargetSpec};
