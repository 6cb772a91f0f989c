/*!
 * space-builder - compose hosted inference endpoints into one space
 *
 * Takes a list of hosted models and spaces, checks that they share one
 * interface signature, and publishes a new gradio space that serves them
 * side by side:
 * - Target name availability check against the credential's owner
 * - Interface loading and input/output compatibility validation
 * - Space creation, readiness wait, and upload of the generated program
 * - Optional rollback of the created space when the upload fails
 * - CLI and web form front ends over the same build pipeline
 */

pub mod cli_style;
pub mod config;
pub mod core;
pub mod descriptor;
pub mod error;
pub mod hub;
pub mod logging;
pub mod web;

// Re-export commonly used types
pub use config::{BuilderConfig, LogLevel};
pub use core::{build_space, BuildForm, BuildOutcome, BuildPlan, SpaceBuilder, Validation};
pub use descriptor::{ComponentKind, InterfaceDescriptor};
pub use error::{BuildError, Result};
pub use hub::{HttpHub, Hub, HubError, MockHub};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
