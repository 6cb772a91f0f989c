/*!
 * Top-level build orchestration
 *
 * Steps run from cheapest to most expensive: name availability, then
 * interface loading, then space creation. The first failure is returned and
 * later steps never run.
 */

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use super::artifact::render_artifact;
use super::availability::check_name_availability;
use super::identifiers::split_identifiers;
use super::loader::load_and_check;
use super::repository::{create_target_space, BuildOutcome, TargetSpec};
use crate::config::BuilderConfig;
use crate::descriptor::InterfaceDescriptor;
use crate::error::{BuildError, Result};
use crate::hub::Hub;

/// The five user-supplied fields
///
/// Absent fields deserialize as empty strings so they fail `validate` with
/// the same message as blank ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildForm {
    /// Newline-delimited identifiers
    pub space_names: String,
    pub token: String,
    pub target_name: String,
    pub title: String,
    pub description: String,
}

impl BuildForm {
    /// Every field must contain something other than whitespace
    pub fn validate(&self) -> Result<()> {
        let fields = [
            &self.space_names,
            &self.token,
            &self.target_name,
            &self.title,
            &self.description,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(BuildError::MissingInput);
        }
        Ok(())
    }
}

/// Result of the remote checks that precede space creation
#[derive(Debug, Clone, Serialize)]
pub struct Validation {
    pub repo_id: String,
    pub url: String,
    pub identifiers: Vec<String>,
    pub signature: InterfaceDescriptor,
}

/// What a build would do, without doing it
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    #[serde(flatten)]
    pub validation: Validation,
    pub path_in_repo: String,
    pub artifact: String,
}

/// Runs builds against one Hub with one configuration
///
/// Holds no per-build state, so one instance can serve concurrent requests.
pub struct SpaceBuilder<'a> {
    hub: &'a dyn Hub,
    config: &'a BuilderConfig,
}

impl<'a> SpaceBuilder<'a> {
    pub fn new(hub: &'a dyn Hub, config: &'a BuilderConfig) -> Self {
        Self { hub, config }
    }

    /// Name availability and interface checks only
    pub fn check(&self, space_names: &str, token: &str, target_name: &str) -> Result<Validation> {
        if [space_names, token, target_name]
            .iter()
            .any(|f| f.trim().is_empty())
        {
            return Err(BuildError::MissingInput);
        }
        let identifiers = split_identifiers(space_names);
        self.validate_remote(identifiers, token, target_name.trim())
    }

    /// Validate everything and render the artifact, creating nothing
    pub fn dry_run(&self, form: &BuildForm) -> Result<BuildPlan> {
        form.validate()?;
        let validation = self.validate_remote(
            split_identifiers(&form.space_names),
            &form.token,
            form.target_name.trim(),
        )?;
        let artifact = render_artifact(&validation.identifiers, &form.title, &form.description);

        Ok(BuildPlan {
            validation,
            path_in_repo: self.config.path_in_repo.clone(),
            artifact,
        })
    }

    /// Build the composite space
    pub fn build(&self, form: &BuildForm) -> Result<BuildOutcome> {
        form.validate()?;

        let target_name = form.target_name.trim();
        let span = info_span!("build", target = target_name);
        let _enter = span.enter();

        let validation =
            self.validate_remote(split_identifiers(&form.space_names), &form.token, target_name)?;

        create_target_space(
            self.hub,
            self.config,
            &TargetSpec {
                identifiers: &validation.identifiers,
                target_name,
                token: &form.token,
                title: &form.title,
                description: &form.description,
            },
        )
    }

    fn validate_remote(
        &self,
        identifiers: Vec<String>,
        token: &str,
        target_name: &str,
    ) -> Result<Validation> {
        let repo_id = check_name_availability(self.hub, token, target_name)?;
        let signature = load_and_check(self.hub, &identifiers)?;
        info!(repo = %repo_id, %signature, "Inputs validated");

        Ok(Validation {
            url: self.config.space_url(&repo_id),
            repo_id,
            identifiers,
            signature,
        })
    }
}

/// Form handler semantics: the URL on success, the error message otherwise
pub fn build_space(hub: &dyn Hub, config: &BuilderConfig, form: &BuildForm) -> String {
    match SpaceBuilder::new(hub, config).build(form) {
        Ok(outcome) => outcome.url,
        Err(e) => {
            info!(category = %e.category(), "Build failed: {}", e);
            e.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::mock::{HubCall, MockHub};

    fn form() -> BuildForm {
        BuildForm {
            space_names: "models/gpt2\n\nmodels/distilgpt2\n".to_string(),
            token: "hf_ok".to_string(),
            target_name: "mixer".to_string(),
            title: "Mixed".to_string(),
            description: "Compare".to_string(),
        }
    }

    fn hub() -> MockHub {
        let text = InterfaceDescriptor::new(["textbox"], ["textbox"]);
        MockHub::new()
            .with_token("hf_ok", "alice")
            .with_descriptor("models/gpt2", text.clone())
            .with_descriptor("models/distilgpt2", text)
            .with_descriptor(
                "models/vit",
                InterfaceDescriptor::new(["image"], ["label"]),
            )
    }

    #[test]
    fn test_blank_field_rejected_before_remote_calls() {
        let hub = hub();
        let config = BuilderConfig::immediate();
        for blank in ["", "   ", "\n\t"] {
            let mut f = form();
            f.title = blank.to_string();
            assert_eq!(build_space(&hub, &config, &f), "Please fill all the inputs");
        }
        assert!(hub.calls().is_empty());
    }

    #[test]
    fn test_end_to_end() {
        crate::logging::init_test_logging();
        let hub = hub();
        let url = build_space(&hub, &BuilderConfig::immediate(), &form());
        assert_eq!(url, "https://huggingface.co/spaces/alice/mixer");
        assert!(hub.uploaded("alice/mixer", "app.py").is_some());
    }

    #[test]
    fn test_steps_run_in_cost_order() {
        let hub = hub();
        SpaceBuilder::new(&hub, &BuilderConfig::immediate())
            .build(&form())
            .unwrap();

        let calls = hub.calls();
        let position = |pred: fn(&HubCall) -> bool| calls.iter().position(pred).unwrap();
        let probe = position(|c| matches!(c, HubCall::SpaceExists(_)));
        let fetch = position(|c| matches!(c, HubCall::FetchDescriptor(_)));
        let create = position(|c| matches!(c, HubCall::CreateSpace { .. }));
        let upload = position(|c| matches!(c, HubCall::UploadFile { .. }));
        assert!(probe < fetch && fetch < create && create < upload);
    }

    #[test]
    fn test_mismatch_prevents_creation() {
        let hub = hub();
        let mut f = form();
        f.space_names = "models/gpt2\nmodels/vit".to_string();

        let message = build_space(&hub, &BuilderConfig::immediate(), &f);
        assert_eq!(message, "Provided space input types are different");
        assert!(!hub
            .calls()
            .iter()
            .any(|c| matches!(c, HubCall::CreateSpace { .. })));
    }

    #[test]
    fn test_taken_name_prevents_loading() {
        let hub = hub().with_space("alice/mixer");
        let err = SpaceBuilder::new(&hub, &BuilderConfig::immediate())
            .build(&form())
            .unwrap_err();
        assert!(matches!(err, BuildError::NameTaken { .. }));
        assert!(!hub
            .calls()
            .iter()
            .any(|c| matches!(c, HubCall::FetchDescriptor(_))));
    }

    #[test]
    fn test_target_name_trimmed() {
        let hub = hub();
        let mut f = form();
        f.target_name = "  mixer \n".to_string();
        let outcome = SpaceBuilder::new(&hub, &BuilderConfig::immediate())
            .build(&f)
            .unwrap();
        assert_eq!(outcome.repo_id, "alice/mixer");
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let hub = hub();
        let plan = SpaceBuilder::new(&hub, &BuilderConfig::immediate())
            .dry_run(&form())
            .unwrap();

        assert_eq!(plan.validation.url, "https://huggingface.co/spaces/alice/mixer");
        assert_eq!(plan.validation.identifiers, vec!["models/gpt2", "models/distilgpt2"]);
        assert_eq!(plan.path_in_repo, "app.py");
        assert!(plan.artifact.starts_with("import gradio as gr"));
        assert!(!hub.has_space("alice/mixer"));
    }

    #[test]
    fn test_check_requires_three_fields() {
        let hub = hub();
        let config = BuilderConfig::immediate();
        let builder = SpaceBuilder::new(&hub, &config);
        assert!(matches!(
            builder.check("models/gpt2", " ", "mixer"),
            Err(BuildError::MissingInput)
        ));

        let validation = builder.check("models/gpt2", "hf_ok", "mixer").unwrap();
        assert_eq!(validation.signature, InterfaceDescriptor::new(["textbox"], ["textbox"]));
    }
}
