/*!
 * Interface descriptors and endpoint identifiers
 *
 * A descriptor is the ordered list of input and output component kinds an
 * endpoint exposes. Two endpoints can be mixed into one Gradio app only if
 * their descriptors are equal position by position.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::hub::error::{HubError, HubResult};

/// Normalised Gradio component type (`textbox`, `image`, `label`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKind(String);

impl ComponentKind {
    pub fn new(name: &str) -> Self {
        ComponentKind(name.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input and output component kinds of one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub inputs: Vec<ComponentKind>,
    pub outputs: Vec<ComponentKind>,
}

impl InterfaceDescriptor {
    pub fn new<I, O>(inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        O: IntoIterator,
        O::Item: AsRef<str>,
    {
        Self {
            inputs: inputs.into_iter().map(|k| ComponentKind::new(k.as_ref())).collect(),
            outputs: outputs.into_iter().map(|k| ComponentKind::new(k.as_ref())).collect(),
        }
    }

    /// Descriptor gradio derives for a hosted model with this pipeline tag
    pub fn for_pipeline(tag: &str) -> Option<Self> {
        let (inputs, outputs): (&[&str], &[&str]) = match tag {
            "audio-classification" => (&["audio"], &["label"]),
            "audio-to-audio" => (&["audio"], &["audio"]),
            "automatic-speech-recognition" => (&["audio"], &["textbox"]),
            "feature-extraction" => (&["textbox"], &["dataframe"]),
            "fill-mask" => (&["textbox"], &["label"]),
            "image-classification" => (&["image"], &["label"]),
            "image-to-text" => (&["image"], &["textbox"]),
            "question-answering" => (&["textbox", "textbox"], &["textbox", "label"]),
            "sentence-similarity" => (&["textbox", "textbox"], &["label"]),
            "summarization" => (&["textbox"], &["textbox"]),
            "text-classification" => (&["textbox"], &["label"]),
            "text-generation" => (&["textbox"], &["textbox"]),
            "text2text-generation" => (&["textbox"], &["textbox"]),
            "text-to-image" => (&["textbox"], &["image"]),
            "text-to-speech" => (&["textbox"], &["audio"]),
            "token-classification" => (&["textbox"], &["highlightedtext"]),
            "translation" => (&["textbox"], &["textbox"]),
            "zero-shot-classification" => (&["textbox", "textbox", "checkbox"], &["label"]),
            _ => return None,
        };
        Some(Self::new(inputs, outputs))
    }

    /// Parse the `/config` document served by a running Gradio app
    ///
    /// Gradio 2 lists `input_components` and `output_components` directly.
    /// Later versions list every `component` by id and wire them up through
    /// `dependencies`; the first dependency backed by a Python function
    /// defines the signature.
    pub fn from_gradio_config(url: &str, config: &serde_json::Value) -> HubResult<Self> {
        let decode = |message: String| HubError::Decode {
            url: url.to_string(),
            message,
        };
        let parsed: GradioConfig =
            serde_json::from_value(config.clone()).map_err(|e| decode(e.to_string()))?;

        if let (Some(inputs), Some(outputs)) = (parsed.input_components, parsed.output_components)
        {
            return Ok(Self::new(
                inputs.iter().map(|c| c.name.as_str()),
                outputs.iter().map(|c| c.name.as_str()),
            ));
        }

        let kinds: HashMap<u64, &str> = parsed
            .components
            .iter()
            .map(|c| (c.id, c.kind.as_str()))
            .collect();

        let dependency = parsed
            .dependencies
            .iter()
            .find(|d| d.backend_fn)
            .or_else(|| parsed.dependencies.first())
            .ok_or_else(|| decode("config declares no dependencies".to_string()))?;

        let lookup = |ids: &[u64]| -> HubResult<Vec<ComponentKind>> {
            ids.iter()
                .map(|id| {
                    kinds
                        .get(id)
                        .map(|kind| ComponentKind::new(kind))
                        .ok_or_else(|| decode(format!("dependency references unknown component {}", id)))
                })
                .collect()
        };

        Ok(Self {
            inputs: lookup(&dependency.inputs)?,
            outputs: lookup(&dependency.outputs)?,
        })
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |kinds: &[ComponentKind]| {
            kinds
                .iter()
                .map(ComponentKind::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({}) -> ({})", join(&self.inputs), join(&self.outputs))
    }
}

#[derive(Debug, Deserialize)]
struct GradioConfig {
    #[serde(default)]
    input_components: Option<Vec<LegacyComponent>>,
    #[serde(default)]
    output_components: Option<Vec<LegacyComponent>>,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct LegacyComponent {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Component {
    id: u64,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    #[serde(default)]
    inputs: Vec<u64>,
    #[serde(default)]
    outputs: Vec<u64>,
    #[serde(default)]
    backend_fn: bool,
}

/// What an identifier from the input list points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `spaces/<owner>/<name>`
    Space(String),
    /// `models/<repo>`, `huggingface/<repo>` or a bare `<repo>`
    Model(String),
}

impl Endpoint {
    /// Classify an identifier, accepting full Hub URLs as well
    pub fn parse(identifier: &str) -> HubResult<Self> {
        let unsupported = |reason: &str| HubError::UnsupportedIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = identifier.trim();
        let path = if trimmed.contains("://") {
            let url = url::Url::parse(trimmed).map_err(|e| unsupported(&e.to_string()))?;
            url.path().trim_matches('/').to_string()
        } else {
            trimmed.trim_matches('/').to_string()
        };

        let parts: Vec<&str> = path.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(unsupported("empty path segment"));
        }

        match parts.as_slice() {
            ["spaces", owner, name] => Ok(Endpoint::Space(format!("{}/{}", owner, name))),
            ["spaces", ..] => Err(unsupported("expected spaces/<owner>/<name>")),
            ["models" | "huggingface", rest @ ..] if (1..=2).contains(&rest.len()) => {
                Ok(Endpoint::Model(rest.join("/")))
            }
            ["models" | "huggingface", ..] => Err(unsupported("expected models/<owner>/<name>")),
            [_] | [_, _] => Ok(Endpoint::Model(parts.join("/"))),
            _ => Err(unsupported("too many path segments")),
        }
    }

    pub fn repo_id(&self) -> &str {
        match self {
            Endpoint::Space(id) | Endpoint::Model(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_kind_normalised() {
        assert_eq!(ComponentKind::new(" Textbox "), ComponentKind::new("textbox"));
        assert_eq!(ComponentKind::new("Image").to_string(), "image");
    }

    #[test]
    fn test_endpoint_parse() {
        assert_eq!(
            Endpoint::parse("spaces/valhalla/glide-text2im").unwrap(),
            Endpoint::Space("valhalla/glide-text2im".to_string())
        );
        assert_eq!(
            Endpoint::parse("models/gpt2").unwrap(),
            Endpoint::Model("gpt2".to_string())
        );
        assert_eq!(
            Endpoint::parse("huggingface/facebook/bart-large-cnn").unwrap(),
            Endpoint::Model("facebook/bart-large-cnn".to_string())
        );
        assert_eq!(
            Endpoint::parse("distilgpt2").unwrap(),
            Endpoint::Model("distilgpt2".to_string())
        );
        assert_eq!(
            Endpoint::parse("https://huggingface.co/spaces/nielsr/LayoutLMv2-FUNSD").unwrap(),
            Endpoint::Space("nielsr/LayoutLMv2-FUNSD".to_string())
        );
    }

    #[test]
    fn test_endpoint_parse_rejects() {
        assert!(Endpoint::parse("spaces/only-owner").is_err());
        assert!(Endpoint::parse("models/a/b/c").is_err());
        assert!(Endpoint::parse("a/b/c").is_err());
        assert!(Endpoint::parse("a//b").is_err());
        assert!(Endpoint::parse("").is_err());
    }

    #[test]
    fn test_pipeline_table() {
        let d = InterfaceDescriptor::for_pipeline("text-generation").unwrap();
        assert_eq!(d, InterfaceDescriptor::new(["textbox"], ["textbox"]));

        let qa = InterfaceDescriptor::for_pipeline("question-answering").unwrap();
        assert_eq!(qa.inputs.len(), 2);
        assert_eq!(qa.outputs[1].as_str(), "label");

        assert!(InterfaceDescriptor::for_pipeline("reinforcement-learning").is_none());
    }

    #[test]
    fn test_legacy_gradio_config() {
        let config = json!({
            "mode": "interface",
            "input_components": [{"name": "image", "label": "Document"}],
            "output_components": [{"name": "image"}, {"name": "Label"}]
        });
        let d = InterfaceDescriptor::from_gradio_config("http://space/config", &config).unwrap();
        assert_eq!(d, InterfaceDescriptor::new(["image"], ["image", "label"]));
    }

    #[test]
    fn test_blocks_gradio_config() {
        let config = json!({
            "components": [
                {"id": 1, "type": "textbox"},
                {"id": 2, "type": "button"},
                {"id": 3, "type": "image"}
            ],
            "dependencies": [
                {"targets": [2], "inputs": [], "outputs": [], "backend_fn": false},
                {"targets": [2], "inputs": [1], "outputs": [3], "backend_fn": true}
            ]
        });
        let d = InterfaceDescriptor::from_gradio_config("http://space/config", &config).unwrap();
        assert_eq!(d, InterfaceDescriptor::new(["textbox"], ["image"]));
        assert_eq!(d.to_string(), "(textbox) -> (image)");
    }

    #[test]
    fn test_gradio_config_unknown_component() {
        let config = json!({
            "components": [{"id": 1, "type": "textbox"}],
            "dependencies": [{"inputs": [1], "outputs": [9], "backend_fn": true}]
        });
        let err = InterfaceDescriptor::from_gradio_config("http://space/config", &config)
            .unwrap_err();
        assert!(matches!(err, HubError::Decode { .. }));
    }

    #[test]
    fn test_gradio_config_without_dependencies() {
        let config = json!({"components": []});
        assert!(InterfaceDescriptor::from_gradio_config("http://space/config", &config).is_err());
    }
}
