/*!
 * Interface type compatibility
 */

use tracing::debug;

use crate::descriptor::InterfaceDescriptor;
use crate::error::{BuildError, Result};

/// Check that every descriptor has the same input and output kinds as the first
///
/// Descriptors are checked in order, inputs before outputs, and the first
/// mismatch decides the error. An empty slice is compatible.
pub fn check_compatibility(descriptors: &[InterfaceDescriptor]) -> Result<()> {
    let Some(first) = descriptors.first() else {
        return Ok(());
    };

    for (index, descriptor) in descriptors.iter().enumerate() {
        if descriptor.inputs != first.inputs {
            debug!(index, expected = %first, found = %descriptor, "Input kinds differ");
            return Err(BuildError::InputTypesDiffer);
        }
        if descriptor.outputs != first.outputs {
            debug!(index, expected = %first, found = %descriptor, "Output kinds differ");
            return Err(BuildError::OutputTypesDiffer);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_to_text() -> InterfaceDescriptor {
        InterfaceDescriptor::new(["textbox"], ["textbox"])
    }

    #[test]
    fn test_identical_descriptors() {
        assert!(check_compatibility(&[text_to_text(), text_to_text(), text_to_text()]).is_ok());
    }

    #[test]
    fn test_single_and_empty() {
        assert!(check_compatibility(&[text_to_text()]).is_ok());
        assert!(check_compatibility(&[]).is_ok());
    }

    #[test]
    fn test_output_mismatch_with_matching_inputs() {
        let other = InterfaceDescriptor::new(["textbox"], ["label"]);
        assert!(matches!(
            check_compatibility(&[text_to_text(), other]),
            Err(BuildError::OutputTypesDiffer)
        ));
    }

    #[test]
    fn test_input_mismatch_reported_first() {
        let other = InterfaceDescriptor::new(["image"], ["label"]);
        assert!(matches!(
            check_compatibility(&[text_to_text(), other]),
            Err(BuildError::InputTypesDiffer)
        ));
    }

    #[test]
    fn test_length_difference_is_mismatch() {
        let longer = InterfaceDescriptor::new(["textbox", "textbox"], ["textbox"]);
        assert!(matches!(
            check_compatibility(&[text_to_text(), longer]),
            Err(BuildError::InputTypesDiffer)
        ));
    }

    #[test]
    fn test_order_matters() {
        let a = InterfaceDescriptor::new(["image"], ["image", "label"]);
        let b = InterfaceDescriptor::new(["image"], ["label", "image"]);
        assert!(matches!(
            check_compatibility(&[a, b]),
            Err(BuildError::OutputTypesDiffer)
        ));
    }

    #[test]
    fn test_first_mismatch_wins() {
        let outputs_differ = InterfaceDescriptor::new(["textbox"], ["audio"]);
        let inputs_differ = InterfaceDescriptor::new(["audio"], ["textbox"]);
        assert!(matches!(
            check_compatibility(&[text_to_text(), outputs_differ, inputs_differ]),
            Err(BuildError::OutputTypesDiffer)
        ));
    }
}
