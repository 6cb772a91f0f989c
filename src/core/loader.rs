/*!
 * Interface loading and validation
 */

use tracing::{info, warn};

use super::compatibility::check_compatibility;
use crate::descriptor::InterfaceDescriptor;
use crate::error::{BuildError, Result};
use crate::hub::Hub;

/// Fetch the descriptor of every identifier, in order
///
/// Stops at the first identifier that cannot be loaded.
pub fn load_descriptors(hub: &dyn Hub, identifiers: &[String]) -> Result<Vec<InterfaceDescriptor>> {
    identifiers
        .iter()
        .map(|identifier| {
            hub.fetch_descriptor(identifier).map_err(|e| {
                warn!(identifier = %identifier, error = %e, "Interface could not be loaded");
                BuildError::Unloadable
            })
        })
        .collect()
}

/// Load every identifier and check that all interfaces share one signature
///
/// Returns the common signature.
pub fn load_and_check(hub: &dyn Hub, identifiers: &[String]) -> Result<InterfaceDescriptor> {
    let descriptors = load_descriptors(hub, identifiers)?;
    check_compatibility(&descriptors)?;

    info!(count = descriptors.len(), "Loaded and checked input interfaces");
    Ok(descriptors.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::mock::{HubCall, MockHub};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn hub() -> MockHub {
        MockHub::new()
            .with_descriptor(
                "spaces/valhalla/glide-text2im",
                InterfaceDescriptor::new(["textbox"], ["image"]),
            )
            .with_descriptor(
                "spaces/nielsr/LayoutLMv2-FUNSD",
                InterfaceDescriptor::new(["image"], ["image"]),
            )
    }

    #[test]
    fn test_same_space_twice() {
        let signature = load_and_check(
            &hub(),
            &names(&["spaces/valhalla/glide-text2im", "spaces/valhalla/glide-text2im"]),
        )
        .unwrap();
        assert_eq!(signature, InterfaceDescriptor::new(["textbox"], ["image"]));
    }

    #[test]
    fn test_different_inputs() {
        let err = load_and_check(
            &hub(),
            &names(&["spaces/nielsr/LayoutLMv2-FUNSD", "spaces/valhalla/glide-text2im"]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::InputTypesDiffer));
    }

    #[test]
    fn test_unloadable_stops_early() {
        let hub = hub();
        let err = load_and_check(
            &hub,
            &names(&[
                "spaces/valhalla/glide-text2im",
                "spaces/nobody/missing",
                "spaces/nielsr/LayoutLMv2-FUNSD",
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Unloadable));
        assert_eq!(
            hub.calls().last(),
            Some(&HubCall::FetchDescriptor("spaces/nobody/missing".to_string()))
        );
        assert_eq!(hub.calls().len(), 2);
    }
}
