//! Installer scan pass
//!
//! Every scan tick re-walks the host class registry and the DOM. A miss is
//! not an error: the host may still be initializing, or this deployment's
//! shapes are unknown, and the next tick retries indefinitely.

use tracing::{info, warn};

use crate::dom::{ControlAction, Dom};
use crate::graph::HostGraph;
use crate::intercept;
use crate::pattern;
use crate::registry::{HookRegistry, HookTarget};
use crate::session::SessionConfig;
use crate::tracker::TalkTimeTracker;

/// Parent levels between the landmark element and the host's control row
const LANDMARK_PARENT_HOPS: usize = 3;

/// Walk every class prototype and wrap each not-yet-flagged method whose
/// serialized source matches a known shape. Ambiguous candidates are
/// skipped and left unflagged, so a later deployment can still match.
pub fn scan_classes(graph: &mut HostGraph, registry: &mut HookRegistry) {
    let mut pending = Vec::new();
    for (class_id, class) in graph.classes() {
        for slot in &class.methods {
            let target = HookTarget::Method {
                class: class_id,
                method: slot.name.clone(),
            };
            if registry.is_installed(&target) {
                continue;
            }
            match pattern::match_method_source(&slot.source) {
                Ok(Some(descriptor)) => {
                    pending.push((class_id, class.name.clone(), slot.name.clone(), descriptor));
                }
                Ok(None) => {}
                Err(e) => warn!(
                    class = %class.name,
                    method = %slot.name,
                    "skipping ambiguous hook candidate: {e}"
                ),
            }
        }
    }
    for (class_id, class_name, method, descriptor) in pending {
        if let Some(slot) = graph.method_slot_mut(class_id, &method) {
            info!(class = %class_name, method = %method, ?descriptor, "hooked host method");
            intercept::wrap_slot(slot, descriptor);
            registry.note_hooked(format!("{class_name}.{method}"));
            registry.mark_installed(HookTarget::Method {
                class: class_id,
                method,
            });
        }
    }
}

/// Watch for the call-ready landmark; on first sighting, signal the join
/// and inject the toggle/reset controls exactly once.
pub fn scan_dom(
    dom: &mut Dom,
    registry: &mut HookRegistry,
    tracker: &mut TalkTimeTracker,
    config: &SessionConfig,
) {
    let Some(landmark) = dom.find_by_attr(&config.landmark_attr) else {
        return;
    };
    let Some(buttons) = dom.ancestor(landmark, LANDMARK_PARENT_HOPS) else {
        return;
    };
    if !registry.mark_installed(HookTarget::DomContainer(buttons)) {
        return;
    }

    tracker.join_meeting();

    // reproduce the divider the host renders between its own controls
    if let Some(divider) = dom.node(buttons).children.get(1).copied() {
        let copy = dom.clone_node_shallow(divider);
        dom.prepend_child(buttons, copy);
    }

    let toggle = dom.create_element("div");
    dom.node_mut(toggle)
        .classes
        .push("__charla-button".to_string());
    dom.set_text(toggle, "talktime");
    dom.node_mut(toggle).action = Some(ControlAction::ToggleChart);
    dom.prepend_child(buttons, toggle);

    let reset = dom.create_element("button");
    dom.node_mut(reset)
        .classes
        .push("__charla-reset".to_string());
    dom.set_text(reset, "Reset");
    dom.node_mut(reset).action = Some(ControlAction::ResetTally);
    dom.prepend_child(buttons, reset);

    info!("call UI detected, injected talk-time controls");
}
