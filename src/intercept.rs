//! Interception wrappers
//!
//! A wrapper is a perfect pass-through: same receiver, same arguments,
//! same return value as the wrapped original. The observation runs before
//! delegation, and no failure inside it may leak into the host call chain.
//! Idempotency is per wrapped instance (method slot, map object), not per
//! class.

use tracing::{error, info, trace};

use crate::dom::{Dom, NodeId};
use crate::extract;
use crate::graph::{HostGraph, HostValue, MethodSlot, ObjectId};
use crate::pattern::HookDescriptor;
use crate::registry::{HookRegistry, HookTarget, LayoutHook};
use crate::session::SessionConfig;
use crate::tracker::TalkTimeTracker;

/// Install a wrapper into a method slot. The slot keeps its original body;
/// dispatch consults the descriptor before delegating, so the original
/// call semantics are untouched.
pub fn wrap_slot(slot: &mut MethodSlot, descriptor: HookDescriptor) {
    slot.hook = Some(descriptor);
}

/// Volume observation, run before delegating to the wrapped original.
///
/// Disposed receivers are never read. The speaker tile is resolved once
/// per receiver by scanning its fields for an element and walking up a
/// fixed number of parent levels, then cached in the registry.
pub fn observe_volume(
    graph: &HostGraph,
    dom: &Dom,
    registry: &mut HookRegistry,
    tracker: &mut TalkTimeTracker,
    receiver: ObjectId,
    reader_field: &str,
    tile_parent_hops: usize,
) {
    if graph.is_disposed(receiver) {
        return;
    }
    let Some(tile) = resolve_tile(graph, dom, registry, receiver, tile_parent_hops) else {
        trace!(?receiver, "no tile element resolved for volume receiver");
        return;
    };
    let name = dom.inner_text(tile);
    let volume = match graph.object(receiver).field(reader_field) {
        Some(HostValue::Object(reader)) => graph.volume_of(*reader).unwrap_or(0.0),
        _ => {
            trace!(reader_field, "volume reader field missing on receiver");
            return;
        }
    };
    tracker.handle_volume(name.trim(), volume);
}

fn resolve_tile(
    graph: &HostGraph,
    dom: &Dom,
    registry: &mut HookRegistry,
    receiver: ObjectId,
    hops: usize,
) -> Option<NodeId> {
    if let Some(tile) = registry.tile_for(receiver) {
        return Some(tile);
    }
    for (_, value) in &graph.object(receiver).fields {
        if let HostValue::Element(node) = value {
            if let Some(tile) = dom.ancestor(*node, hops) {
                registry.cache_tile(receiver, tile);
                return Some(tile);
            }
        }
    }
    None
}

/// First half of the layout wrapper: hook the nested lookup map once per
/// map instance and remember the receiver as extraction root.
pub fn hook_layout_map(
    graph: &HostGraph,
    registry: &mut HookRegistry,
    receiver: ObjectId,
    map_field: &str,
    entry_method: &str,
) {
    let Some(HostValue::Object(map)) = graph.object(receiver).field(map_field) else {
        // host not initialized yet; the next invocation retries
        return;
    };
    let map = *map;
    if !graph.object(map).is_map() {
        return;
    }
    if registry.mark_installed(HookTarget::MapInstance(map)) {
        registry.record_layout_hook(
            map,
            LayoutHook {
                root: receiver,
                entry_method: entry_method.to_string(),
            },
        );
        info!(?map, "hooked layout lookup map");
    }
}

/// Second half: on every indexed access into a hooked map, attempt roster
/// extraction first; the underlying lookup completes whatever happens.
pub fn observe_map_access(
    graph: &HostGraph,
    registry: &HookRegistry,
    tracker: &mut TalkTimeTracker,
    config: &SessionConfig,
    map: ObjectId,
) {
    let Some(hook) = registry.layout_hook(map) else {
        return;
    };
    match extract::participant_names(
        graph,
        hook.root,
        &config.space_id_prefix,
        &config.display_name_field,
    ) {
        Ok(Some(names)) => tracker.participants_updated(&names),
        Ok(None) => {}
        Err(e) => error!("participant extraction failed: {e}"),
    }
}
