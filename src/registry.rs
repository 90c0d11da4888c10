//! Process-wide hook registry
//!
//! Idempotency state for the installer: which method slots, map instances
//! and DOM containers already carry a wrapper, plus the lazily resolved
//! receiver-to-tile relation used by the volume wrapper. Flags are never
//! removed while the session lives.

use std::collections::{HashMap, HashSet};

use crate::dom::NodeId;
use crate::graph::{ClassId, ObjectId};

/// A target that can carry at most one wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HookTarget {
    /// A method slot on a class prototype
    Method { class: ClassId, method: String },
    /// A lookup map instance reached through a layout-refresh receiver
    MapInstance(ObjectId),
    /// A DOM container that received the injected controls
    DomContainer(NodeId),
}

/// Extraction root recorded when a layout map is hooked
#[derive(Debug, Clone)]
pub struct LayoutHook {
    /// Receiver of the layout-refresh call that owns the map
    pub root: ObjectId,
    /// Method name invoked on fetched entries
    pub entry_method: String,
}

#[derive(Debug, Default)]
pub struct HookRegistry {
    installed: HashSet<HookTarget>,
    layout_hooks: HashMap<ObjectId, LayoutHook>,
    tiles: HashMap<ObjectId, NodeId>,
    hooked_labels: Vec<String>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self, target: &HookTarget) -> bool {
        self.installed.contains(target)
    }

    /// Set the installation flag; returns false if it was already set
    pub fn mark_installed(&mut self, target: HookTarget) -> bool {
        self.installed.insert(target)
    }

    pub fn record_layout_hook(&mut self, map: ObjectId, hook: LayoutHook) {
        self.layout_hooks.insert(map, hook);
    }

    pub fn layout_hook(&self, map: ObjectId) -> Option<&LayoutHook> {
        self.layout_hooks.get(&map)
    }

    /// Cached tile element for a volume receiver, if resolved before
    pub fn tile_for(&self, receiver: ObjectId) -> Option<NodeId> {
        self.tiles.get(&receiver).copied()
    }

    pub fn cache_tile(&mut self, receiver: ObjectId, tile: NodeId) {
        self.tiles.insert(receiver, tile);
    }

    /// Human-readable `Class.method` labels, in installation order
    pub fn note_hooked(&mut self, label: String) {
        self.hooked_labels.push(label);
    }

    pub fn hooked_labels(&self) -> &[String] {
        &self.hooked_labels
    }
}
