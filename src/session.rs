//! Session context
//!
//! One object owns the whole pipeline: host graph, DOM, hook registry,
//! tracker, scheduler, and the chart sink. All host traffic enters through
//! the dispatch methods, all time through `advance_to`, so there is a
//! single mutation path and no shared state outside this struct.

use std::collections::BTreeMap;

use crate::chart::ChartSink;
use crate::dom::{ControlAction, Dom, NodeId};
use crate::graph::{ClassId, HostGraph, HostValue, ObjectId};
use crate::installer;
use crate::intercept;
use crate::pattern::HookDescriptor;
use crate::registry::HookRegistry;
use crate::scheduler::{Scheduler, Tick};
use crate::tracker::TalkTimeTracker;

/// Cadences and host-shape constants
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub scan_interval_ms: u64,
    pub poll_interval_ms: u64,
    /// Attribute marking the own-video preview once the call UI is up
    pub landmark_attr: String,
    /// Identifier prefix shared by roster keys
    pub space_id_prefix: String,
    /// Attribute of a participant record holding the rendered name
    pub display_name_field: String,
    /// Parent levels between a receiver's element field and its tile
    pub tile_parent_hops: usize,
    /// Label the host renders for the local participant, seeded at zero
    pub self_label: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: 250,
            poll_interval_ms: 500,
            landmark_attr: "data-fps-request-screencast-cap".to_string(),
            space_id_prefix: "spaces/".to_string(),
            display_name_field: "name".to_string(),
            tile_parent_hops: 3,
            self_label: Some("You".to_string()),
        }
    }
}

pub struct Session<S: ChartSink> {
    config: SessionConfig,
    graph: HostGraph,
    dom: Dom,
    registry: HookRegistry,
    tracker: TalkTimeTracker,
    scheduler: Scheduler,
    sink: S,
    enabled: bool,
    scan_ticks: u64,
    poll_ticks: u64,
}

impl<S: ChartSink> Session<S> {
    pub fn new(config: SessionConfig, sink: S) -> Self {
        let scheduler = Scheduler::new(config.scan_interval_ms, config.poll_interval_ms);
        let tracker = TalkTimeTracker::new(config.poll_interval_ms, config.self_label.as_deref());
        Self {
            config,
            graph: HostGraph::new(),
            dom: Dom::new(),
            registry: HookRegistry::new(),
            tracker,
            scheduler,
            sink,
            enabled: false,
            scan_ticks: 0,
            poll_ticks: 0,
        }
    }

    pub fn with_defaults(sink: S) -> Self {
        Self::new(SessionConfig::default(), sink)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn graph(&self) -> &HostGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut HostGraph {
        &mut self.graph
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &TalkTimeTracker {
        &self.tracker
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn scan_ticks(&self) -> u64 {
        self.scan_ticks
    }

    pub fn poll_ticks(&self) -> u64 {
        self.poll_ticks
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn snapshot(&self) -> &BTreeMap<String, u64> {
        self.tracker.talk_times()
    }

    /// Advance the session clock, firing due scan/poll ticks in order
    pub fn advance_to(&mut self, now_ms: u64) {
        for tick in self.scheduler.advance_to(now_ms) {
            match tick {
                Tick::Scan => self.on_scan_tick(),
                Tick::Poll => self.on_poll_tick(),
            }
        }
    }

    /// Installer pass: hook newly loaded prototypes, watch for the call UI
    pub fn on_scan_tick(&mut self) {
        self.scan_ticks += 1;
        installer::scan_classes(&mut self.graph, &mut self.registry);
        installer::scan_dom(
            &mut self.dom,
            &mut self.registry,
            &mut self.tracker,
            &self.config,
        );
    }

    /// Aggregation pass: fold buffered volume events and publish
    pub fn on_poll_tick(&mut self) {
        self.poll_ticks += 1;
        let snapshot = self.tracker.poll_tick();
        self.sink.update(&snapshot);
    }

    /// Host method invocation entry point. Wrapped slots observe first and
    /// then delegate; unwrapped slots delegate directly. An unknown method
    /// resolves to null, as the host would for a missing property.
    pub fn dispatch_call(
        &mut self,
        class: ClassId,
        method: &str,
        receiver: ObjectId,
        args: &[HostValue],
    ) -> HostValue {
        let Some(slot) = self.graph.method_slot(class, method) else {
            return HostValue::Null;
        };
        let body = slot.body.clone();
        let hook = slot.hook.clone();
        if let Some(descriptor) = hook {
            match descriptor {
                HookDescriptor::VolumeRead { reader_field } => intercept::observe_volume(
                    &self.graph,
                    &self.dom,
                    &mut self.registry,
                    &mut self.tracker,
                    receiver,
                    &reader_field,
                    self.config.tile_parent_hops,
                ),
                HookDescriptor::LayoutRefresh {
                    map_field,
                    entry_method,
                } => intercept::hook_layout_map(
                    &self.graph,
                    &mut self.registry,
                    receiver,
                    &map_field,
                    &entry_method,
                ),
            }
        }
        body(&mut self.graph, receiver, args)
    }

    /// Host indexed map access entry point. Hooked maps extract the roster
    /// first; the lookup itself always completes.
    pub fn dispatch_map_get(&mut self, map: ObjectId, key: &str) -> HostValue {
        intercept::observe_map_access(
            &self.graph,
            &self.registry,
            &mut self.tracker,
            &self.config,
            map,
        );
        self.graph.map_entry(map, key).cloned().unwrap_or(HostValue::Null)
    }

    /// Click on an injected control; clicks elsewhere are ignored
    pub fn click(&mut self, node: NodeId) {
        match self.dom.node(node).action {
            Some(ControlAction::ToggleChart) => {
                self.enabled = !self.enabled;
                self.sink.set_visibility(self.enabled);
            }
            Some(ControlAction::ResetTally) => self.tracker.reset(),
            None => {}
        }
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}
