//! Recorded host sessions
//!
//! A replay transcript is the list of everything the instrumentation could
//! have observed live: class definitions as they load, DOM and object
//! mutations, intercepted invocations and map accesses, control clicks.
//! The replayer advances the session clock to each event's timestamp
//! before applying it, so scan and poll ticks interleave exactly as they
//! would have in the page.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::chart::ChartSink;
use crate::dom::NodeId;
use crate::graph::{ClassId, HostFn, HostGraph, HostValue, ObjectId};
use crate::session::{Session, SessionConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecording {
    pub events: Vec<RecordedEvent>,
}

impl SessionRecording {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parsing session recording")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub at_ms: u64,
    pub event: HostEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub source: String,
}

/// Literal value in a transcript, resolved against recorded ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ValueDef {
    Null,
    Number(f64),
    Str(String),
    StrList(Vec<String>),
    Object(String),
    Element(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HostEvent {
    /// A class prototype became reachable from the host registry
    DefineClass {
        name: String,
        methods: Vec<MethodDef>,
    },
    CreateObject {
        id: String,
        #[serde(default)]
        class: Option<String>,
    },
    CreateMap {
        id: String,
    },
    SetField {
        object: String,
        field: String,
        value: ValueDef,
    },
    MapSet {
        map: String,
        key: String,
        value: ValueDef,
    },
    SetVolumeLevel {
        object: String,
        level: f64,
    },
    Dispose {
        object: String,
    },
    CreateElement {
        id: String,
        tag: String,
        #[serde(default)]
        parent: Option<String>,
        #[serde(default)]
        attrs: Vec<(String, String)>,
        #[serde(default)]
        text: Option<String>,
    },
    SetText {
        element: String,
        text: String,
    },
    /// The host invoked a prototype method on a receiver
    Invoke {
        class: String,
        method: String,
        receiver: String,
    },
    /// The host performed an indexed access into a lookup map
    MapGet {
        map: String,
        key: String,
    },
    /// The user clicked an injected control, addressed by class name
    ClickControl {
        class: String,
    },
}

pub struct Replayer<'a, S: ChartSink> {
    session: &'a mut Session<S>,
    classes: HashMap<String, ClassId>,
    objects: HashMap<String, ObjectId>,
    elements: HashMap<String, NodeId>,
}

impl<'a, S: ChartSink> Replayer<'a, S> {
    pub fn new(session: &'a mut Session<S>) -> Self {
        Self {
            session,
            classes: HashMap::new(),
            objects: HashMap::new(),
            elements: HashMap::new(),
        }
    }

    pub fn run(&mut self, recording: &SessionRecording) -> Result<()> {
        for event in &recording.events {
            self.session.advance_to(event.at_ms);
            self.apply(event)?;
        }
        debug!(events = recording.events.len(), "replay complete");
        Ok(())
    }

    fn apply(&mut self, event: &RecordedEvent) -> Result<()> {
        match &event.event {
            HostEvent::DefineClass { name, methods } => {
                let class = self.session.graph_mut().add_class(name);
                for method in methods {
                    // transcripts carry no executable bodies; the original
                    // behavior is opaque and resolves to null
                    let body: HostFn =
                        Rc::new(|_: &mut HostGraph, _: ObjectId, _: &[HostValue]| HostValue::Null);
                    self.session
                        .graph_mut()
                        .add_method(class, &method.name, &method.source, body);
                }
                self.classes.insert(name.clone(), class);
            }
            HostEvent::CreateObject { id, class } => {
                let class = class.as_ref().map(|c| self.class(c)).transpose()?;
                let object = self.session.graph_mut().create_object(class);
                self.objects.insert(id.clone(), object);
            }
            HostEvent::CreateMap { id } => {
                let map = self.session.graph_mut().create_map();
                self.objects.insert(id.clone(), map);
            }
            HostEvent::SetField {
                object,
                field,
                value,
            } => {
                let object = self.object(object)?;
                let value = self.value(value)?;
                self.session
                    .graph_mut()
                    .object_mut(object)
                    .set_field(field, value);
            }
            HostEvent::MapSet { map, key, value } => {
                let map = self.object(map)?;
                let value = self.value(value)?;
                self.session.graph_mut().map_set(map, key, value);
            }
            HostEvent::SetVolumeLevel { object, level } => {
                let object = self.object(object)?;
                self.session.graph_mut().object_mut(object).volume = Some(*level);
            }
            HostEvent::Dispose { object } => {
                let object = self.object(object)?;
                self.session.graph_mut().object_mut(object).disposed = true;
            }
            HostEvent::CreateElement {
                id,
                tag,
                parent,
                attrs,
                text,
            } => {
                let node = self.session.dom_mut().create_element(tag);
                for (name, value) in attrs {
                    self.session.dom_mut().set_attr(node, name, value);
                }
                if let Some(text) = text {
                    self.session.dom_mut().set_text(node, text);
                }
                if let Some(parent) = parent {
                    let parent = self.element(parent)?;
                    self.session.dom_mut().append_child(parent, node);
                }
                self.elements.insert(id.clone(), node);
            }
            HostEvent::SetText { element, text } => {
                let element = self.element(element)?;
                self.session.dom_mut().set_text(element, text);
            }
            HostEvent::Invoke {
                class,
                method,
                receiver,
            } => {
                let class = self.class(class)?;
                let receiver = self.object(receiver)?;
                self.session.dispatch_call(class, method, receiver, &[]);
            }
            HostEvent::MapGet { map, key } => {
                let map = self.object(map)?;
                self.session.dispatch_map_get(map, key);
            }
            HostEvent::ClickControl { class } => match self.session.dom().find_by_class(class) {
                Some(node) => self.session.click(node),
                None => bail!("no control with class {class:?} at {} ms", event.at_ms),
            },
        }
        Ok(())
    }

    fn class(&self, id: &str) -> Result<ClassId> {
        self.classes
            .get(id)
            .copied()
            .with_context(|| format!("unknown class {id:?}"))
    }

    fn object(&self, id: &str) -> Result<ObjectId> {
        self.objects
            .get(id)
            .copied()
            .with_context(|| format!("unknown object {id:?}"))
    }

    fn element(&self, id: &str) -> Result<NodeId> {
        self.elements
            .get(id)
            .copied()
            .with_context(|| format!("unknown element {id:?}"))
    }

    fn value(&self, def: &ValueDef) -> Result<HostValue> {
        Ok(match def {
            ValueDef::Null => HostValue::Null,
            ValueDef::Number(n) => HostValue::Number(*n),
            ValueDef::Str(s) => HostValue::Str(s.clone()),
            ValueDef::StrList(list) => HostValue::StrList(list.clone()),
            ValueDef::Object(id) => HostValue::Object(self.object(id)?),
            ValueDef::Element(id) => HostValue::Element(self.element(id)?),
        })
    }
}

/// Replay a recording through a fresh session
pub fn replay<S: ChartSink>(
    recording: &SessionRecording,
    config: SessionConfig,
    sink: S,
) -> Result<Session<S>> {
    let mut session = Session::new(config, sink);
    Replayer::new(&mut session).run(recording)?;
    Ok(session)
}
