//! Opaque host object graph
//!
//! Models the conference client's runtime as an arena of objects plus a
//! process-wide class registry. Nothing here knows about talk time; the
//! graph only provides the capabilities the host is relied upon for:
//! serialized method source, invocation with a receiver, a disposed check,
//! and a numeric volume accessor.

use std::rc::Rc;

use crate::dom::NodeId;
use crate::pattern::HookDescriptor;

/// Identifier of a host object in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Identifier of a host class in the class registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub usize);

/// A value held in a host object field
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Null,
    Number(f64),
    Str(String),
    StrList(Vec<String>),
    Element(NodeId),
    Object(ObjectId),
}

/// Native behavior of a host method; opaque to the instrumentation layer
pub type HostFn = Rc<dyn Fn(&mut HostGraph, ObjectId, &[HostValue]) -> HostValue>;

/// A method slot on a class prototype
pub struct MethodSlot {
    pub name: String,
    /// Serialized body text, the only stable-ish contract the host offers
    pub source: String,
    pub body: HostFn,
    /// Wrapper installed in place of the original, if any
    pub hook: Option<HookDescriptor>,
}

/// A host class with its prototype methods
pub struct HostClass {
    pub name: String,
    pub methods: Vec<MethodSlot>,
}

/// A host object instance
#[derive(Default)]
pub struct HostObject {
    pub class: Option<ClassId>,
    /// Own enumerable fields, in insertion order
    pub fields: Vec<(String, HostValue)>,
    /// Key/value entries when the object is map-like
    pub entries: Option<Vec<(String, HostValue)>>,
    pub disposed: bool,
    /// Current level when the object is a volume reader
    pub volume: Option<f64>,
}

impl HostObject {
    pub fn field(&self, name: &str) -> Option<&HostValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn set_field(&mut self, name: &str, value: HostValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }

    pub fn is_map(&self) -> bool {
        self.entries.is_some()
    }
}

/// Arena of host objects plus the class registry the installer walks
#[derive(Default)]
pub struct HostGraph {
    objects: Vec<HostObject>,
    classes: Vec<HostClass>,
}

impl HostGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, name: &str) -> ClassId {
        self.classes.push(HostClass {
            name: name.to_string(),
            methods: Vec::new(),
        });
        ClassId(self.classes.len() - 1)
    }

    pub fn add_method(&mut self, class: ClassId, name: &str, source: &str, body: HostFn) {
        self.classes[class.0].methods.push(MethodSlot {
            name: name.to_string(),
            source: source.to_string(),
            body,
            hook: None,
        });
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &HostClass)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId(i), c))
    }

    pub fn class(&self, id: ClassId) -> &HostClass {
        &self.classes[id.0]
    }

    pub fn method_slot(&self, class: ClassId, method: &str) -> Option<&MethodSlot> {
        self.classes[class.0].methods.iter().find(|m| m.name == method)
    }

    pub fn method_slot_mut(&mut self, class: ClassId, method: &str) -> Option<&mut MethodSlot> {
        self.classes[class.0]
            .methods
            .iter_mut()
            .find(|m| m.name == method)
    }

    pub fn create_object(&mut self, class: Option<ClassId>) -> ObjectId {
        self.objects.push(HostObject {
            class,
            ..HostObject::default()
        });
        ObjectId(self.objects.len() - 1)
    }

    /// Create a map-like object (empty key/value entry list)
    pub fn create_map(&mut self) -> ObjectId {
        let id = self.create_object(None);
        self.objects[id.0].entries = Some(Vec::new());
        id
    }

    pub fn object(&self, id: ObjectId) -> &HostObject {
        &self.objects[id.0]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut HostObject {
        &mut self.objects[id.0]
    }

    /// The host's disposed check
    pub fn is_disposed(&self, id: ObjectId) -> bool {
        self.objects[id.0].disposed
    }

    /// The host's numeric volume accessor
    pub fn volume_of(&self, id: ObjectId) -> Option<f64> {
        self.objects[id.0].volume
    }

    pub fn map_set(&mut self, map: ObjectId, key: &str, value: HostValue) {
        let entries = self.objects[map.0].entries.get_or_insert_with(Vec::new);
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            entries.push((key.to_string(), value));
        }
    }

    pub fn map_entry(&self, map: ObjectId, key: &str) -> Option<&HostValue> {
        self.objects[map.0]
            .entries
            .as_ref()
            .and_then(|entries| entries.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v)
    }
}
