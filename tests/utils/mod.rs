//! Shared host-session fixtures for integration tests
//!
//! Builds the minimal object graphs and DOM trees the instrumentation
//! expects from a live call: a volume-metered speaker tile, a layout
//! receiver with a roster, and the call-ready control row.

use std::rc::Rc;

use charla::chart::ChartSink;
use charla::dom::NodeId;
use charla::graph::{ClassId, HostFn, HostGraph, HostValue, ObjectId};
use charla::session::Session;

pub const VOLUME_SOURCE: &str =
    "function(){if(this.zb.isDisposed())return;return this.kq.getVolume()}";
pub const LAYOUT_SOURCE: &str = "function(a){return this.Wc.get(a).am(this.vb)}";

#[allow(dead_code)]
pub fn null_body() -> HostFn {
    Rc::new(|_: &mut HostGraph, _: ObjectId, _: &[HostValue]| HostValue::Null)
}

/// Body that bumps a `calls` field on the receiver and returns `result`,
/// so tests can verify pass-through delegation and call counts.
#[allow(dead_code)]
pub fn counting_body(result: f64) -> HostFn {
    Rc::new(
        move |graph: &mut HostGraph, receiver: ObjectId, _args: &[HostValue]| {
            let calls = match graph.object(receiver).field("calls") {
                Some(HostValue::Number(n)) => *n,
                _ => 0.0,
            };
            graph
                .object_mut(receiver)
                .set_field("calls", HostValue::Number(calls + 1.0));
            HostValue::Number(result)
        },
    )
}

#[allow(dead_code)]
pub fn calls_made<S: ChartSink>(session: &Session<S>, receiver: ObjectId) -> f64 {
    match session.graph().object(receiver).field("calls") {
        Some(HostValue::Number(n)) => *n,
        _ => 0.0,
    }
}

/// Class whose method body matches the volume shape (reader field `kq`)
#[allow(dead_code)]
pub fn volume_class<S: ChartSink>(session: &mut Session<S>) -> ClassId {
    let class = session.graph_mut().add_class("VvK");
    session
        .graph_mut()
        .add_method(class, "aw", VOLUME_SOURCE, counting_body(0.0));
    class
}

/// Speaker tile: receiver holding an element three parent levels below
/// its tile, plus a reader object with the given level.
#[allow(dead_code)]
pub fn add_speaker<S: ChartSink>(
    session: &mut Session<S>,
    name: &str,
    level: f64,
) -> (ObjectId, ObjectId, NodeId) {
    let dom = session.dom_mut();
    let tile = dom.create_element("div");
    let badge = dom.create_element("span");
    dom.set_text(badge, name);
    dom.append_child(tile, badge);
    let wrap = dom.create_element("div");
    dom.append_child(tile, wrap);
    let row = dom.create_element("div");
    dom.append_child(wrap, row);
    let video = dom.create_element("video");
    dom.append_child(row, video);

    let graph = session.graph_mut();
    let reader = graph.create_object(None);
    graph.object_mut(reader).volume = Some(level);
    let receiver = graph.create_object(None);
    graph
        .object_mut(receiver)
        .set_field("el", HostValue::Element(video));
    graph
        .object_mut(receiver)
        .set_field("kq", HostValue::Object(reader));
    (receiver, reader, tile)
}

/// Control row with the call-ready landmark three parent levels down
#[allow(dead_code)]
pub fn install_call_ui<S: ChartSink>(session: &mut Session<S>) -> NodeId {
    let dom = session.dom_mut();
    let toolbar = dom.create_element("div");
    let wrap = dom.create_element("div");
    dom.append_child(toolbar, wrap);
    let divider = dom.create_element("div");
    dom.append_child(toolbar, divider);
    let inner = dom.create_element("div");
    dom.append_child(wrap, inner);
    let preview = dom.create_element("video");
    dom.set_attr(preview, "data-fps-request-screencast-cap", "");
    dom.append_child(inner, preview);
    toolbar
}

#[allow(dead_code)]
pub struct LayoutFixture {
    pub class: ClassId,
    pub receiver: ObjectId,
    pub map: ObjectId,
}

/// Layout receiver: lookup map in field `Wc`, roster container one object
/// level down with space-id keys and named records.
#[allow(dead_code)]
pub fn install_layout<S: ChartSink>(session: &mut Session<S>, names: &[&str]) -> LayoutFixture {
    let graph = session.graph_mut();
    let class = graph.add_class("QxB");
    graph.add_method(class, "refresh", LAYOUT_SOURCE, null_body());

    let receiver = graph.create_object(None);
    let map = graph.create_map();
    graph.map_set(map, "k0", HostValue::Null);
    graph
        .object_mut(receiver)
        .set_field("Wc", HostValue::Object(map));

    let container = graph.create_object(None);
    let keys: Vec<String> = (0..names.len()).map(|i| format!("spaces/{i}")).collect();
    graph
        .object_mut(container)
        .set_field("order", HostValue::StrList(keys.clone()));
    let roster = graph.create_map();
    for (key, name) in keys.iter().zip(names) {
        let record = graph.create_object(None);
        graph
            .object_mut(record)
            .set_field("name", HostValue::Str(name.to_string()));
        graph.map_set(roster, key, HostValue::Object(record));
    }
    graph
        .object_mut(container)
        .set_field("byId", HostValue::Object(roster));
    graph
        .object_mut(receiver)
        .set_field("state", HostValue::Object(container));

    LayoutFixture {
        class,
        receiver,
        map,
    }
}
