//! Minimal DOM model for the host page
//!
//! Just enough structure for what the instrumentation needs from the page:
//! finding the call-ready landmark, resolving a speaker tile's rendered
//! text, and carrying the injected controls.

/// Identifier of a node in the DOM arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Action dispatched when an injected control is clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Flip the chart visibility flag
    ToggleChart,
    /// Clear the talk-time tally
    ResetTally,
}

#[derive(Debug, Default)]
pub struct DomNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub action: Option<ControlAction>,
}

#[derive(Debug, Default)]
pub struct Dom {
    nodes: Vec<DomNode>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(DomNode {
            tag: tag.to_string(),
            ..DomNode::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Shallow copy: tag, attributes, classes and text, no tree links
    pub fn clone_node_shallow(&mut self, node: NodeId) -> NodeId {
        let src = &self.nodes[node.0];
        let copy = DomNode {
            tag: src.tag.clone(),
            attrs: src.attrs.clone(),
            classes: src.classes.clone(),
            text: src.text.clone(),
            ..DomNode::default()
        };
        self.nodes.push(copy);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &DomNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut DomNode {
        &mut self.nodes[id.0]
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, child);
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[node.0].attrs;
        if let Some(slot) = attrs.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value.to_string();
        } else {
            attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].text = Some(text.to_string());
    }

    /// First node (in creation order) carrying the attribute
    pub fn find_by_attr(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.attrs.iter().any(|(k, _)| k == name))
            .map(NodeId)
    }

    /// First node (in creation order) carrying the class
    pub fn find_by_class(&self, class: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.classes.iter().any(|c| c == class))
            .map(NodeId)
    }

    /// Walk up exactly `hops` parent levels; `None` when the chain is shorter
    pub fn ancestor(&self, node: NodeId, hops: usize) -> Option<NodeId> {
        let mut current = node;
        for _ in 0..hops {
            current = self.nodes[current.0].parent?;
        }
        Some(current)
    }

    /// Rendered text of the subtree: own text, then children in order
    pub fn inner_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let n = &self.nodes[node.0];
        if let Some(text) = &n.text {
            if !out.is_empty() && !text.is_empty() {
                out.push(' ');
            }
            out.push_str(text);
        }
        for child in &n.children {
            self.collect_text(*child, out);
        }
    }
}
