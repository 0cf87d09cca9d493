//! Host UI document - the retained node tree UI components project onto
//!
//! Nodes are created detached and placed with [`UiDocument::append_child`].
//! Only structural changes (attach, move, remove) count as mutations; style,
//! text and visibility updates do not.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use engine_core::{Color, ComponentId};
use glam::Vec2;

/// Identity of a node in a [`UiDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Panel,
    Text,
    Button,
    Image,
    /// Outer clipping node of a scroll rect
    ScrollViewport,
    /// Scrolling node inside a viewport; children go here
    ScrollContent,
    Canvas,
    InputField,
}

impl NodeKind {
    /// Whether the presenter draws this node's children
    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::Text | NodeKind::Button | NodeKind::InputField)
    }
}

/// Placement of a node inside its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeLayout {
    /// Stacked by the parent; `None` sizes to content
    Flow {
        width: Option<f32>,
        height: Option<f32>,
    },
    /// Explicit rectangle relative to the parent, shifted by `translate`
    Absolute {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        translate: Vec2,
    },
}

impl Default for NodeLayout {
    fn default() -> Self {
        NodeLayout::Flow {
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeStyle {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub font_size: Option<f32>,
}

/// Input delivered to a node by the presenter
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click,
    ValueChanged(String),
    PointerEnter,
    PointerLeave,
    /// New scroll offset of a viewport
    Scroll(Vec2),
}

#[derive(Debug)]
pub struct UiNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    hidden: bool,
    interactable: bool,
    text: String,
    placeholder: String,
    style: NodeStyle,
    layout: NodeLayout,
    order: i32,
    events: VecDeque<UiEvent>,
}

impl UiNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            hidden: false,
            interactable: true,
            text: String::new(),
            placeholder: String::new(),
            style: NodeStyle::default(),
            layout: NodeLayout::default(),
            order: 0,
            events: VecDeque::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_interactable(&self) -> bool {
        self.interactable
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn style(&self) -> NodeStyle {
        self.style
    }

    pub fn layout(&self) -> NodeLayout {
        self.layout
    }

    /// Sibling draw order, lower first
    pub fn order(&self) -> i32 {
        self.order
    }
}

/// Retained tree of UI nodes with a single root
pub struct UiDocument {
    nodes: HashMap<NodeId, UiNode>,
    root: NodeId,
    next_id: u64,
    mutations: u64,
    /// Nodes waiting for a component's content node, keyed by that component
    waiting: HashMap<ComponentId, Vec<NodeId>>,
    published: HashMap<ComponentId, NodeId>,
}

impl Default for UiDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl UiDocument {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, UiNode::new(NodeKind::Root));
        Self {
            nodes,
            root,
            next_id: 1,
            mutations: 0,
            waiting: HashMap::new(),
            published: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, UiNode::new(kind));
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&UiNode> {
        self.nodes.get(&id)
    }

    /// Number of live nodes, the root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// True when `ancestor` appears on the parent chain of `id`
    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent_of(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent_of(current);
        }
        false
    }

    /// Structural mutations performed so far
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Make `child` the last child of `parent`, moving it if needed.
    ///
    /// Returns false and leaves the tree untouched when `child` already sits
    /// under `parent`, when either node is missing, or when the move would
    /// put a node inside its own subtree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || child == self.root {
            return false;
        }
        if !self.contains(parent) {
            return false;
        }
        match self.nodes.get(&child) {
            Some(node) if node.parent == Some(parent) => return false,
            Some(_) => {}
            None => return false,
        }
        if self.is_descendant(parent, child) {
            log::warn!("refusing to move {child} under its descendant {parent}");
            return false;
        }

        self.unlink(child);
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        self.mutations += 1;
        true
    }

    /// Delete a node. Its children stay alive but become detached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        self.unlink(id);
        self.cancel_wait(id);
        self.published.retain(|_, content| *content != id);
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                if let Some(child) = self.nodes.get_mut(&child) {
                    child.parent = None;
                }
            }
        }
        self.mutations += 1;
        true
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
    }

    // ---------------------------------------------------------------------
    // Presentation state
    // ---------------------------------------------------------------------

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.hidden = hidden;
        }
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.hidden)
    }

    pub fn set_interactable(&mut self, id: NodeId, interactable: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.interactable = interactable;
        }
    }

    pub fn is_interactable(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.interactable)
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.text != text {
                node.text.clear();
                node.text.push_str(text);
            }
        }
    }

    pub fn set_placeholder(&mut self, id: NodeId, placeholder: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.placeholder != placeholder {
                node.placeholder = placeholder.to_string();
            }
        }
    }

    pub fn set_style(&mut self, id: NodeId, style: NodeStyle) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.style = style;
        }
    }

    pub fn set_layout(&mut self, id: NodeId, layout: NodeLayout) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.layout = layout;
        }
    }

    pub fn set_order(&mut self, id: NodeId, order: i32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.order = order;
        }
    }

    /// Attached to the root with no hidden node on the way up
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(&current) else {
                return false;
            };
            if node.hidden {
                return false;
            }
            if current == self.root {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Queue an event for a node.
    ///
    /// Rejected when the node is not rendered or not interactable.
    pub fn dispatch(&mut self, id: NodeId, event: UiEvent) -> bool {
        if !self.is_rendered(id) || !self.is_interactable(id) {
            log::debug!("dropping {event:?} for {id}: node is not accepting input");
            return false;
        }
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.events.push_back(event);
                true
            }
            None => false,
        }
    }

    pub fn take_events(&mut self, id: NodeId) -> Vec<UiEvent> {
        self.nodes
            .get_mut(&id)
            .map(|node| node.events.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn pending_events(&self, id: NodeId) -> usize {
        self.nodes.get(&id).map_or(0, |node| node.events.len())
    }

    // ---------------------------------------------------------------------
    // Parent readiness
    // ---------------------------------------------------------------------

    /// Park `node` until the component `owner` publishes its content node
    pub fn await_content(&mut self, owner: ComponentId, node: NodeId) {
        if let Some(content) = self.published.get(&owner).copied() {
            self.append_child(content, node);
            return;
        }
        let already = self
            .waiting
            .get(&owner)
            .is_some_and(|nodes| nodes.contains(&node));
        if already {
            return;
        }
        self.cancel_wait(node);
        self.waiting.entry(owner).or_default().push(node);
    }

    /// Announce the node children of `owner` attach to, attaching every
    /// node that was waiting for it. Returns how many were attached.
    pub fn publish_content(&mut self, owner: ComponentId, content: NodeId) -> usize {
        self.published.insert(owner, content);
        let waiting = self.waiting.remove(&owner).unwrap_or_default();
        waiting
            .into_iter()
            .filter(|node| self.append_child(content, *node))
            .count()
    }

    pub fn content_of(&self, owner: ComponentId) -> Option<NodeId> {
        self.published.get(&owner).copied()
    }

    pub fn is_waiting(&self, node: NodeId) -> bool {
        self.waiting.values().any(|nodes| nodes.contains(&node))
    }

    /// Stop waiting on any component
    pub fn cancel_wait(&mut self, node: NodeId) {
        self.waiting.retain(|_, nodes| {
            nodes.retain(|n| *n != node);
            !nodes.is_empty()
        });
    }

    /// Forget everything published by or waiting for `owner`
    pub fn withdraw(&mut self, owner: ComponentId) {
        self.published.remove(&owner);
        self.waiting.remove(&owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::IdAllocator;

    #[test]
    fn test_append_child_is_idempotent() {
        let mut doc = UiDocument::new();
        let panel = doc.create(NodeKind::Panel);
        assert!(doc.append_child(doc.root(), panel));
        let mutations = doc.mutation_count();

        assert!(!doc.append_child(doc.root(), panel));
        assert_eq!(doc.mutation_count(), mutations);
        assert_eq!(doc.children(doc.root()), &[panel]);
    }

    #[test]
    fn test_moving_a_node_updates_both_parents() {
        let mut doc = UiDocument::new();
        let a = doc.create(NodeKind::Panel);
        let b = doc.create(NodeKind::Panel);
        let text = doc.create(NodeKind::Text);
        doc.append_child(doc.root(), a);
        doc.append_child(doc.root(), b);
        doc.append_child(a, text);

        assert!(doc.append_child(b, text));
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[text]);
        assert_eq!(doc.parent_of(text), Some(b));
    }

    #[test]
    fn test_cycles_are_refused() {
        let mut doc = UiDocument::new();
        let outer = doc.create(NodeKind::Panel);
        let inner = doc.create(NodeKind::Panel);
        doc.append_child(outer, inner);

        assert!(!doc.append_child(inner, outer));
        assert!(!doc.append_child(outer, outer));
        assert!(!doc.append_child(inner, doc.root()));
        assert_eq!(doc.parent_of(outer), None);
    }

    #[test]
    fn test_remove_orphans_children() {
        let mut doc = UiDocument::new();
        let panel = doc.create(NodeKind::Panel);
        let text = doc.create(NodeKind::Text);
        doc.append_child(doc.root(), panel);
        doc.append_child(panel, text);

        assert!(doc.remove(panel));
        assert!(!doc.contains(panel));
        assert!(doc.children(doc.root()).is_empty());
        assert_eq!(doc.parent_of(text), None);
        assert!(!doc.remove(doc.root()));
    }

    #[test]
    fn test_dispatch_requires_rendered_and_interactable() {
        let mut doc = UiDocument::new();
        let panel = doc.create(NodeKind::Panel);
        let button = doc.create(NodeKind::Button);
        assert!(!doc.dispatch(button, UiEvent::Click));

        doc.append_child(doc.root(), panel);
        doc.append_child(panel, button);
        assert!(doc.dispatch(button, UiEvent::Click));

        doc.set_hidden(panel, true);
        assert!(!doc.dispatch(button, UiEvent::Click));
        doc.set_hidden(panel, false);

        doc.set_interactable(button, false);
        assert!(doc.is_rendered(button));
        assert!(!doc.dispatch(button, UiEvent::Click));

        assert_eq!(doc.take_events(button), vec![UiEvent::Click]);
        assert_eq!(doc.pending_events(button), 0);
    }

    #[test]
    fn test_publish_attaches_waiting_nodes() {
        let mut ids = IdAllocator::new();
        let scroll = ids.allocate_component();
        let mut doc = UiDocument::new();
        let text = doc.create(NodeKind::Text);
        doc.await_content(scroll, text);
        assert!(doc.is_waiting(text));

        let content = doc.create(NodeKind::ScrollContent);
        assert_eq!(doc.publish_content(scroll, content), 1);
        assert_eq!(doc.parent_of(text), Some(content));
        assert!(!doc.is_waiting(text));

        let late = doc.create(NodeKind::Text);
        doc.await_content(scroll, late);
        assert_eq!(doc.parent_of(late), Some(content));
    }

    #[test]
    fn test_withdraw_forgets_owner() {
        let mut ids = IdAllocator::new();
        let panel = ids.allocate_component();
        let mut doc = UiDocument::new();
        let waiting = doc.create(NodeKind::Text);
        doc.await_content(panel, waiting);
        doc.withdraw(panel);
        assert!(!doc.is_waiting(waiting));
        assert_eq!(doc.content_of(panel), None);
    }
}
