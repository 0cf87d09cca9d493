//! Shared state and contract of every UI component

use engine_core::{Color, Component, Context};

use crate::document::{NodeId, NodeLayout, NodeStyle, UiDocument, UiEvent};
use crate::rect_transform::RectTransform;

/// How a node is placed inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Stacked by the parent, explicit size only when non-zero
    #[default]
    Flow,
    /// Anchored position and size from the RectTransform
    Absolute,
}

/// State every UI component carries besides its own semantics
#[derive(Debug, Clone)]
pub struct UiElement {
    node: Option<NodeId>,
    destroyed: bool,
    pub visible: bool,
    pub interactable: bool,
    pub layout: LayoutMode,
    pub background: Option<Color>,
}

impl Default for UiElement {
    fn default() -> Self {
        Self {
            node: None,
            destroyed: false,
            visible: true,
            interactable: true,
            layout: LayoutMode::Flow,
            background: None,
        }
    }
}

impl UiElement {
    pub fn absolute() -> Self {
        Self {
            layout: LayoutMode::Absolute,
            ..Default::default()
        }
    }

    /// The host node, once created
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// True after teardown; the element never gets a node again
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn set_node(&mut self, node: NodeId) {
        self.node = Some(node);
    }

    pub(crate) fn take_node(&mut self) -> Option<NodeId> {
        self.node.take()
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }

    pub fn style(&self) -> NodeStyle {
        NodeStyle {
            background: self.background,
            ..Default::default()
        }
    }

    /// Node layout for this element given its owner's RectTransform
    pub fn node_layout(&self, rect: Option<RectTransform>) -> NodeLayout {
        let rect = rect.unwrap_or_default();
        match self.layout {
            LayoutMode::Absolute => {
                let translate = rect.pivot_offset();
                NodeLayout::Absolute {
                    left: rect.anchored_position.x,
                    top: rect.anchored_position.y,
                    width: rect.size.x,
                    height: rect.size.y,
                    translate,
                }
            }
            LayoutMode::Flow => NodeLayout::Flow {
                width: (rect.size.x > 0.0).then_some(rect.size.x),
                height: (rect.size.y > 0.0).then_some(rect.size.y),
            },
        }
    }
}

/// A component that proxies exactly one host node.
///
/// The binding layer drives implementors through their lifecycle hooks; see
/// [`impl_ui_behaviour!`](crate::binding) for the glue.
pub trait UiBehaviour: Component {
    fn element(&self) -> &UiElement;

    fn element_mut(&mut self) -> &mut UiElement;

    /// Create the host node(s) and return the one representing this component.
    /// Called at most once.
    fn build(&mut self, document: &mut UiDocument) -> NodeId;

    /// Node that children of this component attach to
    fn content_node(&self) -> Option<NodeId> {
        self.element().node()
    }

    /// Canvases never fall back onto another canvas
    fn is_canvas(&self) -> bool {
        false
    }

    /// Push semantic state onto the node, once per tick
    fn sync(&self, _document: &mut UiDocument, _node: NodeId) {}

    fn handle_event(&mut self, _event: UiEvent, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Remove nodes other than the main one at teardown
    fn release_nodes(&mut self, _document: &mut UiDocument) {}
}
