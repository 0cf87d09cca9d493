use crate::binding::impl_ui_behaviour;
use crate::document::{NodeId, NodeKind, UiDocument};
use crate::element::{UiBehaviour, UiElement};

/// Top-level UI surface; parentless UI elements fall back to the first one
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    pub element: UiElement,
    /// Draw order among sibling canvases, lower first
    pub sort_order: i32,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }
}

impl UiBehaviour for Canvas {
    fn element(&self) -> &UiElement {
        &self.element
    }

    fn element_mut(&mut self) -> &mut UiElement {
        &mut self.element
    }

    fn build(&mut self, document: &mut UiDocument) -> NodeId {
        document.create(NodeKind::Canvas)
    }

    fn is_canvas(&self) -> bool {
        true
    }

    fn sync(&self, document: &mut UiDocument, node: NodeId) {
        document.set_style(node, self.element.style());
        document.set_order(node, self.sort_order);
    }
}

impl_ui_behaviour!(Canvas);
