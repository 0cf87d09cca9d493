use glam::Vec2;

use crate::binding::impl_ui_behaviour;
use crate::document::{NodeId, NodeKind, UiDocument, UiEvent};
use crate::element::{UiBehaviour, UiElement};
use engine_core::Context;

/// Scrollable container: an outer viewport node wrapping a content node.
///
/// Children attach to the content node, never to the viewport.
#[derive(Debug, Clone, Default)]
pub struct ScrollRect {
    pub element: UiElement,
    content: Option<NodeId>,
    scroll_offset: Vec2,
}

impl ScrollRect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport_node(&self) -> Option<NodeId> {
        self.element.node()
    }

    /// Last offset reported by the presenter
    pub fn scroll_offset(&self) -> Vec2 {
        self.scroll_offset
    }
}

impl UiBehaviour for ScrollRect {
    fn element(&self) -> &UiElement {
        &self.element
    }

    fn element_mut(&mut self) -> &mut UiElement {
        &mut self.element
    }

    fn build(&mut self, document: &mut UiDocument) -> NodeId {
        let viewport = document.create(NodeKind::ScrollViewport);
        let content = document.create(NodeKind::ScrollContent);
        document.append_child(viewport, content);
        self.content = Some(content);
        viewport
    }

    fn content_node(&self) -> Option<NodeId> {
        self.element.node().and(self.content)
    }

    fn sync(&self, document: &mut UiDocument, node: NodeId) {
        document.set_style(node, self.element.style());
    }

    fn handle_event(&mut self, event: UiEvent, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        if let UiEvent::Scroll(offset) = event {
            self.scroll_offset = offset;
        }
        Ok(())
    }

    fn release_nodes(&mut self, document: &mut UiDocument) {
        if let Some(content) = self.content.take() {
            document.remove(content);
        }
    }
}

impl_ui_behaviour!(ScrollRect);
