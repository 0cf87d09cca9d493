use engine_core::Color;

use crate::binding::impl_ui_behaviour;
use crate::document::{NodeId, NodeKind, NodeStyle, UiDocument};
use crate::element::{UiBehaviour, UiElement};

/// Tinted rectangle, optionally naming an image source. Can hold children.
#[derive(Debug, Clone, Default)]
pub struct Image {
    pub element: UiElement,
    pub color: Color,
    pub source: Option<String>,
}

impl Image {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl UiBehaviour for Image {
    fn element(&self) -> &UiElement {
        &self.element
    }

    fn element_mut(&mut self) -> &mut UiElement {
        &mut self.element
    }

    fn build(&mut self, document: &mut UiDocument) -> NodeId {
        document.create(NodeKind::Image)
    }

    fn sync(&self, document: &mut UiDocument, node: NodeId) {
        document.set_style(
            node,
            NodeStyle {
                background: Some(self.color),
                ..Default::default()
            },
        );
        document.set_text(node, self.source.as_deref().unwrap_or_default());
    }
}

impl_ui_behaviour!(Image);
