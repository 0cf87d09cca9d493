use engine_core::Color;

use crate::binding::impl_ui_behaviour;
use crate::document::{NodeId, NodeKind, UiDocument};
use crate::element::{UiBehaviour, UiElement};

/// Plain container with an optional background
#[derive(Debug, Clone, Default)]
pub struct Panel {
    pub element: UiElement,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.element.background = Some(color);
        self
    }
}

impl UiBehaviour for Panel {
    fn element(&self) -> &UiElement {
        &self.element
    }

    fn element_mut(&mut self) -> &mut UiElement {
        &mut self.element
    }

    fn build(&mut self, document: &mut UiDocument) -> NodeId {
        document.create(NodeKind::Panel)
    }

    fn sync(&self, document: &mut UiDocument, node: NodeId) {
        document.set_style(node, self.element.style());
    }
}

impl_ui_behaviour!(Panel);
