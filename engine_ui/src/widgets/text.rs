use engine_core::Color;

use crate::binding::impl_ui_behaviour;
use crate::document::{NodeId, NodeKind, NodeStyle, UiDocument};
use crate::element::{UiBehaviour, UiElement};

/// Read-only label
#[derive(Debug, Clone)]
pub struct Text {
    pub element: UiElement,
    pub text: String,
    pub font_size: f32,
    pub color: Color,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            element: UiElement::default(),
            text: String::new(),
            font_size: 16.0,
            color: Color::WHITE,
        }
    }
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl UiBehaviour for Text {
    fn element(&self) -> &UiElement {
        &self.element
    }

    fn element_mut(&mut self) -> &mut UiElement {
        &mut self.element
    }

    fn build(&mut self, document: &mut UiDocument) -> NodeId {
        document.create(NodeKind::Text)
    }

    fn sync(&self, document: &mut UiDocument, node: NodeId) {
        document.set_text(node, &self.text);
        document.set_style(
            node,
            NodeStyle {
                background: self.element.background,
                foreground: Some(self.color),
                font_size: Some(self.font_size),
            },
        );
    }
}

impl_ui_behaviour!(Text);
