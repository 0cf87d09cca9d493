use std::fmt;

use engine_core::{Color, Context};

use crate::binding::impl_ui_behaviour;
use crate::document::{NodeId, NodeKind, NodeStyle, UiDocument, UiEvent};
use crate::element::{UiBehaviour, UiElement};

/// Callback run with the new value whenever the field is edited
pub type ValueListener =
    Box<dyn FnMut(&mut Context<'_>, &str) -> anyhow::Result<()> + Send + Sync>;

/// Single-line text entry
pub struct InputField {
    pub element: UiElement,
    pub placeholder: String,
    pub text_color: Color,
    value: String,
    listeners: Vec<ValueListener>,
}

impl Default for InputField {
    fn default() -> Self {
        Self {
            element: UiElement::default(),
            placeholder: String::new(),
            text_color: Color::WHITE,
            value: String::new(),
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputField")
            .field("element", &self.element)
            .field("value", &self.value)
            .field("placeholder", &self.placeholder)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl InputField {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Default::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value without notifying listeners
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn on_value_changed(
        &mut self,
        listener: impl FnMut(&mut Context<'_>, &str) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }
}

impl UiBehaviour for InputField {
    fn element(&self) -> &UiElement {
        &self.element
    }

    fn element_mut(&mut self) -> &mut UiElement {
        &mut self.element
    }

    fn build(&mut self, document: &mut UiDocument) -> NodeId {
        document.create(NodeKind::InputField)
    }

    fn sync(&self, document: &mut UiDocument, node: NodeId) {
        document.set_text(node, &self.value);
        document.set_placeholder(node, &self.placeholder);
        document.set_style(
            node,
            NodeStyle {
                background: self.element.background,
                foreground: Some(self.text_color),
                font_size: None,
            },
        );
    }

    fn handle_event(&mut self, event: UiEvent, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let UiEvent::ValueChanged(value) = event else {
            return Ok(());
        };
        if value == self.value {
            return Ok(());
        }
        self.value = value;
        for listener in &mut self.listeners {
            if let Err(err) = listener(&mut *ctx, &self.value) {
                log::error!("value listener failed on {}: {err:#}", ctx.component_id());
            }
        }
        Ok(())
    }
}

impl_ui_behaviour!(InputField);
