use std::fmt;

use engine_core::{Color, Context};

use crate::binding::impl_ui_behaviour;
use crate::document::{NodeId, NodeKind, NodeStyle, UiDocument, UiEvent};
use crate::element::{UiBehaviour, UiElement};

/// Callback run when a button is clicked, with the button's hook context
pub type ClickListener = Box<dyn FnMut(&mut Context<'_>) -> anyhow::Result<()> + Send + Sync>;

/// Clickable label
pub struct Button {
    pub element: UiElement,
    pub label: String,
    pub label_color: Color,
    listeners: Vec<ClickListener>,
    hovered: bool,
    clicks: u64,
}

impl Default for Button {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("element", &self.element)
            .field("label", &self.label)
            .field("listeners", &self.listeners.len())
            .field("hovered", &self.hovered)
            .field("clicks", &self.clicks)
            .finish()
    }
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            element: UiElement::default(),
            label: label.into(),
            label_color: Color::WHITE,
            listeners: Vec::new(),
            hovered: false,
            clicks: 0,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.element.background = Some(color);
        self
    }

    /// Register a click listener; listeners run in registration order
    pub fn on_click(
        &mut self,
        listener: impl FnMut(&mut Context<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Clicks handled since creation
    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    /// Run every listener as if the button had been clicked
    pub fn click(&mut self, ctx: &mut Context<'_>) {
        self.clicks += 1;
        for listener in &mut self.listeners {
            if let Err(err) = listener(&mut *ctx) {
                log::error!("click listener failed on {}: {err:#}", ctx.component_id());
            }
        }
    }
}

impl UiBehaviour for Button {
    fn element(&self) -> &UiElement {
        &self.element
    }

    fn element_mut(&mut self) -> &mut UiElement {
        &mut self.element
    }

    fn build(&mut self, document: &mut UiDocument) -> NodeId {
        document.create(NodeKind::Button)
    }

    fn sync(&self, document: &mut UiDocument, node: NodeId) {
        document.set_text(node, &self.label);
        document.set_style(
            node,
            NodeStyle {
                background: self.element.background,
                foreground: Some(self.label_color),
                font_size: None,
            },
        );
    }

    fn handle_event(&mut self, event: UiEvent, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        match event {
            UiEvent::Click => self.click(ctx),
            UiEvent::PointerEnter => self.hovered = true,
            UiEvent::PointerLeave => self.hovered = false,
            UiEvent::ValueChanged(_) | UiEvent::Scroll(_) => {}
        }
        Ok(())
    }
}

impl_ui_behaviour!(Button);
