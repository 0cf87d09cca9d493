//! Presenter - draws a UiDocument with egui and feeds input back
//!
//! Events are collected while drawing and dispatched once the frame's
//! widgets are laid out, so the document only sees input for nodes that
//! were actually on screen.

use std::collections::{HashMap, HashSet};

use egui::{Color32, Rect, RichText, Ui, UiBuilder};

use engine_core::Color;

use crate::document::{NodeId, NodeKind, NodeLayout, UiDocument, UiEvent, UiNode};

fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Per-frame scratch collected while drawing
#[derive(Default)]
struct FrameInput {
    events: Vec<(NodeId, UiEvent)>,
    hovered: HashSet<NodeId>,
}

/// egui front end for a [`UiDocument`]
#[derive(Default)]
pub struct UiPresenter {
    hovered: HashSet<NodeId>,
    scroll_offsets: HashMap<NodeId, glam::Vec2>,
    edit_buffers: HashMap<NodeId, String>,
}

impl UiPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the document into `ui` and dispatch the input it produced.
    ///
    /// Returns the number of events the document accepted.
    pub fn show(&mut self, ui: &mut Ui, document: &mut UiDocument) -> usize {
        let mut input = FrameInput::default();
        self.show_children(ui, document, document.root(), &mut input);

        for node in input.hovered.difference(&self.hovered) {
            input.events.push((*node, UiEvent::PointerEnter));
        }
        for node in self.hovered.difference(&input.hovered) {
            input.events.push((*node, UiEvent::PointerLeave));
        }
        self.hovered = input.hovered;
        self.edit_buffers.retain(|node, _| document.contains(*node));
        self.scroll_offsets.retain(|node, _| document.contains(*node));

        input
            .events
            .into_iter()
            .filter(|(node, event)| document.dispatch(*node, event.clone()))
            .count()
    }

    fn show_children(&mut self, ui: &mut Ui, document: &UiDocument, id: NodeId, input: &mut FrameInput) {
        let mut children = document.children(id).to_vec();
        children.sort_by_key(|child| document.node(*child).map_or(0, UiNode::order));
        for child in children {
            self.show_node(ui, document, child, input);
        }
    }

    fn show_node(&mut self, ui: &mut Ui, document: &UiDocument, id: NodeId, input: &mut FrameInput) {
        let Some(node) = document.node(id) else {
            return;
        };
        if node.is_hidden() {
            return;
        }

        match node.layout() {
            NodeLayout::Absolute {
                left,
                top,
                width,
                height,
                translate,
            } => {
                let origin = ui.max_rect().min;
                let min = origin + egui::vec2(left + translate.x, top + translate.y);
                let rect = Rect::from_min_size(min, egui::vec2(width, height));
                ui.scope_builder(UiBuilder::new().max_rect(rect), |ui| {
                    self.show_content(ui, document, id, node, input);
                });
            }
            NodeLayout::Flow { width, height } => {
                ui.scope(|ui| {
                    if let Some(width) = width {
                        ui.set_width(width);
                    }
                    if let Some(height) = height {
                        ui.set_height(height);
                    }
                    self.show_content(ui, document, id, node, input);
                });
            }
        }
    }

    fn show_content(
        &mut self,
        ui: &mut Ui,
        document: &UiDocument,
        id: NodeId,
        node: &UiNode,
        input: &mut FrameInput,
    ) {
        let style = node.style();
        let foreground = style.foreground.map(color32);
        let rich_text = |text: &str| {
            let mut rich = RichText::new(text);
            if let Some(color) = foreground {
                rich = rich.color(color);
            }
            if let Some(size) = style.font_size {
                rich = rich.size(size);
            }
            rich
        };

        match node.kind() {
            NodeKind::Root => self.show_children(ui, document, id, input),
            NodeKind::Text => {
                ui.label(rich_text(node.text()));
            }
            NodeKind::Button => {
                let mut button = egui::Button::new(rich_text(node.text()));
                if let Some(fill) = style.background {
                    button = button.fill(color32(fill));
                }
                let response = ui.add_enabled(node.is_interactable(), button);
                if response.clicked() {
                    input.events.push((id, UiEvent::Click));
                }
                if node.is_interactable() && response.hovered() {
                    input.hovered.insert(id);
                }
            }
            NodeKind::InputField => {
                let buffer = self
                    .edit_buffers
                    .entry(id)
                    .or_insert_with(|| node.text().to_string());
                let edit = egui::TextEdit::singleline(&mut *buffer).hint_text(node.placeholder());
                let response = ui.add_enabled(node.is_interactable(), edit);
                if response.changed() {
                    input.events.push((id, UiEvent::ValueChanged(buffer.clone())));
                } else if !response.has_focus() && buffer.as_str() != node.text() {
                    buffer.clear();
                    buffer.push_str(node.text());
                }
            }
            NodeKind::ScrollViewport => {
                let output = egui::ScrollArea::both()
                    .id_salt(("ui_scroll", id.get()))
                    .show(ui, |ui| self.show_children(ui, document, id, input));
                let offset = glam::Vec2::new(output.state.offset.x, output.state.offset.y);
                let previous = self.scroll_offsets.insert(id, offset).unwrap_or(glam::Vec2::ZERO);
                if previous != offset {
                    input.events.push((id, UiEvent::Scroll(offset)));
                }
            }
            NodeKind::Panel | NodeKind::Canvas | NodeKind::Image | NodeKind::ScrollContent => {
                let fill = style.background.map(color32).unwrap_or(Color32::TRANSPARENT);
                egui::Frame::new()
                    .fill(fill)
                    .inner_margin(egui::Margin::same(6))
                    .show(ui, |ui| self.show_children(ui, document, id, input));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frame(presenter: &mut UiPresenter, document: &mut UiDocument) -> usize {
        let ctx = egui::Context::default();
        let mut accepted = 0;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                accepted = presenter.show(ui, document);
            });
        });
        accepted
    }

    #[test]
    fn test_idle_frame_dispatches_nothing() {
        let mut document = UiDocument::new();
        let canvas = document.create(NodeKind::Canvas);
        let button = document.create(NodeKind::Button);
        document.append_child(document.root(), canvas);
        document.append_child(canvas, button);
        document.set_text(button, "Spin");

        let mut presenter = UiPresenter::new();
        assert_eq!(run_frame(&mut presenter, &mut document), 0);
        assert_eq!(document.pending_events(button), 0);
    }

    #[test]
    fn test_stale_buffers_are_dropped() {
        let mut document = UiDocument::new();
        let field = document.create(NodeKind::InputField);
        document.append_child(document.root(), field);

        let mut presenter = UiPresenter::new();
        run_frame(&mut presenter, &mut document);
        assert!(presenter.edit_buffers.contains_key(&field));

        document.remove(field);
        run_frame(&mut presenter, &mut document);
        assert!(presenter.edit_buffers.is_empty());
    }
}
