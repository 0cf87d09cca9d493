//! Hierarchy - shows the scene hierarchy
//!
//! Displays every reachable GameObject as an indented tree with an active
//! toggle per row.

use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Ui, Vec2};

use engine_core::{GameObject, Scene};

/// One line of the hierarchy tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyRow {
    pub game_object: GameObject,
    pub name: String,
    pub depth: usize,
    pub active_self: bool,
    pub active_in_hierarchy: bool,
}

/// Hierarchy state for the debug panel
pub struct HierarchyPanel {
    pub selected: Option<GameObject>,
}

impl Default for HierarchyPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyPanel {
    pub fn new() -> Self {
        Self { selected: None }
    }

    /// Rows in traversal order, parents before their children
    pub fn rows(scene: &Scene) -> Vec<HierarchyRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<(GameObject, usize)> =
            scene.roots().iter().rev().map(|root| (*root, 0)).collect();
        while let Some((game_object, depth)) = stack.pop() {
            rows.push(HierarchyRow {
                game_object,
                name: scene.game_object_name(game_object).unwrap_or_default(),
                depth,
                active_self: scene.active_self(game_object),
                active_in_hierarchy: scene.active_in_hierarchy(game_object),
            });
            stack.extend(
                scene
                    .children(game_object)
                    .into_iter()
                    .rev()
                    .map(|child| (child, depth + 1)),
            );
        }
        rows
    }

    /// Render the hierarchy UI
    pub fn show(&mut self, ui: &mut Ui, scene: &mut Scene, width: f32) {
        let available = ui.available_rect_before_wrap();
        let header_height = 32.0;

        let header_rect = Rect::from_min_size(
            Pos2::new(available.left(), available.top()),
            Vec2::new(width, header_height),
        );

        ui.painter()
            .rect_filled(header_rect, 0.0, Color32::from_rgb(35, 35, 38));

        ui.painter().text(
            header_rect.center(),
            Align2::CENTER_CENTER,
            "Hierarchy",
            FontId::proportional(14.0),
            Color32::from_gray(200),
        );

        ui.add_space(header_height + 8.0);

        if self.selected.is_some_and(|selected| !scene.contains(selected)) {
            self.selected = None;
        }

        let rows = Self::rows(scene);
        if rows.is_empty() {
            ui.label("No GameObjects in scene");
            return;
        }

        ui.label(format!("{} GameObjects", rows.len()));
        ui.separator();

        let mut toggles = Vec::new();
        for row in &rows {
            ui.horizontal(|ui| {
                ui.add_space(row.depth as f32 * 14.0);

                let mut active = row.active_self;
                if ui.checkbox(&mut active, "").changed() {
                    toggles.push((row.game_object, active));
                }

                let label = if row.active_in_hierarchy {
                    RichText::new(&row.name)
                } else {
                    RichText::new(&row.name).color(Color32::from_gray(120))
                };
                let is_selected = self.selected == Some(row.game_object);
                if ui.selectable_label(is_selected, label).clicked() {
                    self.selected = Some(row.game_object);
                }
            });
        }

        for (game_object, active) in toggles {
            if let Err(err) = scene.set_active(game_object, active) {
                log::warn!("could not toggle {game_object}: {err}");
            }
        }
    }

    /// Name of the selected GameObject
    pub fn selected_name(&self, scene: &Scene) -> Option<String> {
        self.selected
            .and_then(|selected| scene.game_object_name(selected).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_traversal_with_depth() {
        let mut scene = Scene::new("test");
        let canvas = scene.create_game_object("Canvas");
        let panel = scene.create_game_object("Panel");
        let button = scene.create_game_object("Button");
        let reels = scene.create_game_object("Reels");
        scene.set_parent(panel, Some(canvas)).unwrap();
        scene.set_parent(button, Some(panel)).unwrap();
        scene.add_game_object(canvas).unwrap();
        scene.add_game_object(reels).unwrap();
        scene.set_active(panel, false).unwrap();

        let rows = HierarchyPanel::rows(&scene);
        let summary: Vec<(&str, usize, bool)> = rows
            .iter()
            .map(|row| (row.name.as_str(), row.depth, row.active_in_hierarchy))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Canvas", 0, true),
                ("Panel", 1, false),
                ("Button", 2, false),
                ("Reels", 0, true),
            ]
        );
        assert!(rows[2].active_self);
    }

    #[test]
    fn test_selected_name_resolves_through_scene() {
        let mut scene = Scene::new("test");
        let object = scene.create_game_object("Reel 1");
        scene.add_game_object(object).unwrap();
        let mut panel = HierarchyPanel::new();
        assert_eq!(panel.selected_name(&scene), None);
        panel.selected = Some(object);
        assert_eq!(panel.selected_name(&scene).as_deref(), Some("Reel 1"));
    }
}
