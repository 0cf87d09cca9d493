//! Inspector - shows and edits GameObject properties
//!
//! Displays the Transform and the component list of the selected GameObject.

use egui::{Align2, Color32, DragValue, FontId, Pos2, Rect, Ui, Vec2};

use engine_core::{Capabilities, ComponentId, GameObject, Scene};
use glam::{EulerRot, Quat};

/// Inspector for the debug panel; the selection lives in the hierarchy
#[derive(Default)]
pub struct InspectorPanel;

/// Last segment of a type path, generics included
pub fn short_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    match base.rfind("::") {
        Some(index) => &type_name[index + 2..],
        None => type_name,
    }
}

/// Transform fields as the inspector edits them
#[derive(Debug, Clone, Copy)]
struct TransformEdit {
    position: [f32; 3],
    /// Rotation about Z; the 2D views ignore the other axes
    angle_degrees: f32,
    scale: [f32; 3],
}

/// Write edited Transform fields back; returns false when the object is gone
fn commit_transform(scene: &mut Scene, game_object: GameObject, edit: TransformEdit) -> bool {
    let result = scene.with_transform_mut(game_object, |transform| {
        transform.local_position = edit.position.into();
        transform.local_rotation = Quat::from_rotation_z(edit.angle_degrees.to_radians());
        transform.local_scale = edit.scale.into();
    });
    if let Err(err) = &result {
        log::warn!("could not edit the transform of {game_object}: {err}");
    }
    result.is_ok()
}

impl InspectorPanel {
    pub fn new() -> Self {
        Self
    }

    /// Render the inspector UI
    pub fn show(&mut self, ui: &mut Ui, selected: Option<GameObject>, scene: &mut Scene) {
        let available = ui.available_rect_before_wrap();
        let header_height = 32.0;

        let header_rect = Rect::from_min_size(
            Pos2::new(available.left(), available.top()),
            Vec2::new(available.width(), header_height),
        );

        ui.painter()
            .rect_filled(header_rect, 0.0, Color32::from_rgb(35, 35, 38));

        ui.painter().text(
            header_rect.center(),
            Align2::CENTER_CENTER,
            "Inspector",
            FontId::proportional(14.0),
            Color32::from_gray(200),
        );

        ui.add_space(header_height + 8.0);

        match selected.filter(|game_object| scene.contains(*game_object)) {
            Some(game_object) => self.show_game_object(ui, game_object, scene),
            None => {
                ui.label("No GameObject selected");
            }
        }
    }

    fn show_game_object(&mut self, ui: &mut Ui, game_object: GameObject, scene: &mut Scene) {
        let name = scene.game_object_name(game_object).unwrap_or_default();
        let instance = scene
            .instance_id(game_object)
            .map(|id| id.to_string())
            .unwrap_or_default();
        ui.strong(name);
        ui.label(format!("instance {instance}"));

        let Ok((mut pos, mut angle, mut scale)) = scene.transform(game_object).map(|t| {
            let (_, _, z) = t.local_rotation.to_euler(EulerRot::XYZ);
            (
                t.local_position.to_array(),
                z.to_degrees(),
                t.local_scale.to_array(),
            )
        }) else {
            return;
        };

        let mut edited = false;
        egui::CollapsingHeader::new("Transform")
            .default_open(true)
            .show(ui, |ui| {
                ui.label("Position");
                ui.columns(3, |cols| {
                    edited |= cols[0].add(DragValue::new(&mut pos[0]).prefix("X")).changed();
                    edited |= cols[1].add(DragValue::new(&mut pos[1]).prefix("Y")).changed();
                    edited |= cols[2].add(DragValue::new(&mut pos[2]).prefix("Z")).changed();
                });

                ui.label("Rotation");
                edited |= ui
                    .add(DragValue::new(&mut angle).prefix("Z").suffix("°"))
                    .changed();

                ui.label("Scale");
                ui.columns(3, |cols| {
                    edited |= cols[0].add(DragValue::new(&mut scale[0]).prefix("X")).changed();
                    edited |= cols[1].add(DragValue::new(&mut scale[1]).prefix("Y")).changed();
                    edited |= cols[2].add(DragValue::new(&mut scale[2]).prefix("Z")).changed();
                });
            });

        if edited {
            let edit = TransformEdit {
                position: pos,
                angle_degrees: angle,
                scale,
            };
            commit_transform(scene, game_object, edit);
        }

        ui.separator();
        ui.label("Components");
        let mut toggles: Vec<(ComponentId, bool)> = Vec::new();
        for id in scene.component_ids(game_object) {
            let type_name = scene.component_type_name(id).unwrap_or("?");
            let label = short_type_name(type_name);
            if scene.capabilities(id).contains(Capabilities::TRANSFORM) {
                ui.label(label);
                continue;
            }
            let mut enabled = scene.is_enabled(id);
            if ui.checkbox(&mut enabled, label).changed() {
                toggles.push((id, enabled));
            }
        }

        for (id, enabled) in toggles {
            if let Err(err) = scene.set_enabled(id, enabled) {
                log::warn!("could not toggle {id}: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("engine_ui::widgets::Button"), "Button");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(
            short_type_name("demo::Holder<alloc::string::String>"),
            "Holder<alloc::string::String>"
        );
    }

    #[test]
    fn test_commit_transform_writes_local_fields() {
        let mut scene = Scene::new("inspector");
        let object = scene.create_game_object("Target");
        let edit = TransformEdit {
            position: [1.0, 2.0, 3.0],
            angle_degrees: 90.0,
            scale: [2.0, 2.0, 1.0],
        };
        assert!(commit_transform(&mut scene, object, edit));

        let transform = scene.transform(object).unwrap();
        assert_eq!(transform.local_position.to_array(), [1.0, 2.0, 3.0]);
        assert_eq!(transform.local_scale.to_array(), [2.0, 2.0, 1.0]);
        let (_, _, z) = transform.local_rotation.to_euler(EulerRot::XYZ);
        assert!((z.to_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_commit_transform_on_destroyed_object_reports_failure() {
        let mut scene = Scene::new("inspector");
        let object = scene.create_game_object("Target");
        scene.destroy(object);
        scene.flush_destroyed();
        let edit = TransformEdit {
            position: [0.0; 3],
            angle_degrees: 0.0,
            scale: [1.0; 3],
        };
        assert!(!commit_transform(&mut scene, object, edit));
    }
}
