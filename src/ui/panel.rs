//! Debug panel window
//!
//! Draws every folder of a [`DebugPanel`] as a collapsing header with one
//! control per binding. The scene is read while the frame is drawn; edited
//! values come back as [`PanelEdit`]s and are written with [`apply_edits`]
//! once the renderer has released the scene.

use log::{debug, warn};

use crate::debug::{Control, DebugBinding, DebugPanel, FieldValue};
use crate::error::SceneError;
use crate::gfx::{resources::material::Color, scene::Scene};

/// A value changed through the panel, not yet written
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelEdit {
    pub binding: DebugBinding,
    pub value: FieldValue,
}

/// Draws `panel` and collects the values edited this frame
pub fn debug_panel(ui: &imgui::Ui, panel: &DebugPanel, scene: &Scene) -> Vec<PanelEdit> {
    let mut edits = Vec::new();
    if !panel.visible || panel.is_empty() {
        return edits;
    }
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return edits;
    }
    let panel_width = (display_size[0] * 0.25).clamp(280.0, 420.0);

    ui.window(&panel.title)
        .size([panel_width, display_size[1] * 0.6], imgui::Condition::FirstUseEver)
        .position([display_size[0] - panel_width - 16.0, 16.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            ui.text_disabled("H to hide");
            ui.separator();
            for folder in &panel.folders {
                let flags = if folder.open {
                    imgui::TreeNodeFlags::DEFAULT_OPEN
                } else {
                    imgui::TreeNodeFlags::empty()
                };
                if !ui.collapsing_header(&folder.title, flags) {
                    continue;
                }
                for binding in &folder.bindings {
                    match binding_control(ui, binding, scene) {
                        Ok(Some(value)) => edits.push(PanelEdit {
                            binding: *binding,
                            value,
                        }),
                        Ok(None) => {}
                        Err(e) => warn!("{}", e),
                    }
                }
            }
        });
    edits
}

fn binding_control(
    ui: &imgui::Ui,
    binding: &DebugBinding,
    scene: &Scene,
) -> Result<Option<FieldValue>, SceneError> {
    // Node ids keep labels unique across folders
    let label = format!("{}##{}", binding.label(), binding.node.index());

    let edited = match (binding.control, binding.get(scene)?) {
        (Control::Slider { min, max, step }, FieldValue::Float(mut value)) => ui
            .slider_config(&label, min, max)
            .build(&mut value)
            .then(|| FieldValue::Float(snap(value, min, step))),
        (Control::Checkbox, FieldValue::Bool(mut value)) => {
            ui.checkbox(&label, &mut value).then_some(FieldValue::Bool(value))
        }
        (Control::Color, FieldValue::Color(color)) => {
            let mut rgb = color.to_array();
            ui.color_edit3(&label, &mut rgb)
                .then(|| FieldValue::Color(Color::from(rgb)))
        }
        (_, value) => {
            ui.text(format!("{}: {:?}", binding.label(), value));
            None
        }
    };
    Ok(edited)
}

/// Writes panel edits into the scene, returning how many succeeded
pub fn apply_edits(scene: &mut Scene, edits: &[PanelEdit]) -> usize {
    let mut applied = 0;
    for edit in edits {
        match edit.binding.set(scene, edit.value) {
            Ok(value) => {
                debug!("{} on {} = {:?}", edit.binding.label(), edit.binding.node, value);
                applied += 1;
            }
            Err(e) => warn!("{}", e),
        }
    }
    applied
}

/// Rounds `value` to the nearest multiple of `step` above `min`
fn snap(value: f32, min: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    min + ((value - min) / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::DebugField;
    use crate::gfx::scene::{Axis, Node};

    #[test]
    fn test_snap_to_step() {
        assert!((snap(0.237, 0.0, 0.01) - 0.24).abs() < 1e-5);
        assert!((snap(-2.96, -3.0, 0.5) - -3.0).abs() < 1e-5);
        assert_eq!(snap(0.3, 0.0, 0.0), 0.3);
    }

    #[test]
    fn test_apply_edits_writes_through() {
        let mut scene = Scene::new();
        let id = scene.add(Node::group("cube"));
        let edits = [
            PanelEdit {
                binding: DebugBinding::new(id, DebugField::Position(Axis::Y)),
                value: FieldValue::Float(1.5),
            },
            PanelEdit {
                binding: DebugBinding::new(id, DebugField::Visible),
                value: FieldValue::Bool(false),
            },
            // Groups have no material
            PanelEdit {
                binding: DebugBinding::new(id, DebugField::Wireframe),
                value: FieldValue::Bool(true),
            },
        ];

        assert_eq!(apply_edits(&mut scene, &edits), 2);
        let node = scene.node(id).unwrap();
        assert_eq!(node.transform.position.y, 1.5);
        assert!(!node.visible);
    }
}
