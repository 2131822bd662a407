use std::f32::consts::PI;
use std::fmt;

use crate::error::SceneError;
use crate::gfx::{
    resources::material::{Color, Material, MaterialHandle},
    scene::{Axis, NodeId, Scene},
};

/// A field of a node, or of its material or light, that the panel can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugField {
    Position(Axis),
    Rotation(Axis),
    Visible,
    Wireframe,
    Color,
    Metalness,
    Roughness,
    AoMapIntensity,
    DisplacementScale,
    LightIntensity,
    LightColor,
}

impl DebugField {
    /// Field name without the axis suffix
    pub fn key(&self) -> &'static str {
        match self {
            DebugField::Position(_) => "position",
            DebugField::Rotation(_) => "rotation",
            DebugField::Visible => "visible",
            DebugField::Wireframe => "wireframe",
            DebugField::Color => "color",
            DebugField::Metalness => "metalness",
            DebugField::Roughness => "roughness",
            DebugField::AoMapIntensity => "aoMapIntensity",
            DebugField::DisplacementScale => "displacementScale",
            DebugField::LightIntensity => "intensity",
            DebugField::LightColor => "lightColor",
        }
    }

    /// Default control for the field
    pub fn control(&self) -> Control {
        match self {
            DebugField::Position(_) => Control::slider(-3.0, 3.0, 0.01),
            DebugField::Rotation(_) => Control::slider(-PI, PI, 0.01),
            DebugField::Visible | DebugField::Wireframe => Control::Checkbox,
            DebugField::Color | DebugField::LightColor => Control::Color,
            DebugField::Metalness | DebugField::Roughness => Control::slider(0.0, 1.0, 0.0001),
            DebugField::AoMapIntensity => Control::slider(0.0, 10.0, 0.001),
            DebugField::DisplacementScale => Control::slider(0.0, 1.0, 0.0001),
            DebugField::LightIntensity => Control::slider(0.0, 3.0, 0.001),
        }
    }
}

impl fmt::Display for DebugField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugField::Position(axis) | DebugField::Rotation(axis) => {
                write!(f, "{}.{}", self.key(), axis.name())
            }
            _ => f.write_str(self.key()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Slider { min: f32, max: f32, step: f32 },
    Checkbox,
    Color,
}

impl Control {
    pub fn slider(min: f32, max: f32, step: f32) -> Self {
        Control::Slider { min, max, step }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f32),
    Bool(bool),
    Color(Color),
}

/// Live two-way link between one field and its control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugBinding {
    pub node: NodeId,
    pub field: DebugField,
    pub control: Control,
}

impl DebugBinding {
    pub fn new(node: NodeId, field: DebugField) -> Self {
        Self {
            node,
            field,
            control: field.control(),
        }
    }

    /// Builder pattern: Replace the default control range
    pub fn with_range(mut self, min: f32, max: f32, step: f32) -> Self {
        self.control = Control::slider(min, max, step);
        self
    }

    pub fn label(&self) -> String {
        self.field.to_string()
    }

    pub fn min(&self) -> Option<f32> {
        match self.control {
            Control::Slider { min, .. } => Some(min),
            _ => None,
        }
    }

    pub fn max(&self) -> Option<f32> {
        match self.control {
            Control::Slider { max, .. } => Some(max),
            _ => None,
        }
    }

    pub fn step(&self) -> Option<f32> {
        match self.control {
            Control::Slider { step, .. } => Some(step),
            _ => None,
        }
    }

    fn material(&self, scene: &Scene) -> Result<MaterialHandle, SceneError> {
        scene.material(self.node)
    }

    fn missing(&self) -> SceneError {
        SceneError::MissingField {
            node: self.node,
            field: self.field.key(),
        }
    }

    /// Reads the current value
    pub fn get(&self, scene: &Scene) -> Result<FieldValue, SceneError> {
        let node = scene.node(self.node)?;
        let value = match self.field {
            DebugField::Position(axis) => FieldValue::Float(axis.get(&node.transform.position)),
            DebugField::Rotation(axis) => FieldValue::Float(axis.get(&node.transform.rotation)),
            DebugField::Visible => FieldValue::Bool(node.visible),
            DebugField::LightIntensity | DebugField::LightColor => {
                let light = node.as_light().ok_or(SceneError::WrongKind {
                    node: self.node,
                    expected: "light",
                })?;
                match self.field {
                    DebugField::LightIntensity => FieldValue::Float(light.intensity()),
                    _ => FieldValue::Color(light.color()),
                }
            }
            _ => {
                let handle = self.material(scene)?;
                let material = handle.borrow();
                self.read_material(&material).ok_or_else(|| self.missing())?
            }
        };
        Ok(value)
    }

    fn read_material(&self, material: &Material) -> Option<FieldValue> {
        match self.field {
            DebugField::Wireframe => Some(FieldValue::Bool(material.common.wireframe)),
            DebugField::Color => material.as_colored().map(|c| FieldValue::Color(c.color())),
            DebugField::Metalness => material
                .as_metalness_rough()
                .map(|m| FieldValue::Float(m.metalness())),
            DebugField::Roughness => material
                .as_metalness_rough()
                .map(|m| FieldValue::Float(m.roughness())),
            DebugField::AoMapIntensity => material
                .as_ambient_occluded()
                .map(|m| FieldValue::Float(m.ao_map_intensity())),
            DebugField::DisplacementScale => material
                .as_displaceable()
                .map(|m| FieldValue::Float(m.displacement_scale())),
            _ => None,
        }
    }

    /// Writes a value straight through, clamped to the slider range
    ///
    /// Returns the value actually stored.
    pub fn set(&self, scene: &mut Scene, value: FieldValue) -> Result<FieldValue, SceneError> {
        let value = match (value, self.control) {
            (FieldValue::Float(v), Control::Slider { min, max, .. }) => {
                FieldValue::Float(v.clamp(min, max))
            }
            (FieldValue::Float(_), _) => {
                return Err(SceneError::FieldType {
                    field: self.field.key(),
                })
            }
            (other, _) => other,
        };
        let wrong_type = || SceneError::FieldType {
            field: self.field.key(),
        };

        match (self.field, value) {
            (DebugField::Position(axis), FieldValue::Float(v)) => {
                axis.set(&mut scene.node_mut(self.node)?.transform.position, v);
            }
            (DebugField::Rotation(axis), FieldValue::Float(v)) => {
                axis.set(&mut scene.node_mut(self.node)?.transform.rotation, v);
            }
            (DebugField::Visible, FieldValue::Bool(v)) => scene.node_mut(self.node)?.visible = v,
            (DebugField::LightIntensity, FieldValue::Float(v)) => self.light(scene)?.set_intensity(v),
            (DebugField::LightColor, FieldValue::Color(c)) => self.light(scene)?.set_color(c),
            (
                DebugField::Wireframe
                | DebugField::Color
                | DebugField::Metalness
                | DebugField::Roughness
                | DebugField::AoMapIntensity
                | DebugField::DisplacementScale,
                _,
            ) => {
                let handle = self.material(scene)?;
                let mut material = handle.borrow_mut();
                self.write_material(&mut material, value)?;
            }
            _ => return Err(wrong_type()),
        }
        Ok(value)
    }

    fn light<'a>(&self, scene: &'a mut Scene) -> Result<&'a mut crate::gfx::lights::Light, SceneError> {
        let node = self.node;
        scene.node_mut(node)?.as_light_mut().ok_or(SceneError::WrongKind {
            node,
            expected: "light",
        })
    }

    fn write_material(&self, material: &mut Material, value: FieldValue) -> Result<(), SceneError> {
        let wrong_type = SceneError::FieldType {
            field: self.field.key(),
        };
        match (self.field, value) {
            (DebugField::Wireframe, FieldValue::Bool(v)) => material.common.wireframe = v,
            (DebugField::Color, FieldValue::Color(c)) => material
                .as_colored_mut()
                .ok_or_else(|| self.missing())?
                .set_color(c),
            (DebugField::Metalness, FieldValue::Float(v)) => material
                .as_metalness_rough_mut()
                .ok_or_else(|| self.missing())?
                .set_metalness(v),
            (DebugField::Roughness, FieldValue::Float(v)) => material
                .as_metalness_rough_mut()
                .ok_or_else(|| self.missing())?
                .set_roughness(v),
            (DebugField::AoMapIntensity, FieldValue::Float(v)) => material
                .as_ambient_occluded_mut()
                .ok_or_else(|| self.missing())?
                .set_ao_map_intensity(v),
            (DebugField::DisplacementScale, FieldValue::Float(v)) => material
                .as_displaceable_mut()
                .ok_or_else(|| self.missing())?
                .set_displacement_scale(v),
            _ => return Err(wrong_type),
        }
        Ok(())
    }
}

/// Enumerates the editable fields of a node
///
/// Transform and visibility are always present. Material fields follow the
/// capabilities the node's material exposes; light nodes add intensity and
/// color.
pub fn bindings_for_node(scene: &Scene, id: NodeId) -> Result<Vec<DebugBinding>, SceneError> {
    let node = scene.node(id)?;
    let mut fields: Vec<DebugField> = Axis::ALL
        .iter()
        .map(|&a| DebugField::Position(a))
        .chain(Axis::ALL.iter().map(|&a| DebugField::Rotation(a)))
        .collect();
    fields.push(DebugField::Visible);

    if let Some(handle) = node.material() {
        let material = handle.borrow();
        fields.push(DebugField::Wireframe);
        if material.as_colored().is_some() {
            fields.push(DebugField::Color);
        }
        if material.as_metalness_rough().is_some() {
            fields.push(DebugField::Metalness);
            fields.push(DebugField::Roughness);
        }
        if material.as_ambient_occluded().is_some() {
            fields.push(DebugField::AoMapIntensity);
        }
        if material.as_displaceable().is_some() {
            fields.push(DebugField::DisplacementScale);
        }
    }

    if node.as_light().is_some() {
        fields.push(DebugField::LightIntensity);
        fields.push(DebugField::LightColor);
    }

    Ok(fields
        .into_iter()
        .map(|field| DebugBinding::new(id, field))
        .collect())
}
