//! Renderer-independent view of one frame
//!
//! [`DrawList::build`] walks the scene once, resolving world matrices,
//! inherited visibility and the current state of every material. Renderers
//! only ever read the scene through this list.

use std::rc::Rc;

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::{
    geometry::GeometryData,
    helpers::{light_marker, Helper, LineSegment},
    lights::Light,
    resources::material::MaterialSnapshot,
    scene::{NodeId, NodeKind, Scene},
};

/// What a draw item renders
#[derive(Debug, Clone)]
pub enum DrawPrimitive {
    Mesh(Rc<GeometryData>),
    Points {
        positions: Vec<[f32; 3]>,
        colors: Option<Vec<[f32; 3]>>,
    },
    /// Line segments in the item's local space
    Lines(Vec<LineSegment>),
}

#[derive(Debug, Clone)]
pub struct DrawItem {
    pub node: NodeId,
    pub world: Matrix4<f32>,
    pub primitive: DrawPrimitive,
    /// Material state, `None` for helper lines
    pub material: Option<MaterialSnapshot>,
}

impl DrawItem {
    pub fn is_transparent(&self) -> bool {
        self.material.map(|m| m.transparent).unwrap_or(false)
    }
}

/// Reduced lighting for simple forward shading
///
/// Ambient and hemisphere lights sum into `ambient`. The brightest remaining
/// light becomes the key light; the rest add a quarter of their radiance to
/// the ambient term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingSummary {
    pub ambient: [f32; 3],
    /// Unit vector from the scene towards the key light
    pub key_direction: [f32; 3],
    pub key_color: [f32; 3],
}

impl Default for LightingSummary {
    fn default() -> Self {
        Self {
            ambient: [0.0; 3],
            key_direction: [0.0, 1.0, 0.0],
            key_color: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Opaque items in scene order, then transparent items in scene order
    pub items: Vec<DrawItem>,
    pub lighting: LightingSummary,
    pub background: [f32; 3],
}

impl DrawList {
    pub fn build(scene: &Scene) -> Self {
        let mut opaque = Vec::new();
        let mut transparent = Vec::new();
        let mut lights: Vec<(Light, Vector3<f32>)> = Vec::new();
        let mut markers = Vec::new();

        scene.traverse_all(|id, node, world, visible| {
            if !visible {
                return;
            }
            let item = match &node.kind {
                NodeKind::Mesh(mesh) => Some(DrawItem {
                    node: id,
                    world: *world,
                    primitive: DrawPrimitive::Mesh(mesh.geometry.clone()),
                    material: Some(mesh.material.borrow().snapshot()),
                }),
                NodeKind::Points(cloud) => Some(DrawItem {
                    node: id,
                    world: *world,
                    primitive: DrawPrimitive::Points {
                        positions: cloud.positions.clone(),
                        colors: cloud.colors.clone(),
                    },
                    material: Some(cloud.material.borrow().snapshot()),
                }),
                NodeKind::Light(light) => {
                    let p = *world * Vector4::new(0.0, 0.0, 0.0, 1.0);
                    lights.push((*light, Vector3::new(p.x, p.y, p.z)));
                    None
                }
                NodeKind::Helper(Helper::Light { light, size }) => {
                    markers.push((id, *light, *size));
                    None
                }
                NodeKind::Helper(helper) => Some(DrawItem {
                    node: id,
                    world: *world,
                    primitive: DrawPrimitive::Lines(helper.local_segments()),
                    material: None,
                }),
                NodeKind::Group => None,
            };

            if let Some(item) = item {
                if item.is_transparent() {
                    transparent.push(item);
                } else {
                    opaque.push(item);
                }
            }
        });

        // Light markers follow their light, wherever it sits in the graph
        for (id, light_id, size) in markers {
            let light = scene.get(light_id).and_then(|n| n.as_light().copied());
            if let (Some(light), Ok(position)) = (light, scene.world_position(light_id)) {
                opaque.push(DrawItem {
                    node: id,
                    world: Matrix4::identity(),
                    primitive: DrawPrimitive::Lines(light_marker(position.into(), size, light.color())),
                    material: None,
                });
            }
        }

        opaque.extend(transparent);
        DrawList {
            items: opaque,
            lighting: summarize_lights(&lights),
            background: scene.background.to_array(),
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&DrawItem> {
        self.items.iter().find(|item| item.node == node)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn summarize_lights(lights: &[(Light, Vector3<f32>)]) -> LightingSummary {
    let mut summary = LightingSummary::default();
    let mut key: Option<(f32, [f32; 3], Vector3<f32>)> = None;

    let add = |target: &mut [f32; 3], c: [f32; 3], scale: f32| {
        for k in 0..3 {
            target[k] += c[k] * scale;
        }
    };

    for (light, position) in lights {
        let radiance = light.radiance().to_array();
        if light.is_ambient() {
            add(&mut summary.ambient, radiance, 1.0);
            continue;
        }
        let strength = radiance.iter().sum::<f32>();
        match key {
            Some((best, _, _)) if strength <= best => add(&mut summary.ambient, radiance, 0.25),
            Some((_, previous, _)) => {
                add(&mut summary.ambient, previous, 0.25);
                key = Some((strength, radiance, *position));
            }
            None => key = Some((strength, radiance, *position)),
        }
    }

    if let Some((_, color, position)) = key {
        summary.key_color = color;
        if position.magnitude2() > f32::EPSILON {
            summary.key_direction = position.normalize().into();
        }
    }
    summary
}
