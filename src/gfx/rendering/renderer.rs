//! Rendering boundary
//!
//! The frame loop only talks to renderers through [`Renderer`]. The wgpu
//! [`RenderEngine`](super::RenderEngine) draws to a window;
//! [`HeadlessRenderer`] keeps the last draw list for inspection.

use crate::error::RenderError;
use crate::gfx::{
    camera::{camera_utils::CameraUniform, PerspectiveCamera},
    scene::Scene,
};

use super::draw_list::{DrawList, DrawPrimitive};

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: usize,
    pub triangles: usize,
    pub points: usize,
    pub lines: usize,
}

impl RenderStats {
    pub fn from_draw_list(list: &DrawList) -> Self {
        let mut stats = RenderStats::default();
        for item in &list.items {
            stats.draw_calls += 1;
            match &item.primitive {
                DrawPrimitive::Mesh(geometry) => stats.triangles += geometry.triangle_count(),
                DrawPrimitive::Points { positions, .. } => stats.points += positions.len(),
                DrawPrimitive::Lines(segments) => stats.lines += segments.len(),
            }
        }
        stats
    }
}

pub trait Renderer {
    /// Draws the scene as seen by `camera`
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<RenderStats, RenderError>;

    /// Matches the output size to a resized viewport
    fn resize(&mut self, width: u32, height: u32);
}

/// Renderer without a GPU, for tests and tooling
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub last_frame: Option<DrawList>,
    pub last_camera: Option<CameraUniform>,
    pub frames_rendered: u64,
    pub size: (u32, u32),
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<RenderStats, RenderError> {
        let list = scene.draw_list();
        let stats = RenderStats::from_draw_list(&list);
        self.last_frame = Some(list);
        self.last_camera = Some(camera.uniform());
        self.frames_rendered += 1;
        Ok(stats)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::GeometryDesc,
        helpers::Helper,
        resources::material::{Color, Material, MaterialHandle},
        scene::{Node, PointCloud},
    };
    use std::rc::Rc;

    #[test]
    fn test_headless_counts_primitives() {
        let mut scene = Scene::new();
        let material = MaterialHandle::new(Material::basic(Color::WHITE));
        scene.add(Node::mesh("cube", Rc::new(GeometryDesc::cube(1.0).build()), material));
        scene.add(Node::points(
            "stars",
            PointCloud::new(vec![[0.0; 3]; 5], MaterialHandle::new(Material::points(0.1))),
        ));
        scene.add(Node::helper("axes", Helper::Axes { size: 1.0 }));

        let mut renderer = HeadlessRenderer::new(800, 600);
        let camera = PerspectiveCamera::new(75.0, 800.0 / 600.0, 0.1, 100.0);
        let stats = renderer.render(&scene, &camera).unwrap();

        assert_eq!(
            stats,
            RenderStats {
                draw_calls: 3,
                triangles: 12,
                points: 5,
                lines: 3,
            }
        );
        assert_eq!(renderer.frames_rendered, 1);
    }

    #[test]
    fn test_headless_resize_ignores_zero() {
        let mut renderer = HeadlessRenderer::new(800, 600);
        renderer.resize(0, 600);
        assert_eq!(renderer.size, (800, 600));
        renderer.resize(1024, 768);
        assert_eq!(renderer.size, (1024, 768));
    }
}
