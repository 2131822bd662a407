//! Global uniform bindings for camera and scene lighting
//!
//! Per-frame data shared by every draw: the camera matrices and a reduced
//! view of the scene's lights. Bound to slot 0 in all render pipelines.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, rendering::draw_list::LightingSummary},
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Global uniform buffer content structure
///
/// MUST match the Globals struct in shader.wgsl exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsContent {
    view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    ambient: [f32; 4],
    /// Direction towards the key light
    light_dir: [f32; 4],
    light_color: [f32; 4],
}

impl GlobalsContent {
    pub fn new(camera: CameraUniform, lighting: &LightingSummary) -> Self {
        let [ax, ay, az] = lighting.ambient;
        let [dx, dy, dz] = lighting.key_direction;
        let [cx, cy, cz] = lighting.key_color;
        Self {
            view_proj: camera.view_proj,
            view_position: camera.view_position,
            ambient: [ax, ay, az, 1.0],
            light_dir: [dx, dy, dz, 0.0],
            light_color: [cx, cy, cz, 1.0],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalsContent>;

/// Layout, buffer and bind group for the global uniforms
pub struct GlobalBindings {
    layout: wgpu::BindGroupLayout,
    ubo: GlobalUBO,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = binding_types::single_uniform_layout(
            device,
            "Globals Bind Group Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let ubo = GlobalUBO::new(device);
        let bind_group = binding_types::single_uniform_bind_group(
            device,
            "Globals Bind Group",
            &layout,
            ubo.binding_resource(),
        );

        GlobalBindings {
            layout,
            ubo,
            bind_group,
        }
    }

    /// Uploads this frame's camera and lighting
    pub fn update(&mut self, queue: &wgpu::Queue, camera: CameraUniform, lighting: &LightingSummary) {
        self.ubo.update_content(queue, GlobalsContent::new(camera, lighting));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<GlobalsContent>(), 128);
    }

    #[test]
    fn test_content_carries_lighting() {
        let lighting = LightingSummary {
            ambient: [0.5, 0.5, 0.5],
            key_direction: [0.0, 1.0, 0.0],
            key_color: [1.0, 0.0, 0.0],
        };
        let content = GlobalsContent::new(CameraUniform::default(), &lighting);
        assert_eq!(content.light_dir, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(content.ambient[3], 1.0);
    }
}
