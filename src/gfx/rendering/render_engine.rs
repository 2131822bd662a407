//! WGPU-based rendering engine
//!
//! Owns the surface, device and pipelines, and turns a [`DrawList`] into one
//! forward render pass with an optional overlay (the debug panel) on top.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};
use wgpu::util::DeviceExt;
use wgpu::TextureFormat;

use crate::error::RenderError;
use crate::gfx::{
    camera::{camera_utils::convert_matrix4_to_array, PerspectiveCamera},
    geometry::GeometryData,
    resources::{global_bindings::GlobalBindings, texture_resource::DepthTexture},
    scene::{NodeId, Scene},
};
use crate::wgpu_utils::{binding_types, StreamBuffer, UniformBuffer};

use super::draw_list::{DrawItem, DrawList, DrawPrimitive};
use super::pipeline_manager::{PipelineConfig, PipelineManager, VertexLayout};
use super::renderer::{RenderStats, Renderer};
use super::vertex::ColorVertex;

const MESH: &str = "Mesh";
const MESH_BLEND: &str = "MeshBlend";
const WIREFRAME: &str = "Wireframe";
const LINES: &str = "Lines";
const POINTS: &str = "Points";

/// Per-draw uniform block, matches `Object` in shader.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectContent {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl ObjectContent {
    pub fn from_item(item: &DrawItem) -> Self {
        let (color, params) = match item.material {
            Some(m) => (
                [m.color[0], m.color[1], m.color[2], m.opacity],
                [
                    m.shading.shader_id() as f32,
                    m.metalness.unwrap_or(0.0),
                    m.roughness.unwrap_or(1.0),
                    m.point_size.unwrap_or(1.0),
                ],
            ),
            None => ([1.0; 4], [0.0, 0.0, 1.0, 1.0]),
        };
        Self {
            model: convert_matrix4_to_array(item.world),
            color,
            params,
        }
    }
}

/// CPU-side colored vertices for point and line primitives
pub fn color_vertices(item: &DrawItem) -> Vec<ColorVertex> {
    match &item.primitive {
        DrawPrimitive::Points { positions, colors } => {
            let base = item.material.map(|m| m.color).unwrap_or([1.0; 3]);
            let per_vertex = item
                .material
                .filter(|m| m.vertex_colors)
                .and(colors.as_ref());
            positions
                .iter()
                .enumerate()
                .map(|(i, &position)| {
                    let tint = per_vertex
                        .and_then(|c| c.get(i).copied())
                        .unwrap_or([1.0; 3]);
                    ColorVertex {
                        position,
                        color: [base[0] * tint[0], base[1] * tint[1], base[2] * tint[2]],
                    }
                })
                .collect()
        }
        DrawPrimitive::Lines(segments) => segments
            .iter()
            .flat_map(|s| {
                let color = s.color.to_array();
                [
                    ColorVertex {
                        position: s.from,
                        color,
                    },
                    ColorVertex {
                        position: s.to,
                        color,
                    },
                ]
            })
            .collect(),
        DrawPrimitive::Mesh(_) => Vec::new(),
    }
}

struct ObjectBinding {
    ubo: UniformBuffer<ObjectContent>,
    bind_group: wgpu::BindGroup,
}

/// Uploaded mesh; holds the geometry so its address stays unique while cached
struct GeometryBuffers {
    geometry: Rc<GeometryData>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    wire_buffer: wgpu::Buffer,
    wire_count: u32,
}

impl GeometryBuffers {
    fn new(device: &wgpu::Device, geometry: &Rc<GeometryData>) -> Self {
        let vertices = geometry.to_vertices();
        let wire = geometry.wireframe_indices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let wire_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Wireframe Buffer"),
            contents: bytemuck::cast_slice(&wire),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            geometry: geometry.clone(),
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            wire_buffer,
            wire_count: wire.len() as u32,
        }
    }
}

fn geometry_key(geometry: &Rc<GeometryData>) -> usize {
    Rc::as_ptr(geometry) as usize
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
    objects: HashMap<NodeId, ObjectBinding>,
    geometries: HashMap<usize, GeometryBuffers>,
    streams: HashMap<NodeId, StreamBuffer<ColorVertex>>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `vsync` - Present in sync with the display refresh rate
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        debug!("Using adapter {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8Unorm);
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, &config, "depth_texture");
        let global_bindings = GlobalBindings::new(&device);
        let object_layout = binding_types::single_uniform_layout(
            &device,
            "Object Bind Group Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );

        let mut pipeline_manager = PipelineManager::new();
        pipeline_manager.load_shader(&device, "default", include_str!("shader.wgsl"));

        let layouts = vec![
            global_bindings.bind_group_layout().clone(),
            object_layout.clone(),
        ];
        let base = PipelineConfig::default()
            .with_shader("default")
            .with_bind_group_layouts(layouts)
            .with_depth(DepthTexture::DEPTH_FORMAT, true);
        let alpha = Some(wgpu::BlendState::ALPHA_BLENDING);

        pipeline_manager.register_pipeline(
            MESH,
            base.clone()
                .with_label("MESH")
                .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager.register_pipeline(
            MESH_BLEND,
            base.clone()
                .with_label("MESH BLEND")
                .with_depth(DepthTexture::DEPTH_FORMAT, false)
                .with_color_target(format, alpha),
        );
        pipeline_manager.register_pipeline(
            WIREFRAME,
            base.clone()
                .with_label("WIREFRAME")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_color_target(format, alpha),
        );
        pipeline_manager.register_pipeline(
            LINES,
            base.clone()
                .with_label("LINES")
                .with_entry_points("vs_color", "fs_color")
                .with_vertex_layout(VertexLayout::Color)
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager.register_pipeline(
            POINTS,
            base.with_label("POINTS")
                .with_entry_points("vs_color", "fs_color")
                .with_vertex_layout(VertexLayout::Color)
                .with_primitive_topology(wgpu::PrimitiveTopology::PointList)
                .with_depth(DepthTexture::DEPTH_FORMAT, false)
                .with_color_target(format, alpha),
        );

        pipeline_manager
            .create_all_pipelines(&device)
            .map_err(RenderError::Pipeline)?;

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_bindings,
            object_layout,
            objects: HashMap::new(),
            geometries: HashMap::new(),
            streams: HashMap::new(),
        })
    }

    /// Uploads uniforms and buffers for every item in the list
    fn prepare(&mut self, list: &DrawList) {
        for item in &list.items {
            let binding = self.objects.entry(item.node).or_insert_with(|| {
                let ubo = UniformBuffer::new(&self.device);
                let bind_group = binding_types::single_uniform_bind_group(
                    &self.device,
                    "Object Bind Group",
                    &self.object_layout,
                    ubo.binding_resource(),
                );
                ObjectBinding { ubo, bind_group }
            });
            binding
                .ubo
                .update_content(&self.queue, ObjectContent::from_item(item));

            match &item.primitive {
                DrawPrimitive::Mesh(geometry) => {
                    let device = &self.device;
                    self.geometries
                        .entry(geometry_key(geometry))
                        .or_insert_with(|| GeometryBuffers::new(device, geometry));
                }
                DrawPrimitive::Points { .. } | DrawPrimitive::Lines(_) => {
                    let vertices = color_vertices(item);
                    match self.streams.get_mut(&item.node) {
                        Some(stream) => stream.write(&self.device, &self.queue, &vertices),
                        None => {
                            self.streams
                                .insert(item.node, StreamBuffer::new(&self.device, &vertices));
                        }
                    }
                }
            }
        }

        // Drop meshes nothing in the scene refers to any more
        self.geometries
            .retain(|_, buffers| Rc::strong_count(&buffers.geometry) > 1);
    }

    /// Renders a frame with an overlay drawn after the scene
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_with_overlay<F>(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        overlay: Option<F>,
    ) -> Result<RenderStats, RenderError>
    where
        F: FnOnce(
            &wgpu::Device,
            &wgpu::Queue,
            &mut wgpu::CommandEncoder,
            &wgpu::TextureView,
        ) -> Result<(), RenderError>,
    {
        let list = scene.draw_list();
        self.global_bindings
            .update(&self.queue, camera.uniform(), &list.lighting);
        self.prepare(&list);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(RenderStats::default());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
                return Ok(RenderStats::default());
            }
            Err(e) => return Err(e.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut stats = RenderStats::default();
        {
            let [r, g, b] = list.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for item in &list.items {
                let Some(binding) = self.objects.get(&item.node) else {
                    continue;
                };
                match &item.primitive {
                    DrawPrimitive::Mesh(geometry) => {
                        let Some(buffers) = self.geometries.get(&geometry_key(geometry)) else {
                            continue;
                        };
                        let wireframe = item.material.map(|m| m.wireframe).unwrap_or(false);
                        let (name, index_buffer, count) = if wireframe {
                            (WIREFRAME, &buffers.wire_buffer, buffers.wire_count)
                        } else if item.is_transparent() {
                            (MESH_BLEND, &buffers.index_buffer, buffers.index_count)
                        } else {
                            (MESH, &buffers.index_buffer, buffers.index_count)
                        };
                        let Some(pipeline) = self.pipeline_manager.get_pipeline(name) else {
                            continue;
                        };
                        if count == 0 {
                            continue;
                        }
                        render_pass.set_pipeline(pipeline);
                        render_pass.set_bind_group(1, &binding.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
                        render_pass
                            .set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..count, 0, 0..1);
                        stats.draw_calls += 1;
                        stats.triangles += geometry.triangle_count();
                    }
                    DrawPrimitive::Points { .. } | DrawPrimitive::Lines(_) => {
                        let (name, is_points) = match item.primitive {
                            DrawPrimitive::Points { .. } => (POINTS, true),
                            _ => (LINES, false),
                        };
                        let (Some(pipeline), Some(stream)) = (
                            self.pipeline_manager.get_pipeline(name),
                            self.streams.get(&item.node),
                        ) else {
                            continue;
                        };
                        if stream.is_empty() {
                            continue;
                        }
                        render_pass.set_pipeline(pipeline);
                        render_pass.set_bind_group(1, &binding.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, stream.buffer().slice(..));
                        render_pass.draw(0..stream.len() as u32, 0..1);
                        stats.draw_calls += 1;
                        if is_points {
                            stats.points += stream.len();
                        } else {
                            stats.lines += stream.len() / 2;
                        }
                    }
                }
            }
        }

        if let Some(overlay) = overlay {
            overlay(&self.device, &self.queue, &mut encoder, &surface_texture_view)?;
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(stats)
    }

    /// Resizes the render engine surface and recreates depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    ///
    /// # Arguments
    /// * `width` - New surface width in pixels
    /// * `height` - New surface height in pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions
    ///
    /// # Returns
    /// Tuple of (width, height) in pixels
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Set VSync (vertical synchronization) state
    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = present_mode(enable);
        self.surface.configure(&self.device, &self.config);
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

impl Renderer for RenderEngine {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<RenderStats, RenderError> {
        self.render_with_overlay(
            scene,
            camera,
            None::<
                fn(
                    &wgpu::Device,
                    &wgpu::Queue,
                    &mut wgpu::CommandEncoder,
                    &wgpu::TextureView,
                ) -> Result<(), RenderError>,
            >,
        )
    }

    fn resize(&mut self, width: u32, height: u32) {
        RenderEngine::resize(self, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        helpers::Helper,
        resources::material::{Color, Material, MaterialHandle},
        scene::{Node, PointCloud},
    };

    #[test]
    fn test_object_content_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<ObjectContent>(), 96);
    }

    #[test]
    fn test_point_colors_tint_material_color() {
        let mut scene = Scene::new();
        let material = MaterialHandle::new(
            Material::points(0.1)
                .with_color(Color::new(1.0, 0.5, 1.0))
                .with_vertex_colors(),
        );
        let mut cloud = PointCloud::new(vec![[0.0; 3], [1.0; 3]], material);
        cloud.colors = Some(vec![[0.5, 1.0, 1.0], [1.0, 1.0, 0.0]]);
        let id = scene.add(Node::points("stars", cloud));

        let list = scene.draw_list();
        let vertices = color_vertices(list.get(id).unwrap());
        assert_eq!(vertices[0].color, [0.5, 0.5, 1.0]);
        assert_eq!(vertices[1].color, [1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_line_vertices_come_in_pairs() {
        let mut scene = Scene::new();
        let id = scene.add(Node::helper("axes", Helper::Axes { size: 2.0 }));
        let list = scene.draw_list();
        let vertices = color_vertices(list.get(id).unwrap());
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[1].position, [2.0, 0.0, 0.0]);
        assert_eq!(vertices[1].color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_object_content_carries_material_params() {
        let mut scene = Scene::new();
        let material = MaterialHandle::new(Material::standard(Color::WHITE, 0.3, 0.6).with_opacity(0.5));
        let id = scene.add(Node::mesh(
            "sphere",
            Rc::new(crate::gfx::geometry::GeometryDesc::sphere(0.5, 8, 8).build()),
            material,
        ));
        let list = scene.draw_list();
        let content = ObjectContent::from_item(list.get(id).unwrap());
        assert_eq!(content.color[3], 0.5);
        assert_eq!(content.params, [4.0, 0.3, 0.6, 1.0]);
    }
}
