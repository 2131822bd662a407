//! Render pipeline management system for wgpu
//!
//! Pipelines are described by a [`PipelineConfig`], registered by name and
//! created up front by [`PipelineManager::create_all_pipelines`].

use std::collections::HashMap;

use log::warn;
use wgpu::*;

use super::vertex::{ColorVertex, Vertex3D};

/// Vertex format a pipeline consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// [`Vertex3D`]: position and normal
    Mesh,
    /// [`ColorVertex`]: position and color
    Color,
}

impl VertexLayout {
    fn desc(self) -> VertexBufferLayout<'static> {
        match self {
            VertexLayout::Mesh => Vertex3D::desc(),
            VertexLayout::Color => ColorVertex::desc(),
        }
    }
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub vertex_layout: VertexLayout,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_write: bool,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "default".to_string(),
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            vertex_layout: VertexLayout::Mesh,
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: None,
            depth_format: None,
            depth_write: true,
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    /// Sets the shader for this pipeline (builder pattern)
    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// Sets the vertex and fragment entry points (builder pattern)
    pub fn with_entry_points(mut self, vertex: &str, fragment: &str) -> Self {
        self.vertex_entry = vertex.to_string();
        self.fragment_entry = fragment.to_string();
        self
    }

    pub fn with_vertex_layout(mut self, layout: VertexLayout) -> Self {
        self.vertex_layout = layout;
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Enables depth testing against a buffer of this format (builder pattern)
    pub fn with_depth(mut self, format: TextureFormat, write: bool) -> Self {
        self.depth_format = Some(format);
        self.depth_write = write;
        self
    }

    /// Single color target in `format` with optional blending (builder pattern)
    pub fn with_color_target(mut self, format: TextureFormat, blend: Option<BlendState>) -> Self {
        self.color_targets = vec![Some(ColorTargetState {
            format,
            blend,
            write_mask: ColorWrites::ALL,
        })];
        self
    }

    /// Sets primitive topology for this pipeline (builder pattern)
    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }
}

/// Manages named render pipelines and the shader modules they use
pub struct PipelineManager {
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new() -> Self {
        Self {
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Loads and compiles a WGSL shader module
    pub fn load_shader(&mut self, device: &Device, name: &str, source: &str) {
        let shader_module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Creates all pending pipelines immediately
    ///
    /// # Returns
    /// Result with vector of error messages if any pipelines failed to create
    pub fn create_all_pipelines(&mut self, device: &Device) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending = std::mem::take(&mut self.pending_pipelines);

        for name in pending {
            if let Some(config) = self.pipeline_configs.get(&name) {
                match self.create_pipeline_from_config(device, &name, config) {
                    Ok(pipeline) => {
                        self.pipelines.insert(name, pipeline);
                    }
                    Err(e) => {
                        warn!("Failed to create pipeline '{}': {}", name, e);
                        errors.push(format!("Pipeline '{}': {}", name, e));
                        self.pending_pipelines.push(name);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Gets a created pipeline
    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Creates a render pipeline from configuration
    fn create_pipeline_from_config(
        &self,
        device: &Device,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", name)),
            bind_group_layouts: &bind_group_layout_refs,
            push_constant_ranges: &[],
        });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: config.depth_write,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let vertex_buffers = [config.vertex_layout.desc()];

        Ok(device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some(&config.vertex_entry),
                buffers: &vertex_buffers,
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some(&config.fragment_entry),
                targets: &config.color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: config.primitive_topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        }))
    }

    /// Checks if a pipeline is registered
    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipeline_configs.contains_key(name)
    }
}

impl Default for PipelineManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = PipelineConfig::default()
            .with_label("Points")
            .with_entry_points("vs_color", "fs_color")
            .with_vertex_layout(VertexLayout::Color)
            .with_primitive_topology(PrimitiveTopology::PointList)
            .with_depth(TextureFormat::Depth32Float, false);
        assert_eq!(config.vertex_entry, "vs_color");
        assert_eq!(config.depth_format, Some(TextureFormat::Depth32Float));
        assert!(!config.depth_write);
    }

    #[test]
    fn test_register_marks_pipeline_known() {
        let mut manager = PipelineManager::new();
        manager.register_pipeline("Mesh", PipelineConfig::default());
        assert!(manager.has_pipeline("Mesh"));
        assert!(manager.get_pipeline("Mesh").is_none());
    }
}
