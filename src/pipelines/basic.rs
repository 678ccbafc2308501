use crate::{
    data_structures::{
        instance::InstanceRaw,
        material::{Material, Side},
        texture::Texture,
        vertex::{SketchVertex, Vertex},
    },
    shading::SKETCH_SHADER,
};

/// Raster state that needs its own pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub side: Side,
    pub wireframe: bool,
    pub transparent: bool,
}

impl PipelineKey {
    pub fn for_material(
        material: &Material,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        Self {
            format,
            sample_count,
            side: material.side,
            wireframe: material.wireframe,
            transparent: material.transparent,
        }
    }

    fn topology(&self) -> wgpu::PrimitiveTopology {
        if self.wireframe {
            wgpu::PrimitiveTopology::LineList
        } else {
            wgpu::PrimitiveTopology::TriangleList
        }
    }

    fn cull_mode(&self) -> Option<wgpu::Face> {
        match (self.wireframe, self.side) {
            (false, Side::Front) => Some(wgpu::Face::Back),
            _ => None,
        }
    }

    fn blend(&self) -> wgpu::BlendState {
        if self.transparent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        }
    }
}

/// Uniform layout shared by the camera (group 0) and material (group 1) bindings.
pub fn uniform_layout(
    device: &wgpu::Device,
    visibility: wgpu::ShaderStages,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

pub fn mk_sketch_pipeline_layout(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    material_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Sketch Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, material_bind_group_layout],
        push_constant_ranges: &[],
    })
}

pub fn mk_sketch_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Sketch Shader"),
        source: wgpu::ShaderSource::Wgsl(SKETCH_SHADER.into()),
    })
}

/// The sketch pipeline for one raster state. Vertex buffers are the
/// interleaved [`SketchVertex`] stream followed by one [`InstanceRaw`] per mesh.
pub fn mk_sketch_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    key: &PipelineKey,
) -> wgpu::RenderPipeline {
    let label = format!("Sketch Pipeline {:?}", key);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(&label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[SketchVertex::desc(), InstanceRaw::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: key.format,
                blend: Some(key.blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: key.topology(),
            cull_mode: key.cull_mode(),
            ..Default::default()
        },
        // Transparent surfaces still test against depth but never occlude.
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: !key.transparent,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: key.sample_count,
            ..Default::default()
        },
        multiview: None,
    })
}
