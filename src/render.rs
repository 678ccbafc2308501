//! GPU rendering of a sketch scene.
//!
//! [`GpuRenderer`] is the wgpu [`Backend`]. Each frame it
//!
//! 1. writes the camera uniform
//! 2. uploads geometries that are new or changed since the last frame
//! 3. writes every material's uniform block
//! 4. asks the scene for instanced [`Batch`]es and draws them, opaque first
//!
//! GPU copies of geometries and materials that left the scene are dropped
//! at the end of the frame; [`Backend::dispose`] drops everything.

use std::{collections::HashMap, iter, ops::Range};

use anyhow::{Context as _, anyhow};
use wgpu::util::DeviceExt;

use crate::{
    camera::{Camera, CameraUniform},
    clock::SurfaceParams,
    color::Color,
    context::{Context, HEADLESS_FORMAT},
    data_structures::{
        scene_graph::{Batch, GeometryId, MaterialId, Scene},
        texture::Texture,
        vertex::SketchVertex,
    },
    pipelines::basic::{
        PipelineKey, mk_sketch_pipeline, mk_sketch_pipeline_layout, mk_sketch_shader,
        uniform_layout,
    },
    sketch::Backend,
};

/// Geometry buffers on the GPU, tagged with the scene version they mirror.
#[derive(Debug)]
struct GpuGeometry {
    version: u64,
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    lines: wgpu::Buffer,
    line_count: u32,
}

#[derive(Debug)]
struct GpuMaterial {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Depth and multisample attachments for one target size and format.
#[derive(Debug)]
struct Attachments {
    size: [u32; 2],
    format: wgpu::TextureFormat,
    depth: Texture,
    msaa: Option<Texture>,
}

/// One instanced draw, resolved against the GPU caches.
struct DrawCall {
    key: PipelineKey,
    geometry: GeometryId,
    material: MaterialId,
    instances: wgpu::Buffer,
    instance_count: u32,
    range: Option<Range<u32>>,
}

#[derive(Debug)]
pub struct GpuRenderer {
    pub ctx: Context,
    clear_color: Color,
    pixel_ratio: f32,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    geometries: HashMap<GeometryId, GpuGeometry>,
    materials: HashMap<MaterialId, GpuMaterial>,
    attachments: Option<Attachments>,
    /// Last frame of a headless renderer.
    offscreen: Option<Texture>,
    frames: u64,
}

impl GpuRenderer {
    pub fn new(ctx: Context) -> Self {
        let camera_uniform = CameraUniform::new();
        let camera_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout = uniform_layout(
            &ctx.device,
            wgpu::ShaderStages::VERTEX,
            "camera_bind_group_layout",
        );
        let camera_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        let material_layout = uniform_layout(
            &ctx.device,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            "material_bind_group_layout",
        );
        let pipeline_layout =
            mk_sketch_pipeline_layout(&ctx.device, &camera_layout, &material_layout);
        let shader = mk_sketch_shader(&ctx.device);

        Self {
            ctx,
            clear_color: Color::BLACK,
            pixel_ratio: 1.0,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            material_layout,
            pipeline_layout,
            shader,
            pipelines: HashMap::new(),
            geometries: HashMap::new(),
            materials: HashMap::new(),
            attachments: None,
            offscreen: None,
            frames: 0,
        }
    }

    /// A renderer without a window, drawing into an offscreen texture.
    pub async fn headless(
        width: u32,
        height: u32,
        attributes: crate::settings::Attributes,
    ) -> anyhow::Result<Self> {
        Ok(Self::new(Context::headless(width, height, attributes).await?))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn uploaded_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn uploaded_materials(&self) -> usize {
        self.materials.len()
    }

    /// Render `scene` offscreen at the current size and read it back.
    pub async fn capture(
        &mut self,
        scene: &Scene,
        camera: &Camera,
    ) -> anyhow::Result<image::RgbaImage> {
        let size = self.ctx.size();
        let target =
            Texture::create_capture_target(&self.ctx.device, size, HEADLESS_FORMAT, "capture");
        self.draw(scene, camera, &target.view, HEADLESS_FORMAT, size)?;
        read_texture(&self.ctx, &target).await
    }

    /// Read back the last headless frame.
    pub async fn read_frame(&self) -> anyhow::Result<image::RgbaImage> {
        let texture = self
            .offscreen
            .as_ref()
            .ok_or_else(|| anyhow!("nothing was rendered offscreen yet"))?;
        read_texture(&self.ctx, texture).await
    }

    fn sync_geometries(&mut self, scene: &Scene) {
        let device = &self.ctx.device;
        for id in scene.geometry_ids() {
            let (Some(geometry), Some(version)) = (scene.geometry(id), scene.geometry_version(id))
            else {
                continue;
            };
            if self.geometries.get(&id).is_some_and(|g| g.version == version) {
                continue;
            }
            let mut vertices = SketchVertex::interleave(geometry);
            let mut indices = geometry.indices.clone();
            let mut lines = geometry.line_indices();
            let (index_count, line_count) = (indices.len() as u32, lines.len() as u32);
            log::debug!(
                "upload geometry {:?} v{}: {} vertices, {} triangles",
                id,
                version,
                vertices.len(),
                geometry.triangle_count()
            );
            // Empty buffers cannot be bound; draws skip empty ranges anyway.
            if vertices.is_empty() {
                vertices.push(bytemuck::Zeroable::zeroed());
            }
            if indices.is_empty() {
                indices.push(0);
            }
            if lines.is_empty() {
                lines.push(0);
            }
            self.geometries.insert(
                id,
                GpuGeometry {
                    version,
                    vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Vertex Buffer"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Index Buffer"),
                        contents: bytemuck::cast_slice(&indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    index_count,
                    lines: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Line Index Buffer"),
                        contents: bytemuck::cast_slice(&lines),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    line_count,
                },
            );
        }
        self.geometries
            .retain(|id, _| scene.geometry(*id).is_some());
    }

    fn sync_materials(&mut self, scene: &Scene) {
        for (id, material) in scene.materials() {
            let uniform = material.to_uniform();
            match self.materials.get(&id) {
                Some(gpu) => {
                    self.ctx
                        .queue
                        .write_buffer(&gpu.buffer, 0, bytemuck::cast_slice(&[uniform]))
                }
                None => {
                    let buffer =
                        self.ctx
                            .device
                            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some("Material Buffer"),
                                contents: bytemuck::cast_slice(&[uniform]),
                                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                            });
                    let bind_group = self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                        layout: &self.material_layout,
                        entries: &[wgpu::BindGroupEntry {
                            binding: 0,
                            resource: buffer.as_entire_binding(),
                        }],
                        label: Some("material_bind_group"),
                    });
                    self.materials.insert(id, GpuMaterial { buffer, bind_group });
                }
            }
        }
        self.materials.retain(|id, _| scene.material(*id).is_some());
    }

    fn ensure_attachments(&mut self, format: wgpu::TextureFormat, size: [u32; 2]) {
        let sample_count = self.ctx.sample_count;
        if self
            .attachments
            .as_ref()
            .is_some_and(|a| a.size == size && a.format == format)
        {
            return;
        }
        let device = &self.ctx.device;
        self.attachments = Some(Attachments {
            size,
            format,
            depth: Texture::create_depth_texture(device, size, sample_count, "depth_texture"),
            msaa: (sample_count > 1).then(|| {
                Texture::create_msaa_target(device, size, format, sample_count, "msaa_texture")
            }),
        });
    }

    fn prepare_draws(&mut self, scene: &Scene, format: wgpu::TextureFormat) -> Vec<DrawCall> {
        let sample_count = self.ctx.sample_count;
        let mut draws = Vec::new();
        for Batch {
            geometry,
            material,
            group,
            instances,
            ..
        } in scene.batches()
        {
            let Some(descriptor) = scene.material(material) else {
                continue;
            };
            if instances.is_empty() {
                log::warn!("you attempted to render something with zero instances");
                continue;
            }
            let key = PipelineKey::for_material(descriptor, format, sample_count);
            if !self.pipelines.contains_key(&key) {
                log::debug!("create pipeline {:?}", key);
                let pipeline =
                    mk_sketch_pipeline(&self.ctx.device, &self.pipeline_layout, &self.shader, &key);
                self.pipelines.insert(key, pipeline);
            }
            let buffer = self
                .ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Instance Buffer"),
                    contents: bytemuck::cast_slice(&instances),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            draws.push(DrawCall {
                key,
                geometry,
                material,
                instances: buffer,
                instance_count: instances.len() as u32,
                range: group.map(|g| g.start..g.start + g.count),
            });
        }
        draws
    }

    /// Encode and submit one frame into `view`.
    fn draw(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        view: &wgpu::TextureView,
        format: wgpu::TextureFormat,
        size: [u32; 2],
    ) -> anyhow::Result<()> {
        self.camera_uniform.update_view_proj(camera);
        self.ctx.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
        self.sync_geometries(scene);
        self.sync_materials(scene);
        self.ensure_attachments(format, size);
        let draws = self.prepare_draws(scene, format);
        let attachments = self
            .attachments
            .as_ref()
            .ok_or_else(|| anyhow!("render attachments missing"))?;

        let (color_view, resolve_target) = match &attachments.msaa {
            Some(msaa) => (&msaa.view, Some(view)),
            None => (view, None),
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &attachments.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for draw in &draws {
                let (Some(pipeline), Some(geometry), Some(material)) = (
                    self.pipelines.get(&draw.key),
                    self.geometries.get(&draw.geometry),
                    self.materials.get(&draw.material),
                ) else {
                    continue;
                };
                let (index_buffer, range) = if draw.key.wireframe {
                    (&geometry.lines, 0..geometry.line_count)
                } else {
                    (
                        &geometry.indices,
                        draw.range.clone().unwrap_or(0..geometry.index_count),
                    )
                };
                if range.is_empty() {
                    continue;
                }
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &material.bind_group, &[]);
                render_pass.set_vertex_buffer(0, geometry.vertices.slice(..));
                render_pass.set_vertex_buffer(1, draw.instances.slice(..));
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(range, 0, 0..draw.instance_count);
            }
        }
        self.ctx.queue.submit(iter::once(encoder.finish()));
        self.frames += 1;
        Ok(())
    }

    fn render_to_surface(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()> {
        let Some(surface) = &self.ctx.surface else {
            return Err(anyhow!("renderer has no surface"));
        };
        let output = match surface.get_current_texture() {
            Ok(output) => output,
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let [width, height] = self.ctx.size();
                self.ctx.configure(width, height);
                log::warn!("surface lost, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(anyhow!("unable to acquire the next frame: {}", e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let format = self.ctx.format();
        let size = self.ctx.size();
        self.draw(scene, camera, &view, format, size)?;
        output.present();
        Ok(())
    }

    fn render_offscreen(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()> {
        let size = self.ctx.size();
        let format = self.ctx.format();
        if self.offscreen.as_ref().is_none_or(|t| t.size() != size) {
            self.offscreen = Some(Texture::create_capture_target(
                &self.ctx.device,
                size,
                format,
                "offscreen",
            ));
        }
        let texture = self
            .offscreen
            .take()
            .ok_or_else(|| anyhow!("offscreen target missing"))?;
        let result = self.draw(scene, camera, &texture.view, format, size);
        self.offscreen = Some(texture);
        result
    }
}

impl Backend for GpuRenderer {
    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn set_size(&mut self, surface: &SurfaceParams) {
        self.pixel_ratio = surface.pixel_ratio;
        let width = (surface.viewport_width as f32 * surface.pixel_ratio).round() as u32;
        let height = (surface.viewport_height as f32 * surface.pixel_ratio).round() as u32;
        self.ctx.configure(width, height);
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()> {
        if self.ctx.surface.is_some() {
            self.render_to_surface(scene, camera)
        } else {
            self.render_offscreen(scene, camera)
        }
    }

    fn dispose(&mut self) {
        log::debug!(
            "dispose {} geometries, {} materials, {} pipelines",
            self.geometries.len(),
            self.materials.len(),
            self.pipelines.len()
        );
        self.geometries.clear();
        self.materials.clear();
        self.pipelines.clear();
        self.attachments = None;
        self.offscreen = None;
    }
}

/// Copy a single-sampled texture into an image, dropping the row padding
/// wgpu requires for buffer copies.
async fn read_texture(ctx: &Context, texture: &Texture) -> anyhow::Result<image::RgbaImage> {
    let [width, height] = texture.size();
    let unpadded = 4 * width;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded = unpadded.div_ceil(align) * align;

    let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Capture Buffer"),
        size: (padded * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Capture Encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            aspect: wgpu::TextureAspect::All,
            texture: &texture.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::ImageCopyBuffer {
            buffer: &output_buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue.submit(iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = ctx.device.poll(wgpu::Maintain::Wait);
    rx.receive()
        .await
        .ok_or_else(|| anyhow!("capture buffer mapping was dropped"))?
        .context("cannot map the capture buffer")?;

    let mut pixels = Vec::with_capacity((unpadded * height) as usize);
    {
        let data = buffer_slice.get_mapped_range();
        for row in data.chunks_exact(padded as usize) {
            pixels.extend_from_slice(&row[..unpadded as usize]);
        }
    }
    output_buffer.unmap();

    let mut image = image::RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| anyhow!("capture size mismatch"))?;
    if matches!(
        texture.texture.format(),
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    ) {
        for pixel in image.pixels_mut() {
            pixel.0.swap(0, 2);
        }
    }
    Ok(image)
}
