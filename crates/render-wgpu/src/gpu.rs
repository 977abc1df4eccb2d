use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use meadow_common::{Color, Viewport};
use meadow_render::{
    ColorSpace, Frame, RenderError, RenderInfo, Renderer, RendererSettings, ToneMapping, Vertex,
    box_mesh, visible_meshes,
};
use meadow_scene::{Geometry, Light, Material, Scene};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::overlay::{GuiFrame, GuiOverlay};
use crate::shaders;
use crate::targets::{DEPTH_FORMAT, HDR_FORMAT, HdrTargets};
use crate::textures::TextureCache;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    ambient: [f32; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    fog_color: [f32; 4],
    fog: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PostUniforms {
    params: [f32; 4],
}

fn rgb4(color: Color, scale: f32) -> [f32; 4] {
    [color.r * scale, color.g * scale, color.b * scale, 1.0]
}

fn globals_for(frame: &Frame<'_>) -> Globals {
    let scene = frame.scene;
    let ambient = scene.ambient_lights().fold(Vec3::ZERO, |acc, light| match light {
        Light::Ambient { color, intensity } => acc + Vec3::from(color.to_array()) * *intensity,
        Light::Directional { .. } => acc,
    });
    // One directional light is supported; extra ones are ignored.
    let (light_dir, light_color) = match scene.directional_lights().next() {
        Some(&Light::Directional {
            color,
            intensity,
            position,
            target,
        }) => {
            let dir = (target - position).try_normalize().unwrap_or(Vec3::NEG_Y);
            ([dir.x, dir.y, dir.z, 1.0], rgb4(color, intensity))
        }
        _ => ([0.0, -1.0, 0.0, 0.0], [0.0; 4]),
    };
    let (fog_color, fog) = match scene.fog {
        Some(f) => (
            rgb4(f.color, 1.0),
            [f.density as f32, 1.0, frame.uniforms.time() as f32, 0.0],
        ),
        None => ([0.0; 4], [0.0, 0.0, frame.uniforms.time() as f32, 0.0]),
    };
    Globals {
        view_proj: frame.camera.view_projection().to_cols_array_2d(),
        view: frame.camera.view_matrix().to_cols_array_2d(),
        ambient: [ambient.x, ambient.y, ambient.z, 1.0],
        light_dir,
        light_color,
        fog_color,
        fog,
    }
}

fn material_params(material: &Material, has_texture: bool) -> [f32; 4] {
    let kind = match material {
        Material::Basic { .. } => 0.0,
        Material::Matcap { .. } => 1.0,
        Material::Lambert { .. } => 2.0,
    };
    [kind, if has_texture { 1.0 } else { 0.0 }, 0.0, 0.0]
}

fn clear_color(scene: &Scene) -> wgpu::Color {
    // Alpha 0 marks background pixels so the post pass leaves them alone.
    match scene.background {
        Some(c) => wgpu::Color {
            r: f64::from(c.r),
            g: f64::from(c.g),
            b: f64::from(c.b),
            a: 0.0,
        },
        None => wgpu::Color::TRANSPARENT,
    }
}

fn post_params(settings: &RendererSettings, surface_is_srgb: bool, opaque: bool) -> PostUniforms {
    let tone_map = settings.tone_mapping == ToneMapping::AcesFilmic;
    let encode = settings.output_color_space == ColorSpace::Srgb && !surface_is_srgb;
    PostUniforms {
        params: [
            settings.tone_mapping_exposure,
            if tone_map { 1.0 } else { 0.0 },
            if encode { 1.0 } else { 0.0 },
            if opaque { 1.0 } else { 0.0 },
        ],
    }
}

struct GpuMesh {
    geometry: Geometry,
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

/// Growable uniform buffer addressed with dynamic offsets, one slot per draw.
struct ObjectSlots {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u64,
}

impl ObjectSlots {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, stride: u64, capacity: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_uniforms"),
            size: stride * capacity,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
                }),
            }],
        });
        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }
}

fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// wgpu renderer bound to a window surface.
///
/// The scene is drawn into an HDR target at drawing-buffer size, tone mapped
/// onto the surface, then an optional egui overlay is drawn on top.
pub struct WgpuRenderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    surface_ready: bool,
    settings: RendererSettings,
    size: Viewport,
    pixel_ratio: f64,
    info: RenderInfo,
    sample_count: u32,
    scene_pipeline: wgpu::RenderPipeline,
    post_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    objects: ObjectSlots,
    post_layout: wgpu::BindGroupLayout,
    post_buffer: wgpu::Buffer,
    post_sampler: wgpu::Sampler,
    targets: Option<HdrTargets>,
    meshes: Vec<GpuMesh>,
    textures: TextureCache,
    overlay: GuiOverlay,
    gui: Option<GuiFrame>,
}

impl WgpuRenderer {
    /// Create a renderer for `window`, blocking until the device is ready.
    pub fn new(window: Arc<Window>, settings: RendererSettings) -> Result<Self, RenderError> {
        pollster::block_on(Self::new_async(window, settings))
    }

    pub async fn new_async(
        window: Arc<Window>,
        settings: RendererSettings,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::Surface(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("meadow_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let physical = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: physical.width.max(1),
            height: physical.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        let surface_ready = physical.width > 0 && physical.height > 0;
        if surface_ready {
            surface.configure(&device, &config);
        }

        let msaa_supported = adapter
            .get_texture_format_features(HDR_FORMAT)
            .flags
            .sample_count_supported(4);
        let sample_count = if settings.antialias && msaa_supported { 4 } else { 1 };

        // Globals (group 0).
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // Per-object uniforms (group 1).
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });
        let stride = aligned_stride(
            std::mem::size_of::<ObjectUniforms>() as u64,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let objects = ObjectSlots::new(&device, &object_layout, stride, 16);

        // Material textures (group 2).
        let textures = TextureCache::new(&device, &queue);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });
        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &object_layout, textures.layout()],
            push_constant_ranges: &[],
        });
        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&scene_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_scene"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_scene"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        // Post pass.
        let post_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let post_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("post_uniforms"),
            contents: bytemuck::bytes_of(&post_params(&settings, format.is_srgb(), true)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let post_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::POST_SHADER.into()),
        });
        let post_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_pipeline_layout"),
            bind_group_layouts: &[&post_layout],
            push_constant_ranges: &[],
        });
        let post_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("post_pipeline"),
            layout: Some(&post_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &post_shader,
                entry_point: Some("vs_fullscreen"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &post_shader,
                entry_point: Some("fs_post"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: Default::default(),
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let overlay = GuiOverlay::new(&device, format);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?format,
            sample_count,
            "GPU renderer initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            surface_ready,
            settings,
            size: Viewport::new(physical.width, physical.height),
            pixel_ratio: 1.0,
            info: RenderInfo::default(),
            sample_count,
            scene_pipeline,
            post_pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            objects,
            post_layout,
            post_buffer,
            post_sampler,
            targets: None,
            meshes: Vec::new(),
            textures,
            overlay,
            gui: None,
        })
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Queue egui output to be drawn over the next frame. Texture changes of
    /// a frame that was never drawn are carried over.
    pub fn set_gui(&mut self, frame: GuiFrame) {
        self.gui = Some(frame.absorb(self.gui.take()));
    }

    /// Match the surface to the window's physical size. Zero sizes are skipped.
    fn configure_surface(&mut self) {
        let physical = self.window.inner_size();
        if physical.width == 0 || physical.height == 0 {
            self.surface_ready = false;
            tracing::debug!("window has zero size; surface left unconfigured");
            return;
        }
        self.config.width = physical.width;
        self.config.height = physical.height;
        self.surface.configure(&self.device, &self.config);
        self.surface_ready = true;
    }

    fn ensure_targets(&mut self, size: (u32, u32)) {
        let stale = self
            .targets
            .as_ref()
            .is_none_or(|t| (t.width, t.height) != size);
        if stale {
            self.targets = Some(HdrTargets::new(
                &self.device,
                size,
                self.sample_count,
                &self.post_layout,
                &self.post_sampler,
                &self.post_buffer,
            ));
        }
    }

    fn ensure_object_slots(&mut self, count: u64) {
        if count <= self.objects.capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        self.objects = ObjectSlots::new(&self.device, &self.object_layout, self.objects.stride, capacity);
    }

    fn mesh_index(&mut self, geometry: &Geometry) -> usize {
        if let Some(i) = self.meshes.iter().position(|m| m.geometry == *geometry) {
            return i;
        }
        let (vertices, indices) = box_mesh(geometry);
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.meshes.push(GpuMesh {
            geometry: *geometry,
            vertices: vertex_buffer,
            indices: index_buffer,
            index_count: indices.len() as u32,
        });
        self.meshes.len() - 1
    }

    fn acquire(&mut self) -> Result<wgpu::SurfaceTexture, RenderError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                tracing::warn!("surface {e}; reconfiguring");
                self.configure_surface();
                Err(RenderError::Frame(e.to_string()))
            }
            Err(e) => Err(RenderError::Frame(e.to_string())),
        }
    }
}

impl Renderer for WgpuRenderer {
    type Error = RenderError;

    fn set_size(&mut self, size: Viewport) {
        self.size = size;
        self.configure_surface();
    }

    fn size(&self) -> Viewport {
        self.size
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.info.begin_frame();
        let buffer = self.drawing_buffer_size();
        if !self.surface_ready || buffer.0 == 0 || buffer.1 == 0 {
            return Ok(());
        }

        self.textures.sync(&self.device, &self.queue, frame.textures);
        self.ensure_targets(buffer);

        // Gather draws: mesh geometry index, material texture, uniforms.
        let mut draws = Vec::new();
        for mesh in visible_meshes(frame.scene, frame.camera) {
            let mesh_index = self.mesh_index(&mesh.geometry);
            let texture = mesh.material.texture_names().next().map(str::to_string);
            draws.push((mesh_index, texture, mesh));
        }
        self.ensure_object_slots(draws.len() as u64);

        let stride = self.objects.stride as usize;
        let mut slots = vec![0u8; stride * draws.len()];
        for (i, (_, texture, mesh)) in draws.iter().enumerate() {
            let (_, has_texture) = self.textures.bind_group(texture.as_deref());
            let uniforms = ObjectUniforms {
                model: mesh.transform.matrix().to_cols_array_2d(),
                color: rgb4(mesh.material.color(), 1.0),
                params: material_params(&mesh.material, has_texture),
            };
            let bytes = bytemuck::bytes_of(&uniforms);
            slots[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !slots.is_empty() {
            self.queue.write_buffer(&self.objects.buffer, 0, &slots);
        }
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals_for(frame)));
        let opaque = frame.scene.background.is_some() || !self.settings.alpha;
        self.queue.write_buffer(
            &self.post_buffer,
            0,
            bytemuck::bytes_of(&post_params(&self.settings, self.config.format.is_srgb(), opaque)),
        );

        let output = self.acquire()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        let Some(targets) = self.targets.as_ref() else {
            return Err(RenderError::Frame("HDR targets missing".into()));
        };
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(targets.scene_attachment(clear_color(frame.scene)))],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.scene_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (i, (mesh_index, texture, mesh)) in draws.iter().enumerate() {
                let gpu = &self.meshes[*mesh_index];
                let (texture_group, _) = self.textures.bind_group(texture.as_deref());
                pass.set_bind_group(1, &self.objects.bind_group, &[(i * stride) as u32]);
                pass.set_bind_group(2, texture_group, &[]);
                pass.set_vertex_buffer(0, gpu.vertices.slice(..));
                pass.set_index_buffer(gpu.indices.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
                self.info.record_draw(mesh.geometry.triangle_count());
            }
        }
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("post_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.post_pipeline);
            pass.set_bind_group(0, &targets.post_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        let gui = self.gui.take();
        if let Some(gui) = &gui {
            self.overlay.draw(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_view,
                [self.config.width, self.config.height],
                gui,
            );
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        if let Some(gui) = &gui {
            self.overlay.free(gui);
        }
        self.window.pre_present_notify();
        output.present();
        Ok(())
    }

    fn info(&self) -> &RenderInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use meadow_assets::TextureRegistry;
    use meadow_scene::{FogExp2, PerspectiveCamera, Uniforms};

    #[test]
    fn uniform_layouts_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 96);
        assert_eq!(std::mem::size_of::<PostUniforms>(), 16);
    }

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(96, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(300, 256), 512);
    }

    #[test]
    fn background_clears_with_zero_alpha() {
        let mut scene = Scene::new();
        assert_eq!(clear_color(&scene), wgpu::Color::TRANSPARENT);
        scene.background = Some(Color::from_hex(0x2d2d2d));
        let c = clear_color(&scene);
        assert_eq!(c.a, 0.0);
        assert!((c.r - f64::from(Color::from_hex(0x2d2d2d).r)).abs() < 1e-9);
    }

    #[test]
    fn post_params_follow_settings() {
        let s = RendererSettings::default();
        assert_eq!(post_params(&s, true, true).params, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(post_params(&s, false, false).params, [1.0, 1.0, 1.0, 0.0]);
        let linear = RendererSettings {
            tone_mapping: ToneMapping::None,
            output_color_space: ColorSpace::Linear,
            ..s
        };
        assert_eq!(post_params(&linear, false, true).params, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn globals_pack_lights_and_fog() {
        let mut scene = Scene::new();
        scene.fog = Some(FogExp2::new(Color::from_hex(0x2d2d2d), 0.0007));
        scene.add(Light::ambient(Color::WHITE, 0.5));
        scene.add(Light::directional(Color::WHITE, 0.5, Vec3::splat(10.0)));
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        let mut uniforms = Uniforms::new();
        uniforms.advance_time(2.0);
        let textures = TextureRegistry::new();
        let g = globals_for(&Frame {
            scene: &scene,
            camera: &camera,
            uniforms: &uniforms,
            textures: &textures,
        });
        assert_eq!(g.ambient, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(g.light_dir[3], 1.0);
        assert!(g.light_dir[1] < 0.0);
        assert_eq!(g.fog[0], 0.0007_f32);
        assert_eq!(g.fog[1], 1.0);
        assert_eq!(g.fog[2], 2.0);
        assert_eq!(
            Mat4::from_cols_array_2d(&g.view_proj),
            camera.view_projection()
        );
    }

    #[test]
    fn material_kinds() {
        let matcap = Material::Matcap {
            color: Color::WHITE,
            matcap: None,
        };
        assert_eq!(material_params(&matcap, false), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            material_params(&Material::Lambert { color: Color::WHITE }, true)[0],
            2.0
        );
    }
}
