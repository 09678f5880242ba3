use anyhow::Result;
use bytemuck::Zeroable;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::assets;
use crate::camera::OrbitCamera;
use crate::context::{RenderContext, Viewport};
use crate::core::texture::Texture;
use crate::core::uniforms::{CameraUniform, MaterialUniforms};
use crate::core::GpuContext;
use crate::frame::FrameInfo;
use crate::geometry::mesh::{mesh_vertex_layout, Mesh};
use crate::geometry::particles::particle_instance_layout;
use crate::scene::SceneGeometry;

/// Background color #05233c, converted to linear
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.001518,
    g: 0.016807,
    b: 0.045186,
    a: 1.0,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Billboard corners for the particle quad, expanded as a triangle strip
const PARTICLE_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];

/// One shader pipeline plus its uniform block and texture bindings
struct Material {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct MeshDraw {
    material: Material,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct ParticleDraw {
    material: Material,
    corner_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
}

/// The whole rendered scene: surface, camera buffer, and the three
/// materials. Everything is allocated once here and lives until exit.
pub struct Sketch {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    quad: MeshDraw,
    tube: MeshDraw,
    particles: ParticleDraw,
    overlay: Option<SettingsOverlay>,
}

impl Sketch {
    pub async fn new(
        window: Arc<Window>,
        viewport: &Viewport,
        scene: &SceneGeometry,
        with_gui: bool,
    ) -> Result<Self> {
        let (gpu, surface) = GpuContext::for_window(window.clone()).await?;
        let device = gpu.device();

        let (width, height) = viewport.physical_size();
        let surface_config = create_surface_config(&surface, &gpu, width, height);
        surface.configure(device, &surface_config);
        let depth_view = create_depth_view(device, width, height);

        // Static image assets; the tube/caustics patterns tile infinitely.
        let sphere_normal = Texture::from_path(
            &gpu,
            &assets::asset_path(assets::SPHERE_NORMAL),
            wgpu::AddressMode::ClampToEdge,
        )?;
        let dots = Texture::from_path(
            &gpu,
            &assets::asset_path(assets::DOTS),
            wgpu::AddressMode::Repeat,
        )?;
        let stripes = Texture::from_path(
            &gpu,
            &assets::asset_path(assets::STRIPES),
            wgpu::AddressMode::Repeat,
        )?;
        let noise = Texture::from_path(
            &gpu,
            &assets::asset_path(assets::NOISE),
            wgpu::AddressMode::Repeat,
        )?;

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let format = surface_config.format;

        let quad = create_mesh_draw(
            &gpu,
            "caustics",
            include_str!("shaders/caustics.wgsl"),
            &scene.quad,
            &[&dots, &stripes, &noise],
            &camera_layout,
            format,
        );
        let tube = create_mesh_draw(
            &gpu,
            "tube",
            include_str!("shaders/tube.wgsl"),
            &scene.tube,
            &[&dots, &stripes],
            &camera_layout,
            format,
        );
        let particles = create_particle_draw(
            &gpu,
            scene,
            &[&sphere_normal],
            &camera_layout,
            format,
        );

        let overlay = with_gui.then(|| SettingsOverlay::new(&gpu, &window, format));

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            camera_buffer,
            camera_bind_group,
            quad,
            tube,
            particles,
            overlay,
        })
    }

    /// Reconfigure the surface and depth buffer for a new viewport.
    /// The camera aspect is the caller's concern.
    pub fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.physical_size();
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface
            .configure(self.gpu.device(), &self.surface_config);
        self.depth_view = create_depth_view(self.gpu.device(), width, height);
    }

    /// Let the overlay look at window events first; returns true if consumed.
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.state.on_window_event(window, event).consumed,
            None => false,
        }
    }

    /// Draw one frame: push the latest uniforms into every material and
    /// issue a single pass over the three objects.
    pub fn render(
        &mut self,
        window: &Window,
        camera: &OrbitCamera,
        context: &mut RenderContext,
        frame: &FrameInfo,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let queue = self.gpu.queue();

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform()]),
        );

        let uniforms = MaterialUniforms::for_frame(frame, context.pointer, context.progress);
        for material in [
            &self.quad.material,
            &self.tube.material,
            &self.particles.material,
        ] {
            queue.write_buffer(
                &material.uniform_buffer,
                0,
                bytemuck::cast_slice(&[uniforms]),
            );
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            // Back to front: backdrop, knot, then the unclipped particles.
            for mesh in [&self.quad, &self.tube] {
                pass.set_pipeline(&mesh.material.pipeline);
                pass.set_bind_group(1, &mesh.material.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            pass.set_pipeline(&self.particles.material.pipeline);
            pass.set_bind_group(1, &self.particles.material.bind_group, &[]);
            pass.set_vertex_buffer(0, self.particles.corner_buffer.slice(..));
            pass.set_vertex_buffer(1, self.particles.instance_buffer.slice(..));
            pass.draw(0..4, 0..self.particles.instance_count);
        }

        if let Some(overlay) = &mut self.overlay {
            let size = (self.surface_config.width, self.surface_config.height);
            overlay.draw(
                &self.gpu,
                &mut encoder,
                window,
                &view,
                size,
                &mut context.progress,
            );
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn create_surface_config(
    surface: &wgpu::Surface,
    gpu: &GpuContext,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    let surface_caps = surface.get_capabilities(gpu.adapter());
    let surface_format = surface_caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .unwrap_or(surface_caps.formats[0]);

    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width,
        height,
        present_mode: surface_caps.present_modes[0],
        alpha_mode: surface_caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Bind group layout for one material: a uniform block at binding 0, then a
/// texture/sampler pair per bound image.
fn material_layout(
    device: &wgpu::Device,
    label: &str,
    texture_count: u32,
) -> wgpu::BindGroupLayout {
    let mut entries = vec![wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }];

    for i in 0..texture_count {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 1 + i * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 2 + i * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

fn create_material(
    gpu: &GpuContext,
    name: &str,
    shader_source: &str,
    textures: &[&Texture],
    camera_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    vertex_buffers: &[wgpu::VertexBufferLayout],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    depth_write_enabled: bool,
    depth_compare: wgpu::CompareFunction,
) -> Material {
    let device = gpu.device();

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let layout = material_layout(
        device,
        &format!("{}_bind_group_layout", name),
        textures.len() as u32,
    );

    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Uniforms", name)),
        contents: bytemuck::cast_slice(&[MaterialUniforms::default()]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let mut entries = vec![wgpu::BindGroupEntry {
        binding: 0,
        resource: uniform_buffer.as_entire_binding(),
    }];
    for (i, texture) in textures.iter().enumerate() {
        entries.push(wgpu::BindGroupEntry {
            binding: 1 + i as u32 * 2,
            resource: wgpu::BindingResource::TextureView(&texture.view),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: 2 + i as u32 * 2,
            resource: wgpu::BindingResource::Sampler(&texture.sampler),
        });
    }

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{}_bind_group", name)),
        layout: &layout,
        entries: &entries,
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", name)),
        bind_group_layouts: &[camera_layout, &layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", name)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    });

    Material {
        pipeline,
        uniform_buffer,
        bind_group,
    }
}

fn create_mesh_draw(
    gpu: &GpuContext,
    name: &str,
    shader_source: &str,
    mesh: &Mesh,
    textures: &[&Texture],
    camera_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> MeshDraw {
    let device = gpu.device();

    let material = create_material(
        gpu,
        name,
        shader_source,
        textures,
        camera_layout,
        format,
        &[mesh_vertex_layout()],
        wgpu::PrimitiveTopology::TriangleList,
        Some(wgpu::Face::Back),
        true,
        wgpu::CompareFunction::Less,
    );

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Index Buffer", name)),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    MeshDraw {
        material,
        vertex_buffer,
        index_buffer,
        index_count: mesh.index_count(),
    }
}

fn create_particle_draw(
    gpu: &GpuContext,
    scene: &SceneGeometry,
    textures: &[&Texture],
    camera_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> ParticleDraw {
    let device = gpu.device();

    let corner_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0, // corner
        }],
    };

    // Depth test stays off for the sprites; they blend over everything.
    let material = create_material(
        gpu,
        "particles",
        include_str!("shaders/particles.wgsl"),
        textures,
        camera_layout,
        format,
        &[corner_layout, particle_instance_layout()],
        wgpu::PrimitiveTopology::TriangleStrip,
        None,
        false,
        wgpu::CompareFunction::Always,
    );

    let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Particle Corner Buffer"),
        contents: bytemuck::cast_slice(&PARTICLE_CORNERS),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let instances = scene.particles.instances();
    let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Particle Instance Buffer"),
        contents: bytemuck::cast_slice(&instances),
        usage: wgpu::BufferUsages::VERTEX,
    });

    ParticleDraw {
        material,
        corner_buffer,
        instance_buffer,
        instance_count: instances.len() as u32,
    }
}

/// Debug settings panel: one progress slider. Dormant unless `--gui` is
/// passed on the command line.
struct SettingsOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl SettingsOverlay {
    fn new(gpu: &GpuContext, window: &Window, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(gpu.device(), format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
        }
    }

    fn draw(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        size: (u32, u32),
        progress: &mut f32,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Settings")
                .resizable(false)
                .show(ctx, |ui| {
                    ui.add(
                        egui::Slider::new(progress, 0.0..=1.0)
                            .step_by(0.01)
                            .text("progress"),
                    );
                });
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(gpu.device(), gpu.queue(), *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.0, size.1],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.renderer.update_buffers(
            gpu.device(),
            gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // SAFETY: The render pass lifetime is actually tied to the
            // encoder, but egui-wgpu requires 'static. This is safe because
            // we drop the render pass before using the encoder again.
            let pass_static = unsafe {
                std::mem::transmute::<&mut wgpu::RenderPass<'_>, &mut wgpu::RenderPass<'static>>(
                    &mut pass,
                )
            };

            self.renderer.render(pass_static, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
