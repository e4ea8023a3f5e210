use std::iter::once;
use std::mem::size_of;
use std::sync::{Arc, Mutex};

use bytemuck::bytes_of;
use bytemuck::checked::cast_slice;
use bytemuck_derive::{Pod, Zeroable};
use log::debug;
use nalgebra::{point, Point2, Point3};
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};
use wgpu::{
    include_wgsl, vertex_attr_array,
    Adapter, Device, Instance, InstanceDescriptor, Queue, RequestAdapterOptions, DeviceDescriptor,
    Buffer, BufferUsages, CommandEncoderDescriptor, Extent3d, ImageCopyTexture, ImageDataLayout, Origin3d,
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingResource, BindingType, SamplerBindingType, SamplerDescriptor, ShaderStages,
    ColorTargetState, ColorWrites, FragmentState, PipelineLayoutDescriptor, PrimitiveState, PrimitiveTopology,
    RenderPipeline, RenderPipelineDescriptor, VertexBufferLayout, VertexState, VertexStepMode,
    LoadOp, Operations, RenderPassColorAttachment, RenderPassDescriptor,
    Surface, SurfaceConfiguration, SurfaceError,
    Sampler, Texture, TextureAspect, TextureDescriptor, TextureDimension, TextureFormat,
    TextureSampleType, TextureUsages, TextureViewDescriptor, TextureViewDimension,
};
use wgpu::util::{BufferInitDescriptor, DeviceExt};

use hull_caster::picture::{Picture, Rgb};

/// `Rgb` is `0x00RRGGBB`, i.e. B, G, R, X in memory.
const FRAME_FORMAT: TextureFormat = TextureFormat::Bgra8Unorm;

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
struct Vertex {
    position: Point3<f32>,
    tex: Point2<f32>,
}

// row 0 of the frame is the top of the screen
const VERTEX_DATA: [Vertex; 4] = [
    Vertex {
        position: point![-1.0, 1.0, 0.0],
        tex: point![0.0, 0.0],
    },
    Vertex {
        position: point![-1.0, -1.0, 0.0],
        tex: point![0.0, 1.0],
    },
    Vertex {
        position: point![1.0, 1.0, 0.0],
        tex: point![1.0, 0.0],
    },
    Vertex {
        position: point![1.0, -1.0, 0.0],
        tex: point![1.0, 1.0],
    },
];

/// Shows the latest frame on a window surface, stretched to fill it.
pub struct Renderer {
    gpu: Gpu,
    vertex_buffer: Buffer,
    surface: Surface,
    surface_config: SurfaceConfiguration,
    screen: Screen,
}

impl Renderer {
    pub fn new(gpu: Gpu, surface: Surface, surface_size: (u32, u32), frame_size: (u32, u32), background: Rgb) -> Self {
        let vertex_buffer = gpu.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("screen quad"),
            usage: BufferUsages::VERTEX,
            contents: bytes_of(&VERTEX_DATA),
        });

        let (width, height) = surface_size;
        let mut surface_config = surface.get_default_config(&gpu.adapter, width.max(1), height.max(1))
            .expect("default surface config");
        surface_config.format = surface_config.format.remove_srgb_suffix();
        surface.configure(&gpu.device, &surface_config);
        debug!(target: "app", "Surface: {:?}", surface_config);

        let screen = Screen::new(&gpu, surface_config.format, frame_size, background);

        Renderer {
            gpu,
            vertex_buffer,
            surface,
            surface_config,
            screen,
        }
    }

    /// Only the surface follows the window; the frame keeps its size.
    pub fn surface_resize(&mut self, size: (u32, u32)) {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.gpu.device, &self.surface_config);
    }

    pub fn render(&self) {
        let target = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => return,
            Err(SurfaceError::Outdated | SurfaceError::Lost) => {
                self.surface.configure(&self.gpu.device, &self.surface_config);
                return;
            }
            Err(err) => panic!("current surface texture: {}", err),
        };
        let target_view = target.texture.create_view(&TextureViewDescriptor::default());

        self.screen.frame.lock().expect("frame upload").upload(&self.gpu.queue);

        let mut encoder = self.gpu.device.create_command_encoder(&CommandEncoderDescriptor::default());

        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("present"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &target_view,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                    resolve_target: None,
                })],
                depth_stencil_attachment: None,
            });
            pass.set_pipeline(&self.screen.pipeline);
            pass.set_bind_group(0, &self.screen.bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.draw(0..4, 0..1);
        }

        self.gpu.queue.submit(once(encoder.finish()));
        target.present();
    }

    pub fn frame(&self) -> Arc<Mutex<Frame>> {
        self.screen.frame.clone()
    }
}

struct Screen {
    frame: Arc<Mutex<Frame>>,
    pipeline: RenderPipeline,
    bind_group: BindGroup,
}

impl Screen {
    fn new(gpu: &Gpu, target_format: TextureFormat, frame_size: (u32, u32), background: Rgb) -> Self {
        let frame = Frame::new(frame_size, gpu, background);

        let frame_layout = gpu.device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("frame"),
            entries: &[
                BindGroupLayoutEntry {
                    count: None,
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        multisampled: false,
                        sample_type: TextureSampleType::Float { filterable: false },
                        view_dimension: TextureViewDimension::D2,
                    },
                },
                BindGroupLayoutEntry {
                    count: None,
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::NonFiltering),
                },
            ],
        });

        let module = gpu.device.create_shader_module(include_wgsl!("present.wgsl"));
        let pipeline_layout = gpu.device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let pipeline = gpu.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("present"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &module,
                entry_point: "vertex_main",
                buffers: &[
                    VertexBufferLayout {
                        array_stride: size_of::<Vertex>() as _,
                        attributes: &vertex_attr_array![0 => Float32x3, 1 => Float32x2],
                        step_mode: VertexStepMode::Vertex,
                    },
                ],
            },
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            fragment: Some(FragmentState {
                module: &module,
                entry_point: "fragment_main",
                targets: &[Some(ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: ColorWrites::COLOR,
                })],
            }),
            multiview: None,
        });

        let frame_texture_view = frame.texture.create_view(&TextureViewDescriptor::default());
        let bind_group = gpu.device.create_bind_group(&BindGroupDescriptor {
            label: Some("frame"),
            layout: &frame_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(&frame_texture_view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&frame.sampler),
                },
            ],
        });

        Screen {
            frame: Arc::new(Mutex::new(frame)),
            pipeline,
            bind_group,
        }
    }
}

/// CPU-side pixels plus the texture they are uploaded to.
pub struct Frame {
    pixels: Vec<Rgb>,
    texture: Texture,
    sampler: Sampler,
    size: (u32, u32),
}

impl Frame {
    fn new(size: (u32, u32), gpu: &Gpu, background: Rgb) -> Self {
        let (width, height) = size;
        let texture = gpu.device.create_texture(&TextureDescriptor {
            label: Some("frame"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: FRAME_FORMAT,
            usage: TextureUsages::COPY_DST | TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        // one texel per frame pixel, no smoothing across the stretch
        let sampler = gpu.device.create_sampler(&SamplerDescriptor {
            label: Some("frame"),
            ..Default::default()
        });

        let pixels = vec![background; width as usize * height as usize];
        debug!(target: "app", "Allocating new frame. {}x{} ({}), {} bytes", width, height, pixels.len(), pixels.len() * size_of::<Rgb>());

        Frame {
            pixels,
            texture,
            sampler,
            size,
        }
    }

    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    pub fn picture_mut(&mut self) -> Picture<&mut [Rgb]> {
        Picture::new(self.pixels.as_mut_slice(), self.size)
    }

    /// Copies the packed pixels into the texture, one `Rgb` per texel.
    fn upload(&self, queue: &Queue) {
        let (width, height) = self.size;
        queue.write_texture(
            ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                aspect: TextureAspect::All,
                origin: Origin3d::ZERO,
            },
            cast_slice(&self.pixels),
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(size_of::<Rgb>() as u32 * width),
                rows_per_image: Some(height),
            },
            Extent3d { width, height, depth_or_array_layers: 1 },
        );
    }
}

pub struct Gpu {
    instance: Instance,
    adapter: Adapter,
    device: Device,
    queue: Queue,
}

impl Gpu {
    pub async fn new() -> Self {
        let instance = Instance::new(InstanceDescriptor::default());
        let adapter = instance.request_adapter(&RequestAdapterOptions::default())
            .await
            .expect("wgpu adapter");
        let (device, queue) = adapter.request_device(&DeviceDescriptor::default(), None).await
            .expect("wgpu device");

        Gpu { instance, adapter, device, queue }
    }

    pub fn surface<R>(&self, raw: &R) -> Surface
        where R: HasRawWindowHandle + HasRawDisplayHandle {
        unsafe { self.instance.create_surface(raw) }
            .expect("surface")
    }
}
