//! 场景模块
//!
//! 固定场景：一个带光照的旋转立方体。顶点/索引缓冲和渲染管线在后端创建时
//! 生成一次，之后只读；uniform 缓冲每个窗口每帧写入一次。

pub mod cube;
pub mod view;

use bytemuck::{Pod, Zeroable};
use tracing::{debug, error, info};
use wgpu::util::DeviceExt;

use crate::core::error::{GraphicsError, Result};
use crate::core::math::Float4x4;
use crate::gfx::render_system::RenderSystem;
use crate::gfx::shader::CompiledShader;
use crate::gfx::swap_chain::DEPTH_FORMAT;

pub use cube::SceneVertex;
pub use view::{RotationMode, View};

/// 场景 uniform 块
///
/// 与着色器中的 `Scene` 结构体一一对应（std140 布局，共 160 字节）。
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub vp_matrix: Float4x4,
    pub w_matrix: Float4x4,
    pub color: [f32; 4],
    /// xyz 为指向光源的单位向量，w 为 0
    pub light_vec: [f32; 4],
}

/// 场景的 GPU 资源
pub struct Scene {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Scene {
    /// 创建缓冲、绑定组和渲染管线
    pub fn new(
        render_system: &RenderSystem,
        vertex_shader: &CompiledShader,
        fragment_shader: &CompiledShader,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let device = &render_system.device;
        let (vertices, indices) = cube::geometry();

        debug!("Creating scene buffers");
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<SceneUniforms>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        debug!("Creating scene pipeline");
        let pipeline = render_system
            .validated(|device| {
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Scene Pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &vertex_shader.module,
                        entry_point: vertex_shader.entry_point,
                        buffers: &[SceneVertex::layout()],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &fragment_shader.module,
                        entry_point: fragment_shader.entry_point,
                        targets: &[Some(wgpu::ColorTargetState {
                            format: color_format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        // 左手坐标系下朝外的三角形在屏幕上是顺时针的
                        front_face: wgpu::FrontFace::Cw,
                        cull_mode: Some(wgpu::Face::Back),
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                })
            })
            .map_err(|e| {
                error!("Failed to create scene pipeline: {}", e);
                GraphicsError::PipelineCreation(e)
            })?;

        info!(indices = indices.len(), "Scene resources created");

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            bind_group,
        })
    }

    /// 写入本帧的 uniform 数据
    pub fn upload(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// 在渲染通道中绘制立方体
    pub fn draw<'rp>(&'rp self, pass: &mut wgpu::RenderPass<'rp>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
