//! 交换链
//!
//! 一个窗口表面加上它的配置和深度缓冲。表面丢失或过期时重新配置并跳过当前帧，
//! 显存不足视为致命错误。

use tracing::{debug, warn};

use crate::core::error::{GraphicsError, Result};

use super::render_system::RenderSystem;

/// 深度缓冲格式
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// 窗口的交换链
pub struct SwapChain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
}

impl SwapChain {
    /// 按给定的颜色格式配置表面并创建深度缓冲
    pub fn new(
        render_system: &RenderSystem,
        surface: wgpu::Surface<'static>,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        vsync: bool,
        frame_latency: u32,
    ) -> Result<Self> {
        let caps = surface.get_capabilities(&render_system.adapter);
        if !caps.formats.contains(&format) {
            return Err(GraphicsError::SwapchainError(format!(
                "Surface does not support format {:?}",
                format
            ))
            .into());
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: frame_latency,
        };

        render_system
            .validated(|device| surface.configure(device, &config))
            .map_err(GraphicsError::SwapchainError)?;

        let depth_view = create_depth_view(&render_system.device, config.width, config.height);
        debug!(width = config.width, height = config.height, ?format, "Swap chain created");

        Ok(Self { surface, config, depth_view })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn vsync(&self) -> bool {
        self.config.present_mode == wgpu::PresentMode::AutoVsync
    }

    /// 调整尺寸，零尺寸（最小化）时忽略
    ///
    /// 返回是否真的重新配置了表面。
    pub fn resize(&mut self, render_system: &RenderSystem, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure(render_system);
        self.depth_view = create_depth_view(&render_system.device, width, height);
        true
    }

    /// 切换垂直同步，在两帧之间调用
    pub fn set_vsync(&mut self, render_system: &RenderSystem, vsync: bool) {
        let mode = present_mode(vsync);
        if self.config.present_mode != mode {
            self.config.present_mode = mode;
            self.reconfigure(render_system);
            debug!(vsync, "Present mode changed");
        }
    }

    /// 获取下一张交换链图像
    ///
    /// 返回 `Ok(None)` 表示本帧应跳过。
    pub fn acquire(&mut self, render_system: &RenderSystem) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Outdated) | Err(wgpu::SurfaceError::Lost) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.reconfigure(render_system);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next swap chain image");
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(GraphicsError::SwapchainError(
                "Out of memory while acquiring the next image".to_string(),
            )
            .into()),
        }
    }

    fn reconfigure(&self, render_system: &RenderSystem) {
        self.surface.configure(&render_system.device, &self.config);
    }
}

/// 呈现模式：`AutoVsync` / `AutoNoVsync` 在所有平台上都受支持
pub fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// 从表面支持的格式中选择颜色格式，优先 sRGB
pub fn select_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
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
