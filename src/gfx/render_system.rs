//! 渲染系统
//!
//! 对应原生图形 API 的"设备层"：实例、适配器、逻辑设备和命令队列。
//! 每个后端在 `create` 阶段创建一次，之后只读共享给场景、交换链和 GUI 桥接。

use std::sync::Arc;

use tracing::{debug, error, info};
use winit::window::Window;

use crate::core::error::{DistOverlayError, GraphicsError, Result};
use crate::core::math::ClippingRange;

use super::backend::BackendDescriptor;
use super::shader;

/// 设备层资源
pub struct RenderSystem {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl RenderSystem {
    /// 创建渲染系统，并为每个窗口创建表面
    ///
    /// 实例只启用描述中指定的原生 API；找不到对应的适配器时视为
    /// 渲染系统模块加载失败。
    pub fn create(
        descriptor: &BackendDescriptor,
        windows: &[Arc<Window>],
        debug_layers: bool,
    ) -> Result<(Self, Vec<wgpu::Surface<'static>>)> {
        info!(backend = descriptor.module_name, debug_layers = debug_layers, "Creating render system");

        let flags = if debug_layers {
            wgpu::InstanceFlags::debugging()
        } else {
            wgpu::InstanceFlags::default()
        };

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            flags,
            dx12_shader_compiler: shader::dx12_compiler(descriptor.vertex_shader.profile),
            gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
        });

        debug!(count = windows.len(), "Creating surfaces");
        let surfaces = windows
            .iter()
            .map(|window| {
                instance.create_surface(window.clone()).map_err(|e| {
                    error!(backend = descriptor.module_name, "Failed to create surface: {}", e);
                    DistOverlayError::from(GraphicsError::ModuleLoad(format!(
                        "Failed to create surface: {}",
                        e
                    )))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Requesting adapter");
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surfaces.first(),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| {
            error!(backend = descriptor.module_name, "No compatible adapter found");
            GraphicsError::ModuleLoad(format!(
                "No {} adapter available on this system",
                descriptor.module_name
            ))
        })?;

        let info = adapter.get_info();
        info!("Selected adapter: {} ({:?})", info.name, info.backend);

        debug!("Requesting device and queue");
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some(descriptor.module_name),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits()),
            },
            None,
        ))
        .map_err(|e| {
            error!(backend = descriptor.module_name, "Failed to create device: {}", e);
            GraphicsError::DeviceCreation(format!("Failed to create device: {}", e))
        })?;

        // 通过错误作用域捕获的错误不会到达这里，剩下的都是运行期错误
        device.on_uncaptured_error(Box::new(|e| {
            error!("Uncaptured device error: {}", e);
        }));

        Ok((Self { instance, adapter, device, queue }, surfaces))
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// wgpu 在所有原生 API 上都使用 [0, 1] 的深度范围
    pub fn clipping_range(&self) -> ClippingRange {
        ClippingRange::ZeroToOne
    }

    /// 在验证错误作用域中执行资源创建，把验证失败转为错误返回
    pub fn validated<T>(&self, build: impl FnOnce(&wgpu::Device) -> T) -> std::result::Result<T, String> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = build(&self.device);
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(e) => Err(e.to_string()),
            None => Ok(value),
        }
    }
}
