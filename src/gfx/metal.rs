//! Metal 后端（macOS）
//!
//! WGSL 源码在运行时翻译为 MSL。

use crate::gui::GuiBridges;

use super::backend::{Backend, BackendDescriptor, ShaderDesc};
use super::registry::BackendRegistry;

pub const NAME: &str = "Metal";

/// 注册到后端注册表
pub fn register(registry: &mut BackendRegistry) {
    registry.register(NAME, || Box::new(MetalBackend::new()));
}

pub struct MetalBackend {
    descriptor: BackendDescriptor,
    bridges: GuiBridges,
}

impl MetalBackend {
    pub fn new() -> Self {
        Self {
            descriptor: BackendDescriptor {
                module_name: NAME,
                backends: wgpu::Backends::METAL,
                native_api: wgpu::Backend::Metal,
                vertex_shader: ShaderDesc::new("SceneShader.wgsl").with_entry("vs_main"),
                fragment_shader: ShaderDesc::new("SceneShader.wgsl").with_entry("fs_main"),
                frame_latency: 2,
                max_windows: crate::core::config::MAX_WINDOWS as usize,
            },
            bridges: GuiBridges::new(),
        }
    }
}

impl Default for MetalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MetalBackend {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    fn bridges(&self) -> &GuiBridges {
        &self.bridges
    }

    fn bridges_mut(&mut self) -> &mut GuiBridges {
        &mut self.bridges
    }
}
