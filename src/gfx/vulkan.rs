//! Vulkan 后端
//!
//! 着色器为构建时预编译的 SPIR-V 二进制。

use crate::gui::GuiBridges;

use super::backend::{Backend, BackendDescriptor, ShaderDesc};
use super::registry::BackendRegistry;

pub const NAME: &str = "Vulkan";

/// 注册到后端注册表
pub fn register(registry: &mut BackendRegistry) {
    registry.register(NAME, || Box::new(VulkanBackend::new()));
}

pub struct VulkanBackend {
    descriptor: BackendDescriptor,
    bridges: GuiBridges,
}

impl VulkanBackend {
    pub fn new() -> Self {
        Self {
            descriptor: BackendDescriptor {
                module_name: NAME,
                backends: wgpu::Backends::VULKAN,
                native_api: wgpu::Backend::Vulkan,
                vertex_shader: ShaderDesc::new("SceneShader.vert.spv"),
                fragment_shader: ShaderDesc::new("SceneShader.frag.spv"),
                frame_latency: 2,
                max_windows: crate::core::config::MAX_WINDOWS as usize,
            },
            bridges: GuiBridges::new(),
        }
    }
}

impl Default for VulkanBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for VulkanBackend {
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
