//! Direct3D 11 后端
//!
//! wgpu 没有 Direct3D 11 后端，这个后端实际运行在 Direct3D 12 设备上。
//! 与 [`super::dx12`] 的区别只在于着色器按 Shader Model 5（`vs_5_0` / `ps_5_0`）
//! 由 FXC 编译，并且只允许一帧在途。

use tracing::warn;

use crate::core::error::Result;
use crate::gui::GuiBridges;

use super::backend::{self, Backend, BackendDescriptor, ShaderDesc};
use super::registry::BackendRegistry;
use super::render_system::RenderSystem;

pub const NAME: &str = "Direct3D11";

/// 注册到后端注册表
pub fn register(registry: &mut BackendRegistry) {
    registry.register(NAME, || Box::new(Direct3D11Backend::new()));
}

pub struct Direct3D11Backend {
    descriptor: BackendDescriptor,
    bridges: GuiBridges,
}

impl Direct3D11Backend {
    pub fn new() -> Self {
        Self {
            descriptor: BackendDescriptor {
                module_name: NAME,
                backends: wgpu::Backends::DX12,
                native_api: wgpu::Backend::Dx12,
                vertex_shader: ShaderDesc::new("SceneShader.wgsl")
                    .with_entry("VSMain")
                    .with_profile("vs_5_0"),
                fragment_shader: ShaderDesc::new("SceneShader.wgsl")
                    .with_entry("PSMain")
                    .with_profile("ps_5_0"),
                frame_latency: 1,
                max_windows: crate::core::config::MAX_WINDOWS as usize,
            },
            bridges: GuiBridges::new(),
        }
    }
}

impl Default for Direct3D11Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Direct3D11Backend {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    fn bridges(&self) -> &GuiBridges {
        &self.bridges
    }

    fn bridges_mut(&mut self) -> &mut GuiBridges {
        &mut self.bridges
    }

    fn create(&mut self, render_system: &RenderSystem) -> Result<()> {
        backend::verify_adapter(&self.descriptor, &render_system.adapter_info())?;
        warn!(
            backend = NAME,
            "No native Direct3D 11 device is available, running on Direct3D 12 with FXC shaders"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shader;

    #[test]
    fn test_runs_on_d3d12_device_with_fxc() {
        let backend = Direct3D11Backend::new();
        let desc = backend.descriptor();
        assert_eq!(desc.native_api, wgpu::Backend::Dx12);
        assert!(matches!(
            shader::dx12_compiler(desc.vertex_shader.profile),
            wgpu::Dx12Compiler::Fxc
        ));
        assert_eq!(desc.frame_latency, 1);
    }
}
