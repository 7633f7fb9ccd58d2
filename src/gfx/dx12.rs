//! Direct3D 12 后端
//!
//! 着色器按 Shader Model 6（`vs_6_0` / `ps_6_0`）由 DXC 编译，允许两帧同时在途。
//! GUI 纹理占用着色器可见描述符堆中的槽位，槽位总数固定为
//! [`GUI_DESCRIPTOR_CAPACITY`]，用尽后新的纹理不会被上传。

use tracing::debug;

use crate::core::error::Result;
use crate::gui::{DrawData, GuiBridges};

use super::backend::{self, Backend, BackendDescriptor, ShaderDesc};
use super::descriptor::{TextureSlots, GUI_DESCRIPTOR_CAPACITY};
use super::host::WindowContext;
use super::registry::BackendRegistry;
use super::render_system::RenderSystem;

pub const NAME: &str = "Direct3D12";

/// 同时在途的帧数
const NUM_FRAMES_IN_FLIGHT: u32 = 2;

/// 注册到后端注册表
pub fn register(registry: &mut BackendRegistry) {
    registry.register(NAME, || Box::new(Direct3D12Backend::new()));
}

pub struct Direct3D12Backend {
    descriptor: BackendDescriptor,
    bridges: GuiBridges,
    texture_slots: Option<TextureSlots>,
}

impl Direct3D12Backend {
    pub fn new() -> Self {
        Self {
            descriptor: BackendDescriptor {
                module_name: NAME,
                backends: wgpu::Backends::DX12,
                native_api: wgpu::Backend::Dx12,
                vertex_shader: ShaderDesc::new("SceneShader.wgsl")
                    .with_entry("VSMain")
                    .with_profile("vs_6_0"),
                fragment_shader: ShaderDesc::new("SceneShader.wgsl")
                    .with_entry("PSMain")
                    .with_profile("ps_6_0"),
                frame_latency: NUM_FRAMES_IN_FLIGHT,
                max_windows: crate::core::config::MAX_WINDOWS as usize,
            },
            bridges: GuiBridges::new(),
            texture_slots: None,
        }
    }
}

impl Default for Direct3D12Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Direct3D12Backend {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    fn create(&mut self, render_system: &RenderSystem) -> Result<()> {
        backend::verify_adapter(&self.descriptor, &render_system.adapter_info())?;
        self.texture_slots = Some(TextureSlots::new(GUI_DESCRIPTOR_CAPACITY));
        debug!(capacity = GUI_DESCRIPTOR_CAPACITY, "GUI descriptor heap created");
        Ok(())
    }

    fn bridges(&self) -> &GuiBridges {
        &self.bridges
    }

    fn bridges_mut(&mut self) -> &mut GuiBridges {
        &mut self.bridges
    }

    fn release_context(&mut self, context: &WindowContext) {
        self.bridges.remove(context.id);
        if let Some(slots) = self.texture_slots.as_mut() {
            slots.release_context(context.id);
        }
    }

    fn begin_frame(
        &mut self,
        render_system: &RenderSystem,
        context: &WindowContext,
        encoder: &mut wgpu::CommandEncoder,
        draw_data: &DrawData,
    ) -> Result<()> {
        let Self { bridges, texture_slots, .. } = self;
        let id = context.id;

        let freed = bridges.prepare(render_system, id, encoder, draw_data, |texture| {
            texture_slots
                .as_mut()
                .map_or(false, |slots| slots.acquire(id, texture))
        });

        if let Some(slots) = texture_slots.as_mut() {
            for texture in freed {
                slots.release(id, texture);
            }
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.bridges.clear();
        if let Some(slots) = self.texture_slots.take() {
            debug!(leaked = slots.allocated(), "GUI descriptor heap released");
        }
    }
}
