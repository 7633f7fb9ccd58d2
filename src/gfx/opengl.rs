//! OpenGL 后端
//!
//! 着色器为 GLSL 源码，运行时翻译。OpenGL 上下文与窗口一一绑定，
//! 只支持单个窗口。

use crate::gui::GuiBridges;

use super::backend::{Backend, BackendDescriptor, ShaderDesc};
use super::registry::BackendRegistry;

pub const NAME: &str = "OpenGL";

/// 注册到后端注册表
pub fn register(registry: &mut BackendRegistry) {
    registry.register(NAME, || Box::new(OpenGLBackend::new()));
}

pub struct OpenGLBackend {
    descriptor: BackendDescriptor,
    bridges: GuiBridges,
}

impl OpenGLBackend {
    pub fn new() -> Self {
        Self {
            descriptor: BackendDescriptor {
                module_name: NAME,
                backends: wgpu::Backends::GL,
                native_api: wgpu::Backend::Gl,
                vertex_shader: ShaderDesc::new("SceneShader.vert"),
                fragment_shader: ShaderDesc::new("SceneShader.frag"),
                frame_latency: 2,
                max_windows: 1,
            },
            bridges: GuiBridges::new(),
        }
    }
}

impl Default for OpenGLBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for OpenGLBackend {
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
