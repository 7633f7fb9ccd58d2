//! 后端的统一抽象接口
//!
//! 每个具体后端绑定一种原生图形 API。共享的流程（渲染系统、交换链、
//! uniform 上传、每个窗口的 GUI 上下文、生命周期顺序）由
//! [`BackendHost`](super::host::BackendHost) 完成，这里只定义与原生 API
//! 相关的钩子。

use tracing::{error, info, warn};

use crate::core::error::{GraphicsError, Result};
use crate::gui::{DrawData, GuiBridges};

use super::host::WindowContext;
use super::render_system::RenderSystem;

/// 单个着色器资源的描述
///
/// 文件从 `<着色器根目录>/<后端模块名>/<filename>` 加载。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderDesc {
    pub filename: &'static str,
    /// 入口函数名，缺省为 `main`
    pub entry_point: Option<&'static str>,
    /// 编译配置，例如 `vs_5_0`
    pub profile: Option<&'static str>,
}

impl ShaderDesc {
    pub const fn new(filename: &'static str) -> Self {
        Self { filename, entry_point: None, profile: None }
    }

    pub const fn with_entry(mut self, entry_point: &'static str) -> Self {
        self.entry_point = Some(entry_point);
        self
    }

    pub const fn with_profile(mut self, profile: &'static str) -> Self {
        self.profile = Some(profile);
        self
    }

    /// 实际使用的入口函数名
    pub fn entry(&self) -> &'static str {
        self.entry_point.unwrap_or("main")
    }
}

/// 后端的静态描述：选择哪个原生 API，以及加载哪些着色器
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    /// 注册名，同时也是着色器子目录名
    pub module_name: &'static str,
    /// 创建 wgpu 实例时允许的后端集合
    pub backends: wgpu::Backends,
    /// 适配器必须运行在这个原生 API 上
    pub native_api: wgpu::Backend,
    pub vertex_shader: ShaderDesc,
    pub fragment_shader: ShaderDesc,
    /// 交换链允许排队的最大帧数
    pub frame_latency: u32,
    /// 最多支持的窗口数
    pub max_windows: usize,
}

/// 具体后端需要实现的钩子
///
/// 调用顺序由宿主保证：`create` 一次，然后每个窗口 `init_context`，
/// 随后每帧 `begin_frame` / `end_frame`，退出时按相反顺序
/// `release_context`，最后 `destroy`。
///
/// GUI 相关的钩子默认交给后端持有的 [`GuiBridges`]，只有提交方式不同的
/// 后端（例如按描述符槽位上传纹理的 Direct3D 12）才需要覆盖。
pub trait Backend {
    fn descriptor(&self) -> &BackendDescriptor;

    /// 每个窗口的 GUI 桥接
    fn bridges(&self) -> &GuiBridges;

    fn bridges_mut(&mut self) -> &mut GuiBridges;

    /// 后端的注册名
    fn name(&self) -> &'static str {
        self.descriptor().module_name
    }

    /// 渲染系统创建完成后调用，用于检查适配器并创建后端自身的资源
    fn create(&mut self, render_system: &RenderSystem) -> Result<()> {
        verify_adapter(self.descriptor(), &render_system.adapter_info())
    }

    /// 为窗口创建 GUI 桥接
    fn init_context(&mut self, render_system: &RenderSystem, context: &WindowContext) -> Result<()> {
        self.bridges_mut().create(render_system, context);
        Ok(())
    }

    /// 销毁窗口的 GUI 桥接
    fn release_context(&mut self, context: &WindowContext) {
        self.bridges_mut().remove(context.id);
    }

    /// 在渲染通道开始之前上传本帧 GUI 的纹理和顶点数据
    fn begin_frame(
        &mut self,
        render_system: &RenderSystem,
        context: &WindowContext,
        encoder: &mut wgpu::CommandEncoder,
        draw_data: &DrawData,
    ) -> Result<()> {
        self.bridges_mut()
            .prepare(render_system, context.id, encoder, draw_data, |_| true);
        Ok(())
    }

    /// 在场景之后把 GUI 绘制到同一个渲染通道
    fn end_frame<'rp>(
        &'rp self,
        context: &WindowContext,
        pass: &mut wgpu::RenderPass<'rp>,
        draw_data: &'rp DrawData,
    ) {
        self.bridges().render(context.id, pass, draw_data);
    }

    /// 释放后端持有的其余资源
    fn destroy(&mut self) {
        let remaining = self.bridges_mut().clear();
        if remaining > 0 {
            warn!(backend = self.name(), remaining, "GUI bridges still alive at destroy");
        }
    }
}

/// 检查渲染系统绑定的适配器确实运行在后端期望的原生 API 上
pub fn verify_adapter(descriptor: &BackendDescriptor, adapter: &wgpu::AdapterInfo) -> Result<()> {
    if adapter.backend != descriptor.native_api {
        error!(
            backend = descriptor.module_name,
            expected = ?descriptor.native_api,
            actual = ?adapter.backend,
            "Adapter runs on the wrong graphics API"
        );
        return Err(GraphicsError::ModuleLoad(format!(
            "{} requires a {:?} adapter, got {:?} ({})",
            descriptor.module_name, descriptor.native_api, adapter.backend, adapter.name
        ))
        .into());
    }

    info!(
        backend = descriptor.module_name,
        adapter = %adapter.name,
        driver = %adapter.driver,
        "Render system bound"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> BackendDescriptor {
        BackendDescriptor {
            module_name: "Vulkan",
            backends: wgpu::Backends::VULKAN,
            native_api: wgpu::Backend::Vulkan,
            vertex_shader: ShaderDesc::new("SceneShader.vert.spv"),
            fragment_shader: ShaderDesc::new("SceneShader.frag.spv"),
            frame_latency: 2,
            max_windows: 4,
        }
    }

    fn adapter(backend: wgpu::Backend) -> wgpu::AdapterInfo {
        wgpu::AdapterInfo {
            name: "Test Adapter".into(),
            vendor: 0,
            device: 0,
            device_type: wgpu::DeviceType::Other,
            driver: String::new(),
            driver_info: String::new(),
            backend,
        }
    }

    #[test]
    fn test_shader_desc_defaults() {
        let desc = ShaderDesc::new("SceneShader.wgsl");
        assert_eq!(desc.entry(), "main");
        assert!(desc.profile.is_none());

        let desc = desc.with_entry("VSMain").with_profile("vs_5_0");
        assert_eq!(desc.entry(), "VSMain");
        assert_eq!(desc.profile, Some("vs_5_0"));
    }

    #[test]
    fn test_default_hooks_share_bridges() {
        use crate::gfx::opengl::OpenGLBackend;

        let mut backend: Box<dyn Backend> = Box::new(OpenGLBackend::new());
        assert_eq!(backend.name(), "OpenGL");
        // 没有任何窗口初始化过，destroy 不会留下桥接
        backend.destroy();
        assert_eq!(backend.bridges_mut().clear(), 0);
    }

    #[test]
    fn test_verify_adapter() {
        let desc = descriptor();
        assert!(verify_adapter(&desc, &adapter(wgpu::Backend::Vulkan)).is_ok());
        assert!(verify_adapter(&desc, &adapter(wgpu::Backend::Gl)).is_err());
    }
}
