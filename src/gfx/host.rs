//! 后端宿主
//!
//! 所有后端共享的流程：创建渲染系统、交换链和场景资源，为每个窗口创建
//! GUI 上下文，逐帧编排场景和 GUI 的绘制，以及按严格的相反顺序释放资源。
//! 与原生 API 相关的部分通过 [`Backend`] 钩子交给具体后端。
//!
//! # 每帧流程
//!
//! ```text
//! advance(dt) -> 上传 uniform -> 构建 GUI -> begin_frame（上传 GUI 数据）
//!   -> 渲染通道 { 清屏, 立方体, end_frame（GUI） } -> 提交 -> 呈现
//! ```

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use winit::window::{Window, WindowId};

use crate::core::config::Config;
use crate::core::error::{DistOverlayError, GraphicsError, Result};
use crate::core::timer::{FrameTimer, MonotonicClock};
use crate::gui::{controls, FrameRateMeter, FrameStatus, GuiActions, GuiContext, PointerInput};
use crate::scene::{Scene, View};

use super::backend::{Backend, BackendDescriptor};
use super::lifecycle::{self, Lifecycle, LifecycleState};
use super::render_system::RenderSystem;
use super::shader::{ShaderLoader, ShaderStage};
use super::swap_chain::{self, SwapChain};

/// 清屏颜色
const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.1, g: 0.1, b: 0.12, a: 1.0 };

/// 窗口上下文在宿主中的编号，按创建顺序从 0 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub usize);

/// 一个屏幕窗口的全部状态
pub struct WindowContext {
    pub id: ContextId,
    pub window: Arc<Window>,
    pub swap_chain: SwapChain,
    /// 仅在 `init_context` 与 `release_context` 之间存在
    pub gui: Option<GuiContext>,
    pub view: View,
    pub pointer: PointerInput,
    /// 窗口关闭后不再渲染
    pub open: bool,
}

impl WindowContext {
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }
}

/// 后端宿主
///
/// 字段顺序即销毁顺序：先后端（GUI 桥接），再窗口上下文（GUI 上下文和表面），
/// 然后场景资源，最后渲染系统。
pub struct BackendHost {
    backend: Box<dyn Backend>,
    contexts: Vec<WindowContext>,
    scene: Scene,
    render_system: RenderSystem,
    timer: FrameTimer<MonotonicClock>,
    metrics: FrameRateMeter,
    gui_enabled: bool,
    lifecycle: Lifecycle,
}

impl BackendHost {
    /// 一次性创建渲染系统、交换链和场景资源
    ///
    /// 任何一步失败都会记录日志并直接返回错误，不做重试。
    pub fn create(
        mut backend: Box<dyn Backend>,
        windows: Vec<Arc<Window>>,
        config: &Config,
    ) -> Result<Self> {
        let descriptor = backend.descriptor().clone();
        info!(backend = descriptor.module_name, windows = windows.len(), "Creating backend");

        if windows.is_empty() || windows.len() > descriptor.max_windows {
            return Err(DistOverlayError::Initialization(format!(
                "{} supports 1 to {} windows, got {}",
                descriptor.module_name,
                descriptor.max_windows,
                windows.len()
            )));
        }

        let (render_system, surfaces) =
            RenderSystem::create(&descriptor, &windows, config.graphics.debug)?;
        backend.create(&render_system)?;

        let mut lifecycle = Lifecycle::new();
        lifecycle.transition(LifecycleState::Created)?;

        // 后端钩子已经运行，之后的任何失败都要先销毁后端
        let (scene, contexts) = lifecycle.finish_creation(
            || Self::create_resources(&descriptor, &render_system, windows, surfaces, config),
            || backend.destroy(),
        )?;
        info!(backend = descriptor.module_name, "Backend created");

        Ok(Self {
            backend,
            contexts,
            scene,
            render_system,
            timer: FrameTimer::new(MonotonicClock::new()),
            metrics: FrameRateMeter::new(),
            gui_enabled: config.gui.enabled,
            lifecycle,
        })
    }

    /// 交换链、着色器和场景资源，所有窗口共用一条管线
    fn create_resources(
        descriptor: &BackendDescriptor,
        render_system: &RenderSystem,
        windows: Vec<Arc<Window>>,
        surfaces: Vec<wgpu::Surface<'static>>,
        config: &Config,
    ) -> Result<(Scene, Vec<WindowContext>)> {
        let caps = surfaces[0].get_capabilities(&render_system.adapter);
        let color_format = swap_chain::select_format(&caps.formats).ok_or_else(|| {
            error!("Surface reports no supported formats");
            GraphicsError::SwapchainError("Surface reports no supported formats".to_string())
        })?;
        debug!(?color_format, "Swap chain format selected");

        let loader = ShaderLoader::new(&config.shaders.root);
        let vertex_shader = loader.load(
            render_system,
            descriptor.module_name,
            &descriptor.vertex_shader,
            ShaderStage::Vertex,
        )?;
        let fragment_shader = loader.load(
            render_system,
            descriptor.module_name,
            &descriptor.fragment_shader,
            ShaderStage::Fragment,
        )?;
        let scene = Scene::new(render_system, &vertex_shader, &fragment_shader, color_format)?;

        let mut contexts = Vec::with_capacity(windows.len());
        for (index, (window, surface)) in windows.into_iter().zip(surfaces).enumerate() {
            let size = window.inner_size();
            let swap_chain = SwapChain::new(
                render_system,
                surface,
                color_format,
                size.width,
                size.height,
                config.graphics.vsync,
                descriptor.frame_latency,
            )?;
            let view = View::new(
                &config.scene,
                render_system.clipping_range(),
                size.width,
                size.height,
            );
            contexts.push(WindowContext {
                id: ContextId(index),
                window,
                swap_chain,
                gui: None,
                view,
                pointer: PointerInput::new(),
                open: true,
            });
        }

        Ok((scene, contexts))
    }

    /// 为每个窗口创建 GUI 上下文，然后调用后端的 `init_context`
    ///
    /// 第 k 个窗口失败时，前面已经初始化的窗口按相反顺序释放。
    pub fn init(&mut self) -> Result<()> {
        if self.gui_enabled {
            let Self { backend, contexts, render_system, .. } = self;
            lifecycle::init_in_order(
                &mut **backend,
                contexts.as_mut_slice(),
                |backend, context| {
                    context.gui = Some(GuiContext::new(&context.window));
                    if let Err(e) = backend.init_context(render_system, context) {
                        context.gui = None;
                        return Err(e);
                    }
                    debug!(context = ?context.id, "Window context initialized");
                    Ok(())
                },
                |backend, context| {
                    backend.release_context(context);
                    context.gui = None;
                    debug!(context = ?context.id, "Window context rolled back");
                },
            )?;
        }
        self.lifecycle.transition(LifecycleState::ContextInitialized)?;
        info!(backend = self.backend.name(), "Backend initialized");
        Ok(())
    }

    /// 按初始化的相反顺序释放窗口上下文
    ///
    /// 每个窗口先由后端销毁 GUI 桥接，再销毁 GUI 上下文。重复调用无副作用。
    pub fn release(&mut self) {
        if !matches!(
            self.lifecycle.state(),
            LifecycleState::ContextInitialized | LifecycleState::ContextActive
        ) {
            return;
        }

        // 等待已提交的帧执行完毕
        let _ = self.render_system.device.poll(wgpu::Maintain::Wait);

        for context in self.contexts.iter_mut().rev() {
            if context.gui.is_some() {
                self.backend.release_context(context);
                context.gui = None;
                debug!(context = ?context.id, "Window context released");
            }
        }

        if let Err(e) = self.lifecycle.transition(LifecycleState::ContextReleased) {
            warn!("{}", e);
        }
        info!(backend = self.backend.name(), "Backend released");
    }

    /// 计算一次帧间隔，然后依次渲染每个打开的窗口
    pub fn render_scene_for_all_contexts(&mut self) -> Result<()> {
        let dt = self.timer.tick();
        self.metrics.record_frame(dt);

        for index in 0..self.contexts.len() {
            if self.contexts[index].open {
                self.render_scene_for_context(index, dt)?;
            }
        }
        Ok(())
    }

    /// 渲染并呈现一个窗口
    pub fn render_scene_for_context(&mut self, index: usize, dt: f32) -> Result<()> {
        self.ensure_active()?;

        let Self { backend, contexts, scene, render_system, metrics, .. } = self;
        let Some(context) = contexts.get_mut(index) else {
            return Ok(());
        };

        context.view.advance(dt);
        let uniforms = context.view.uniforms();

        let Some(frame) = context.swap_chain.acquire(render_system)? else {
            return Ok(());
        };
        let target = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let status = FrameStatus {
            fps: metrics.fps(),
            frame_time_ms: metrics.frame_time_ms(),
            vsync: context.swap_chain.vsync(),
        };
        let mut actions = GuiActions::default();
        let draw_data = match context.gui.as_mut() {
            Some(gui) => {
                let view = &mut context.view;
                let target_size = context.swap_chain.size();
                Some(gui.run(&context.window, target_size, &mut context.pointer, |ctx| {
                    actions = controls::show(ctx, view, &status);
                }))
            }
            None => None,
        }
        .filter(|draw_data| !draw_data.is_empty());

        scene.upload(&render_system.queue, &uniforms);

        let mut encoder = render_system
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let context: &WindowContext = context;
        if let Some(draw_data) = &draw_data {
            backend.begin_frame(render_system, context, &mut encoder, draw_data)?;
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: context.swap_chain.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let (width, height) = context.swap_chain.size();
            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);

            scene.draw(&mut pass);

            if let Some(draw_data) = &draw_data {
                backend.end_frame(context, &mut pass, draw_data);
            }
        }

        render_system.queue.submit(Some(encoder.finish()));
        context.window.pre_present_notify();
        frame.present();

        // 垂直同步只在两帧之间切换
        if let Some(vsync) = actions.vsync {
            info!(vsync, "Changing vertical sync");
            for context in contexts.iter_mut() {
                context.swap_chain.set_vsync(render_system, vsync);
            }
        }

        Ok(())
    }

    /// 窗口尺寸变化：重建交换链和投影矩阵，然后立即重新渲染该窗口
    pub fn on_resize_surface(&mut self, window_id: WindowId, width: u32, height: u32) -> Result<()> {
        let Some(index) = self.context_index(window_id) else {
            return Ok(());
        };

        let context = &mut self.contexts[index];
        if !context.swap_chain.resize(&self.render_system, width, height) {
            // 最小化
            return Ok(());
        }
        context.view.update_projection(width, height);
        debug!(context = ?context.id, width, height, "Surface resized");

        if context.open {
            self.render_scene_for_context(index, 0.0)?;
        }
        Ok(())
    }

    /// 系统要求重绘：不推进动画，直接渲染并呈现
    pub fn on_update(&mut self, window_id: WindowId) -> Result<()> {
        match self.context_index(window_id) {
            Some(index) if self.contexts[index].open => self.render_scene_for_context(index, 0.0),
            _ => Ok(()),
        }
    }

    /// 记录指针位置（物理像素）
    pub fn on_pointer_motion(&mut self, window_id: WindowId, x: f32, y: f32) {
        if let Some(context) = self.context_mut(window_id) {
            context.pointer.on_motion(x, y);
        }
    }

    /// 记录左键按下或抬起
    pub fn on_pointer_button(&mut self, window_id: WindowId, pressed: bool) {
        if let Some(context) = self.context_mut(window_id) {
            context.pointer.on_button(pressed);
        }
    }

    /// 隐藏窗口并停止渲染它
    pub fn close_window(&mut self, window_id: WindowId) {
        if let Some(context) = self.context_mut(window_id) {
            context.open = false;
            context.window.set_visible(false);
            info!(context = ?context.id, "Window closed");
        }
    }

    pub fn is_any_window_open(&self) -> bool {
        self.contexts.iter().any(|context| context.open)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    fn context_index(&self, window_id: WindowId) -> Option<usize> {
        self.contexts.iter().position(|context| context.window_id() == window_id)
    }

    fn context_mut(&mut self, window_id: WindowId) -> Option<&mut WindowContext> {
        self.contexts.iter_mut().find(|context| context.window_id() == window_id)
    }

    fn ensure_active(&mut self) -> Result<()> {
        match self.lifecycle.state() {
            LifecycleState::ContextActive => Ok(()),
            LifecycleState::ContextInitialized => self.lifecycle.transition(LifecycleState::ContextActive),
            state => Err(DistOverlayError::Runtime(format!(
                "Cannot render while the backend is {}",
                state
            ))),
        }
    }
}

impl Drop for BackendHost {
    fn drop(&mut self) {
        self.release();
        if matches!(
            self.lifecycle.state(),
            LifecycleState::Created | LifecycleState::ContextReleased
        ) {
            self.backend.destroy();
            if let Err(e) = self.lifecycle.transition(LifecycleState::Destroyed) {
                warn!("{}", e);
            }
            info!(backend = self.backend.name(), "Backend destroyed");
        }
    }
}
