//! 每个窗口的 GUI 上下文
//!
//! 持有 egui 上下文和 egui-winit 的平台状态。egui-winit 负责屏幕尺寸、
//! 缩放系数和光标形状等平台信息，指针输入由 [`PointerInput`] 单独转发。

use egui_wgpu::ScreenDescriptor;
use winit::window::Window;

use super::input::PointerInput;
use super::DrawData;

/// GUI 上下文
pub struct GuiContext {
    ctx: egui::Context,
    platform: egui_winit::State,
}

impl GuiContext {
    /// 创建绑定到窗口的 GUI 上下文
    pub fn new(window: &Window) -> Self {
        let ctx = egui::Context::default();
        let viewport_id = ctx.viewport_id();
        let platform = egui_winit::State::new(
            ctx.clone(),
            viewport_id,
            window,
            Some(window.scale_factor() as f32),
            None,
        );
        Self { ctx, platform }
    }

    /// 运行一帧 GUI 并细分为绘制数据
    ///
    /// `target_size` 是交换链当前配置的尺寸，而不是窗口尺寸：两者在最小化或
    /// 表面重新配置之后可能不同，GUI 的裁剪矩形必须落在渲染目标之内。
    pub fn run(
        &mut self,
        window: &Window,
        target_size: (u32, u32),
        pointer: &mut PointerInput,
        build: impl FnOnce(&egui::Context),
    ) -> DrawData {
        let mut raw = self.platform.take_egui_input(window);
        let pixels_per_point = egui_winit::pixels_per_point(&self.ctx, window);
        pointer.drain_into(&mut raw, pixels_per_point);

        let mut build = Some(build);
        let output = self.ctx.run(raw, |ctx| {
            if let Some(build) = build.take() {
                build(ctx);
            }
        });

        self.platform.handle_platform_output(window, output.platform_output);

        let paint_jobs = self.ctx.tessellate(output.shapes, output.pixels_per_point);

        DrawData {
            paint_jobs,
            textures_delta: output.textures_delta,
            screen: screen_descriptor(target_size, output.pixels_per_point),
        }
    }
}

/// 按渲染目标的尺寸生成屏幕描述
fn screen_descriptor((width, height): (u32, u32), pixels_per_point: f32) -> ScreenDescriptor {
    ScreenDescriptor {
        size_in_pixels: [width, height],
        pixels_per_point,
    }
}
