//! GUI 桥接
//!
//! 把 egui 的绘制数据提交到图形设备。每个窗口一个 [`GuiBridge`]，
//! 由具体后端在 `init_context` 中创建、在 `release_context` 中销毁。

use std::collections::{HashMap, HashSet};

use egui_wgpu::Renderer as EguiRenderer;
use tracing::{debug, warn};

use crate::gfx::host::{ContextId, WindowContext};
use crate::gfx::render_system::RenderSystem;
use crate::gfx::swap_chain::DEPTH_FORMAT;

use super::DrawData;

/// 单个窗口的 GUI 渲染器
pub struct GuiBridge {
    renderer: EguiRenderer,
    /// 已上传到设备的纹理
    uploaded: HashSet<egui::TextureId>,
    /// 上一帧要求释放的纹理，在下一帧开始时释放
    pending_free: Vec<egui::TextureId>,
}

impl GuiBridge {
    /// 按交换链和深度缓冲的格式创建渲染器
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        Self {
            renderer: EguiRenderer::new(device, color_format, depth_format, 1),
            uploaded: HashSet::new(),
            pending_free: Vec::new(),
        }
    }

    /// 上传本帧的纹理和顶点数据，必须在渲染通道开始之前调用
    ///
    /// `admit` 决定某个新纹理是否允许上传。返回本次真正释放的纹理。
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        draw_data: &DrawData,
        mut admit: impl FnMut(egui::TextureId) -> bool,
    ) -> Vec<egui::TextureId> {
        let freed: Vec<_> = self
            .pending_free
            .drain(..)
            .filter(|id| self.uploaded.remove(id))
            .collect();
        for id in &freed {
            self.renderer.free_texture(id);
        }

        for (id, delta) in &draw_data.textures_delta.set {
            // 局部更新只能作用在已经上传过的纹理上
            if delta.pos.is_some() && !self.uploaded.contains(id) {
                warn!(texture = ?id, "Skipping partial update of a texture that was never uploaded");
                continue;
            }
            if !admit(*id) {
                continue;
            }
            self.renderer.update_texture(device, queue, *id, delta);
            self.uploaded.insert(*id);
        }

        self.pending_free.extend(draw_data.textures_delta.free.iter().copied());

        // 没有自定义绘制回调，返回的命令缓冲总是空的
        let _ = self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &draw_data.paint_jobs,
            &draw_data.screen,
        );

        freed
    }

    /// 在已经开始的渲染通道中绘制 GUI
    pub fn render<'rp>(&'rp self, pass: &mut wgpu::RenderPass<'rp>, draw_data: &'rp DrawData) {
        self.renderer.render(pass, &draw_data.paint_jobs, &draw_data.screen);
    }
}

/// 按窗口索引的 GUI 渲染器集合
#[derive(Default)]
pub struct GuiBridges {
    bridges: HashMap<ContextId, GuiBridge>,
}

impl GuiBridges {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按窗口交换链的格式创建 GUI 渲染器
    pub fn create(&mut self, render_system: &RenderSystem, context: &WindowContext) {
        let color_format = context.swap_chain.format();
        debug!(context = ?context.id, ?color_format, "Creating GUI bridge");
        self.bridges.insert(
            context.id,
            GuiBridge::new(&render_system.device, color_format, Some(DEPTH_FORMAT)),
        );
    }

    /// 上传窗口本帧的 GUI 数据，返回被释放的纹理
    pub fn prepare(
        &mut self,
        render_system: &RenderSystem,
        context: ContextId,
        encoder: &mut wgpu::CommandEncoder,
        draw_data: &DrawData,
        admit: impl FnMut(egui::TextureId) -> bool,
    ) -> Vec<egui::TextureId> {
        match self.bridges.get_mut(&context) {
            Some(bridge) => bridge.prepare(
                &render_system.device,
                &render_system.queue,
                encoder,
                draw_data,
                admit,
            ),
            None => Vec::new(),
        }
    }

    /// 绘制窗口的 GUI，窗口没有桥接时什么也不做
    pub fn render<'rp>(
        &'rp self,
        context: ContextId,
        pass: &mut wgpu::RenderPass<'rp>,
        draw_data: &'rp DrawData,
    ) {
        if let Some(bridge) = self.bridges.get(&context) {
            bridge.render(pass, draw_data);
        }
    }

    pub fn remove(&mut self, context: ContextId) -> Option<GuiBridge> {
        let bridge = self.bridges.remove(&context);
        if bridge.is_some() {
            debug!(?context, "GUI bridge released");
        }
        bridge
    }

    /// 销毁所有桥接，返回销毁的数量
    pub fn clear(&mut self) -> usize {
        let count = self.bridges.len();
        self.bridges.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_bridge_is_ignored() {
        let mut bridges = GuiBridges::new();
        assert!(bridges.remove(ContextId(0)).is_none());
        assert_eq!(bridges.clear(), 0);
    }
}
