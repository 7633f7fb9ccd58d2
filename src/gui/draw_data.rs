//! 一帧 GUI 的绘制数据

use egui_wgpu::ScreenDescriptor;

/// 细分后的 GUI 图元、纹理变化和屏幕描述
pub struct DrawData {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen: ScreenDescriptor,
}

impl DrawData {
    /// 没有图元也没有纹理变化
    pub fn is_empty(&self) -> bool {
        self.paint_jobs.is_empty()
            && self.textures_delta.set.is_empty()
            && self.textures_delta.free.is_empty()
    }
}
