//! 控制面板
//!
//! 固定的一组控件：帧率读数、垂直同步开关、光照方向、模型距离、
//! 旋转模式以及对应的速度或角度、模型颜色。

use crate::core::math::TAU;
use crate::scene::view::{RotationMode, View};

/// 面板显示用的只读状态
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStatus {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub vsync: bool,
}

/// 需要在帧结束后由宿主执行的操作
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuiActions {
    /// 新的垂直同步设置
    pub vsync: Option<bool>,
}

/// 构建控制面板
pub fn show(ctx: &egui::Context, view: &mut View, status: &FrameStatus) -> GuiActions {
    let mut actions = GuiActions::default();

    egui::Window::new("DistOverlay")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!(
                "{:.1} FPS ({:.2} ms)",
                status.fps, status.frame_time_ms
            ));

            let mut vsync = status.vsync;
            if ui.checkbox(&mut vsync, "VSync").changed() {
                actions.vsync = Some(vsync);
            }

            ui.separator();

            ui.label("Light Direction:");
            let mut light = view.light;
            let mut light_changed = false;
            for (axis, value) in ["X", "Y", "Z"].iter().zip(light.iter_mut()) {
                light_changed |= ui
                    .add(egui::Slider::new(value, -1.0..=1.0).text(*axis))
                    .changed();
            }
            if light_changed {
                // 零向量会被拒绝，保留原来的方向
                view.set_light(light);
            }

            ui.add(egui::Slider::new(&mut view.distance, 2.0..=20.0).text("Distance"));

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Rotation:");
                ui.radio_value(&mut view.rotation_mode, RotationMode::Automatic, "Automatic");
                ui.radio_value(&mut view.rotation_mode, RotationMode::Manual, "Manual");
            });

            match view.rotation_mode {
                RotationMode::Automatic => {
                    ui.add(egui::Slider::new(&mut view.rotate_speed, 0.0..=1.0).text("Speed"));
                }
                RotationMode::Manual => {
                    ui.add(egui::Slider::new(&mut view.manual_angle, 0.0..=TAU).text("Angle"));
                }
            }

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color:");
                ui.color_edit_button_rgba_unmultiplied(&mut view.color);
            });
        });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SceneConfig;
    use crate::core::math::ClippingRange;

    fn run_frame(ctx: &egui::Context, view: &mut View) -> (egui::FullOutput, GuiActions) {
        let mut actions = GuiActions::default();
        let raw = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 768.0),
            )),
            ..Default::default()
        };
        let output = ctx.run(raw, |ctx| {
            actions = show(ctx, view, &FrameStatus { fps: 60.0, frame_time_ms: 16.7, vsync: true });
        });
        (output, actions)
    }

    #[test]
    fn test_panel_builds_headless() {
        let ctx = egui::Context::default();
        let mut view = View::new(&SceneConfig::default(), ClippingRange::ZeroToOne, 1280, 768);
        let before = view.clone();

        let (output, actions) = run_frame(&ctx, &mut view);
        let (output2, _) = run_frame(&ctx, &mut view);

        assert!(!output.shapes.is_empty() || !output2.shapes.is_empty());
        assert_eq!(actions, GuiActions::default());
        // 没有输入时不修改视图
        assert_eq!(view.light, before.light);
        assert_eq!(view.distance, before.distance);
        assert_eq!(view.rotation_mode, before.rotation_mode);
    }

    #[test]
    fn test_manual_mode_panel() {
        let ctx = egui::Context::default();
        let mut view = View::new(&SceneConfig::default(), ClippingRange::ZeroToOne, 1280, 768);
        view.rotation_mode = RotationMode::Manual;
        view.manual_angle = 1.0;

        let _ = run_frame(&ctx, &mut view);
        assert_eq!(view.rotation_mode, RotationMode::Manual);
        assert_eq!(view.manual_angle, 1.0);
    }
}
