//! 指针输入转发
//!
//! 窗口事件只记录指针位置和左键的按下/抬起，真正交给 egui 是在下一帧
//! 构建 GUI 之前。位置以物理像素记录，转发时按缩放系数换算成逻辑点。

/// 一个窗口的指针状态
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    /// 最近一次的指针位置（物理像素，相对窗口左上角）
    position: Option<[f32; 2]>,
    moved: bool,
    /// 尚未转发的左键状态变化，`true` 为按下
    pending_buttons: Vec<bool>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录指针移动
    pub fn on_motion(&mut self, x: f32, y: f32) {
        self.position = Some([x, y]);
        self.moved = true;
    }

    /// 记录左键按下或抬起
    pub fn on_button(&mut self, pressed: bool) {
        self.pending_buttons.push(pressed);
    }

    pub fn position(&self) -> Option<[f32; 2]> {
        self.position
    }

    pub fn has_pending(&self) -> bool {
        self.moved || !self.pending_buttons.is_empty()
    }

    /// 把累积的输入转成 egui 事件追加到 `raw`，并清空待处理状态
    pub fn drain_into(&mut self, raw: &mut egui::RawInput, pixels_per_point: f32) {
        let scale = if pixels_per_point > 0.0 { pixels_per_point } else { 1.0 };
        let Some([x, y]) = self.position else {
            self.pending_buttons.clear();
            self.moved = false;
            return;
        };
        let pos = egui::pos2(x / scale, y / scale);

        if self.moved {
            raw.events.push(egui::Event::PointerMoved(pos));
            self.moved = false;
        }

        for pressed in self.pending_buttons.drain(..) {
            raw.events.push(egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: raw.modifiers,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_converts_to_points() {
        let mut input = PointerInput::new();
        input.on_motion(200.0, 100.0);
        input.on_button(true);
        input.on_button(false);

        let mut raw = egui::RawInput::default();
        input.drain_into(&mut raw, 2.0);

        assert_eq!(raw.events.len(), 3);
        assert_eq!(raw.events[0], egui::Event::PointerMoved(egui::pos2(100.0, 50.0)));
        assert!(matches!(
            raw.events[1],
            egui::Event::PointerButton { pressed: true, button: egui::PointerButton::Primary, .. }
        ));
        assert!(matches!(raw.events[2], egui::Event::PointerButton { pressed: false, .. }));
        assert!(!input.has_pending());
    }

    #[test]
    fn test_buttons_without_position_are_dropped() {
        let mut input = PointerInput::new();
        input.on_button(true);

        let mut raw = egui::RawInput::default();
        input.drain_into(&mut raw, 1.0);
        assert!(raw.events.is_empty());
        assert!(!input.has_pending());
    }

    #[test]
    fn test_position_is_kept_between_frames() {
        let mut input = PointerInput::new();
        input.on_motion(10.0, 20.0);
        input.drain_into(&mut egui::RawInput::default(), 1.0);

        input.on_button(true);
        let mut raw = egui::RawInput::default();
        input.drain_into(&mut raw, 1.0);
        assert_eq!(raw.events.len(), 1);
        assert_eq!(input.position(), Some([10.0, 20.0]));
    }
}
