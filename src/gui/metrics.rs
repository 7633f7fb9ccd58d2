//! 帧率统计
//!
//! FrameRateMeter 由主循环传入的帧间隔驱动，每累计一秒刷新一次读数。

/// 帧率统计（帧率、帧时间）
#[derive(Debug, Clone, Default)]
pub struct FrameRateMeter {
    frame_count: u32,
    elapsed: f32,
    fps: f32,
    frame_time_ms: f32,
}

impl FrameRateMeter {
    /// 创建新的帧率统计器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一帧
    pub fn record_frame(&mut self, dt: f32) {
        self.frame_count += 1;
        self.elapsed += dt.max(0.0);

        // 每秒更新一次
        if self.elapsed >= 1.0 {
            self.fps = self.frame_count as f32 / self.elapsed;
            self.frame_time_ms = 1000.0 * self.elapsed / self.frame_count as f32;
            self.frame_count = 0;
            self.elapsed = 0.0;
        }
    }

    /// 当前 FPS
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// 当前帧时间（毫秒）
    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_updates_once_per_second() {
        let mut meter = FrameRateMeter::new();
        for _ in 0..59 {
            meter.record_frame(1.0 / 60.0);
        }
        assert_eq!(meter.fps(), 0.0);

        meter.record_frame(1.0 / 60.0 + 0.001);
        assert!((meter.fps() - 60.0).abs() < 0.5);
        assert!((meter.frame_time_ms() - 16.67).abs() < 0.1);
    }
}
