//! 帧计时
//!
//! 帧间隔由一个单调递增的计数器和固定频率计算：`dt = (now - last) / frequency`。
//! 计数器来源抽象为 [`TickSource`]，测试中用 [`ManualClock`] 精确控制时间推进。

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// 单调计数器
pub trait TickSource {
    /// 当前计数值
    fn ticks(&self) -> u64;

    /// 每秒的计数次数
    fn frequency(&self) -> u64;
}

/// 基于 `Instant` 的系统时钟，计数单位为纳秒
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for MonotonicClock {
    fn ticks(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn frequency(&self) -> u64 {
        1_000_000_000
    }
}

/// 手动推进的时钟
///
/// 克隆出的句柄共享同一个计数值，可以在把时钟交给
/// [`FrameTimer`] 之后继续从外部推进时间。
#[derive(Clone, Default)]
pub struct ManualClock {
    ticks: Rc<Cell<u64>>,
}

impl ManualClock {
    /// 计数频率：1 tick = 1 微秒
    pub const FREQUENCY: u64 = 1_000_000;

    pub fn new() -> Self {
        Self::default()
    }

    /// 向前推进若干秒
    pub fn advance_secs(&self, secs: f32) {
        let delta = (secs.max(0.0) as f64 * Self::FREQUENCY as f64).round() as u64;
        self.ticks.set(self.ticks.get() + delta);
    }
}

impl TickSource for ManualClock {
    fn ticks(&self) -> u64 {
        self.ticks.get()
    }

    fn frequency(&self) -> u64 {
        Self::FREQUENCY
    }
}

/// 帧计时器，记录上一次调用时的计数值
pub struct FrameTimer<C: TickSource> {
    clock: C,
    last_tick: u64,
}

impl<C: TickSource> FrameTimer<C> {
    /// 以当前计数值作为起点
    pub fn new(clock: C) -> Self {
        let last_tick = clock.ticks();
        Self { clock, last_tick }
    }

    /// 返回距上一次调用经过的秒数，并更新起点
    pub fn tick(&mut self) -> f32 {
        let now = self.clock.ticks();
        let elapsed = now.saturating_sub(self.last_tick);
        self.last_tick = now;
        (elapsed as f64 / self.clock.frequency() as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_drives_timer() {
        let clock = ManualClock::new();
        let mut timer = FrameTimer::new(clock.clone());

        clock.advance_secs(1.0);
        assert!((timer.tick() - 1.0).abs() < 1e-6);

        clock.advance_secs(0.25);
        assert!((timer.tick() - 0.25).abs() < 1e-6);

        // 没有推进时 dt 为 0
        assert_eq!(timer.tick(), 0.0);
    }

    #[test]
    fn test_monotonic_clock_is_non_decreasing() {
        let mut timer = FrameTimer::new(MonotonicClock::new());
        let dt = timer.tick();
        assert!(dt >= 0.0);
    }
}
