//! 后端生命周期状态机
//!
//! ```text
//! Uninitialized -> Created -> ContextInitialized -> ContextActive -> ContextReleased -> Destroyed
//!                     |               |                                    ^
//!                     |               +------------------------------------+
//!                     +--------------------------------------------------------> Destroyed
//! ```

use std::fmt;

use tracing::{trace, warn};

use crate::core::error::{DistOverlayError, Result};

/// 生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    /// 渲染系统、交换链和场景资源已创建
    Created,
    /// 每个窗口的 GUI 上下文已创建
    ContextInitialized,
    /// 正在逐帧渲染
    ContextActive,
    /// GUI 上下文已释放
    ContextReleased,
    Destroyed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 带合法性检查的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self { state: LifecycleState::Uninitialized }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// 是否允许从当前状态转移到 `next`
    pub fn can_transition(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self.state, next),
            (Uninitialized, Created)
                | (Created, ContextInitialized)
                | (Created, Destroyed)
                | (ContextInitialized, ContextActive)
                | (ContextInitialized, ContextReleased)
                | (ContextActive, ContextReleased)
                | (ContextReleased, Destroyed)
        )
    }

    /// 状态转移，非法转移返回错误且状态不变
    pub fn transition(&mut self, next: LifecycleState) -> Result<()> {
        if !self.can_transition(next) {
            return Err(DistOverlayError::Runtime(format!(
                "Illegal backend state transition {} -> {}",
                self.state, next
            )));
        }
        trace!(from = %self.state, to = %next, "Backend state transition");
        self.state = next;
        Ok(())
    }

    /// 在 `Created` 状态下执行剩余的创建步骤
    ///
    /// `build` 失败时先调用 `destroy` 释放后端已经持有的资源，再进入
    /// `Destroyed`，然后返回原来的错误。
    pub fn finish_creation<T>(
        &mut self,
        build: impl FnOnce() -> Result<T>,
        destroy: impl FnOnce(),
    ) -> Result<T> {
        match build() {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Backend creation failed, destroying: {}", e);
                destroy();
                self.transition(LifecycleState::Destroyed)?;
                Err(e)
            }
        }
    }
}

/// 按顺序初始化每一项，第 k 项失败时按相反顺序回滚第 0..k 项
///
/// 失败的那一项自身的部分状态由 `init` 负责清理。`state` 同时交给两个回调，
/// 通常是后端本身。
pub fn init_in_order<S: ?Sized, T>(
    state: &mut S,
    items: &mut [T],
    mut init: impl FnMut(&mut S, &mut T) -> Result<()>,
    mut rollback: impl FnMut(&mut S, &mut T),
) -> Result<()> {
    for index in 0..items.len() {
        if let Err(e) = init(state, &mut items[index]) {
            for item in items[..index].iter_mut().rev() {
                rollback(state, item);
            }
            return Err(e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    #[test]
    fn test_full_lifecycle() {
        let mut lifecycle = Lifecycle::new();
        for next in [Created, ContextInitialized, ContextActive, ContextReleased, Destroyed] {
            lifecycle.transition(next).unwrap();
        }
        assert_eq!(lifecycle.state(), Destroyed);
    }

    #[test]
    fn test_shortcuts() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.transition(Created).unwrap();
        lifecycle.transition(Destroyed).unwrap();

        let mut lifecycle = Lifecycle::new();
        lifecycle.transition(Created).unwrap();
        lifecycle.transition(ContextInitialized).unwrap();
        lifecycle.transition(ContextReleased).unwrap();
        assert_eq!(lifecycle.state(), ContextReleased);
    }

    #[test]
    fn test_illegal_transition_keeps_state() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.transition(ContextActive).is_err());
        assert_eq!(lifecycle.state(), Uninitialized);

        lifecycle.transition(Created).unwrap();
        assert!(lifecycle.transition(ContextActive).is_err());
        assert!(lifecycle.transition(Created).is_err());
        assert_eq!(lifecycle.state(), Created);

        lifecycle.transition(Destroyed).unwrap();
        assert!(lifecycle.transition(Created).is_err());
    }

    #[test]
    fn test_failed_creation_destroys_backend() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.transition(Created).unwrap();

        let mut destroyed = false;
        let result: Result<()> = lifecycle.finish_creation(
            || Err(DistOverlayError::Initialization("pipeline".to_string())),
            || destroyed = true,
        );

        assert!(result.is_err());
        assert!(destroyed);
        assert_eq!(lifecycle.state(), Destroyed);
    }

    #[test]
    fn test_successful_creation_keeps_backend() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.transition(Created).unwrap();

        let mut destroyed = false;
        let value = lifecycle.finish_creation(|| Ok(42), || destroyed = true).unwrap();

        assert_eq!(value, 42);
        assert!(!destroyed);
        assert_eq!(lifecycle.state(), Created);
    }

    #[test]
    fn test_init_failure_rolls_back_in_reverse() {
        let mut log: Vec<String> = Vec::new();
        let mut windows = [0, 1, 2, 3];

        let result = init_in_order(
            &mut log,
            &mut windows,
            |log, window| {
                if *window == 2 {
                    log.push(format!("fail {}", window));
                    return Err(DistOverlayError::Initialization("bridge".to_string()));
                }
                log.push(format!("init {}", window));
                Ok(())
            },
            |log, window| log.push(format!("release {}", window)),
        );

        assert!(result.is_err());
        assert_eq!(
            log,
            vec!["init 0", "init 1", "fail 2", "release 1", "release 0"]
        );
    }

    #[test]
    fn test_init_success_skips_rollback() {
        let mut log: Vec<String> = Vec::new();
        let mut windows = [0, 1];

        init_in_order(
            &mut log,
            &mut windows,
            |log, window| {
                log.push(format!("init {}", window));
                Ok(())
            },
            |log, window| log.push(format!("release {}", window)),
        )
        .unwrap();

        assert_eq!(log, vec!["init 0", "init 1"]);
    }
}
