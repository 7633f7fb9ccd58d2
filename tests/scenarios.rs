//! 不依赖窗口和 GPU 的端到端场景

use dist_overlay::core::config::{Config, SceneConfig};
use dist_overlay::core::math::{ClippingRange, TAU};
use dist_overlay::core::timer::{FrameTimer, ManualClock};
use dist_overlay::gfx::{default_backend_name, BackendRegistry, Lifecycle, LifecycleState};
use dist_overlay::scene::View;

#[test]
fn test_registry_creates_backend_by_name() {
    let registry = BackendRegistry::with_builtin_backends();

    let backend = registry.create("OpenGL").expect("OpenGL is always registered");
    assert_eq!(backend.name(), "OpenGL");
    assert_eq!(backend.descriptor().max_windows, 1);

    assert!(registry.contains(default_backend_name()));
}

#[test]
fn test_registry_rejects_unknown_backend() {
    let registry = BackendRegistry::with_builtin_backends();
    assert!(registry.create("Glide").is_none());
    assert!(registry.create("opengl").is_none());
}

#[test]
fn test_ten_seconds_of_rotation() {
    let clock = ManualClock::new();
    let mut timer = FrameTimer::new(clock.clone());
    let mut view = View::new(&SceneConfig::default(), ClippingRange::ZeroToOne, 1280, 768);

    for _ in 0..10 {
        clock.advance_secs(1.0);
        view.advance(timer.tick());
    }

    // 0.1 * 10 rad/s * 10 s = 10 rad，折回 [0, 2π) 后约为 3.7168
    assert!((view.angle - (10.0 - TAU)).abs() < 1e-3);
    assert!((view.angle - 3.7168).abs() < 1e-3);
}

#[test]
fn test_resize_only_changes_horizontal_scale() {
    let mut view = View::new(&SceneConfig::default(), ClippingRange::ZeroToOne, 1280, 768);
    let before = view.projection;

    view.update_projection(1920, 1080);

    assert_ne!(before[0][0], view.projection[0][0]);
    assert!((before[1][1] - view.projection[1][1]).abs() < 1e-6);
}

#[test]
fn test_backend_lifecycle_order() {
    let mut lifecycle = Lifecycle::new();
    for state in [
        LifecycleState::Created,
        LifecycleState::ContextInitialized,
        LifecycleState::ContextActive,
        LifecycleState::ContextReleased,
        LifecycleState::Destroyed,
    ] {
        lifecycle.transition(state).expect("legal transition");
    }

    // 销毁之后不能再初始化
    assert!(lifecycle.transition(LifecycleState::ContextInitialized).is_err());
}

#[test]
fn test_command_line_selects_backend() {
    let mut config = Config::default();
    config.apply_args(
        ["dist_overlay", "Vulkan", "--windows", "2"]
            .iter()
            .map(|s| s.to_string()),
    );

    assert_eq!(config.graphics.backend.as_deref(), Some("Vulkan"));
    assert_eq!(config.window.count, 2);
    assert!(config.validate().is_ok());
}
