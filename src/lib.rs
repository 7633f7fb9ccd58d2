//! DistOverlay - 多后端立方体演示
//!
//! 同一个旋转的光照立方体和一个即时模式 GUI 浮层，可以在 Direct3D 11、
//! Direct3D 12、Vulkan、OpenGL 或 Metal 之间切换渲染。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、计时、日志、配置、错误处理）
//! - `scene`: 立方体几何、视图状态和场景管线
//! - `gui`: GUI 上下文、控制面板和渲染桥接
//! - `gfx`: 后端抽象、注册表、生命周期与各图形 API 的实现
//! - `app`: 窗口消息循环
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_overlay::gfx::BackendRegistry;
//!
//! let registry = BackendRegistry::with_builtin_backends();
//! let backend = registry.create("OpenGL").expect("OpenGL is always registered");
//! assert_eq!(backend.name(), "OpenGL");
//! ```

pub mod app;
pub mod core;
pub mod gfx;
pub mod gui;
pub mod scene;
