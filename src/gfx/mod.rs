//! 图形后端模块
//!
//! 本模块封装了不同图形 API 的底层实现：
//! - Direct3D 11 / Direct3D 12：Windows 平台
//! - Vulkan：跨平台的现代图形 API
//! - OpenGL：兼容性最好的后端，只支持单窗口
//! - Metal：macOS 平台
//!
//! 所有后端都实现了统一的 [`Backend`] trait，由 [`BackendRegistry`] 按名称创建，
//! 再交给 [`BackendHost`] 驱动。

pub mod backend;
pub mod descriptor;
pub mod host;
pub mod lifecycle;
pub mod registry;
pub mod render_system;
pub mod shader;
pub mod swap_chain;

pub mod opengl;
#[cfg(not(target_os = "macos"))]
pub mod vulkan;
#[cfg(target_os = "windows")]
pub mod dx11;
#[cfg(target_os = "windows")]
pub mod dx12;
#[cfg(target_os = "macos")]
pub mod metal;

pub use backend::{Backend, BackendDescriptor, ShaderDesc};
pub use host::{BackendHost, ContextId, WindowContext};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use registry::{default_backend_name, BackendRegistry};
pub use render_system::RenderSystem;
