//! GUI 系统模块
//!
//! 基于 egui 的即时模式 GUI 覆盖层。每个窗口拥有独立的 GUI 上下文，
//! 帧数据经由具体后端持有的 GUI 桥接提交到设备。

pub mod bridge;
pub mod context;
pub mod controls;
mod draw_data;
pub mod input;
pub mod metrics;

pub use bridge::{GuiBridge, GuiBridges};
pub use context::GuiContext;
pub use controls::{FrameStatus, GuiActions};
pub use draw_data::DrawData;
pub use input::PointerInput;
pub use metrics::FrameRateMeter;
