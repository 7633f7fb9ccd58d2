//! 核心功能模块
//!
//! 与具体图形 API 无关的基础设施：数学、计时、日志、配置和错误处理。
//!
//! - `math`：投影矩阵与旋转矩阵
//! - `timer`：帧间隔计时
//! - `log`：结构化日志
//! - `config`：配置文件与命令行参数
//! - `error`：统一的错误类型

pub mod math;
pub mod timer;
pub mod log;
pub mod config;
pub mod error;

// 重新导出常用类型，方便使用
pub use error::{Result, DistOverlayError};
pub use config::Config;
