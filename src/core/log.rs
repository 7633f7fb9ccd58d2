//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能，是程序唯一的文本诊断通道：
//! 渲染系统加载失败、着色器编译失败、管线创建失败等都通过这里输出。
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_overlay::core::config::LogLevel;
//! use dist_overlay::core::log;
//!
//! log::init_logger(LogLevel::Info, false, None);
//! tracing::info!(width = 1280, height = 768, "Window created");
//! ```

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::Path;

use super::config::LogLevel;

/// 图形栈内部的 crate 默认只输出警告以上的日志，避免刷屏
const QUIET_CRATES: &[&str] = &["wgpu_core", "wgpu_hal", "naga", "egui_wgpu"];

/// 初始化日志系统
///
/// 必须在程序开始时调用一次。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "distoverlay.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) {
    let filter = build_filter(level);

    if file_output {
        // 解析日志文件路径
        let log_path = log_file_path.unwrap_or("distoverlay.log");
        let path = Path::new(log_path);
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("distoverlay.log");

        // 创建滚动文件 appender（每天滚动）
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            directory,
            filename
        );

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)  // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// 构建过滤器指令，例如 `info,wgpu_core=warn,...`
fn filter_directives(level: LogLevel) -> String {
    let mut directives = level.as_str().to_string();
    for krate in QUIET_CRATES {
        // 用户要求的级别比 warn 更严格时无需再单独收紧
        if Level::from(level) > Level::WARN {
            directives.push_str(&format!(",{}=warn", krate));
        }
    }
    directives
}

fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(filter_directives(level))
}

/// 日志级别转换
impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
