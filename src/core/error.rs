//! 错误处理模块
//!
//! 定义了程序中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理
//!
//! 资源创建阶段的任何错误都是致命的：调用方通过 `?` 逐级返回，
//! 最终由入口函数记录日志并以非零状态码退出。

use std::fmt;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, DistOverlayError>;

/// DistOverlay 的错误类型
#[derive(Debug)]
pub enum DistOverlayError {
    /// 配置错误
    Config(ConfigError),

    /// 图形 API 错误
    Graphics(GraphicsError),

    /// IO 错误
    Io(std::io::Error),

    /// 初始化错误
    Initialization(String),

    /// 运行时错误
    Runtime(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug)]
pub enum GraphicsError {
    /// 渲染系统模块（原生图形 API）加载失败
    ModuleLoad(String),

    /// 设备创建失败
    DeviceCreation(String),

    /// 交换链错误
    SwapchainError(String),

    /// 着色器加载或编译失败
    ShaderCompilation(String),

    /// 管线状态创建失败
    PipelineCreation(String),
}

impl fmt::Display for DistOverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistOverlayError::Config(e) => write!(f, "Configuration error: {}", e),
            DistOverlayError::Graphics(e) => write!(f, "Graphics error: {}", e),
            DistOverlayError::Io(e) => write!(f, "IO error: {}", e),
            DistOverlayError::Initialization(msg) => write!(f, "Initialization error: {}", msg),
            DistOverlayError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::ModuleLoad(msg) => write!(f, "Failed to load render system: {}", msg),
            GraphicsError::DeviceCreation(msg) => write!(f, "Device creation failed: {}", msg),
            GraphicsError::SwapchainError(msg) => write!(f, "Swapchain error: {}", msg),
            GraphicsError::ShaderCompilation(msg) => write!(f, "Shader compilation failed: {}", msg),
            GraphicsError::PipelineCreation(msg) => write!(f, "Pipeline creation failed: {}", msg),
        }
    }
}

impl std::error::Error for DistOverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DistOverlayError::Io(e) => Some(e),
            DistOverlayError::Config(e) => Some(e),
            DistOverlayError::Graphics(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for GraphicsError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for DistOverlayError {
    fn from(err: std::io::Error) -> Self {
        DistOverlayError::Io(err)
    }
}

impl From<ConfigError> for DistOverlayError {
    fn from(err: ConfigError) -> Self {
        DistOverlayError::Config(err)
    }
}

impl From<GraphicsError> for DistOverlayError {
    fn from(err: GraphicsError) -> Self {
        DistOverlayError::Graphics(err)
    }
}
