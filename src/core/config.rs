//! 配置管理模块
//!
//! 提供程序配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 768
//! title = "DistOverlay"
//! count = 1
//!
//! [graphics]
//! backend = "Vulkan"  # Direct3D11, Direct3D12, Vulkan, OpenGL；留空则使用平台默认值
//! vsync = true
//!
//! [scene]
//! fov = 45.0
//! rotate_speed = 0.1
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};
use super::math;

/// 最多同时打开的窗口数量
pub const MAX_WINDOWS: u32 = 4;

/// 程序配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 图形配置
    #[serde(default)]
    pub graphics: GraphicsConfig,

    /// 场景配置
    #[serde(default)]
    pub scene: SceneConfig,

    /// GUI 配置
    #[serde(default)]
    pub gui: GuiConfig,

    /// 着色器资源配置
    #[serde(default)]
    pub shaders: ShaderConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_title")]
    pub title: String,

    /// 是否可调整大小
    #[serde(default = "default_resizable")]
    pub resizable: bool,

    /// 窗口数量，每个窗口拥有独立的交换链、GUI 和视图
    #[serde(default = "default_window_count")]
    pub count: u32,
}

/// 图形配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// 后端名称（注册表中的键），为空时使用平台默认后端
    #[serde(default)]
    pub backend: Option<String>,

    /// 垂直同步
    #[serde(default = "default_vsync")]
    pub vsync: bool,

    /// 启用图形 API 的调试与验证层
    #[serde(default)]
    pub debug: bool,
}

/// 场景配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 垂直视场角（度）
    #[serde(default = "default_fov")]
    pub fov: f32,

    /// 近裁剪面
    #[serde(default = "default_near")]
    pub near: f32,

    /// 远裁剪面
    #[serde(default = "default_far")]
    pub far: f32,

    /// 模型到相机的距离
    #[serde(default = "default_distance")]
    pub distance: f32,

    /// 自动旋转速度
    #[serde(default = "default_rotate_speed")]
    pub rotate_speed: f32,

    /// 模型颜色 (RGBA)
    #[serde(default = "default_color")]
    pub color: [f32; 4],

    /// 光照方向（指向光源），加载后会被归一化
    #[serde(default = "default_light")]
    pub light: [f32; 3],
}

/// GUI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiConfig {
    /// 是否绘制 GUI 覆盖层
    #[serde(default = "default_gui_enabled")]
    pub enabled: bool,
}

/// 着色器资源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// 着色器根目录，各后端从 `<root>/<后端名>/` 子目录加载
    #[serde(default = "default_shader_root")]
    pub root: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// 过滤器指令中使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

// 默认值函数
fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 768 }
fn default_title() -> String { "DistOverlay".to_string() }
fn default_resizable() -> bool { true }
fn default_window_count() -> u32 { 1 }
fn default_vsync() -> bool { true }
fn default_fov() -> f32 { 45.0 }
fn default_near() -> f32 { 0.1 }
fn default_far() -> f32 { 100.0 }
fn default_distance() -> f32 { 5.0 }
fn default_rotate_speed() -> f32 { 0.1 }
fn default_color() -> [f32; 4] { [0.6, 0.8, 1.0, 1.0] }
fn default_light() -> [f32; 3] { [-0.25, 0.5, -1.0] }
fn default_gui_enabled() -> bool { true }
fn default_shader_root() -> String { "assets/shaders".to_string() }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "distoverlay.log".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            resizable: default_resizable(),
            count: default_window_count(),
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            backend: None,
            vsync: default_vsync(),
            debug: false,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            distance: default_distance(),
            rotate_speed: default_rotate_speed(),
            color: default_color(),
            light: default_light(),
        }
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self { enabled: default_gui_enabled() }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self { root: default_shader_root() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl SceneConfig {
    /// 归一化后的光照方向
    ///
    /// 零向量无法归一化，此时退回默认方向。
    pub fn light_direction(&self) -> [f32; 3] {
        let fallback = math::normalize_or(default_light(), [0.0, 0.0, -1.0]);
        math::normalize_or(self.light, fallback)
    }
}

impl Config {
    /// 从配置文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml(&contents)
    }

    /// 从 TOML 文本解析
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在或无法解析则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 从命令行参数覆盖配置
    ///
    /// 第一个参数是程序名，会被跳过。
    ///
    /// 支持的参数：
    /// - `<name>`: 第一个非选项参数，指定后端名称（如 `Vulkan`）
    /// - `--width <value>` / `--height <value>`: 窗口尺寸
    /// - `--windows <value>`: 窗口数量
    /// - `--no-gui`: 关闭 GUI 覆盖层
    /// - `--no-vsync`: 关闭垂直同步
    /// - `--debug`: 启用图形 API 调试层
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().skip(1).map(|s| s.as_ref().to_string()).collect();

        let mut backend_seen = false;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--width" => {
                    if let Some(width) = iter.next().and_then(|v| v.parse().ok()) {
                        self.window.width = width;
                    }
                }
                "--height" => {
                    if let Some(height) = iter.next().and_then(|v| v.parse().ok()) {
                        self.window.height = height;
                    }
                }
                "--windows" => {
                    if let Some(count) = iter.next().and_then(|v| v.parse().ok()) {
                        self.window.count = count;
                    }
                }
                "--no-gui" => self.gui.enabled = false,
                "--no-vsync" => self.graphics.vsync = false,
                "--debug" => self.graphics.debug = true,
                // 只有第一个位置参数会被当作后端名称
                other if !other.starts_with("--") && !other.is_empty() && !backend_seen => {
                    self.graphics.backend = Some(other.to_string());
                    backend_seen = true;
                }
                _ => {}
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window.width/height", "Window dimensions must be greater than 0"));
        }

        if self.window.count == 0 || self.window.count > MAX_WINDOWS {
            return Err(invalid(
                "window.count",
                &format!("Window count must be between 1 and {}", MAX_WINDOWS),
            ));
        }

        let scene = &self.scene;
        if !(scene.fov > 0.0 && scene.fov < 180.0) {
            return Err(invalid("scene.fov", "Field of view must be within (0, 180) degrees"));
        }

        if !(scene.near > 0.0 && scene.far > scene.near) {
            return Err(invalid("scene.near/far", "Clipping planes must satisfy 0 < near < far"));
        }

        if scene.distance <= 0.0 {
            return Err(invalid("scene.distance", "Model distance must be positive"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> super::error::DistOverlayError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.window.count, 1);
        assert!(config.graphics.backend.is_none());
        assert!(config.graphics.vsync);
        assert!(config.gui.enabled);
        assert_eq!(config.scene.fov, 45.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.window.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window.count = MAX_WINDOWS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scene.near = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args(["dist_overlay", "--width", "1920", "Vulkan", "--no-gui", "--windows", "2"]);

        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.count, 2);
        assert_eq!(config.graphics.backend.as_deref(), Some("Vulkan"));
        assert!(!config.gui.enabled);
    }

    #[test]
    fn test_only_first_positional_selects_backend() {
        let mut config = Config::default();
        config.apply_args(["dist_overlay", "OpenGL", "Vulkan"]);
        assert_eq!(config.graphics.backend.as_deref(), Some("OpenGL"));
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            [graphics]
            backend = "Direct3D12"

            [scene]
            rotate_speed = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.graphics.backend.as_deref(), Some("Direct3D12"));
        assert!(config.graphics.vsync);
        assert_eq!(config.scene.rotate_speed, 0.5);
        assert_eq!(config.scene.fov, 45.0);
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_light_direction_is_normalized() {
        let mut scene = SceneConfig::default();
        scene.light = [0.0, 3.0, 4.0];
        let light = scene.light_direction();
        assert!((light[1] - 0.6).abs() < 1e-6);
        assert!((light[2] - 0.8).abs() < 1e-6);

        scene.light = [0.0, 0.0, 0.0];
        let fallback = scene.light_direction();
        let length = (fallback[0].powi(2) + fallback[1].powi(2) + fallback[2].powi(2)).sqrt();
        assert!((length - 1.0).abs() < 1e-5);
    }
}
