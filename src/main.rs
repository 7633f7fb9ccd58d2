//! DistOverlay - 多后端立方体演示
//!
//! 通过配置文件或命令行参数选择图形后端，打开一个或多个窗口，
//! 在每个窗口中绘制旋转的立方体和 GUI 控制面板。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件（默认后端取决于平台）
//! cargo run
//!
//! # 指定后端（第一个位置参数）
//! cargo run -- Vulkan
//!
//! # 两个窗口，关闭 GUI
//! cargo run -- Direct3D12 --windows 2 --no-gui
//! ```
//!
//! # 架构概览
//!
//! ```text
//! ┌─────────────┐
//! │   main.rs   │  配置、日志、窗口
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Registry   │  按名称创建后端
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ BackendHost │  生命周期 + 每帧编排
//! └──────┬──────┘
//!        │
//!   ┌────┼────┬──────┬──────┐
//! ┌─▼─┐┌─▼─┐┌─▼──┐┌──▼──┐┌──▼──┐
//! │D11││D12││ VK ││ GL  ││Metal│  具体后端实现
//! └───┘└───┘└────┘└─────┘└─────┘
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use dist_overlay::app::Application;
use dist_overlay::core::{log, Config};
use dist_overlay::gfx::{default_backend_name, BackendHost, BackendRegistry};

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（config.toml）并应用命令行参数
/// 2. 初始化日志系统
/// 3. 按名称从注册表创建后端
/// 4. 创建窗口（不超过后端支持的数量）
/// 5. 创建并初始化后端宿主
/// 6. 启动主循环
///
/// 任何初始化错误都会记录日志并以状态码 1 退出。
fn main() {
    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("config.toml");
    config.apply_args(std::env::args());

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // 2. 初始化日志系统
    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!(version = env!("CARGO_PKG_VERSION"), "DistOverlay starting...");

    if let Err(e) = run(config) {
        error!("{:#}", e);
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    // 3. 创建后端
    let registry = BackendRegistry::with_builtin_backends();
    let name = config
        .graphics
        .backend
        .clone()
        .unwrap_or_else(|| default_backend_name().to_string());

    let Some(backend) = registry.create(&name) else {
        error!(requested = %name, available = ?registry.names(), "Unknown backend");
        anyhow::bail!(
            "Unknown backend '{}', available: {}",
            name,
            registry.names().join(", ")
        );
    };

    let max_windows = backend.descriptor().max_windows;
    let mut window_count = config.window.count as usize;
    if window_count > max_windows {
        warn!(
            backend = backend.name(),
            requested = window_count,
            max_windows,
            "Too many windows requested, clamping"
        );
        window_count = max_windows;
    }

    info!(
        backend = backend.name(),
        width = config.window.width,
        height = config.window.height,
        windows = window_count,
        vsync = config.graphics.vsync,
        gui = config.gui.enabled,
        "Graphics configuration"
    );

    // 4. 创建事件循环和窗口
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let title = format!("{} [{}]", config.window.title, backend.name());
    let windows = (0..window_count)
        .map(|index| {
            let title = if window_count > 1 {
                format!("{} #{}", title, index + 1)
            } else {
                title.clone()
            };
            WindowBuilder::new()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
                .with_resizable(config.window.resizable)
                .build(&event_loop)
                .map(Arc::new)
                .context("Failed to create window")
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    // 5. 创建并初始化后端宿主
    let mut host = BackendHost::create(backend, windows, &config)
        .context("Failed to create backend")?;
    host.init().context("Failed to initialize backend")?;
    info!("Backend initialized successfully");

    // 6. 启动主循环
    Application::new(host).run(event_loop)
}
