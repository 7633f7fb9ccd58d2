//! 后端注册表
//!
//! 名称到工厂函数的映射。每个具体后端模块提供一个 `register` 函数，
//! 在启动阶段由 [`BackendRegistry::with_builtin_backends`] 统一调用。
//! 同名再次注册会覆盖之前的工厂。

use std::collections::BTreeMap;

use tracing::debug;

use super::backend::Backend;

/// 后端工厂
pub type BackendFactory = Box<dyn Fn() -> Box<dyn Backend>>;

/// 后端注册表
#[derive(Default)]
pub struct BackendRegistry {
    factories: BTreeMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建注册表并注册当前平台可用的所有内置后端
    pub fn with_builtin_backends() -> Self {
        let mut registry = Self::new();

        #[cfg(target_os = "windows")]
        {
            super::dx11::register(&mut registry);
            super::dx12::register(&mut registry);
        }
        #[cfg(target_os = "macos")]
        super::metal::register(&mut registry);
        #[cfg(not(target_os = "macos"))]
        super::vulkan::register(&mut registry);
        super::opengl::register(&mut registry);

        registry
    }

    /// 注册后端工厂，同名时覆盖
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Backend> + 'static,
    {
        let name = name.into();
        debug!(backend = %name, "Registering backend");
        self.factories.insert(name, Box::new(factory));
    }

    /// 按名称创建后端，未注册时返回 `None`
    pub fn create(&self, name: &str) -> Option<Box<dyn Backend>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// 已注册的名称（按字母顺序）
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

/// 当前平台的默认后端名称
pub fn default_backend_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "Direct3D11"
    } else if cfg!(target_os = "macos") {
        "Metal"
    } else {
        "OpenGL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::opengl::OpenGLBackend;

    #[test]
    fn test_unknown_name_returns_none() {
        let registry = BackendRegistry::with_builtin_backends();
        let before = registry.names().len();
        assert!(registry.create("Direct3D9").is_none());
        assert_eq!(registry.names().len(), before);
    }

    #[test]
    fn test_builtin_backends() {
        let registry = BackendRegistry::with_builtin_backends();
        assert!(registry.contains("OpenGL"));
        assert!(registry.contains(default_backend_name()));

        let backend = registry.create("OpenGL").unwrap();
        assert_eq!(backend.name(), "OpenGL");
    }

    #[test]
    fn test_reregistration_replaces_factory() {
        use std::cell::Cell;
        use std::rc::Rc;

        let first_calls = Rc::new(Cell::new(0));
        let second_calls = Rc::new(Cell::new(0));

        let mut registry = BackendRegistry::new();
        let counter = first_calls.clone();
        registry.register("Test", move || {
            counter.set(counter.get() + 1);
            Box::new(OpenGLBackend::new()) as Box<dyn Backend>
        });
        let counter = second_calls.clone();
        registry.register("Test", move || {
            counter.set(counter.get() + 1);
            Box::new(OpenGLBackend::new()) as Box<dyn Backend>
        });

        assert!(registry.create("Test").is_some());
        assert_eq!(first_calls.get(), 0);
        assert_eq!(second_calls.get(), 1);
        assert_eq!(registry.names(), vec!["Test"]);
    }
}
