//! 着色器资源加载
//!
//! 着色器文件按扩展名区分格式：
//! - `.spv`：SPIR-V 二进制（Vulkan，构建时由 build.rs 生成）
//! - `.vert` / `.frag` / `.glsl`：GLSL 源码（OpenGL）
//! - `.wgsl`：WGSL 源码（Direct3D 11/12、Metal）
//!
//! 查找顺序：先在配置的着色器根目录下找 `<根目录>/<后端名>/<文件名>`，
//! 找不到时再到构建时生成的 SPIR-V 目录里找。

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::core::error::{GraphicsError, Result};

use super::backend::ShaderDesc;
use super::render_system::RenderSystem;

/// SPIR-V 文件头的魔数
const SPIRV_MAGIC: u32 = 0x0723_0203;

/// 着色器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_naga(self) -> wgpu::naga::ShaderStage {
        match self {
            ShaderStage::Vertex => wgpu::naga::ShaderStage::Vertex,
            ShaderStage::Fragment => wgpu::naga::ShaderStage::Fragment,
        }
    }
}

/// 着色器源码格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderSourceKind {
    SpirV,
    Glsl,
    Wgsl,
}

impl ShaderSourceKind {
    /// 根据扩展名判断格式，未知扩展名返回 `None`
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "spv" => Some(ShaderSourceKind::SpirV),
            "vert" | "frag" | "glsl" => Some(ShaderSourceKind::Glsl),
            "wgsl" => Some(ShaderSourceKind::Wgsl),
            _ => None,
        }
    }
}

/// 解析 `vs_6_0` 形式的编译配置，返回 (主版本, 次版本)
pub fn shader_model(profile: &str) -> Option<(u32, u32)> {
    let mut parts = profile.split('_');
    let _stage = parts.next()?;
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor))
}

/// Direct3D 着色器编译器：Shader Model 6 及以上用 DXC，以下用 FXC
pub fn dx12_compiler(profile: Option<&str>) -> wgpu::Dx12Compiler {
    match profile.and_then(shader_model) {
        Some((major, _)) if major >= 6 => wgpu::Dx12Compiler::Dxc {
            dxil_path: None,
            dxc_path: None,
        },
        _ => wgpu::Dx12Compiler::Fxc,
    }
}

/// 编译完成的着色器模块
pub struct CompiledShader {
    pub module: wgpu::ShaderModule,
    pub entry_point: &'static str,
}

/// 着色器加载器
#[derive(Debug, Clone)]
pub struct ShaderLoader {
    roots: Vec<PathBuf>,
}

impl ShaderLoader {
    /// 以配置的根目录创建加载器，构建时生成的 SPIR-V 目录作为后备
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![root.into(), PathBuf::from(env!("DIST_OVERLAY_SPIRV_DIR"))],
        }
    }

    /// 查找着色器文件
    pub fn resolve(&self, module_name: &str, filename: &str) -> Result<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(module_name).join(filename))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                error!(module = module_name, file = filename, "Shader file not found");
                GraphicsError::ShaderCompilation(format!(
                    "{}/{}: file not found",
                    module_name, filename
                ))
                .into()
            })
    }

    /// 读取并编译着色器
    pub fn load(
        &self,
        render_system: &RenderSystem,
        module_name: &str,
        desc: &ShaderDesc,
        stage: ShaderStage,
    ) -> Result<CompiledShader> {
        let path = self.resolve(module_name, desc.filename)?;
        debug!(path = %path.display(), entry = desc.entry(), ?stage, "Loading shader");

        let fail = |reason: String| {
            error!(file = desc.filename, "Failed to compile shader: {}", reason);
            GraphicsError::ShaderCompilation(format!("{}: {}", desc.filename, reason))
        };

        let kind = ShaderSourceKind::from_path(&path)
            .ok_or_else(|| fail("unknown shader file type".to_string()))?;

        let source = match kind {
            ShaderSourceKind::SpirV => {
                let bytes = std::fs::read(&path)?;
                spirv_source(&bytes).map_err(fail)?
            }
            ShaderSourceKind::Glsl => wgpu::ShaderSource::Glsl {
                shader: Cow::Owned(std::fs::read_to_string(&path)?),
                stage: stage.to_naga(),
                defines: Default::default(),
            },
            ShaderSourceKind::Wgsl => {
                wgpu::ShaderSource::Wgsl(Cow::Owned(std::fs::read_to_string(&path)?))
            }
        };

        let module = render_system
            .validated(|device| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(desc.filename),
                    source,
                })
            })
            .map_err(fail)?;

        Ok(CompiledShader { module, entry_point: desc.entry() })
    }
}

/// 检查 SPIR-V 二进制并转换为着色器源
fn spirv_source(bytes: &[u8]) -> std::result::Result<wgpu::ShaderSource<'static>, String> {
    if bytes.len() < 4 || bytes.len() % 4 != 0 {
        return Err(format!("invalid SPIR-V length {}", bytes.len()));
    }
    let words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect();
    if words[0] != SPIRV_MAGIC {
        return Err(format!("invalid SPIR-V magic number {:#010x}", words[0]));
    }
    Ok(wgpu::ShaderSource::SpirV(Cow::Owned(words)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_extension() {
        assert_eq!(ShaderSourceKind::from_path(Path::new("SceneShader.vert.spv")), Some(ShaderSourceKind::SpirV));
        assert_eq!(ShaderSourceKind::from_path(Path::new("SceneShader.frag")), Some(ShaderSourceKind::Glsl));
        assert_eq!(ShaderSourceKind::from_path(Path::new("SceneShader.wgsl")), Some(ShaderSourceKind::Wgsl));
        assert_eq!(ShaderSourceKind::from_path(Path::new("SceneShader.hlsl")), None);
        assert_eq!(ShaderSourceKind::from_path(Path::new("SceneShader")), None);
    }

    #[test]
    fn test_shader_model_selects_compiler() {
        assert_eq!(shader_model("vs_5_0"), Some((5, 0)));
        assert_eq!(shader_model("ps_6_0"), Some((6, 0)));
        assert_eq!(shader_model("vs5"), None);

        assert!(matches!(dx12_compiler(Some("vs_5_0")), wgpu::Dx12Compiler::Fxc));
        assert!(matches!(dx12_compiler(Some("vs_6_0")), wgpu::Dx12Compiler::Dxc { .. }));
        assert!(matches!(dx12_compiler(None), wgpu::Dx12Compiler::Fxc));
    }

    #[test]
    fn test_spirv_validation() {
        assert!(spirv_source(&[1, 2, 3]).is_err());
        assert!(spirv_source(&[0, 0, 0, 0]).is_err());
        assert!(spirv_source(&SPIRV_MAGIC.to_le_bytes()).is_ok());
    }

    #[test]
    fn test_resolve_searches_all_roots() {
        let loader = ShaderLoader::new("assets/shaders");
        // 源码目录中的 GLSL 与构建生成的 SPIR-V 都能找到
        assert!(loader.resolve("Vulkan", "SceneShader.vert").is_ok());
        assert!(loader.resolve("Vulkan", "SceneShader.vert.spv").is_ok());
        assert!(loader.resolve("Vulkan", "Missing.spv").is_err());
    }
}
