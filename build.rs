/// Build script for DistOverlay
///
/// # Shader Compilation Strategy:
/// - Vulkan: GLSL compiled to SPIR-V at build time via naga, loaded as `.spv` binaries
/// - OpenGL: GLSL source loaded and translated at runtime
/// - Direct3D 11/12, Metal: WGSL source loaded at runtime, translated by wgpu
use std::fs;
use std::path::{Path, PathBuf};

const VULKAN_SHADERS: &[(&str, naga::ShaderStage)] = &[
    ("SceneShader.vert", naga::ShaderStage::Vertex),
    ("SceneShader.frag", naga::ShaderStage::Fragment),
];

fn main() {
    let source_dir = Path::new("assets/shaders/Vulkan");
    let out_root = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo")).join("shaders");
    let out_dir = out_root.join("Vulkan");
    fs::create_dir_all(&out_dir).expect("failed to create SPIR-V output directory");

    for (filename, stage) in VULKAN_SHADERS {
        let path = source_dir.join(filename);
        println!("cargo:rerun-if-changed={}", path.display());

        let source = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
        let words = compile_glsl(&source, *stage)
            .unwrap_or_else(|e| panic!("failed to compile {}: {}", path.display(), e));

        let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_le_bytes()).collect();
        let target = out_dir.join(format!("{}.spv", filename));
        fs::write(&target, bytes)
            .unwrap_or_else(|e| panic!("failed to write {}: {}", target.display(), e));
    }

    println!("cargo:rustc-env=DIST_OVERLAY_SPIRV_DIR={}", out_root.display());
}

fn compile_glsl(source: &str, stage: naga::ShaderStage) -> Result<Vec<u32>, String> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let module = frontend
        .parse(&naga::front::glsl::Options::from(stage), source)
        .map_err(|e| format!("{:?}", e))?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| format!("{:?}", e))?;

    // wgpu 按自身坐标系解析 SPIR-V 输入，这里不能再翻转 Y 轴
    let options = naga::back::spv::Options {
        flags: naga::back::spv::WriterFlags::LABEL_VARYINGS,
        ..Default::default()
    };

    naga::back::spv::write_vec(&module, &info, &options, None).map_err(|e| format!("{:?}", e))
}
