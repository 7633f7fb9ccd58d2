//! 数学工具
//!
//! 场景只需要两种矩阵：透视投影和绕任意轴的旋转。
//! 矩阵以 `[[f32; 4]; 4]` 存储，按列优先排列（`m[列][行]`），
//! 可以直接作为 uniform 数据上传给 WGSL / GLSL 的 `mat4`。

use nalgebra::Vector3;

/// 列优先的 4x4 矩阵
pub type Float4x4 = [[f32; 4]; 4];

/// 单位矩阵
pub const IDENTITY: Float4x4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// 2π
pub const TAU: f32 = std::f32::consts::TAU;

/// 裁剪空间的深度范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClippingRange {
    /// 深度映射到 [0, 1]（Direct3D、Vulkan、Metal）
    ZeroToOne,
    /// 深度映射到 [-1, 1]（OpenGL 原生约定）
    MinusOneToOne,
}

/// 构建左手坐标系的透视投影矩阵
///
/// 视线沿 +Z 方向，`fov_deg` 为垂直视场角（度）。
/// 近平面上的点映射到深度范围的下界，远平面映射到 1。
pub fn perspective_projection(
    aspect: f32,
    near: f32,
    far: f32,
    fov_deg: f32,
    clipping: ClippingRange,
) -> Float4x4 {
    let h = 1.0 / (fov_deg.to_radians() * 0.5).tan();
    let w = h / aspect;

    let mut m = [[0.0; 4]; 4];
    m[0][0] = w;
    m[1][1] = h;
    m[2][3] = 1.0;

    match clipping {
        ClippingRange::ZeroToOne => {
            m[2][2] = far / (far - near);
            m[3][2] = -(far * near) / (far - near);
        }
        ClippingRange::MinusOneToOne => {
            m[2][2] = (far + near) / (far - near);
            m[3][2] = -(2.0 * far * near) / (far - near);
        }
    }

    m
}

/// 把绕 `axis` 旋转 `angle` 弧度的旋转写入矩阵左上角 3x3 区域
///
/// 矩阵其余元素（平移列、第四行）保持不变。
/// 轴向量会先被归一化；零向量无法确定方向，此时旋转块被置为单位阵。
pub fn model_rotation(m: &mut Float4x4, axis: [f32; 3], angle: f32) {
    let Some(axis) = Vector3::from(axis).try_normalize(f32::EPSILON) else {
        for (col, column) in m.iter_mut().take(3).enumerate() {
            for (row, value) in column.iter_mut().take(3).enumerate() {
                *value = if col == row { 1.0 } else { 0.0 };
            }
        }
        return;
    };

    let (x, y, z) = (axis.x, axis.y, axis.z);
    let (s, c) = angle.sin_cos();
    let cc = 1.0 - c;

    m[0][0] = x * x * cc + c;
    m[0][1] = y * x * cc + z * s;
    m[0][2] = x * z * cc - y * s;

    m[1][0] = x * y * cc - z * s;
    m[1][1] = y * y * cc + c;
    m[1][2] = y * z * cc + x * s;

    m[2][0] = x * z * cc + y * s;
    m[2][1] = y * z * cc - x * s;
    m[2][2] = z * z * cc + c;
}

/// 把角度折回 [0, 2π)
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid 在浮点舍入下可能恰好返回 TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// 归一化向量，长度为零时返回 `None`
pub fn try_normalize(v: [f32; 3]) -> Option<[f32; 3]> {
    Vector3::from(v)
        .try_normalize(f32::EPSILON)
        .map(|n| [n.x, n.y, n.z])
}

/// 归一化向量，长度为零时返回 `fallback`
pub fn normalize_or(v: [f32; 3], fallback: [f32; 3]) -> [f32; 3] {
    try_normalize(v).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Vector4};

    fn transform(m: &Float4x4, p: [f32; 4]) -> Vector4<f32> {
        Matrix4::from(*m) * Vector4::from(p)
    }

    #[test]
    fn test_projection_depth_range() {
        let (near, far) = (0.1, 100.0);
        let m = perspective_projection(16.0 / 9.0, near, far, 45.0, ClippingRange::ZeroToOne);

        let n = transform(&m, [0.0, 0.0, near, 1.0]);
        let f = transform(&m, [0.0, 0.0, far, 1.0]);
        assert!((n.z / n.w).abs() < 1e-5);
        assert!((f.z / f.w - 1.0).abs() < 1e-5);

        let m = perspective_projection(1.0, near, far, 45.0, ClippingRange::MinusOneToOne);
        let n = transform(&m, [0.0, 0.0, near, 1.0]);
        assert!((n.z / n.w + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_aspect() {
        let m = perspective_projection(2.0, 0.1, 100.0, 90.0, ClippingRange::ZeroToOne);
        assert!((m[1][1] - 1.0).abs() < 1e-6);
        assert!((m[0][0] - 0.5).abs() < 1e-6);
        assert_eq!(m[2][3], 1.0);
        assert_eq!(m[3][3], 0.0);
    }

    #[test]
    fn test_square_projection_default_camera() {
        let m = perspective_projection(1.0, 0.1, 100.0, 45.0, ClippingRange::ZeroToOne);
        assert_eq!(m[0][0], m[1][1]);
        assert!((m[1][1] - 1.0 / (22.5f32).to_radians().tan()).abs() < 1e-5);
        assert_eq!(m[2][3], 1.0);
    }

    #[test]
    fn test_rotation_about_z() {
        let mut m = IDENTITY;
        m[3][2] = 5.0;
        model_rotation(&mut m, [0.0, 0.0, 1.0], std::f32::consts::FRAC_PI_2);

        let p = transform(&m, [1.0, 0.0, 0.0, 1.0]);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
        // 平移列不受影响
        assert!((p.z - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_normalizes_axis() {
        let mut a = IDENTITY;
        let mut b = IDENTITY;
        model_rotation(&mut a, [1.0, 1.0, 0.0], 0.7);
        model_rotation(&mut b, [3.0, 3.0, 0.0], 0.7);
        for col in 0..4 {
            for row in 0..4 {
                assert!((a[col][row] - b[col][row]).abs() < 1e-6);
            }
        }

        let mut zero = IDENTITY;
        zero[0][1] = 0.3;
        model_rotation(&mut zero, [0.0, 0.0, 0.0], 1.0);
        assert_eq!(zero, IDENTITY);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert!(wrap_angle(TAU) < TAU);
    }
}
