//! 立方体几何数据
//!
//! 以原点为中心、边长为 2 的立方体。每个面拥有独立的 4 个顶点
//! （共 24 个），这样每个顶点都能携带所在面的法线，得到分明的平面光照。

use bytemuck::{Pod, Zeroable};

/// 场景顶点：位置 + 法线
///
/// # 内存布局
///
/// - position: 12 bytes
/// - normal: 12 bytes
/// - **总计**: 24 bytes
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl SceneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];

    /// 顶点缓冲布局，与着色器的 location 0 / 1 对应
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// 顶点数量
pub const VERTEX_COUNT: usize = 24;

/// 索引数量（6 个面 × 2 个三角形 × 3）
pub const INDEX_COUNT: usize = 36;

/// 每个面：法线 n，以及满足 u × v = n 的两条切向轴
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
];

const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// 生成立方体的顶点和索引
///
/// 三角形的顶点顺序满足 `(v1 - v0) × (v2 - v0)` 指向面外。
/// 在左手坐标系的屏幕空间中，朝向相机的三角形表现为顺时针。
pub fn geometry() -> (Vec<SceneVertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(VERTEX_COUNT);
    let mut indices = Vec::with_capacity(INDEX_COUNT);

    for (n, u, v) in FACES {
        let base = vertices.len() as u16;
        for (a, b) in CORNERS {
            let position = [
                n[0] + a * u[0] + b * v[0],
                n[1] + a * u[1] + b * v[1],
                n[2] + a * u[2] + b * v[2],
            ];
            vertices.push(SceneVertex { position, normal: n });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_cube_counts() {
        let (vertices, indices) = geometry();
        assert_eq!(vertices.len(), VERTEX_COUNT);
        assert_eq!(indices.len(), INDEX_COUNT);
        assert!(indices.iter().all(|&i| (i as usize) < VERTEX_COUNT));
        assert_eq!(std::mem::size_of::<SceneVertex>(), 24);
    }

    #[test]
    fn test_vertices_on_unit_cube() {
        let (vertices, _) = geometry();
        for vertex in &vertices {
            assert!(vertex.position.iter().all(|c| c.abs() == 1.0));
            // 顶点位于法线所指的面上
            let p = Vector3::from(vertex.position);
            let n = Vector3::from(vertex.normal);
            assert_eq!(p.dot(&n), 1.0);
        }
    }

    #[test]
    fn test_winding_points_outward() {
        let (vertices, indices) = geometry();
        for triangle in indices.chunks(3) {
            let p = |i: u16| Vector3::from(vertices[i as usize].position);
            let (v0, v1, v2) = (p(triangle[0]), p(triangle[1]), p(triangle[2]));
            let face_normal = (v1 - v0).cross(&(v2 - v0));
            let n = Vector3::from(vertices[triangle[0] as usize].normal);
            assert!(face_normal.dot(&n) > 0.0);
        }
    }
}
