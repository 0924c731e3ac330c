//! 交错顶点定义模块
//!
//! 为偏好单一交错缓冲区的渲染器提供顶点结构，包含位置、法线和颜色。
//! 默认的上传方式仍是 `Mesh` 的四个独立缓冲区。

use bytemuck::{Pod, Zeroable};

use crate::math::{Color, Vec3};

/// 交错顶点结构
///
/// 内存布局与GPU兼容，使用 `#[repr(C)]` 保证顺序和对齐。
///
/// # 内存布局
///
/// - position: 12 bytes (3 * f32)
/// - normal: 12 bytes (3 * f32)
/// - color: 16 bytes (4 * f32)
/// - **总计**: 40 bytes
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 顶点位置 (x, y, z)
    pub position: [f32; 3],

    /// 镜片法线 (nx, ny, nz)
    ///
    /// 同一块镜片的四个顶点共享同一条法线。
    pub normal: [f32; 3],

    /// 镜片颜色 (r, g, b, a)
    pub color: [f32; 4],
}

impl Vertex {
    /// 创建一个新的顶点
    #[inline]
    pub fn new(position: Vec3, normal: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_vertex_size() {
        // 3*4 + 3*4 + 4*4 = 40 bytes
        assert_eq!(size_of::<Vertex>(), 40);
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
    }

    #[test]
    fn test_vertex_creation() {
        let vertex = Vertex::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 1.0, 0.0),
            Color::rgb(0.5, 0.25, 1.0),
        );

        assert_eq!(vertex.position, [1.0, 2.0, 3.0]);
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertex.color, [0.5, 0.25, 1.0, 1.0]);
    }
}
