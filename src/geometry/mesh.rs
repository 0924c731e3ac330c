//! 镜面球网格数据结构模块
//!
//! 定义CPU侧的网格容器。网格由平行数组组成，每块镜片贡献：
//!
//! - 4 个顶点（不与相邻镜片共享，球面保持棱面效果）
//! - 4 份相同的法线
//! - 6 个索引（两个三角形）
//! - 1 个面颜色（展开为逐顶点颜色时复制 4 次）
//!
//! 网格只通过生成器（或 `Mesh::from_tiles`）构建，构建完成后只读。

use crate::core::error::MeshError;
use crate::geometry::vertex::Vertex;
use crate::math::{Color, Vec3};

/// 每块镜片的顶点数
pub const VERTICES_PER_TILE: usize = 4;

/// 每块镜片的索引数
pub const INDICES_PER_TILE: usize = 6;

/// u16 索引可以寻址的最大顶点数
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// 单块镜片的最终几何数据
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// 四个角点，按环绕顺序排列
    pub corners: [Vec3; 4],

    /// 镜片法线
    pub normal: Vec3,

    /// 镜片颜色
    pub color: Color,
}

/// CPU侧镜面球网格
///
/// # 不变量
///
/// - `vertices.len() == normals.len()`
/// - `vertices.len() % 4 == 0`
/// - `indices.len() == 6 * vertices.len() / 4`
/// - `face_colors.len() == vertices.len() / 4`
/// - 每个索引只引用同一块镜片的 4 个顶点
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u16>,
    face_colors: Vec<Color>,
}

impl Mesh {
    /// 创建一个带容量预分配的空网格
    pub(crate) fn with_tile_capacity(tiles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(tiles * VERTICES_PER_TILE),
            normals: Vec::with_capacity(tiles * VERTICES_PER_TILE),
            indices: Vec::with_capacity(tiles * INDICES_PER_TILE),
            face_colors: Vec::with_capacity(tiles),
        }
    }

    /// 从一组镜片构建网格
    ///
    /// 顶点数超过 u16 可寻址范围时返回 `MeshError::IndexOverflow`。
    pub fn from_tiles<I>(tiles: I) -> Result<Self, MeshError>
    where
        I: IntoIterator<Item = Tile>,
    {
        let tiles = tiles.into_iter();
        let mut mesh = Self::with_tile_capacity(tiles.size_hint().0);
        for tile in tiles {
            mesh.push_tile(&tile)?;
        }
        Ok(mesh)
    }

    /// 追加一块镜片
    pub(crate) fn push_tile(&mut self, tile: &Tile) -> Result<(), MeshError> {
        let base = self.vertices.len();
        if base + VERTICES_PER_TILE > MAX_VERTICES {
            return Err(MeshError::IndexOverflow {
                vertex_count: base + VERTICES_PER_TILE,
            });
        }

        let idx = base as u16;
        self.indices
            .extend_from_slice(&[idx, idx + 1, idx + 2, idx, idx + 2, idx + 3]);
        self.vertices.extend_from_slice(&tile.corners);
        self.normals.extend_from_slice(&[tile.normal; VERTICES_PER_TILE]);
        self.face_colors.push(tile.color);

        Ok(())
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[inline]
    pub fn face_colors(&self) -> &[Color] {
        &self.face_colors
    }

    /// 获取顶点数量
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取镜片数量
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.face_colors.len()
    }

    /// 获取三角形数量
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// 位置缓冲区：每顶点 3 个 f32，紧密排列
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// 法线缓冲区：每顶点 3 个 f32，顺序与位置一致
    pub fn normal_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// 逐顶点颜色缓冲区：每块镜片的颜色展开到它的 4 个顶点
    pub fn color_buffer(&self) -> Vec<f32> {
        self.face_colors
            .iter()
            .flat_map(|c| std::iter::repeat(c.to_array()).take(VERTICES_PER_TILE))
            .flatten()
            .collect()
    }

    /// 索引缓冲区：三角形列表，每个三角形 3 个 u16
    pub fn index_buffer(&self) -> &[u16] {
        &self.indices
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// 交错顶点数组（位置、法线、颜色）
    pub fn interleaved_vertices(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .enumerate()
            .map(|(i, (&p, &n))| Vertex::new(p, n, self.face_colors[i / VERTICES_PER_TILE]))
            .collect()
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 顶点与法线数量一致，且是 4 的倍数
    /// - 索引与面颜色数量与镜片数一致
    /// - 每个索引都落在所属镜片的 4 个顶点之内
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertices.len();

        if self.normals.len() != vertex_count {
            return Err(MeshError::Validation(format!(
                "normal count {} does not match vertex count {}",
                self.normals.len(),
                vertex_count
            )));
        }

        if vertex_count % VERTICES_PER_TILE != 0 {
            return Err(MeshError::Validation(format!(
                "vertex count {} is not a multiple of {}",
                vertex_count, VERTICES_PER_TILE
            )));
        }

        let tiles = vertex_count / VERTICES_PER_TILE;
        if self.indices.len() != tiles * INDICES_PER_TILE {
            return Err(MeshError::Validation(format!(
                "expected {} indices for {} tiles, found {}",
                tiles * INDICES_PER_TILE,
                tiles,
                self.indices.len()
            )));
        }

        if self.face_colors.len() != tiles {
            return Err(MeshError::Validation(format!(
                "expected {} face colors, found {}",
                tiles,
                self.face_colors.len()
            )));
        }

        for (tile, chunk) in self.indices.chunks_exact(INDICES_PER_TILE).enumerate() {
            let base = tile * VERTICES_PER_TILE;
            if let Some(&bad) = chunk
                .iter()
                .find(|&&i| (i as usize) < base || (i as usize) >= base + VERTICES_PER_TILE)
            {
                return Err(MeshError::Validation(format!(
                    "tile {} references vertex {} outside its own quad",
                    tile, bad
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_tile(offset: f32) -> Tile {
        Tile {
            corners: [
                Vec3::new(offset, 0.0, 0.0),
                Vec3::new(offset + 1.0, 0.0, 0.0),
                Vec3::new(offset + 1.0, 1.0, 0.0),
                Vec3::new(offset, 1.0, 0.0),
            ],
            normal: Vec3::Z,
            color: Color::new(0.1, 0.2, 0.3, 1.0),
        }
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::default();

        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_from_tiles_counts() {
        let mesh = Mesh::from_tiles([unit_tile(0.0), unit_tile(2.0)]).unwrap();

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.tile_count(), 2);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_normals_broadcast_per_tile() {
        let mesh = Mesh::from_tiles([unit_tile(0.0)]).unwrap();
        assert_eq!(mesh.normals(), &[Vec3::Z; 4]);
    }

    #[test]
    fn test_gpu_buffers() {
        let mesh = Mesh::from_tiles([unit_tile(0.0)]).unwrap();

        assert_eq!(mesh.position_buffer().len(), 12);
        assert_eq!(&mesh.position_buffer()[3..6], &[1.0, 0.0, 0.0]);
        assert_eq!(mesh.normal_buffer().len(), 12);
        assert_eq!(mesh.position_bytes().len(), 48);
        assert_eq!(mesh.index_bytes().len(), 12);

        let colors = mesh.color_buffer();
        assert_eq!(colors.len(), 16);
        assert_eq!(&colors[12..16], &[0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_interleaved_vertices_follow_buffer_order() {
        let mesh = Mesh::from_tiles([unit_tile(0.0), unit_tile(5.0)]).unwrap();
        let vertices = mesh.interleaved_vertices();

        assert_eq!(vertices.len(), 8);
        assert_eq!(vertices[5].position, [6.0, 0.0, 0.0]);
        assert_eq!(vertices[5].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[5].color, [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_validation_rejects_cross_tile_index() {
        let mut mesh = Mesh::from_tiles([unit_tile(0.0), unit_tile(2.0)]).unwrap();
        mesh.indices[7] = 1;

        let err = mesh.validate().unwrap_err();
        assert!(err.to_string().contains("outside its own quad"));
    }

    #[test]
    fn test_validation_rejects_missing_normals() {
        let mut mesh = Mesh::from_tiles([unit_tile(0.0)]).unwrap();
        mesh.normals.pop();

        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_index_overflow() {
        let tiles = std::iter::repeat(unit_tile(0.0)).take(MAX_VERTICES / VERTICES_PER_TILE);
        let mesh = Mesh::from_tiles(tiles).unwrap();
        assert_eq!(mesh.vertex_count(), MAX_VERTICES);
        assert_eq!(*mesh.indices().last().unwrap(), u16::MAX);

        let mut full = mesh;
        assert_eq!(
            full.push_tile(&unit_tile(0.0)),
            Err(MeshError::IndexOverflow {
                vertex_count: MAX_VERTICES + 4
            })
        );
    }
}
