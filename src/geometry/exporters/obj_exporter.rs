//! OBJ 文件导出器
//!
//! 把镜面球网格写成 Wavefront OBJ 文本：
//!
//! ```text
//! # Wavefront Object File
//! v x y z        // 每个顶点一行
//! f a b c        // 每个三角形一行，索引从 1 开始
//! ```
//!
//! 只导出几何（位置 + 三角形），法线和颜色不导出。
//! 浮点数使用 Rust 的最短往返格式，读回后与 f32 原值一致。
use std::io::Write;

use super::MeshExporter;
use crate::core::error::Result;
use crate::geometry::mesh::Mesh;

/// OBJ 文件头
pub const OBJ_HEADER: &str = "# Wavefront Object File";

/// 默认导出文件名
pub const DEFAULT_FILE_NAME: &str = "mirrorball.obj";

/// OBJ 格式导出器
pub struct ObjExporter;

impl MeshExporter for ObjExporter {
    fn write_to<W: Write>(mesh: &Mesh, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", OBJ_HEADER)?;

        for v in mesh.vertices() {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }

        for triangle in mesh.indices().chunks_exact(3) {
            writeln!(
                writer,
                "f {} {} {}",
                u32::from(triangle[0]) + 1,
                u32::from(triangle[1]) + 1,
                u32::from(triangle[2]) + 1
            )?;
        }

        Ok(())
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::mesh::Tile;
    use crate::geometry::{MosaicGenerator, MosaicParams, RngSource};
    use crate::math::{Color, Vec3};

    fn single_tile_mesh() -> Mesh {
        Mesh::from_tiles([Tile {
            corners: [
                Vec3::new(-0.25, 1.0, -0.25),
                Vec3::new(0.25, 1.0, -0.25),
                Vec3::new(0.25, 1.0, 0.25),
                Vec3::new(-0.25, 1.0, 0.25),
            ],
            normal: Vec3::Y,
            color: Color::WHITE,
        }])
        .unwrap()
    }

    #[test]
    fn test_single_tile_export() {
        let text = ObjExporter::export_to_string(&single_tile_mesh()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], OBJ_HEADER);
        assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(lines.iter().filter(|l| l.starts_with("f ")).count(), 2);
        assert_eq!(lines[1], "v -0.25 1 -0.25");
        assert_eq!(lines[5], "f 1 2 3");
        assert_eq!(lines[6], "f 1 3 4");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_positions_round_trip_textually() {
        let mesh = MosaicGenerator::new(MosaicParams {
            tile_size: 0.5,
            ..MosaicParams::default()
        })
        .unwrap()
        .generate(&mut RngSource::seeded(3))
        .unwrap();

        let text = ObjExporter::export_to_string(&mesh).unwrap();
        let parsed: Vec<f32> = text
            .lines()
            .filter_map(|l| l.strip_prefix("v "))
            .flat_map(|l| l.split_whitespace().map(|s| s.parse::<f32>().unwrap()))
            .collect();

        assert_eq!(parsed.as_slice(), mesh.position_buffer());
    }

    #[test]
    fn test_export_parses_with_tobj() {
        let mesh = MosaicGenerator::new(MosaicParams {
            tile_size: 0.25,
            ..MosaicParams::default()
        })
        .unwrap()
        .generate(&mut RngSource::seeded(11))
        .unwrap();

        let text = ObjExporter::export_to_string(&mesh).unwrap();
        let mut reader = std::io::BufReader::new(text.as_bytes());
        let (models, _) = tobj::load_obj_buf(&mut reader, &tobj::LoadOptions::default(), |_| {
            Ok(Default::default())
        })
        .unwrap();

        assert_eq!(models.len(), 1);
        let imported = &models[0].mesh;
        assert_eq!(imported.positions.len(), mesh.vertex_count() * 3);
        let indices: Vec<u32> = mesh.indices().iter().map(|&i| u32::from(i)).collect();
        assert_eq!(imported.indices, indices);
    }
}
