//! 镜面球导出示例
//!
//! 演示如何使用 mirror_ball 的 geometry 模块生成镜面球并导出 OBJ 文件。
//!
//! 运行方式：
//! ```bash
//! cargo run --example export_ball
//! ```

use mirror_ball::core::{log, LogLevel};
use mirror_ball::geometry::exporters::{MeshExporter, ObjExporter};
use mirror_ball::geometry::{MosaicGenerator, MosaicParams, RngSource};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    log::init_logger(LogLevel::Info, false, None)?;

    println!("=== mirror_ball 导出示例 ===\n");

    let params = MosaicParams {
        tile_size: 1.0 / 32.0,
        ..MosaicParams::default()
    };
    let generator = MosaicGenerator::new(params)?;

    println!("纬度步数: {}", generator.ring_count());
    for ring in generator.ring_plan().iter().take(3) {
        println!(
            "  纬度 {:+.4} rad: {} 块镜片",
            ring.latitude, ring.tile_count
        );
    }

    let mesh = generator.generate(&mut RngSource::seeded(2024))?;
    mesh.validate()?;

    println!("\n网格信息:");
    println!("  镜片数: {}", mesh.tile_count());
    println!("  顶点数: {}", mesh.vertex_count());
    println!("  三角形数: {}", mesh.triangle_count());
    println!("  索引缓冲: {} 字节", mesh.index_bytes().len());

    let out = Path::new("mirrorball_demo.obj");
    ObjExporter::export_to_file(&mesh, out)?;
    println!("\n✓ 已导出到 {}", out.display());

    Ok(())
}
