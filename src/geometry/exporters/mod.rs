//! 模型导出器模块
//!
//! 提供统一的网格导出接口和具体格式实现。
//!
//! # 支持的格式
//!
//! - **OBJ**: Wavefront OBJ 格式（只导出位置和三角形，不含法线与颜色）
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use mirror_ball::geometry::exporters::{MeshExporter, ObjExporter};
//! use mirror_ball::geometry::{MosaicGenerator, MosaicParams};
//! use std::path::Path;
//!
//! let mesh = MosaicGenerator::new(MosaicParams::default())?.generate_default()?;
//! ObjExporter::export_to_file(&mesh, Path::new("mirrorball.obj"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::error::{ExportError, Result};
use crate::geometry::mesh::Mesh;

pub mod obj_exporter;

pub use obj_exporter::ObjExporter;

/// 网格导出器 trait
///
/// 导出器是无状态的（使用静态方法），只读取 `Mesh`，不做网格校验。
pub trait MeshExporter {
    /// 把网格写入任意输出流
    fn write_to<W: Write>(mesh: &Mesh, writer: W) -> Result<()>;

    /// 获取支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];

    /// 导出为字符串
    ///
    /// 导出器返回的错误原样传出，不会被当作空结果。
    fn export_to_string(mesh: &Mesh) -> Result<String> {
        let mut buffer = Vec::new();
        Self::write_to(mesh, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// 导出到文件
    fn export_to_file(mesh: &Mesh, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(mesh, &mut writer)?;
        writer.flush()?;

        tracing::info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "Mesh exported"
        );
        Ok(())
    }
}

/// 根据文件扩展名选择合适的导出器
pub fn export_mesh(mesh: &Mesh, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ExportError::UnsupportedFormat("missing file extension".to_string()))?;

    if ObjExporter::supported_extensions().contains(&extension.as_str()) {
        ObjExporter::export_to_file(mesh, path)
    } else {
        Err(ExportError::UnsupportedFormat(format!(".{}", extension)).into())
    }
}
