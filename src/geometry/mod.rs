//! 几何体生成与导出模块
//!
//! 程序化生成镜面球网格，并导出为通用的多边形文本格式。
//!
//! # 模块结构
//!
//! - `mosaic`: 纬度环 + 自适应镜片的马赛克生成器
//! - `random`: 可注入的随机源（抖动角与镜片颜色）
//! - `mesh`: 平行数组形式的网格数据
//! - `vertex`: 交错顶点结构
//! - `exporters`: 各种格式的网格导出器
//!
//! # 架构设计
//!
//! ```text
//! MosaicParams
//!     ↓
//! MosaicGenerator ← RandomSource
//!     ↓
//! Mesh (CPU侧数据)
//!     ↓              ↓
//! ObjExporter    Renderer (上传到GPU)
//! ```
//!
//! # 使用示例
//!
//! ```rust
//! use mirror_ball::geometry::{MosaicGenerator, MosaicParams, RngSource};
//!
//! let generator = MosaicGenerator::new(MosaicParams::default())?;
//! let mesh = generator.generate(&mut RngSource::seeded(42))?;
//!
//! println!("镜片数: {}", mesh.tile_count());
//! println!("三角形数: {}", mesh.triangle_count());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod exporters;
pub mod mesh;
pub mod mosaic;
pub mod random;
pub mod vertex;

// 重新导出常用类型
pub use mesh::{Mesh, Tile};
pub use mosaic::{MosaicGenerator, MosaicParams, RingPlan};
pub use random::{RandomSource, RngSource, SequenceSource};
pub use vertex::Vertex;
