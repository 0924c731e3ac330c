//! mirror_ball - 程序化镜面球网格生成器
//!
//! 在球面上按纬度环铺设方形小镜片，每块镜片带随机倾斜和随机颜色，
//! 输出可以直接上传到 GPU 的平行缓冲区，或导出为 OBJ 文本。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、错误处理）
//! - `math`: 最小化的列主序矩阵与向量内核
//! - `geometry`: 镜面球生成、网格数据与导出器
//! - `component`: 渲染边界上的相机与光照
//!
//! # 使用示例
//!
//! ```no_run
//! use mirror_ball::component::Camera;
//! use mirror_ball::geometry::exporters::export_mesh;
//! use mirror_ball::geometry::{MosaicGenerator, MosaicParams, RngSource};
//! use std::path::Path;
//!
//! let mesh = MosaicGenerator::new(MosaicParams::default())?.generate(&mut RngSource::seeded(7))?;
//! export_mesh(&mesh, Path::new("mirrorball.obj"))?;
//!
//! let frame = Camera::default().frame_uniforms();
//! println!("{} 个三角形, 法线矩阵可用: {}", mesh.triangle_count(), frame.normal.is_some());
//! # Ok::<(), mirror_ball::core::MirrorBallError>(())
//! ```

pub mod component;
pub mod core;
pub mod geometry;
pub mod math;
