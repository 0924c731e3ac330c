//! mirror_ball - 镜面球网格生成命令行工具
//!
//! 加载配置，生成镜面球网格并导出为 OBJ 文件。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件
//! cargo run
//!
//! # 固定种子并指定输出（命令行覆盖）
//! cargo run -- --seed 42 --output ball.obj --tile-size 0.03
//! ```
//!
//! # 流程概览
//!
//! ```text
//! config.toml + 命令行参数
//!        │
//! ┌──────▼──────┐
//! │   Config    │  校验
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────┐
//! │ MosaicGenerator │  生成 + 网格校验
//! └──────┬──────────┘
//!        │
//!   ┌────┴─────┐
//!   │          │
//! ┌─▼────┐  ┌──▼─────┐
//! │ OBJ  │  │ Camera │  首帧矩阵（debug 日志）
//! └──────┘  └────────┘
//! ```

use anyhow::Context;
use tracing::{debug, info};

use mirror_ball::component::{Camera, LightRig};
use mirror_ball::core::{log, Config};
use mirror_ball::geometry::exporters::export_mesh;
use mirror_ball::geometry::MosaicGenerator;

/// 配置文件路径
const CONFIG_PATH: &str = "config.toml";

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（config.toml），不存在时使用默认配置
/// 2. 应用命令行参数覆盖
/// 3. 校验配置
/// 4. 初始化日志系统
/// 5. 生成镜面球并校验网格
/// 6. 导出 OBJ，输出首帧矩阵
///
/// 任何一步失败都会打印错误链并以状态码 1 退出。
fn main() -> anyhow::Result<()> {
    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default(CONFIG_PATH);

    // 2. 应用命令行参数（跳过程序名）
    config
        .apply_args(std::env::args().skip(1))
        .context("Invalid command line arguments")?;

    // 3. 验证配置
    config.validate().context("Invalid configuration")?;

    // 4. 初始化日志系统（使用配置中的设置）
    let log_file = config
        .logging
        .file_output
        .then_some(config.logging.log_file.as_str());
    log::init_logger(config.logging.level, config.logging.file_output, log_file)
        .context("Failed to initialize logging")?;

    info!(version = env!("CARGO_PKG_VERSION"), "mirror_ball starting...");
    info!(
        radius = config.mosaic.radius,
        tile_size = config.mosaic.tile_size,
        jitter = config.mosaic.max_jitter_degrees,
        seed = ?config.mosaic.seed,
        "Mosaic configuration"
    );

    // 5. 生成网格
    let generator = MosaicGenerator::new(config.mosaic.clone())?;
    let mesh = generator
        .generate_default()
        .context("Failed to generate mirror ball")?;
    mesh.validate().context("Generated mesh is inconsistent")?;

    info!(
        tiles = mesh.tile_count(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Mesh ready"
    );

    // 6. 导出
    if config.export.enabled {
        export_mesh(&mesh, &config.export.path)
            .with_context(|| format!("Failed to export mesh to {}", config.export.path.display()))?;
    } else {
        info!("Export disabled, skipping file output");
    }

    // 首帧矩阵，供渲染前端核对
    let camera = Camera::from_config("MainCamera", &config.camera);
    let frame = camera.frame_uniforms();
    debug!(projection = ?frame.projection.0, "Projection matrix");
    debug!(model_view = ?frame.model_view.0, "Model-view matrix");
    debug!(normal = ?frame.normal.map(|m| m.0), "Normal matrix");

    if let (Some(normal_matrix), Some(first)) = (frame.normal.as_ref(), mesh.normals().first()) {
        let lighting = LightRig::default().shade(normal_matrix, *first);
        debug!(?lighting, "Lighting of the first vertex");
    }

    info!("Done");
    Ok(())
}
