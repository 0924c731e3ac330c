//! 错误处理模块
//!
//! 定义了库中使用的统一错误类型，使用 `thiserror` 提供友好的错误消息。
//!
//! # 分类
//!
//! - `MathError`：矩阵求逆、轴角旋转的两种可恢复失败
//! - `MeshError`：镜面球生成参数无效或网格超出 16 位索引范围
//! - `ExportError`：网格导出格式问题
//! - `ConfigError`：配置文件加载与校验
//!
//! 所有错误都由调用方处理，库代码中不会 panic。

use std::path::PathBuf;

use thiserror::Error;

/// 库统一的 Result 类型
pub type Result<T> = std::result::Result<T, MirrorBallError>;

/// mirror_ball 的顶层错误类型
#[derive(Debug, Error)]
pub enum MirrorBallError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 数学内核错误
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// 网格生成错误
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// 网格导出错误
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 日志系统错误
    #[error("Log error: {0}")]
    Log(String),
}

/// 数学内核的失败结果
///
/// 两者都表示“没有结果”，调用方应保持目标矩阵不变并继续运行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// 行列式恰好为 0，矩阵不可逆
    #[error("matrix is singular (determinant is exactly zero)")]
    SingularMatrix,

    /// 旋转轴长度小于 1e-6
    #[error("rotation axis is degenerate (length below 1e-6)")]
    DegenerateAxis,
}

/// 网格生成相关的错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// 生成参数无效（例如镜片尺寸不小于球体，环数为 0）
    #[error("invalid mosaic configuration: {0}")]
    InvalidConfiguration(String),

    /// 顶点数超出 u16 索引可寻址范围
    #[error("mesh needs {vertex_count} vertices, more than 16-bit indices can address")]
    IndexOverflow { vertex_count: usize },

    /// 网格不变量被破坏
    #[error("mesh validation failed: {0}")]
    Validation(String),
}

/// 网格导出相关的错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 不支持的导出格式
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// 配置相关的错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件未找到
    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 配置文件解析失败
    #[error("failed to parse config: {0}")]
    ParseError(String),

    /// 配置值无效
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
