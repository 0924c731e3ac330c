//! 核心功能模块
//!
//! 本模块提供了程序的基础设施：日志系统、配置管理和错误处理。
//! 这些模块与几何生成和渲染无关，可以在任何前端中使用。
//!
//! # 模块组织
//!
//! - `log`：日志系统，基于 `tracing` 的结构化日志
//! - `config`：配置管理，支持从 TOML 文件加载并用命令行参数覆盖
//! - `error`：错误处理，定义统一的错误类型

pub mod config;
pub mod error;
pub mod log;

// 重新导出常用类型，方便使用
pub use config::{CameraConfig, Config, ExportConfig, LogLevel, LoggingConfig};
pub use error::{ConfigError, ExportError, MathError, MeshError, MirrorBallError, Result};
