//! 配置管理模块
//!
//! 提供镜面球生成、相机、导出和日志的配置加载与校验。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [mosaic]
//! radius = 1.0
//! tile_size = 0.015625
//! max_jitter_degrees = 10.0
//! seed = 42            # 可选，缺省使用系统熵
//!
//! [camera]
//! fov_degrees = 45.0
//! near = 0.1
//! far = 100.0
//! infinite_far = false
//! distance = 3.0
//! tilt_degrees = 90.0
//! spin_rate = 0.25
//! viewport_width = 800
//! viewport_height = 600
//!
//! [export]
//! enabled = true
//! path = "mirrorball.obj"
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::{ConfigError, Result};
use crate::geometry::MosaicParams;

/// 程序配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 镜面球生成参数
    #[serde(default)]
    pub mosaic: MosaicParams,

    /// 相机配置
    #[serde(default)]
    pub camera: CameraConfig,

    /// 导出配置
    #[serde(default)]
    pub export: ExportConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 相机配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// 垂直视场角（度）
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f32,

    /// 近平面
    #[serde(default = "default_near")]
    pub near: f32,

    /// 远平面，`infinite_far` 为 true 时忽略
    #[serde(default = "default_far")]
    pub far: f32,

    /// 使用无限远平面的透视投影
    #[serde(default)]
    pub infinite_far: bool,

    /// 相机到球心的距离
    #[serde(default = "default_distance")]
    pub distance: f32,

    /// 绕 X 轴的俯仰角（度）
    #[serde(default = "default_tilt_degrees")]
    pub tilt_degrees: f32,

    /// 每秒绕 Z 轴旋转的弧度
    #[serde(default = "default_spin_rate")]
    pub spin_rate: f32,

    /// 视口宽度，用于计算宽高比
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// 视口高度
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

/// 导出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// 是否写出网格文件
    #[serde(default = "default_export_enabled")]
    pub enabled: bool,

    /// 输出路径，扩展名决定格式
    #[serde(default = "default_export_path")]
    pub path: PathBuf,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("unknown log level '{}'", other),
            }),
        }
    }
}

// 默认值函数
fn default_fov_degrees() -> f32 { 45.0 }
fn default_near() -> f32 { 0.1 }
fn default_far() -> f32 { 100.0 }
fn default_distance() -> f32 { 3.0 }
fn default_tilt_degrees() -> f32 { 90.0 }
fn default_spin_rate() -> f32 { 0.25 }
fn default_viewport_width() -> u32 { 800 }
fn default_viewport_height() -> u32 { 600 }
fn default_export_enabled() -> bool { true }
fn default_export_path() -> PathBuf { PathBuf::from("mirrorball.obj") }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "mirror_ball.log".to_string() }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov_degrees(),
            near: default_near(),
            far: default_far(),
            infinite_far: false,
            distance: default_distance(),
            tilt_degrees: default_tilt_degrees(),
            spin_rate: default_spin_rate(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: default_export_enabled(),
            path: default_export_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use mirror_ball::core::Config;
    ///
    /// let config = Config::from_file("config.toml")?;
    /// # Ok::<(), mirror_ball::core::MirrorBallError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_path_buf()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在或无法解析则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--seed <u64>`: 随机种子
    /// - `--output <path>`: 导出路径
    /// - `--tile-size <f32>`: 镜片半宽
    /// - `--radius <f32>`: 球体半径
    /// - `--jitter <degrees>`: 最大抖动角
    /// - `--log-level <level>`: 日志级别
    /// - `--no-export`: 不写出网格文件
    ///
    /// 参数值无法解析时返回 `ConfigError::InvalidValue`。
    pub fn apply_args<I>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        if let Some(seed) = parse_flag::<u64>(&args, "--seed")? {
            self.mosaic.seed = Some(seed);
        }

        if let Some(output) = flag_value(&args, "--output")? {
            self.export.path = PathBuf::from(output);
        }

        if let Some(tile_size) = parse_flag::<f32>(&args, "--tile-size")? {
            self.mosaic.tile_size = tile_size;
        }

        if let Some(radius) = parse_flag::<f32>(&args, "--radius")? {
            self.mosaic.radius = radius;
        }

        if let Some(jitter) = parse_flag::<f32>(&args, "--jitter")? {
            self.mosaic.max_jitter_degrees = jitter;
        }

        if let Some(level) = flag_value(&args, "--log-level")? {
            self.logging.level = level.parse()?;
        }

        if args.iter().any(|a| a == "--no-export") {
            self.export.enabled = false;
        }

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.mosaic.ring_count().map_err(|e| ConfigError::InvalidValue {
            field: "mosaic".to_string(),
            reason: e.to_string(),
        })?;

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "field of view must be within (0, 180)"));
        }

        if !(camera.near.is_finite() && camera.near > 0.0) {
            return Err(invalid("camera.near", "near plane must be positive"));
        }

        if !camera.infinite_far && !(camera.far.is_finite() && camera.far > camera.near) {
            return Err(invalid("camera.far", "far plane must lie beyond the near plane"));
        }

        if camera.viewport_width == 0 || camera.viewport_height == 0 {
            return Err(invalid(
                "camera.viewport_width/height",
                "viewport dimensions must be greater than 0",
            ));
        }

        if self.export.enabled && self.export.path.as_os_str().is_empty() {
            return Err(invalid("export.path", "output path must not be empty"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> super::error::MirrorBallError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// 查找 `flag` 后面紧跟的值，缺少值时报错
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(idx) => args
            .get(idx + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| invalid(flag, "missing value")),
    }
}

fn parse_flag<T: FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    match flag_value(args, flag)? {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| invalid(flag, &format!("cannot parse '{}'", raw))),
    }
}
