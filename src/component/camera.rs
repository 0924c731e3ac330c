//! Camera 组件
//!
//! 绕球心旋转的观察相机：固定距离、固定俯仰，随时间绕 Z 轴自转。
//! 每帧为渲染器提供投影、模型视图和法线矩阵。

use super::Component;
use crate::core::config::CameraConfig;
use crate::core::error::MathError;
use crate::math::constants::{DEG_TO_RAD, HALF_PI, TAU};
use crate::math::{Axis, FarPlane, Mat4, Vec3};

/// 一帧的着色器矩阵
///
/// 法线矩阵在模型视图不可逆时为 `None`，调用方应跳过这一帧。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub model_view: Mat4,
    pub normal: Option<Mat4>,
}

impl FrameUniforms {
    /// 由投影和模型视图矩阵组装一帧
    ///
    /// 模型视图不可逆时记录警告，`normal` 为 `None`。
    pub fn new(projection: Mat4, model_view: Mat4) -> Self {
        let normal = match inverse_transpose(&model_view) {
            Ok(m) => Some(m),
            Err(err) => {
                tracing::warn!(error = %err, "Normal matrix unavailable, skipping frame");
                None
            }
        };

        Self {
            projection,
            model_view,
            normal,
        }
    }

    /// 投影矩阵的字节（列主序）
    pub fn projection_bytes(&self) -> &[u8] {
        self.projection.as_bytes()
    }

    /// 模型视图矩阵的字节
    pub fn model_view_bytes(&self) -> &[u8] {
        self.model_view.as_bytes()
    }

    /// 法线矩阵的字节，不可用时为 `None`
    pub fn normal_bytes(&self) -> Option<&[u8]> {
        self.normal.as_ref().map(Mat4::as_bytes)
    }
}

/// Camera 组件
pub struct Camera {
    name: String,

    /// 垂直视场角（弧度）
    fov_y: f32,

    /// 宽高比
    aspect: f32,

    /// 近裁剪面距离
    near: f32,

    /// 远平面
    far: FarPlane,

    /// 相机到球心的距离
    distance: f32,

    /// 绕 X 轴的俯仰角（弧度）
    tilt: f32,

    /// 当前绕 Z 轴的旋转角（弧度），保持在 [0, 2π)
    spin: f32,

    /// 每秒旋转的弧度
    spin_rate: f32,
}

impl Camera {
    /// 创建使用默认参数的相机
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fov_y: 45.0 * DEG_TO_RAD,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: FarPlane::Finite(100.0),
            distance: 3.0,
            tilt: HALF_PI,
            spin: 0.0,
            spin_rate: 0.25,
        }
    }

    /// 从配置创建相机
    pub fn from_config(name: impl Into<String>, config: &CameraConfig) -> Self {
        let far = if config.infinite_far {
            FarPlane::Infinite
        } else {
            FarPlane::Finite(config.far)
        };

        let mut camera = Self {
            name: name.into(),
            fov_y: config.fov_degrees * DEG_TO_RAD,
            near: config.near,
            far,
            distance: config.distance,
            tilt: config.tilt_degrees * DEG_TO_RAD,
            spin_rate: config.spin_rate,
            ..Self::new("")
        };
        camera.set_aspect(config.viewport_width, config.viewport_height);
        camera
    }

    /// 创建主相机
    pub fn main_camera() -> Self {
        Self::new("MainCamera")
    }

    // ========== 视锥体属性 ==========

    /// 获取垂直 FOV（弧度）
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// 获取宽高比
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// 获取近裁剪面距离
    pub fn near(&self) -> f32 {
        self.near
    }

    /// 获取远平面
    pub fn far(&self) -> FarPlane {
        self.far
    }

    /// 获取当前自转角
    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// 设置自转角，结果折回 [0, 2π)
    pub fn set_spin(&mut self, radians: f32) {
        self.spin = radians.rem_euclid(TAU);
    }

    /// 按视口尺寸更新宽高比
    ///
    /// 高度为 0（窗口最小化）时保持原值。
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    // ========== 获取矩阵 ==========

    /// 投影矩阵
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
    }

    /// 模型视图矩阵
    ///
    /// 先后退 `distance`，再绕 X 俯仰，最后绕 Z 自转。
    pub fn model_view(&self) -> Mat4 {
        Mat4::identity()
            .translate(Vec3::new(0.0, 0.0, -self.distance))
            .rotate_axis(self.tilt, Axis::X)
            .rotate_axis(self.spin, Axis::Z)
    }

    /// 法线矩阵：模型视图矩阵的逆的转置
    pub fn normal_matrix(&self) -> Result<Mat4, MathError> {
        inverse_transpose(&self.model_view())
    }

    /// 当前帧的全部矩阵
    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms::new(self.projection(), self.model_view())
    }
}

fn inverse_transpose(m: &Mat4) -> Result<Mat4, MathError> {
    let mut out = m.invert()?;
    out.transpose_in_place();
    Ok(out)
}

impl Component for Camera {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, delta_time: f32) {
        self.set_spin(self.spin + delta_time * self.spin_rate);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::main_camera()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_eq(a: &Mat4, b: &Mat4, eps: f32) {
        for i in 0..16 {
            assert!((a.0[i] - b.0[i]).abs() < eps, "index {}: {} != {}", i, a.0[i], b.0[i]);
        }
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();
        assert_eq!(camera.name(), "MainCamera");
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), FarPlane::Finite(100.0));
        assert_eq!(camera.spin(), 0.0);
    }

    #[test]
    fn test_from_config() {
        let config = CameraConfig {
            infinite_far: true,
            viewport_width: 1920,
            viewport_height: 1080,
            ..CameraConfig::default()
        };
        let camera = Camera::from_config("Viewer", &config);

        assert_eq!(camera.name(), "Viewer");
        assert_eq!(camera.far(), FarPlane::Infinite);
        assert!((camera.aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert!((camera.fov_y() - 45.0 * DEG_TO_RAD).abs() < 1e-6);
    }

    #[test]
    fn test_projection_uses_perspective() {
        let camera = Camera::default();
        let expected = Mat4::perspective(camera.fov_y(), camera.aspect(), 0.1, FarPlane::Finite(100.0));
        assert_eq!(camera.projection(), expected);
    }

    #[test]
    fn test_set_aspect_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect(800, 400);
        assert_eq!(camera.aspect(), 2.0);
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn test_model_view_places_ball_in_front() {
        let camera = Camera::default();
        let center = camera.model_view().transform_point(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-6);

        // 俯仰 90°：球的 +Z 极点转到视图下方
        let pole = camera.model_view().transform_point(Vec3::Z);
        assert!((pole - Vec3::new(0.0, -1.0, -3.0)).length() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_of_rigid_transform_is_rotation() {
        let mut camera = Camera::default();
        camera.set_spin(0.8);

        let model_view = camera.model_view();
        let normal = camera.normal_matrix().unwrap();

        for col in 0..3 {
            for row in 0..3 {
                let diff = (normal.get(col, row) - model_view.get(col, row)).abs();
                assert!(diff < 1e-5, "({}, {}) differs by {}", col, row, diff);
            }
        }
    }

    #[test]
    fn test_frame_uniforms() {
        let camera = Camera::default();
        let frame = camera.frame_uniforms();

        assert_eq!(frame.model_view, camera.model_view());
        assert_eq!(frame.normal, Some(camera.normal_matrix().unwrap()));
        assert_mat_eq(&frame.projection, &camera.projection(), 1e-7);
        assert_eq!(frame.projection_bytes().len(), 64);
        assert_eq!(frame.normal_bytes().map(|b| b.len()), Some(64));
    }

    #[test]
    fn test_singular_model_view_skips_normal() {
        // 缩放为 0 的模型视图把整个场景压扁，不可逆
        let mut flattened = Mat4::identity();
        flattened.0[10] = 0.0;

        let frame = FrameUniforms::new(Camera::default().projection(), flattened);
        assert_eq!(frame.normal, None);
        assert_eq!(frame.normal_bytes(), None);
        assert_eq!(frame.model_view_bytes().len(), 64);
    }

    #[test]
    fn test_tick_advances_spin() {
        let mut camera = Camera::default();
        camera.tick(2.0);
        assert!((camera.spin() - 0.5).abs() < 1e-6);

        camera.tick(100.0);
        assert!(camera.spin() >= 0.0 && camera.spin() < TAU);
    }
}
