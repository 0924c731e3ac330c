//! 光照组件模块
//!
//! 镜面球使用的光照：一个环境光加两个方向光（红、蓝）。
//! `LightRig::shade` 在 CPU 上复现顶点着色器的光照计算，
//! 便于测试和离线预览。

use crate::component::Component;
use crate::math::{Color, Mat4, Vec3};

/// 方向光（平行光）
///
/// 所有光线平行，只有方向和颜色
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    name: String,
    /// 光照强度
    pub intensity: f32,
    /// 光照颜色
    pub color: Color,
    /// 指向光源的方向（归一化向量）
    direction: Vec3,
}

impl DirectionalLight {
    /// 创建新的方向光，方向会被归一化
    ///
    /// 零向量方向得到一个不贡献光照的光源。
    pub fn new(name: impl Into<String>, color: Color, direction: Vec3) -> Self {
        Self {
            name: name.into(),
            intensity: 1.0,
            color,
            direction: direction.normalize().unwrap_or(Vec3::ZERO),
        }
    }

    /// 获取光照方向
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// 设置光照方向
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize().unwrap_or(Vec3::ZERO);
    }

    /// 对给定法线的 Lambert 贡献（RGB）
    pub fn contribution(&self, normal: Vec3) -> [f32; 3] {
        let lambert = normal.dot(self.direction).max(0.0) * self.intensity;
        [self.color.r * lambert, self.color.g * lambert, self.color.b * lambert]
    }
}

impl Component for DirectionalLight {
    fn name(&self) -> &str {
        &self.name
    }
}

/// 镜面球的光照组合
#[derive(Debug, Clone)]
pub struct LightRig {
    /// 环境光
    pub ambient: Color,
    /// 方向光列表
    pub lights: Vec<DirectionalLight>,
}

impl LightRig {
    /// 没有方向光的光照组合
    pub fn with_ambient(ambient: Color) -> Self {
        Self {
            ambient,
            lights: Vec::new(),
        }
    }

    /// 添加方向光
    pub fn add_light(&mut self, light: DirectionalLight) {
        self.lights.push(light);
    }

    /// 计算一个顶点的光照强度（RGB）
    ///
    /// 法线按 `(normal, 1)` 与法线矩阵相乘后取 xyz，与着色器一致，
    /// 因此法线矩阵的平移部分也会影响结果。
    pub fn shade(&self, normal_matrix: &Mat4, normal: Vec3) -> [f32; 3] {
        let transformed = normal_matrix.transform_point(normal);

        self.lights.iter().fold(
            [self.ambient.r, self.ambient.g, self.ambient.b],
            |mut acc, light| {
                let [r, g, b] = light.contribution(transformed);
                acc[0] += r;
                acc[1] += g;
                acc[2] += b;
                acc
            },
        )
    }

    /// 白色表面在该光照下的片元颜色
    pub fn fragment_color(&self, normal_matrix: &Mat4, normal: Vec3) -> Color {
        let [r, g, b] = self.shade(normal_matrix, normal);
        Color::new(r, g, b, 1.0)
    }
}

impl Default for LightRig {
    /// 环境光 0.1，红光来自右上前方，蓝光来自左上前方
    fn default() -> Self {
        let mut rig = Self::with_ambient(Color::rgb(0.1, 0.1, 0.1));
        rig.add_light(DirectionalLight::new("KeyRed", Color::RED, Vec3::new(0.85, 0.8, 0.75)));
        rig.add_light(DirectionalLight::new("KeyBlue", Color::BLUE, Vec3::new(-0.85, 0.8, 0.75)));
        rig
    }
}
