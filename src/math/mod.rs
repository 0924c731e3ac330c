//! 最小化的数学内核
//!
//! 只提供镜面球生成与渲染边界真正用到的运算，不是通用线性代数库。
//!
//! # 模块组织
//!
//! - **基础类型**：`Vec3`、`Mat4`（列主序）、`Color`
//! - **常量**：PI, TAU, DEG_TO_RAD 等
//! - **工具函数**：deg_to_rad, approx_eq 等
//!
//! # 设计理念
//!
//! - 所有类型都是 `#[repr(C)]` + `bytemuck::Pod`，可以直接作为 GPU 缓冲区上传
//! - 与 gl-matrix 一致的列主序布局：第 c 列第 r 行位于下标 `c * 4 + r`
//! - 可以与 `nalgebra` 互相转换（nalgebra 同样使用列主序存储）
//! - 可能“输出即输入”的运算成对提供：`&self` 返回新值，`*_in_place` 原地修改

use bytemuck::{Pod, Zeroable};

pub mod mat4;
pub mod vec3;

pub use mat4::{FarPlane, Mat4};
pub use vec3::{Axis, Vec3};

/// 颜色类型（RGBA，范围 0.0-1.0）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// 创建新的颜色
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 创建 RGB 颜色（alpha = 1.0）
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// 转换为数组
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
}

/// 数学常量
pub mod constants {
    /// π
    pub const PI: f32 = std::f32::consts::PI;

    /// 2π
    pub const TAU: f32 = std::f32::consts::TAU;

    /// π/2
    pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;

    /// 角度转弧度的系数
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// 旋转轴长度下限，低于此值视为退化轴
    pub const EPSILON: f32 = 1e-6;
}

/// 数学工具函数
pub mod utils {
    use super::constants;

    /// 角度转弧度
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// 检查两个浮点数是否近似相等
    pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_creation() {
        let color = Color::rgb(1.0, 0.5, 0.0);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.a, 1.0);
        assert_eq!(color.to_array(), [1.0, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_color_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Color>(), 16);
        let colors = [Color::RED, Color::BLUE];
        let floats: &[f32] = bytemuck::cast_slice(&colors);
        assert_eq!(floats, &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_deg_to_rad() {
        assert!(utils::approx_eq(utils::deg_to_rad(180.0), constants::PI, 1e-6));
        assert!(utils::approx_eq(utils::deg_to_rad(90.0), constants::HALF_PI, 1e-6));
    }
}
