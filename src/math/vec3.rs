//! 三维向量
//!
//! `Vec3` 是 `Copy` 值类型，所有运算都返回新值，因此“输出与输入为同一缓冲区”
//! 的情况天然安全，也不会产生堆分配。

use std::ops::{Add, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use nalgebra::Vector3;

/// 单轴旋转所绕的坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// 坐标轴方向的单位向量
    pub const fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Z => Vec3::Z,
        }
    }
}

/// 三维向量 / 点 (x, y, z)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// 向量长度
    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// 归一化，零向量返回 `None`
    pub fn normalize(self) -> Option<Vec3> {
        let len = self.length();
        if len > 0.0 {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// 绕经过 `pivot` 且平行于 `axis` 的直线旋转该点
    ///
    /// 先平移 `-pivot`，在垂直于该轴的平面内做标准 cos/sin 旋转，再平移回 `+pivot`。
    ///
    /// - `Axis::X`: `(x, y·c − z·s, y·s + z·c)`
    /// - `Axis::Z`: `(x·c − y·s, x·s + y·c, z)`
    pub fn rotate_about(self, pivot: Vec3, radians: f32, axis: Axis) -> Vec3 {
        let p = self - pivot;
        let (s, c) = radians.sin_cos();

        let r = match axis {
            Axis::X => Vec3::new(p.x, p.y * c - p.z * s, p.y * s + p.z * c),
            Axis::Z => Vec3::new(p.x * c - p.y * s, p.x * s + p.y * c, p.z),
        };

        r + pivot
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl From<Vector3<f32>> for Vec3 {
    fn from(v: Vector3<f32>) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3<f32> {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}
