//! 列主序 4x4 矩阵
//!
//! 布局与 gl-matrix 一致：第 c 列第 r 行位于下标 `c * 4 + r`，平移位于 12/13/14。
//! 所有变换都是右乘：`m.translate(v)` 先应用平移，再应用 `m` 原有的变换。
//!
//! 每个可能“输出即输入”的运算都有两个版本：
//!
//! - `&self` 版本返回新矩阵
//! - `*_in_place` 版本原地修改，只改写真正变化的元素

use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use nalgebra::Matrix4;

use super::constants::EPSILON;
use super::vec3::{Axis, Vec3};
use crate::core::error::MathError;

/// 透视投影的远平面
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FarPlane {
    /// 有限远平面
    Finite(f32),
    /// 无限远平面（`m[10] = -1`, `m[14] = -2·near`）
    Infinite,
}

impl From<f32> for FarPlane {
    fn from(far: f32) -> Self {
        if far == f32::INFINITY {
            FarPlane::Infinite
        } else {
            FarPlane::Finite(far)
        }
    }
}

/// 4x4 矩阵（列主序）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Mat4(pub [f32; 16]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    /// 单位矩阵
    #[rustfmt::skip]
    pub const fn identity() -> Self {
        Mat4([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// 全零矩阵
    pub const fn zero() -> Self {
        Mat4([0.0; 16])
    }

    /// 从列主序数组构建
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Mat4(m)
    }

    /// 读取第 `col` 列第 `row` 行
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.0[col * 4 + row]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// 按字节访问，用于上传 uniform
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// 转置
    #[rustfmt::skip]
    pub fn transpose(&self) -> Mat4 {
        let a = &self.0;
        Mat4([
            a[0], a[4], a[8],  a[12],
            a[1], a[5], a[9],  a[13],
            a[2], a[6], a[10], a[14],
            a[3], a[7], a[11], a[15],
        ])
    }

    /// 原地转置，只交换六对非对角元素
    pub fn transpose_in_place(&mut self) {
        let a = &mut self.0;
        let (a01, a02, a03) = (a[1], a[2], a[3]);
        let (a12, a13) = (a[6], a[7]);
        let a23 = a[11];

        a[1] = a[4];
        a[2] = a[8];
        a[3] = a[12];
        a[4] = a01;
        a[6] = a[9];
        a[7] = a[13];
        a[8] = a02;
        a[9] = a12;
        a[11] = a[14];
        a[12] = a03;
        a[13] = a13;
        a[14] = a23;
    }

    /// 行列式
    pub fn determinant(&self) -> f32 {
        let c = Cofactors::of(self);
        c.determinant()
    }

    /// 余子式展开求逆
    ///
    /// 行列式恰好为 0 时返回 `MathError::SingularMatrix`，不使用容差。
    pub fn invert(&self) -> Result<Mat4, MathError> {
        let a = &self.0;
        let c = Cofactors::of(self);
        let det = c.determinant();

        if det == 0.0 {
            return Err(MathError::SingularMatrix);
        }

        let inv = 1.0 / det;
        let (a00, a01, a02, a03) = (a[0], a[1], a[2], a[3]);
        let (a10, a11, a12, a13) = (a[4], a[5], a[6], a[7]);
        let (a20, a21, a22, a23) = (a[8], a[9], a[10], a[11]);
        let (a30, a31, a32, a33) = (a[12], a[13], a[14], a[15]);
        let Cofactors { b00, b01, b02, b03, b04, b05, b06, b07, b08, b09, b10, b11 } = c;

        Ok(Mat4([
            (a11 * b11 - a12 * b10 + a13 * b09) * inv,
            (a02 * b10 - a01 * b11 - a03 * b09) * inv,
            (a31 * b05 - a32 * b04 + a33 * b03) * inv,
            (a22 * b04 - a21 * b05 - a23 * b03) * inv,
            (a12 * b08 - a10 * b11 - a13 * b07) * inv,
            (a00 * b11 - a02 * b08 + a03 * b07) * inv,
            (a32 * b02 - a30 * b05 - a33 * b01) * inv,
            (a20 * b05 - a22 * b02 + a23 * b01) * inv,
            (a10 * b10 - a11 * b08 + a13 * b06) * inv,
            (a01 * b08 - a00 * b10 - a03 * b06) * inv,
            (a30 * b04 - a31 * b02 + a33 * b00) * inv,
            (a21 * b02 - a20 * b04 - a23 * b00) * inv,
            (a11 * b07 - a10 * b09 - a12 * b06) * inv,
            (a00 * b09 - a01 * b07 + a02 * b06) * inv,
            (a31 * b01 - a30 * b03 - a32 * b00) * inv,
            (a20 * b03 - a21 * b01 + a22 * b00) * inv,
        ]))
    }

    /// 原地求逆，失败时矩阵保持不变
    pub fn invert_in_place(&mut self) -> Result<(), MathError> {
        *self = self.invert()?;
        Ok(())
    }

    /// 右乘平移矩阵
    pub fn translate(&self, v: Vec3) -> Mat4 {
        let mut out = *self;
        out.translate_in_place(v);
        out
    }

    /// 原地右乘平移矩阵，只改写第 3 列
    pub fn translate_in_place(&mut self, v: Vec3) {
        let a = &mut self.0;
        let Vec3 { x, y, z } = v;

        a[12] = a[0] * x + a[4] * y + a[8] * z + a[12];
        a[13] = a[1] * x + a[5] * y + a[9] * z + a[13];
        a[14] = a[2] * x + a[6] * y + a[10] * z + a[14];
        a[15] = a[3] * x + a[7] * y + a[11] * z + a[15];
    }

    /// 右乘绕 `axis` 旋转 `radians` 的矩阵（Rodrigues 公式）
    ///
    /// `|axis| < 1e-6` 时返回 `MathError::DegenerateAxis`。
    /// 第 3 列（下标 12..16）原样复制。
    pub fn rotate(&self, radians: f32, axis: Vec3) -> Result<Mat4, MathError> {
        let mut out = *self;
        out.rotate_in_place(radians, axis)?;
        Ok(out)
    }

    /// 原地旋转，失败时矩阵保持不变
    ///
    /// 先缓存前三列再写回，第 3 列不参与运算。
    pub fn rotate_in_place(&mut self, radians: f32, axis: Vec3) -> Result<(), MathError> {
        let len = axis.length();
        if len < EPSILON {
            return Err(MathError::DegenerateAxis);
        }

        self.apply_rotation(radians, axis * (1.0 / len));
        Ok(())
    }

    /// 绕坐标轴旋转，坐标轴是单位向量，不会失败
    pub fn rotate_axis(&self, radians: f32, axis: Axis) -> Mat4 {
        let mut out = *self;
        out.apply_rotation(radians, axis.unit());
        out
    }

    /// `unit` 必须已经归一化
    fn apply_rotation(&mut self, radians: f32, unit: Vec3) {
        let Vec3 { x, y, z } = unit;
        let (s, c) = radians.sin_cos();
        let t = 1.0 - c;

        let a = &mut self.0;
        let (a00, a01, a02, a03) = (a[0], a[1], a[2], a[3]);
        let (a10, a11, a12, a13) = (a[4], a[5], a[6], a[7]);
        let (a20, a21, a22, a23) = (a[8], a[9], a[10], a[11]);

        let b00 = x * x * t + c;
        let b01 = y * x * t + z * s;
        let b02 = z * x * t - y * s;
        let b10 = x * y * t - z * s;
        let b11 = y * y * t + c;
        let b12 = z * y * t + x * s;
        let b20 = x * z * t + y * s;
        let b21 = y * z * t - x * s;
        let b22 = z * z * t + c;

        a[0] = a00 * b00 + a10 * b01 + a20 * b02;
        a[1] = a01 * b00 + a11 * b01 + a21 * b02;
        a[2] = a02 * b00 + a12 * b01 + a22 * b02;
        a[3] = a03 * b00 + a13 * b01 + a23 * b02;
        a[4] = a00 * b10 + a10 * b11 + a20 * b12;
        a[5] = a01 * b10 + a11 * b11 + a21 * b12;
        a[6] = a02 * b10 + a12 * b11 + a22 * b12;
        a[7] = a03 * b10 + a13 * b11 + a23 * b12;
        a[8] = a00 * b20 + a10 * b21 + a20 * b22;
        a[9] = a01 * b20 + a11 * b21 + a21 * b22;
        a[10] = a02 * b20 + a12 * b21 + a22 * b22;
        a[11] = a03 * b20 + a13 * b21 + a23 * b22;
    }

    /// 对称透视投影矩阵（OpenGL 裁剪空间，z ∈ [-1, 1]）
    ///
    /// # 参数
    ///
    /// - `fov_y`: 垂直视场角（弧度）
    /// - `aspect`: 宽高比
    /// - `near`: 近裁剪面距离
    /// - `far`: 远平面，`FarPlane::Infinite` 生成无限远投影
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: FarPlane) -> Mat4 {
        let f = 1.0 / (fov_y / 2.0).tan();
        let mut out = Mat4::zero();
        let m = &mut out.0;

        m[0] = f / aspect;
        m[5] = f;
        m[11] = -1.0;

        match far {
            FarPlane::Finite(far) => {
                let nf = 1.0 / (near - far);
                m[10] = (far + near) * nf;
                m[14] = 2.0 * far * near * nf;
            }
            FarPlane::Infinite => {
                m[10] = -1.0;
                m[14] = -2.0 * near;
            }
        }

        out
    }

    /// 矩阵乘法 `self * rhs`
    pub fn mul_mat4(&self, rhs: &Mat4) -> Mat4 {
        let mut out = Mat4::zero();
        for col in 0..4 {
            for row in 0..4 {
                out.0[col * 4 + row] = (0..4).map(|k| self.get(k, row) * rhs.get(col, k)).sum();
            }
        }
        out
    }

    /// 变换点（w = 1），忽略透视除法
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let a = &self.0;
        Vec3::new(
            a[0] * p.x + a[4] * p.y + a[8] * p.z + a[12],
            a[1] * p.x + a[5] * p.y + a[9] * p.z + a[13],
            a[2] * p.x + a[6] * p.y + a[10] * p.z + a[14],
        )
    }

    /// 变换方向向量（w = 0）
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let a = &self.0;
        Vec3::new(
            a[0] * v.x + a[4] * v.y + a[8] * v.z,
            a[1] * v.x + a[5] * v.y + a[9] * v.z,
            a[2] * v.x + a[6] * v.y + a[10] * v.z,
        )
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.mul_mat4(&rhs)
    }
}

impl From<Mat4> for Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        Matrix4::from_column_slice(&m.0)
    }
}

impl From<Matrix4<f32>> for Mat4 {
    fn from(m: Matrix4<f32>) -> Self {
        let mut out = [0.0; 16];
        out.copy_from_slice(m.as_slice());
        Mat4(out)
    }
}

/// 求逆与行列式共用的 2x2 子式
struct Cofactors {
    b00: f32,
    b01: f32,
    b02: f32,
    b03: f32,
    b04: f32,
    b05: f32,
    b06: f32,
    b07: f32,
    b08: f32,
    b09: f32,
    b10: f32,
    b11: f32,
}

impl Cofactors {
    fn of(m: &Mat4) -> Self {
        let a = &m.0;
        let (a00, a01, a02, a03) = (a[0], a[1], a[2], a[3]);
        let (a10, a11, a12, a13) = (a[4], a[5], a[6], a[7]);
        let (a20, a21, a22, a23) = (a[8], a[9], a[10], a[11]);
        let (a30, a31, a32, a33) = (a[12], a[13], a[14], a[15]);

        Self {
            b00: a00 * a11 - a01 * a10,
            b01: a00 * a12 - a02 * a10,
            b02: a00 * a13 - a03 * a10,
            b03: a01 * a12 - a02 * a11,
            b04: a01 * a13 - a03 * a11,
            b05: a02 * a13 - a03 * a12,
            b06: a20 * a31 - a21 * a30,
            b07: a20 * a32 - a22 * a30,
            b08: a20 * a33 - a23 * a30,
            b09: a21 * a32 - a22 * a31,
            b10: a21 * a33 - a23 * a31,
            b11: a22 * a33 - a23 * a32,
        }
    }

    fn determinant(&self) -> f32 {
        self.b00 * self.b11 - self.b01 * self.b10 + self.b02 * self.b09 + self.b03 * self.b08
            - self.b04 * self.b07
            + self.b05 * self.b06
    }
}
