//! 可注入的随机源
//!
//! 镜面抖动角和镜片颜色都从 `RandomSource` 抽取。生产环境使用 `rand` 的 `StdRng`，
//! 测试可以注入 `SequenceSource` 得到确定的抖动角与颜色。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 均匀随机数源，返回 `[0, 1)` 内的值
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// 把任意 `rand::Rng` 适配为 `RandomSource`
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// 使用系统熵初始化
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// 使用固定种子初始化，生成结果可复现
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// 循环返回固定序列的随机源
///
/// 空序列始终返回 0.5（对应零抖动）。
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// 始终返回同一个值
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
