//! 生成器接口，以及默认的均匀随机生成器
//!
//! 生成器用于两处：初始化和声记忆时产生初始解，以及即兴创作时以完全随机的方式产生新解。

use crate::错误;
use rand::{Rng, RngCore};

pub trait 生成器 {
    /// 产生一组长度为 `维度` 的决策变量
    fn 生成(&self, 维度: usize, rng: &mut dyn RngCore) -> Vec<f64>;
}

impl<F> 生成器 for F
where
    F: Fn(usize, &mut dyn RngCore) -> Vec<f64>,
{
    fn 生成(&self, 维度: usize, rng: &mut dyn RngCore) -> Vec<f64> {
        self(维度, rng)
    }
}

pub const 默认范围: f64 = 3.0;

/// 在 [-范围, 范围] 上均匀抽样
#[derive(Debug, Clone, Copy)]
pub struct 均匀生成器 {
    范围: f64,
}

impl Default for 均匀生成器 {
    fn default() -> Self {
        Self { 范围: 默认范围 }
    }
}

impl 均匀生成器 {
    /// 范围取绝对值，不能为 NaN 或无穷大
    pub fn 新建(范围: f64) -> Result<Self, 错误> {
        if !范围.is_finite() {
            return Err(format!("生成器的范围必须是有限值，实际为 {范围}").into());
        }
        Ok(Self { 范围: 范围.abs() })
    }

    pub fn 范围(&self) -> f64 {
        self.范围
    }
}

impl 生成器 for 均匀生成器 {
    fn 生成(&self, 维度: usize, rng: &mut dyn RngCore) -> Vec<f64> {
        (0..维度)
            .map(|_| rng.random_range(-self.范围..=self.范围))
            .collect()
    }
}
