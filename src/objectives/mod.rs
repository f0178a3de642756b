//! 目标函数接口，以及若干基准函数的实现
//!
//! 目标函数以一组决策变量为输入，返回一个实数，数值越小越好。批量试验时同一个目标函数会被多个工作线程同时调用，因此要求 `Sync`。

pub mod benchmarks;

use std::error::Error;

/// 目标函数求值时产生的错误，原样传递给调用者
pub type 求值错误 = Box<dyn Error + Send + Sync>;

pub trait 目标函数: Sync {
    fn 计算(&self, 变量: &[f64]) -> Result<f64, 求值错误>;
}

impl<F> 目标函数 for F
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn 计算(&self, 变量: &[f64]) -> Result<f64, 求值错误> {
        Ok(self(变量))
    }
}

/// 包装一个可能失败的闭包，使之成为目标函数
///
/// ```
/// use harmony::objectives::{可失败, 目标函数};
///
/// let 目标 = 可失败(|x: &[f64]| {
///     if x.iter().all(|v| v.is_finite()) {
///         Ok(x.iter().map(|v| v * v).sum::<f64>())
///     } else {
///         Err("变量中出现非有限值")
///     }
/// });
/// assert!(目标.计算(&[f64::NAN]).is_err());
/// ```
pub struct 可失败<F>(pub F);

impl<F, E> 目标函数 for 可失败<F>
where
    F: Fn(&[f64]) -> Result<f64, E> + Sync,
    E: Into<求值错误>,
{
    fn 计算(&self, 变量: &[f64]) -> Result<f64, 求值错误> {
        (self.0)(变量).map_err(Into::into)
    }
}
