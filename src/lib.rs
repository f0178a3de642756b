//! libharmony 是使用 Rust 实现的和声搜索（Harmony Search）优化算法，用于在连续向量空间上最小化用户提供的实值目标函数。
//!
//! 除了单次优化以外，本库还提供一个固定大小的线程池，用于并行地执行多次独立试验，并对试验结果进行统计。
//!
//! harmony 是使用 libharmony 实现的命令行程序，用户提供参数配置文件，本程序能够对基准函数执行单次优化或批量试验，并以 CSV 格式输出收敛曲线、最优变量和统计量。

pub mod config;
pub mod interfaces;
pub mod io;
pub mod objectives;
pub mod operators;
pub mod optimizers;
pub mod statistics;
pub mod thread_pool;
pub mod trials;

use objectives::求值错误;
use thiserror::Error;

/// 错误类型
#[derive(Debug, Error)]
pub enum 错误 {
    /// 记忆大小、维度、比率等参数不合法
    #[error("配置无效：{0}")]
    InvalidConfiguration(String),
    /// 对空的结果集合求统计量
    #[error("结果集合为空，无法计算统计量")]
    EmptyBatch,
    /// 线程池关闭后仍然提交任务
    #[error("线程池已关闭，无法提交任务")]
    PoolStopped,
    /// 通过句柄等待的任务在执行中崩溃
    #[error("任务执行失败：{0}")]
    TaskPanicked(String),
    /// 目标函数求值失败，原样传递
    #[error(transparent)]
    Objective(求值错误),
}

impl 错误 {
    pub fn 是否为配置错误(&self) -> bool {
        matches!(self, 错误::InvalidConfiguration(_))
    }
}

impl From<String> for 错误 {
    fn from(value: String) -> Self {
        错误::InvalidConfiguration(value)
    }
}

impl From<&str> for 错误 {
    fn from(value: &str) -> Self {
        错误::InvalidConfiguration(value.to_string())
    }
}
