//! 批量试验：在线程池上并行执行多次独立的和声搜索，并汇总结果
//!
//! 单次试验失败不会影响其他试验，失败的试验连同其错误一起保留在批量结果中。

use crate::objectives::目标函数;
use crate::optimizers::harmony_search::和声搜索;
use crate::optimizers::{优化结果, 无钩子, 钩子};
use crate::statistics::统计;
use crate::thread_pool::线程池;
use crate::错误;
use itertools::{Either, Itertools};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 一次试验的序号和结果
#[derive(Debug)]
pub struct 试验记录 {
    pub 序号: usize,
    pub 结果: Result<优化结果, 错误>,
}

/// 按序号排列的全部试验记录
#[derive(Debug, Default)]
pub struct 批量结果 {
    pub 记录: Vec<试验记录>,
}

impl 批量结果 {
    pub fn 成功(&self) -> impl Iterator<Item = (usize, &优化结果)> + '_ {
        self.记录
            .iter()
            .filter_map(|记录| 记录.结果.as_ref().ok().map(|r| (记录.序号, r)))
    }

    pub fn 失败(&self) -> impl Iterator<Item = (usize, &错误)> + '_ {
        self.记录
            .iter()
            .filter_map(|记录| 记录.结果.as_ref().err().map(|e| (记录.序号, e)))
    }

    /// 把记录分为成功和失败两部分
    #[allow(clippy::type_complexity)]
    pub fn 拆分(&self) -> (Vec<(usize, &优化结果)>, Vec<(usize, &错误)>) {
        self.记录
            .iter()
            .partition_map(|记录| match &记录.结果 {
                Ok(结果) => Either::Left((记录.序号, 结果)),
                Err(e) => Either::Right((记录.序号, e)),
            })
    }

    pub fn 成功结果(&self) -> Vec<&优化结果> {
        self.成功().map(|(_, 结果)| 结果).collect()
    }

    /// 只对成功的试验求统计量
    pub fn 统计(&self) -> Result<统计<'_>, 错误> {
        统计::新建(self.成功().map(|(_, 结果)| 结果))
    }

    pub fn 全部成功(&self) -> bool {
        self.失败().next().is_none()
    }
}

/// 并行执行 `试验次数` 次试验，`工厂` 根据试验序号构造每次试验的优化器
pub fn 批量优化<O, F>(
    线程池: &线程池,
    试验次数: usize,
    mut 工厂: F,
    目标函数: Arc<O>,
    维度: usize,
) -> Result<批量结果, 错误>
where
    O: 目标函数 + ?Sized + Send + Sync + 'static,
    F: FnMut(usize) -> 和声搜索,
{
    带钩子批量优化(线程池, 试验次数, |序号| (工厂(序号), 无钩子), 目标函数, 维度)
}

/// 与 `批量优化` 相同，但每次试验还带有自己的钩子
pub fn 带钩子批量优化<O, F, H>(
    线程池: &线程池,
    试验次数: usize,
    mut 工厂: F,
    目标函数: Arc<O>,
    维度: usize,
) -> Result<批量结果, 错误>
where
    O: 目标函数 + ?Sized + Send + Sync + 'static,
    F: FnMut(usize) -> (和声搜索, H),
    H: 钩子 + Send + 'static,
{
    info!(
        "提交 {} 次试验到 {} 个工作线程",
        试验次数,
        线程池.线程数()
    );
    let mut 句柄列表 = Vec::with_capacity(试验次数);
    for 序号 in 0..试验次数 {
        let (优化器, mut 钩子) = 工厂(序号);
        let 目标函数 = Arc::clone(&目标函数);
        let 句柄 = 线程池.提交并获取结果(move || {
            优化器.带钩子优化(维度, &*目标函数, &mut 钩子)
        })?;
        句柄列表.push(句柄);
    }
    let 记录 = 句柄列表
        .into_iter()
        .enumerate()
        .map(|(序号, 句柄)| {
            let 结果 = 句柄.等待().and_then(|结果| 结果);
            match &结果 {
                Ok(结果) => debug!("第 {} 次试验完成，最优值 {:.6e}", 序号, 结果.最优值),
                Err(e) => warn!("第 {} 次试验失败：{}", 序号, e),
            }
            试验记录 { 序号, 结果 }
        })
        .collect();
    Ok(批量结果 { 记录 })
}
