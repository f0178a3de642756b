//! 和声搜索

use super::parameters::搜索参数;
use super::strategy::搜索策略;
use super::{优化结果, 无钩子, 钩子};
use crate::objectives::目标函数;
use crate::operators::{均匀生成器, 生成器};
use crate::错误;
use tracing::debug;
use web_time::Instant;

/// 和声搜索优化器，每次调用 `优化` 执行一次完整的试验
#[derive(Debug, Clone)]
pub struct 和声搜索 {
    参数: 搜索参数,
    种子: Option<u64>,
    生成器: 均匀生成器,
}

impl 和声搜索 {
    pub fn 新建(参数: 搜索参数) -> Self {
        Self {
            参数,
            种子: None,
            生成器: 均匀生成器::default(),
        }
    }

    /// 固定随机数种子，使试验可以复现
    pub fn 种子(mut self, 种子: u64) -> Self {
        self.种子 = Some(种子);
        self
    }

    /// 初始化和随机创作时使用的均匀生成器
    pub fn 生成器(mut self, 生成器: 均匀生成器) -> Self {
        self.生成器 = 生成器;
        self
    }

    pub fn 参数(&self) -> &搜索参数 {
        &self.参数
    }

    pub fn 优化<O: 目标函数 + ?Sized>(
        &self,
        维度: usize,
        目标函数: &O,
    ) -> Result<优化结果, 错误> {
        self.带钩子优化(维度, 目标函数, &mut 无钩子)
    }

    pub fn 带钩子优化<O: 目标函数 + ?Sized, H: 钩子>(
        &self,
        维度: usize,
        目标函数: &O,
        钩子: &mut H,
    ) -> Result<优化结果, 错误> {
        self.使用生成器优化(
            维度,
            目标函数,
            Box::new(self.生成器),
            Box::new(self.生成器),
            钩子,
        )
    }

    /// 和声搜索的主函数
    pub fn 使用生成器优化<'a, O: 目标函数 + ?Sized, H: 钩子>(
        &'a self,
        维度: usize,
        目标函数: &'a O,
        初始生成器: Box<dyn 生成器 + 'a>,
        随机生成器: Box<dyn 生成器 + 'a>,
        钩子: &mut H,
    ) -> Result<优化结果, 错误> {
        let 开始时间 = Instant::now();
        let mut 策略 = 搜索策略::使用生成器新建(
            &self.参数,
            维度,
            目标函数,
            初始生成器,
            随机生成器,
            self.种子,
        )?;
        钩子.初始化(&策略);
        let 初始最优 = 策略.最优和声().clone();
        let 总步数 = self.参数.最大评估次数();
        debug!(
            "开始和声搜索：维度 {}，记忆大小 {}，迭代 {} 次，初始最优值 {:.6e}",
            维度,
            self.参数.记忆大小(),
            总步数,
            初始最优.值()
        );

        let mut 历史 = Vec::with_capacity(总步数);
        for 步骤 in 0..总步数 {
            钩子.迭代前(步骤, &策略);
            let 新和声 = 策略.生成和声()?;
            策略.交换和声(新和声);
            历史.push(策略.最优和声().值());
            钩子.迭代后(步骤, &策略);
        }

        let (最优值, 最优变量) = 策略.最优和声().clone().拆分();
        let (初始最优值, 初始最优变量) = 初始最优.拆分();
        let 结果 = 优化结果 {
            最优值,
            最优变量,
            初始最优值,
            初始最优变量,
            历史,
            评估次数: self.参数.记忆大小() + 总步数,
            迭代次数: 总步数,
            用时: 开始时间.elapsed(),
        };
        钩子.结束(&结果);
        debug!(
            "和声搜索结束：最优值 {:.6e}，用时 {} ms",
            结果.最优值,
            结果.用时.as_millis()
        );
        Ok(结果)
    }
}
