use crate::objectives::目标函数;
use crate::optimizers::strategy::搜索策略;
use crate::optimizers::{优化结果, 钩子};
use serde::Serialize;
use serde_with::skip_serializing_none;

pub mod command_line;

/// 向用户反馈的消息类型
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum 消息 {
    Progress {
        steps: usize,
        value: f64,
    },
    BetterSolution {
        steps: usize,
        value: f64,
        variables: Option<Vec<f64>>,
    },
    /// 平均每次求值的用时，单位为微秒
    Elapsed {
        time: u64,
    },
    Finished {
        value: f64,
        evaluations: usize,
        elapsed_ms: u64,
    },
}

/// 定义了向用户报告消息的接口，用于统一不同输出方式
///
/// 各种界面只需要各自实现 发送 方法，就可向用户报告优化进度
pub trait 界面 {
    fn 发送(&self, 消息: 消息);
}

/// 把优化循环中的钩子调用转换为消息发送给界面
pub struct 报告钩子<I: 界面> {
    界面: I,
    更新频率: usize,
    当前最优值: f64,
}

impl<I: 界面> 报告钩子<I> {
    /// `更新频率` 为 0 时不发送进度消息
    pub fn 新建(界面: I, 更新频率: usize) -> Self {
        Self {
            界面,
            更新频率,
            当前最优值: f64::INFINITY,
        }
    }

    pub fn 界面(&self) -> &I {
        &self.界面
    }
}

impl<I: 界面> 钩子 for 报告钩子<I> {
    fn 初始化<O: 目标函数 + ?Sized>(&mut self, 策略: &搜索策略<O>) {
        let 最优 = 策略.最优和声();
        self.当前最优值 = 最优.值();
        self.界面.发送(消息::BetterSolution {
            steps: 0,
            value: 最优.值(),
            variables: Some(最优.变量().to_vec()),
        });
    }

    fn 迭代后<O: 目标函数 + ?Sized>(&mut self, 步骤: usize, 策略: &搜索策略<O>) {
        let 最优 = 策略.最优和声();
        if 最优.值() < self.当前最优值 {
            self.当前最优值 = 最优.值();
            self.界面.发送(消息::BetterSolution {
                steps: 步骤 + 1,
                value: 最优.值(),
                variables: None,
            });
        }
        if self.更新频率 != 0 && (步骤 + 1) % self.更新频率 == 0 {
            self.界面.发送(消息::Progress {
                steps: 步骤 + 1,
                value: self.当前最优值,
            });
        }
    }

    fn 结束(&mut self, 结果: &优化结果) {
        let 微秒 = 结果.用时.as_micros() / 结果.评估次数.max(1) as u128;
        self.界面.发送(消息::Elapsed {
            time: u64::try_from(微秒).unwrap_or(u64::MAX),
        });
        self.界面.发送(消息::Finished {
            value: 结果.最优值,
            evaluations: 结果.评估次数,
            elapsed_ms: u64::try_from(结果.用时.as_millis()).unwrap_or(u64::MAX),
        });
    }
}
