//! 配置文件的结构，与 YAML 文件中的字段一一对应

use crate::objectives::benchmarks::按名称查找;
use crate::operators::{均匀生成器, 默认范围};
use crate::optimizers::parameters::搜索参数;
use crate::错误;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct 参数配置 {
    pub memory_size: Option<usize>,
    pub max_evaluations: Option<usize>,
    pub bandwidth: Option<f64>,
    pub memory_consideration_ratio: Option<f64>,
    pub pitch_adjustment_ratio: Option<f64>,
}

impl 参数配置 {
    /// 未给出的字段使用默认值，结果经过与构建器相同的校验
    pub fn 转换(&self) -> Result<搜索参数, 错误> {
        let mut 构建器 = 搜索参数::构建();
        if let Some(记忆大小) = self.memory_size {
            构建器 = 构建器.记忆大小(记忆大小);
        }
        if let Some(最大评估次数) = self.max_evaluations {
            构建器 = 构建器.最大评估次数(最大评估次数);
        }
        if let Some(带宽) = self.bandwidth {
            构建器 = 构建器.带宽(带宽);
        }
        if let Some(记忆考虑率) = self.memory_consideration_ratio {
            构建器 = 构建器.记忆考虑率(记忆考虑率);
        }
        if let Some(音调调整率) = self.pitch_adjustment_ratio {
            构建器 = 构建器.音调调整率(音调调整率);
        }
        构建器.构建()
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct 问题配置 {
    /// 基准函数的名称：sphere、rastrigin、rosenbrock 或 ackley
    pub function: String,
    pub dimension: usize,
    /// 初始化和随机创作的取值范围 [-range, range]
    pub range: Option<f64>,
}

impl 问题配置 {
    pub fn 目标函数(&self) -> Result<fn(&[f64]) -> f64, 错误> {
        按名称查找(&self.function)
            .ok_or_else(|| 错误::InvalidConfiguration(format!("未知的函数：{}", self.function)))
    }

    pub fn 生成器(&self) -> Result<均匀生成器, 错误> {
        均匀生成器::新建(self.range.unwrap_or(默认范围))
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct 批量配置 {
    pub trials: Option<usize>,
    pub threads: Option<usize>,
    pub seed: Option<u64>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct 配置 {
    pub parameters: Option<参数配置>,
    pub problem: 问题配置,
    pub batch: Option<批量配置>,
    /// 每隔多少次迭代报告一次进度
    pub update_interval: Option<usize>,
}

impl 配置 {
    pub fn 解析(内容: &str) -> Result<Self, 错误> {
        serde_yaml::from_str(内容).map_err(|e| 错误::InvalidConfiguration(e.to_string()))
    }

    pub fn 搜索参数(&self) -> Result<搜索参数, 错误> {
        self.parameters.clone().unwrap_or_default().转换()
    }

    pub fn 批量(&self) -> 批量配置 {
        self.batch.clone().unwrap_or_default()
    }
}
