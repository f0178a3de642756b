//! 多次试验结果的统计量

use crate::optimizers::优化结果;
use crate::错误;
use std::fmt::Display;
use std::time::Duration;

/// 一批试验的统计量，方差为总体方差（除以试验次数）
#[derive(Debug, Clone)]
pub struct 统计<'a> {
    pub 平均值: f64,
    pub 方差: f64,
    pub 标准差: f64,
    pub 最大值: f64,
    pub 最小值: f64,
    pub 最大结果: &'a 优化结果,
    pub 最小结果: &'a 优化结果,
    pub 平均评估次数: f64,
    pub 平均用时: Duration,
    pub 试验次数: usize,
}

impl<'a> 统计<'a> {
    pub fn 新建<I>(结果列表: I) -> Result<Self, 错误>
    where
        I: IntoIterator<Item = &'a 优化结果>,
    {
        let 结果列表: Vec<&'a 优化结果> = 结果列表.into_iter().collect();
        let (&第一个, 其余) = 结果列表.split_first().ok_or(错误::EmptyBatch)?;
        let n = 结果列表.len() as f64;

        let mut 最大结果 = 第一个;
        let mut 最小结果 = 第一个;
        for &结果 in 其余 {
            if 结果.最优值 > 最大结果.最优值 {
                最大结果 = 结果;
            }
            if 结果.最优值 < 最小结果.最优值 {
                最小结果 = 结果;
            }
        }
        let 平均值 = 结果列表.iter().map(|r| r.最优值).sum::<f64>() / n;
        let 方差 = 结果列表
            .iter()
            .map(|r| (r.最优值 - 平均值).powi(2))
            .sum::<f64>()
            / n;
        let 平均评估次数 = 结果列表.iter().map(|r| r.评估次数 as f64).sum::<f64>() / n;
        let 总用时: Duration = 结果列表.iter().map(|r| r.用时).sum();
        Ok(Self {
            平均值,
            方差,
            标准差: 方差.sqrt(),
            最大值: 最大结果.最优值,
            最小值: 最小结果.最优值,
            最大结果,
            最小结果,
            平均评估次数,
            平均用时: 总用时 / u32::try_from(结果列表.len()).unwrap_or(u32::MAX),
            试验次数: 结果列表.len(),
        })
    }
}

impl Display for 统计<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "试验次数：{}", self.试验次数)?;
        writeln!(f, "平均值：{:.15}", self.平均值)?;
        writeln!(f, "方差：{:.15}", self.方差)?;
        writeln!(f, "标准差：{:.15}", self.标准差)?;
        writeln!(f, "最大值：{:.15}", self.最大值)?;
        writeln!(f, "最小值：{:.15}", self.最小值)?;
        writeln!(f, "平均评估次数：{}", self.平均评估次数)?;
        writeln!(f, "平均用时：{} ms", self.平均用时.as_millis())
    }
}
