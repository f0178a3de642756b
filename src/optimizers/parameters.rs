//! 和声搜索的参数，以及用于构造参数的构建器

use crate::错误;

/// 和声搜索的参数
///
/// 只能通过 [`搜索参数构建器`] 构造，构造完成后不可修改。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct 搜索参数 {
    记忆大小: usize,
    最大评估次数: usize,
    带宽: f64,
    记忆考虑率: f64,
    音调调整率: f64,
}

impl Default for 搜索参数 {
    fn default() -> Self {
        Self {
            记忆大小: 10,
            最大评估次数: 9_999_990,
            带宽: 0.1,
            记忆考虑率: 0.9,
            音调调整率: 0.1,
        }
    }
}

impl 搜索参数 {
    /// 从默认参数开始构建
    pub fn 构建() -> 搜索参数构建器 {
        搜索参数构建器 {
            参数: 搜索参数::default(),
        }
    }

    /// 和声记忆中和声的个数
    pub fn 记忆大小(&self) -> usize {
        self.记忆大小
    }

    /// 搜索循环的迭代次数，每次迭代求值一次目标函数
    pub fn 最大评估次数(&self) -> usize {
        self.最大评估次数
    }

    pub fn 带宽(&self) -> f64 {
        self.带宽
    }

    /// 以记忆中的和声为基础产生新和声的概率
    pub fn 记忆考虑率(&self) -> f64 {
        self.记忆考虑率
    }

    /// 对每个变量进行音调调整的概率
    pub fn 音调调整率(&self) -> f64 {
        self.音调调整率
    }
}

#[derive(Debug, Clone)]
pub struct 搜索参数构建器 {
    参数: 搜索参数,
}

impl 搜索参数构建器 {
    pub fn 记忆大小(mut self, 记忆大小: usize) -> Self {
        self.参数.记忆大小 = 记忆大小;
        self
    }

    pub fn 最大评估次数(mut self, 最大评估次数: usize) -> Self {
        self.参数.最大评估次数 = 最大评估次数;
        self
    }

    pub fn 带宽(mut self, 带宽: f64) -> Self {
        self.参数.带宽 = 带宽;
        self
    }

    pub fn 记忆考虑率(mut self, 记忆考虑率: f64) -> Self {
        self.参数.记忆考虑率 = 记忆考虑率;
        self
    }

    pub fn 音调调整率(mut self, 音调调整率: f64) -> Self {
        self.参数.音调调整率 = 音调调整率;
        self
    }

    /// 检查参数并生成不可变的搜索参数
    pub fn 构建(self) -> Result<搜索参数, 错误> {
        let 参数 = self.参数;
        if 参数.记忆大小 == 0 {
            return Err("记忆大小不能为 0".into());
        }
        if 参数.最大评估次数 < 参数.记忆大小 {
            return Err(format!(
                "最大评估次数 {} 小于记忆大小 {}",
                参数.最大评估次数, 参数.记忆大小
            )
            .into());
        }
        if !(参数.带宽.is_finite() && 参数.带宽 > 0.0) {
            return Err(format!("带宽必须为正数，当前为 {}", 参数.带宽).into());
        }
        for (名称, 比率) in [
            ("记忆考虑率", 参数.记忆考虑率),
            ("音调调整率", 参数.音调调整率),
        ] {
            if !(0.0..=1.0).contains(&比率) {
                return Err(format!("{名称}必须位于 [0, 1] 之间，当前为 {比率}").into());
            }
        }
        Ok(参数)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let 参数 = 搜索参数::构建().构建().unwrap();
        assert_eq!(参数.记忆大小(), 10);
        assert_eq!(参数.最大评估次数(), 9_999_990);
        assert_eq!(参数.带宽(), 0.1);
        assert_eq!(参数.记忆考虑率(), 0.9);
        assert_eq!(参数.音调调整率(), 0.1);
    }

    #[test]
    fn test_fluent_setters() {
        let 参数 = 搜索参数::构建()
            .记忆大小(30)
            .最大评估次数(3000)
            .带宽(0.05)
            .记忆考虑率(0.7)
            .音调调整率(0.3)
            .构建()
            .unwrap();
        assert_eq!(参数.记忆大小(), 30);
        assert_eq!(参数.最大评估次数(), 3000);
        assert_eq!(参数.带宽(), 0.05);
        assert_eq!(参数.记忆考虑率(), 0.7);
        assert_eq!(参数.音调调整率(), 0.3);
    }

    #[test]
    fn test_invalid_parameters() {
        let 无效 = [
            搜索参数::构建().记忆大小(0),
            搜索参数::构建().记忆大小(20).最大评估次数(10),
            搜索参数::构建().带宽(0.0),
            搜索参数::构建().带宽(f64::INFINITY),
            搜索参数::构建().记忆考虑率(1.5),
            搜索参数::构建().音调调整率(-0.1),
            搜索参数::构建().音调调整率(f64::NAN),
        ];
        for 构建器 in 无效 {
            let 结果 = 构建器.构建();
            assert!(matches!(结果, Err(错误::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_boundary_ratios_are_valid() {
        assert!(搜索参数::构建().记忆考虑率(0.0).音调调整率(1.0).构建().is_ok());
        assert!(搜索参数::构建().记忆考虑率(1.0).音调调整率(0.0).构建().is_ok());
    }
}
