//! 和声记忆与即兴创作
//!
//! 和声记忆是固定大小的候选解集合。每一步即兴创作产生一个新和声：以记忆考虑率为概率从记忆中随机挑一个和声，逐个变量以音调调整率为概率在带宽内扰动，其余变量原样复制；否则完全随机地产生一个新和声。新和声只有优于记忆中的最差和声时才会替换它。

use super::parameters::搜索参数;
use crate::objectives::目标函数;
use crate::operators::{均匀生成器, 生成器};
use crate::错误;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 一个候选解，以及它的目标函数值
#[derive(Debug, Clone, PartialEq)]
pub struct 和声 {
    值: f64,
    变量: Vec<f64>,
}

impl 和声 {
    pub fn 新建(值: f64, 变量: Vec<f64>) -> Self {
        Self { 值, 变量 }
    }

    pub fn 值(&self) -> f64 {
        self.值
    }

    pub fn 变量(&self) -> &[f64] {
        &self.变量
    }

    pub fn 拆分(self) -> (f64, Vec<f64>) {
        (self.值, self.变量)
    }
}

pub struct 搜索策略<'a, O: 目标函数 + ?Sized> {
    参数: &'a 搜索参数,
    维度: usize,
    目标函数: &'a O,
    初始生成器: Box<dyn 生成器 + 'a>,
    随机生成器: Box<dyn 生成器 + 'a>,
    记忆: Vec<和声>,
    rng: StdRng,
}

impl<'a, O: 目标函数 + ?Sized> 搜索策略<'a, O> {
    /// 使用默认的均匀生成器初始化和声记忆，共求值 `记忆大小` 次
    pub fn 新建(参数: &'a 搜索参数, 维度: usize, 目标函数: &'a O) -> Result<Self, 错误> {
        Self::构造(
            参数,
            维度,
            目标函数,
            Box::new(均匀生成器::default()),
            Box::new(均匀生成器::default()),
            None,
        )
    }

    /// 使用自定义的初始生成器和随机生成器，并可指定随机数种子
    pub fn 使用生成器新建(
        参数: &'a 搜索参数,
        维度: usize,
        目标函数: &'a O,
        初始生成器: Box<dyn 生成器 + 'a>,
        随机生成器: Box<dyn 生成器 + 'a>,
        种子: Option<u64>,
    ) -> Result<Self, 错误> {
        Self::构造(参数, 维度, 目标函数, 初始生成器, 随机生成器, 种子)
    }

    /// 使用给定的和声记忆，不进行任何求值
    pub fn 从记忆新建(
        参数: &'a 搜索参数,
        维度: usize,
        目标函数: &'a O,
        记忆: Vec<和声>,
        种子: Option<u64>,
    ) -> Result<Self, 错误> {
        检查维度(维度)?;
        if 记忆.len() != 参数.记忆大小() {
            return Err(format!(
                "和声记忆中有 {} 个和声，与记忆大小 {} 不符",
                记忆.len(),
                参数.记忆大小()
            )
            .into());
        }
        for 和声 in &记忆 {
            检查长度(和声.变量(), 维度)?;
        }
        Ok(Self {
            参数,
            维度,
            目标函数,
            初始生成器: Box::new(均匀生成器::default()),
            随机生成器: Box::new(均匀生成器::default()),
            记忆,
            rng: 创建随机数生成器(种子),
        })
    }

    fn 构造(
        参数: &'a 搜索参数,
        维度: usize,
        目标函数: &'a O,
        初始生成器: Box<dyn 生成器 + 'a>,
        随机生成器: Box<dyn 生成器 + 'a>,
        种子: Option<u64>,
    ) -> Result<Self, 错误> {
        检查维度(维度)?;
        let mut 策略 = Self {
            参数,
            维度,
            目标函数,
            初始生成器,
            随机生成器,
            记忆: Vec::with_capacity(参数.记忆大小()),
            rng: 创建随机数生成器(种子),
        };
        for _ in 0..参数.记忆大小() {
            let 变量 = 策略.初始生成器.生成(维度, &mut 策略.rng);
            let 和声 = 策略.求值(变量)?;
            策略.记忆.push(和声);
        }
        Ok(策略)
    }

    pub fn 参数(&self) -> &搜索参数 {
        self.参数
    }

    pub fn 维度(&self) -> usize {
        self.维度
    }

    pub fn 记忆(&self) -> &[和声] {
        &self.记忆
    }

    /// 最优和声的序号，有多个时取第一个
    pub fn 最优序号(&self) -> usize {
        let mut 序号 = 0;
        for (i, 和声) in self.记忆.iter().enumerate().skip(1) {
            if 和声.值 < self.记忆[序号].值 {
                序号 = i;
            }
        }
        序号
    }

    /// 最差和声的序号，有多个时取第一个
    pub fn 最差序号(&self) -> usize {
        let mut 序号 = 0;
        for (i, 和声) in self.记忆.iter().enumerate().skip(1) {
            if 和声.值 > self.记忆[序号].值 {
                序号 = i;
            }
        }
        序号
    }

    pub fn 最优和声(&self) -> &和声 {
        &self.记忆[self.最优序号()]
    }

    /// 随机选择一个记忆中的和声用于音调调整
    pub fn 随机序号(&mut self) -> usize {
        self.rng.random_range(0..self.记忆.len())
    }

    /// 以第 `序号` 个和声为基础，逐个变量按音调调整率在带宽内扰动
    pub fn 生成调整和声(&mut self, 序号: usize) -> Result<和声, 错误> {
        if 序号 >= self.记忆.len() {
            return Err(format!(
                "和声序号 {} 超出记忆大小 {}",
                序号,
                self.记忆.len()
            )
            .into());
        }
        let 带宽 = self.参数.带宽();
        let 音调调整率 = self.参数.音调调整率();
        let rng = &mut self.rng;
        let 变量 = self.记忆[序号]
            .变量
            .iter()
            .map(|&x| {
                if rng.random::<f64>() < 音调调整率 {
                    x + 带宽 * rng.random_range(-1.0..=1.0)
                } else {
                    x
                }
            })
            .collect();
        self.求值(变量)
    }

    /// 完全随机地产生一个和声
    pub fn 生成随机和声(&mut self) -> Result<和声, 错误> {
        let 变量 = self.随机生成器.生成(self.维度, &mut self.rng);
        self.求值(变量)
    }

    /// 一次即兴创作
    pub fn 生成和声(&mut self) -> Result<和声, 错误> {
        if self.rng.random::<f64>() < self.参数.记忆考虑率() {
            let 序号 = self.随机序号();
            self.生成调整和声(序号)
        } else {
            self.生成随机和声()
        }
    }

    /// 若新和声严格优于最差和声则替换之，返回被替换的序号
    pub fn 交换和声(&mut self, 新和声: 和声) -> Option<usize> {
        let 序号 = self.最差序号();
        if 新和声.值 < self.记忆[序号].值 {
            self.记忆[序号] = 新和声;
            Some(序号)
        } else {
            None
        }
    }

    fn 求值(&self, 变量: Vec<f64>) -> Result<和声, 错误> {
        检查长度(&变量, self.维度)?;
        let 值 = self.目标函数.计算(&变量).map_err(错误::Objective)?;
        Ok(和声 { 值, 变量 })
    }
}

fn 检查维度(维度: usize) -> Result<(), 错误> {
    if 维度 == 0 {
        return Err("维度不能为 0".into());
    }
    Ok(())
}

fn 检查长度(变量: &[f64], 维度: usize) -> Result<(), 错误> {
    if 变量.len() != 维度 {
        return Err(format!("生成了 {} 个变量，与维度 {} 不符", 变量.len(), 维度).into());
    }
    Ok(())
}

fn 创建随机数生成器(种子: Option<u64>) -> StdRng {
    match 种子 {
        Some(种子) => StdRng::seed_from_u64(种子),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objectives::benchmarks::球函数;
    use crate::objectives::可失败;
    use rand::RngCore;

    fn 固定记忆() -> Vec<和声> {
        [
            (0.7, [1.2, -2.4, -1.3]),
            (7.1, [1.8, -1.6, 0.1]),
            (1.6, [1.0, 1.4, 0.4]),
            (2.4, [-2.4, -1.3, 0.2]),
            (0.9, [-2.0, -0.7, -1.1]),
            (0.5, [-1.6, 1.2, 0.9]),
            (6.6, [2.2, 0.8, 0.3]),
            (3.6, [2.3, 2.0, 0.9]),
            (4.4, [-0.1, -1.8, 1.0]),
            (5.9, [0.4, -0.7, 1.0]),
        ]
        .into_iter()
        .map(|(值, 变量)| 和声::新建(值, 变量.to_vec()))
        .collect()
    }

    fn 参数() -> 搜索参数 {
        搜索参数::构建().最大评估次数(3000).构建().unwrap()
    }

    #[test]
    fn test_detect_best_and_worst() {
        let 参数 = 参数();
        let 策略 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), Some(0)).unwrap();
        assert_eq!(策略.最优序号(), 5);
        assert_eq!(策略.最差序号(), 1);
        assert_eq!(策略.最优和声().值(), 0.5);
    }

    #[test]
    fn test_ties_resolve_to_first() {
        let 参数 = 搜索参数::构建().记忆大小(5).构建().unwrap();
        let 记忆 = [2.0, 1.0, 3.0, 1.0, 3.0]
            .iter()
            .map(|&v| 和声::新建(v, vec![0.0]))
            .collect();
        let 策略 = 搜索策略::从记忆新建(&参数, 1, &球函数, 记忆, None).unwrap();
        assert_eq!(策略.最优序号(), 1);
        assert_eq!(策略.最差序号(), 2);
    }

    #[test]
    fn test_trade_replaces_only_better() {
        let 参数 = 参数();
        let mut 策略 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), Some(0)).unwrap();

        let 原最差值 = 策略.记忆()[策略.最差序号()].值();
        let 结果 = 策略.交换和声(和声::新建(9.4, vec![0.3, -2.4, 1.9]));
        assert_eq!(结果, None);
        assert_eq!(策略.记忆()[策略.最差序号()].值(), 原最差值);
        assert_eq!(策略.记忆(), 固定记忆().as_slice());

        let 结果 = 策略.交换和声(和声::新建(0.2, vec![0.4, -0.7, 1.0]));
        assert_eq!(结果, Some(1));
        assert_eq!(策略.记忆()[1].值(), 0.2);
        assert_ne!(策略.记忆()[策略.最差序号()].值(), 原最差值);
        assert_eq!(策略.记忆()[策略.最差序号()].值(), 6.6);
        assert_eq!(策略.记忆().len(), 10);
    }

    #[test]
    fn test_equal_value_is_not_traded() {
        let 参数 = 参数();
        let mut 策略 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), Some(0)).unwrap();
        assert_eq!(策略.交换和声(和声::新建(7.1, vec![0.0; 3])), None);
    }

    #[test]
    fn test_initialization_evaluates_each_harmony() {
        let 参数 = 参数();
        let 策略 = 搜索策略::新建(&参数, 4, &球函数).unwrap();
        assert_eq!(策略.记忆().len(), 10);
        for 和声 in 策略.记忆() {
            assert_eq!(和声.变量().len(), 4);
            assert!(和声.变量().iter().all(|v| (-3.0..=3.0).contains(v)));
            assert_eq!(和声.值(), 球函数(和声.变量()));
        }
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let 参数 = 参数();
        let 结果 = 搜索策略::新建(&参数, 0, &球函数);
        assert!(matches!(结果, Err(错误::InvalidConfiguration(_))));
    }

    #[test]
    fn test_memory_size_mismatch_is_rejected() {
        let 参数 = 搜索参数::构建().记忆大小(5).构建().unwrap();
        let 结果 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), None);
        assert!(matches!(结果, Err(错误::InvalidConfiguration(_))));
    }

    #[test]
    fn test_generator_with_wrong_length_is_rejected() {
        let 参数 = 参数();
        let 短 = |_: usize, _: &mut dyn RngCore| vec![0.0; 2];
        let 结果 = 搜索策略::使用生成器新建(
            &参数,
            3,
            &球函数,
            Box::new(短),
            Box::new(均匀生成器::default()),
            None,
        );
        assert!(matches!(结果, Err(错误::InvalidConfiguration(_))));
    }

    #[test]
    fn test_tuning_without_adjustment_copies() {
        let 参数 = 搜索参数::构建().音调调整率(0.0).构建().unwrap();
        let mut 策略 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), Some(3)).unwrap();
        let 新和声 = 策略.生成调整和声(2).unwrap();
        assert_eq!(新和声.变量(), 固定记忆()[2].变量());
        assert_eq!(新和声.值(), 球函数(&[1.0, 1.4, 0.4]));
    }

    #[test]
    fn test_tuning_index_out_of_range() {
        let 参数 = 参数();
        let mut 策略 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), Some(3)).unwrap();
        for 序号 in [10, usize::MAX] {
            assert!(matches!(
                策略.生成调整和声(序号),
                Err(错误::InvalidConfiguration(_))
            ));
        }
        assert_eq!(策略.记忆(), 固定记忆().as_slice());
    }

    #[test]
    fn test_tuning_stays_within_bandwidth() {
        let 参数 = 搜索参数::构建().音调调整率(1.0).带宽(0.1).构建().unwrap();
        let mut 策略 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), Some(11)).unwrap();
        for _ in 0..100 {
            let 新和声 = 策略.生成调整和声(7).unwrap();
            for (新, 旧) in 新和声.变量().iter().zip(固定记忆()[7].变量()) {
                assert!((新 - 旧).abs() <= 0.1 + 1e-12);
            }
        }
    }

    #[test]
    fn test_zero_consideration_uses_random_generator() {
        let 参数 = 搜索参数::构建().记忆考虑率(0.0).构建().unwrap();
        let 初始 = |维度: usize, _: &mut dyn RngCore| vec![1.0; 维度];
        let 随机 = |维度: usize, _: &mut dyn RngCore| vec![2.0; 维度];
        let mut 策略 = 搜索策略::使用生成器新建(
            &参数,
            2,
            &球函数,
            Box::new(初始),
            Box::new(随机),
            Some(5),
        )
        .unwrap();
        assert!(策略.记忆().iter().all(|h| h.变量() == [1.0, 1.0]));
        let 新和声 = 策略.生成和声().unwrap();
        assert_eq!(新和声.变量(), [2.0, 2.0]);
        assert_eq!(新和声.值(), 8.0);
    }

    #[test]
    fn test_full_consideration_draws_from_memory() {
        let 参数 = 搜索参数::构建().记忆考虑率(1.0).音调调整率(0.0).构建().unwrap();
        let mut 策略 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), Some(9)).unwrap();
        for _ in 0..50 {
            let 新和声 = 策略.生成和声().unwrap();
            assert!(固定记忆().iter().any(|h| h.变量() == 新和声.变量()));
        }
    }

    #[test]
    fn test_random_index_in_range() {
        let 参数 = 参数();
        let mut 策略 = 搜索策略::从记忆新建(&参数, 3, &球函数, 固定记忆(), Some(1)).unwrap();
        for _ in 0..1000 {
            assert!(策略.随机序号() < 10);
        }
    }

    #[test]
    fn test_seeded_strategies_agree() {
        let 参数 = 参数();
        let mut 甲 = 搜索策略::使用生成器新建(
            &参数,
            4,
            &球函数,
            Box::new(均匀生成器::default()),
            Box::new(均匀生成器::default()),
            Some(42),
        )
        .unwrap();
        let mut 乙 = 搜索策略::使用生成器新建(
            &参数,
            4,
            &球函数,
            Box::new(均匀生成器::default()),
            Box::new(均匀生成器::default()),
            Some(42),
        )
        .unwrap();
        assert_eq!(甲.记忆(), 乙.记忆());
        for _ in 0..20 {
            assert_eq!(甲.生成和声().unwrap(), 乙.生成和声().unwrap());
        }
    }

    #[test]
    fn test_objective_failure_propagates() {
        let 参数 = 参数();
        let 总是失败 = 可失败(|_: &[f64]| Err::<f64, _>("滤波器不稳定"));
        let 结果 = 搜索策略::新建(&参数, 2, &总是失败);
        match 结果 {
            Err(错误::Objective(e)) => assert_eq!(e.to_string(), "滤波器不稳定"),
            _ => panic!("应当返回目标函数的错误"),
        }
    }
}
