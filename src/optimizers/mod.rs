//! 优化方法的结果与钩子接口，以及和声搜索的实现
//!

pub mod harmony_search;
pub mod parameters;
pub mod strategy;

use crate::objectives::目标函数;
use std::time::Duration;
use strategy::搜索策略;

/// 一次试验的结果，构造后只读
#[derive(Debug, Clone, PartialEq)]
pub struct 优化结果 {
    pub 最优值: f64,
    pub 最优变量: Vec<f64>,
    /// 初始化完成时和声记忆中的最优值
    pub 初始最优值: f64,
    pub 初始最优变量: Vec<f64>,
    /// 收敛曲线，每次迭代后记录一次当前最优值
    pub 历史: Vec<f64>,
    /// 目标函数的求值次数，包括初始化和声记忆的部分
    pub 评估次数: usize,
    pub 迭代次数: usize,
    pub 用时: Duration,
}

/// 在优化循环中插入自定义逻辑，默认全部为空操作
///
/// 钩子只能读取搜索策略，不能修改和声记忆，因此不会改变搜索循环本身的行为。
pub trait 钩子 {
    fn 初始化<O: 目标函数 + ?Sized>(&mut self, _策略: &搜索策略<O>) {}
    fn 迭代前<O: 目标函数 + ?Sized>(&mut self, _步骤: usize, _策略: &搜索策略<O>) {}
    fn 迭代后<O: 目标函数 + ?Sized>(&mut self, _步骤: usize, _策略: &搜索策略<O>) {}
    fn 结束(&mut self, _结果: &优化结果) {}
}

/// 不做任何事的钩子
#[derive(Debug, Clone, Copy, Default)]
pub struct 无钩子;

impl 钩子 for 无钩子 {}
