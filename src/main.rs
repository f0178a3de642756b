//! harmony: 和声搜索优化［命令行版］
//!
//! `harmony` 是一个使用 Rust 编写的命令行程序。用户提供参数配置文件，本程序能够对基准函数执行一次和声搜索，或者并行执行多次独立试验并统计结果。

use clap::Parser;
use harmony::interfaces::command_line::{命令, 命令行, 命令行参数};
use harmony::interfaces::报告钩子;
use harmony::optimizers::harmony_search::和声搜索;
use harmony::thread_pool::{线程池, 默认线程数};
use harmony::trials::带钩子批量优化;
use std::error::Error;
use std::sync::Arc;
use tracing::info;

const 默认试验次数: usize = 10;
const 默认更新频率: usize = 100_000;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let 参数 = 命令行参数::parse();
    let 命令行 = 命令行::新建(参数.clone(), 参数.output.clone())?;
    let 配置 = 命令行.读取配置()?;
    let 搜索参数 = 配置.搜索参数()?;
    let 目标函数 = 配置.problem.目标函数()?;
    let 维度 = 配置.problem.dimension;
    let 生成器 = 配置.problem.生成器()?;
    let 批量 = 配置.批量();
    let 更新频率 = 配置.update_interval.unwrap_or(默认更新频率);
    info!(
        "问题：{}，维度 {}，输出目录 {}",
        配置.problem.function,
        维度,
        命令行.输出目录.display()
    );

    match 参数.command {
        命令::Optimize => {
            let mut 优化器 = 和声搜索::新建(搜索参数).生成器(生成器);
            if let Some(种子) = 批量.seed {
                优化器 = 优化器.种子(种子);
            }
            let mut 钩子 = 报告钩子::新建(命令行.clone(), 更新频率);
            let 结果 = 优化器.带钩子优化(维度, &目标函数, &mut 钩子)?;
            命令行.输出试验结果(&结果)?;
        }
        命令::Batch => {
            let 试验次数 = 批量.trials.unwrap_or(默认试验次数);
            let 线程池 = 线程池::新建(批量.threads.unwrap_or_else(默认线程数))?;
            let 子命令行列表 = (0..试验次数)
                .map(|序号| 命令行.生成子命令行(序号))
                .collect::<std::io::Result<Vec<_>>>()?;
            let 批量结果 = 带钩子批量优化(
                &线程池,
                试验次数,
                |序号| {
                    let mut 优化器 = 和声搜索::新建(搜索参数).生成器(生成器);
                    if let Some(种子) = 批量.seed {
                        优化器 = 优化器.种子(种子.wrapping_add(序号 as u64));
                    }
                    let 钩子 = 报告钩子::新建(子命令行列表[序号].clone(), 更新频率);
                    (优化器, 钩子)
                },
                Arc::new(目标函数),
                维度,
            )?;
            for (序号, 错误) in 批量结果.失败() {
                eprintln!("第 {序号} 次试验失败：{错误}");
            }
            for (序号, 结果) in 批量结果.成功() {
                子命令行列表[序号].输出试验结果(结果)?;
            }
            let 汇总 = 批量结果.统计()?;
            命令行.输出批量结果(批量结果.成功(), &汇总)?;
        }
    }
    Ok(())
}
