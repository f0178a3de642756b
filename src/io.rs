//! 以 CSV 格式导出试验结果，所有实数保留 15 位小数

use crate::optimizers::优化结果;
use crate::statistics::统计;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

fn 实数(值: f64) -> String {
    format!("{值:.15}")
}

fn 毫秒(用时: Duration) -> String {
    实数(用时.as_nanos() as f64 / 1e6)
}

fn 变量表头(维度: usize) -> Vec<String> {
    std::iter::once("No".to_string())
        .chain((0..维度).map(|i| format!("Variable[{i}]")))
        .collect()
}

/// 收敛曲线，行号从 1 开始
pub fn 写入收敛曲线<W: Write>(输出: W, 历史: &[f64]) -> csv::Result<()> {
    let mut writer = Writer::from_writer(输出);
    writer.write_record(["No", "Value"])?;
    for (i, 值) in 历史.iter().enumerate() {
        writer.write_record([(i + 1).to_string(), 实数(*值)])?;
    }
    writer.flush()?;
    Ok(())
}

/// 最优变量，每行一个分量
pub fn 写入最优变量<W: Write>(输出: W, 变量: &[f64]) -> csv::Result<()> {
    let mut writer = Writer::from_writer(输出);
    writer.write_record(["Variable[n]", "Value"])?;
    for (i, 值) in 变量.iter().enumerate() {
        writer.write_record([format!("Variable[{i}]"), 实数(*值)])?;
    }
    writer.flush()?;
    Ok(())
}

/// 每次试验一行，行号为试验序号，从 0 开始
pub fn 写入全部结果<'a, W, I>(输出: W, 结果列表: I) -> csv::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (usize, &'a 优化结果)>,
{
    let mut writer = Writer::from_writer(输出);
    writer.write_record(["No", "Value", "Evals", "Iter", "Time[ms]"])?;
    for (序号, 结果) in 结果列表 {
        writer.write_record([
            序号.to_string(),
            实数(结果.最优值),
            结果.评估次数.to_string(),
            结果.迭代次数.to_string(),
            毫秒(结果.用时),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// 每次试验的最优变量各占一行，行号从 1 开始
pub fn 写入全部变量<'a, W, I>(输出: W, 变量列表: I) -> csv::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut 变量列表 = 变量列表.into_iter().peekable();
    let 维度 = 变量列表.peek().map_or(0, |v| v.len());
    let mut writer = Writer::from_writer(输出);
    writer.write_record(变量表头(维度))?;
    for (i, 变量) in 变量列表.enumerate() {
        let 行 = std::iter::once((i + 1).to_string()).chain(变量.iter().map(|v| 实数(*v)));
        writer.write_record(行)?;
    }
    writer.flush()?;
    Ok(())
}

/// 统计量，每批试验一行，行号从 1 开始
pub fn 写入统计<W: Write>(输出: W, 统计列表: &[统计]) -> csv::Result<()> {
    let mut writer = Writer::from_writer(输出);
    writer.write_record([
        "No", "Mean", "Variance", "StdDev", "Max", "Min", "Evals", "Time[ms]",
    ])?;
    for (i, 汇总) in 统计列表.iter().enumerate() {
        writer.write_record([
            (i + 1).to_string(),
            实数(汇总.平均值),
            实数(汇总.方差),
            实数(汇总.标准差),
            实数(汇总.最大值),
            实数(汇总.最小值),
            实数(汇总.平均评估次数),
            毫秒(汇总.平均用时),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// 把单次试验的收敛曲线和最优变量写入目录
pub fn 保存试验结果(目录: &Path, 结果: &优化结果) -> csv::Result<()> {
    写入收敛曲线(File::create(目录.join("curve.csv"))?, &结果.历史)?;
    写入最优变量(File::create(目录.join("variable.csv"))?, &结果.最优变量)?;
    写入最优变量(
        File::create(目录.join("init_variable.csv"))?,
        &结果.初始最优变量,
    )
}

/// 把一批试验的全部结果、全部最优变量和统计量写入目录
pub fn 保存批量结果<'a, I>(目录: &Path, 结果列表: I, 汇总: &统计) -> csv::Result<()>
where
    I: IntoIterator<Item = (usize, &'a 优化结果)>,
{
    let 结果列表: Vec<_> = 结果列表.into_iter().collect();
    写入全部结果(File::create(目录.join("results.csv"))?, 结果列表.iter().copied())?;
    写入全部变量(
        File::create(目录.join("variables.csv"))?,
        结果列表.iter().map(|(_, r)| r.最优变量.as_slice()),
    )?;
    写入统计(
        File::create(目录.join("statistics.csv"))?,
        std::slice::from_ref(汇总),
    )
}
