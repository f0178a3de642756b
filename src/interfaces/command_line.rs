use crate::config::配置;
use crate::interfaces::{消息, 界面};
use crate::io::{保存批量结果, 保存试验结果};
use crate::optimizers::优化结果;
use crate::statistics::统计;
use crate::错误;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs::{create_dir_all, read_to_string, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// 命令行参数的定义
#[derive(Parser, Clone, Debug)]
#[command(name = "和声搜索")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct 命令行参数 {
    #[command(subcommand)]
    pub command: 命令,
    /// 配置文件，默认为 config.yaml
    pub config: Option<PathBuf>,
    /// 批量试验的次数，覆盖配置文件中的值
    #[arg(short = 'n', long)]
    pub trials: Option<usize>,
    /// 线程数，覆盖配置文件中的值
    #[arg(short, long)]
    pub threads: Option<usize>,
    /// 随机数种子，批量试验中第 i 次试验使用 seed + i
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// 输出目录，默认为 output- 加上当前时间
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// 命令行中所有可用的子命令
#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum 命令 {
    /// 对配置文件中的问题执行一次和声搜索
    Optimize,
    /// 并行执行多次独立试验并统计结果
    Batch,
}

/// 通过命令行来使用 libharmony 的入口，实现了界面特征
#[derive(Clone, Debug)]
pub struct 命令行 {
    pub 参数: 命令行参数,
    pub 输出目录: PathBuf,
    写入日志: bool,
}

impl 命令行 {
    pub fn 新建(参数: 命令行参数, 输出目录: Option<PathBuf>) -> std::io::Result<Self> {
        let 输出目录 = 输出目录.unwrap_or_else(|| {
            let time = Local::now().format("%m-%d+%H_%M_%S").to_string();
            PathBuf::from(format!("output-{time}"))
        });
        create_dir_all(&输出目录)?;
        Ok(Self {
            参数,
            输出目录,
            写入日志: false,
        })
    }

    /// 每次试验使用单独的子目录，消息写入其中的 log.txt
    pub fn 生成子命令行(&self, 序号: usize) -> std::io::Result<命令行> {
        let mut 子命令行 =
            命令行::新建(self.参数.clone(), Some(self.输出目录.join(format!("{序号}"))))?;
        子命令行.写入日志 = true;
        Ok(子命令行)
    }

    /// 读取配置文件，并用命令行中给出的批量参数覆盖文件中的值
    pub fn 读取配置(&self) -> Result<配置, 错误> {
        let 路径 = self
            .参数
            .config
            .clone()
            .unwrap_or(PathBuf::from("config.yaml"));
        let 内容 = read_to_string(&路径).map_err(|e| {
            错误::InvalidConfiguration(format!("无法读取文件 {}：{e}", 路径.display()))
        })?;
        let mut 配置 = 配置::解析(&内容)?;
        let mut 批量 = 配置.批量();
        批量.trials = self.参数.trials.or(批量.trials);
        批量.threads = self.参数.threads.or(批量.threads);
        批量.seed = self.参数.seed.or(批量.seed);
        配置.batch = Some(批量);
        Ok(配置)
    }

    pub fn 输出试验结果(&self, 结果: &优化结果) -> csv::Result<()> {
        保存试验结果(&self.输出目录, 结果)?;
        println!(
            "优化完成，最优值为 {:.15}，共求值 {} 次，用时 {} ms",
            结果.最优值,
            结果.评估次数,
            结果.用时.as_millis()
        );
        println!("收敛曲线和最优变量保存在 {} 中", self.输出目录.display());
        Ok(())
    }

    pub fn 输出批量结果<'a, I>(&self, 结果列表: I, 汇总: &统计) -> csv::Result<()>
    where
        I: IntoIterator<Item = (usize, &'a 优化结果)>,
    {
        保存批量结果(&self.输出目录, 结果列表, 汇总)?;
        print!("{汇总}");
        println!("全部结果和统计量保存在 {} 中", self.输出目录.display());
        Ok(())
    }

    fn 写入(&self, 消息: 消息, writer: &mut dyn Write) -> std::io::Result<()> {
        match 消息 {
            消息::Progress { steps, value } => {
                writeln!(writer, "已执行 {steps} 步，当前最优值为 {value:.6e}")
            }
            消息::BetterSolution {
                steps,
                value,
                variables,
            } => {
                let 时刻 = Local::now().format("%H:%M:%S");
                match variables {
                    Some(variables) => writeln!(
                        writer,
                        "{时刻} 初始化完成，最优值为 {value:.6e}，变量为 {variables:?}"
                    ),
                    None => writeln!(writer, "{时刻} 第 {steps} 步找到更好的解：{value:.6e}"),
                }
            }
            消息::Elapsed { time } => writeln!(writer, "计算一次目标函数用时：{time} μs"),
            消息::Finished {
                value,
                evaluations,
                elapsed_ms,
            } => writeln!(
                writer,
                "搜索结束，最优值为 {value:.15}，求值 {evaluations} 次，用时 {elapsed_ms} ms"
            ),
        }
    }
}

impl 界面 for 命令行 {
    fn 发送(&self, 消息: 消息) {
        let 结果 = if self.写入日志 {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.输出目录.join("log.txt"))
                .and_then(|mut file| self.写入(消息, &mut file))
        } else {
            self.写入(消息, &mut std::io::stdout().lock())
        };
        if let Err(e) = 结果 {
            warn!("无法输出消息：{e}");
        }
    }
}
