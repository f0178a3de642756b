//! 固定大小的线程池
//!
//! 所有工作线程共享一个先进先出的任务队列。任务队列和每个线程的忙碌标记由同一把锁保护，工作线程完成任务后若发现队列为空且没有线程忙碌，就唤醒等待者；`等待全部` 在同一把锁下检查这一条件，因此不会错过唤醒。

use crate::错误;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

type 任务 = Box<dyn FnOnce() + Send + 'static>;

struct 队列状态 {
    队列: VecDeque<任务>,
    忙碌: Vec<bool>,
    /// 上一次 `等待全部` 之后是否提交过任务
    活跃: bool,
    停止: bool,
}

impl 队列状态 {
    fn 已完成(&self) -> bool {
        self.队列.is_empty() && self.忙碌.iter().all(|忙碌| !忙碌)
    }
}

struct 共享状态 {
    状态: Mutex<队列状态>,
    /// 有新任务或线程池停止时通知工作线程
    任务信号: Condvar,
    /// 队列清空且所有线程空闲时通知等待者
    完成信号: Condvar,
}

impl 共享状态 {
    fn 新建(线程数: usize) -> Self {
        Self {
            状态: Mutex::new(队列状态 {
                队列: VecDeque::new(),
                忙碌: vec![false; 线程数],
                活跃: false,
                停止: false,
            }),
            任务信号: Condvar::new(),
            完成信号: Condvar::new(),
        }
    }

    fn 加锁(&self) -> MutexGuard<'_, 队列状态> {
        self.状态.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct 线程池 {
    共享: Arc<共享状态>,
    工作线程: Mutex<Vec<JoinHandle<()>>>,
    线程数: usize,
}

/// 留一个核心给提交任务的线程
pub fn 默认线程数() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

impl 线程池 {
    pub fn 新建(线程数: usize) -> Result<Self, 错误> {
        if 线程数 == 0 {
            return Err("线程数不能为 0".into());
        }
        let 共享 = Arc::new(共享状态::新建(线程数));
        let mut 工作线程 = Vec::with_capacity(线程数);
        for 编号 in 0..线程数 {
            let 工作共享 = Arc::clone(&共享);
            let 句柄 = match thread::Builder::new()
                .name(format!("harmony-worker-{编号}"))
                .spawn(move || 工作循环(工作共享, 编号))
            {
                Ok(句柄) => 句柄,
                Err(e) => {
                    停止并回收(&共享, 工作线程);
                    return Err(format!("无法创建工作线程：{e}").into());
                }
            };
            工作线程.push(句柄);
        }
        debug!("线程池已启动，共 {} 个工作线程", 线程数);
        Ok(Self {
            共享,
            工作线程: Mutex::new(工作线程),
            线程数,
        })
    }

    pub fn 线程数(&self) -> usize {
        self.线程数
    }

    /// 提交一个任务，不阻塞调用者；任务中的 panic 会被捕获并记录
    pub fn 提交<F>(&self, 任务: F) -> Result<(), 错误>
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut 状态 = self.共享.加锁();
            if 状态.停止 {
                return Err(错误::PoolStopped);
            }
            状态.队列.push_back(Box::new(任务));
            状态.活跃 = true;
        }
        self.共享.任务信号.notify_one();
        Ok(())
    }

    /// 提交一个有返回值的任务，返回可以等待结果的句柄
    pub fn 提交并获取结果<T, F>(&self, 函数: F) -> Result<任务句柄<T>, 错误>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (发送端, 接收端) = mpsc::channel();
        self.提交(move || {
            let 结果 = catch_unwind(AssertUnwindSafe(函数)).map_err(描述崩溃);
            // 调用者可能已经丢弃了句柄
            let _ = 发送端.send(结果);
        })?;
        Ok(任务句柄 { 接收端 })
    }

    /// 阻塞直到队列为空且没有线程在执行任务
    ///
    /// 若上一次等待之后没有提交过任务，立即返回。不能在线程池自己的任务中调用。
    pub fn 等待全部(&self) {
        let mut 状态 = self.共享.加锁();
        if !状态.活跃 {
            return;
        }
        while !状态.已完成() {
            状态 = self
                .共享
                .完成信号
                .wait(状态)
                .unwrap_or_else(PoisonError::into_inner);
        }
        状态.活跃 = false;
    }

    /// 把集合分成与线程数相同的若干连续块，每块作为一个任务串行处理，全部完成后返回
    pub fn 并行遍历<T, F>(&self, 集合: Vec<T>, 函数: F) -> Result<(), 错误>
    where
        T: Send + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        if 集合.is_empty() {
            return Ok(());
        }
        let 函数 = Arc::new(函数);
        for 块 in 连续分块(集合, self.线程数) {
            let 函数 = Arc::clone(&函数);
            self.提交(move || 块.into_iter().for_each(|x| 函数(x)))?;
        }
        self.等待全部();
        Ok(())
    }

    /// 停止接受新任务，等待已排队的任务全部执行完毕后回收所有工作线程
    ///
    /// 不能在线程池自己的任务中调用。
    pub fn 关闭(&self) {
        let 句柄列表: Vec<_> = self
            .工作线程
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        let 有线程 = !句柄列表.is_empty();
        停止并回收(&self.共享, 句柄列表);
        if 有线程 {
            debug!("线程池已关闭");
        }
    }

    pub fn 已关闭(&self) -> bool {
        self.共享.加锁().停止
    }
}

impl Drop for 线程池 {
    fn drop(&mut self) {
        self.关闭();
    }
}

/// 设置停止标记并唤醒所有工作线程，等它们处理完队列后退出
fn 停止并回收(共享: &共享状态, 句柄列表: Vec<JoinHandle<()>>) {
    共享.加锁().停止 = true;
    共享.任务信号.notify_all();
    for 句柄 in 句柄列表 {
        if 句柄.join().is_err() {
            warn!("工作线程异常退出");
        }
    }
}

fn 工作循环(共享: Arc<共享状态>, 编号: usize) {
    loop {
        let 任务 = {
            let mut 状态 = 共享.加锁();
            loop {
                if let Some(任务) = 状态.队列.pop_front() {
                    状态.忙碌[编号] = true;
                    break 任务;
                }
                if 状态.停止 {
                    return;
                }
                状态 = 共享
                    .任务信号
                    .wait(状态)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        if let Err(payload) = catch_unwind(AssertUnwindSafe(任务)) {
            warn!("第 {} 号工作线程的任务崩溃：{}", 编号, 描述崩溃(payload));
        }
        let mut 状态 = 共享.加锁();
        状态.忙碌[编号] = false;
        if 状态.已完成() {
            共享.完成信号.notify_all();
        }
    }
}

fn 描述崩溃(payload: Box<dyn Any + Send>) -> String {
    if let Some(消息) = payload.downcast_ref::<&str>() {
        消息.to_string()
    } else if let Some(消息) = payload.downcast_ref::<String>() {
        消息.clone()
    } else {
        "未知错误".to_string()
    }
}

/// 把集合切成至多 `块数` 个连续块，各块大小相差不超过一
fn 连续分块<T>(集合: Vec<T>, 块数: usize) -> Vec<Vec<T>> {
    let 块数 = 块数.min(集合.len()).max(1);
    let 基本大小 = 集合.len() / 块数;
    let 余数 = 集合.len() % 块数;
    let mut 迭代器 = 集合.into_iter();
    (0..块数)
        .map(|i| {
            let 大小 = 基本大小 + usize::from(i < 余数);
            迭代器.by_ref().take(大小).collect()
        })
        .collect()
}

/// 等待 `提交并获取结果` 所提交任务的句柄
pub struct 任务句柄<T> {
    接收端: Receiver<Result<T, String>>,
}

impl<T> 任务句柄<T> {
    /// 阻塞直到任务完成；任务崩溃时返回 `TaskPanicked`
    pub fn 等待(self) -> Result<T, 错误> {
        match self.接收端.recv() {
            Ok(Ok(值)) => Ok(值),
            Ok(Err(消息)) => Err(错误::TaskPanicked(消息)),
            Err(_) => Err(错误::PoolStopped),
        }
    }
}
