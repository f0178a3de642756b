use criterion::{criterion_group, criterion_main, Criterion};
use harmony::objectives::benchmarks::{拉斯特里金函数, 球函数};
use harmony::optimizers::harmony_search::和声搜索;
use harmony::optimizers::parameters::搜索参数;
use harmony::optimizers::strategy::搜索策略;
use harmony::thread_pool::线程池;
use harmony::错误;
use std::hint::black_box;

fn 即兴创作(
    名称: &str,
    维度: usize,
    目标函数: fn(&[f64]) -> f64,
    b: &mut Criterion,
) -> Result<(), 错误> {
    let 参数 = 搜索参数::构建().记忆大小(30).构建()?;
    let mut 策略 = 搜索策略::新建(&参数, 维度, &目标函数)?;
    b.bench_function(名称, |b| {
        b.iter(|| {
            if let Ok(新和声) = 策略.生成和声() {
                black_box(策略.交换和声(新和声));
            }
        })
    });
    Ok(())
}

fn 球函数十维(b: &mut Criterion) {
    即兴创作("球函数十维", 10, 球函数, b).unwrap();
}

fn 拉斯特里金百维(b: &mut Criterion) {
    即兴创作("拉斯特里金百维", 100, 拉斯特里金函数, b).unwrap();
}

fn 完整试验(b: &mut Criterion) {
    let 参数 = 搜索参数::构建().最大评估次数(10_000).构建().unwrap();
    let 优化器 = 和声搜索::新建(参数).种子(0);
    b.bench_function("完整试验", |b| {
        b.iter(|| black_box(优化器.优化(10, &球函数).unwrap().最优值))
    });
}

fn 线程池调度(b: &mut Criterion) {
    let 池 = 线程池::新建(4).unwrap();
    b.bench_function("线程池调度", |b| {
        b.iter(|| {
            for i in 0..256 {
                池.提交(move || {
                    black_box(i * 2);
                })
                .unwrap();
            }
            池.等待全部();
        })
    });
}

criterion_group!(benches, 球函数十维, 拉斯特里金百维, 完整试验, 线程池调度);
criterion_main!(benches);
