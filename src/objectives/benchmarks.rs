//! 常用的连续优化基准函数，全局最小值均为 0

use std::f64::consts::{E, PI};

/// 球函数，最小值位于原点
pub fn 球函数(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

/// Rastrigin 函数，最小值位于原点
pub fn 拉斯特里金函数(x: &[f64]) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|v| v * v - 10.0 * (2.0 * PI * v).cos())
            .sum::<f64>()
}

/// Rosenbrock 函数，最小值位于 (1, 1, ..., 1)
pub fn 罗森布罗克函数(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Ackley 函数，最小值位于原点
pub fn 阿克利函数(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let 平方均值 = x.iter().map(|v| v * v).sum::<f64>() / n;
    let 余弦均值 = x.iter().map(|v| (2.0 * PI * v).cos()).sum::<f64>() / n;
    -20.0 * (-0.2 * 平方均值.sqrt()).exp() - 余弦均值.exp() + 20.0 + E
}

/// 按名称查找基准函数，供命令行与配置文件使用
pub fn 按名称查找(名称: &str) -> Option<fn(&[f64]) -> f64> {
    match 名称 {
        "sphere" => Some(球函数),
        "rastrigin" => Some(拉斯特里金函数),
        "rosenbrock" => Some(罗森布罗克函数),
        "ackley" => Some(阿克利函数),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_is_zero() {
        assert_eq!(球函数(&[0.0; 5]), 0.0);
        assert!(拉斯特里金函数(&[0.0; 5]).abs() < 1e-12);
        assert_eq!(罗森布罗克函数(&[1.0; 5]), 0.0);
        assert!(阿克利函数(&[0.0; 5]).abs() < 1e-12);
    }

    #[test]
    fn test_away_from_minimum_is_positive() {
        let x = [0.5, -1.5, 2.0];
        assert!(球函数(&x) > 0.0);
        assert!(拉斯特里金函数(&x) > 0.0);
        assert!(罗森布罗克函数(&x) > 0.0);
        assert!(阿克利函数(&x) > 0.0);
    }

    #[test]
    fn test_lookup_by_name() {
        let 函数 = 按名称查找("sphere").unwrap();
        assert_eq!(函数(&[3.0, 4.0]), 25.0);
        assert!(按名称查找("griewank").is_none());
    }
}
