pub fn approx_eq_f64(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9
}

/// 均值与样本标准差（n - 1）。少于两个样本时无定义。
pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>()
        / (count - 1.0);
    Some((mean, variance.sqrt()))
}
