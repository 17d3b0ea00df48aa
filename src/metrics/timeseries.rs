//day-over-day differences of an additive curve
pub fn period_changes(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return vec![];
    }

    values.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

//largest peak-to-trough fall, in the curve's own units
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0f64;

    for &value in values {
        if value > peak {
            peak = value;
        }
        worst = worst.max(peak - value);
    }

    worst
}
