//! Last-value indicator math. Every function returns `None` when the
//! input is shorter than the indicator's window; callers report that as
//! "not enough data" rather than an error.

/// Simple Moving Average over the trailing `period` values.
pub fn last_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let tail = &data[data.len() - period..];
    Some(tail.iter().sum::<f64>() / period as f64)
}

/// Exponential Moving Average series, seeded with the SMA of the first
/// `period` values. `result[i]` corresponds to `data[period - 1 + i]`.
pub fn ema_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let seed: f64 = data[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(data.len() - period + 1);
    result.push(seed);

    for &value in &data[period..] {
        let prev = *result.last().unwrap();
        result.push((value - prev) * multiplier + prev);
    }

    result
}

pub fn last_ema(data: &[f64], period: usize) -> Option<f64> {
    ema_series(data, period).last().copied()
}

/// Relative Strength Index with Wilder smoothing. Needs at least
/// `period + 1` values for the initial average gain/loss.
pub fn last_rsi(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period + 1 {
        return None;
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);
    for window in data.windows(2) {
        let change = window[1] - window[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
    }

    let rs = if avg_loss == 0.0 {
        100.0
    } else {
        avg_gain / avg_loss
    };
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// Last values of the MACD line, its signal line, and the histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdLast {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn last_macd(
    data: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Option<MacdLast> {
    if fast_period == 0 || signal_period == 0 || slow_period <= fast_period {
        return None;
    }

    let ema_fast = ema_series(data, fast_period);
    let ema_slow = ema_series(data, slow_period);
    if ema_slow.is_empty() {
        return None;
    }

    // Both series end at the last bar; align on the slow series' span.
    let offset = ema_fast.len() - ema_slow.len();
    let macd_line: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .map(|(i, slow)| ema_fast[i + offset] - slow)
        .collect();

    let signal_line = ema_series(&macd_line, signal_period);
    let signal = *signal_line.last()?;
    let macd = *macd_line.last()?;

    Some(MacdLast {
        macd,
        signal,
        histogram: macd - signal,
    })
}

/// Bollinger band bounds around the trailing SMA.
pub fn last_bollinger(data: &[f64], period: usize, num_std: f64) -> Option<(f64, f64)> {
    let mean = last_sma(data, period)?;
    let tail = &data[data.len() - period..];
    let variance = tail.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
    let std = variance.sqrt();
    Some((mean + num_std * std, mean - num_std * std))
}
