use crate::indicators::{last_bollinger, last_ema, last_macd, last_rsi, last_sma};
use analysis_core::{Bar, IndicatorSnapshot};

/// Produces the last value of each standard indicator from daily bars.
/// Indicators whose window exceeds the available history report `None`
/// and the rest of the snapshot is still filled in.
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn snapshot(&self, bars: &[Bar]) -> IndicatorSnapshot {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let mut snap = IndicatorSnapshot::default();
        snap.push("SMA_20", last_sma(&closes, 20));
        snap.push("SMA_50", last_sma(&closes, 50));
        snap.push("SMA_200", last_sma(&closes, 200));
        snap.push("EMA_12", last_ema(&closes, 12));
        snap.push("EMA_26", last_ema(&closes, 26));
        snap.push("RSI_14", last_rsi(&closes, 14));

        let macd = last_macd(&closes, 12, 26, 9);
        snap.push("MACD", macd.map(|m| m.macd));
        snap.push("MACD_signal", macd.map(|m| m.signal));
        snap.push("MACD_hist", macd.map(|m| m.histogram));

        let bb = last_bollinger(&closes, 20, 2.0);
        snap.push("BB_upper", bb.map(|(upper, _)| upper));
        snap.push("BB_lower", bb.map(|(_, lower)| lower));

        snap
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
