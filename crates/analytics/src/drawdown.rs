use core_types::{DrawdownPoint, DrawdownSeries, ReturnSeries};

/// Builds the running-peak drawdown path of a return series.
///
/// Wealth starts at one unit before the first return, and the running peak
/// starts there too, so a loss in the very first period is a drawdown.
///
/// The drawdown is carried as wealth relative to the running peak, which stays
/// in `[0, 1]` even when `cumulative` and `peak` overflow on long compounding
/// paths.
pub fn drawdown_series(returns: &ReturnSeries) -> DrawdownSeries {
    let mut cumulative = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut relative = 1.0_f64;

    let points = returns
        .points()
        .iter()
        .map(|r| {
            let growth = 1.0 + r.value;
            cumulative *= growth;
            peak = peak.max(cumulative);
            relative = (relative * growth).min(1.0);
            DrawdownPoint {
                timestamp: r.timestamp,
                cumulative,
                peak,
                drawdown: relative - 1.0,
            }
        })
        .collect();

    DrawdownSeries::new(points)
}

/// Deepest peak-to-trough decline as a percentage (e.g. `-50.0`).
pub fn max_drawdown_pct(returns: &ReturnSeries) -> f64 {
    drawdown_series(returns).max_drawdown() * 100.0
}
