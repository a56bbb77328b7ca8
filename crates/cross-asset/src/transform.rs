use crate::error::CrossAssetError;
use analytics::{AnalyticsError, simple_return};
use core_types::AlignedMatrix;

/// Converts an aligned price matrix into an aligned matrix of simple returns.
///
/// The first row is dropped. A return is missing whenever either of its two
/// prices is missing, so gaps never leak into neighbouring periods.
pub fn aligned_returns(prices: &AlignedMatrix) -> Result<AlignedMatrix, CrossAssetError> {
    if prices.n_rows() < 2 {
        return Err(AnalyticsError::EmptySeries {
            required: 2,
            actual: prices.n_rows(),
        }
        .into());
    }

    for column in prices.columns() {
        if let Some((row, price)) = column
            .iter()
            .enumerate()
            .find_map(|(row, v)| v.filter(|p| !p.is_finite() || *p <= 0.0).map(|p| (row, p)))
        {
            return Err(AnalyticsError::InvalidPrice {
                timestamp: prices.index()[row],
                price,
            }
            .into());
        }
    }

    let columns = prices
        .columns()
        .iter()
        .map(|column| {
            column
                .windows(2)
                .map(|w| match (w[0], w[1]) {
                    (Some(previous), Some(current)) => Some(simple_return(previous, current)),
                    _ => None,
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    if columns.iter().flatten().flatten().any(|r| !r.is_finite()) {
        return Err(AnalyticsError::DegenerateSeries { metric: "return" }.into());
    }

    Ok(AlignedMatrix::new(
        prices.index()[1..].to_vec(),
        prices.assets().to_vec(),
        columns,
    )?)
}
