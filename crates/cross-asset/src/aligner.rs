use crate::error::CrossAssetError;
use chrono::{DateTime, Utc};
use core_types::{AlignedMatrix, AlignmentPolicy, PriceSeries};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Places several labelled price series on one timestamp index.
///
/// Column order follows the order of the input slice, so the same input
/// always yields the same matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesAligner {
    policy: AlignmentPolicy,
}

impl SeriesAligner {
    pub const MIN_ASSETS: usize = 2;
    pub const MIN_ROWS: usize = 2;

    pub fn new(policy: AlignmentPolicy) -> Self {
        Self { policy }
    }

    /// Aligns `(asset name, series)` pairs according to the configured policy.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` with fewer than two assets holding data, or when
    ///   fewer than two rows of the index are observed by at least two assets.
    /// * `DuplicateAsset` when a name repeats.
    /// * `MixedPriceFields` when adjusted and unadjusted series are combined.
    pub fn align(&self, inputs: &[(String, PriceSeries)]) -> Result<AlignedMatrix, CrossAssetError> {
        if inputs.len() < Self::MIN_ASSETS {
            return Err(CrossAssetError::InsufficientData {
                reason: format!(
                    "need at least {} assets, got {}",
                    Self::MIN_ASSETS,
                    inputs.len()
                ),
                exclusive_assets: Vec::new(),
            });
        }
        check_names_and_fields(inputs)?;
        check_assets_with_data(inputs)?;

        let index = match self.policy {
            AlignmentPolicy::Inner => intersection(inputs),
            AlignmentPolicy::Outer | AlignmentPolicy::OuterForwardFill => union(inputs),
        };

        // Outer policies pad the index, so count only rows that at least two
        // assets actually observed.
        let shared = shared_rows(inputs, &index);
        if shared < Self::MIN_ROWS {
            return Err(insufficient_rows(inputs, shared));
        }

        let forward_fill = self.policy == AlignmentPolicy::OuterForwardFill;
        let columns = inputs
            .iter()
            .map(|(_, series)| column_for(series, &index, forward_fill))
            .collect();
        let assets = inputs.iter().map(|(name, _)| name.clone()).collect();

        Ok(AlignedMatrix::new(index, assets, columns)?)
    }
}

fn check_names_and_fields(inputs: &[(String, PriceSeries)]) -> Result<(), CrossAssetError> {
    let mut seen = HashSet::new();
    for (name, _) in inputs {
        if !seen.insert(name.as_str()) {
            return Err(CrossAssetError::DuplicateAsset(name.clone()));
        }
    }

    let (first_asset, first_series) = &inputs[0];
    if let Some((other_asset, other_series)) = inputs
        .iter()
        .find(|(_, s)| s.field() != first_series.field())
    {
        return Err(CrossAssetError::MixedPriceFields {
            first_asset: first_asset.clone(),
            first: first_series.field(),
            other_asset: other_asset.clone(),
            other: other_series.field(),
        });
    }
    Ok(())
}

fn check_assets_with_data(inputs: &[(String, PriceSeries)]) -> Result<(), CrossAssetError> {
    let empty: Vec<String> = inputs
        .iter()
        .filter(|(_, series)| series.is_empty())
        .map(|(name, _)| name.clone())
        .collect();
    let with_data = inputs.len() - empty.len();
    if with_data >= SeriesAligner::MIN_ASSETS {
        return Ok(());
    }

    let details: Vec<String> = empty.iter().map(|name| format!("'{name}' has no data")).collect();
    Err(CrossAssetError::InsufficientData {
        reason: format!(
            "{} of {} assets have data, need at least {}; {}",
            with_data,
            inputs.len(),
            SeriesAligner::MIN_ASSETS,
            details.join("; ")
        ),
        exclusive_assets: empty,
    })
}

/// Number of index rows observed (not imputed) by at least two assets.
fn shared_rows(inputs: &[(String, PriceSeries)], index: &[DateTime<Utc>]) -> usize {
    let mut observed: HashMap<DateTime<Utc>, usize> = HashMap::new();
    for (_, series) in inputs {
        for t in series.timestamps() {
            *observed.entry(t).or_default() += 1;
        }
    }
    index
        .iter()
        .filter(|&t| observed.get(t).is_some_and(|&n| n >= 2))
        .count()
}

fn intersection(inputs: &[(String, PriceSeries)]) -> Vec<DateTime<Utc>> {
    let mut common: BTreeSet<DateTime<Utc>> = inputs[0].1.timestamps().collect();
    for (_, series) in &inputs[1..] {
        let other: HashSet<DateTime<Utc>> = series.timestamps().collect();
        common.retain(|t| other.contains(t));
    }
    common.into_iter().collect()
}

fn union(inputs: &[(String, PriceSeries)]) -> Vec<DateTime<Utc>> {
    inputs
        .iter()
        .flat_map(|(_, series)| series.timestamps())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn column_for(series: &PriceSeries, index: &[DateTime<Utc>], forward_fill: bool) -> Vec<Option<f64>> {
    let by_time: HashMap<DateTime<Utc>, f64> =
        series.points().iter().map(|p| (p.timestamp, p.price)).collect();

    let mut last_seen = None;
    index
        .iter()
        .map(|t| match by_time.get(t) {
            Some(&price) => {
                last_seen = Some(price);
                Some(price)
            }
            None if forward_fill => last_seen,
            None => None,
        })
        .collect()
}

/// Describes why the index is too short, naming the assets that hold
/// timestamps missing from the others.
fn insufficient_rows(inputs: &[(String, PriceSeries)], shared: usize) -> CrossAssetError {
    let common: BTreeSet<DateTime<Utc>> = intersection(inputs).into_iter().collect();

    let mut details = Vec::new();
    let mut exclusive_assets = Vec::new();
    for (name, series) in inputs {
        if series.is_empty() {
            details.push(format!("'{name}' has no data"));
            exclusive_assets.push(name.clone());
            continue;
        }
        let exclusive: Vec<DateTime<Utc>> =
            series.timestamps().filter(|t| !common.contains(t)).collect();
        if let (Some(first), Some(last)) = (exclusive.first(), exclusive.last()) {
            details.push(format!(
                "'{}' has {} timestamps the others lack ({} .. {})",
                name,
                exclusive.len(),
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ));
            exclusive_assets.push(name.clone());
        }
    }

    let mut reason = format!(
        "{} shared rows, need at least {}",
        shared,
        SeriesAligner::MIN_ROWS
    );
    if !details.is_empty() {
        reason.push_str("; ");
        reason.push_str(&details.join("; "));
    }

    CrossAssetError::InsufficientData { reason, exclusive_assets }
}
