//! Strata for stratified fold assignment.
//!
//! Labels are reduced to an integer stratum per row, either by taking label
//! levels directly or by binning continuous labels at sample quantiles.
//! Rows of each stratum are then spread evenly over the folds.

use crate::core::constants::*;
use crate::core::types::{Label, ObjectiveKind};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::cmp::Ordering;

/// How labels are turned into strata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StratumRule {
    /// One stratum per distinct label value
    Levels,
    /// Quantile bins of a continuous label
    Quantiles {
        /// Number of bins before breakpoint deduplication
        groups: usize,
    },
}

impl StratumRule {
    /// Choose the rule for `labels` split into `nfold` folds.
    ///
    /// A classification or ranking objective means categorical labels. With
    /// no textual objective, labels with few distinct values are treated as
    /// categorical too.
    pub fn choose(labels: &[Label], nfold: usize, objective: Option<&str>) -> Self {
        let categorical = match objective {
            Some(name) => ObjectiveKind::from_name(name).has_categorical_labels(),
            None => distinct_levels(labels).len() <= MAX_IMPLICIT_CLASS_LEVELS,
        };
        if categorical {
            StratumRule::Levels
        } else {
            StratumRule::Quantiles {
                groups: quantile_groups(labels.len(), nfold),
            }
        }
    }

    /// Stratum of every label.
    pub fn keys(&self, labels: &[Label]) -> Vec<usize> {
        match *self {
            StratumRule::Levels => level_keys(labels),
            StratumRule::Quantiles { groups } => quantile_keys(labels, groups),
        }
    }
}

/// Number of quantile bins: `floor(n / nfold)` clamped to `[2, 5]`.
pub fn quantile_groups(nrows: usize, nfold: usize) -> usize {
    (nrows / nfold.max(1)).clamp(MIN_QUANTILE_GROUPS, MAX_QUANTILE_GROUPS)
}

fn canonical(label: Label) -> Label {
    if label.is_nan() {
        Label::NAN
    } else if label == 0.0 {
        0.0
    } else {
        label
    }
}

fn distinct_levels(labels: &[Label]) -> Vec<Label> {
    let mut levels: Vec<Label> = labels.iter().map(|&l| canonical(l)).collect();
    levels.sort_by(|a, b| a.total_cmp(b));
    levels.dedup_by(|a, b| a.to_bits() == b.to_bits());
    levels
}

/// Index of each label among the sorted distinct labels.
pub fn level_keys(labels: &[Label]) -> Vec<usize> {
    let levels = distinct_levels(labels);
    labels
        .iter()
        .map(|&l| {
            let l = canonical(l);
            levels
                .binary_search_by(|level| level.total_cmp(&l))
                .unwrap_or_else(|pos| pos)
        })
        .collect()
}

/// Sample quantile with linear interpolation between order statistics.
///
/// `sorted` must be ascending and non-empty; `p` is in `[0, 1]`.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Deduplicated quantile breakpoints at `0, 1/groups, ..., 1`.
pub fn quantile_breaks(labels: &[Label], groups: usize) -> Vec<f64> {
    let mut sorted: Vec<f64> = labels
        .iter()
        .filter(|l| !l.is_nan())
        .map(|&l| l as f64)
        .collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let groups = groups.max(1);
    let mut breaks: Vec<f64> = (0..=groups)
        .map(|j| quantile(&sorted, j as f64 / groups as f64))
        .collect();
    breaks.dedup();
    breaks
}

/// Bin index of each label.
///
/// The first bin is closed on both ends, later bins are right-closed.
/// Missing labels share one extra stratum after the last bin.
pub fn quantile_keys(labels: &[Label], groups: usize) -> Vec<usize> {
    let breaks = quantile_breaks(labels, groups);
    let num_bins = breaks.len().saturating_sub(1).max(1);

    labels
        .iter()
        .map(|&l| {
            if l.is_nan() {
                return num_bins;
            }
            let x = l as f64;
            breaks
                .iter()
                .skip(1)
                .position(|&upper| x <= upper)
                .unwrap_or(num_bins - 1)
        })
        .collect()
}

/// Fold of every row, balancing each stratum across `nfold` folds.
///
/// A stratum of size `m` contributes every fold `floor(m / nfold)` times,
/// plus `m % nfold` distinct folds drawn at random; the resulting fold ids
/// are shuffled over the stratum's rows.
pub fn assign_folds<R: Rng + ?Sized>(rng: &mut R, keys: &[usize], nfold: usize) -> Vec<usize> {
    let num_strata = keys.iter().max().map_or(0, |&k| k + 1);
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); num_strata];
    for (row, &key) in keys.iter().enumerate() {
        members[key].push(row);
    }

    let mut assignment = vec![0; keys.len()];
    for rows in members.iter().filter(|rows| !rows.is_empty()) {
        let m = rows.len();
        let mut fold_ids: Vec<usize> = (0..m / nfold).flat_map(|_| 0..nfold).collect();
        if m % nfold > 0 {
            fold_ids.extend(index::sample(rng, nfold, m % nfold).into_iter());
        }
        fold_ids.shuffle(rng);

        for (&row, fold) in rows.iter().zip(fold_ids) {
            assignment[row] = fold;
        }
    }
    assignment
}
