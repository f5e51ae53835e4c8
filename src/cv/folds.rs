//! Partitioning row indices into cross-validation folds.

use crate::config::validation::{ConfigWarning, Validated, WarningKind};
use crate::core::constants::{MIN_NFOLD, RANKING_PREFIX};
use crate::core::error::{GbmError, Result};
use crate::core::types::Label;
use crate::cv::stratify::{assign_folds, StratumRule};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Training and held-out rows of one fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldSplit {
    /// Fold index
    pub fold: usize,
    /// Rows of every other fold, in fold order
    pub train: Vec<usize>,
    /// Rows held out in this fold
    pub test: Vec<usize>,
}

/// `k` disjoint sets of row indices covering `[0, n)`.
///
/// Folds may be empty when there are fewer rows than folds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldPartition {
    folds: Vec<Vec<usize>>,
    num_rows: usize,
}

impl FoldPartition {
    /// Validate user-supplied folds over `num_rows` rows.
    pub fn from_folds(folds: Vec<Vec<usize>>, num_rows: usize) -> Result<Self> {
        if folds.len() < MIN_NFOLD {
            return Err(GbmError::config(format!(
                "at least {} folds are required, got {}",
                MIN_NFOLD,
                folds.len()
            )));
        }

        let mut seen = vec![false; num_rows];
        for (i, fold) in folds.iter().enumerate() {
            for &row in fold {
                if row >= num_rows {
                    return Err(GbmError::config(format!(
                        "fold {} contains row {}, but there are only {} rows",
                        i, row, num_rows
                    )));
                }
                if seen[row] {
                    return Err(GbmError::config(format!(
                        "row {} appears in more than one fold",
                        row
                    )));
                }
                seen[row] = true;
            }
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(GbmError::config(format!(
                "row {} is not assigned to any fold",
                missing
            )));
        }

        Ok(FoldPartition { folds, num_rows })
    }

    /// All folds in order.
    pub fn folds(&self) -> &[Vec<usize>] {
        &self.folds
    }

    /// Rows held out in fold `i`.
    pub fn fold(&self, i: usize) -> Option<&[usize]> {
        self.folds.get(i).map(Vec::as_slice)
    }

    /// Number of folds.
    pub fn num_folds(&self) -> usize {
        self.folds.len()
    }

    /// Number of partitioned rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Train/test rows for fold `i`.
    pub fn split(&self, i: usize) -> Result<FoldSplit> {
        let test = self.fold(i).ok_or_else(|| {
            GbmError::config(format!(
                "fold {} out of range for {} folds",
                i,
                self.folds.len()
            ))
        })?;
        let train = self
            .folds
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .flat_map(|(_, fold)| fold.iter().copied())
            .collect();
        Ok(FoldSplit {
            fold: i,
            train,
            test: test.to_vec(),
        })
    }

    /// Every train/test split, in fold order.
    pub fn splits(&self) -> impl Iterator<Item = FoldSplit> + '_ {
        (0..self.folds.len()).filter_map(move |i| self.split(i).ok())
    }

    /// Take the folds.
    pub fn into_folds(self) -> Vec<Vec<usize>> {
        self.folds
    }
}

/// Partition `num_rows` rows into `nfold` folds.
///
/// Without stratification the rows are shuffled and cut into `nfold`
/// contiguous runs of `floor(n / nfold)` rows, the last fold taking the
/// remainder. With stratification each fold gets roughly the same label
/// distribution; labels of the wrong length fall back to the unstratified
/// split with a warning. Ranking objectives are rejected.
pub fn generate_folds<R: Rng + ?Sized>(
    rng: &mut R,
    nfold: usize,
    num_rows: usize,
    stratified: bool,
    labels: Option<&[Label]>,
    objective: Option<&str>,
) -> Result<Validated<FoldPartition>> {
    if objective.map_or(false, |name| name.starts_with(RANKING_PREFIX)) {
        return Err(GbmError::unsupported(
            "cross-validation folds for ranking objectives must be supplied by the caller",
        ));
    }
    if nfold < MIN_NFOLD {
        return Err(GbmError::config(format!(
            "'nfold' must be at least {}, got {}",
            MIN_NFOLD, nfold
        )));
    }

    let mut warnings = Vec::new();
    let labels = match (stratified, labels) {
        (false, _) => None,
        (true, Some(labels)) if labels.len() == num_rows => Some(labels),
        (true, labels) => {
            warnings.push(ConfigWarning::emit(
                WarningKind::LabelLengthMismatch,
                "label",
                format!(
                    "stratified folds need one label per row ({} rows, {} labels); \
                     falling back to unstratified folds",
                    num_rows,
                    labels.map_or(0, <[Label]>::len)
                ),
            ));
            None
        }
    };

    let folds = match labels {
        Some(labels) => stratified_folds(rng, nfold, labels, objective),
        None => random_folds(rng, nfold, num_rows),
    };
    log::debug!(
        "generated {} folds over {} rows (stratified: {})",
        nfold,
        num_rows,
        labels.is_some()
    );

    Ok(Validated::with_warnings(
        FoldPartition { folds, num_rows },
        warnings,
    ))
}

/// [`generate_folds`] with the thread-local generator.
pub fn generate(
    nfold: usize,
    num_rows: usize,
    stratified: bool,
    labels: Option<&[Label]>,
    objective: Option<&str>,
) -> Result<Validated<FoldPartition>> {
    generate_folds(
        &mut rand::thread_rng(),
        nfold,
        num_rows,
        stratified,
        labels,
        objective,
    )
}

fn random_folds<R: Rng + ?Sized>(rng: &mut R, nfold: usize, num_rows: usize) -> Vec<Vec<usize>> {
    let mut rows: Vec<usize> = (0..num_rows).collect();
    rows.shuffle(rng);

    let step = num_rows / nfold;
    (0..nfold)
        .map(|i| {
            let end = if i + 1 == nfold { num_rows } else { (i + 1) * step };
            rows[i * step..end].to_vec()
        })
        .collect()
}

fn stratified_folds<R: Rng + ?Sized>(
    rng: &mut R,
    nfold: usize,
    labels: &[Label],
    objective: Option<&str>,
) -> Vec<Vec<usize>> {
    let num_rows = labels.len();
    let mut folds = vec![Vec::new(); nfold];

    if nfold >= num_rows {
        for (row, fold) in folds.iter_mut().enumerate().take(num_rows) {
            fold.push(row);
        }
        return folds;
    }

    let mut order: Vec<usize> = (0..num_rows).collect();
    order.shuffle(rng);
    let shuffled: Vec<Label> = order.iter().map(|&row| labels[row]).collect();

    let rule = StratumRule::choose(&shuffled, nfold, objective);
    let keys = rule.keys(&shuffled);
    let assignment = assign_folds(rng, &keys, nfold);

    for (position, fold) in assignment.into_iter().enumerate() {
        folds[fold].push(order[position]);
    }
    folds
}
