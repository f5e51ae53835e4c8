//! K-fold cross-validation over caller-built engines.
//!
//! Every fold gets its own engine handle and train/test data from a factory
//! closure. All folds advance one round at a time and their metrics are
//! averaged per round; early stopping watches the averaged test metric.

use crate::boosting::driver::{apply_params, evaluate, update};
use crate::boosting::early_stopping::{require_direction, BestRound, EarlyStopping};
use crate::config::pipeline::ResolvedConfig;
use crate::core::error::{GbmError, Result};
use crate::core::traits::BoostingEngine;
use crate::core::types::*;
use crate::cv::folds::{FoldPartition, FoldSplit};
use crate::cv::CvConfig;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine handle and datasets for one fold, built by the caller.
pub struct FoldData<E: BoostingEngine> {
    /// Engine trained on this fold
    pub engine: E,
    /// Rows of [`FoldSplit::train`]
    pub train: E::Data,
    /// Rows of [`FoldSplit::test`]
    pub test: E::Data,
}

impl<E: BoostingEngine> fmt::Debug for FoldData<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoldData")
            .field("train_rows", &self.train.num_rows())
            .field("test_rows", &self.test.num_rows())
            .finish()
    }
}

/// Mean and standard deviation of one metric across folds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Reported metric name, e.g. `"test-rmse"`
    pub name: String,
    /// Mean over folds
    pub mean: f64,
    /// Population standard deviation over folds
    pub std: f64,
}

/// Aggregated metrics of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvRound {
    /// Round index
    pub iteration: IterationIndex,
    /// One summary per metric, in report order
    pub metrics: Vec<MetricSummary>,
}

/// Result of [`cross_validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvResult {
    /// Number of folds trained
    pub nfold: usize,
    /// One entry per completed round
    pub rounds: Vec<CvRound>,
    /// Best round on the averaged metric, when early stopping is enabled
    pub best: Option<BestRound>,
    /// True if early stopping ended training before the last round
    pub stopped_early: bool,
}

impl CvResult {
    /// Summaries of the last completed round.
    pub fn last(&self) -> Option<&[MetricSummary]> {
        self.rounds.last().map(|r| r.metrics.as_slice())
    }
}

/// Aggregate per-fold metrics of one round.
///
/// Every fold must report the same metric names in the same order.
pub fn summarize(per_fold: &[NamedMetrics]) -> Result<Vec<MetricSummary>> {
    let first = match per_fold.first() {
        Some(first) => first,
        None => return Ok(Vec::new()),
    };

    for (fold, metrics) in per_fold.iter().enumerate().skip(1) {
        let same_names = metrics.len() == first.len()
            && metrics.iter().zip(first).all(|((a, _), (b, _))| a == b);
        if !same_names {
            return Err(GbmError::config(format!(
                "fold {} reported metrics [{}], fold 0 reported [{}]",
                fold,
                names(metrics),
                names(first)
            )));
        }
    }

    Ok(first
        .iter()
        .enumerate()
        .map(|(j, (name, _))| {
            let values: Array1<f64> = per_fold.iter().map(|m| m[j].1).collect();
            MetricSummary {
                name: name.clone(),
                mean: values.mean().unwrap_or(0.0),
                std: values.std(0.0),
            }
        })
        .collect())
}

fn names(metrics: &NamedMetrics) -> String {
    metrics
        .iter()
        .map(|(n, _)| n.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cross-validate over `partition`.
///
/// `make_fold` builds an engine and datasets for each split. The resolved
/// parameters are pushed to every engine, and the resolved hooks are used
/// for updates and evaluation. Early stopping settings in `config` take
/// precedence over those in `resolved`.
pub fn cross_validate<E, F>(
    partition: &FoldPartition,
    config: &CvConfig,
    resolved: &ResolvedConfig,
    mut make_fold: F,
) -> Result<CvResult>
where
    E: BoostingEngine,
    F: FnMut(&FoldSplit) -> Result<FoldData<E>>,
{
    let rounds = config
        .early_stopping_rounds
        .or(resolved.options.early_stopping_rounds);
    let maximize = config.maximize.or(resolved.options.maximize);
    require_direction(resolved.eval_metric.is_some(), rounds.is_some(), maximize)?;

    let mut folds = Vec::with_capacity(partition.num_folds());
    for split in partition.splits() {
        let mut fold = make_fold(&split)?;
        apply_params(&mut fold.engine, &resolved.params)?;
        folds.push(fold);
    }

    let mut early_stopping = rounds.map(|r| EarlyStopping::new(r, maximize));
    let print_every_n = config.print_every_n.max(1);

    let mut result = CvResult {
        nfold: folds.len(),
        rounds: Vec::new(),
        best: None,
        stopped_early: false,
    };

    for iteration in 0..config.nrounds {
        let mut per_fold = Vec::with_capacity(folds.len());
        for fold in folds.iter_mut() {
            update(
                &mut fold.engine,
                &fold.train,
                iteration,
                resolved.objective.as_ref(),
            )?;
            let watchlist = [("train", &fold.train), ("test", &fold.test)];
            per_fold.push(evaluate(
                &mut fold.engine,
                &watchlist,
                iteration,
                resolved.eval_metric.as_ref(),
            )?);
        }

        let metrics = summarize(&per_fold)?;
        let last_round = iteration + 1 == config.nrounds;
        if iteration % print_every_n == 0 || last_round {
            log::info!("[{}]\t{}", iteration, format_summaries(&metrics));
        }

        let means: NamedMetrics = metrics.iter().map(|m| (m.name.clone(), m.mean)).collect();
        result.rounds.push(CvRound { iteration, metrics });

        if let Some(es) = early_stopping.as_mut() {
            if es.update(iteration, &means)? {
                result.stopped_early = !last_round;
                break;
            }
        }
    }

    result.best = early_stopping.as_ref().and_then(|es| es.best().cloned());
    log::debug!(
        "cross-validation finished after {} rounds",
        result.rounds.len()
    );
    Ok(result)
}

fn format_summaries(metrics: &[MetricSummary]) -> String {
    metrics
        .iter()
        .map(|m| format!("{}:{}+{:.6}", m.name, m.mean, m.std))
        .collect::<Vec<_>>()
        .join("\t")
}
