//! Early stopping on the last reported evaluation metric.
//!
//! The monitor watches the last entry of each round's metrics, which is the
//! last metric on the last watched dataset. Training stops once `rounds`
//! rounds pass without improving on the best score seen so far.

use crate::core::constants::MAXIMIZED_METRICS;
use crate::core::error::{GbmError, Result};
use crate::core::types::{IterationIndex, NamedMetrics};
use serde::{Deserialize, Serialize};

/// Whether a metric should be maximized, judged from its reported name.
///
/// The dataset prefix (`"test-"`) and any `@` parameter are ignored, so
/// `"test-ndcg@5"` maximizes and `"train-rmse"` minimizes.
pub fn infer_maximize(metric_name: &str) -> bool {
    let base = metric_name
        .split_once('-')
        .map(|(_, metric)| metric)
        .unwrap_or(metric_name);
    let base = base.split('@').next().unwrap_or(base).trim_end_matches('-');
    MAXIMIZED_METRICS.contains(&base)
}

/// Fail unless a custom metric monitored by early stopping has an explicit
/// direction. Built-in metrics may leave `maximize` unset.
pub fn require_direction(
    custom_metric: bool,
    early_stopping: bool,
    maximize: Option<bool>,
) -> Result<()> {
    if custom_metric && early_stopping && maximize.is_none() {
        return Err(GbmError::config(
            "set 'maximize' to indicate whether the custom evaluation metric needs to be maximized",
        ));
    }
    Ok(())
}

/// Best round seen by an [`EarlyStopping`] monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestRound {
    /// Round with the best score
    pub iteration: IterationIndex,
    /// Best score
    pub score: f64,
    /// Name of the monitored metric
    pub metric: String,
}

/// Tracks the monitored metric and decides when to stop training.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    rounds: usize,
    maximize: Option<bool>,
    best: Option<BestRound>,
    stopped: bool,
}

impl EarlyStopping {
    /// Stop after `rounds` rounds without improvement.
    ///
    /// `maximize` fixes the direction; `None` infers it from the first
    /// metric name seen.
    pub fn new(rounds: usize, maximize: Option<bool>) -> Self {
        EarlyStopping {
            rounds,
            maximize,
            best: None,
            stopped: false,
        }
    }

    /// Record one round. Returns `true` when training should stop.
    pub fn update(&mut self, iteration: IterationIndex, metrics: &NamedMetrics) -> Result<bool> {
        if self.stopped {
            return Ok(true);
        }

        let (name, score) = metrics.last().ok_or_else(|| {
            GbmError::config("early stopping requires at least one evaluation metric")
        })?;
        let score = *score;

        let best = match self.best.as_mut() {
            Some(best) => best,
            None => {
                let maximize = *self.maximize.get_or_insert_with(|| infer_maximize(name));
                log::info!(
                    "Will train until {} hasn't improved in {} rounds ({})",
                    name,
                    self.rounds,
                    if maximize { "maximize" } else { "minimize" }
                );
                self.best = Some(BestRound {
                    iteration,
                    score,
                    metric: name.clone(),
                });
                return Ok(false);
            }
        };

        let improved = if self.maximize.unwrap_or(false) {
            score > best.score
        } else {
            score < best.score
        };

        if improved {
            best.iteration = iteration;
            best.score = score;
        } else if iteration.saturating_sub(best.iteration) >= self.rounds {
            self.stopped = true;
            log::info!(
                "Stopping. Best iteration: {} ({} = {})",
                best.iteration,
                best.metric,
                best.score
            );
        }

        Ok(self.stopped)
    }

    /// True once the stopping condition has been met.
    pub fn should_stop(&self) -> bool {
        self.stopped
    }

    /// Best round so far, if any round was recorded.
    pub fn best(&self) -> Option<&BestRound> {
        self.best.as_ref()
    }

    /// Metric direction, once known.
    pub fn maximize(&self) -> Option<bool> {
        self.maximize
    }

    /// Patience in rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}
