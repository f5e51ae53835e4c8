//! Round-by-round training with evaluation and early stopping.

use crate::boosting::driver::{apply_params, evaluate, update};
use crate::boosting::early_stopping::{require_direction, BestRound, EarlyStopping};
use crate::config::pipeline::ResolvedConfig;
use crate::core::constants::DEFAULT_PRINT_EVERY_N;
use crate::core::error::{GbmError, Result};
use crate::core::traits::BoostingEngine;
use crate::core::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics recorded after one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round index
    pub iteration: IterationIndex,
    /// Metrics in report order
    pub metrics: NamedMetrics,
}

/// Everything recorded by a finished [`TrainingSession::run`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationLog {
    /// One record per completed round
    pub rounds: Vec<RoundRecord>,
    /// Best round according to early stopping, if enabled
    pub best: Option<BestRound>,
    /// True if early stopping ended training before the last round
    pub stopped_early: bool,
}

impl EvaluationLog {
    /// Number of completed rounds.
    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Metrics of the last completed round.
    pub fn last(&self) -> Option<&NamedMetrics> {
        self.rounds.last().map(|r| &r.metrics)
    }
}

/// A training loop over one engine handle.
///
/// The session owns the handle while training; take it back with
/// [`TrainingSession::into_engine`].
pub struct TrainingSession<'a, E: BoostingEngine> {
    engine: E,
    train: &'a E::Data,
    watchlist: Vec<(&'a str, &'a E::Data)>,
    objective: Option<ObjectiveFn>,
    eval_metric: Option<MetricFn>,
    early_stopping: Option<EarlyStopping>,
    print_every_n: usize,
    next_iteration: IterationIndex,
}

impl<'a, E: BoostingEngine> TrainingSession<'a, E> {
    /// Train `engine` on `train`, evaluating the datasets in `watchlist`.
    pub fn new(engine: E, train: &'a E::Data, watchlist: Vec<(&'a str, &'a E::Data)>) -> Self {
        TrainingSession {
            engine,
            train,
            watchlist,
            objective: None,
            eval_metric: None,
            early_stopping: None,
            print_every_n: DEFAULT_PRINT_EVERY_N,
            next_iteration: 0,
        }
    }

    /// Build a session from a resolved configuration, pushing its
    /// parameters to the engine.
    pub fn from_config(
        mut engine: E,
        train: &'a E::Data,
        watchlist: Vec<(&'a str, &'a E::Data)>,
        config: &ResolvedConfig,
    ) -> Result<Self> {
        apply_params(&mut engine, &config.params)?;
        let mut session = Self::new(engine, train, watchlist)
            .with_objective(config.objective.clone())
            .with_eval_metric(config.eval_metric.clone())
            .with_print_every_n(config.options.print_every_n);
        if let Some(rounds) = config.options.early_stopping_rounds {
            session = session.with_early_stopping(rounds, config.options.maximize);
        }
        Ok(session)
    }

    /// Use a custom objective instead of the engine's built-in one.
    pub fn with_objective(mut self, objective: Option<ObjectiveFn>) -> Self {
        self.objective = objective;
        self
    }

    /// Use a custom evaluation metric instead of the engine's report.
    pub fn with_eval_metric(mut self, eval_metric: Option<MetricFn>) -> Self {
        self.eval_metric = eval_metric;
        self
    }

    /// Stop after `rounds` rounds without improvement.
    pub fn with_early_stopping(mut self, rounds: usize, maximize: Option<bool>) -> Self {
        self.early_stopping = Some(EarlyStopping::new(rounds, maximize));
        self
    }

    /// Log evaluation results every `n` rounds.
    pub fn with_print_every_n(mut self, n: usize) -> Self {
        self.print_every_n = n.max(1);
        self
    }

    /// Run up to `nrounds` more rounds.
    ///
    /// Calling `run` again continues from the next round index.
    pub fn run(&mut self, nrounds: usize) -> Result<EvaluationLog> {
        if self.early_stopping.is_some() && self.watchlist.is_empty() {
            return Err(GbmError::config(
                "early stopping requires at least one dataset in the watchlist",
            ));
        }
        if let Some(es) = self.early_stopping.as_ref() {
            require_direction(self.eval_metric.is_some(), true, es.maximize())?;
        }

        let mut history = EvaluationLog::default();
        let end = self.next_iteration + nrounds;

        for iteration in self.next_iteration..end {
            update(&mut self.engine, self.train, iteration, self.objective.as_ref())?;
            let metrics = evaluate(
                &mut self.engine,
                &self.watchlist,
                iteration,
                self.eval_metric.as_ref(),
            )?;
            self.next_iteration = iteration + 1;

            let last_round = iteration + 1 == end;
            if !metrics.is_empty() && (iteration % self.print_every_n == 0 || last_round) {
                log::info!("[{}]\t{}", iteration, format_metrics(&metrics));
            }

            let stop = match self.early_stopping.as_mut() {
                Some(es) => es.update(iteration, &metrics)?,
                None => false,
            };
            history.rounds.push(RoundRecord { iteration, metrics });

            if stop {
                history.stopped_early = !last_round;
                break;
            }
        }

        history.best = self.early_stopping.as_ref().and_then(|es| es.best().cloned());
        Ok(history)
    }

    /// The engine handle.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Index of the next round to run.
    pub fn next_iteration(&self) -> IterationIndex {
        self.next_iteration
    }

    /// End the session and return the engine handle.
    pub fn into_engine(self) -> E {
        self.engine
    }
}

impl<E: BoostingEngine> fmt::Debug for TrainingSession<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainingSession")
            .field("watchlist", &self.watchlist.iter().map(|(n, _)| *n).collect::<Vec<_>>())
            .field("custom_objective", &self.objective.is_some())
            .field("custom_eval_metric", &self.eval_metric.is_some())
            .field("early_stopping", &self.early_stopping)
            .field("print_every_n", &self.print_every_n)
            .field("next_iteration", &self.next_iteration)
            .finish()
    }
}

/// Render metrics the way the engine reports them.
pub fn format_metrics(metrics: &NamedMetrics) -> String {
    metrics
        .iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metrics() {
        let metrics = vec![
            ("train-rmse".to_string(), 0.5),
            ("test-rmse".to_string(), 0.75),
        ];
        assert_eq!(format_metrics(&metrics), "train-rmse:0.5\ttest-rmse:0.75");
        assert_eq!(format_metrics(&NamedMetrics::new()), "");
    }

    #[test]
    fn test_evaluation_log_accessors() {
        let mut log = EvaluationLog::default();
        assert!(log.last().is_none());
        log.rounds.push(RoundRecord {
            iteration: 0,
            metrics: vec![("test-auc".to_string(), 0.9)],
        });
        assert_eq!(log.num_rounds(), 1);
        assert_eq!(log.last().unwrap()[0].1, 0.9);
    }
}
