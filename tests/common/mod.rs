//! Common test utilities for gbm-control integration tests.
//!
//! [`MockEngine`] fits a single constant under squared error, which is
//! enough to exercise every engine call the crate makes.

#![allow(dead_code)]

use gbm_control::*;
use ndarray::{Array1, ArrayView1};
use rand::prelude::*;

/// Labels of a dataset, standing in for an engine-side matrix.
#[derive(Debug, Clone)]
pub struct MockData {
    labels: Array1<Label>,
}

impl MockData {
    pub fn new(labels: Vec<Label>) -> Self {
        MockData {
            labels: Array1::from_vec(labels),
        }
    }

    /// Subset of `labels` at `rows`.
    pub fn from_rows(labels: &[Label], rows: &[usize]) -> Self {
        Self::new(rows.iter().map(|&r| labels[r]).collect())
    }
}

impl DataView for MockData {
    fn num_rows(&self) -> usize {
        self.labels.len()
    }

    fn labels(&self) -> ArrayView1<'_, Label> {
        self.labels.view()
    }
}

/// Constant-prediction engine under squared error.
#[derive(Debug, Clone)]
pub struct MockEngine {
    pub params: Vec<(String, String)>,
    pub base: Score,
    pub eta: Score,
    pub builtin_updates: Vec<IterationIndex>,
    pub custom_updates: usize,
    pub eval_calls: usize,
}

impl Default for MockEngine {
    fn default() -> Self {
        MockEngine {
            params: Vec::new(),
            base: 0.0,
            eta: 0.3,
            builtin_updates: Vec::new(),
            custom_updates: 0,
            eval_calls: 0,
        }
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn rmse(&self, data: &MockData) -> f64 {
        let n = data.num_rows().max(1) as f64;
        let sse: f64 = data
            .labels
            .iter()
            .map(|&y| ((self.base - y) as f64).powi(2))
            .sum();
        (sse / n).sqrt()
    }
}

impl BoostingEngine for MockEngine {
    type Data = MockData;

    fn set_param(&mut self, name: &str, value: &str) -> Result<()> {
        if name == "eta" {
            self.eta = value
                .parse()
                .map_err(|_| GbmError::engine(format!("invalid eta '{}'", value)))?;
        }
        self.params.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn update_one_iteration(&mut self, iteration: IterationIndex, train: &MockData) -> Result<()> {
        let n = train.num_rows().max(1) as Score;
        let grad: Score = train.labels.iter().map(|&y| self.base - y).sum::<Score>() / n;
        self.base -= self.eta * grad;
        self.builtin_updates.push(iteration);
        Ok(())
    }

    fn boost_one_iteration(
        &mut self,
        train: &MockData,
        gradients: &[Score],
        hessians: &[Score],
    ) -> Result<()> {
        if gradients.len() != train.num_rows() {
            return Err(GbmError::engine("gradient length does not match training rows"));
        }
        let hess: Score = hessians.iter().sum();
        if hess > 0.0 {
            self.base -= self.eta * gradients.iter().sum::<Score>() / hess;
        }
        self.custom_updates += 1;
        Ok(())
    }

    fn eval_one_iteration(
        &mut self,
        iteration: IterationIndex,
        datasets: &[&MockData],
        names: &[&str],
    ) -> Result<String> {
        self.eval_calls += 1;
        let mut report = format!("[{}]", iteration);
        for (data, name) in datasets.iter().zip(names) {
            report.push_str(&format!("\t{}-rmse:{}", name, self.rmse(data)));
        }
        Ok(report)
    }

    fn predict(&self, data: &MockData, _options: &PredictOptions) -> Result<Array1<Score>> {
        Ok(Array1::from_elem(data.num_rows(), self.base))
    }
}

/// Squared error objective as a user hook.
pub fn squared_error_objective() -> Callable {
    Callable::objective(|preds, data| {
        let grad = &preds - &data.labels();
        Ok(GradientPair {
            hess: Array1::ones(grad.len()),
            grad,
        })
    })
}

/// Mean absolute error as a user hook.
pub fn mae_metric() -> Callable {
    Callable::metric(|preds, data| {
        let labels = data.labels();
        let n = labels.len().max(1) as f64;
        let total: f64 = preds
            .iter()
            .zip(labels.iter())
            .map(|(p, y)| (p - y).abs() as f64)
            .sum();
        Ok(MetricValue::new("mae", total / n))
    })
}

/// Continuous labels from a fixed seed.
pub fn regression_labels(n: usize, seed: u64) -> Vec<Label> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect()
}

/// Imbalanced binary labels from a fixed seed, about `rate` positives.
pub fn binary_labels(n: usize, rate: f64, seed: u64) -> Vec<Label> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| if rng.gen_bool(rate) { 1.0 } else { 0.0 })
        .collect()
}
