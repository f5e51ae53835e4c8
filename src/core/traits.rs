//! The contract of the external boosting engine.
//!
//! The engine is never implemented in this crate. A type implementing
//! [`BoostingEngine`] is the engine handle itself: it is passed by identity
//! and never introspected. Updates take `&mut self`, so at most one in-flight
//! update or evaluation per handle is enforced by the borrow checker.

use crate::core::error::Result;
use crate::core::types::*;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Options forwarded to [`BoostingEngine::predict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PredictOptions {
    /// Return raw margins instead of transformed predictions
    pub output_margin: bool,
    /// Prediction is made on training data during boosting
    pub training: bool,
    /// Number of trees to use, 0 meaning all
    pub tree_limit: usize,
}

impl PredictOptions {
    /// Raw margins over all trees, as needed by custom objectives and metrics.
    pub fn margin() -> Self {
        PredictOptions {
            output_margin: true,
            ..PredictOptions::default()
        }
    }

    /// Mark the prediction as made on training data.
    pub fn with_training(mut self, training: bool) -> Self {
        self.training = training;
        self
    }
}

/// Handle-based operation set of the boosting engine.
pub trait BoostingEngine {
    /// Engine-side dataset type.
    type Data: DataView;

    /// Set one booster parameter. Values are already rendered as strings.
    fn set_param(&mut self, name: &str, value: &str) -> Result<()>;

    /// Built-in update step.
    fn update_one_iteration(&mut self, iteration: IterationIndex, train: &Self::Data) -> Result<()>;

    /// Custom-objective update step.
    fn boost_one_iteration(
        &mut self,
        train: &Self::Data,
        gradients: &[Score],
        hessians: &[Score],
    ) -> Result<()>;

    /// Built-in multi-dataset evaluation, returning the engine's text report.
    fn eval_one_iteration(
        &mut self,
        iteration: IterationIndex,
        datasets: &[&Self::Data],
        names: &[&str],
    ) -> Result<String>;

    /// Predictions for `data`.
    fn predict(&self, data: &Self::Data, options: &PredictOptions) -> Result<Array1<Score>>;
}
