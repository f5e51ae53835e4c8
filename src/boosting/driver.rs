//! Per-round update and evaluation against a [`BoostingEngine`].
//!
//! Both operations dispatch on whether a user hook is present. Without one
//! the engine's built-in step is used; with one the driver fetches margin
//! predictions and feeds them to the hook.

use crate::boosting::report::parse_eval_report;
use crate::config::params::Params;
use crate::core::error::{GbmError, Result};
use crate::core::traits::{BoostingEngine, PredictOptions};
use crate::core::types::*;
use ndarray::Array1;
use std::borrow::Cow;

/// Named datasets evaluated after each round, in report order.
pub type Watchlist<'a, D> = [(&'a str, &'a D)];

/// Push every booster parameter to the engine.
pub fn apply_params<E: BoostingEngine>(engine: &mut E, params: &Params) -> Result<()> {
    for (name, value) in params.to_engine_pairs()? {
        engine.set_param(&name, &value)?;
    }
    log::debug!("applied {} parameters to engine", params.len());
    Ok(())
}

/// Run one boosting round.
///
/// With a custom objective, gradients are computed from the engine's margin
/// predictions on `train` and must have one entry per prediction.
pub fn update<E: BoostingEngine>(
    engine: &mut E,
    train: &E::Data,
    iteration: IterationIndex,
    obj: Option<&ObjectiveFn>,
) -> Result<()> {
    let obj = match obj {
        None => return engine.update_one_iteration(iteration, train),
        Some(obj) => obj,
    };

    let preds = engine.predict(train, &PredictOptions::margin().with_training(true))?;
    let gpair = obj(preds.view(), train)?;

    if gpair.grad.len() != preds.len() {
        return Err(GbmError::dimension_mismatch(
            format!("{} gradients", preds.len()),
            format!("{} gradients", gpair.grad.len()),
        ));
    }
    if gpair.hess.len() != preds.len() {
        return Err(GbmError::dimension_mismatch(
            format!("{} hessians", preds.len()),
            format!("{} hessians", gpair.hess.len()),
        ));
    }

    let grad = contiguous(&gpair.grad);
    let hess = contiguous(&gpair.hess);
    engine.boost_one_iteration(train, &grad, &hess)
}

/// Evaluate every watched dataset after round `iteration`.
///
/// Built-in metrics come from the engine's report. A custom metric is called
/// once per dataset on margin predictions and named `"<dataset>-<metric>"`.
pub fn evaluate<E: BoostingEngine>(
    engine: &mut E,
    watchlist: &Watchlist<'_, E::Data>,
    iteration: IterationIndex,
    feval: Option<&MetricFn>,
) -> Result<NamedMetrics> {
    if watchlist.is_empty() {
        return Ok(NamedMetrics::new());
    }

    match feval {
        None => {
            let datasets: Vec<&E::Data> = watchlist.iter().map(|(_, data)| *data).collect();
            let names: Vec<&str> = watchlist.iter().map(|(name, _)| *name).collect();
            let report = engine.eval_one_iteration(iteration, &datasets, &names)?;
            parse_eval_report(&report)
        }
        Some(feval) => {
            let options = PredictOptions::margin();
            let mut metrics = NamedMetrics::with_capacity(watchlist.len());
            for (name, data) in watchlist {
                let preds = engine.predict(data, &options)?;
                let result = feval(preds.view(), *data)?;
                metrics.push((format!("{}-{}", name, result.metric), result.value));
            }
            Ok(metrics)
        }
    }
}

fn contiguous(values: &Array1<Score>) -> Cow<'_, [Score]> {
    match values.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(values.to_vec()),
    }
}
