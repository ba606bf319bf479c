use serde::Serialize;

use crate::params::ParamMap;

/// Snapshot of one completed training step.
///
/// Everything a visualization or debugging tool needs to reconstruct the
/// step: the mean loss, the parameters as they stand *after* the update, and
/// the averaged gradients that produced the update. The maps are clones taken
/// at capture time, so later mutation of the live parameters cannot alter an
/// already emitted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepState {
    step: usize,
    loss: f64,
    params: ParamMap,
    grads: ParamMap,
}

impl StepState {
    /// Creates a new `StepState`.
    ///
    /// # Args
    /// * `step` - Zero-based step index.
    /// * `loss` - Mean loss over the dataset for this step.
    /// * `params` - Parameter values after this step's update.
    /// * `grads` - Averaged gradients used for this step's update.
    pub fn new(step: usize, loss: f64, params: ParamMap, grads: ParamMap) -> Self {
        Self {
            step,
            loss,
            params,
            grads,
        }
    }

    /// Returns the zero-based step index.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the mean loss over the dataset for this step.
    pub fn loss(&self) -> f64 {
        self.loss
    }

    /// Returns the parameters as they stood after this step's update.
    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Returns the averaged gradients used for this step's update.
    pub fn grads(&self) -> &ParamMap {
        &self.grads
    }
}
