//! The training loop and its pluggable gradient rules.
//!
//! The loop treats the model as three capabilities: a [`Predictor`] maps an
//! input and the current parameters to a prediction, a [`LossFn`] scores a
//! prediction against a target, and a [`GradientRule`] turns one sample into
//! per-parameter gradients. Anything satisfying the contracts plugs in.

mod rules;
mod state;
mod trainer;

pub use rules::{manual_gradient, FiniteDifference, GradientRule, ManualGradient};
pub use state::StepState;
pub use trainer::{StepIter, Trainer};

use crate::params::ParamMap;

/// A prediction function: `predict(x, params) -> y_hat`.
pub trait Predictor: Fn(f64, &ParamMap) -> f64 {}

impl<F> Predictor for F where F: Fn(f64, &ParamMap) -> f64 {}

/// A per-sample loss function: `loss(y_hat, y) -> penalty`.
pub trait LossFn: Fn(f64, f64) -> f64 {}

impl<F> LossFn for F where F: Fn(f64, f64) -> f64 {}
