//! Reusable training setups shared by tests, plots, and the CLI.
//!
//! The registry exists to keep tests and visualizations in sync: change a
//! dataset or a hyperparameter once here and both stay truthful.

use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use crate::{
    params::{DataPoint, ParamMap},
    training::{manual_gradient, ManualGradient, Trainer},
};

/// `predict(x, params) -> y_hat` as a plain function pointer.
pub type PredictFn = fn(f64, &ParamMap) -> f64;

/// `loss(y_hat, y) -> penalty` as a plain function pointer.
pub type LossFn = fn(f64, f64) -> f64;

/// `grad(x, y, y_hat, params) -> gradients` as a plain function pointer.
pub type GradFn = fn(f64, f64, f64, &ParamMap) -> ParamMap;

/// The scenario registry's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioErr {
    /// The requested scenario name is not registered.
    Unknown(String),
}

impl Display for ScenarioErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioErr::Unknown(name) => write!(
                f,
                "unknown scenario {name:?}, available: {}",
                list_scenarios().join(", ")
            ),
        }
    }
}

impl Error for ScenarioErr {}

/// Boundary conversion for binaries / I/O APIs.
impl From<ScenarioErr> for io::Error {
    fn from(value: ScenarioErr) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, value)
    }
}

/// A complete training setup: data, starting parameters, model functions,
/// analytic gradient, and hyperparameters.
#[derive(Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub data: Vec<DataPoint>,
    pub params: ParamMap,
    pub predict: PredictFn,
    pub loss: LossFn,
    pub grad: GradFn,
    pub steps: usize,
    pub lr: f64,
}

impl Scenario {
    /// Returns the scenario's analytic gradient wrapped as a rule.
    pub fn rule(&self) -> ManualGradient<GradFn> {
        manual_gradient(self.grad)
    }

    /// Returns a trainer preconfigured with the scenario's functions,
    /// analytic gradient rule, and hyperparameters.
    pub fn trainer(&self) -> Trainer<PredictFn, LossFn, ManualGradient<GradFn>> {
        Trainer::new(self.predict, self.loss, self.rule(), self.steps, self.lr)
    }
}

// All scenarios model y = w*x + b (or the slope-only variant) with squared
// error, so the building blocks are shared.

fn linear_predict(x: f64, p: &ParamMap) -> f64 {
    p["w"] * x + p["b"]
}

fn slope_only_predict(x: f64, p: &ParamMap) -> f64 {
    p["w"] * x
}

fn squared_error(y_hat: f64, y: f64) -> f64 {
    (y_hat - y).powi(2)
}

fn linear_grad(x: f64, y: f64, y_hat: f64, _p: &ParamMap) -> ParamMap {
    let err = y_hat - y;
    ParamMap::from([("w", 2.0 * err * x), ("b", 2.0 * err)])
}

fn slope_only_grad(x: f64, y: f64, y_hat: f64, _p: &ParamMap) -> ParamMap {
    let err = y_hat - y;
    ParamMap::from([("w", 2.0 * err * x)])
}

fn single_point() -> Scenario {
    Scenario {
        name: "single_point",
        description: "Single point fit: y = w*x + b should move toward (2, 10).",
        data: vec![(2.0, 10.0)],
        params: ParamMap::from([("w", 0.0), ("b", 0.0)]),
        predict: linear_predict,
        loss: squared_error,
        grad: linear_grad,
        steps: 10,
        lr: 0.1,
    }
}

fn multi_point_no_bias() -> Scenario {
    Scenario {
        name: "multi_point_no_bias",
        description: "Multi-point fit without bias: learn slope ~2.",
        data: vec![(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)],
        params: ParamMap::from([("w", 0.0)]),
        predict: slope_only_predict,
        loss: squared_error,
        grad: slope_only_grad,
        steps: 25,
        lr: 0.05,
    }
}

fn with_bias() -> Scenario {
    Scenario {
        name: "with_bias",
        description: "Linear fit with bias: learn slope ~2 and intercept ~1.",
        data: vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)],
        params: ParamMap::from([("w", 0.0), ("b", 0.0)]),
        predict: linear_predict,
        loss: squared_error,
        grad: linear_grad,
        steps: 40,
        lr: 0.05,
    }
}

fn constant_target() -> Scenario {
    Scenario {
        name: "constant_target",
        description: "Constant target pushes bias toward the constant and slope toward 0.",
        data: vec![(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)],
        params: ParamMap::from([("w", 1.0), ("b", 0.0)]),
        predict: linear_predict,
        loss: squared_error,
        grad: linear_grad,
        steps: 40,
        lr: 0.05,
    }
}

fn noisy_linear() -> Scenario {
    Scenario {
        name: "noisy_linear",
        description: "Noisy linear data: loss should decrease but not reach zero.",
        // Fixed points scattered around y = 2x + 1; no RNG, so runs stay
        // reproducible.
        data: vec![(0.0, 1.1), (1.0, 2.9), (2.0, 5.2), (3.0, 7.0)],
        params: ParamMap::from([("w", 0.0), ("b", 0.0)]),
        predict: linear_predict,
        loss: squared_error,
        grad: linear_grad,
        steps: 60,
        lr: 0.03,
    }
}

/// Registered scenario names, sorted.
const NAMES: [&str; 5] = [
    "constant_target",
    "multi_point_no_bias",
    "noisy_linear",
    "single_point",
    "with_bias",
];

/// Returns the registered scenario names, sorted.
pub fn list_scenarios() -> Vec<&'static str> {
    NAMES.to_vec()
}

/// Builds the scenario registered under `name`.
///
/// # Errors
/// Returns `ScenarioErr::Unknown` (listing the available names) if `name` is
/// not registered.
pub fn get_scenario(name: &str) -> Result<Scenario, ScenarioErr> {
    match name {
        "single_point" => Ok(single_point()),
        "multi_point_no_bias" => Ok(multi_point_no_bias()),
        "with_bias" => Ok(with_bias()),
        "constant_target" => Ok(constant_target()),
        "noisy_linear" => Ok(noisy_linear()),
        other => Err(ScenarioErr::Unknown(other.to_owned())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_every_listed_scenario_resolves() {
        for name in list_scenarios() {
            let scenario = get_scenario(name).unwrap();
            assert_eq!(scenario.name, name);
            assert!(!scenario.data.is_empty());
            assert!(scenario.lr > 0.0);
        }
    }

    #[test]
    fn test_scenarios_are_debug_printable() {
        // Tests lean on unwrap/unwrap_err, which need the Ok type to be
        // Debug; pin the impl so it cannot be dropped by accident.
        let s = get_scenario("single_point").unwrap();
        assert!(format!("{s:?}").contains("single_point"));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut sorted = list_scenarios();
        sorted.sort_unstable();
        assert_eq!(sorted, list_scenarios());
    }

    #[test]
    fn test_unknown_scenario_lists_available_names() {
        let err = get_scenario("nope").unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("\"nope\""), "got: {msg}");
        for name in list_scenarios() {
            assert!(msg.contains(name), "missing {name} in: {msg}");
        }
    }

    #[test]
    fn test_gradients_match_parameter_names() {
        for name in list_scenarios() {
            let s = get_scenario(name).unwrap();
            let &(x, y) = &s.data[0];
            let y_hat = (s.predict)(x, &s.params);
            let grads = (s.grad)(x, y, y_hat, &s.params);

            assert_eq!(
                grads.names().collect::<Vec<_>>(),
                s.params.names().collect::<Vec<_>>(),
                "scenario {name}"
            );
        }
    }
}
