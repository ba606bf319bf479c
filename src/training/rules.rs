use super::{LossFn, Predictor};
use crate::{
    error::{Result, TrainErr},
    params::ParamMap,
};

/// Abstraction over "how gradients are produced" for a single sample.
///
/// This is the training policy boundary: the loop treats a rule as a black
/// box that maps a sample and the current parameters to per-parameter
/// gradients. Analytic gradients and numerical estimation plug in behind the
/// same contract.
///
/// Implementations take `&mut self` so stateful rules can keep scratch
/// buffers across calls.
pub trait GradientRule {
    /// Computes gradients for one sample.
    ///
    /// # Args
    /// * `x` - Sample input.
    /// * `y` - Sample target.
    /// * `y_hat` - Prediction already computed from `x` and `params`.
    /// * `params` - Current parameter values; read-only for the rule.
    ///
    /// # Returns
    /// A fresh gradient map whose keys are a subset of (in practice equal to)
    /// the parameter names.
    ///
    /// # Errors
    /// Implementations should report failures via `TrainErr` rather than
    /// panic.
    fn gradients(&mut self, x: f64, y: f64, y_hat: f64, params: &ParamMap) -> Result<ParamMap>;
}

/// A rule that forwards to a user-supplied analytic gradient function.
///
/// Pure pass-through: no validation, no side effects. The user's math is the
/// single source of truth for how learning happens under this rule.
pub struct ManualGradient<G> {
    grad_fn: G,
}

/// Wraps an analytic gradient function as a [`GradientRule`].
pub fn manual_gradient<G>(grad_fn: G) -> ManualGradient<G>
where
    G: FnMut(f64, f64, f64, &ParamMap) -> ParamMap,
{
    ManualGradient { grad_fn }
}

impl<G> GradientRule for ManualGradient<G>
where
    G: FnMut(f64, f64, f64, &ParamMap) -> ParamMap,
{
    fn gradients(&mut self, x: f64, y: f64, y_hat: f64, params: &ParamMap) -> Result<ParamMap> {
        Ok((self.grad_fn)(x, y, y_hat, params))
    }
}

/// Numerical gradient estimation by forward finite differences.
///
/// Lets callers train without analytic gradients, at the cost of one extra
/// predict + loss evaluation per parameter per call. The estimate is
/// sensitive to `eps`: larger values are robust to floating-point
/// cancellation but biased by curvature, smaller values approach the true
/// derivative but amplify rounding noise. No automatic `eps` selection is
/// performed.
///
/// The rule closes over its own predict and loss functions at construction
/// time, so the training loop's signature stays the same no matter which rule
/// plugs in.
pub struct FiniteDifference<P, L> {
    eps: f64,
    predict: P,
    loss: L,
    // Perturbations happen on this clone so the live params stay untouched.
    scratch: ParamMap,
}

impl<P: Predictor, L: LossFn> FiniteDifference<P, L> {
    /// Creates a finite-difference rule.
    ///
    /// # Args
    /// * `eps` - Perturbation size; must be finite and strictly positive.
    /// * `predict` - The model's prediction function.
    /// * `loss` - The per-sample loss function.
    ///
    /// # Errors
    /// Returns `TrainErr::InvalidArgument` if `eps` is not finite and
    /// strictly positive.
    pub fn new(eps: f64, predict: P, loss: L) -> Result<Self> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(TrainErr::InvalidArgument("eps must be strictly positive"));
        }

        Ok(Self {
            eps,
            predict,
            loss,
            scratch: ParamMap::new(),
        })
    }

    /// Returns the perturbation size.
    pub fn eps(&self) -> f64 {
        self.eps
    }
}

impl<P: Predictor, L: LossFn> GradientRule for FiniteDifference<P, L> {
    /// Estimates one gradient per parameter, in insertion order.
    ///
    /// For each parameter the rule adds `eps`, re-predicts, measures the loss
    /// change against the unperturbed base loss, and restores the original
    /// value before moving on, so perturbations never compound.
    fn gradients(&mut self, x: f64, y: f64, y_hat: f64, params: &ParamMap) -> Result<ParamMap> {
        let base_loss = (self.loss)(y_hat, y);

        self.scratch.clone_from(params);
        let mut grads = ParamMap::with_capacity(params.len());

        for (name, original) in params.iter() {
            if let Some(value) = self.scratch.get_mut(name) {
                *value = original + self.eps;
            }

            let y_hat_eps = (self.predict)(x, &self.scratch);
            let loss_eps = (self.loss)(y_hat_eps, y);
            grads.insert(name, (loss_eps - base_loss) / self.eps);

            if let Some(value) = self.scratch.get_mut(name) {
                *value = original;
            }
        }

        Ok(grads)
    }
}
