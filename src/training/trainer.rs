use super::{GradientRule, LossFn, Predictor, StepState};
use crate::{
    error::Result,
    params::{DataPoint, ParamMap},
};

/// Plain batch gradient descent over a dataset of scalar samples.
///
/// The trainer holds the run configuration (predict, loss, rule, step count,
/// learning rate) and mutates the caller's [`ParamMap`] in place, so training
/// is a visible side effect on the caller's parameters.
///
/// Three observation surfaces share one per-step routine and therefore cannot
/// diverge: [`train`](Trainer::train) returns the loss history,
/// [`train_with_observer`](Trainer::train_with_observer) additionally invokes
/// a callback per completed step, and [`train_iter`](Trainer::train_iter)
/// yields a [`StepState`] lazily, one training step per `next()` call.
pub struct Trainer<P, L, R> {
    predict: P,
    loss: L,
    rule: R,
    steps: usize,
    lr: f64,
}

impl<P, L, R> Trainer<P, L, R>
where
    P: Predictor,
    L: LossFn,
    R: GradientRule,
{
    /// Creates a new `Trainer`.
    ///
    /// # Args
    /// * `predict` - The model's prediction function.
    /// * `loss` - The per-sample loss function.
    /// * `rule` - The gradient rule (analytic or estimated).
    /// * `steps` - Number of full passes over the dataset.
    /// * `lr` - Learning rate.
    pub fn new(predict: P, loss: L, rule: R, steps: usize, lr: f64) -> Self {
        Self {
            predict,
            loss,
            rule,
            steps,
            lr,
        }
    }

    /// Returns the configured step count.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the configured learning rate.
    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Runs `steps` training steps, mutating `params` in place.
    ///
    /// # Returns
    /// The mean loss of each step, in step order. The history length always
    /// equals `steps`.
    ///
    /// Quirk, kept for compatibility with existing consumers: with an empty
    /// dataset no loss can be computed, so the history is `steps` zeros and
    /// no update happens, while [`train_iter`](Trainer::train_iter) yields
    /// nothing at all for the same inputs.
    ///
    /// # Errors
    /// Propagates the first error the gradient rule reports; `params` keeps
    /// the values of the last completed step.
    pub fn train(&mut self, data: &[DataPoint], params: &mut ParamMap) -> Result<Vec<f64>> {
        self.train_with_observer(data, params, |_| {})
    }

    /// Like [`train`](Trainer::train), invoking `observer` synchronously once
    /// per completed step with that step's [`StepState`].
    ///
    /// The observer is purely a side effect: it cannot alter the returned
    /// history or the training outcome. With an empty dataset it never fires.
    pub fn train_with_observer(
        &mut self,
        data: &[DataPoint],
        params: &mut ParamMap,
        mut observer: impl FnMut(&StepState),
    ) -> Result<Vec<f64>> {
        if data.is_empty() {
            return Ok(vec![0.0; self.steps]);
        }

        let mut history = Vec::with_capacity(self.steps);
        for state in self.train_iter(data, params) {
            let state = state?;
            history.push(state.loss());
            observer(&state);
        }

        Ok(history)
    }

    /// Returns a lazy iterator that runs exactly one training step per
    /// `next()` call and yields that step's [`StepState`].
    ///
    /// Dropping the iterator early stops further updates; `params` keeps the
    /// values of the last step actually taken. An empty dataset yields
    /// nothing.
    pub fn train_iter<'t>(
        &'t mut self,
        data: &'t [DataPoint],
        params: &'t mut ParamMap,
    ) -> StepIter<'t, P, L, R> {
        StepIter {
            predict: &self.predict,
            loss: &self.loss,
            rule: &mut self.rule,
            data,
            params,
            lr: self.lr,
            step: 0,
            steps: self.steps,
            failed: false,
        }
    }
}

/// Pull-driven training: each `next()` advances the loop by one step.
pub struct StepIter<'t, P, L, R> {
    predict: &'t P,
    loss: &'t L,
    rule: &'t mut R,
    data: &'t [DataPoint],
    params: &'t mut ParamMap,
    lr: f64,
    step: usize,
    steps: usize,
    failed: bool,
}

impl<P, L, R> Iterator for StepIter<'_, P, L, R>
where
    P: Predictor,
    L: LossFn,
    R: GradientRule,
{
    type Item = Result<StepState>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.step >= self.steps || self.data.is_empty() {
            return None;
        }

        let state = run_step(
            self.step,
            self.data,
            self.params,
            self.predict,
            self.loss,
            self.rule,
            self.lr,
        );

        // Fuse after the first error; a half-applied step must not be retried.
        self.failed = state.is_err();
        self.step += 1;
        Some(state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.failed || self.data.is_empty() {
            0
        } else {
            self.steps - self.step
        };

        (remaining, Some(remaining))
    }
}

/// One full pass over the dataset followed by one parameter update.
///
/// Gradients for every sample are computed against the step's starting
/// parameters; nothing is written to `params` until the whole dataset has
/// been consumed, so sample order cannot influence the gradients.
fn run_step<P, L, R>(
    step: usize,
    data: &[DataPoint],
    params: &mut ParamMap,
    predict: &P,
    loss: &L,
    rule: &mut R,
    lr: f64,
) -> Result<StepState>
where
    P: Predictor,
    L: LossFn,
    R: GradientRule,
{
    let mut acc = params.zeroed();
    let mut total_loss = 0.0;

    for &(x, y) in data {
        let y_hat = predict(x, params);
        total_loss += loss(y_hat, y);

        let grads = rule.gradients(x, y, y_hat, params)?;
        for (name, value) in grads.iter() {
            acc.add(name, value);
        }
    }

    // Average over the dataset so the learning rate is stable with respect
    // to dataset size.
    let n = data.len() as f64;
    acc.scale(1.0 / n);

    // Gradient keys are contractually a subset of the parameter names; any
    // stray accumulator entry is ignored rather than inventing a parameter.
    for (name, grad) in acc.iter() {
        if let Some(value) = params.get_mut(name) {
            *value -= lr * grad;
        }
    }

    Ok(StepState::new(step, total_loss / n, params.clone(), acc))
}
