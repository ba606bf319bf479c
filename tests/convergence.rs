//! End-to-end convergence checks for every registered scenario, driven
//! through the scenario registry so the tests and the plots stay in sync.

use nanograd::{scenarios::get_scenario, FiniteDifference, Trainer};

#[test]
fn test_single_point_fit_reduces_loss() {
    let mut s = get_scenario("single_point").unwrap();
    let mut trainer = s.trainer();

    let history = trainer.train(&s.data, &mut s.params).unwrap();

    // End-to-end decrease is the acceptance bar; monotonic decrease is a
    // stricter property that lr=0.1 does not promise.
    assert!(history[0] > history[history.len() - 1]);
    assert!(s.params["w"] > 0.0);
    assert!(s.params["b"] > 0.0);
}

#[test]
fn test_multi_point_linear_fit_no_bias() {
    let mut s = get_scenario("multi_point_no_bias").unwrap();
    let mut trainer = s.trainer();

    let history = trainer.train(&s.data, &mut s.params).unwrap();

    assert!(history[0] > history[history.len() - 1]);
    // Slope should move toward the true value 2.
    assert!(s.params["w"] > 0.5, "w = {}", s.params["w"]);
}

#[test]
fn test_linear_fit_with_bias() {
    let mut s = get_scenario("with_bias").unwrap();
    let mut trainer = s.trainer();

    let history = trainer.train(&s.data, &mut s.params).unwrap();

    assert!(history[0] > history[history.len() - 1]);
    // Both parameters should move toward their expected values (w~2, b~1).
    assert!(s.params["w"] > 0.5, "w = {}", s.params["w"]);
    assert!(s.params["b"] > 0.2, "b = {}", s.params["b"]);
}

#[test]
fn test_constant_target_bias_dominates() {
    let mut s = get_scenario("constant_target").unwrap();
    let mut trainer = s.trainer();

    let history = trainer.train(&s.data, &mut s.params).unwrap();

    assert!(history[0] > history[history.len() - 1]);
    // Bias should move upward toward 5, slope downward toward 0.
    assert!(s.params["b"] > 1.0, "b = {}", s.params["b"]);
    assert!(s.params["w"] < 1.0, "w = {}", s.params["w"]);
}

#[test]
fn test_noisy_linear_data_decreases_loss() {
    let mut s = get_scenario("noisy_linear").unwrap();
    let mut trainer = s.trainer();

    let history = trainer.train(&s.data, &mut s.params).unwrap();

    assert!(history[0] > history[history.len() - 1]);
    // The data is imperfect, so the loss must settle above zero.
    assert!(history[history.len() - 1] > 0.0);
}

#[test]
fn test_finite_difference_rule_learns_without_gradients() {
    let mut s = get_scenario("single_point").unwrap();

    // eps trades off accuracy against numeric noise; it stays explicit to
    // signal that finite differences are a modeling choice, not magic.
    let rule = FiniteDifference::new(1e-3, s.predict, s.loss).unwrap();
    let mut trainer = Trainer::new(s.predict, s.loss, rule, 12, 0.1);

    let history = trainer.train(&s.data, &mut s.params).unwrap();

    assert!(history[0] > history[history.len() - 1]);
    assert!(s.params["w"] > 0.0);
    assert!(s.params["b"] > 0.0);
}

#[test]
fn test_finite_difference_moves_params_in_the_analytic_direction() {
    let mut analytic = get_scenario("single_point").unwrap();
    let mut trainer = analytic.trainer();
    trainer.train(&analytic.data, &mut analytic.params).unwrap();

    let mut estimated = get_scenario("single_point").unwrap();
    let rule = FiniteDifference::new(1e-3, estimated.predict, estimated.loss).unwrap();
    let mut trainer = Trainer::new(estimated.predict, estimated.loss, rule, 12, 0.1);
    trainer.train(&estimated.data, &mut estimated.params).unwrap();

    for name in ["w", "b"] {
        assert_eq!(
            analytic.params[name].signum(),
            estimated.params[name].signum(),
            "{name} moved in a different direction under finite differences"
        );
    }
}
