use crate::graph::Value;
use approx::abs_diff_eq;

/// Checks that two scalars are approximately equal.
/// Panics with a descriptive message if they differ by more than `tolerance`.
pub fn check_scalar_near(actual: f64, expected: f64, tolerance: f64) {
    if !abs_diff_eq!(actual, expected, epsilon = tolerance) {
        panic!(
            "Scalar mismatch: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
            actual,
            expected,
            (actual - expected).abs(),
            tolerance
        );
    }
}

/// Checks a node's forward value and accumulated gradient within tolerance.
pub fn check_value_near(
    value: Value<'_, f64>,
    expected_data: f64,
    expected_grad: f64,
    tolerance: f64,
) {
    check_scalar_near(value.data(), expected_data, tolerance);
    check_scalar_near(value.grad(), expected_grad, tolerance);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_check_value_near_accepts_exact_results() {
        let g = Graph::new();
        let a = g.value(2.0);
        let b = a.mul(a);
        b.backward();
        check_value_near(a, 2.0, 4.0, 1e-12);
        check_value_near(b, 4.0, 1.0, 1e-12);
    }

    #[test]
    #[should_panic(expected = "Scalar mismatch")]
    fn test_check_scalar_near_rejects_out_of_tolerance() {
        check_scalar_near(1.0, 1.1, 1e-3);
    }
}
