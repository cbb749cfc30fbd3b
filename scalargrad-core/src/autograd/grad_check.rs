use crate::graph::{Graph, Value};
use num_traits::Float;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
///
/// Values are reported as `f64` regardless of the graph's float type, for
/// uniform precision in messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}: analytical grad {analytical:?} != numerical grad {numerical:?} (difference {difference:?})")]
    GradientMismatch {
        input_index: usize,
        analytical: f64,
        numerical: f64,
        difference: f64,
    },

    #[error("Numerical gradient is NaN or infinite for input {input_index}. Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NonFiniteNumerical {
        input_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Analytical gradient is NaN or infinite for input {input_index}. Value: {value:?}")]
    NonFiniteAnalytical { input_index: usize, value: f64 },
}

/// Checks analytical gradients against central finite differences.
///
/// `builder` constructs the expression under test on a fresh graph from a
/// slice of leaf handles; it is invoked once for the analytical backward
/// pass and twice per input for the `(f(x+ε) - f(x-ε)) / 2ε` estimate.
///
/// # Arguments
/// * `builder`: Builds the scalar output from the given graph and leaves.
/// * `inputs`: The leaf values at which to check.
/// * `epsilon`: Finite-difference step (1e-4 is a reasonable default for f64).
/// * `tolerance`: Maximum allowed absolute difference per input.
pub fn check_gradients<F, B>(
    builder: B,
    inputs: &[F],
    epsilon: F,
    tolerance: F,
) -> Result<(), GradCheckError>
where
    F: Float,
    B: for<'g> Fn(&'g Graph<F>, &[Value<'g, F>]) -> Value<'g, F>,
{
    // Analytical gradients from one forward + backward pass.
    let graph = Graph::with_capacity(inputs.len());
    let leaves: Vec<Value<'_, F>> = inputs.iter().map(|&x| graph.value(x)).collect();
    let output = builder(&graph, &leaves);
    output.backward();
    let analytical: Vec<F> = leaves.iter().map(|leaf| leaf.grad()).collect();

    let eval = |points: &[F]| -> F {
        let graph = Graph::with_capacity(points.len());
        let leaves: Vec<Value<'_, F>> = points.iter().map(|&x| graph.value(x)).collect();
        builder(&graph, &leaves).data()
    };

    let two = F::one() + F::one();
    let mut perturbed = inputs.to_vec();

    for (i, &x) in inputs.iter().enumerate() {
        let analytical_i = analytical[i];
        if !analytical_i.is_finite() {
            return Err(GradCheckError::NonFiniteAnalytical {
                input_index: i,
                value: as_f64(analytical_i),
            });
        }

        perturbed[i] = x + epsilon;
        let loss_plus = eval(&perturbed);
        perturbed[i] = x - epsilon;
        let loss_minus = eval(&perturbed);
        perturbed[i] = x;

        if !loss_plus.is_finite() || !loss_minus.is_finite() {
            return Err(GradCheckError::NonFiniteNumerical {
                input_index: i,
                loss_plus: as_f64(loss_plus),
                loss_minus: as_f64(loss_minus),
            });
        }
        let numerical = (loss_plus - loss_minus) / (two * epsilon);

        let difference = (analytical_i - numerical).abs();
        if difference > tolerance {
            return Err(GradCheckError::GradientMismatch {
                input_index: i,
                analytical: as_f64(analytical_i),
                numerical: as_f64(numerical),
                difference: as_f64(difference),
            });
        }
    }
    Ok(())
}

fn as_f64<F: Float>(x: F) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite<'g>(_g: &'g Graph<f64>, xs: &[Value<'g, f64>]) -> Value<'g, f64> {
        // (a * b + a^3).tanh() + a / b: exercises every differentiable op
        // plus fan-out on both leaves.
        let (a, b) = (xs[0], xs[1]);
        a.mul(b).add(a.powf(3.0)).tanh().add(a.div(b))
    }

    fn relu_chain<'g>(_g: &'g Graph<f64>, xs: &[Value<'g, f64>]) -> Value<'g, f64> {
        xs[0].mul(2.0).relu().add(xs[0].exp().relu())
    }

    #[test]
    fn test_composite_expression_matches_finite_differences() {
        check_gradients(composite, &[0.4, -0.7], 1e-4, 1e-6).unwrap();
        check_gradients(composite, &[1.2, 0.9], 1e-4, 1e-6).unwrap();
    }

    #[test]
    fn test_relu_chain_away_from_kink() {
        check_gradients(relu_chain, &[0.8], 1e-4, 1e-6).unwrap();
        check_gradients(relu_chain, &[-0.6], 1e-4, 1e-6).unwrap();
    }

    #[test]
    fn test_non_finite_analytical_is_reported() {
        fn sqrt_at_zero<'g>(_g: &'g Graph<f64>, xs: &[Value<'g, f64>]) -> Value<'g, f64> {
            // x^0.5 at x = 0: value is 0 but the derivative is infinite.
            xs[0].powf(0.5)
        }
        let err = check_gradients(sqrt_at_zero, &[0.0], 1e-4, 1e-6).unwrap_err();
        assert!(matches!(
            err,
            GradCheckError::NonFiniteAnalytical { input_index: 0, .. }
        ));
    }

    #[test]
    fn test_mismatch_is_detected() {
        // relu right at the kink: analytical picks one side, the central
        // difference straddles it, so the check must fail.
        fn relu_at_kink<'g>(_g: &'g Graph<f64>, xs: &[Value<'g, f64>]) -> Value<'g, f64> {
            xs[0].relu()
        }
        let err = check_gradients(relu_at_kink, &[0.0], 1e-4, 1e-6).unwrap_err();
        assert!(matches!(err, GradCheckError::GradientMismatch { .. }));
    }
}
