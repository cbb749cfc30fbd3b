use crate::error::ScalarGradError;
use crate::graph::{Graph, Value};
use crate::nn::init;
use crate::nn::module::Module;
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;

/// A single unit of a feed-forward layer.
///
/// Holds one weight leaf per input, one bias leaf, and a flag selecting
/// whether the weighted sum is passed through `tanh`. The leaves are
/// persistent parameters in the owning graph.
#[derive(Debug)]
pub struct Neuron<'g, F: Float> {
    weights: Vec<Value<'g, F>>,
    bias: Value<'g, F>,
    nonlinear: bool,
}

impl<'g, F: Float> Neuron<'g, F> {
    /// Creates a neuron with `n_inputs` weights drawn `Uniform[-1, 1]` from
    /// the supplied RNG and a zero-initialized bias.
    pub fn new<R>(
        graph: &'g Graph<F>,
        n_inputs: usize,
        nonlinear: bool,
        rng: &mut R,
    ) -> Result<Self, ScalarGradError>
    where
        F: SampleUniform,
        R: Rng + ?Sized,
    {
        if n_inputs == 0 {
            return Err(ScalarGradError::EmptyNetwork {
                reason: "neuron requires at least one input".to_string(),
            });
        }
        let weights = (0..n_inputs)
            .map(|_| graph.value(init::standard_weight(rng)))
            .collect();
        let bias = graph.value(F::zero());
        Ok(Neuron {
            weights,
            bias,
            nonlinear,
        })
    }

    pub fn n_inputs(&self) -> usize {
        self.weights.len()
    }

    /// Computes `sum(w_i * x_i) + b`, then `tanh` if the neuron is nonlinear.
    ///
    /// The input width is validated before any node is constructed, so a
    /// failed call leaves the graph untouched.
    pub fn forward(&self, inputs: &[Value<'g, F>]) -> Result<Value<'g, F>, ScalarGradError> {
        if inputs.len() != self.weights.len() {
            return Err(ScalarGradError::ShapeMismatch {
                expected: self.weights.len(),
                actual: inputs.len(),
                operation: "Neuron::forward".to_string(),
            });
        }

        let mut pre_activation = self.bias;
        for (&weight, &input) in self.weights.iter().zip(inputs) {
            pre_activation = pre_activation.add(weight.mul(input));
        }
        Ok(if self.nonlinear {
            pre_activation.tanh()
        } else {
            pre_activation
        })
    }
}

impl<'g, F: Float> Module<'g, F> for Neuron<'g, F> {
    fn parameters(&self) -> Vec<Value<'g, F>> {
        let mut params = self.weights.clone();
        params.push(self.bias);
        params
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(1234)
    }

    #[test]
    fn test_neuron_parameter_count_and_order() {
        let g = Graph::new();
        let neuron = Neuron::new(&g, 3, true, &mut test_rng()).unwrap();
        let params = neuron.parameters();
        assert_eq!(params.len(), 4);
        // Bias is last and zero-initialized; weights precede it.
        assert_eq!(params[3].data(), 0.0);
        for weight in &params[..3] {
            assert!((-1.0..=1.0).contains(&weight.data()));
        }
    }

    #[test]
    fn test_forward_linear_with_known_weights() {
        let g = Graph::new();
        let neuron = Neuron::new(&g, 2, false, &mut test_rng()).unwrap();
        let params = neuron.parameters();
        params[0].set_data(3.0).unwrap();
        params[1].set_data(4.0).unwrap();
        params[2].set_data(0.5).unwrap();

        let x = [g.value(10.0), g.value(20.0)];
        let out = neuron.forward(&x).unwrap();
        assert_eq!(out.data(), 3.0 * 10.0 + 4.0 * 20.0 + 0.5);
        assert_eq!(out.op_label(), Some("add"));
    }

    #[test]
    fn test_forward_applies_tanh_when_nonlinear() {
        let g = Graph::new();
        let neuron = Neuron::new(&g, 1, true, &mut test_rng()).unwrap();
        let params = neuron.parameters();
        params[0].set_data(0.5).unwrap();
        params[1].set_data(0.1).unwrap();

        let out = neuron.forward(&[g.value(1.0)]).unwrap();
        assert_eq!(out.op_label(), Some("tanh"));
        assert!((out.data() - 0.6_f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch_before_node_construction() {
        let g = Graph::new();
        let neuron = Neuron::new(&g, 3, true, &mut test_rng()).unwrap();
        let x = [g.value(1.0), g.value(2.0)];
        let len_before = g.len();

        let err = neuron.forward(&x).unwrap_err();
        assert_eq!(
            err,
            ScalarGradError::ShapeMismatch {
                expected: 3,
                actual: 2,
                operation: "Neuron::forward".to_string()
            }
        );
        assert_eq!(g.len(), len_before);
    }

    #[test]
    fn test_zero_inputs_rejected() {
        let g: Graph<f64> = Graph::new();
        let err = Neuron::new(&g, 0, true, &mut test_rng()).unwrap_err();
        assert!(matches!(err, ScalarGradError::EmptyNetwork { .. }));
    }

    #[test]
    fn test_backward_reaches_all_parameters() {
        let g = Graph::new();
        let neuron = Neuron::new(&g, 2, true, &mut test_rng()).unwrap();
        let x = [g.value(0.5), g.value(-0.25)];
        let out = neuron.forward(&x).unwrap();
        out.backward();

        for param in neuron.parameters() {
            // tanh keeps the pre-activation gradient nonzero, and inputs are
            // nonzero, so every weight and the bias must receive gradient.
            assert!(param.grad() != 0.0);
            assert!(param.grad().is_finite());
        }
    }
}
