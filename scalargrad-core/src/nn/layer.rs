use crate::error::ScalarGradError;
use crate::graph::{Graph, Value};
use crate::nn::module::Module;
use crate::nn::neuron::Neuron;
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;

/// A fully-connected layer: `n_outputs` neurons all consuming the same
/// input vector.
#[derive(Debug)]
pub struct Layer<'g, F: Float> {
    neurons: Vec<Neuron<'g, F>>,
    n_inputs: usize,
}

impl<'g, F: Float> Layer<'g, F> {
    pub fn new<R>(
        graph: &'g Graph<F>,
        n_inputs: usize,
        n_outputs: usize,
        nonlinear: bool,
        rng: &mut R,
    ) -> Result<Self, ScalarGradError>
    where
        F: SampleUniform,
        R: Rng + ?Sized,
    {
        if n_outputs == 0 {
            return Err(ScalarGradError::EmptyNetwork {
                reason: "layer requires at least one neuron".to_string(),
            });
        }
        let neurons = (0..n_outputs)
            .map(|_| Neuron::new(graph, n_inputs, nonlinear, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Layer { neurons, n_inputs })
    }

    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    pub fn n_outputs(&self) -> usize {
        self.neurons.len()
    }

    /// Applies every neuron to the same input sequence.
    ///
    /// The width check happens once up front, before any neuron has
    /// constructed a node.
    pub fn forward(&self, inputs: &[Value<'g, F>]) -> Result<Vec<Value<'g, F>>, ScalarGradError> {
        if inputs.len() != self.n_inputs {
            return Err(ScalarGradError::ShapeMismatch {
                expected: self.n_inputs,
                actual: inputs.len(),
                operation: "Layer::forward".to_string(),
            });
        }
        self.neurons
            .iter()
            .map(|neuron| neuron.forward(inputs))
            .collect()
    }
}

impl<'g, F: Float> Module<'g, F> for Layer<'g, F> {
    fn parameters(&self) -> Vec<Value<'g, F>> {
        self.neurons
            .iter()
            .flat_map(|neuron| neuron.parameters())
            .collect()
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_layer_output_width() {
        let g = Graph::new();
        let mut rng = StdRng::seed_from_u64(9);
        let layer = Layer::new(&g, 3, 5, true, &mut rng).unwrap();
        assert_eq!(layer.n_inputs(), 3);
        assert_eq!(layer.n_outputs(), 5);

        let x = [g.value(0.1), g.value(0.2), g.value(0.3)];
        let out = layer.forward(&x).unwrap();
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_layer_parameter_count() {
        let g: Graph<f64> = Graph::new();
        let mut rng = StdRng::seed_from_u64(9);
        let layer = Layer::new(&g, 4, 2, true, &mut rng).unwrap();
        // Two neurons, each 4 weights + 1 bias.
        assert_eq!(layer.parameters().len(), 10);
    }

    #[test]
    fn test_layer_shape_mismatch_leaves_graph_untouched() {
        let g = Graph::new();
        let mut rng = StdRng::seed_from_u64(9);
        let layer = Layer::new(&g, 2, 3, false, &mut rng).unwrap();
        let x = [g.value(1.0)];
        let len_before = g.len();

        let err = layer.forward(&x).unwrap_err();
        assert!(matches!(err, ScalarGradError::ShapeMismatch { .. }));
        assert_eq!(g.len(), len_before);
    }

    #[test]
    fn test_zero_neurons_rejected() {
        let g: Graph<f64> = Graph::new();
        let mut rng = StdRng::seed_from_u64(9);
        let err = Layer::new(&g, 3, 0, true, &mut rng).unwrap_err();
        assert!(matches!(err, ScalarGradError::EmptyNetwork { .. }));
    }
}
