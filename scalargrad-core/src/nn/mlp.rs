use crate::error::ScalarGradError;
use crate::graph::{Graph, Value};
use crate::nn::layer::Layer;
use crate::nn::module::Module;
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;

/// A multilayer perceptron: a stack of fully-connected layers where layer
/// `i`'s outputs feed layer `i + 1`'s inputs.
///
/// The final layer omits the nonlinearity so the network can produce
/// unbounded regression or logit outputs.
#[derive(Debug)]
pub struct Mlp<'g, F: Float> {
    layers: Vec<Layer<'g, F>>,
}

impl<'g, F: Float> Mlp<'g, F> {
    /// Creates a network from `sizes`, where `sizes[0]` is the input width
    /// and each following entry is a layer's output width.
    ///
    /// All parameters are drawn from the supplied RNG, so a seeded generator
    /// reproduces the network exactly.
    pub fn new<R>(graph: &'g Graph<F>, sizes: &[usize], rng: &mut R) -> Result<Self, ScalarGradError>
    where
        F: SampleUniform,
        R: Rng + ?Sized,
    {
        if sizes.len() < 2 {
            return Err(ScalarGradError::EmptyNetwork {
                reason: format!(
                    "MLP needs an input width and at least one layer width, got sizes {:?}",
                    sizes
                ),
            });
        }

        let n_layers = sizes.len() - 1;
        let mut layers = Vec::with_capacity(n_layers);
        for i in 0..n_layers {
            let nonlinear = i + 1 < n_layers;
            layers.push(Layer::new(graph, sizes[i], sizes[i + 1], nonlinear, rng)?);
        }
        log::debug!("constructed MLP with sizes {:?}", sizes);
        Ok(Mlp { layers })
    }

    pub fn n_inputs(&self) -> usize {
        self.layers.first().map(Layer::n_inputs).unwrap_or(0)
    }

    pub fn n_outputs(&self) -> usize {
        self.layers.last().map(Layer::n_outputs).unwrap_or(0)
    }

    /// Threads the inputs through each layer in order and returns the final
    /// layer's outputs.
    pub fn forward(&self, inputs: &[Value<'g, F>]) -> Result<Vec<Value<'g, F>>, ScalarGradError> {
        let mut activations = inputs.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations)?;
        }
        Ok(activations)
    }

    /// Like [`Mlp::forward`], for networks with exactly one output node.
    ///
    /// The output width is checked before the forward pass runs, so a
    /// mis-sized network fails without constructing any nodes.
    pub fn forward_scalar(&self, inputs: &[Value<'g, F>]) -> Result<Value<'g, F>, ScalarGradError> {
        let n_outputs = self.n_outputs();
        if n_outputs != 1 {
            return Err(ScalarGradError::ShapeMismatch {
                expected: 1,
                actual: n_outputs,
                operation: "Mlp::forward_scalar".to_string(),
            });
        }
        let outputs = self.forward(inputs)?;
        Ok(outputs[0])
    }
}

impl<'g, F: Float> Module<'g, F> for Mlp<'g, F> {
    fn parameters(&self) -> Vec<Value<'g, F>> {
        self.layers
            .iter()
            .flat_map(|layer| layer.parameters())
            .collect()
    }
}

// --- Tests ---
#[cfg(test)]
#[path = "mlp_test.rs"]
mod tests; // Link to the test file
