use crate::graph::Value;
use num_traits::Float;

/// The base trait for all neural network modules (neurons, layers, containers).
///
/// A module is a composition of trainable leaf nodes living in some graph
/// arena. The trait exposes the flattened parameter list for an external
/// optimizer (which reads each parameter's `grad()`, updates its value with
/// `set_data`, and then calls [`Module::zero_grad`]). It does not prescribe
/// a forward signature, since output arity differs per module kind.
pub trait Module<'g, F: Float + 'g> {
    /// Returns every trainable parameter of the module, flattened in
    /// insertion order (weights before bias, neuron by neuron, layer by
    /// layer for the composite modules).
    fn parameters(&self) -> Vec<Value<'g, F>>;

    /// Resets the gradient of all parameters to zero.
    ///
    /// Required between backward passes when gradients should not
    /// accumulate across training iterations.
    fn zero_grad(&self) {
        for parameter in self.parameters() {
            parameter.zero_grad();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, Value};

    struct PairModule<'g> {
        a: Value<'g, f64>,
        b: Value<'g, f64>,
    }

    impl<'g> Module<'g, f64> for PairModule<'g> {
        fn parameters(&self) -> Vec<Value<'g, f64>> {
            vec![self.a, self.b]
        }
    }

    #[test]
    fn test_default_zero_grad_covers_all_parameters() {
        let g = Graph::new();
        let module = PairModule {
            a: g.value(1.0),
            b: g.value(2.0),
        };
        let loss = module.a.mul(module.b);
        loss.backward();
        assert_eq!(module.a.grad(), 2.0);
        assert_eq!(module.b.grad(), 1.0);

        module.zero_grad();
        assert_eq!(module.a.grad(), 0.0);
        assert_eq!(module.b.grad(), 0.0);
        // Non-parameter nodes are untouched.
        assert_eq!(loss.grad(), 1.0);
    }
}
