use crate::graph::Value;
use crate::node::{Node, Op};
use num_traits::Float;

impl<'g, F: Float> Value<'g, F> {
    /// Rectified Linear Unit: `max(0, self)`.
    ///
    /// Backward passes the gradient through only where the input was
    /// strictly positive.
    pub fn relu(self) -> Value<'g, F> {
        let data = self.data().max(F::zero());
        self.graph().push(Node::new(data, Op::Relu(self.id)))
    }

    /// Hyperbolic tangent. Backward uses the closed form `1 - tanh(x)^2`,
    /// read from this node's own output value.
    pub fn tanh(self) -> Value<'g, F> {
        let data = self.data().tanh();
        self.graph().push(Node::new(data, Op::Tanh(self.id)))
    }
}
