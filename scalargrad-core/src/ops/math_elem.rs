use crate::graph::Value;
use crate::node::{Node, Op};
use num_traits::Float;

impl<'g, F: Float> Value<'g, F> {
    /// Natural exponential `e^self`.
    ///
    /// The derivative is the output itself, so backward reads this node's
    /// value. Overflow saturates to infinity per IEEE semantics.
    pub fn exp(self) -> Value<'g, F> {
        let data = self.data().exp();
        self.graph().push(Node::new(data, Op::Exp(self.id)))
    }
}
