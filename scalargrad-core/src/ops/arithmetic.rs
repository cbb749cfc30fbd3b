use crate::graph::{Graph, Value};
use crate::node::{Node, Op};
use num_traits::Float;

/// Conversion applied at every operation boundary.
///
/// A [`Value`] passes through unchanged (after checking it belongs to the
/// same arena); a raw float is wrapped as a fresh constant leaf. This is the
/// explicit coercion point that lets expressions mix node handles and plain
/// numbers, with operand typing enforced at compile time by this bound.
pub trait IntoOperand<'g, F: Float> {
    fn into_operand(self, graph: &'g Graph<F>) -> Value<'g, F>;
}

impl<'g, F: Float> IntoOperand<'g, F> for Value<'g, F> {
    /// # Panics
    /// Panics if the value was created on a different [`Graph`]: node ids are
    /// only meaningful inside their own arena, so mixing graphs is a
    /// construction-time programming error, not a recoverable condition.
    fn into_operand(self, graph: &'g Graph<F>) -> Value<'g, F> {
        assert!(
            std::ptr::eq(self.graph(), graph),
            "operand belongs to a different graph"
        );
        self
    }
}

impl<'g, F: Float> IntoOperand<'g, F> for F {
    fn into_operand(self, graph: &'g Graph<F>) -> Value<'g, F> {
        graph.constant(self)
    }
}

impl<'g, F: Float> Value<'g, F> {
    /// `self + rhs`. Backward distributes the output gradient unchanged to
    /// both operands.
    pub fn add(self, rhs: impl IntoOperand<'g, F>) -> Value<'g, F> {
        let rhs = rhs.into_operand(self.graph());
        let data = self.data() + rhs.data();
        self.graph().push(Node::new(data, Op::Add(self.id, rhs.id)))
    }

    /// `self * rhs`. Backward routes each operand the other operand's value
    /// times the output gradient.
    pub fn mul(self, rhs: impl IntoOperand<'g, F>) -> Value<'g, F> {
        let rhs = rhs.into_operand(self.graph());
        let data = self.data() * rhs.data();
        self.graph().push(Node::new(data, Op::Mul(self.id, rhs.id)))
    }

    /// `self` raised to a fixed real exponent (the exponent is not a node).
    ///
    /// Numeric edge cases follow IEEE semantics: a negative base with a
    /// non-integer exponent yields NaN in `data` and, after backward, in the
    /// operand's gradient, rather than raising an error.
    pub fn powf(self, exponent: F) -> Value<'g, F> {
        let data = self.data().powf(exponent);
        self.graph()
            .push(Node::new(data, Op::Pow(self.id, exponent)))
    }

    /// `-self`, as multiplication by a constant −1 leaf.
    pub fn neg(self) -> Value<'g, F> {
        self.mul(self.graph().constant(-F::one()))
    }

    /// `self - rhs`, as `self + (-rhs)`.
    pub fn sub(self, rhs: impl IntoOperand<'g, F>) -> Value<'g, F> {
        let rhs = rhs.into_operand(self.graph());
        self.add(rhs.neg())
    }

    /// `self / rhs`, as `self * rhs⁻¹`. Division by zero propagates IEEE
    /// infinities/NaN through values and gradients.
    pub fn div(self, rhs: impl IntoOperand<'g, F>) -> Value<'g, F> {
        let rhs = rhs.into_operand(self.graph());
        self.mul(rhs.powf(-F::one()))
    }
}
