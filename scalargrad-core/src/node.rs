use num_traits::Float;

/// Stable index of a node inside its owning [`Graph`](crate::graph::Graph) arena.
///
/// Indices are assigned in creation order and never move, so an operand's id is
/// always strictly smaller than the id of any node consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// The operation that produced a node, together with its operand ids.
///
/// This is the closed variant set the backward engine dispatches on; there are
/// no per-node closures. `Pow` carries its exponent as a plain constant, not
/// as a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Op<F> {
    Leaf,
    Add(NodeId, NodeId),
    Mul(NodeId, NodeId),
    Pow(NodeId, F),
    Relu(NodeId),
    Tanh(NodeId),
    Exp(NodeId),
}

impl<F> Op<F> {
    /// Diagnostic tag of the producing operation; `None` for leaves.
    pub(crate) fn label(&self) -> Option<&'static str> {
        match self {
            Op::Leaf => None,
            Op::Add(..) => Some("add"),
            Op::Mul(..) => Some("mul"),
            Op::Pow(..) => Some("pow"),
            Op::Relu(..) => Some("relu"),
            Op::Tanh(..) => Some("tanh"),
            Op::Exp(..) => Some("exp"),
        }
    }

    /// Iterates the node's predecessors in operand order (empty for leaves).
    pub(crate) fn operands(&self) -> impl Iterator<Item = NodeId> {
        let pair = match *self {
            Op::Leaf => [None, None],
            Op::Add(a, b) | Op::Mul(a, b) => [Some(a), Some(b)],
            Op::Pow(a, _) | Op::Relu(a) | Op::Tanh(a) | Op::Exp(a) => [Some(a), None],
        };
        pair.into_iter().flatten()
    }
}

/// A single scalar node: forward value, accumulated gradient, producing op.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node<F> {
    pub(crate) data: F,
    pub(crate) grad: F,
    pub(crate) op: Op<F>,
}

impl<F: Float> Node<F> {
    pub(crate) fn new(data: F, op: Op<F>) -> Self {
        Node {
            data,
            grad: F::zero(),
            op,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.op, Op::Leaf)
    }
}
