use crate::error::ScalarGradError;
use crate::node::{Node, NodeId, Op};
use num_traits::Float;
use std::cell::RefCell;
use std::fmt;

/// Arena owning every node of one computation graph.
///
/// Nodes are only ever appended, so an operand's index is always strictly
/// smaller than the index of any node that consumes it: the arena order is a
/// topological order by construction and the graph is acyclic by construction.
/// All interior mutability goes through a single `RefCell`, which keeps the
/// graph single-threaded (`!Sync`) on purpose.
#[derive(Debug, Default)]
pub struct Graph<F: Float> {
    pub(crate) nodes: RefCell<Vec<Node<F>>>,
}

/// Marker for the arena length at some point in time, used to discard the
/// transient non-leaf portion of the graph between training iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl<F: Float> Graph<F> {
    pub fn new() -> Self {
        Graph {
            nodes: RefCell::new(Vec::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Graph {
            nodes: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    /// Creates a leaf node (an input or trainable parameter).
    pub fn value(&self, data: F) -> Value<'_, F> {
        self.push(Node::new(data, Op::Leaf))
    }

    /// Creates a leaf node holding a fixed constant.
    ///
    /// Identical to [`Graph::value`] in structure; its gradient may still
    /// accumulate during backward but it has no operands to forward to. Raw
    /// floats mixed into expressions are wrapped through this path.
    pub fn constant(&self, data: F) -> Value<'_, F> {
        self.push(Node::new(data, Op::Leaf))
    }

    /// Number of nodes currently in the arena.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Resets the gradient of every node in the arena to zero.
    pub fn zero_grad(&self) {
        for node in self.nodes.borrow_mut().iter_mut() {
            node.grad = F::zero();
        }
    }

    /// Records the current arena length.
    ///
    /// Nodes created after a checkpoint (typically the non-leaf portion built
    /// by a forward pass) can be dropped with [`Graph::truncate`] once their
    /// gradients have been extracted into the persistent leaves.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.len())
    }

    /// Drops every node created after `checkpoint`.
    ///
    /// Any [`Value`] handle obtained after the checkpoint is invalidated;
    /// using one afterwards panics on its next arena access.
    pub fn truncate(&self, checkpoint: Checkpoint) {
        let mut nodes = self.nodes.borrow_mut();
        log::trace!(
            "truncate: dropping {} of {} nodes",
            nodes.len().saturating_sub(checkpoint.0),
            nodes.len()
        );
        nodes.truncate(checkpoint.0);
    }

    pub(crate) fn push(&self, node: Node<F>) -> Value<'_, F> {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(node);
        Value { graph: self, id }
    }
}

/// Handle to one scalar node of a [`Graph`].
///
/// `Value` is a cheap `Copy` handle (arena reference plus stable index); all
/// graph-building operations are methods returning new handles, and the
/// underlying node is read through the accessors below.
#[derive(Clone, Copy)]
pub struct Value<'g, F: Float> {
    pub(crate) graph: &'g Graph<F>,
    pub(crate) id: NodeId,
}

impl<'g, F: Float> Value<'g, F> {
    /// The owning arena.
    pub fn graph(&self) -> &'g Graph<F> {
        self.graph
    }

    /// Stable index of this node inside its arena.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The forward-computed value of this node.
    pub fn data(&self) -> F {
        self.graph.nodes.borrow()[self.id.index()].data
    }

    /// The gradient accumulated into this node by the backward engine.
    pub fn grad(&self) -> F {
        self.graph.nodes.borrow()[self.id.index()].grad
    }

    /// Overwrites the value of a leaf node, e.g. an optimizer updating a
    /// parameter in place between training iterations.
    ///
    /// Non-leaf values are derived, not stored state, so writing through them
    /// is rejected with [`ScalarGradError::NotLeaf`].
    pub fn set_data(&self, data: F) -> Result<(), ScalarGradError> {
        let mut nodes = self.graph.nodes.borrow_mut();
        let node = &mut nodes[self.id.index()];
        if !node.is_leaf() {
            return Err(ScalarGradError::NotLeaf {
                operation: "set_data".to_string(),
            });
        }
        node.data = data;
        Ok(())
    }

    /// Resets this node's gradient to zero.
    pub fn zero_grad(&self) {
        self.graph.nodes.borrow_mut()[self.id.index()].grad = F::zero();
    }

    /// Whether this node is a leaf (no operands).
    pub fn is_leaf(&self) -> bool {
        self.graph.nodes.borrow()[self.id.index()].is_leaf()
    }

    /// Diagnostic tag of the operation that produced this node; `None` for
    /// leaves. Not used for correctness anywhere.
    pub fn op_label(&self) -> Option<&'static str> {
        self.graph.nodes.borrow()[self.id.index()].op.label()
    }

    /// Read-only handles to this node's predecessors, in operand order.
    ///
    /// Empty for leaves. Visualization tooling can walk the graph through
    /// this without touching any node state.
    pub fn operands(&self) -> Vec<Value<'g, F>> {
        let nodes = self.graph.nodes.borrow();
        nodes[self.id.index()]
            .op
            .operands()
            .map(|id| Value {
                graph: self.graph,
                id,
            })
            .collect()
    }
}

impl<F: Float + fmt::Debug> fmt::Debug for Value<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("id", &self.id.index())
            .field("op", &self.op_label().unwrap_or("leaf"))
            .field("data", &self.data())
            .field("grad", &self.grad())
            .finish()
    }
}
