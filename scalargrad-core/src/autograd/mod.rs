//! Reverse-mode backward engine over the node arena.
//!
//! The graph is built during forward operations; [`Value::backward`]
//! propagates gradients from a root to every reachable node using the chain
//! rule in reverse topological order, accumulating (never overwriting) each
//! node's gradient so that fan-out sums correctly.

pub mod grad_check;

use crate::graph::{Graph, Value};
use crate::node::{Node, NodeId, Op};
use num_traits::Float;

impl<'g, F: Float> Value<'g, F> {
    /// Runs backpropagation from this node to every node reachable from it.
    ///
    /// Seeds this node's gradient with 1 (the derivative of the root with
    /// respect to itself), then applies each reachable node's propagation
    /// rule in reverse topological order, so a node's incoming gradient is
    /// fully accumulated before it is forwarded upstream.
    ///
    /// Gradients are never reset here: calling `backward` again without a
    /// `zero_grad` adds to the existing values, which is how batch gradient
    /// accumulation is expressed. On a bare leaf this seeds the leaf's own
    /// gradient and nothing else.
    pub fn backward(self) {
        backward(self.graph(), self.id());
    }
}

/// Resets the gradient of each listed node to zero.
///
/// Convenience for optimizer-style callers holding a parameter list; see
/// also [`Graph::zero_grad`] for resetting an entire arena.
pub fn zero_grad<F: Float>(nodes: &[Value<'_, F>]) {
    for node in nodes {
        node.zero_grad();
    }
}

fn backward<F: Float>(graph: &Graph<F>, root: NodeId) {
    let mut nodes = graph.nodes.borrow_mut();
    let schedule = reachable_ascending(&nodes, root);
    log::debug!(
        "backward from node {}: {} of {} nodes reachable",
        root.index(),
        schedule.len(),
        nodes.len()
    );

    nodes[root.index()].grad = F::one();

    // Ascending arena order is a topological order (operands strictly precede
    // consumers), so the reverse walk visits the root first and each node
    // only after all of its consumers.
    for &id in schedule.iter().rev() {
        propagate(&mut nodes, id);
    }
}

/// Marks the subgraph reachable from `root` and returns it in ascending
/// index order. Iterative depth-first search; shared subexpressions are
/// visited once.
fn reachable_ascending<F: Float>(nodes: &[Node<F>], root: NodeId) -> Vec<NodeId> {
    let mut visited = vec![false; nodes.len()];
    let mut stack = vec![root];
    visited[root.index()] = true;

    while let Some(id) = stack.pop() {
        for operand in nodes[id.index()].op.operands() {
            if !visited[operand.index()] {
                visited[operand.index()] = true;
                stack.push(operand);
            }
        }
    }

    visited
        .iter()
        .enumerate()
        .filter_map(|(index, &seen)| seen.then_some(NodeId(index)))
        .collect()
}

/// Applies one node's local gradient-propagation rule, dispatched by op tag.
///
/// Reads the node's fully-accumulated gradient and accumulates the chain-rule
/// contribution into each operand's gradient. Leaves are a no-op.
fn propagate<F: Float>(nodes: &mut [Node<F>], id: NodeId) {
    let Node { data, grad, op } = nodes[id.index()];
    match op {
        Op::Leaf => {}
        Op::Add(a, b) => {
            nodes[a.index()].grad = nodes[a.index()].grad + grad;
            nodes[b.index()].grad = nodes[b.index()].grad + grad;
        }
        Op::Mul(a, b) => {
            // Read both operand values before touching gradients so the
            // a == b fan-in case stays well-defined.
            let da = nodes[b.index()].data * grad;
            let db = nodes[a.index()].data * grad;
            nodes[a.index()].grad = nodes[a.index()].grad + da;
            nodes[b.index()].grad = nodes[b.index()].grad + db;
        }
        Op::Pow(a, exponent) => {
            let base = nodes[a.index()].data;
            let local = exponent * base.powf(exponent - F::one());
            nodes[a.index()].grad = nodes[a.index()].grad + local * grad;
        }
        Op::Relu(a) => {
            if nodes[a.index()].data > F::zero() {
                nodes[a.index()].grad = nodes[a.index()].grad + grad;
            }
        }
        Op::Tanh(a) => {
            let local = F::one() - data * data;
            nodes[a.index()].grad = nodes[a.index()].grad + local * grad;
        }
        Op::Exp(a) => {
            nodes[a.index()].grad = nodes[a.index()].grad + data * grad;
        }
    }
}
