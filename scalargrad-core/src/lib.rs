// Declare the crate's main modules
pub mod autograd;
pub mod graph;
pub mod node;
pub mod ops;

// Declare new top-level modules
pub mod nn;
pub mod utils;

// Re-export the handle types so they are accessible directly via
// `scalargrad_core::Graph` / `scalargrad_core::Value`.
pub use graph::{Checkpoint, Graph, Value};
pub use node::NodeId;
// Re-export traits required by public functions/structs
pub use num_traits;
pub use ops::IntoOperand;

pub use autograd::zero_grad;

pub mod error;
pub use error::ScalarGradError;
